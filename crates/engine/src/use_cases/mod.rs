//! Application use cases orchestrating domain logic through the ports.

pub mod player;
pub mod question;
pub mod room;
pub mod session;

use quizforge_domain::DomainError;

use crate::infrastructure::ports::{AiError, RepoError};

/// Unified application-layer error.
///
/// Use cases return this so the HTTP layer can map each variant to a
/// status code without inspecting strings.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("{field} out of range: {value} (allowed {min} to {max})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The session already reached game over.
    #[error("Session {0} is already over")]
    SessionClosed(quizforge_domain::SessionId),

    #[error(transparent)]
    Storage(#[from] RepoError),

    #[error(transparent)]
    Ai(#[from] AiError),
}

impl From<DomainError> for GameError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::OutOfRange {
                field,
                value,
                min,
                max,
            } => Self::OutOfRange {
                field,
                value,
                min,
                max,
            },
            DomainError::Validation(msg) => Self::Validation(msg),
            DomainError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            DomainError::SessionClosed(id) => Self::SessionClosed(id),
        }
    }
}

impl GameError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}
