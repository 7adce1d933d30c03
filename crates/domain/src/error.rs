//! Unified error type for the domain layer.
//!
//! Adapters map these onto their own error types instead of passing
//! around Strings or anyhow errors.

use thiserror::Error;

use crate::SessionId;

/// Unified error type for domain operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A numeric field fell outside its allowed range.
    #[error("{field} out of range: {value} (allowed {min} to {max})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The session already reached game over; no further answers accepted.
    #[error("Session {0} is already over")]
    SessionClosed(SessionId),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn out_of_range(field: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }
}
