//! Error types for port operations.

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Entity not found - includes entity type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Business constraint violated (e.g., a unique index).
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// A guarded update found the row already changed by a concurrent
    /// writer; the caller's read is stale.
    #[error("Concurrent update conflict: {0}")]
    Conflict(String),
}

impl RepoError {
    /// Create a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    /// Create a ConstraintViolation error.
    pub fn constraint(message: impl ToString) -> Self {
        Self::ConstraintViolation(message.to_string())
    }

    /// Check if this is a constraint violation (used for code-collision retry).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }

    /// Create a Conflict error.
    pub fn conflict(message: impl ToString) -> Self {
        Self::Conflict(message.to_string())
    }

    /// Check if this is a concurrent-update conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Errors from AI provider calls.
///
/// `RateLimited` must stay distinct from the other kinds: it is the only
/// failure the failover orchestrator rotates on.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AiError {
    /// The backend signaled throttling (HTTP 429 or a rate-limit message).
    #[error("{provider} rate limited: {message}")]
    RateLimited { provider: String, message: String },

    /// The model's reply failed structural validation.
    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),

    /// Transport or backend failure other than throttling.
    #[error("AI request failed: {0}")]
    RequestFailed(String),

    /// Every configured provider failed; carries the last error per provider.
    #[error("All AI providers exhausted after {} attempts", attempts.len())]
    AllProvidersExhausted { attempts: Vec<(String, String)> },
}

impl AiError {
    pub fn rate_limited(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RateLimited {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
