//! Player entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DomainError, PlayerId};

/// A registered player. Created on first play and looked up by
/// (name, age) so repeat visitors do not accumulate duplicate rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub age: u32,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Validate the identifying pair used for lookup and creation.
    pub fn validate_identity(name: &str, age: u32) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("Player name cannot be empty"));
        }
        if age == 0 || age > 120 {
            return Err(DomainError::out_of_range("age", age as f64, 1.0, 120.0));
        }
        Ok(())
    }
}
