//! SQLite implementations of the repository ports.

mod answer_repository;
mod player_repository;
mod question_repository;
mod room_repository;
mod schema;
mod session_repository;

pub use answer_repository::SqliteAnswerRepo;
pub use player_repository::SqlitePlayerRepo;
pub use question_repository::{SqliteCategoryRepo, SqliteQuestionRepo};
pub use room_repository::SqliteRoomRepo;
pub use schema::ensure_schema;
pub use session_repository::SqliteSessionRepo;

use chrono::{DateTime, Utc};

use crate::infrastructure::ports::RepoError;

/// Parse an RFC 3339 timestamp persisted as TEXT.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepoError::serialization(format!("Bad timestamp '{raw}': {e}")))
}
