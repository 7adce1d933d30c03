//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is
//! concrete types. Ports exist for:
//! - Database access (could swap SQLite -> Postgres)
//! - AI providers (OpenAI-compatible, Gemini, whatever comes next)
//! - Clock (for testing)

mod error;
mod external;
mod repos;

pub use error::{AiError, RepoError};
pub use external::{
    AiProviderPort, AnswerFeedback, ClockPort, GeneratedOption, GeneratedQuestion, SystemClock,
};
pub use repos::{AnswerRepo, CategoryRepo, PlayerRepo, QuestionRepo, RoomRepo, SessionRepo};

#[cfg(test)]
pub use external::{MockAiProviderPort, MockClockPort};
#[cfg(test)]
pub use repos::{
    MockAnswerRepo, MockCategoryRepo, MockPlayerRepo, MockQuestionRepo, MockRoomRepo,
    MockSessionRepo,
};
