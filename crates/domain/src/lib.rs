//! QuizForge domain types.
//!
//! Pure domain layer: typed IDs, the adaptive session state machine,
//! question validation, and room codes. No I/O and no randomness here;
//! adapters inject both.

pub mod difficulty;
pub mod entities;
pub mod error;
pub mod ids;

pub use difficulty::{AdaptivePolicy, DifficultyLevel, SessionDifficulty};
pub use entities::{
    validate_option_set, AnswerOption, AnswerTransition, Explanation, GameRoom, GameSession,
    NewOption, NewQuestion, Player, PlayerAnswer, Question, RoomCode, SessionStatus,
    OPTIONS_PER_QUESTION, ROOM_CODE_ALPHABET, ROOM_CODE_LEN, STARTING_LIVES,
};
pub use error::DomainError;
pub use ids::{CategoryId, OptionId, PlayerId, QuestionId, RoomId, SessionId};
