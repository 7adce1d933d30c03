//! Player answer fact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{OptionId, QuestionId, SessionDifficulty, SessionId};

/// Append-only record of one submitted answer.
///
/// `difficulty_at_answer` captures the session's adaptive difficulty at the
/// moment of answering, before the post-answer adjustment, which is the
/// value per-difficulty analytics key on. It is not the question's own
/// integer difficulty label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerAnswer {
    pub session_id: SessionId,
    pub question_id: QuestionId,
    pub selected_option_id: Option<OptionId>,
    pub is_correct: bool,
    pub time_taken_secs: f64,
    pub difficulty_at_answer: SessionDifficulty,
    pub answered_at: DateTime<Utc>,
}
