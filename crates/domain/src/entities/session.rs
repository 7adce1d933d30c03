//! Game session entity and the adaptive answer transition.
//!
//! A session is the state machine at the heart of the game: status moves
//! from `Active` to `GameOver` exactly once and never back. The transition
//! is a pure function of the session state, the answer outcome, and the
//! configured [`AdaptivePolicy`], so every invariant is unit-testable
//! without touching storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AdaptivePolicy, DomainError, PlayerId, RoomId, SessionDifficulty, SessionId};

/// Lives a fresh session starts with.
pub const STARTING_LIVES: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    GameOver,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::GameOver => "game_over",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw {
            "active" => Ok(Self::Active),
            "game_over" => Ok(Self::GameOver),
            other => Err(DomainError::validation(format!(
                "Unknown session status: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One player's ongoing play-through.
///
/// `current_difficulty` is the authoritative adaptive state; it is never
/// overwritten from client input after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub id: SessionId,
    pub player_id: PlayerId,
    pub room_id: Option<RoomId>,
    pub current_difficulty: SessionDifficulty,
    pub score: u32,
    pub lives: u8,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of applying one answer to a session.
#[derive(Debug, Clone)]
pub struct AnswerTransition {
    /// The session difficulty at the moment of answering, before the
    /// adjustment. Recorded on the answer fact for per-difficulty analytics.
    pub difficulty_at_answer: SessionDifficulty,
    /// Points awarded by this answer (0 when incorrect).
    pub score_delta: u32,
    /// The post-transition session state to persist.
    pub session: GameSession,
}

impl GameSession {
    /// Apply one answer, producing the updated session state.
    ///
    /// Fails with [`DomainError::SessionClosed`] when the session already
    /// reached game over; the terminal state is one-way.
    pub fn answer(
        &self,
        is_correct: bool,
        time_taken_secs: f64,
        policy: &AdaptivePolicy,
        now: DateTime<Utc>,
    ) -> Result<AnswerTransition, DomainError> {
        if self.status == SessionStatus::GameOver {
            return Err(DomainError::SessionClosed(self.id));
        }

        let difficulty_at_answer = self.current_difficulty;

        let (score_delta, step) = if is_correct {
            if time_taken_secs < policy.fast_answer_threshold_secs {
                (policy.fast_answer_score, policy.fast_answer_bonus)
            } else {
                (policy.correct_score, policy.slow_correct_bonus)
            }
        } else {
            (0, -policy.incorrect_penalty)
        };

        let lives = if is_correct {
            self.lives
        } else {
            self.lives.saturating_sub(1)
        };
        let status = if lives == 0 {
            SessionStatus::GameOver
        } else {
            SessionStatus::Active
        };

        let session = GameSession {
            current_difficulty: difficulty_at_answer.adjusted_by(step),
            score: self.score + score_delta,
            lives,
            status,
            updated_at: now,
            ..self.clone()
        };

        Ok(AnswerTransition {
            difficulty_at_answer,
            score_delta,
            session,
        })
    }
}
