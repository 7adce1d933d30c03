//! Difficulty types.
//!
//! Two distinct notions of difficulty exist and must not be conflated:
//! - [`SessionDifficulty`] is the continuous per-session skill estimate in
//!   [1.00, 5.00], adjusted after every answer and held server-side.
//! - [`DifficultyLevel`] is a question's fixed integer label (1-5) used to
//!   select questions and to describe the requested tier to AI backends.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Continuous session-level skill estimate, clamped to [1.00, 5.00] and
/// rounded to 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionDifficulty(f64);

impl SessionDifficulty {
    pub const MIN: f64 = 1.0;
    pub const MAX: f64 = 5.0;

    /// Create from a raw value, failing if it lies outside [1.00, 5.00].
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || value < Self::MIN || value > Self::MAX {
            return Err(DomainError::out_of_range(
                "difficulty",
                value,
                Self::MIN,
                Self::MAX,
            ));
        }
        Ok(Self(round2(value)))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Apply a step, clamping to the valid band and rounding to 2 decimals.
    pub fn adjusted_by(&self, step: f64) -> Self {
        Self(round2((self.0 + step).clamp(Self::MIN, Self::MAX)))
    }

    /// Nearest integer question tier for this session difficulty.
    pub fn nearest_level(&self) -> DifficultyLevel {
        // Rounded value is always within 1..=5, so the conversion cannot fail.
        DifficultyLevel::try_from(self.0.round() as u8).unwrap_or(DifficultyLevel::Basic)
    }
}

impl Default for SessionDifficulty {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl std::fmt::Display for SessionDifficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fixed integer difficulty label on a question, 1 through 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DifficultyLevel {
    Basic = 1,
    Easy = 2,
    Intermediate = 3,
    Advanced = 4,
    Expert = 5,
}

impl DifficultyLevel {
    pub fn from_i64(raw: i64) -> Result<Self, DomainError> {
        u8::try_from(raw)
            .ok()
            .and_then(|v| Self::try_from(v).ok())
            .ok_or_else(|| DomainError::out_of_range("difficulty", raw as f64, 1.0, 5.0))
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Easy => "easy",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }

    /// Tier description embedded in generation prompts.
    pub fn prompt_description(&self) -> &'static str {
        match self {
            Self::Basic => "common knowledge a beginner would recognize",
            Self::Easy => "straightforward material for a casual enthusiast",
            Self::Intermediate => "requires solid familiarity with the topic",
            Self::Advanced => "detailed knowledge only dedicated students hold",
            Self::Expert => "obscure, specialist-level material",
        }
    }
}

impl From<DifficultyLevel> for u8 {
    fn from(value: DifficultyLevel) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for DifficultyLevel {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Basic),
            2 => Ok(Self::Easy),
            3 => Ok(Self::Intermediate),
            4 => Ok(Self::Advanced),
            5 => Ok(Self::Expert),
            other => Err(DomainError::out_of_range(
                "difficulty",
                other as f64,
                1.0,
                5.0,
            )),
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Named constants for the difficulty-adjustment and scoring rule.
///
/// The default steps +0.25 for correct answers under 6 seconds; a stricter
/// variant (+0.50 under 3 seconds) is reachable by configuration since
/// every threshold, step, and score lives here rather than in the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptivePolicy {
    /// Answers faster than this many seconds earn the fast bonus.
    pub fast_answer_threshold_secs: f64,
    /// Difficulty step for a fast correct answer.
    pub fast_answer_bonus: f64,
    /// Difficulty step for a correct answer at or above the threshold.
    pub slow_correct_bonus: f64,
    /// Difficulty step subtracted for an incorrect answer (stored positive).
    pub incorrect_penalty: f64,
    /// Score awarded for a fast correct answer.
    pub fast_answer_score: u32,
    /// Score awarded for any other correct answer.
    pub correct_score: u32,
}

impl Default for AdaptivePolicy {
    fn default() -> Self {
        Self {
            fast_answer_threshold_secs: 6.0,
            fast_answer_bonus: 0.25,
            slow_correct_bonus: 0.10,
            incorrect_penalty: 0.25,
            fast_answer_score: 15,
            correct_score: 10,
        }
    }
}
