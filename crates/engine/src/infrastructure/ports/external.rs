//! External service port traits (AI providers, clock).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quizforge_domain::{validate_option_set, DifficultyLevel, Explanation, NewOption};

use super::error::AiError;

/// A question as produced by a generative backend, before persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedQuestion {
    pub statement: String,
    pub options: Vec<GeneratedOption>,
    pub correct_explanation: String,
    pub incorrect_explanation: String,
    pub source_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedOption {
    pub text: String,
    pub is_correct: bool,
}

impl GeneratedQuestion {
    /// Structural validation of model output: non-empty statement, exactly
    /// four options, exactly one correct, unique texts, non-empty feedback.
    pub fn validate(&self) -> Result<(), AiError> {
        let options: Vec<(&str, bool)> = self
            .options
            .iter()
            .map(|o| (o.text.as_str(), o.is_correct))
            .collect();
        validate_option_set(&self.statement, &options)
            .map_err(|e| AiError::MalformedResponse(e.to_string()))?;

        if self.correct_explanation.trim().is_empty()
            || self.incorrect_explanation.trim().is_empty()
        {
            return Err(AiError::MalformedResponse(
                "Missing correct/incorrect explanation".into(),
            ));
        }
        Ok(())
    }

    /// Options converted for persistence.
    pub fn new_options(&self) -> Vec<NewOption> {
        self.options
            .iter()
            .map(|o| NewOption {
                text: o.text.clone(),
                is_correct: o.is_correct,
            })
            .collect()
    }

    pub fn explanation(&self) -> Explanation {
        Explanation {
            correct_text: self.correct_explanation.clone(),
            incorrect_text: self.incorrect_explanation.clone(),
            source_ref: self.source_ref.clone(),
        }
    }
}

/// Feedback from validating a free-form answer against a question.
#[derive(Debug, Clone)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub explanation: String,
}

/// One generative-AI backend.
///
/// Every backend is interchangeable behind this trait; the failover
/// orchestrator depends on nothing else.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiProviderPort: Send + Sync {
    /// Provider name used in logs and error diagnostics.
    fn name(&self) -> &str;

    /// Generate a question on `topic` at the given difficulty tier.
    async fn generate(
        &self,
        topic: &str,
        difficulty: DifficultyLevel,
    ) -> Result<GeneratedQuestion, AiError>;

    /// Judge a free-form answer against a question statement.
    async fn validate_answer(
        &self,
        statement: &str,
        answer: &str,
    ) -> Result<AnswerFeedback, AiError>;
}

/// Wall clock, mockable for tests.
#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// System clock implementation.
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
