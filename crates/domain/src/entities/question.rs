//! Question entity with its options and explanation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CategoryId, DifficultyLevel, DomainError, OptionId, QuestionId};

/// Number of answer options every question carries.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// A trivia question.
///
/// AI-generated questions enter with `admin_verified = false` and are still
/// servable to players; verification only gates later curation queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub statement: String,
    pub difficulty: DifficultyLevel,
    pub category_id: CategoryId,
    pub is_ai_generated: bool,
    pub admin_verified: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// One answer option, ordered by `position` within its question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: OptionId,
    pub question_id: QuestionId,
    pub text: String,
    pub is_correct: bool,
    pub position: u32,
}

/// Feedback text tied 1:1 to a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub correct_text: String,
    pub incorrect_text: String,
    pub source_ref: Option<String>,
}

/// A question ready to be persisted, options and explanation included.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub statement: String,
    pub difficulty: DifficultyLevel,
    pub category_id: CategoryId,
    pub is_ai_generated: bool,
    pub admin_verified: bool,
    pub options: Vec<NewOption>,
    pub explanation: Explanation,
}

#[derive(Debug, Clone)]
pub struct NewOption {
    pub text: String,
    pub is_correct: bool,
}

impl NewQuestion {
    pub fn validate(&self) -> Result<(), DomainError> {
        let options: Vec<(&str, bool)> = self
            .options
            .iter()
            .map(|o| (o.text.as_str(), o.is_correct))
            .collect();
        validate_option_set(&self.statement, &options)?;

        if self.explanation.correct_text.trim().is_empty()
            || self.explanation.incorrect_text.trim().is_empty()
        {
            return Err(DomainError::validation(
                "Question explanations cannot be empty",
            ));
        }
        Ok(())
    }
}

/// Structural validation shared by persistence and AI-output parsing:
/// non-empty statement, exactly four options, exactly one correct, and no
/// duplicate option texts (case-insensitive).
pub fn validate_option_set(statement: &str, options: &[(&str, bool)]) -> Result<(), DomainError> {
    if statement.trim().is_empty() {
        return Err(DomainError::validation("Question statement cannot be empty"));
    }

    if options.len() != OPTIONS_PER_QUESTION {
        return Err(DomainError::validation(format!(
            "Expected {OPTIONS_PER_QUESTION} options, got {}",
            options.len()
        )));
    }

    if options.iter().any(|(text, _)| text.trim().is_empty()) {
        return Err(DomainError::validation("Option text cannot be empty"));
    }

    let correct_count = options.iter().filter(|(_, correct)| *correct).count();
    if correct_count != 1 {
        return Err(DomainError::validation(format!(
            "Expected exactly 1 correct option, got {correct_count}"
        )));
    }

    let mut seen: Vec<String> = Vec::with_capacity(options.len());
    for (text, _) in options {
        let normalized = text.trim().to_lowercase();
        if seen.contains(&normalized) {
            return Err(DomainError::validation(format!(
                "Duplicate option text: {text}"
            )));
        }
        seen.push(normalized);
    }

    Ok(())
}
