//! Next question use case - store-first sourcing with AI fallback.

use std::sync::Arc;

use quizforge_domain::{CategoryId, DifficultyLevel, NewQuestion, Question};

use crate::infrastructure::ports::{AiProviderPort, CategoryRepo, QuestionRepo};
use crate::use_cases::GameError;

/// Why no question could be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// Store miss and no AI backend is configured.
    AiNotConfigured,
    /// Store miss and the generation path failed.
    GenerationFailed,
}

/// Outcome of sourcing a question at (category, difficulty).
#[derive(Debug, Clone)]
pub enum NextQuestionOutcome {
    Found(Question),
    Unavailable(UnavailableReason),
}

/// Sources a question for play: store-first, AI-generation fallback.
///
/// Generation failures never propagate to the player-facing flow; they
/// degrade to an `Unavailable` outcome with the reason logged.
pub struct NextQuestion {
    questions: Arc<dyn QuestionRepo>,
    categories: Arc<dyn CategoryRepo>,
    ai: Option<Arc<dyn AiProviderPort>>,
}

impl NextQuestion {
    pub fn new(
        questions: Arc<dyn QuestionRepo>,
        categories: Arc<dyn CategoryRepo>,
        ai: Option<Arc<dyn AiProviderPort>>,
    ) -> Self {
        Self {
            questions,
            categories,
            ai,
        }
    }

    pub async fn execute(
        &self,
        category_id: CategoryId,
        difficulty: i64,
    ) -> Result<NextQuestionOutcome, GameError> {
        let difficulty = DifficultyLevel::from_i64(difficulty)?;

        if let Some(question) = self
            .questions
            .find_verified_latest(category_id, difficulty)
            .await?
        {
            return Ok(NextQuestionOutcome::Found(question));
        }

        let Some(ai) = &self.ai else {
            tracing::debug!(
                category_id = %category_id,
                difficulty = difficulty.as_u8(),
                "Store miss and no AI backend configured"
            );
            return Ok(NextQuestionOutcome::Unavailable(
                UnavailableReason::AiNotConfigured,
            ));
        };

        // Category must exist before we spend an AI call on it.
        let topic = self
            .categories
            .name(category_id)
            .await?
            .ok_or_else(|| GameError::not_found("Category", category_id))?;

        match self.generate_and_persist(ai, &topic, category_id, difficulty).await {
            Ok(question) => Ok(NextQuestionOutcome::Found(question)),
            Err(err) => {
                tracing::warn!(
                    category_id = %category_id,
                    difficulty = difficulty.as_u8(),
                    error = %err,
                    "Question generation failed, serving nothing"
                );
                Ok(NextQuestionOutcome::Unavailable(
                    UnavailableReason::GenerationFailed,
                ))
            }
        }
    }

    async fn generate_and_persist(
        &self,
        ai: &Arc<dyn AiProviderPort>,
        topic: &str,
        category_id: CategoryId,
        difficulty: DifficultyLevel,
    ) -> Result<Question, GameError> {
        let generated = ai.generate(topic, difficulty).await?;
        generated.validate()?;

        let new_question = NewQuestion {
            statement: generated.statement.clone(),
            difficulty,
            category_id,
            is_ai_generated: true,
            admin_verified: false,
            options: generated.new_options(),
            explanation: generated.explanation(),
        };

        let question = self.questions.create_generated(&new_question).await?;
        tracing::info!(
            question_id = %question.id,
            category_id = %category_id,
            difficulty = difficulty.as_u8(),
            "Generated question persisted"
        );
        Ok(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        AiError, GeneratedOption, GeneratedQuestion, MockAiProviderPort, MockCategoryRepo,
        MockQuestionRepo,
    };
    use chrono::{TimeZone, Utc};
    use mockall::predicate::*;
    use quizforge_domain::QuestionId;

    fn stored_question(id: i64, difficulty: DifficultyLevel) -> Question {
        Question {
            id: QuestionId::new(id),
            statement: "Which planet is closest to the sun?".into(),
            difficulty,
            category_id: CategoryId::new(1),
            is_ai_generated: false,
            admin_verified: true,
            is_active: true,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    fn generated(correct_flags: [bool; 4]) -> GeneratedQuestion {
        let texts = ["Mercury", "Venus", "Mars", "Jupiter"];
        GeneratedQuestion {
            statement: "Which planet is closest to the sun?".into(),
            options: texts
                .iter()
                .zip(correct_flags)
                .map(|(text, is_correct)| GeneratedOption {
                    text: text.to_string(),
                    is_correct,
                })
                .collect(),
            correct_explanation: "Mercury orbits closest.".into(),
            incorrect_explanation: "The closest is Mercury.".into(),
            source_ref: None,
        }
    }

    #[tokio::test]
    async fn store_hit_skips_the_ai_entirely() {
        let mut questions = MockQuestionRepo::new();
        let categories = MockCategoryRepo::new();
        let ai = MockAiProviderPort::new();
        // Any generate call would panic: no expectation set.

        questions
            .expect_find_verified_latest()
            .with(eq(CategoryId::new(1)), eq(DifficultyLevel::Intermediate))
            .returning(|_, d| Ok(Some(stored_question(42, d))));

        let use_case = NextQuestion::new(
            Arc::new(questions),
            Arc::new(categories),
            Some(Arc::new(ai)),
        );
        let outcome = use_case.execute(CategoryId::new(1), 3).await.unwrap();

        match outcome {
            NextQuestionOutcome::Found(q) => assert_eq!(q.id, QuestionId::new(42)),
            other => panic!("expected a question, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn store_miss_without_ai_is_unavailable() {
        let mut questions = MockQuestionRepo::new();
        let categories = MockCategoryRepo::new();

        questions
            .expect_find_verified_latest()
            .returning(|_, _| Ok(None));

        let use_case = NextQuestion::new(Arc::new(questions), Arc::new(categories), None);
        let outcome = use_case.execute(CategoryId::new(1), 2).await.unwrap();

        assert!(matches!(
            outcome,
            NextQuestionOutcome::Unavailable(UnavailableReason::AiNotConfigured)
        ));
    }

    #[tokio::test]
    async fn store_miss_generates_and_persists() {
        let mut questions = MockQuestionRepo::new();
        let mut categories = MockCategoryRepo::new();
        let mut ai = MockAiProviderPort::new();

        questions
            .expect_find_verified_latest()
            .returning(|_, _| Ok(None));
        categories
            .expect_name()
            .with(eq(CategoryId::new(2)))
            .returning(|_| Ok(Some("Science".to_string())));
        ai.expect_generate()
            .with(eq("Science"), eq(DifficultyLevel::Easy))
            .returning(|_, _| Ok(generated([true, false, false, false])));
        questions
            .expect_create_generated()
            .withf(|q| q.is_ai_generated && !q.admin_verified && q.options.len() == 4)
            .returning(|q| {
                Ok(Question {
                    id: QuestionId::new(77),
                    statement: q.statement.clone(),
                    difficulty: q.difficulty,
                    category_id: q.category_id,
                    is_ai_generated: true,
                    admin_verified: false,
                    is_active: true,
                    created_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
                })
            });

        let use_case = NextQuestion::new(
            Arc::new(questions),
            Arc::new(categories),
            Some(Arc::new(ai)),
        );
        let outcome = use_case.execute(CategoryId::new(2), 2).await.unwrap();

        match outcome {
            NextQuestionOutcome::Found(q) => {
                assert_eq!(q.id, QuestionId::new(77));
                assert!(q.is_ai_generated);
                assert!(!q.admin_verified);
            }
            other => panic!("expected a question, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_generation_degrades_to_unavailable() {
        let mut questions = MockQuestionRepo::new();
        let mut categories = MockCategoryRepo::new();
        let mut ai = MockAiProviderPort::new();

        questions
            .expect_find_verified_latest()
            .returning(|_, _| Ok(None));
        categories
            .expect_name()
            .returning(|_| Ok(Some("Science".to_string())));
        // Two options marked correct fails structural validation.
        ai.expect_generate()
            .returning(|_, _| Ok(generated([true, true, false, false])));

        let use_case = NextQuestion::new(
            Arc::new(questions),
            Arc::new(categories),
            Some(Arc::new(ai)),
        );
        let outcome = use_case.execute(CategoryId::new(1), 1).await.unwrap();

        assert!(matches!(
            outcome,
            NextQuestionOutcome::Unavailable(UnavailableReason::GenerationFailed)
        ));
    }

    #[tokio::test]
    async fn ai_failure_degrades_to_unavailable() {
        let mut questions = MockQuestionRepo::new();
        let mut categories = MockCategoryRepo::new();
        let mut ai = MockAiProviderPort::new();

        questions
            .expect_find_verified_latest()
            .returning(|_, _| Ok(None));
        categories
            .expect_name()
            .returning(|_| Ok(Some("History".to_string())));
        ai.expect_generate().returning(|_, _| {
            Err(AiError::AllProvidersExhausted {
                attempts: vec![("gemini".into(), "rate limited".into())],
            })
        });

        let use_case = NextQuestion::new(
            Arc::new(questions),
            Arc::new(categories),
            Some(Arc::new(ai)),
        );
        let outcome = use_case.execute(CategoryId::new(1), 4).await.unwrap();

        assert!(matches!(
            outcome,
            NextQuestionOutcome::Unavailable(UnavailableReason::GenerationFailed)
        ));
    }

    #[tokio::test]
    async fn unknown_category_propagates_not_found() {
        let mut questions = MockQuestionRepo::new();
        let mut categories = MockCategoryRepo::new();
        let ai = MockAiProviderPort::new();

        questions
            .expect_find_verified_latest()
            .returning(|_, _| Ok(None));
        categories.expect_name().returning(|_| Ok(None));

        let use_case = NextQuestion::new(
            Arc::new(questions),
            Arc::new(categories),
            Some(Arc::new(ai)),
        );
        let err = use_case.execute(CategoryId::new(99), 3).await.unwrap_err();

        assert!(matches!(err, GameError::NotFound { entity_type: "Category", .. }));
    }

    #[tokio::test]
    async fn out_of_band_difficulty_is_rejected() {
        let questions = MockQuestionRepo::new();
        let categories = MockCategoryRepo::new();

        let use_case = NextQuestion::new(Arc::new(questions), Arc::new(categories), None);
        let err = use_case.execute(CategoryId::new(1), 6).await.unwrap_err();

        assert!(matches!(err, GameError::OutOfRange { field: "difficulty", .. }));
    }
}
