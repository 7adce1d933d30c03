//! Submit answer use case - the adaptive session transition.

use std::sync::Arc;

use quizforge_domain::{
    AdaptivePolicy, GameSession, OptionId, PlayerAnswer, QuestionId, SessionId,
};

use crate::infrastructure::ports::{ClockPort, SessionRepo};
use crate::use_cases::GameError;

/// The answer submission as received from the boundary.
///
/// The session's difficulty is deliberately absent: scoring always reads
/// the server-held value, never client input.
#[derive(Debug, Clone)]
pub struct AnswerSubmission {
    pub question_id: QuestionId,
    pub selected_option_id: Option<OptionId>,
    pub is_correct: bool,
    pub time_taken_secs: f64,
}

/// What the caller gets back after the transition is persisted.
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    pub score_delta: u32,
    pub session: GameSession,
}

/// Applies one answer to a session: records the answer fact and advances
/// score, lives, status, and adaptive difficulty in a single atomic write.
pub struct SubmitAnswer {
    sessions: Arc<dyn SessionRepo>,
    clock: Arc<dyn ClockPort>,
    policy: AdaptivePolicy,
}

impl SubmitAnswer {
    pub fn new(
        sessions: Arc<dyn SessionRepo>,
        clock: Arc<dyn ClockPort>,
        policy: AdaptivePolicy,
    ) -> Self {
        Self {
            sessions,
            clock,
            policy,
        }
    }

    pub async fn execute(
        &self,
        session_id: SessionId,
        submission: AnswerSubmission,
    ) -> Result<AnswerOutcome, GameError> {
        let session = self
            .sessions
            .get(session_id)
            .await?
            .ok_or_else(|| GameError::not_found("Session", session_id))?;

        let now = self.clock.now();
        let transition = session.answer(
            submission.is_correct,
            submission.time_taken_secs,
            &self.policy,
            now,
        )?;

        // The fact carries the pre-transition difficulty for later
        // per-difficulty analytics.
        let fact = PlayerAnswer {
            session_id,
            question_id: submission.question_id,
            selected_option_id: submission.selected_option_id,
            is_correct: submission.is_correct,
            time_taken_secs: submission.time_taken_secs,
            difficulty_at_answer: transition.difficulty_at_answer,
            answered_at: now,
        };

        self.sessions
            .apply_answer(&session, &transition.session, &fact)
            .await?;

        tracing::debug!(
            session_id = %session_id,
            correct = submission.is_correct,
            score = transition.session.score,
            lives = transition.session.lives,
            difficulty = %transition.session.current_difficulty,
            "Answer applied"
        );

        Ok(AnswerOutcome {
            score_delta: transition.score_delta,
            session: transition.session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockClockPort, MockSessionRepo};
    use chrono::{TimeZone, Utc};
    use mockall::predicate::*;
    use quizforge_domain::{
        PlayerId, SessionDifficulty, SessionStatus, STARTING_LIVES,
    };

    fn test_session(id: i64, difficulty: f64, lives: u8, status: SessionStatus) -> GameSession {
        let t = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        GameSession {
            id: SessionId::new(id),
            player_id: PlayerId::new(7),
            room_id: None,
            current_difficulty: SessionDifficulty::new(difficulty).unwrap(),
            score: 10,
            lives,
            status,
            created_at: t,
            updated_at: t,
        }
    }

    fn submission(is_correct: bool, time_taken_secs: f64) -> AnswerSubmission {
        AnswerSubmission {
            question_id: QuestionId::new(3),
            selected_option_id: Some(OptionId::new(12)),
            is_correct,
            time_taken_secs,
        }
    }

    #[tokio::test]
    async fn fast_correct_answer_persists_fact_and_transition() {
        let mut sessions = MockSessionRepo::new();
        let mut clock = MockClockPort::new();
        let session_id = SessionId::new(1);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 5, 0).unwrap();

        sessions
            .expect_get()
            .with(eq(session_id))
            .returning(|id| Ok(Some(test_session(id.as_i64(), 2.0, 3, SessionStatus::Active))));
        clock.expect_now().returning(move || now);
        sessions
            .expect_apply_answer()
            .withf(|prior, next, fact| {
                prior.score == 10
                    && next.current_difficulty.value() == 2.25
                    && next.score == 25
                    && fact.difficulty_at_answer.value() == 2.0
                    && fact.is_correct
            })
            .returning(|_, _, _| Ok(()));

        let use_case = SubmitAnswer::new(
            Arc::new(sessions),
            Arc::new(clock),
            AdaptivePolicy::default(),
        );
        let outcome = use_case
            .execute(session_id, submission(true, 3.0))
            .await
            .unwrap();

        assert_eq!(outcome.score_delta, 15);
        assert_eq!(outcome.session.lives, STARTING_LIVES);
        assert_eq!(outcome.session.status, SessionStatus::Active);
    }

    #[tokio::test]
    async fn incorrect_answer_on_last_life_ends_the_game() {
        let mut sessions = MockSessionRepo::new();
        let mut clock = MockClockPort::new();
        let session_id = SessionId::new(1);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 5, 0).unwrap();

        sessions
            .expect_get()
            .returning(|id| Ok(Some(test_session(id.as_i64(), 3.0, 1, SessionStatus::Active))));
        clock.expect_now().returning(move || now);
        sessions
            .expect_apply_answer()
            .withf(|prior, next, fact| {
                prior.status == SessionStatus::Active
                    && next.status == SessionStatus::GameOver
                    && next.lives == 0
                    && !fact.is_correct
            })
            .returning(|_, _, _| Ok(()));

        let use_case = SubmitAnswer::new(
            Arc::new(sessions),
            Arc::new(clock),
            AdaptivePolicy::default(),
        );
        let outcome = use_case
            .execute(session_id, submission(false, 8.0))
            .await
            .unwrap();

        assert_eq!(outcome.score_delta, 0);
        assert_eq!(outcome.session.status, SessionStatus::GameOver);
    }

    #[tokio::test]
    async fn closed_session_rejects_further_answers() {
        let mut sessions = MockSessionRepo::new();
        let mut clock = MockClockPort::new();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 5, 0).unwrap();

        sessions
            .expect_get()
            .returning(|id| Ok(Some(test_session(id.as_i64(), 2.0, 0, SessionStatus::GameOver))));
        clock.expect_now().returning(move || now);
        // No apply_answer call expected.

        let use_case = SubmitAnswer::new(
            Arc::new(sessions),
            Arc::new(clock),
            AdaptivePolicy::default(),
        );
        let err = use_case
            .execute(SessionId::new(1), submission(true, 1.0))
            .await
            .unwrap_err();

        assert!(matches!(err, GameError::SessionClosed(_)));
    }

    #[tokio::test]
    async fn losing_the_write_race_surfaces_the_conflict() {
        use crate::infrastructure::ports::RepoError;

        let mut sessions = MockSessionRepo::new();
        let mut clock = MockClockPort::new();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 5, 0).unwrap();

        sessions
            .expect_get()
            .returning(|id| Ok(Some(test_session(id.as_i64(), 2.0, 1, SessionStatus::Active))));
        clock.expect_now().returning(move || now);
        sessions
            .expect_apply_answer()
            .returning(|_, _, _| Err(RepoError::conflict("session 1 changed since it was read")));

        let use_case = SubmitAnswer::new(
            Arc::new(sessions),
            Arc::new(clock),
            AdaptivePolicy::default(),
        );
        let err = use_case
            .execute(SessionId::new(1), submission(true, 1.0))
            .await
            .unwrap_err();

        assert!(matches!(&err, GameError::Storage(e) if e.is_conflict()));
    }

    #[tokio::test]
    async fn missing_session_is_not_found() {
        let mut sessions = MockSessionRepo::new();
        let clock = MockClockPort::new();
        sessions.expect_get().returning(|_| Ok(None));

        let use_case = SubmitAnswer::new(
            Arc::new(sessions),
            Arc::new(clock),
            AdaptivePolicy::default(),
        );
        let err = use_case
            .execute(SessionId::new(404), submission(true, 1.0))
            .await
            .unwrap_err();

        assert!(matches!(err, GameError::NotFound { entity_type: "Session", .. }));
    }
}
