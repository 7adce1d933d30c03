//! Read side of the append-only answer log.

use async_trait::async_trait;
use quizforge_domain::{OptionId, PlayerAnswer, QuestionId, SessionDifficulty, SessionId};
use sqlx::{Row, SqlitePool};

use super::parse_timestamp;
use crate::infrastructure::ports::{AnswerRepo, RepoError};

pub struct SqliteAnswerRepo {
    pool: SqlitePool,
}

impl SqliteAnswerRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnswerRepo for SqliteAnswerRepo {
    async fn list_for_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<PlayerAnswer>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT session_id, question_id, selected_option_id, is_correct,
                   time_taken_secs, difficulty_at_answer, answered_at
            FROM player_answers
            WHERE session_id = ?
            ORDER BY id
            "#,
        )
        .bind(session_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("answer_list", e))?;

        rows.iter()
            .map(|row| {
                Ok(PlayerAnswer {
                    session_id: SessionId::new(row.get("session_id")),
                    question_id: QuestionId::new(row.get("question_id")),
                    selected_option_id: row
                        .get::<Option<i64>, _>("selected_option_id")
                        .map(OptionId::new),
                    is_correct: row.get("is_correct"),
                    time_taken_secs: row.get("time_taken_secs"),
                    difficulty_at_answer: SessionDifficulty::new(row.get("difficulty_at_answer"))
                        .map_err(|e| RepoError::serialization(e.to_string()))?,
                    answered_at: parse_timestamp(&row.get::<String, _>("answered_at"))?,
                })
            })
            .collect()
    }
}
