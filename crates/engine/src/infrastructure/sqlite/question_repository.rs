//! SQLite-backed question, option, and explanation storage.

use async_trait::async_trait;
use quizforge_domain::{
    AnswerOption, CategoryId, DifficultyLevel, Explanation, NewQuestion, OptionId, Question,
    QuestionId,
};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::sync::Arc;

use super::parse_timestamp;
use crate::infrastructure::ports::{CategoryRepo, ClockPort, QuestionRepo, RepoError};

pub struct SqliteQuestionRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteQuestionRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }
}

const QUESTION_COLUMNS: &str =
    "id, statement, difficulty, category_id, is_ai_generated, admin_verified, is_active, created_at";

fn question_from_row(row: &SqliteRow) -> Result<Question, RepoError> {
    Ok(Question {
        id: QuestionId::new(row.get("id")),
        statement: row.get("statement"),
        difficulty: DifficultyLevel::from_i64(row.get("difficulty"))
            .map_err(|e| RepoError::serialization(e.to_string()))?,
        category_id: CategoryId::new(row.get("category_id")),
        is_ai_generated: row.get("is_ai_generated"),
        admin_verified: row.get("admin_verified"),
        is_active: row.get("is_active"),
        created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
    })
}

#[async_trait]
impl QuestionRepo for SqliteQuestionRepo {
    async fn find_verified_latest(
        &self,
        category_id: CategoryId,
        difficulty: DifficultyLevel,
    ) -> Result<Option<Question>, RepoError> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {QUESTION_COLUMNS} FROM questions
            WHERE category_id = ? AND difficulty = ?
              AND admin_verified = 1 AND is_active = 1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#
        ))
        .bind(category_id.as_i64())
        .bind(difficulty.as_u8() as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("question_find_verified", e))?;

        row.as_ref().map(question_from_row).transpose()
    }

    async fn get(&self, id: QuestionId) -> Result<Option<Question>, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ?"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("question_get", e))?;

        row.as_ref().map(question_from_row).transpose()
    }

    async fn create_generated(&self, question: &NewQuestion) -> Result<Question, RepoError> {
        question
            .validate()
            .map_err(|e| RepoError::constraint(e.to_string()))?;

        let now = self.clock.now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("question_create", e))?;

        let result = sqlx::query(
            r#"
            INSERT INTO questions
                (statement, difficulty, category_id, is_ai_generated, admin_verified, is_active, created_at)
            VALUES (?, ?, ?, ?, ?, 1, ?)
            "#,
        )
        .bind(&question.statement)
        .bind(question.difficulty.as_u8() as i64)
        .bind(question.category_id.as_i64())
        .bind(question.is_ai_generated)
        .bind(question.admin_verified)
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("question_create", e))?;

        let question_id = result.last_insert_rowid();

        for (position, option) in question.options.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO question_options (question_id, text, is_correct, position)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(question_id)
            .bind(&option.text)
            .bind(option.is_correct)
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("question_create_options", e))?;
        }

        sqlx::query(
            r#"
            INSERT INTO explanations (question_id, correct_text, incorrect_text, source_ref)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(question_id)
        .bind(&question.explanation.correct_text)
        .bind(&question.explanation.incorrect_text)
        .bind(&question.explanation.source_ref)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("question_create_explanation", e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("question_create", e))?;

        Ok(Question {
            id: QuestionId::new(question_id),
            statement: question.statement.clone(),
            difficulty: question.difficulty,
            category_id: question.category_id,
            is_ai_generated: question.is_ai_generated,
            admin_verified: question.admin_verified,
            is_active: true,
            created_at: now,
        })
    }

    async fn options(&self, id: QuestionId) -> Result<Vec<AnswerOption>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT id, question_id, text, is_correct, position
            FROM question_options WHERE question_id = ?
            ORDER BY position
            "#,
        )
        .bind(id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("question_options", e))?;

        Ok(rows
            .iter()
            .map(|row| AnswerOption {
                id: OptionId::new(row.get("id")),
                question_id: QuestionId::new(row.get("question_id")),
                text: row.get("text"),
                is_correct: row.get("is_correct"),
                position: row.get::<i64, _>("position") as u32,
            })
            .collect())
    }

    async fn explanation(&self, id: QuestionId) -> Result<Option<Explanation>, RepoError> {
        let row = sqlx::query(
            "SELECT correct_text, incorrect_text, source_ref FROM explanations WHERE question_id = ?",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("question_explanation", e))?;

        Ok(row.map(|row| Explanation {
            correct_text: row.get("correct_text"),
            incorrect_text: row.get("incorrect_text"),
            source_ref: row.get("source_ref"),
        }))
    }

    async fn set_verified(&self, id: QuestionId, verified: bool) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE questions SET admin_verified = ? WHERE id = ?")
            .bind(verified)
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("question_set_verified", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Question", id));
        }
        Ok(())
    }
}

pub struct SqliteCategoryRepo {
    pool: SqlitePool,
}

impl SqliteCategoryRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepo for SqliteCategoryRepo {
    async fn name(&self, id: CategoryId) -> Result<Option<String>, RepoError> {
        let row = sqlx::query("SELECT name FROM categories WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("category_name", e))?;

        Ok(row.map(|row| row.get("name")))
    }
}
