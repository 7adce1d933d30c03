//! SQLite-backed session storage.
//!
//! `apply_answer` is the one place the answer-fact insert and the session
//! progress update meet; they share a transaction so neither is ever
//! visible without the other, and the update only lands if the row still
//! matches the state the caller read.

use async_trait::async_trait;
use quizforge_domain::{
    GameSession, PlayerAnswer, PlayerId, RoomId, SessionDifficulty, SessionId, SessionStatus,
    STARTING_LIVES,
};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::sync::Arc;

use super::parse_timestamp;
use crate::infrastructure::ports::{ClockPort, RepoError, SessionRepo};

pub struct SqliteSessionRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteSessionRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }
}

const SESSION_COLUMNS: &str =
    "id, player_id, room_id, current_difficulty, score, lives, status, created_at, updated_at";

fn session_from_row(row: &SqliteRow) -> Result<GameSession, RepoError> {
    Ok(GameSession {
        id: SessionId::new(row.get("id")),
        player_id: PlayerId::new(row.get("player_id")),
        room_id: row.get::<Option<i64>, _>("room_id").map(RoomId::new),
        current_difficulty: SessionDifficulty::new(row.get("current_difficulty"))
            .map_err(|e| RepoError::serialization(e.to_string()))?,
        score: row.get::<i64, _>("score") as u32,
        lives: row.get::<i64, _>("lives") as u8,
        status: SessionStatus::parse(&row.get::<String, _>("status"))
            .map_err(|e| RepoError::serialization(e.to_string()))?,
        created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
        updated_at: parse_timestamp(&row.get::<String, _>("updated_at"))?,
    })
}

#[async_trait]
impl SessionRepo for SqliteSessionRepo {
    async fn start(
        &self,
        player_id: PlayerId,
        difficulty: SessionDifficulty,
        room_id: Option<RoomId>,
    ) -> Result<GameSession, RepoError> {
        let now = self.clock.now();
        let result = sqlx::query(
            r#"
            INSERT INTO game_sessions
                (player_id, room_id, current_difficulty, score, lives, status, created_at, updated_at)
            VALUES (?, ?, ?, 0, ?, ?, ?, ?)
            "#,
        )
        .bind(player_id.as_i64())
        .bind(room_id.map(|r| r.as_i64()))
        .bind(difficulty.value())
        .bind(STARTING_LIVES as i64)
        .bind(SessionStatus::Active.as_str())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("session_start", e))?;

        Ok(GameSession {
            id: SessionId::new(result.last_insert_rowid()),
            player_id,
            room_id,
            current_difficulty: difficulty,
            score: 0,
            lives: STARTING_LIVES,
            status: SessionStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get(&self, id: SessionId) -> Result<Option<GameSession>, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM game_sessions WHERE id = ?"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("session_get", e))?;

        row.as_ref().map(session_from_row).transpose()
    }

    async fn apply_answer(
        &self,
        prior: &GameSession,
        next: &GameSession,
        fact: &PlayerAnswer,
    ) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("session_apply_answer", e))?;

        sqlx::query(
            r#"
            INSERT INTO player_answers
                (session_id, question_id, selected_option_id, is_correct,
                 time_taken_secs, difficulty_at_answer, answered_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(fact.session_id.as_i64())
        .bind(fact.question_id.as_i64())
        .bind(fact.selected_option_id.map(|o| o.as_i64()))
        .bind(fact.is_correct)
        .bind(fact.time_taken_secs)
        .bind(fact.difficulty_at_answer.value())
        .bind(fact.answered_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("answer_append", e))?;

        // Guarded against the caller's read: a concurrent submit that
        // already advanced the row (or finished the game) makes this
        // match nothing, and the transaction rolls back.
        let result = sqlx::query(
            r#"
            UPDATE game_sessions
            SET current_difficulty = ?, score = ?, lives = ?, status = ?, updated_at = ?
            WHERE id = ? AND status = ? AND score = ? AND lives = ?
            "#,
        )
        .bind(next.current_difficulty.value())
        .bind(next.score as i64)
        .bind(next.lives as i64)
        .bind(next.status.as_str())
        .bind(next.updated_at.to_rfc3339())
        .bind(next.id.as_i64())
        .bind(prior.status.as_str())
        .bind(prior.score as i64)
        .bind(prior.lives as i64)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("session_update", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::conflict(format!(
                "session {} changed since it was read",
                next.id
            )));
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("session_apply_answer", e))
    }

    async fn list_for_room(&self, room_id: RoomId) -> Result<Vec<GameSession>, RepoError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {SESSION_COLUMNS} FROM game_sessions
            WHERE room_id = ?
            ORDER BY score DESC, updated_at ASC
            "#
        ))
        .bind(room_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("session_list_for_room", e))?;

        rows.iter().map(session_from_row).collect()
    }
}
