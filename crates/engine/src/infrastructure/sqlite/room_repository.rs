//! SQLite persistence for game rooms.

use std::sync::Arc;

use async_trait::async_trait;
use quizforge_domain::{GameRoom, PlayerId, RoomCode, RoomId};
use sqlx::{Row, SqlitePool};

use super::parse_timestamp;
use crate::infrastructure::ports::{ClockPort, RepoError, RoomRepo};

pub struct SqliteRoomRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteRoomRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }
}

fn room_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<GameRoom, RepoError> {
    Ok(GameRoom {
        id: RoomId::new(row.get("id")),
        code: RoomCode::parse(&row.get::<String, _>("code"))
            .map_err(|e| RepoError::serialization(e.to_string()))?,
        host_player_id: PlayerId::new(row.get("host_player_id")),
        created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
    })
}

#[async_trait]
impl RoomRepo for SqliteRoomRepo {
    async fn create(&self, code: &RoomCode, host: PlayerId) -> Result<GameRoom, RepoError> {
        let now = self.clock.now();

        let result = sqlx::query(
            "INSERT INTO game_rooms (code, host_player_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(code.as_str())
        .bind(host.as_i64())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await;

        let result = match result {
            Ok(r) => r,
            // Surface code collisions as constraint violations so callers
            // can regenerate and retry.
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(RepoError::constraint(format!(
                    "room code already exists: {code}"
                )));
            }
            Err(e) => return Err(RepoError::database("room_create", e)),
        };

        Ok(GameRoom {
            id: RoomId::new(result.last_insert_rowid()),
            code: code.clone(),
            host_player_id: host,
            created_at: now,
        })
    }

    async fn find_by_code(&self, code: &RoomCode) -> Result<Option<GameRoom>, RepoError> {
        let row = sqlx::query(
            "SELECT id, code, host_player_id, created_at FROM game_rooms WHERE code = ?",
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("room_find", e))?;

        row.as_ref().map(room_from_row).transpose()
    }
}
