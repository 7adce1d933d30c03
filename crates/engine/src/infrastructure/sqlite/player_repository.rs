//! SQLite-backed player storage.

use async_trait::async_trait;
use quizforge_domain::{Player, PlayerId};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::sync::Arc;

use super::parse_timestamp;
use crate::infrastructure::ports::{ClockPort, PlayerRepo, RepoError};

pub struct SqlitePlayerRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqlitePlayerRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }
}

fn player_from_row(row: &SqliteRow) -> Result<Player, RepoError> {
    Ok(Player {
        id: PlayerId::new(row.get("id")),
        name: row.get("name"),
        age: row.get::<i64, _>("age") as u32,
        created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
    })
}

#[async_trait]
impl PlayerRepo for SqlitePlayerRepo {
    async fn get(&self, id: PlayerId) -> Result<Option<Player>, RepoError> {
        let row = sqlx::query("SELECT id, name, age, created_at FROM players WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("player_get", e))?;

        row.as_ref().map(player_from_row).transpose()
    }

    async fn find_by_name_age(&self, name: &str, age: u32) -> Result<Option<Player>, RepoError> {
        let row = sqlx::query(
            "SELECT id, name, age, created_at FROM players WHERE name = ? AND age = ?",
        )
        .bind(name)
        .bind(age as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("player_find", e))?;

        row.as_ref().map(player_from_row).transpose()
    }

    async fn create(&self, name: &str, age: u32) -> Result<Player, RepoError> {
        let now = self.clock.now();
        let result = sqlx::query("INSERT INTO players (name, age, created_at) VALUES (?, ?, ?)")
            .bind(name)
            .bind(age as i64)
            .bind(now.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("player_create", e))?;

        Ok(Player {
            id: PlayerId::new(result.last_insert_rowid()),
            name: name.to_string(),
            age,
            created_at: now,
        })
    }
}
