//! Ensure player use case - registers a player or returns the existing row.

use std::sync::Arc;

use quizforge_domain::Player;

use crate::infrastructure::ports::PlayerRepo;
use crate::use_cases::GameError;

/// Finds a player by the identifying (name, age) pair, creating one when
/// none exists. Repeat visitors keep their original row and id.
pub struct EnsurePlayer {
    players: Arc<dyn PlayerRepo>,
}

impl EnsurePlayer {
    pub fn new(players: Arc<dyn PlayerRepo>) -> Self {
        Self { players }
    }

    pub async fn execute(&self, name: &str, age: u32) -> Result<Player, GameError> {
        Player::validate_identity(name, age)?;
        let name = name.trim();

        if let Some(existing) = self.players.find_by_name_age(name, age).await? {
            tracing::debug!(player_id = %existing.id, "Returning player recognized");
            return Ok(existing);
        }

        let created = self.players.create(name, age).await?;
        tracing::info!(player_id = %created.id, "Player registered");
        Ok(created)
    }
}
