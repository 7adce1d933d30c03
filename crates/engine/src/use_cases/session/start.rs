//! Start session use case.

use std::sync::Arc;

use quizforge_domain::{GameSession, PlayerId, RoomId, SessionDifficulty};

use crate::infrastructure::ports::{PlayerRepo, SessionRepo};
use crate::use_cases::GameError;

/// Opens a new game session for an existing player.
pub struct StartSession {
    players: Arc<dyn PlayerRepo>,
    sessions: Arc<dyn SessionRepo>,
}

impl StartSession {
    pub fn new(players: Arc<dyn PlayerRepo>, sessions: Arc<dyn SessionRepo>) -> Self {
        Self { players, sessions }
    }

    pub async fn execute(
        &self,
        player_id: PlayerId,
        starting_difficulty: f64,
        room_id: Option<RoomId>,
    ) -> Result<GameSession, GameError> {
        let difficulty = SessionDifficulty::new(starting_difficulty)?;

        if self.players.get(player_id).await?.is_none() {
            return Err(GameError::not_found("Player", player_id));
        }

        let session = self.sessions.start(player_id, difficulty, room_id).await?;
        tracing::info!(
            session_id = %session.id,
            player_id = %player_id,
            difficulty = %difficulty,
            "Session started"
        );
        Ok(session)
    }
}
