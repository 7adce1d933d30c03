//! Room summary use case - the polled leaderboard view.

use std::sync::Arc;

use quizforge_domain::{GameRoom, GameSession, PlayerId, RoomCode};

use crate::infrastructure::ports::{PlayerRepo, RoomRepo, SessionRepo};
use crate::use_cases::GameError;

/// One leaderboard row, ordered best score first.
#[derive(Debug, Clone)]
pub struct LeaderboardEntry {
    pub player_id: PlayerId,
    pub player_name: String,
    pub score: u32,
    pub lives: u8,
    pub status: quizforge_domain::SessionStatus,
}

/// A room with its current standings.
#[derive(Debug, Clone)]
pub struct RoomView {
    pub room: GameRoom,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Resolves a room code to the room and its session leaderboard.
pub struct RoomSummary {
    rooms: Arc<dyn RoomRepo>,
    sessions: Arc<dyn SessionRepo>,
    players: Arc<dyn PlayerRepo>,
}

impl RoomSummary {
    pub fn new(
        rooms: Arc<dyn RoomRepo>,
        sessions: Arc<dyn SessionRepo>,
        players: Arc<dyn PlayerRepo>,
    ) -> Self {
        Self {
            rooms,
            sessions,
            players,
        }
    }

    pub async fn execute(&self, raw_code: &str) -> Result<RoomView, GameError> {
        let code = RoomCode::parse(raw_code)?;
        let room = self
            .rooms
            .find_by_code(&code)
            .await?
            .ok_or_else(|| GameError::not_found("Room", &code))?;

        // Already ordered by score descending by the store.
        let sessions = self.sessions.list_for_room(room.id).await?;

        let mut leaderboard = Vec::with_capacity(sessions.len());
        for session in sessions {
            leaderboard.push(self.entry_for(session).await?);
        }

        Ok(RoomView { room, leaderboard })
    }

    async fn entry_for(&self, session: GameSession) -> Result<LeaderboardEntry, GameError> {
        let player_name = self
            .players
            .get(session.player_id)
            .await?
            .map(|p| p.name)
            // A session referencing a vanished player still renders a row.
            .unwrap_or_else(|| "(unknown)".to_string());

        Ok(LeaderboardEntry {
            player_id: session.player_id,
            player_name,
            score: session.score,
            lives: session.lives,
            status: session.status,
        })
    }
}
