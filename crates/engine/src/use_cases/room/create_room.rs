//! Create room use case with code-collision retry.

use std::sync::Arc;

use quizforge_domain::{GameRoom, PlayerId, RoomCode};
use rand::Rng;

use crate::infrastructure::ports::{PlayerRepo, RoomRepo};
use crate::use_cases::GameError;

/// Upper bound on code regeneration attempts. With a 32-character
/// alphabet and 6 positions, collisions are already vanishingly rare.
const MAX_CODE_ATTEMPTS: usize = 5;

/// Opens a new multi-player room hosted by an existing player.
pub struct CreateRoom {
    rooms: Arc<dyn RoomRepo>,
    players: Arc<dyn PlayerRepo>,
}

impl CreateRoom {
    pub fn new(rooms: Arc<dyn RoomRepo>, players: Arc<dyn PlayerRepo>) -> Self {
        Self { rooms, players }
    }

    pub async fn execute(&self, host: PlayerId) -> Result<GameRoom, GameError> {
        if self.players.get(host).await?.is_none() {
            return Err(GameError::not_found("Player", host));
        }

        let mut last_err = None;
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = RoomCode::generate(|len| rand::thread_rng().gen_range(0..len));
            match self.rooms.create(&code, host).await {
                Ok(room) => {
                    tracing::info!(room_id = %room.id, code = %room.code, "Room created");
                    return Ok(room);
                }
                Err(err) if err.is_constraint_violation() => {
                    tracing::debug!(code = %code, "Room code collision, regenerating");
                    last_err = Some(err);
                }
                Err(err) => return Err(err.into()),
            }
        }

        // Only reachable after MAX_CODE_ATTEMPTS consecutive collisions.
        Err(last_err
            .map(GameError::Storage)
            .unwrap_or_else(|| GameError::Validation("Could not allocate a room code".into())))
    }
}
