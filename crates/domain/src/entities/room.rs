//! Game room entity and join codes.
//!
//! Rooms group sessions for a polled leaderboard view. Join codes avoid
//! confusable characters (I, O, 0, 1) so they survive being read aloud.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DomainError, PlayerId, RoomId};

/// Characters a room code may contain.
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of every room code.
pub const ROOM_CODE_LEN: usize = 6;

/// A validated 6-character room join code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Parse user input, uppercasing before validation.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let code = raw.trim().to_ascii_uppercase();
        if code.len() != ROOM_CODE_LEN {
            return Err(DomainError::validation(format!(
                "Room code must be {ROOM_CODE_LEN} characters"
            )));
        }
        if !code.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b)) {
            return Err(DomainError::validation(
                "Room code contains invalid characters",
            ));
        }
        Ok(Self(code))
    }

    /// Generate a code from an injected index picker.
    ///
    /// The picker receives the alphabet size and returns an index into it;
    /// the engine supplies randomness so the domain stays deterministic.
    pub fn generate(mut pick: impl FnMut(usize) -> usize) -> Self {
        let code: String = (0..ROOM_CODE_LEN)
            .map(|_| ROOM_CODE_ALPHABET[pick(ROOM_CODE_ALPHABET.len()) % ROOM_CODE_ALPHABET.len()] as char)
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A multi-player room. Sessions reference it via their optional room id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRoom {
    pub id: RoomId,
    pub code: RoomCode,
    pub host_player_id: PlayerId,
    pub created_at: DateTime<Utc>,
}
