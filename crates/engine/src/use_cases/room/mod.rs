mod create_room;
mod room_summary;

pub use create_room::CreateRoom;
pub use room_summary::{LeaderboardEntry, RoomSummary, RoomView};
