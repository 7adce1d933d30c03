mod ensure_player;

pub use ensure_player::EnsurePlayer;
