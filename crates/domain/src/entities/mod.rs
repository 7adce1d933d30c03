mod answer;
mod player;
mod question;
mod room;
mod session;

pub use answer::PlayerAnswer;
pub use player::Player;
pub use question::{
    validate_option_set, AnswerOption, Explanation, NewOption, NewQuestion, Question,
    OPTIONS_PER_QUESTION,
};
pub use room::{GameRoom, RoomCode, ROOM_CODE_ALPHABET, ROOM_CODE_LEN};
pub use session::{AnswerTransition, GameSession, SessionStatus, STARTING_LIVES};
