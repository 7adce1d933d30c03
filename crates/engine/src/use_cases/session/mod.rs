mod start;
mod submit_answer;

pub use start::StartSession;
pub use submit_answer::{AnswerOutcome, AnswerSubmission, SubmitAnswer};
