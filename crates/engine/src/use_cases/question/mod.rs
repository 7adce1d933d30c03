mod next_question;

pub use next_question::{NextQuestion, NextQuestionOutcome, UnavailableReason};
