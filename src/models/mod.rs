mod answer;
mod question;

pub use answer::{Answer, Feedback, Sentiment};
pub use question::{Difficulty, Question, QuestionSelector};
