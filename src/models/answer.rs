use serde::{Deserialize, Serialize};

/// The user's response (or lack of one) to a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    /// None until the user picks an option.
    pub selected: Option<usize>,
    pub is_correct: bool,
    /// Seconds the question was on screen.
    pub time_spent_secs: u64,
}

impl Answer {
    pub fn unanswered(question_id: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            selected: None,
            is_correct: false,
            time_spent_secs: 0,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.selected.is_some()
    }
}

/// Non-scoring sentiment a user can attach to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
}

/// Per-question feedback slot, index-aligned with the questions.
pub type Feedback = Option<Sentiment>;
