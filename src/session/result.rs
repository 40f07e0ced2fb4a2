use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Answer, Feedback, QuestionSelector};

/// Everything the results screen and the history store need from a
/// finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub session_id: Uuid,
    pub title: String,
    pub selector: QuestionSelector,
    pub score: usize,
    pub total: usize,
    pub elapsed_secs: u64,
    pub answers: Vec<Answer>,
    pub feedback: Vec<Feedback>,
    /// True when the countdown ran out rather than the user submitting.
    pub timed_out: bool,
}

impl SessionResult {
    pub fn unanswered(&self) -> usize {
        self.answers.iter().filter(|a| !a.is_answered()).count()
    }

    pub fn percentage(&self) -> f64 {
        if self.total > 0 {
            (self.score as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// JSON form handed to the results renderer.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
