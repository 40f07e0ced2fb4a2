use std::fmt;

use serde::{Deserialize, Serialize};

/// A multiple-choice question, validated and immutable for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: usize,
    pub explanation: Option<String>,
    /// Supporting material shown with the prompt, e.g. a code snippet.
    pub context: Option<String>,
    pub references: Vec<String>,
}

impl Question {
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_option
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which questions to fetch. Kept with the result so a new attempt can
/// re-fetch the same set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSelector {
    pub topic: String,
    pub subtopic: Option<String>,
    pub difficulty: Difficulty,
}

impl QuestionSelector {
    pub fn new(topic: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            topic: topic.into(),
            subtopic: None,
            difficulty,
        }
    }

    pub fn with_subtopic(mut self, subtopic: impl Into<String>) -> Self {
        self.subtopic = Some(subtopic.into());
        self
    }

    /// Title used when the caller does not provide one.
    pub fn default_title(&self) -> String {
        match &self.subtopic {
            Some(subtopic) => format!("{} / {} ({})", self.topic, subtopic, self.difficulty),
            None => format!("{} ({})", self.topic, self.difficulty),
        }
    }
}
