use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::error::LoadError;
use crate::models::{Question, QuestionSelector};

use super::schema::parse_questions;
use super::source::QuestionSource;

/// Serves questions from a local JSON file. The whole file is one test, so
/// the selector only labels it.
#[derive(Debug, Clone)]
pub struct FileQuestionSource {
    path: PathBuf,
}

impl FileQuestionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl QuestionSource for FileQuestionSource {
    async fn fetch(&self, selector: &QuestionSelector) -> Result<Vec<Question>, LoadError> {
        debug!(path = %self.path.display(), topic = %selector.topic, "Reading questions file");
        let path = self.path.clone();
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LoadError::Io { path, source })?;
        parse_questions(&content)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
