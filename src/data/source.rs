use async_trait::async_trait;

use crate::error::LoadError;
use crate::models::{Question, QuestionSelector};

/// Supplies the ordered questions for a selector.
///
/// An empty `Ok` list means "nothing matched" and is not an error.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn fetch(&self, selector: &QuestionSelector) -> Result<Vec<Question>, LoadError>;

    /// Short human-readable origin, used in logs and the loading screen.
    fn describe(&self) -> String;
}
