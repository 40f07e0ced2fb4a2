//! Question sources and fetch bookkeeping.

mod fetch;
mod loader;
mod remote;
mod schema;
mod source;

pub use fetch::{FetchOutcome, RequestId, RequestTracker};
pub use loader::FileQuestionSource;
pub use remote::RemoteQuestionSource;
pub use schema::{parse_questions, QuestionDto};
pub use source::QuestionSource;
