//! Error types shared across the crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while fetching or validating questions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed question data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid question {id:?}: {reason}")]
    Invalid { id: String, reason: String },
    #[error("question service returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("question service error: {0}")]
    Server(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors raised by the session controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions to start a session with")]
    Empty,
    #[error("session is no longer active")]
    Inactive,
    #[error("option {index} is out of range for a question with {options} options")]
    OptionOutOfRange { index: usize, options: usize },
}

/// Errors raised while reading or writing test history.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HistoryError {
    #[error("failed to access history file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("history file is corrupt: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Top-level error for running the application.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}
