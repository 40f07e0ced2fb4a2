//! Finished-test records and the dashboard aggregates built from them.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::HistoryError;
use crate::models::QuestionSelector;
use crate::session::SessionResult;

/// One finished attempt as stored for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    pub session_id: Uuid,
    pub user_id: Option<String>,
    pub title: String,
    pub selector: QuestionSelector,
    pub score: usize,
    pub total: usize,
    pub unanswered: usize,
    pub elapsed_secs: u64,
    pub timed_out: bool,
    pub completed_at: DateTime<Utc>,
}

impl TestRecord {
    pub fn from_result(
        result: &SessionResult,
        user_id: Option<String>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: result.session_id,
            user_id,
            title: result.title.clone(),
            selector: result.selector.clone(),
            score: result.score,
            total: result.total,
            unanswered: result.unanswered(),
            elapsed_secs: result.elapsed_secs,
            timed_out: result.timed_out,
            completed_at,
        }
    }

    pub fn percentage(&self) -> f64 {
        if self.total > 0 {
            (self.score as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Aggregates shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub tests_taken: usize,
    pub questions_seen: usize,
    pub correct: usize,
    pub unanswered: usize,
    pub average_percentage: f64,
    pub best_percentage: f64,
    pub total_time_secs: u64,
}

/// Test history, optionally mirrored to a JSON file.
#[derive(Debug, Default)]
pub struct HistoryStore {
    path: Option<PathBuf>,
    records: Vec<TestRecord>,
}

impl HistoryStore {
    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store. A missing file starts an empty history.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, HistoryError> {
        let path = path.as_ref().to_path_buf();
        let records = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(HistoryError::Io { path, source }),
        };

        debug!(path = %path.display(), records = records.len(), "History loaded");
        Ok(Self {
            path: Some(path),
            records,
        })
    }

    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }

    /// Append a record and persist. The record is kept in memory even if
    /// writing the file fails.
    pub fn push(&mut self, record: TestRecord) -> Result<(), HistoryError> {
        self.records.push(record);
        self.save()
    }

    /// Aggregate over one user's records. `None` selects the attempts made
    /// while signed out.
    pub fn stats(&self, user: Option<&str>) -> DashboardStats {
        let records: Vec<&TestRecord> = self
            .records
            .iter()
            .filter(|r| r.user_id.as_deref() == user)
            .collect();

        if records.is_empty() {
            return DashboardStats::default();
        }

        let percentages: Vec<f64> = records.iter().map(|r| r.percentage()).collect();

        DashboardStats {
            tests_taken: records.len(),
            questions_seen: records.iter().map(|r| r.total).sum(),
            correct: records.iter().map(|r| r.score).sum(),
            unanswered: records.iter().map(|r| r.unanswered).sum(),
            average_percentage: percentages.iter().sum::<f64>() / percentages.len() as f64,
            best_percentage: percentages.iter().copied().fold(0.0, f64::max),
            total_time_secs: records.iter().map(|r| r.elapsed_secs).sum(),
        }
    }

    fn save(&self) -> Result<(), HistoryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(path, json).map_err(|source| HistoryError::Io {
            path: path.clone(),
            source,
        })
    }
}
