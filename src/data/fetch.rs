//! Fetch bookkeeping: how a finished fetch is classified, and which
//! in-flight request is allowed to land.

use std::fmt;

/// Identifies one issued fetch. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out request ids and accepts only the newest one's response.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new id, superseding every earlier one.
    pub fn issue(&mut self) -> RequestId {
        self.latest += 1;
        RequestId(self.latest)
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        id.0 == self.latest
    }
}

/// How a finished fetch turned out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    Loaded(T),
    /// The request succeeded but returned nothing.
    Empty,
    Failed(String),
}

impl<T> FetchOutcome<Vec<T>> {
    /// Classify a finished list fetch. Empty lists are not errors.
    pub fn from_list<E: fmt::Display>(outcome: Result<Vec<T>, E>) -> Self {
        match outcome {
            Ok(items) if items.is_empty() => FetchOutcome::Empty,
            Ok(items) => FetchOutcome::Loaded(items),
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_request_is_current() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue();
        let second = tracker.issue();

        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
        assert!(second > first);
    }

    #[test]
    fn test_from_list_classification() {
        let empty: FetchOutcome<Vec<u8>> = FetchOutcome::from_list(Ok::<_, String>(Vec::new()));
        assert_eq!(empty, FetchOutcome::Empty);

        let loaded = FetchOutcome::from_list(Ok::<_, String>(vec![1, 2]));
        assert_eq!(loaded, FetchOutcome::Loaded(vec![1, 2]));

        let failed: FetchOutcome<Vec<u8>> = FetchOutcome::from_list(Err("offline"));
        assert_eq!(failed, FetchOutcome::Failed("offline".to_string()));
    }
}
