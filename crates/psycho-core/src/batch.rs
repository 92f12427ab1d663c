//! Per-item failure isolation for batch operations.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One item of a batch that could not be computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub item_id: String,
    pub reason: String,
}

impl ItemFailure {
    pub fn new(item_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            reason: reason.into(),
        }
    }
}

impl From<Error> for ItemFailure {
    fn from(e: Error) -> Self {
        match e {
            Error::PartialComputation { item, reason } => ItemFailure::new(item, reason),
            Error::NotFound { ref id, .. } => ItemFailure::new(id.clone(), e.to_string()),
            other => ItemFailure::new("unknown", other.to_string()),
        }
    }
}

/// Successful results plus the failures encountered along the way
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome<T> {
    pub results: Vec<T>,
    pub failures: Vec<ItemFailure>,
}

impl<T> BatchOutcome<T> {
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Record one item outcome
    pub fn push(&mut self, outcome: Result<T, Error>) {
        match outcome {
            Ok(value) => self.results.push(value),
            Err(e) => self.failures.push(e.into()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl<T> Default for BatchOutcome<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<Result<T, Error>> for BatchOutcome<T> {
    fn from_iter<I: IntoIterator<Item = Result<T, Error>>>(iter: I) -> Self {
        let mut out = Self::new();
        for item in iter {
            out.push(item);
        }
        out
    }
}
