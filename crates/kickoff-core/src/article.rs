//! Articles staged for processing and the results of a trigger run.

use serde::{Deserialize, Serialize};

/// A staged article document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRef {
    /// Document ID (last path segment). This is what gets published.
    pub id: String,
    /// Full resource name, e.g.
    /// `projects/p/databases/(default)/documents/staging_articles/abc`.
    pub name: String,
}

impl ArticleRef {
    /// Build from a full document resource name; the id is its last segment.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let id = match name.rsplit_once('/') {
            Some((_, id)) => id.to_owned(),
            None => name.clone(),
        };
        Self { id, name }
    }
}

/// Outcome counts of one trigger run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSummary {
    /// Articles published and marked as queued
    pub processed: usize,
    /// Articles whose publish or status update failed
    pub errors: usize,
}

impl TriggerSummary {
    /// Human readable summary returned to the caller.
    ///
    /// ```
    /// use kickoff_core::TriggerSummary;
    ///
    /// let summary = TriggerSummary { processed: 3, errors: 1 };
    /// assert_eq!(
    ///     summary.message(),
    ///     "Workflow started. Queued 3 articles for processing. Failed to queue 1 articles."
    /// );
    /// ```
    pub fn message(&self) -> String {
        let mut message = format!(
            "Workflow started. Queued {} articles for processing.",
            self.processed
        );
        if self.errors > 0 {
            message.push_str(&format!(" Failed to queue {} articles.", self.errors));
        }
        message
    }
}

/// Success body of `POST /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerResponse {
    pub status: String,
    pub message: String,
    pub processed: usize,
    pub errors: usize,
}

impl From<TriggerSummary> for TriggerResponse {
    fn from(summary: TriggerSummary) -> Self {
        Self {
            status: "success".to_owned(),
            message: summary.message(),
            processed: summary.processed,
            errors: summary.errors,
        }
    }
}

/// Failure body of `POST /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_owned(),
            message: message.into(),
        }
    }
}
