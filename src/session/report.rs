//! Session report types

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::TerminationReason;

/// Summary of one amendment session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    // --- Identity ---
    /// Unique session ID
    pub session_id: String,

    // --- Timestamps ---
    /// When the session started scanning
    pub started_at: DateTime<Utc>,

    /// When the session terminated
    pub finished_at: DateTime<Utc>,

    // --- Activity ---
    /// Number of completed scans
    pub scans: u64,

    /// Number of operator prompts answered
    pub prompts: u64,

    /// Interactions the operator accepted
    pub accepted: u64,

    /// Interactions the operator rejected
    pub rejected: u64,

    /// Interactions of the final scan that were never adjudicated
    pub unresolved: usize,

    // --- Outcome ---
    /// Where the amended policy was written, if anything changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<PathBuf>,

    /// Why the session ended
    pub reason: TerminationReason,
}

impl SessionReport {
    /// Create an empty report for a session that started now
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            started_at: now,
            finished_at: now,
            scans: 0,
            prompts: 0,
            accepted: 0,
            rejected: 0,
            unresolved: 0,
            saved_to: None,
            reason: TerminationReason::Timeout,
        }
    }

    /// Whether the policy was written back
    pub fn persisted(&self) -> bool {
        self.saved_to.is_some()
    }

    /// Wall-clock duration of the session
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report() {
        let report = SessionReport::new("abc");
        assert_eq!(report.session_id, "abc");
        assert!(!report.persisted());
        assert_eq!(report.duration(), chrono::Duration::zero());
    }

    #[test]
    fn test_report_serialization_skips_missing_path() {
        let report = SessionReport::new("abc");
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("saved_to").is_none());
        assert_eq!(json["reason"], "timeout");
    }
}
