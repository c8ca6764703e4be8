//! Black-box audit log: append-only ring of critical safety events for
//! post-incident analysis, newest first, capped.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::errors::Result;

/// Event severity as recorded in the black box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditLevel {
    /// Operational bookkeeping (calibration, simulation toggles).
    Info,
    /// Elevated risk level observed.
    Medium,
    /// High risk level observed.
    High,
    /// Lockdown-grade event.
    Critical,
}

/// One recorded safety event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Wall-clock time of the event.
    pub timestamp: DateTime<Utc>,
    /// Event severity.
    pub level: AuditLevel,
    /// Action taken by the system.
    pub action_taken: String,
    /// Drift score at the time, if an evaluation produced one.
    pub drift_score: Option<f64>,
    /// Root cause as attributed (top feature, operator note, error code).
    pub root_cause: String,
}

/// Capped event ring, newest first.
#[derive(Debug, Clone)]
pub struct AuditLog {
    entries: VecDeque<AuditEntry>,
    cap: usize,
}

impl AuditLog {
    /// Log retaining at most `cap` entries.
    #[must_use]
    pub const fn new(cap: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cap,
        }
    }

    /// Record an event, evicting the oldest entry past the cap.
    pub fn record(
        &mut self,
        level: AuditLevel,
        action_taken: impl Into<String>,
        drift_score: Option<f64>,
        root_cause: impl Into<String>,
    ) {
        self.entries.push_front(AuditEntry {
            timestamp: Utc::now(),
            level,
            action_taken: action_taken.into(),
            drift_score,
            root_cause: root_cause.into(),
        });
        self.entries.truncate(self.cap);
    }

    /// Entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &VecDeque<AuditEntry> {
        &self.entries
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Export all entries as JSON Lines, newest first.
    pub fn to_jsonl(&self) -> Result<String> {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&serde_json::to_string(entry)?);
            out.push('\n');
        }
        Ok(out)
    }
}
