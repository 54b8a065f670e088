use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::gesture::GestureName;

/// Lines shown on the overlay by default.
pub const DEFAULT_LOG_LINES: usize = 5;

// ---------------------------------------------------------------------------
// AuditRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Dispatched,
    /// The action matched no dispatch rule. Nothing was sent to the OS.
    Unhandled,
    Failed { reason: String },
}

/// One dispatch attempt, as shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub at: DateTime<Local>,
    pub gesture: GestureName,
    pub action: String,
    pub outcome: DispatchOutcome,
}

impl fmt::Display for AuditRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - Gesture Triggered - {} - function {}",
            self.at.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.gesture,
            self.action
        )?;
        match &self.outcome {
            DispatchOutcome::Dispatched => Ok(()),
            DispatchOutcome::Unhandled => f.write_str(" (unhandled)"),
            DispatchOutcome::Failed { reason } => write!(f, " (failed: {reason})"),
        }
    }
}

// ---------------------------------------------------------------------------
// AuditLog
// ---------------------------------------------------------------------------

/// Fixed-capacity ring of the most recent records. Oldest entries fall off.
#[derive(Debug, Clone)]
pub struct AuditLog {
    records: VecDeque<AuditRecord>,
    capacity: usize,
    total: u64,
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_LINES)
    }
}

impl AuditLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
            total: 0,
        }
    }

    pub fn push(&mut self, record: AuditRecord) {
        self.total += 1;
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Retained records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &AuditRecord> {
        self.records.iter()
    }

    pub fn latest(&self) -> Option<&AuditRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records ever pushed, including those that have fallen off.
    pub fn total(&self) -> u64 {
        self.total
    }
}
