//! Append-only audit trail of agent state transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::types::ActionLogEntry;

/// Ordered, append-only sequence of [`ActionLogEntry`] records.
///
/// Insertion order is the order in which the supervisor's lock was taken, so
/// the log is a valid linearization of every state change in a run. Entries
/// are never edited or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionLog {
    entries: Vec<ActionLogEntry>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record stamped with `now`.
    pub fn record(
        &mut self,
        now: DateTime<Utc>,
        action: impl Into<String>,
        details: impl Into<String>,
    ) {
        self.entries.push(ActionLogEntry {
            timestamp: now,
            action: action.into(),
            details: details.into(),
        });
    }

    pub fn entries(&self) -> &[ActionLogEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&ActionLogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Actions in insertion order (handy for assertions and CLI output).
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.action.as_str())
    }
}
