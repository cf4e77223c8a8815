//! Shared deterministic types for the supervision engine.
//!
//! These types define the wire contract the dashboard reads. They carry no
//! behavior beyond parsing and display, and must serialize identically across runs.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of the supervised agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// No run has been started since process start.
    #[default]
    Idle,
    Running,
    Paused,
    Stopped,
}

impl AgentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress status of a single planned subtask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtaskStatus {
    Pending,
    InProgress,
    Completed,
}

/// How much latitude the caller grants the agent.
///
/// Recorded with the run and surfaced for display only; it never changes
/// control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AutonomyLevel {
    #[default]
    #[serde(rename = "supervised")]
    Supervised,
    #[serde(rename = "semi-auto", alias = "semi_auto")]
    SemiAuto,
    #[serde(rename = "full-auto", alias = "full_auto")]
    FullAuto,
}

impl AutonomyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Supervised => "supervised",
            Self::SemiAuto => "semi-auto",
            Self::FullAuto => "full-auto",
        }
    }
}

impl fmt::Display for AutonomyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AutonomyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supervised" => Ok(Self::Supervised),
            "semi-auto" | "semi_auto" | "semiauto" => Ok(Self::SemiAuto),
            "full-auto" | "full_auto" | "fullauto" => Ok(Self::FullAuto),
            other => Err(format!(
                "unknown autonomy level '{}' (expected supervised, semi-auto or full-auto)",
                other
            )),
        }
    }
}

/// One unit of the agent's plan.
///
/// `progress == 100` if and only if `status == Completed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    /// Stable 1-based position in the plan.
    pub id: u32,
    #[serde(rename = "task")]
    pub description: String,
    pub status: SubtaskStatus,
    /// Percent complete, `0..=100`.
    pub progress: u8,
}

impl Subtask {
    pub fn pending(id: u32, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            status: SubtaskStatus::Pending,
            progress: 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == SubtaskStatus::Completed
    }
}

/// A single audit record of something the agent or its supervisor did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub details: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autonomy_uses_dashboard_spelling_on_the_wire() {
        let json = serde_json::to_string(&AutonomyLevel::SemiAuto).expect("serialize");
        assert_eq!(json, "\"semi-auto\"");
        let parsed: AutonomyLevel = serde_json::from_str("\"full_auto\"").expect("alias");
        assert_eq!(parsed, AutonomyLevel::FullAuto);
    }

    #[test]
    fn autonomy_from_str_rejects_unknown_levels() {
        assert_eq!(
            " Semi-Auto ".parse::<AutonomyLevel>(),
            Ok(AutonomyLevel::SemiAuto)
        );
        assert!("reckless".parse::<AutonomyLevel>().is_err());
    }

    #[test]
    fn subtask_serializes_description_as_task() {
        let subtask = Subtask::pending(2, "Gather necessary resources");
        let value = serde_json::to_value(&subtask).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "id": 2,
                "task": "Gather necessary resources",
                "status": "pending",
                "progress": 0
            })
        );
    }
}
