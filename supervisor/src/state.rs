//! The single mutable record owned by the supervisor.
//!
//! Every transition here is a plain synchronous method: callers hold the
//! supervisor's lock for the duration, which is what makes each
//! (mutation, log append) pair observably atomic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action_log::ActionLog;
use crate::core::planner::{PlanCategory, classify, plan_for};
use crate::core::types::{ActionLogEntry, AgentStatus, AutonomyLevel, Subtask};

pub const AGENT_STARTED: &str = "Agent started";
pub const AGENT_PAUSED: &str = "Agent paused by user";
pub const AGENT_RESUMED: &str = "Agent resumed";
pub const AGENT_STOPPED: &str = "Agent stopped by user";
pub const GOAL_MODIFIED: &str = "Goal modified";
pub const ALL_TASKS_COMPLETED: &str = "All tasks completed successfully";

/// Process-wide agent state.
///
/// Created once in `Idle`, reset on every `start`, cleared (never dropped) on
/// `stop`.
#[derive(Debug, Clone, Default)]
pub struct AgentState {
    pub(crate) status: AgentStatus,
    pub(crate) current_goal: Option<String>,
    pub(crate) autonomy_level: AutonomyLevel,
    pub(crate) subtasks: Vec<Subtask>,
    pub(crate) action_log: ActionLog,
    pub(crate) started_at: Option<DateTime<Utc>>,
    pub(crate) last_update: Option<DateTime<Utc>>,
    /// Run epoch. A progression worker may only mutate state while this still
    /// equals the value it was spawned with.
    pub(crate) generation: u64,
    pub(crate) plan_category: PlanCategory,
}

/// Serializable, point-in-time copy of [`AgentState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub status: AgentStatus,
    pub current_goal: Option<String>,
    pub autonomy_level: AutonomyLevel,
    pub subtasks: Vec<Subtask>,
    pub action_log: Vec<ActionLogEntry>,
    pub started_at: Option<DateTime<Utc>>,
    pub last_update: Option<DateTime<Utc>>,
}

/// Requested change to the goal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalEdit {
    /// Keep the current goal; the request is still logged.
    Keep,
    Set(String),
    Clear,
}

impl From<Option<String>> for GoalEdit {
    fn from(goal: Option<String>) -> Self {
        goal.map_or(Self::Keep, Self::Set)
    }
}

/// Action log response body (`{actions, total_actions}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLogView {
    pub actions: Vec<ActionLogEntry>,
    pub total_actions: usize,
}

impl AgentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> AgentStatus {
        self.status
    }

    pub fn current_goal(&self) -> Option<&str> {
        self.current_goal.as_deref()
    }

    pub fn autonomy_level(&self) -> AutonomyLevel {
        self.autonomy_level
    }

    pub fn subtasks(&self) -> &[Subtask] {
        &self.subtasks
    }

    pub fn action_log(&self) -> &ActionLog {
        &self.action_log
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn plan_category(&self) -> PlanCategory {
        self.plan_category
    }

    /// Begin a fresh run, discarding whatever the previous run left behind.
    ///
    /// Returns the generation the new progression worker must be bound to.
    pub fn start(&mut self, goal: String, autonomy: AutonomyLevel, now: DateTime<Utc>) -> u64 {
        let category = classify(&goal);
        let details = format!("Goal: {}, Autonomy: {}", goal, autonomy);

        self.generation += 1;
        self.status = AgentStatus::Running;
        self.plan_category = category;
        self.subtasks = plan_for(category, &goal);
        self.current_goal = Some(goal);
        self.autonomy_level = autonomy;
        self.started_at = Some(now);
        self.last_update = Some(now);
        self.action_log = ActionLog::new();
        self.action_log.record(now, AGENT_STARTED, details);
        self.generation
    }

    /// Halt progression without discarding the plan.
    pub fn pause(&mut self, now: DateTime<Utc>) {
        self.generation += 1;
        self.status = AgentStatus::Paused;
        self.last_update = Some(now);
        self.action_log.record(now, AGENT_PAUSED, "Manual intervention");
    }

    /// Mark the agent running again. Returns the generation for the new worker.
    pub fn resume(&mut self, now: DateTime<Utc>) -> u64 {
        self.generation += 1;
        self.status = AgentStatus::Running;
        self.last_update = Some(now);
        self.action_log
            .record(now, AGENT_RESUMED, "Continuing from previous state");
        self.generation
    }

    /// Kill switch: clears goal and plan regardless of the current status.
    pub fn stop(&mut self, now: DateTime<Utc>) {
        self.action_log.record(now, AGENT_STOPPED, "Emergency stop");
        self.generation += 1;
        self.status = AgentStatus::Stopped;
        self.current_goal = None;
        self.subtasks.clear();
        self.last_update = Some(now);
    }

    /// Apply a goal edit and record it, whatever the status.
    pub fn modify(&mut self, edit: impl Into<GoalEdit>, now: DateTime<Utc>) {
        let previous = self.current_goal.take();
        let next = match edit.into() {
            GoalEdit::Keep => previous.clone(),
            GoalEdit::Set(goal) => Some(goal),
            GoalEdit::Clear => None,
        };
        let details = format!(
            "Previous goal: {}; new goal: {}",
            previous.as_deref().unwrap_or("none"),
            next.as_deref().unwrap_or("none")
        );
        self.current_goal = next;
        self.last_update = Some(now);
        self.action_log.record(now, GOAL_MODIFIED, details);
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            status: self.status,
            current_goal: self.current_goal.clone(),
            autonomy_level: self.autonomy_level,
            subtasks: self.subtasks.clone(),
            action_log: self.action_log.entries().to_vec(),
            started_at: self.started_at,
            last_update: self.last_update,
        }
    }

    pub fn action_log_view(&self) -> ActionLogView {
        ActionLogView {
            actions: self.action_log.entries().to_vec(),
            total_actions: self.action_log.len(),
        }
    }
}
