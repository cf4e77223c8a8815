//! Deterministic single-tick progression of an agent run.
//!
//! [`advance`] is the whole body of a progression worker tick, minus the
//! sleeping and locking. Given the same state, policy, RNG stream and cursor
//! it always produces the same result.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::core::flavor::{FlavorCursor, pool};
use crate::core::types::{AgentStatus, SubtaskStatus};
use crate::state::{ALL_TASKS_COMPLETED, AgentState};

/// Progress a subtask reports the moment it is picked up.
pub const STARTING_PROGRESS: u8 = 10;

/// Tunables for how fast subtasks advance and how chatty the log is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressPolicy {
    /// Smallest per-tick increment for an in-progress subtask.
    pub min_increment: u8,
    /// Largest per-tick increment (inclusive).
    pub max_increment: u8,
    /// Narrate every n-th tick while a subtask is in progress.
    pub flavor_every: u32,
}

impl Default for ProgressPolicy {
    fn default() -> Self {
        Self {
            min_increment: 10,
            max_increment: 25,
            flavor_every: 2,
        }
    }
}

/// Per-worker bookkeeping carried between ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickCursor {
    ticks: u64,
    flavor: FlavorCursor,
}

impl TickCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks this worker has applied.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Result of applying one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The agent is not running; nothing was touched and the worker must exit.
    Halted,
    /// At most one subtask advanced; the run continues.
    Advanced,
    /// The last subtask completed; the agent stopped itself.
    Completed,
}

/// Apply one tick to a locked state.
///
/// Advances only the first non-completed subtask. When every subtask is
/// completed (vacuously so for an empty plan) the agent transitions to
/// `Stopped` and the terminal entry is appended.
pub fn advance<R: Rng + ?Sized>(
    state: &mut AgentState,
    policy: &ProgressPolicy,
    rng: &mut R,
    cursor: &mut TickCursor,
    now: DateTime<Utc>,
) -> TickOutcome {
    if state.status != AgentStatus::Running {
        return TickOutcome::Halted;
    }
    cursor.ticks += 1;

    let total = state.subtasks.len();
    let narration = pool(state.plan_category);
    if let Some(subtask) = state.subtasks.iter_mut().find(|s| !s.is_completed()) {
        match subtask.status {
            SubtaskStatus::Pending => {
                subtask.status = SubtaskStatus::InProgress;
                subtask.progress = STARTING_PROGRESS;
                state.action_log.record(
                    now,
                    format!("Starting task: {}", subtask.description),
                    format!("Subtask {} of {}", subtask.id, total),
                );
            }
            SubtaskStatus::InProgress => {
                let step = rng.gen_range(policy.min_increment..=policy.max_increment);
                subtask.progress = subtask.progress.saturating_add(step).min(100);
                if subtask.progress == 100 {
                    subtask.status = SubtaskStatus::Completed;
                    state.action_log.record(
                        now,
                        format!("Task completed: {}", subtask.description),
                        format!("Subtask {} of {}", subtask.id, total),
                    );
                } else if cursor.ticks % u64::from(policy.flavor_every.max(1)) == 0 {
                    if let Some((action, details)) = cursor.flavor.next_in(narration) {
                        state.action_log.record(now, action, details);
                    }
                }
            }
            SubtaskStatus::Completed => {}
        }
    }

    state.last_update = Some(now);
    if state.subtasks.iter().all(|s| s.is_completed()) {
        state.status = AgentStatus::Stopped;
        let goal = state.current_goal.as_deref().unwrap_or("none").to_string();
        state
            .action_log
            .record(now, ALL_TASKS_COMPLETED, format!("Goal: {}", goal));
        return TickOutcome::Completed;
    }
    TickOutcome::Advanced
}
