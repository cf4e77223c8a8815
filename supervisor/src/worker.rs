//! Background progression worker for one agent run.

use std::sync::Arc;

use chrono::Utc;
use rand::rngs::StdRng;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::core::invariants::validate_invariants;
use crate::core::progress::{TickCursor, TickOutcome, advance};
use crate::supervisor::{ChangeKind, Shared};

/// Spawn the worker bound to run `generation`.
///
/// The worker sleeps one tick interval, then repeatedly locks the state,
/// exits if its generation has been superseded or the agent is no longer
/// running, and otherwise applies one tick.
pub(crate) fn spawn(shared: Arc<Shared>, generation: u64) -> JoinHandle<()> {
    let rng = shared.config.worker_rng(generation);
    tokio::spawn(run(shared, generation, rng))
}

async fn run(shared: Arc<Shared>, generation: u64, mut rng: StdRng) {
    let interval = shared.config.tick_interval();
    let policy = shared.config.progress_policy();
    let mut cursor = TickCursor::new();
    debug!(generation, interval_ms = interval.as_millis() as u64, "worker started");

    loop {
        tokio::time::sleep(interval).await;

        let mut state = shared.state.lock().await;
        if state.generation() != generation {
            debug!(
                generation,
                current = state.generation(),
                "worker superseded, exiting"
            );
            return;
        }

        let outcome = advance(&mut state, &policy, &mut rng, &mut cursor, Utc::now());
        if outcome == TickOutcome::Halted {
            debug!(generation, status = %state.status(), "agent not running, worker exiting");
            return;
        }

        let errors = validate_invariants(&state);
        if !errors.is_empty() {
            error!(generation, ?errors, "agent state invariants violated");
        }

        if outcome == TickOutcome::Completed {
            info!(generation, ticks = cursor.ticks(), "all tasks completed");
            shared.publish(&state, ChangeKind::Completed);
            return;
        }
        shared.publish(&state, ChangeKind::Progressed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{AgentStatus, AutonomyLevel, SubtaskStatus};
    use crate::supervisor::Supervisor;
    use crate::test_support::{fast_config, sleep_ticks};

    #[tokio::test(start_paused = true)]
    async fn superseded_worker_exits_without_mutating() {
        let supervisor = Supervisor::new(fast_config()).expect("supervisor");
        supervisor.start("goal", AutonomyLevel::Supervised).await;
        let shared = supervisor.shared_for_tests();

        let stale_generation = shared.state.lock().await.generation() - 1;
        let handle = spawn(Arc::clone(&shared), stale_generation);
        supervisor.pause().await;
        let before = supervisor.status().await;

        sleep_ticks(supervisor.config(), 2).await;
        assert!(handle.is_finished());
        assert_eq!(supervisor.status().await, before);
    }

    #[tokio::test(start_paused = true)]
    async fn resume_hands_progress_to_single_new_worker() {
        let supervisor = Supervisor::new(fast_config()).expect("supervisor");
        supervisor.start("goal", AutonomyLevel::Supervised).await;
        sleep_ticks(supervisor.config(), 2).await;
        supervisor.pause().await;
        supervisor.resume().await;
        // A second resume supersedes the first resumed worker.
        supervisor.resume().await;
        sleep_ticks(supervisor.config(), 1).await;

        let snap = supervisor.status().await;
        assert_eq!(snap.status, AgentStatus::Running);
        let starts = snap
            .action_log
            .iter()
            .filter(|e| e.action.starts_with("Starting task: "))
            .count();
        assert_eq!(starts, 1, "one subtask started so far");
        assert_eq!(snap.subtasks[0].status, SubtaskStatus::InProgress);
        assert!(
            snap.subtasks[1..]
                .iter()
                .all(|s| s.status == SubtaskStatus::Pending)
        );
    }
}
