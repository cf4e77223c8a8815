//! Supervision engine: the lock-holding controller over [`AgentState`].
//!
//! Every operation takes the same exclusive lock the progression worker takes
//! on each tick, so a tick and a control command never interleave. All
//! operations are total and return the resulting snapshot.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard, broadcast};
use tracing::info;

use crate::config::EngineConfig;
use crate::core::types::AutonomyLevel;
use crate::state::{ActionLogView, AgentSnapshot, AgentState, GoalEdit};
use crate::worker;

/// What caused a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Started,
    Paused,
    Resumed,
    Stopped,
    GoalModified,
    Progressed,
    Completed,
}

/// Broadcast after every mutation, from inside the critical section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub snapshot: AgentSnapshot,
}

pub(crate) struct Shared {
    pub(crate) state: Mutex<AgentState>,
    pub(crate) config: EngineConfig,
    events: broadcast::Sender<StateChange>,
}

impl Shared {
    /// Publish a change for `state` and return its snapshot.
    ///
    /// Callers hold the state lock, so event order matches log order.
    pub(crate) fn publish(&self, state: &AgentState, kind: ChangeKind) -> AgentSnapshot {
        let snapshot = state.snapshot();
        let _ = self.events.send(StateChange {
            kind,
            snapshot: snapshot.clone(),
        });
        snapshot
    }
}

/// Handle to the process-wide supervision engine.
///
/// Cloning is cheap; all clones share one [`AgentState`].
#[derive(Clone)]
pub struct Supervisor {
    shared: Arc<Shared>,
}

impl Supervisor {
    /// Build an idle engine. Fails if `config` does not validate, since the
    /// worker relies on a non-empty increment range and a non-zero interval.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate().context("invalid engine config")?;
        let (events, _) = broadcast::channel(config.event_buffer);
        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(AgentState::new()),
                config,
                events,
            }),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    /// Receive every state change from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.shared.events.subscribe()
    }

    /// Plan `goal` and begin a new run, replacing any previous one.
    pub async fn start(&self, goal: impl Into<String>, autonomy: AutonomyLevel) -> AgentSnapshot {
        let goal = goal.into();
        let mut state = self.lock().await;
        let generation = state.start(goal, autonomy, Utc::now());
        info!(
            generation,
            goal = state.current_goal().unwrap_or_default(),
            autonomy = %autonomy,
            category = ?state.plan_category(),
            "agent started"
        );
        worker::spawn(Arc::clone(&self.shared), generation);
        self.shared.publish(&state, ChangeKind::Started)
    }

    /// Pause progression. The current worker exits on its next tick.
    pub async fn pause(&self) -> AgentSnapshot {
        let mut state = self.lock().await;
        let previous = state.status();
        state.pause(Utc::now());
        info!(generation = state.generation(), from = %previous, "agent paused");
        self.shared.publish(&state, ChangeKind::Paused)
    }

    /// Resume progression with a fresh worker.
    pub async fn resume(&self) -> AgentSnapshot {
        let mut state = self.lock().await;
        let previous = state.status();
        let generation = state.resume(Utc::now());
        info!(generation, from = %previous, "agent resumed");
        worker::spawn(Arc::clone(&self.shared), generation);
        self.shared.publish(&state, ChangeKind::Resumed)
    }

    /// Kill switch. Takes effect from any status; no worker mutates state
    /// after this returns.
    pub async fn stop(&self) -> AgentSnapshot {
        let mut state = self.lock().await;
        let previous = state.status();
        state.stop(Utc::now());
        info!(generation = state.generation(), from = %previous, "agent stopped");
        self.shared.publish(&state, ChangeKind::Stopped)
    }

    /// Edit the goal text without touching the plan or the worker.
    pub async fn modify(&self, edit: impl Into<GoalEdit>) -> AgentSnapshot {
        let mut state = self.lock().await;
        state.modify(edit, Utc::now());
        info!(
            generation = state.generation(),
            goal = state.current_goal().unwrap_or_default(),
            "goal modified"
        );
        self.shared.publish(&state, ChangeKind::GoalModified)
    }

    pub async fn status(&self) -> AgentSnapshot {
        self.lock().await.snapshot()
    }

    pub async fn action_log(&self) -> ActionLogView {
        self.lock().await.action_log_view()
    }

    async fn lock(&self) -> MutexGuard<'_, AgentState> {
        self.shared.state.lock().await
    }

    #[cfg(test)]
    pub(crate) fn shared_for_tests(&self) -> Arc<Shared> {
        Arc::clone(&self.shared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::AgentStatus;
    use crate::state::{AGENT_STARTED, AGENT_STOPPED};
    use crate::test_support::{fast_config, sleep_ticks};

    #[test]
    fn new_rejects_inverted_increment_range() {
        let config = EngineConfig {
            min_increment: 30,
            max_increment: 20,
            ..fast_config()
        };
        let err = Supervisor::new(config).err().expect("invalid config");
        assert!(format!("{:#}", err).contains("exceeds max_increment"));
    }

    #[test]
    fn new_rejects_zero_tick_interval() {
        let config = EngineConfig {
            tick_interval_ms: 0,
            ..fast_config()
        };
        assert!(Supervisor::new(config).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn default_config_builds() {
        let supervisor = Supervisor::new(EngineConfig::default()).expect("supervisor");
        assert_eq!(supervisor.status().await.status, AgentStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn start_returns_planned_running_snapshot() {
        let supervisor = Supervisor::new(fast_config()).expect("supervisor");
        let snap = supervisor
            .start("Review the auth module", AutonomyLevel::Supervised)
            .await;

        assert_eq!(snap.status, AgentStatus::Running);
        assert_eq!(snap.subtasks.len(), 4);
        assert!(snap.subtasks[0].description.contains("Review the auth module"));
        assert_eq!(snap.action_log.len(), 1);
        assert_eq!(snap.action_log[0].action, AGENT_STARTED);
    }

    #[tokio::test(start_paused = true)]
    async fn back_to_back_status_calls_are_identical() {
        let supervisor = Supervisor::new(fast_config()).expect("supervisor");
        supervisor.start("goal", AutonomyLevel::Supervised).await;
        sleep_ticks(supervisor.config(), 3).await;

        let first = supervisor.status().await;
        let second = supervisor.status().await;
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn events_follow_log_order() {
        let supervisor = Supervisor::new(fast_config()).expect("supervisor");
        let mut rx = supervisor.subscribe();

        supervisor.start("goal", AutonomyLevel::Supervised).await;
        supervisor.modify(Some("other".to_string())).await;
        supervisor.stop().await;

        let kinds: Vec<ChangeKind> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|change| change.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![ChangeKind::Started, ChangeKind::GoalModified, ChangeKind::Stopped]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stop_before_any_start_is_accepted() {
        let supervisor = Supervisor::new(fast_config()).expect("supervisor");
        let snap = supervisor.stop().await;
        assert_eq!(snap.status, AgentStatus::Stopped);
        assert_eq!(
            snap.action_log.last().map(|e| e.action.as_str()),
            Some(AGENT_STOPPED)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn action_log_view_matches_snapshot() {
        let supervisor = Supervisor::new(fast_config()).expect("supervisor");
        supervisor.start("goal", AutonomyLevel::SemiAuto).await;
        supervisor.pause().await;

        let view = supervisor.action_log().await;
        let snap = supervisor.status().await;
        assert_eq!(view.total_actions, 2);
        assert_eq!(view.actions, snap.action_log);
    }
}
