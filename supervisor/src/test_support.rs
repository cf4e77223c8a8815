//! Test-only helpers for building subtasks and driving the engine on virtual time.

use std::time::Duration;

use crate::config::EngineConfig;
use crate::core::types::{Subtask, SubtaskStatus};

/// Create a subtask with explicit status and progress.
pub fn subtask(id: u32, status: SubtaskStatus, progress: u8) -> Subtask {
    Subtask {
        id,
        description: format!("subtask {}", id),
        status,
        progress,
    }
}

/// Engine config with a short tick and a fixed seed.
pub fn fast_config() -> EngineConfig {
    EngineConfig {
        tick_interval_ms: 10,
        seed: Some(7),
        ..EngineConfig::default()
    }
}

/// Sleep past `ticks` tick boundaries, landing halfway between two ticks so
/// reads never race a worker waking at the same instant.
///
/// Intended for `#[tokio::test(start_paused = true)]`, where this advances
/// virtual time instantly.
pub async fn sleep_ticks(config: &EngineConfig, ticks: u32) {
    let interval = config.tick_interval();
    tokio::time::sleep(interval * ticks + interval / 2).await;
}

/// Upper bound on ticks any default-policy run needs to finish.
///
/// Each of the four subtasks takes one pickup tick plus at most nine
/// increments of the minimum size.
pub fn ticks_to_finish(config: &EngineConfig) -> u32 {
    let per_subtask = 1 + 90_u32.div_ceil(u32::from(config.min_increment));
    per_subtask * crate::core::planner::PLAN_LEN as u32
}

/// Whole-run timeout for virtual-time tests.
pub fn run_budget(config: &EngineConfig) -> Duration {
    config.tick_interval() * (ticks_to_finish(config) + 2)
}
