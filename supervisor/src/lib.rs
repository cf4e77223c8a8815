//! Supervision engine for a simulated autonomous agent.
//!
//! A caller starts the agent with a goal, watches it decompose the goal into
//! subtasks that advance on a fixed tick, and may pause, resume, stop or
//! re-target it at any time. The architecture keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (planning, tick progression,
//!   invariants). No I/O, no clocks, fully testable in isolation.
//! - **[`state`]** and **[`action_log`]**: the single mutable record and its
//!   append-only audit trail.
//! - **[`supervisor`]** and **[`worker`]**: the lock discipline that arbitrates
//!   between control commands and the background progression loop.

pub mod action_log;
pub mod config;
pub mod core;
pub mod logging;
pub mod state;
pub mod supervisor;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
mod worker;

pub use config::EngineConfig;
pub use core::types::{ActionLogEntry, AgentStatus, AutonomyLevel, Subtask, SubtaskStatus};
pub use state::{ActionLogView, AgentSnapshot, AgentState, GoalEdit};
pub use supervisor::{ChangeKind, StateChange, Supervisor};
