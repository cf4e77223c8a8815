//! Deterministic, pure logic shared by the supervision engine.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures, take timestamps and randomness as inputs, and return
//! deterministic outputs suitable for tests.

pub mod flavor;
pub mod invariants;
pub mod planner;
pub mod progress;
pub mod types;
