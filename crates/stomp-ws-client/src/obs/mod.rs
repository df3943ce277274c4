//! Lightweight in-process counters (dependency-free).
//!
//! The adapter records what it emitted and what it dropped so operators can
//! tell a quiet destination from a producer sending frames we cannot decode.

pub mod stats;

pub use stats::{AdapterStats, AdapterStatsSnapshot};
