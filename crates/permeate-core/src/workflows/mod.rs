//! # Workflows Module
//!
//! High-level entry points that tie the [`crate::engine`] and [`crate::core`] layers
//! together for a complete run.
//!
//! - **Simulation Workflow** ([`simulate`]) - Seeds a particle system, advances it for a
//!   fixed number of ticks while recording frames, and pairs the final particle census
//!   with the closed-form statistics for the same configuration.

pub mod simulate;
