//! Provides output formats for simulation results.
//!
//! Trajectories are exported as flat CSV tables (one row per particle per frame) so they
//! can be loaded by plotting tools directly; statistics reports are written as TOML.

pub mod report;
pub mod trajectory;
