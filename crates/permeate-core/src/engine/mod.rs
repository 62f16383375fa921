//! # Engine Module
//!
//! Stateful simulation machinery built on the stateless [`crate::core`] layer.
//!
//! - **Configuration** ([`config`]) - The validated operating point and its builder; all
//!   boundary checks on pressure, pore size, concentrations and domain size live here
//! - **Particle System** ([`particles`]) - Seeding, per-tick integration and the
//!   size-selective membrane rule
//! - **Operating Mode** ([`state`]) - The idle/running switch
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine-level error type
//!
//! The engine performs no timing or loop management of its own: a host advances the
//! particle system one tick at a time and swaps configurations between ticks.

pub mod config;
pub mod error;
pub mod particles;
pub mod progress;
pub mod state;
