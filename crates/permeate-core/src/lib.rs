//! # Permeate Core Library
//!
//! A small simulation library for size-selective ion transport across a reverse-osmosis
//! nanotube membrane. It pairs a per-tick particle model with a closed-form
//! water-quality model that is evaluated from the same configuration.
//!
//! ## Architecture
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`IonSpecies`, `Particle`,
//!   `Domain`, `SoluteProfile`), the pure transport/statistics model, and trajectory
//!   and report I/O.
//!
//! - **[`engine`]: The Logic Core.** The stateful particle system, the validated
//!   `FiltrationConfig`, the idle/running operating mode and progress reporting.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures that drive the engine
//!   for a fixed number of ticks and collect frames and statistics.

pub mod core;
pub mod engine;
pub mod workflows;
