//! # Transport Module
//!
//! Closed-form membrane transport model. Given the operating pressure, the nanotube pore
//! diameter and the feed solute profile, it estimates per-ion passage, permeate water
//! quality, hardness and specific energy without simulating individual particles.
//!
//! - [`constants`] - Model coefficients and display thresholds
//! - [`statistics`] - The statistics computation and its display rounding

pub mod constants;
pub mod statistics;
