//! # Core Module
//!
//! Stateless building blocks shared by the engine and workflows.
//!
//! - **Data Models** ([`models`]) - Ion species table, particles, the simulation domain
//!   and solute profiles
//! - **Transport Model** ([`transport`]) - Closed-form passage, rejection, hardness and
//!   energy estimates computed from a configuration alone
//! - **File I/O** ([`io`]) - CSV trajectory export and TOML statistics reports
//!
//! Nothing in this module holds mutable state between calls; every function here is
//! safe to evaluate at any rate.

pub mod io;
pub mod models;
pub mod transport;
