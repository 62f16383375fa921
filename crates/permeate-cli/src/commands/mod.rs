pub mod simulate;
pub mod species;
pub mod stats;
