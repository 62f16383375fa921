pub mod domain;
pub mod ion;
pub mod particle;
pub mod solutes;
