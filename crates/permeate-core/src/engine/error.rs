use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid simulation options: {0}")]
    InvalidOptions(String),
}
