//! Guesser error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuesserError {
    #[error(transparent)]
    Core(#[from] nearmiss_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Metrics exporter failed to start: {0}")]
    Metrics(String),
}

pub type Result<T> = std::result::Result<T, GuesserError>;
