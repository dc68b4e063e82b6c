//! Application error types

use thiserror::Error;

/// Process-level failures outside the domain (startup, configuration).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}
