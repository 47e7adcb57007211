//! Adapter setup errors
//!
//! Failures of individual requests are reported as `PortError`; this type
//! only covers building the adapters.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    /// Configuration could not be read from the environment
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration was read but is not usable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl HttpError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        HttpError::InvalidConfig(message.into())
    }
}
