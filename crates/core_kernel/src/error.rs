//! Core error types used across the system

use thiserror::Error;
use crate::session::SessionError;

/// Core error type for the kernel
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        CoreError::InvalidIdentifier(message.into())
    }
}
