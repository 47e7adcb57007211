//! Ports and Adapters Infrastructure
//!
//! Every external collaborator of the review workflow (claims backend,
//! extraction service, document store) sits behind a port trait defined in
//! the domain crate. Adapters implement those traits and report failures
//! through the single [`PortError`] type defined here.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │   Review Coordinator         │
//! └──────────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────┐
//! │   Port Traits                │
//! │ (ClaimsBackendPort, ...)     │
//! └──────────────────────────────┘
//!        ▲                 ▲
//!        │                 │
//! ┌──────┴──────┐   ┌──────┴──────┐
//! │ HTTP adapter│   │ Mock adapter │
//! └─────────────┘   └─────────────┘
//! ```

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Error type for port operations
///
/// Provides a unified error type that all port implementations must use,
/// so the coordinator can apply one failure policy regardless of adapter.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// The request was rejected locally before reaching the collaborator
    #[error("Validation error: {message}")]
    Validation {
        message: String,
    },

    /// Authentication or authorization failed
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    /// Rate limit exceeded
    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        retry_after_secs: u64,
    },

    /// The collaborator is unavailable (5xx)
    #[error("Service unavailable: {service}")]
    ServiceUnavailable {
        service: String,
    },

    /// The collaborator answered with a non-success status
    #[error("{message}")]
    Rejected {
        status: u16,
        message: String,
    },

    /// Connection to the collaborator failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout: {operation}")]
    Timeout {
        operation: String,
    },

    /// A response could not be decoded
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
        }
    }

    /// Creates an Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        PortError::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a Rejected error for a non-success status
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        PortError::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a Transformation error
    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. }
                | PortError::Timeout { .. }
                | PortError::RateLimited { .. }
                | PortError::ServiceUnavailable { .. }
        )
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    /// Returns true if the collaborator refused the caller's credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, PortError::Unauthorized { .. })
    }

    /// HTTP status associated with the failure, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            PortError::NotFound { .. } => Some(404),
            PortError::Rejected { status, .. } => Some(*status),
            PortError::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}

/// Marker trait for all domain ports
///
/// All port traits extend this marker so they can be shared across tasks.
pub trait DomainPort: Send + Sync + 'static {}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    Healthy,
    Degraded,
    Unhealthy,
    Unknown,
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Adapter identifier
    pub adapter_id: String,
    /// Current health status
    pub status: AdapterHealth,
    /// Latency of the health check in milliseconds
    pub latency_ms: u64,
    /// Optional message with additional details
    pub message: Option<String>,
    /// Timestamp of the health check
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

/// Trait for adapters that support health checks
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Performs a health check on the adapter
    async fn health_check(&self) -> HealthCheckResult;
}
