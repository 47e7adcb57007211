//! Core Kernel - Foundational types for the claims review system
//!
//! This crate provides the building blocks shared by every other crate:
//! - Opaque identifiers for claims, documents, policies, and users
//! - The operator session whose token authorizes every backend request
//! - The port error type and marker traits used by all adapters

pub mod identifiers;
pub mod session;
pub mod ports;
pub mod error;

pub use identifiers::{ClaimId, DocumentId, PolicyId, UserId};
pub use session::{AccessToken, Session, SessionError, UserRole};
pub use ports::{PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable};
pub use error::CoreError;
