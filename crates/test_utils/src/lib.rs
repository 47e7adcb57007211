//! Test Utilities Crate
//!
//! Provides shared test infrastructure for the claims review test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built claims, sessions, and extraction results
//! - `builders`: Builder patterns for test data construction
//! - `mocks`: In-memory implementations of every port
//! - `assertions`: Assertion helpers for review state

pub mod fixtures;
pub mod builders;
pub mod mocks;
pub mod assertions;

pub use fixtures::*;
pub use builders::*;
pub use mocks::*;
pub use assertions::*;
