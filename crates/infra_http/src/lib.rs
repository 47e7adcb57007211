//! HTTP Infrastructure Layer
//!
//! Adapters that implement the review ports over HTTP with `reqwest`:
//!
//! - [`HttpClaimsBackend`]: claim queue, claim documents, document reviews,
//!   extraction and policy status updates against the REST backend
//! - [`HttpDocumentStore`]: downloads document files, signing storage paths
//!   first when needed
//!
//! Every non-success response is translated into a [`core_kernel::PortError`]
//! by [`ApiClient`], so the domain never sees `reqwest` types.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_http::{ServiceConfig, HttpClaimsBackend, HttpDocumentStore};
//!
//! let config = ServiceConfig::load()?;
//! let backend = Arc::new(HttpClaimsBackend::new(&config)?);
//! let store = Arc::new(HttpDocumentStore::new(&config)?);
//! let coordinator = ReviewCoordinator::new(backend.clone(), backend, store, Some(session));
//! ```

pub mod config;
pub mod error;
pub mod client;
pub mod dto;
pub mod adapters;

pub use config::ServiceConfig;
pub use error::HttpError;
pub use client::{ApiClient, Endpoint};
pub use adapters::{HttpClaimsBackend, HttpDocumentStore};
