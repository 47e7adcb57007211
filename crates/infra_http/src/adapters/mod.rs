//! Port adapters

pub mod claims_backend;
pub mod document_store;

pub use claims_backend::HttpClaimsBackend;
pub use document_store::HttpDocumentStore;
