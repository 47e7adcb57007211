//! Claim Document Review Domain
//!
//! This crate models the admin-side review of a submitted health-insurance
//! claim: the claim and its supporting documents, the fields an external
//! extraction service recognises in each document, and the review decisions
//! an operator records per document.
//!
//! # Review Flow
//!
//! ```text
//! load claim -> select document -> (preview + extraction) -> approve/reject
//!                                                               │
//!                      backend recomputes claim status <────────┘
//! ```
//!
//! The [`ReviewCoordinator`] drives that flow against the port traits in
//! [`ports`]; [`ReviewState`] holds everything it learns for the session.

pub mod claim;
pub mod document;
pub mod extraction;
pub mod review;
pub mod policy;
pub mod ports;
pub mod state;
pub mod coordinator;
pub mod error;

pub use claim::{Claim, ClaimStatus, ClaimSummary};
pub use document::{Document, DocumentType, PreviewHandle, ReviewStatus, StorageLocator};
pub use extraction::{ExtractedField, ExtractionOutcome, EXTRACTION_ERROR_FIELD};
pub use review::{ReviewDecision, ReviewRequest, ReviewResult};
pub use policy::{PolicyDecision, PolicyRecord, PolicyReviewService, PolicyStatus, PolicyStatusUpdate};
pub use ports::{ClaimsBackendPort, DocumentStorePort, ExtractionPort, PolicyReviewPort};
pub use state::ReviewState;
pub use coordinator::{ExtractionReport, PreviewStatus, ReviewCoordinator, SelectionReport};
pub use error::ReviewError;
