//! Claims Review Ports
//!
//! Port traits for every collaborator the review workflow calls. The
//! coordinator only ever sees these traits; `infra_http` provides the HTTP
//! adapters and `test_utils` provides in-memory mocks.
//!
//! Every operation takes the caller's [`AccessToken`] explicitly. Ports never
//! look up ambient credentials.

use async_trait::async_trait;

use core_kernel::{AccessToken, ClaimId, DocumentId, DomainPort, PolicyId, PortError};

use crate::claim::{Claim, ClaimSummary};
use crate::document::{PreviewHandle, StorageLocator};
use crate::extraction::ExtractionOutcome;
use crate::policy::{PolicyRecord, PolicyStatusUpdate};
use crate::review::{ReviewRequest, ReviewResult};

/// Source of truth for claims, documents and review status
#[async_trait]
pub trait ClaimsBackendPort: DomainPort {
    /// Lists claims awaiting admin attention
    async fn list_claims(&self, token: &AccessToken) -> Result<Vec<ClaimSummary>, PortError>;

    /// Fetches a claim with its document metadata
    async fn fetch_claim(&self, token: &AccessToken, claim_id: &ClaimId) -> Result<Claim, PortError>;

    /// Records a review decision and returns the recomputed statuses
    async fn submit_review(
        &self,
        token: &AccessToken,
        claim_id: &ClaimId,
        document_id: &DocumentId,
        request: &ReviewRequest,
    ) -> Result<ReviewResult, PortError>;
}

/// Document field extraction (OCR/ML)
#[async_trait]
pub trait ExtractionPort: DomainPort {
    async fn extract_document(
        &self,
        token: &AccessToken,
        claim_id: &ClaimId,
        document_id: &DocumentId,
    ) -> Result<ExtractionOutcome, PortError>;
}

/// Stored document files
#[async_trait]
pub trait DocumentStorePort: DomainPort {
    /// Downloads a document into a locally held preview
    async fn fetch_preview(
        &self,
        token: &AccessToken,
        locator: &StorageLocator,
    ) -> Result<PreviewHandle, PortError>;
}

/// Policy approval endpoint
#[async_trait]
pub trait PolicyReviewPort: DomainPort {
    async fn update_policy_status(
        &self,
        token: &AccessToken,
        policy_id: &PolicyId,
        update: &PolicyStatusUpdate,
    ) -> Result<PolicyRecord, PortError>;
}
