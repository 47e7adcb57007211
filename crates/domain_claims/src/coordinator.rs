//! Claim Document Review Coordinator
//!
//! Mediates between an operator and the collaborators for one claim at a
//! time. Methods take `&self` so an operator can select another document
//! while an earlier extraction is still running; each completion writes to
//! its own document key in [`ReviewState`].
//!
//! Locks are never held across a network call. Failed network operations
//! leave the state as it was, and nothing is retried automatically.
//!
//! Re-selecting the same document while its extraction is in flight starts a
//! second request; whichever answer arrives last is kept.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use core_kernel::{AccessToken, ClaimId, DocumentId, Session};

use crate::claim::{Claim, ClaimSummary};
use crate::document::Document;
use crate::error::ReviewError;
use crate::extraction::ExtractionOutcome;
use crate::ports::{ClaimsBackendPort, DocumentStorePort, ExtractionPort};
use crate::review::{ReviewDecision, ReviewRequest, ReviewResult};
use crate::state::ReviewState;

/// Returns the session's bearer token, or an auth error if there is none
/// or it has expired
pub(crate) fn require_token(session: Option<&Session>) -> Result<AccessToken, ReviewError> {
    let session = session.ok_or_else(ReviewError::not_authenticated)?;
    if session.is_expired(Utc::now()) {
        return Err(ReviewError::session_expired());
    }
    Ok(session.access_token().clone())
}

/// What happened to the preview during a selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "preview", content = "detail", rename_all = "snake_case")]
pub enum PreviewStatus {
    /// Already memoized for this session
    Cached,
    /// Fetched from the document store during this selection
    Resolved,
    /// The document has no storage locator
    Unavailable,
    /// Fetching failed; selection went ahead anyway
    Failed(String),
}

/// What happened to extraction during a selection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "extraction", content = "outcome", rename_all = "snake_case")]
pub enum ExtractionReport {
    /// The document type is exempt; any earlier result was discarded
    Exempt,
    /// Extraction ran; the outcome is a result or the synthetic error field
    Ran(ExtractionOutcome),
    /// Another claim was loaded before extraction started; nothing was sent
    Dropped,
}

/// Result of [`ReviewCoordinator::select_document`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionReport {
    pub document_id: DocumentId,
    pub preview: PreviewStatus,
    pub extraction: ExtractionReport,
}

pub struct ReviewCoordinator {
    backend: Arc<dyn ClaimsBackendPort>,
    extractor: Arc<dyn ExtractionPort>,
    store: Arc<dyn DocumentStorePort>,
    session: RwLock<Option<Session>>,
    state: RwLock<ReviewState>,
}

impl ReviewCoordinator {
    pub fn new(
        backend: Arc<dyn ClaimsBackendPort>,
        extractor: Arc<dyn ExtractionPort>,
        store: Arc<dyn DocumentStorePort>,
        session: Option<Session>,
    ) -> Self {
        Self {
            backend,
            extractor,
            store,
            session: RwLock::new(session),
            state: RwLock::new(ReviewState::new()),
        }
    }

    /// Replaces the session, e.g. after the operator signs in again.
    ///
    /// Returns the previous session.
    pub async fn swap_session(&self, session: Option<Session>) -> Option<Session> {
        std::mem::replace(&mut *self.session.write().await, session)
    }

    pub async fn clear_session(&self) -> Option<Session> {
        self.swap_session(None).await
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> ReviewState {
        self.state.read().await.clone()
    }

    async fn token(&self) -> Result<AccessToken, ReviewError> {
        require_token(self.session.read().await.as_ref())
    }

    /// Looks up a document of the loaded claim
    async fn document(&self, document_id: &DocumentId) -> Result<(ClaimId, Document), ReviewError> {
        let state = self.state.read().await;
        let claim = state.claim().ok_or(ReviewError::NoClaimLoaded)?;
        let document = claim
            .document(document_id)
            .cloned()
            .ok_or_else(|| ReviewError::UnknownDocument {
                claim_id: claim.id.clone(),
                document_id: document_id.clone(),
            })?;
        Ok((claim.id.clone(), document))
    }

    /// Fetches the admin claim queue
    pub async fn list_claims(&self) -> Result<Vec<ClaimSummary>, ReviewError> {
        let token = self.token().await?;
        let claims = self.backend.list_claims(&token).await.map_err(|e| {
            warn!(error = %e, "Failed to list claims");
            ReviewError::from(e)
        })?;
        debug!(count = claims.len(), "Listed claims");
        Ok(claims)
    }

    /// Fetches a claim and its documents and makes it the current claim.
    ///
    /// Extraction state never carries over from a previous load. The preview
    /// of the initially selected document is fetched best-effort.
    pub async fn load_claim(&self, claim_id: &ClaimId) -> Result<Claim, ReviewError> {
        let token = self.token().await?;

        let claim = self.backend.fetch_claim(&token, claim_id).await.map_err(|e| {
            warn!(claim_id = %claim_id, error = %e, "Failed to load claim");
            ReviewError::from(e)
        })?;

        let selected = {
            let mut state = self.state.write().await;
            state.claim_loaded(claim.clone());
            state.selected_document_id().cloned()
        };

        info!(
            claim_id = %claim.id,
            status = ?claim.status,
            documents = claim.documents.len(),
            "Claim loaded"
        );

        if let Some(document_id) = selected {
            if let Ok((claim_id, document)) = self.document(&document_id).await {
                self.resolve_preview(&claim_id, &document).await;
            }
        }

        Ok(claim)
    }

    /// Makes a document current, resolves its preview and runs extraction.
    ///
    /// Preview failures are reported in the returned [`SelectionReport`] and
    /// never block the selection. Exempt documents are not extracted.
    pub async fn select_document(&self, document_id: &DocumentId) -> Result<SelectionReport, ReviewError> {
        self.state.write().await.document_selected(document_id)?;
        let (claim_id, document) = self.document(document_id).await?;

        let preview = self.resolve_preview(&claim_id, &document).await;

        let extraction = if document.is_extraction_exempt() {
            debug!(document_id = %document_id, "Document type is exempt from extraction");
            self.state.write().await.extraction_discarded(document_id);
            ExtractionReport::Exempt
        } else {
            match self.extract(&claim_id, &document).await {
                Some(outcome) => ExtractionReport::Ran(outcome),
                None => ExtractionReport::Dropped,
            }
        };

        Ok(SelectionReport {
            document_id: document_id.clone(),
            preview,
            extraction,
        })
    }

    /// Runs extraction for a document of the loaded claim.
    ///
    /// Extraction failures are recorded as a single synthetic error field and
    /// returned as an outcome, not as an error.
    pub async fn run_extraction(&self, document_id: &DocumentId) -> Result<ExtractionOutcome, ReviewError> {
        let (claim_id, document) = self.document(document_id).await?;
        if document.is_extraction_exempt() {
            return Err(ReviewError::validation(format!(
                "{} documents are not sent for extraction",
                document.document_type.display_name()
            )));
        }
        self.extract(&claim_id, &document)
            .await
            .ok_or(ReviewError::ClaimReplaced { claim_id })
    }

    /// Returns `None` without calling the service once another claim is loaded
    async fn extract(&self, claim_id: &ClaimId, document: &Document) -> Option<ExtractionOutcome> {
        if !self.state.write().await.extraction_started(claim_id, &document.id) {
            debug!(claim_id = %claim_id, document_id = %document.id, "Skipped extraction for a claim no longer loaded");
            return None;
        }

        let result = match self.token().await {
            Ok(token) => self
                .extractor
                .extract_document(&token, claim_id, &document.id)
                .await
                .map_err(|e| ReviewError::Extraction(e.to_string())),
            Err(e) => Err(ReviewError::Extraction(e.to_string())),
        };

        let outcome = match result {
            Ok(outcome) => {
                info!(
                    claim_id = %claim_id,
                    document_id = %document.id,
                    fields = outcome.fields.len(),
                    "Extraction completed"
                );
                outcome
            }
            Err(e) => {
                warn!(claim_id = %claim_id, document_id = %document.id, error = %e, "Extraction failed");
                ExtractionOutcome::failed(e.to_string())
            }
        };

        let applied = self
            .state
            .write()
            .await
            .extraction_finished(claim_id, &document.id, outcome.clone());
        if !applied {
            debug!(claim_id = %claim_id, document_id = %document.id, "Dropped extraction for a claim no longer loaded");
        }
        Some(outcome)
    }

    async fn resolve_preview(&self, claim_id: &ClaimId, document: &Document) -> PreviewStatus {
        if self.state.read().await.preview(&document.id).is_some() {
            return PreviewStatus::Cached;
        }
        let Some(locator) = document.locator.as_ref() else {
            return PreviewStatus::Unavailable;
        };

        let token = match self.token().await {
            Ok(token) => token,
            Err(e) => return PreviewStatus::Failed(e.to_string()),
        };

        match self.store.fetch_preview(&token, locator).await {
            Ok(handle) => {
                debug!(document_id = %document.id, bytes = handle.len(), "Preview resolved");
                self.state
                    .write()
                    .await
                    .preview_resolved(claim_id, &document.id, handle);
                PreviewStatus::Resolved
            }
            Err(e) => {
                warn!(document_id = %document.id, error = %e, "Error loading document preview");
                PreviewStatus::Failed(e.to_string())
            }
        }
    }

    /// Drops a memoized preview so the next selection fetches it again
    pub async fn invalidate_preview(&self, document_id: &DocumentId) -> bool {
        self.state.write().await.preview_invalidated(document_id).is_some()
    }

    /// Edits the remarks that accompany the next rejection
    pub async fn set_review_remarks(&self, remarks: impl Into<String>) {
        self.state.write().await.remarks_edited(remarks);
    }

    /// Records a review decision for a document.
    ///
    /// With `remarks` unset, the pending remarks are used. A rejection without
    /// remarks fails with [`ReviewError::Validation`] before any request is
    /// made. On success the local claim mirrors the backend's answer.
    pub async fn submit_review(
        &self,
        document_id: &DocumentId,
        decision: ReviewDecision,
        remarks: Option<&str>,
    ) -> Result<ReviewResult, ReviewError> {
        let remarks = match remarks {
            Some(remarks) => remarks.to_string(),
            None => self.state.read().await.pending_review_remarks().to_string(),
        };
        let request = ReviewRequest::new(decision, &remarks)?;
        let (claim_id, _) = self.document(document_id).await?;
        let token = self.token().await?;

        let result = self
            .backend
            .submit_review(&token, &claim_id, document_id, &request)
            .await
            .map_err(|e| {
                warn!(claim_id = %claim_id, document_id = %document_id, error = %e, "Error reviewing document");
                ReviewError::from(e)
            })?;

        if let Err(e) = self
            .state
            .write()
            .await
            .review_applied(&claim_id, document_id, &result)
        {
            debug!(claim_id = %claim_id, error = %e, "Review accepted for a claim no longer loaded");
        }

        info!(
            claim_id = %claim_id,
            document_id = %document_id,
            decision = decision.as_str(),
            claim_status = ?result.claim_status,
            "Document reviewed"
        );
        Ok(result)
    }
}
