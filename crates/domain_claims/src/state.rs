//! Session-scoped review state
//!
//! All coordinator state lives in [`ReviewState`] and changes only through
//! the transition methods below, each applied once an operation's result is
//! known. Keyed maps are last-write-wins per document id.

use std::collections::{HashMap, HashSet};

use core_kernel::{ClaimId, DocumentId};

use crate::claim::Claim;
use crate::document::PreviewHandle;
use crate::error::ReviewError;
use crate::extraction::ExtractionOutcome;
use crate::review::ReviewResult;

#[derive(Debug, Clone, Default)]
pub struct ReviewState {
    claim: Option<Claim>,
    selected_document_id: Option<DocumentId>,
    resolved_previews: HashMap<DocumentId, PreviewHandle>,
    extraction_results: HashMap<DocumentId, ExtractionOutcome>,
    extraction_order: Vec<DocumentId>,
    extracting: HashSet<DocumentId>,
    last_extraction_status: Option<String>,
    pending_review_remarks: String,
}

impl ReviewState {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn claim(&self) -> Option<&Claim> {
        self.claim.as_ref()
    }

    pub fn claim_id(&self) -> Option<&ClaimId> {
        self.claim.as_ref().map(|c| &c.id)
    }

    pub fn selected_document_id(&self) -> Option<&DocumentId> {
        self.selected_document_id.as_ref()
    }

    pub fn preview(&self, document_id: &DocumentId) -> Option<&PreviewHandle> {
        self.resolved_previews.get(document_id)
    }

    pub fn extraction(&self, document_id: &DocumentId) -> Option<&ExtractionOutcome> {
        self.extraction_results.get(document_id)
    }

    pub fn extraction_order(&self) -> &[DocumentId] {
        &self.extraction_order
    }

    /// Extraction order restricted to documents of the current claim that
    /// are not exempt from extraction
    pub fn visible_extraction_order(&self) -> Vec<DocumentId> {
        let Some(claim) = self.claim.as_ref() else {
            return Vec::new();
        };
        self.extraction_order
            .iter()
            .filter(|id| {
                claim
                    .document(id)
                    .map(|d| !d.is_extraction_exempt())
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    pub fn is_extracting(&self, document_id: &DocumentId) -> bool {
        self.extracting.contains(document_id)
    }

    pub fn has_extraction_in_flight(&self) -> bool {
        !self.extracting.is_empty()
    }

    /// `running` while any extraction is in flight, otherwise the last reported status
    pub fn overall_extraction_status(&self) -> Option<&str> {
        if self.has_extraction_in_flight() {
            Some("running")
        } else {
            self.last_extraction_status.as_deref()
        }
    }

    pub fn pending_review_remarks(&self) -> &str {
        &self.pending_review_remarks
    }

    fn is_current_claim(&self, claim_id: &ClaimId) -> bool {
        self.claim_id() == Some(claim_id)
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Installs a freshly fetched claim.
    ///
    /// A different claim starts from a clean slate. Reloading the current
    /// claim keeps the selection and previews of documents that still exist
    /// but always drops extraction results. With nothing selected, the first
    /// document is selected.
    pub fn claim_loaded(&mut self, claim: Claim) {
        let same_claim = self.is_current_claim(&claim.id);

        if same_claim {
            self.resolved_previews.retain(|id, _| claim.contains_document(id));
            if let Some(selected) = &self.selected_document_id {
                if !claim.contains_document(selected) {
                    self.selected_document_id = None;
                }
            }
        } else {
            self.resolved_previews.clear();
            self.selected_document_id = None;
        }

        self.extraction_results.clear();
        self.extraction_order.clear();
        self.extracting.clear();
        self.last_extraction_status = None;

        let previous_selection = self.selected_document_id.clone();
        if self.selected_document_id.is_none() {
            self.selected_document_id = claim.first_document_id().cloned();
        }
        if !same_claim || previous_selection != self.selected_document_id {
            self.pending_review_remarks = self
                .selected_document_id
                .as_ref()
                .and_then(|id| claim.document(id))
                .and_then(|d| d.review_remarks.clone())
                .unwrap_or_default();
        }

        self.claim = Some(claim);
    }

    /// Marks a document as selected and loads its existing remarks for editing
    pub fn document_selected(&mut self, document_id: &DocumentId) -> Result<(), ReviewError> {
        let claim = self.claim.as_ref().ok_or(ReviewError::NoClaimLoaded)?;
        let document = claim.document(document_id).ok_or_else(|| ReviewError::UnknownDocument {
            claim_id: claim.id.clone(),
            document_id: document_id.clone(),
        })?;

        self.pending_review_remarks = document.review_remarks.clone().unwrap_or_default();
        self.selected_document_id = Some(document_id.clone());
        Ok(())
    }

    /// Memoizes a resolved preview; ignored if the claim changed meanwhile
    pub fn preview_resolved(
        &mut self,
        claim_id: &ClaimId,
        document_id: &DocumentId,
        handle: PreviewHandle,
    ) -> bool {
        if !self.is_current_claim(claim_id) {
            return false;
        }
        self.resolved_previews.insert(document_id.clone(), handle);
        true
    }

    pub fn preview_invalidated(&mut self, document_id: &DocumentId) -> Option<PreviewHandle> {
        self.resolved_previews.remove(document_id)
    }

    /// Marks a document as in flight; refused if the claim changed meanwhile
    pub fn extraction_started(&mut self, claim_id: &ClaimId, document_id: &DocumentId) -> bool {
        if !self.is_current_claim(claim_id) {
            return false;
        }
        self.extracting.insert(document_id.clone());
        true
    }

    /// Stores an extraction outcome under its document id.
    ///
    /// A later completion for the same document overwrites an earlier one.
    /// Results for a claim that is no longer loaded are dropped; loading that
    /// claim already cleared its in-flight markers.
    pub fn extraction_finished(
        &mut self,
        claim_id: &ClaimId,
        document_id: &DocumentId,
        outcome: ExtractionOutcome,
    ) -> bool {
        if !self.is_current_claim(claim_id) {
            return false;
        }
        self.extracting.remove(document_id);
        self.last_extraction_status = Some(outcome.status.clone());
        self.extraction_results.insert(document_id.clone(), outcome);
        if !self.extraction_order.contains(document_id) {
            self.extraction_order.push(document_id.clone());
        }
        true
    }

    /// Forgets any extraction state for an exempt document
    pub fn extraction_discarded(&mut self, document_id: &DocumentId) {
        self.extracting.remove(document_id);
        self.extraction_results.remove(document_id);
        self.extraction_order.retain(|id| id != document_id);
    }

    pub fn remarks_edited(&mut self, remarks: impl Into<String>) {
        self.pending_review_remarks = remarks.into();
    }

    /// Applies the backend's answer to a review.
    ///
    /// Either both the document and the claim status change, or nothing does.
    pub fn review_applied(
        &mut self,
        claim_id: &ClaimId,
        document_id: &DocumentId,
        result: &ReviewResult,
    ) -> Result<(), ReviewError> {
        let claim = self
            .claim
            .as_mut()
            .filter(|c| &c.id == claim_id)
            .ok_or(ReviewError::NoClaimLoaded)?;
        let document = claim
            .document_mut(document_id)
            .ok_or_else(|| ReviewError::UnknownDocument {
                claim_id: claim_id.clone(),
                document_id: document_id.clone(),
            })?;

        document.review_status = result.review_status;
        document.review_remarks = result.review_remarks.clone();
        claim.status = result.claim_status;

        if self.selected_document_id.as_ref() == Some(document_id) {
            self.pending_review_remarks = result.review_remarks.clone().unwrap_or_default();
        }
        Ok(())
    }
}
