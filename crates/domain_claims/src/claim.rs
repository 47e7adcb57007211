//! Claim aggregate as seen by the reviewer

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, DocumentId, PolicyId};
use crate::document::Document;

/// Aggregate claim status, computed by the claims backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    #[default]
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

/// A claim and its supporting documents, in backend order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub policy_id: Option<PolicyId>,
    pub user_email: Option<String>,
    pub status: ClaimStatus,
    pub total_amount: Decimal,
    pub submitted_at: Option<String>,
    pub documents: Vec<Document>,
}

impl Claim {
    /// Creates a pending claim with no documents
    pub fn new(id: ClaimId, total_amount: Decimal) -> Self {
        Self {
            id,
            policy_id: None,
            user_email: None,
            status: ClaimStatus::Pending,
            total_amount,
            submitted_at: None,
            documents: Vec::new(),
        }
    }

    pub fn document(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| &d.id == id)
    }

    pub fn document_mut(&mut self, id: &DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| &d.id == id)
    }

    pub fn contains_document(&self, id: &DocumentId) -> bool {
        self.document(id).is_some()
    }

    /// First document in list order
    pub fn first_document_id(&self) -> Option<&DocumentId> {
        self.documents.first().map(|d| &d.id)
    }
}

/// Row in the admin claim queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSummary {
    pub claim_id: ClaimId,
    pub claim_status: ClaimStatus,
    pub total_amount: Decimal,
    pub submitted_at: Option<String>,
    pub user_email: Option<String>,
    pub document_count: usize,
}
