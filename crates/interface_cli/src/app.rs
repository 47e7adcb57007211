//! Command execution

use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use core_kernel::{ClaimId, Session};
use domain_claims::{
    ClaimsBackendPort, Document, DocumentStorePort, DocumentType, ExtractionPort,
    PolicyReviewPort, PolicyReviewService, ReviewCoordinator, ReviewStatus,
};
use infra_http::{HttpClaimsBackend, HttpDocumentStore, ServiceConfig};

use crate::command::{Command, USAGE};
use crate::error::CliError;

/// Document row of `show`
#[derive(Debug, Serialize)]
struct DocumentView<'a> {
    id: &'a str,
    document_type: DocumentType,
    display_name: &'static str,
    original_filename: Option<&'a str>,
    review_status: ReviewStatus,
    review_remarks: Option<&'a str>,
    extraction_exempt: bool,
    has_file: bool,
}

impl<'a> From<&'a Document> for DocumentView<'a> {
    fn from(document: &'a Document) -> Self {
        Self {
            id: document.id.as_str(),
            document_type: document.document_type,
            display_name: document.document_type.display_name(),
            original_filename: document.original_filename.as_deref(),
            review_status: document.review_status,
            review_remarks: document.review_remarks.as_deref(),
            extraction_exempt: document.is_extraction_exempt(),
            has_file: document.locator.is_some(),
        }
    }
}

/// Wires the coordinator and policy service to their ports
pub struct ReviewApp {
    coordinator: ReviewCoordinator,
    policies: PolicyReviewService,
    session: Option<Session>,
}

impl ReviewApp {
    /// Builds the HTTP adapters from configuration
    pub fn from_config(config: &ServiceConfig, session: Option<Session>) -> Result<Self, CliError> {
        let backend = Arc::new(
            HttpClaimsBackend::new(config).map_err(|e| CliError::Setup(e.to_string()))?,
        );
        let store = Arc::new(
            HttpDocumentStore::new(config).map_err(|e| CliError::Setup(e.to_string()))?,
        );
        Ok(Self::with_ports(backend.clone(), backend.clone(), store, backend, session))
    }

    pub fn with_ports(
        backend: Arc<dyn ClaimsBackendPort>,
        extractor: Arc<dyn ExtractionPort>,
        store: Arc<dyn DocumentStorePort>,
        policies: Arc<dyn PolicyReviewPort>,
        session: Option<Session>,
    ) -> Self {
        Self {
            coordinator: ReviewCoordinator::new(backend, extractor, store, session.clone()),
            policies: PolicyReviewService::new(policies),
            session,
        }
    }

    pub fn coordinator(&self) -> &ReviewCoordinator {
        &self.coordinator
    }

    /// Runs one command and returns its JSON output
    pub async fn run(&self, command: Command) -> Result<Value, CliError> {
        match command {
            Command::Help => Ok(json!({ "usage": USAGE })),
            Command::List => {
                let claims = self.coordinator.list_claims().await?;
                info!(count = claims.len(), "Listed claims");
                Ok(json!({ "claims": claims }))
            }
            Command::Show { claim_id } => self.show(&claim_id).await,
            Command::Extract {
                claim_id,
                document_id,
            } => {
                self.coordinator.load_claim(&claim_id).await?;
                let report = self.coordinator.select_document(&document_id).await?;
                Ok(serde_json::to_value(report)?)
            }
            Command::Review {
                claim_id,
                document_id,
                decision,
                remarks,
            } => {
                self.coordinator.load_claim(&claim_id).await?;
                let result = self
                    .coordinator
                    .submit_review(&document_id, decision, Some(&remarks))
                    .await?;
                Ok(serde_json::to_value(result)?)
            }
            Command::Policy {
                policy_id,
                decision,
                reason,
            } => {
                let record = self
                    .policies
                    .review_policy(self.session.as_ref(), &policy_id, decision, reason.as_deref())
                    .await?;
                Ok(serde_json::to_value(record)?)
            }
        }
    }

    async fn show(&self, claim_id: &ClaimId) -> Result<Value, CliError> {
        let claim = self.coordinator.load_claim(claim_id).await?;
        let documents: Vec<DocumentView<'_>> = claim.documents.iter().map(DocumentView::from).collect();
        Ok(json!({
            "claim_id": claim.id,
            "claim_status": claim.status,
            "total_amount": claim.total_amount,
            "submitted_at": claim.submitted_at,
            "user_email": claim.user_email,
            "documents": documents,
        }))
    }
}
