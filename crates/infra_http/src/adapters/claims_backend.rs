//! REST Claims Backend Adapter
//!
//! One adapter serves the claims backend, the extraction service and policy
//! approval, since all three live behind the same admin API:
//!
//! | Operation | Request |
//! |---|---|
//! | list claims | `GET /admin/claims/` |
//! | fetch claim | `GET /admin/claims/{claim}/review/` |
//! | extract document | `POST /admin/claims/{claim}/documents/{doc}/extract/` |
//! | review document | `POST /admin/claims/{claim}/documents/{doc}/review/` |
//! | update policy | `POST /policies/{policy}/update_status/` |

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::{debug, instrument};

use core_kernel::{
    AccessToken, AdapterHealth, ClaimId, DocumentId, DomainPort, HealthCheckResult,
    HealthCheckable, PolicyId, PortError,
};
use domain_claims::{
    Claim, ClaimSummary, ClaimsBackendPort, ExtractionOutcome, ExtractionPort, PolicyRecord,
    PolicyReviewPort, PolicyStatusUpdate, ReviewRequest, ReviewResult,
};

use crate::client::{
    ApiClient, Endpoint, EXTRACTION_DETAIL_KEYS, POLICY_DETAIL_KEYS, READ_DETAIL_KEYS,
    REVIEW_DETAIL_KEYS,
};
use crate::config::ServiceConfig;
use crate::dto::{
    ClaimDocumentsResponse, ClaimListResponse, ExtractionResponse, PolicyResponse, ReviewResponse,
};
use crate::error::HttpError;

const ADAPTER_ID: &str = "http-claims-backend";

/// HTTP implementation of the claims backend, extraction and policy ports
#[derive(Debug, Clone)]
pub struct HttpClaimsBackend {
    client: ApiClient,
}

impl HttpClaimsBackend {
    pub fn new(config: &ServiceConfig) -> Result<Self, HttpError> {
        Ok(Self::with_client(ApiClient::new(config.http_client()?, config.api_base())))
    }

    pub fn with_client(client: ApiClient) -> Self {
        Self { client }
    }
}

impl DomainPort for HttpClaimsBackend {}

#[async_trait]
impl HealthCheckable for HttpClaimsBackend {
    /// Any HTTP answer below 500 counts as reachable; the check sends no token
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();
        let result = self.client.http().get(self.client.url("/")).send().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(response) if !response.status().is_server_error() => (AdapterHealth::Healthy, None),
            Ok(response) => (
                AdapterHealth::Degraded,
                Some(format!("Backend answered {}", response.status().as_u16())),
            ),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Backend unreachable: {}", e))),
        };

        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl ClaimsBackendPort for HttpClaimsBackend {
    #[instrument(skip(self, token))]
    async fn list_claims(&self, token: &AccessToken) -> Result<Vec<ClaimSummary>, PortError> {
        let endpoint = Endpoint {
            action: "fetch claims",
            entity_type: "Claim queue",
            entity_id: "admin",
            detail_keys: READ_DETAIL_KEYS,
        };
        let response: ClaimListResponse = self.client.get_json(token, "/admin/claims/", endpoint).await?;
        debug!(count = response.claims.len(), "Fetched claim queue");
        Ok(response.claims.into_iter().map(|c| c.into_summary()).collect())
    }

    #[instrument(skip(self, token), fields(claim_id = %claim_id))]
    async fn fetch_claim(&self, token: &AccessToken, claim_id: &ClaimId) -> Result<Claim, PortError> {
        let endpoint = Endpoint {
            action: "fetch claim documents",
            entity_type: "Claim",
            entity_id: claim_id.as_str(),
            detail_keys: READ_DETAIL_KEYS,
        };
        let path = format!("/admin/claims/{}/review/", claim_id);
        let response: ClaimDocumentsResponse = self.client.get_json(token, &path, endpoint).await?;
        let claim = response.into_claim();
        debug!(documents = claim.documents.len(), "Fetched claim documents");
        Ok(claim)
    }

    #[instrument(skip(self, token, request), fields(claim_id = %claim_id, document_id = %document_id, decision = request.decision().as_str()))]
    async fn submit_review(
        &self,
        token: &AccessToken,
        claim_id: &ClaimId,
        document_id: &DocumentId,
        request: &ReviewRequest,
    ) -> Result<ReviewResult, PortError> {
        let endpoint = Endpoint {
            action: "review document",
            entity_type: "Document",
            entity_id: document_id.as_str(),
            detail_keys: REVIEW_DETAIL_KEYS,
        };
        let path = format!("/admin/claims/{}/documents/{}/review/", claim_id, document_id);
        let response: ReviewResponse = self.client.post_json(token, &path, request, endpoint).await?;
        response.into_result()
    }
}

#[async_trait]
impl ExtractionPort for HttpClaimsBackend {
    #[instrument(skip(self, token), fields(claim_id = %claim_id, document_id = %document_id))]
    async fn extract_document(
        &self,
        token: &AccessToken,
        claim_id: &ClaimId,
        document_id: &DocumentId,
    ) -> Result<ExtractionOutcome, PortError> {
        let endpoint = Endpoint {
            action: "extract document",
            entity_type: "Document",
            entity_id: document_id.as_str(),
            detail_keys: EXTRACTION_DETAIL_KEYS,
        };
        let path = format!("/admin/claims/{}/documents/{}/extract/", claim_id, document_id);
        let response: ExtractionResponse = self
            .client
            .post_json(token, &path, &json!({}), endpoint)
            .await?;
        let outcome = response.into_outcome();
        debug!(status = %outcome.status, fields = outcome.fields.len(), "Extraction answered");
        Ok(outcome)
    }
}

#[async_trait]
impl PolicyReviewPort for HttpClaimsBackend {
    #[instrument(skip(self, token, update), fields(policy_id = %policy_id))]
    async fn update_policy_status(
        &self,
        token: &AccessToken,
        policy_id: &PolicyId,
        update: &PolicyStatusUpdate,
    ) -> Result<PolicyRecord, PortError> {
        let endpoint = Endpoint {
            action: "update policy status",
            entity_type: "Policy",
            entity_id: policy_id.as_str(),
            detail_keys: POLICY_DETAIL_KEYS,
        };
        let path = format!("/policies/{}/update_status/", policy_id);
        let response: PolicyResponse = self.client.post_json(token, &path, update, endpoint).await?;
        Ok(response.into_record(policy_id))
    }
}
