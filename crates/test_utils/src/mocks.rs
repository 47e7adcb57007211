//! In-memory port implementations
//!
//! The mocks count every call so tests can assert that an operation never
//! reached the network. Extraction answers can be scripted per document or
//! deferred through a oneshot channel to stage completion order.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{oneshot, RwLock};

use core_kernel::{AccessToken, ClaimId, DocumentId, DomainPort, PolicyId, PortError, Session};
use domain_claims::{
    Claim, ClaimStatus, ClaimSummary, ClaimsBackendPort, DocumentStorePort, ExtractionOutcome,
    ExtractionPort, PolicyDecision, PolicyRecord, PolicyReviewPort, PolicyStatus,
    PolicyStatusUpdate, PreviewHandle, ReviewCoordinator, ReviewDecision, ReviewRequest,
    ReviewResult, ReviewStatus, StorageLocator,
};

/// A failure a mock should report, rebuilt as a fresh `PortError` per call
#[derive(Debug, Clone)]
pub enum MockFailure {
    Status(u16, String),
    Unauthorized,
    Connection(String),
}

impl MockFailure {
    fn to_port_error(&self) -> PortError {
        match self {
            MockFailure::Status(404, _) => PortError::not_found("Claim", "unknown"),
            MockFailure::Status(status, message) => PortError::rejected(*status, message.clone()),
            MockFailure::Unauthorized => PortError::unauthorized("Invalid or expired token"),
            MockFailure::Connection(message) => PortError::connection(message.clone()),
        }
    }
}

type DeferredExtraction = oneshot::Receiver<Result<ExtractionOutcome, PortError>>;

/// In-memory claims backend and extraction service
#[derive(Default)]
pub struct MockClaimsBackend {
    claims: RwLock<HashMap<ClaimId, Claim>>,
    extractions: RwLock<HashMap<DocumentId, Result<ExtractionOutcome, MockFailure>>>,
    deferred: Mutex<HashMap<DocumentId, VecDeque<DeferredExtraction>>>,
    review_responses: RwLock<HashMap<DocumentId, Result<ReviewResult, MockFailure>>>,
    fetch_failure: RwLock<Option<MockFailure>>,
    reviews: Mutex<Vec<(DocumentId, ReviewRequest)>>,
    seen_tokens: Mutex<Vec<String>>,
    fetch_calls: AtomicUsize,
    list_calls: AtomicUsize,
    extract_calls: AtomicUsize,
    review_calls: AtomicUsize,
}

impl MockClaimsBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates with claims
    pub async fn with_claims(claims: Vec<Claim>) -> Self {
        let backend = Self::new();
        for claim in claims {
            backend.claims.write().await.insert(claim.id.clone(), claim);
        }
        backend
    }

    /// Scripts the extraction answer for a document
    pub async fn script_extraction(&self, document_id: &str, outcome: ExtractionOutcome) {
        self.extractions
            .write()
            .await
            .insert(DocumentId::new(document_id), Ok(outcome));
    }

    /// Scripts an extraction failure for a document
    pub async fn fail_extraction(&self, document_id: &str, failure: MockFailure) {
        self.extractions
            .write()
            .await
            .insert(DocumentId::new(document_id), Err(failure));
    }

    /// Queues a deferred answer for the next extraction of a document.
    ///
    /// The call blocks until the returned sender is used.
    pub fn defer_extraction(
        &self,
        document_id: &str,
    ) -> oneshot::Sender<Result<ExtractionOutcome, PortError>> {
        let (tx, rx) = oneshot::channel();
        self.deferred
            .lock()
            .expect("deferred queue poisoned")
            .entry(DocumentId::new(document_id))
            .or_default()
            .push_back(rx);
        tx
    }

    /// Scripts the backend's answer to a review of a document
    pub async fn script_review(&self, document_id: &str, result: ReviewResult) {
        self.review_responses
            .write()
            .await
            .insert(DocumentId::new(document_id), Ok(result));
    }

    pub async fn fail_review(&self, document_id: &str, failure: MockFailure) {
        self.review_responses
            .write()
            .await
            .insert(DocumentId::new(document_id), Err(failure));
    }

    /// Makes every claim fetch fail
    pub async fn fail_fetch(&self, failure: MockFailure) {
        *self.fetch_failure.write().await = Some(failure);
    }

    pub async fn clear_fetch_failure(&self) {
        *self.fetch_failure.write().await = None;
    }

    /// Replaces a stored claim
    pub async fn put_claim(&self, claim: Claim) {
        self.claims.write().await.insert(claim.id.clone(), claim);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn extract_calls(&self) -> usize {
        self.extract_calls.load(Ordering::SeqCst)
    }

    pub fn review_calls(&self) -> usize {
        self.review_calls.load(Ordering::SeqCst)
    }

    /// Total calls of any kind
    pub fn total_calls(&self) -> usize {
        self.fetch_calls() + self.list_calls() + self.extract_calls() + self.review_calls()
    }

    /// Reviews received, in order
    pub fn reviews(&self) -> Vec<(DocumentId, ReviewRequest)> {
        self.reviews.lock().expect("review log poisoned").clone()
    }

    /// Bearer tokens received, in order
    pub fn seen_tokens(&self) -> Vec<String> {
        self.seen_tokens.lock().expect("token log poisoned").clone()
    }

    fn record_token(&self, token: &AccessToken) {
        self.seen_tokens
            .lock()
            .expect("token log poisoned")
            .push(token.as_str().to_string());
    }

    fn next_deferred(&self, document_id: &DocumentId) -> Option<DeferredExtraction> {
        self.deferred
            .lock()
            .expect("deferred queue poisoned")
            .get_mut(document_id)
            .and_then(VecDeque::pop_front)
    }

    /// Backend-side rule for the aggregate claim status
    fn aggregate_status(claim: &Claim) -> ClaimStatus {
        let statuses: Vec<ReviewStatus> = claim.documents.iter().map(|d| d.review_status).collect();
        if !statuses.is_empty() && statuses.iter().all(|s| *s == ReviewStatus::Approved) {
            ClaimStatus::Approved
        } else if statuses.iter().any(|s| *s != ReviewStatus::Pending) {
            ClaimStatus::UnderReview
        } else {
            ClaimStatus::Pending
        }
    }
}

impl DomainPort for MockClaimsBackend {}

#[async_trait]
impl ClaimsBackendPort for MockClaimsBackend {
    async fn list_claims(&self, token: &AccessToken) -> Result<Vec<ClaimSummary>, PortError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.record_token(token);
        let claims = self.claims.read().await;
        let mut summaries: Vec<ClaimSummary> = claims
            .values()
            .map(|c| ClaimSummary {
                claim_id: c.id.clone(),
                claim_status: c.status,
                total_amount: c.total_amount,
                submitted_at: c.submitted_at.clone(),
                user_email: c.user_email.clone(),
                document_count: c.documents.len(),
            })
            .collect();
        summaries.sort_by(|a, b| a.claim_id.cmp(&b.claim_id));
        Ok(summaries)
    }

    async fn fetch_claim(&self, token: &AccessToken, claim_id: &ClaimId) -> Result<Claim, PortError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.record_token(token);
        if let Some(failure) = self.fetch_failure.read().await.as_ref() {
            return Err(failure.to_port_error());
        }
        self.claims
            .read()
            .await
            .get(claim_id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Claim", claim_id))
    }

    async fn submit_review(
        &self,
        token: &AccessToken,
        claim_id: &ClaimId,
        document_id: &DocumentId,
        request: &ReviewRequest,
    ) -> Result<ReviewResult, PortError> {
        self.review_calls.fetch_add(1, Ordering::SeqCst);
        self.record_token(token);
        self.reviews
            .lock()
            .expect("review log poisoned")
            .push((document_id.clone(), request.clone()));

        if let Some(scripted) = self.review_responses.read().await.get(document_id) {
            return scripted.clone().map_err(|f| f.to_port_error());
        }

        let mut claims = self.claims.write().await;
        let claim = claims
            .get_mut(claim_id)
            .ok_or_else(|| PortError::not_found("Claim", claim_id))?;
        let document = claim
            .document_mut(document_id)
            .ok_or_else(|| PortError::not_found("Document", document_id))?;

        document.review_status = match request.decision() {
            ReviewDecision::Approved => ReviewStatus::Approved,
            ReviewDecision::Rejected => ReviewStatus::Rejected,
        };
        document.review_remarks = Some(request.remarks().to_string()).filter(|r| !r.is_empty());
        let result_remarks = document.review_remarks.clone();
        let result_status = document.review_status;
        claim.status = Self::aggregate_status(claim);

        Ok(ReviewResult {
            review_status: result_status,
            review_remarks: result_remarks,
            claim_status: claim.status,
        })
    }
}

#[async_trait]
impl ExtractionPort for MockClaimsBackend {
    async fn extract_document(
        &self,
        token: &AccessToken,
        _claim_id: &ClaimId,
        document_id: &DocumentId,
    ) -> Result<ExtractionOutcome, PortError> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        self.record_token(token);

        if let Some(rx) = self.next_deferred(document_id) {
            return rx
                .await
                .unwrap_or_else(|_| Err(PortError::internal("deferred extraction dropped")));
        }

        match self.extractions.read().await.get(document_id) {
            Some(Ok(outcome)) => Ok(outcome.clone()),
            Some(Err(failure)) => Err(failure.to_port_error()),
            None => Ok(ExtractionOutcome::completed(Vec::new())),
        }
    }
}

/// In-memory document store; the preview bytes are the locator's text
#[derive(Default)]
pub struct MockDocumentStore {
    failing: RwLock<HashMap<String, MockFailure>>,
    held: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    calls: Mutex<Vec<StorageLocator>>,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes fetches of a given URL or storage path fail
    pub async fn fail_locator(&self, key: &str, failure: MockFailure) {
        self.failing.write().await.insert(key.to_string(), failure);
    }

    /// Holds the next fetch of `key` until the returned sender fires or drops
    pub fn hold_locator(&self, key: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.held
            .lock()
            .expect("held fetches poisoned")
            .insert(key.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().expect("call log poisoned").len()
    }

    /// Fetches of locators whose URL or path equals `key`
    pub fn calls_for(&self, key: &str) -> usize {
        self.calls
            .lock()
            .expect("call log poisoned")
            .iter()
            .filter(|l| Self::key(l) == key)
            .count()
    }

    fn key(locator: &StorageLocator) -> &str {
        match locator {
            StorageLocator::SignedUrl { url } => url,
            StorageLocator::StoragePath { path, .. } => path,
        }
    }
}

impl DomainPort for MockDocumentStore {}

#[async_trait]
impl DocumentStorePort for MockDocumentStore {
    async fn fetch_preview(
        &self,
        _token: &AccessToken,
        locator: &StorageLocator,
    ) -> Result<PreviewHandle, PortError> {
        self.calls.lock().expect("call log poisoned").push(locator.clone());
        let key = Self::key(locator);
        let held = self.held.lock().expect("held fetches poisoned").remove(key);
        if let Some(release) = held {
            let _ = release.await;
        }
        if let Some(failure) = self.failing.read().await.get(key) {
            return Err(failure.to_port_error());
        }
        Ok(PreviewHandle::new(
            Some("application/pdf".to_string()),
            key.as_bytes().to_vec(),
        ))
    }
}

/// In-memory policy backend
#[derive(Default)]
pub struct MockPolicyBackend {
    policies: RwLock<HashMap<PolicyId, PolicyRecord>>,
    calls: AtomicUsize,
    unauthorized: AtomicBool,
}

impl MockPolicyBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_pending_policy(id: &str, policy_number: &str) -> Self {
        let backend = Self::new();
        backend.policies.write().await.insert(
            PolicyId::new(id),
            PolicyRecord {
                id: PolicyId::new(id),
                policy_number: Some(policy_number.to_string()),
                status: PolicyStatus::Pending,
                rejection_reason: None,
            },
        );
        backend
    }

    /// Makes every call answer 401
    pub fn reject_tokens(&self) {
        self.unauthorized.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DomainPort for MockPolicyBackend {}

#[async_trait]
impl PolicyReviewPort for MockPolicyBackend {
    async fn update_policy_status(
        &self,
        _token: &AccessToken,
        policy_id: &PolicyId,
        update: &PolicyStatusUpdate,
    ) -> Result<PolicyRecord, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unauthorized.load(Ordering::SeqCst) {
            return Err(MockFailure::Unauthorized.to_port_error());
        }
        let mut policies = self.policies.write().await;
        let record = policies
            .get_mut(policy_id)
            .ok_or_else(|| PortError::not_found("Policy", policy_id))?;
        record.status = match update.decision() {
            PolicyDecision::Approved => PolicyStatus::Approved,
            PolicyDecision::Rejected => PolicyStatus::Rejected,
        };
        record.rejection_reason = update.rejection_reason().map(str::to_string);
        Ok(record.clone())
    }
}

/// A coordinator wired to fresh mocks
pub struct ReviewHarness {
    pub backend: Arc<MockClaimsBackend>,
    pub store: Arc<MockDocumentStore>,
    pub coordinator: ReviewCoordinator,
}

impl ReviewHarness {
    pub async fn new(claims: Vec<Claim>, session: Option<Session>) -> Self {
        let backend = Arc::new(MockClaimsBackend::with_claims(claims).await);
        let store = Arc::new(MockDocumentStore::new());
        let coordinator = ReviewCoordinator::new(
            backend.clone(),
            backend.clone(),
            store.clone(),
            session,
        );
        Self {
            backend,
            store,
            coordinator,
        }
    }
}
