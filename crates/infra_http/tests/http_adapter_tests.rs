//! HTTP adapter tests against a fake backend served by axum

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use core_kernel::{
    AccessToken, AdapterHealth, ClaimId, DocumentId, HealthCheckable, PolicyId, PortError,
};
use domain_claims::{
    ClaimStatus, ClaimsBackendPort, DocumentStorePort, ExtractionPort, ExtractionReport,
    PolicyDecision, PolicyReviewPort, PolicyStatus, PolicyStatusUpdate, ReviewCoordinator,
    ReviewDecision, ReviewRequest, ReviewStatus, StorageLocator,
};
use infra_http::{HttpClaimsBackend, HttpDocumentStore, ServiceConfig};
use test_utils::{assert_single_error_field, SessionFixtures};

const TOKEN: &str = "admin-token";
const BEARER: &str = "Bearer admin-token";

#[derive(Clone, Default)]
struct FakeBackend {
    base: String,
    authorizations: Arc<Mutex<Vec<Option<String>>>>,
}

impl FakeBackend {
    fn record(&self, headers: &HeaderMap) {
        let value = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.authorizations.lock().unwrap().push(value);
    }

    fn last_authorization(&self) -> Option<String> {
        self.authorizations.lock().unwrap().last().cloned().flatten()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(BEARER)
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Invalid or expired token"}))).into_response()
}

async fn list_claims(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "claims": [
            {
                "claim_id": "CLM-1",
                "user_email": "rajesh@example.com",
                "status": "under_review",
                "created_at": "2024-06-01T10:00:00Z",
                "document_count": 3
            },
            {"claim_id": 2, "status": "pending", "documents": [{}]}
        ]
    }))
    .into_response()
}

async fn claim_documents(
    State(fake): State<FakeBackend>,
    Path(claim_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    fake.record(&headers);
    if !authorized(&headers) {
        return unauthorized();
    }
    match claim_id.as_str() {
        "CLM-1" => Json(json!({
            "claim_id": "CLM-1",
            "claim_status": "pending",
            "total_amount": "15000.00",
            "submission_date": "2024-06-01",
            "documents": [
                {
                    "document_id": "doc1",
                    "document_type": "hospital_bill",
                    "signed_url": format!("{}/files/doc1.pdf", fake.base),
                    "original_filename": "bill.pdf",
                    "bucket_name": "hospital_bills",
                    "review_status": null
                },
                {
                    "document_id": "doc2",
                    "document_type": "aadhaar",
                    "signed_url": "",
                    "file_path": "user-7/aadhaar.png",
                    "bucket_name": "aadhaar"
                },
                {
                    "document_id": "doc3",
                    "document_type": "birth_certificate",
                    "signed_url": format!("{}/files/doc3.pdf", fake.base)
                }
            ]
        }))
        .into_response(),
        "CLM-500" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "database unavailable"})),
        )
            .into_response(),
        "CLM-BAD" => (StatusCode::OK, "not json").into_response(),
        "CLM-SLOW" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({"claim_id": "CLM-SLOW"})).into_response()
        }
        _ => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response(),
    }
}

async fn extract_document(
    Path((_claim_id, document_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    match document_id.as_str() {
        "doc1" => Json(json!({
            "extraction_status": "completed",
            "fields": [{"field_name": "Patient Name", "value": "Rajesh Kumar", "confidence": 0.97}]
        }))
        .into_response(),
        "doc2" => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Extraction failed", "details": "Unsupported file format"})),
        )
            .into_response(),
        _ => (StatusCode::TOO_MANY_REQUESTS, [(header::RETRY_AFTER, "7")], "slow down").into_response(),
    }
}

async fn review_document(
    Path((_claim_id, _document_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let status = body["status"].as_str().unwrap_or_default().to_string();
    let remarks = body["remarks"].as_str().unwrap_or_default().to_string();
    if status == "rejected" && remarks.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Remarks are required when rejecting"})),
        )
            .into_response();
    }
    Json(json!({
        "review_status": status,
        "review_remarks": if remarks.is_empty() { Value::Null } else { Value::String(remarks) },
        "claim_status": "under_review"
    }))
    .into_response()
}

async fn update_policy(Path(policy_id): Path<String>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if body["status"] == "rejected" && body["rejection_reason"].is_null() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"rejection_reason": ["This field is required."]})),
        )
            .into_response();
    }
    Json(json!({
        "id": policy_id.parse::<u64>().unwrap_or(0),
        "policy_number": "HLT-2024-0007",
        "status": body["status"],
        "rejection_reason": body["rejection_reason"]
    }))
    .into_response()
}

async fn sign_object(
    State(fake): State<FakeBackend>,
    Path((bucket, path)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    fake.record(&headers);
    if headers.get("apikey").and_then(|v| v.to_str().ok()) != Some("anon-key") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid API key"}))).into_response();
    }
    if body["expiresIn"] != 3600 {
        return (StatusCode::BAD_REQUEST, Json(json!({"message": "bad expiry"}))).into_response();
    }
    if path.contains("missing") {
        return (StatusCode::BAD_REQUEST, Json(json!({"message": "Object not found"}))).into_response();
    }
    Json(json!({"signedURL": format!("/object/sign/{}/{}?token=signed", bucket, path)})).into_response()
}

async fn signed_object(State(fake): State<FakeBackend>, headers: HeaderMap) -> Response {
    fake.record(&headers);
    ([(header::CONTENT_TYPE, "image/png")], vec![0x89u8, b'P', b'N', b'G']).into_response()
}

async fn file(State(fake): State<FakeBackend>, Path(name): Path<String>, headers: HeaderMap) -> Response {
    fake.record(&headers);
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    if name == "missing.pdf" {
        return StatusCode::NOT_FOUND.into_response();
    }
    ([(header::CONTENT_TYPE, "application/pdf")], format!("%PDF {}", name)).into_response()
}

async fn spawn_backend() -> (FakeBackend, ServiceConfig) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let fake = FakeBackend {
        base: base.clone(),
        ..Default::default()
    };

    let app = Router::new()
        .route("/api/admin/claims/", get(list_claims))
        .route("/api/admin/claims/:claim_id/review/", get(claim_documents))
        .route(
            "/api/admin/claims/:claim_id/documents/:document_id/extract/",
            post(extract_document),
        )
        .route(
            "/api/admin/claims/:claim_id/documents/:document_id/review/",
            post(review_document),
        )
        .route("/api/policies/:policy_id/update_status/", post(update_policy))
        .route(
            "/storage/v1/object/sign/:bucket/*path",
            post(sign_object).get(signed_object),
        )
        .route("/files/:name", get(file))
        .with_state(fake.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ServiceConfig {
        api_base_url: format!("{}/api/", base),
        storage_url: Some(format!("{}/storage/v1", base)),
        storage_api_key: Some("anon-key".to_string()),
        ..Default::default()
    };
    (fake, config)
}

fn token() -> AccessToken {
    AccessToken::new(TOKEN)
}

// ============================================================================
// Claims backend
// ============================================================================

#[tokio::test]
async fn test_list_claims() {
    let (_, config) = spawn_backend().await;
    let backend = HttpClaimsBackend::new(&config).unwrap();

    let claims = backend.list_claims(&token()).await.unwrap();

    assert_eq!(claims.len(), 2);
    assert_eq!(claims[0].claim_status, ClaimStatus::UnderReview);
    assert_eq!(claims[0].document_count, 3);
    assert_eq!(claims[1].claim_id.as_str(), "2");
    assert_eq!(claims[1].document_count, 1);
}

#[tokio::test]
async fn test_fetch_claim_maps_documents() {
    let (fake, config) = spawn_backend().await;
    let backend = HttpClaimsBackend::new(&config).unwrap();

    let claim = backend.fetch_claim(&token(), &ClaimId::new("CLM-1")).await.unwrap();

    assert_eq!(claim.status, ClaimStatus::Pending);
    assert_eq!(claim.total_amount.to_string(), "15000.00");
    assert_eq!(claim.documents.len(), 3);
    assert_eq!(
        claim.documents[1].locator,
        Some(StorageLocator::StoragePath {
            bucket: "aadhaar".to_string(),
            path: "user-7/aadhaar.png".to_string(),
        })
    );
    assert_eq!(fake.last_authorization(), Some(BEARER.to_string()));
}

#[tokio::test]
async fn test_fetch_claim_status_mapping() {
    let (_, config) = spawn_backend().await;
    let backend = HttpClaimsBackend::new(&config).unwrap();

    let err = backend.fetch_claim(&token(), &ClaimId::new("CLM-404")).await.unwrap_err();
    assert!(err.is_not_found());

    let err = backend.fetch_claim(&token(), &ClaimId::new("CLM-500")).await.unwrap_err();
    match err {
        PortError::ServiceUnavailable { service } => {
            assert_eq!(service, "Failed to fetch claim documents: database unavailable");
        }
        other => panic!("expected service unavailable, got {:?}", other),
    }

    let err = backend.fetch_claim(&token(), &ClaimId::new("CLM-BAD")).await.unwrap_err();
    assert!(matches!(err, PortError::Transformation { .. }));

    let err = backend
        .fetch_claim(&AccessToken::new("wrong"), &ClaimId::new("CLM-1"))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let (_, mut config) = spawn_backend().await;
    config.timeout_secs = Some(1);
    let backend = HttpClaimsBackend::new(&config).unwrap();

    let err = backend.fetch_claim(&token(), &ClaimId::new("CLM-SLOW")).await.unwrap_err();
    assert!(matches!(err, PortError::Timeout { .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_unreachable_backend_is_connection_error() {
    let config = ServiceConfig {
        api_base_url: "http://127.0.0.1:9/api".to_string(),
        ..Default::default()
    };
    let backend = HttpClaimsBackend::new(&config).unwrap();

    let err = backend.list_claims(&token()).await.unwrap_err();
    assert!(matches!(err, PortError::Connection { .. }));
}

#[tokio::test]
async fn test_health_check_reports_reachable_backend() {
    let (_, config) = spawn_backend().await;
    let backend = HttpClaimsBackend::new(&config).unwrap();

    let result = backend.health_check().await;

    assert_eq!(result.adapter_id, "http-claims-backend");
    assert_eq!(result.status, AdapterHealth::Healthy);
    assert!(result.message.is_none());
}

#[tokio::test]
async fn test_health_check_reports_unreachable_backend() {
    let config = ServiceConfig {
        api_base_url: "http://127.0.0.1:9/api".to_string(),
        ..Default::default()
    };
    let backend = HttpClaimsBackend::new(&config).unwrap();

    let result = backend.health_check().await;

    assert_eq!(result.status, AdapterHealth::Unhealthy);
    assert!(result.message.unwrap().starts_with("Backend unreachable"));
}

#[tokio::test]
async fn test_extraction_and_error_details() {
    let (_, config) = spawn_backend().await;
    let backend = HttpClaimsBackend::new(&config).unwrap();
    let claim_id = ClaimId::new("CLM-1");

    let outcome = backend
        .extract_document(&token(), &claim_id, &DocumentId::new("doc1"))
        .await
        .unwrap();
    assert_eq!(outcome.status, "completed");
    assert_eq!(outcome.fields.len(), 1);
    assert_eq!(outcome.fields[0].value, "Rajesh Kumar");

    let err = backend
        .extract_document(&token(), &claim_id, &DocumentId::new("doc2"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to extract document: Unsupported file format");
    assert_eq!(err.status(), Some(400));

    let err = backend
        .extract_document(&token(), &claim_id, &DocumentId::new("doc9"))
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::RateLimited { retry_after_secs: 7 }));
}

#[tokio::test]
async fn test_submit_review_round_trip() {
    let (_, config) = spawn_backend().await;
    let backend = HttpClaimsBackend::new(&config).unwrap();
    let request = ReviewRequest::new(ReviewDecision::Rejected, "blurry image").unwrap();

    let result = backend
        .submit_review(&token(), &ClaimId::new("CLM-1"), &DocumentId::new("doc1"), &request)
        .await
        .unwrap();

    assert_eq!(result.review_status, ReviewStatus::Rejected);
    assert_eq!(result.review_remarks.as_deref(), Some("blurry image"));
    assert_eq!(result.claim_status, ClaimStatus::UnderReview);
}

#[tokio::test]
async fn test_policy_status_update() {
    let (_, config) = spawn_backend().await;
    let backend = HttpClaimsBackend::new(&config).unwrap();
    let policy_id = PolicyId::new("17");

    let update = PolicyStatusUpdate::new(PolicyDecision::Rejected, Some("Expired policy")).unwrap();
    let record = backend.update_policy_status(&token(), &policy_id, &update).await.unwrap();

    assert_eq!(record.id, policy_id);
    assert_eq!(record.status, PolicyStatus::Rejected);
    assert_eq!(record.rejection_reason.as_deref(), Some("Expired policy"));

    let approve = PolicyStatusUpdate::new(PolicyDecision::Approved, None).unwrap();
    let record = backend.update_policy_status(&token(), &policy_id, &approve).await.unwrap();
    assert_eq!(record.status, PolicyStatus::Approved);
    assert_eq!(record.policy_number.as_deref(), Some("HLT-2024-0007"));
}

// ============================================================================
// Document store
// ============================================================================

#[tokio::test]
async fn test_signed_url_download_sends_bearer() {
    let (fake, config) = spawn_backend().await;
    let store = HttpDocumentStore::new(&config).unwrap();
    let locator = StorageLocator::SignedUrl {
        url: format!("{}/files/doc1.pdf", fake.base),
    };

    let preview = store.fetch_preview(&token(), &locator).await.unwrap();

    assert_eq!(preview.content_type(), Some("application/pdf"));
    assert_eq!(preview.bytes(), b"%PDF doc1.pdf");
    assert_eq!(fake.last_authorization(), Some(BEARER.to_string()));
}

#[tokio::test]
async fn test_download_failure_message() {
    let (fake, config) = spawn_backend().await;
    let store = HttpDocumentStore::new(&config).unwrap();
    let locator = StorageLocator::SignedUrl {
        url: format!("{}/files/missing.pdf", fake.base),
    };

    let err = store.fetch_preview(&token(), &locator).await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to fetch document: 404");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_storage_path_is_signed_then_downloaded() {
    let (_, config) = spawn_backend().await;
    let store = HttpDocumentStore::new(&config).unwrap();
    let locator = StorageLocator::StoragePath {
        bucket: "aadhaar".to_string(),
        path: "user-7/aadhaar.png".to_string(),
    };

    let preview = store.fetch_preview(&token(), &locator).await.unwrap();

    assert_eq!(preview.content_type(), Some("image/png"));
    assert_eq!(preview.len(), 4);
}

#[tokio::test]
async fn test_signing_failure_uses_storage_message() {
    let (_, config) = spawn_backend().await;
    let store = HttpDocumentStore::new(&config).unwrap();
    let locator = StorageLocator::StoragePath {
        bucket: "pan".to_string(),
        path: "user-7/missing.png".to_string(),
    };

    let err = store.fetch_preview(&token(), &locator).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to sign document URL: Object not found");
}

#[tokio::test]
async fn test_storage_path_without_storage_url_is_validation_error() {
    let (_, mut config) = spawn_backend().await;
    config.storage_url = None;
    let store = HttpDocumentStore::new(&config).unwrap();
    let locator = StorageLocator::StoragePath {
        bucket: "pan".to_string(),
        path: "x.png".to_string(),
    };

    let err = store.fetch_preview(&token(), &locator).await.unwrap_err();
    assert!(matches!(err, PortError::Validation { .. }));
}

// ============================================================================
// Coordinator over HTTP
// ============================================================================

#[tokio::test]
async fn test_review_flow_over_http() {
    let (_, config) = spawn_backend().await;
    let backend = Arc::new(HttpClaimsBackend::new(&config).unwrap());
    let store = Arc::new(HttpDocumentStore::new(&config).unwrap());
    let coordinator = ReviewCoordinator::new(
        backend.clone(),
        backend,
        store,
        Some(SessionFixtures::admin()),
    );

    coordinator.load_claim(&ClaimId::new("CLM-1")).await.unwrap();
    assert!(coordinator.snapshot().await.preview(&DocumentId::new("doc1")).is_some());

    let report = coordinator.select_document(&DocumentId::new("doc2")).await.unwrap();
    let ExtractionReport::Ran(outcome) = report.extraction else {
        panic!("expected extraction to run");
    };
    assert_single_error_field(&outcome);
    assert_eq!(
        outcome.error_message(),
        Some("Failed to extract document: Unsupported file format")
    );

    let report = coordinator.select_document(&DocumentId::new("doc3")).await.unwrap();
    assert_eq!(report.extraction, ExtractionReport::Exempt);

    let result = coordinator
        .submit_review(&DocumentId::new("doc1"), ReviewDecision::Rejected, Some("blurry image"))
        .await
        .unwrap();
    assert_eq!(result.claim_status, ClaimStatus::UnderReview);

    let state = coordinator.snapshot().await;
    let claim = state.claim().unwrap();
    assert_eq!(claim.status, ClaimStatus::UnderReview);
    assert_eq!(claim.documents[0].review_status, ReviewStatus::Rejected);
    assert_eq!(claim.documents[0].review_remarks.as_deref(), Some("blurry image"));
}
