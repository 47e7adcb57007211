//! Wire shapes of the claims backend
//!
//! The backend is loose about optional fields, so every DTO accepts missing
//! or `null` values and the conversions fill in documented defaults.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use core_kernel::{ClaimId, DocumentId, PolicyId, PortError};
use domain_claims::{
    Claim, ClaimStatus, ClaimSummary, Document, DocumentType, ExtractedField, ExtractionOutcome,
    PolicyRecord, PolicyStatus, ReviewResult, ReviewStatus, StorageLocator,
};
use domain_claims::extraction::STATUS_COMPLETED;

use crate::client::scalar_text;

/// Parses a claim status, tolerating case and spacing variants
pub fn parse_claim_status(raw: Option<&str>) -> ClaimStatus {
    match raw.map(normalize).as_deref() {
        Some("under_review") | Some("in_review") | Some("reviewing") => ClaimStatus::UnderReview,
        Some("approved") => ClaimStatus::Approved,
        Some("rejected") => ClaimStatus::Rejected,
        _ => ClaimStatus::Pending,
    }
}

/// Parses a document review status; missing or `null` means pending
pub fn parse_review_status(raw: Option<&str>) -> ReviewStatus {
    match raw.map(normalize).as_deref() {
        Some("approved") => ReviewStatus::Approved,
        Some("rejected") => ReviewStatus::Rejected,
        _ => ReviewStatus::Pending,
    }
}

fn parse_policy_status(raw: Option<&str>) -> PolicyStatus {
    match raw.map(normalize).as_deref() {
        Some("approved") => PolicyStatus::Approved,
        Some("rejected") => PolicyStatus::Rejected,
        _ => PolicyStatus::Pending,
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace([' ', '-'], "_")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Claim queue
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ClaimListResponse {
    #[serde(default)]
    pub claims: Vec<ClaimListItem>,
}

#[derive(Debug, Deserialize)]
pub struct ClaimListItem {
    pub claim_id: ClaimId,
    #[serde(default, alias = "claim_status")]
    pub status: Option<String>,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    #[serde(default, alias = "submission_date")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub document_count: Option<usize>,
    #[serde(default)]
    pub documents: Vec<Value>,
}

impl ClaimListItem {
    pub fn into_summary(self) -> ClaimSummary {
        ClaimSummary {
            claim_id: self.claim_id,
            claim_status: parse_claim_status(self.status.as_deref()),
            total_amount: self.total_amount.unwrap_or(Decimal::ZERO),
            submitted_at: non_empty(self.created_at),
            user_email: non_empty(self.user_email),
            document_count: self.document_count.unwrap_or(self.documents.len()),
        }
    }
}

// ============================================================================
// Claim documents
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ClaimDocumentsResponse {
    pub claim_id: ClaimId,
    #[serde(default)]
    pub claim_status: Option<String>,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub submission_date: Option<String>,
    #[serde(default)]
    pub policy_id: Option<PolicyId>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub documents: Vec<DocumentDto>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentDto {
    pub document_id: DocumentId,
    pub document_type: String,
    #[serde(default)]
    pub signed_url: Option<String>,
    #[serde(default)]
    pub bucket_name: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub review_status: Option<String>,
    #[serde(default)]
    pub review_remarks: Option<String>,
}

impl DocumentDto {
    pub fn into_document(self) -> Document {
        let document_type = DocumentType::from_wire(&self.document_type);
        let bucket = self
            .bucket_name
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or(document_type.bucket_name());
        let locator = StorageLocator::from_parts(
            self.signed_url.as_deref(),
            Some(bucket),
            self.file_path.as_deref(),
        );

        let mut document = Document::new(self.document_id, document_type);
        document.locator = locator;
        document.original_filename = non_empty(self.original_filename);
        document.uploaded_at = non_empty(self.upload_date);
        document.review_status = parse_review_status(self.review_status.as_deref());
        document.review_remarks = non_empty(self.review_remarks);
        document
    }
}

impl ClaimDocumentsResponse {
    pub fn into_claim(self) -> Claim {
        let mut claim = Claim::new(self.claim_id, self.total_amount.unwrap_or(Decimal::ZERO));
        claim.status = parse_claim_status(self.claim_status.as_deref());
        claim.submitted_at = non_empty(self.submission_date);
        claim.policy_id = self.policy_id;
        claim.user_email = non_empty(self.user_email);
        claim.documents = self.documents.into_iter().map(DocumentDto::into_document).collect();
        claim
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Extraction answer; `fields` is kept raw because its shape is not guaranteed
#[derive(Debug, Default, Deserialize)]
pub struct ExtractionResponse {
    #[serde(default)]
    pub extraction_status: Option<String>,
    #[serde(default)]
    pub fields: Value,
}

impl ExtractionResponse {
    /// Missing or non-array `fields` yield no fields; entries without a name are skipped
    pub fn into_outcome(self) -> ExtractionOutcome {
        let fields = self
            .fields
            .as_array()
            .map(|items| items.iter().filter_map(field_from_value).collect())
            .unwrap_or_default();
        let status = non_empty(self.extraction_status).unwrap_or_else(|| STATUS_COMPLETED.to_string());
        ExtractionOutcome::with_status(status, fields)
    }
}

fn field_from_value(item: &Value) -> Option<ExtractedField> {
    let name = item.get("field_name").and_then(scalar_text)?;
    let value = item.get("value").and_then(scalar_text).unwrap_or_default();
    let confidence = match item.get("confidence") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    Some(ExtractedField::new(name, value, confidence))
}

// ============================================================================
// Reviews
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ReviewResponse {
    #[serde(default)]
    pub review_status: Option<String>,
    #[serde(default)]
    pub review_remarks: Option<String>,
    #[serde(default)]
    pub claim_status: Option<String>,
}

impl ReviewResponse {
    pub fn into_result(self) -> Result<ReviewResult, PortError> {
        let claim_status = self
            .claim_status
            .ok_or_else(|| PortError::transformation("Review response is missing claim_status"))?;
        Ok(ReviewResult {
            review_status: parse_review_status(self.review_status.as_deref()),
            review_remarks: non_empty(self.review_remarks),
            claim_status: parse_claim_status(Some(&claim_status)),
        })
    }
}

// ============================================================================
// Policies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PolicyResponse {
    #[serde(default)]
    pub id: Option<PolicyId>,
    #[serde(default)]
    pub policy_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

impl PolicyResponse {
    /// Falls back to the requested id when the backend omits it
    pub fn into_record(self, requested: &PolicyId) -> PolicyRecord {
        PolicyRecord {
            id: self.id.unwrap_or_else(|| requested.clone()),
            policy_number: non_empty(self.policy_number),
            status: parse_policy_status(self.status.as_deref()),
            rejection_reason: non_empty(self.rejection_reason),
        }
    }
}
