//! Custom Test Assertions
//!
//! Assertion helpers for review state that give more meaningful failure
//! messages than plain `assert_eq!`.

use core_kernel::DocumentId;
use domain_claims::{Claim, ExtractionOutcome, ReviewStatus, EXTRACTION_ERROR_FIELD};

/// Asserts that an outcome is a failure carrying exactly one synthetic error field
pub fn assert_single_error_field(outcome: &ExtractionOutcome) {
    assert_eq!(
        outcome.fields.len(),
        1,
        "Expected exactly one field in failed extraction, got {:?}",
        outcome.fields
    );
    assert_eq!(
        outcome.fields[0].field_name, EXTRACTION_ERROR_FIELD,
        "Expected synthetic error field, got {:?}",
        outcome.fields[0]
    );
    assert_eq!(outcome.fields[0].confidence, 0.0);
}

/// Asserts a document's review status and remarks within a claim
pub fn assert_document_review(
    claim: &Claim,
    document_id: &str,
    status: ReviewStatus,
    remarks: Option<&str>,
) {
    let id = DocumentId::new(document_id);
    let document = claim
        .document(&id)
        .unwrap_or_else(|| panic!("Document {} not found in claim {}", document_id, claim.id));
    assert_eq!(
        document.review_status, status,
        "Unexpected review status for {}",
        document_id
    );
    assert_eq!(
        document.review_remarks.as_deref(),
        remarks,
        "Unexpected review remarks for {}",
        document_id
    );
}
