//! Tests for the claim, document and review models

use rust_decimal_macros::dec;

use core_kernel::{DocumentId, PortError};
use domain_claims::{
    Claim, ClaimStatus, DocumentType, ExtractedField, ExtractionOutcome, ReviewDecision,
    ReviewError, ReviewRequest, ReviewResult, ReviewState, ReviewStatus, StorageLocator,
};
use test_utils::{ClaimBuilder, ClaimFixtures, DocumentBuilder};

// ============================================================================
// Document Tests
// ============================================================================

mod document_tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(DocumentType::HospitalBill.display_name(), "Hospital Bill");
        assert_eq!(DocumentType::Aadhaar.display_name(), "Aadhaar Card");
        assert_eq!(DocumentType::Pan.to_string(), "PAN Card");
    }

    #[test]
    fn test_bucket_names() {
        assert_eq!(DocumentType::HospitalBill.bucket_name(), "hospital_bills");
        assert_eq!(DocumentType::PharmacyBill.bucket_name(), "pharmacy_bills");
        assert_eq!(DocumentType::BirthCertificate.bucket_name(), "Birth_certificates");
    }

    #[test]
    fn test_document_type_wire_format() {
        let json = serde_json::to_string(&DocumentType::BirthCertificate).unwrap();
        assert_eq!(json, "\"birth_certificate\"");
    }

    #[test]
    fn test_locator_falls_back_to_storage_path() {
        let locator = StorageLocator::from_parts(Some("undefined"), Some("aadhaar"), Some("u/a.png"));
        assert_eq!(
            locator,
            Some(StorageLocator::StoragePath {
                bucket: "aadhaar".to_string(),
                path: "u/a.png".to_string(),
            })
        );
    }

    #[test]
    fn test_locator_absent_without_path() {
        assert_eq!(StorageLocator::from_parts(None, Some("pan"), None), None);
        assert_eq!(StorageLocator::from_parts(Some(""), None, Some("  ")), None);
    }

    #[test]
    fn test_builder_storage_path_uses_type_bucket() {
        let document = DocumentBuilder::new("doc2", DocumentType::Aadhaar)
            .with_storage_path("user-7/aadhaar.png")
            .build();
        assert_eq!(
            document.locator,
            Some(StorageLocator::StoragePath {
                bucket: "aadhaar".to_string(),
                path: "user-7/aadhaar.png".to_string(),
            })
        );
        assert_eq!(document.review_status, ReviewStatus::Pending);
    }
}

// ============================================================================
// Claim Tests
// ============================================================================

mod claim_tests {
    use super::*;

    #[test]
    fn test_new_claim_is_pending_and_empty() {
        let claim = Claim::new("CLM-3".parse().unwrap(), dec!(2500.50));
        assert_eq!(claim.status, ClaimStatus::Pending);
        assert!(claim.documents.is_empty());
        assert!(claim.first_document_id().is_none());
    }

    #[test]
    fn test_documents_keep_backend_order() {
        let claim = ClaimFixtures::clm_1();
        let ids: Vec<&str> = claim.documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["doc1", "doc2", "doc3"]);
        assert_eq!(claim.first_document_id(), Some(&DocumentId::new("doc1")));
    }

    #[test]
    fn test_document_lookup() {
        let mut claim = ClaimFixtures::clm_1();
        assert!(claim.contains_document(&DocumentId::new("doc3")));
        assert!(!claim.contains_document(&DocumentId::new("doc7")));

        claim.document_mut(&DocumentId::new("doc2")).unwrap().review_status = ReviewStatus::Approved;
        assert_eq!(
            claim.document(&DocumentId::new("doc2")).unwrap().review_status,
            ReviewStatus::Approved
        );
    }

    #[test]
    fn test_claim_status_wire_format() {
        let status: ClaimStatus = serde_json::from_str("\"under_review\"").unwrap();
        assert_eq!(status, ClaimStatus::UnderReview);
    }
}

// ============================================================================
// Review Tests
// ============================================================================

mod review_tests {
    use super::*;

    #[test]
    fn test_request_serializes_backend_shape() {
        let request = ReviewRequest::new(ReviewDecision::Rejected, "blurry image").unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"status": "rejected", "remarks": "blurry image"}));
    }

    #[test]
    fn test_approval_sends_empty_remarks() {
        let request = ReviewRequest::new(ReviewDecision::Approved, "fine").unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"status": "approved", "remarks": ""}));
    }

    #[test]
    fn test_rejection_error_message() {
        let err = ReviewRequest::new(ReviewDecision::Rejected, "  ").unwrap_err();
        assert_eq!(err.to_string(), "Please add remarks before rejecting.");
    }
}

// ============================================================================
// Error Tests
// ============================================================================

mod error_tests {
    use super::*;

    #[test]
    fn test_unauthorized_port_error_is_auth() {
        let err = ReviewError::from(PortError::unauthorized("Invalid token"));
        assert!(err.is_auth());
        assert_eq!(err.to_string(), "Invalid token");
    }

    #[test]
    fn test_rejected_port_error_keeps_status_and_detail() {
        let err = ReviewError::from(PortError::rejected(422, "Document already reviewed"));
        match err {
            ReviewError::Fetch { status, message } => {
                assert_eq!(status, Some(422));
                assert_eq!(message, "Document already reviewed");
            }
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[test]
    fn test_connection_error_has_no_status() {
        let err = ReviewError::from(PortError::connection("connection refused"));
        assert!(matches!(err, ReviewError::Fetch { status: None, .. }));
    }
}

// ============================================================================
// State Tests
// ============================================================================

mod state_tests {
    use super::*;

    fn loaded(claim: Claim) -> ReviewState {
        let mut state = ReviewState::new();
        state.claim_loaded(claim);
        state
    }

    #[test]
    fn test_visible_order_hides_exempt_and_foreign_documents() {
        let mut state = loaded(ClaimFixtures::clm_1());
        let claim_id = state.claim_id().cloned().unwrap();
        for doc in ["doc2", "doc3", "doc1"] {
            state.extraction_finished(
                &claim_id,
                &DocumentId::new(doc),
                ExtractionOutcome::completed(vec![ExtractedField::new("Name", "x", 0.5)]),
            );
        }

        assert_eq!(state.extraction_order().len(), 3);
        let visible: Vec<String> = state
            .visible_extraction_order()
            .iter()
            .map(|d| d.to_string())
            .collect();
        assert_eq!(visible, vec!["doc2", "doc1"]);
    }

    #[test]
    fn test_review_applied_for_other_claim_changes_nothing() {
        let mut state = loaded(ClaimFixtures::clm_1());
        let result = ReviewResult {
            review_status: ReviewStatus::Approved,
            review_remarks: None,
            claim_status: ClaimStatus::Approved,
        };

        let outcome = state.review_applied(&"CLM-2".parse().unwrap(), &DocumentId::new("doc1"), &result);

        assert!(outcome.is_err());
        let claim = state.claim().unwrap();
        assert_eq!(claim.status, ClaimStatus::Pending);
        assert_eq!(claim.documents[0].review_status, ReviewStatus::Pending);
    }

    #[test]
    fn test_review_applied_for_unknown_document_changes_nothing() {
        let mut state = loaded(ClaimBuilder::new("CLM-4").with_doc("doc1", DocumentType::Pan).build());
        let result = ReviewResult {
            review_status: ReviewStatus::Rejected,
            review_remarks: Some("torn".to_string()),
            claim_status: ClaimStatus::Rejected,
        };

        let outcome = state.review_applied(&"CLM-4".parse().unwrap(), &DocumentId::new("doc9"), &result);

        assert!(matches!(outcome, Err(ReviewError::UnknownDocument { .. })));
        assert_eq!(state.claim().unwrap().status, ClaimStatus::Pending);
    }
}

// ============================================================================
// Extraction Field Properties
// ============================================================================

mod extraction_properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_confidence_always_within_unit_range(raw in proptest::num::f64::ANY) {
            let field = ExtractedField::new("policy_number", "POL-1", raw);
            prop_assert!((0.0..=1.0).contains(&field.confidence));
        }

        #[test]
        fn prop_in_range_confidence_is_unchanged(raw in 0.0f64..=1.0) {
            prop_assert_eq!(ExtractedField::new("amount", "100", raw).confidence, raw);
        }

        #[test]
        fn prop_failed_outcome_keeps_message(message in "[A-Za-z0-9 :]{1,40}") {
            let outcome = ExtractionOutcome::failed(message.clone());
            prop_assert!(outcome.is_failure());
            prop_assert_eq!(outcome.error_message(), Some(message.as_str()));
        }
    }
}
