//! Pre-built Test Fixtures

use chrono::{Duration, Utc};

use core_kernel::{AccessToken, Session, UserId, UserRole};
use domain_claims::{Claim, DocumentType, ExtractedField, ExtractionOutcome};

use crate::builders::{ClaimBuilder, DocumentBuilder};

/// Fixture for operator sessions
pub struct SessionFixtures;

impl SessionFixtures {
    /// An admin session valid for another hour
    pub fn admin() -> Session {
        Session::new(UserId::new("admin-1"), UserRole::Admin, AccessToken::new("admin-token"))
            .with_email("admin@example.com")
            .expiring_at(Utc::now() + Duration::hours(1))
    }

    /// An admin session whose token expired an hour ago
    pub fn expired_admin() -> Session {
        Session::new(UserId::new("admin-1"), UserRole::Admin, AccessToken::new("stale-token"))
            .expiring_at(Utc::now() - Duration::hours(1))
    }

    /// A second admin, used for session swaps
    pub fn other_admin() -> Session {
        Session::new(UserId::new("admin-2"), UserRole::Admin, AccessToken::new("other-token"))
    }
}

/// Fixture for claims
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// `CLM-1` with `[hospital_bill:doc1, aadhaar:doc2, birth_certificate:doc3]`
    pub fn clm_1() -> Claim {
        ClaimBuilder::new("CLM-1")
            .with_policy_id("POL-7")
            .with_user_email("rajesh@example.com")
            .with_doc("doc1", DocumentType::HospitalBill)
            .with_document(
                DocumentBuilder::new("doc2", DocumentType::Aadhaar)
                    .with_storage_path("user-7/aadhaar.png")
                    .build(),
            )
            .with_doc("doc3", DocumentType::BirthCertificate)
            .build()
    }

    /// A second claim sharing no documents with `CLM-1`
    pub fn clm_2() -> Claim {
        ClaimBuilder::new("CLM-2")
            .with_doc("doc7", DocumentType::PharmacyBill)
            .with_doc("doc8", DocumentType::Pan)
            .build()
    }
}

/// Fixture for extraction results
pub struct ExtractionFixtures;

impl ExtractionFixtures {
    pub fn patient_name() -> ExtractionOutcome {
        ExtractionOutcome::completed(vec![ExtractedField::new("Patient Name", "Rajesh Kumar", 0.97)])
    }

    pub fn bill_total() -> ExtractionOutcome {
        ExtractionOutcome::completed(vec![
            ExtractedField::new("Hospital Name", "City Care Hospital", 0.91),
            ExtractedField::new("Total Amount", "15000.00", 0.88),
        ])
    }
}
