//! Test Data Builders
//!
//! Builders for claims and documents with sensible defaults, so tests only
//! spell out the fields they care about.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{ClaimId, DocumentId, PolicyId};
use domain_claims::{Claim, ClaimStatus, Document, DocumentType, ReviewStatus, StorageLocator};

/// Builder for test documents
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    /// Starts a pending document with a signed URL derived from its id
    pub fn new(id: &str, document_type: DocumentType) -> Self {
        let mut document = Document::new(DocumentId::new(id), document_type);
        document.locator = Some(StorageLocator::SignedUrl {
            url: format!("https://files.example.com/{}/{}.pdf", document_type.bucket_name(), id),
        });
        document.original_filename = Some(format!("{}.pdf", id));
        Self { document }
    }

    pub fn with_signed_url(mut self, url: impl Into<String>) -> Self {
        self.document.locator = Some(StorageLocator::SignedUrl { url: url.into() });
        self
    }

    pub fn with_storage_path(mut self, path: impl Into<String>) -> Self {
        self.document.locator = Some(StorageLocator::StoragePath {
            bucket: self.document.document_type.bucket_name().to_string(),
            path: path.into(),
        });
        self
    }

    pub fn without_locator(mut self) -> Self {
        self.document.locator = None;
        self
    }

    pub fn with_status(mut self, status: ReviewStatus) -> Self {
        self.document.review_status = status;
        self
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.document.review_remarks = Some(remarks.into());
        self
    }

    pub fn build(self) -> Document {
        self.document
    }
}

/// Builder for test claims
pub struct ClaimBuilder {
    claim: Claim,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self::new("CLM-TEST")
    }
}

impl ClaimBuilder {
    pub fn new(id: &str) -> Self {
        let mut claim = Claim::new(ClaimId::new(id), dec!(15000.00));
        claim.submitted_at = Some("2024-06-01T10:00:00Z".to_string());
        Self { claim }
    }

    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.claim.status = status;
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.claim.total_amount = amount;
        self
    }

    pub fn with_policy_id(mut self, id: &str) -> Self {
        self.claim.policy_id = Some(PolicyId::new(id));
        self
    }

    pub fn with_user_email(mut self, email: impl Into<String>) -> Self {
        self.claim.user_email = Some(email.into());
        self
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.claim.documents.push(document);
        self
    }

    /// Adds a pending document with default locator
    pub fn with_doc(self, id: &str, document_type: DocumentType) -> Self {
        self.with_document(DocumentBuilder::new(id, document_type).build())
    }

    pub fn build(self) -> Claim {
        self.claim
    }
}
