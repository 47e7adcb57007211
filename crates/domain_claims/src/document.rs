//! Claim documents

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use core_kernel::DocumentId;

/// Kind of supporting document attached to a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    HospitalBill,
    PharmacyBill,
    Aadhaar,
    Pan,
    BirthCertificate,
    Policy,
    /// Any type the backend knows about that this client does not
    Other,
}

impl DocumentType {
    /// Parses the backend spelling; both `hospital_bill` and `HOSPITAL_BILL` are accepted
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hospital_bill" => DocumentType::HospitalBill,
            "pharmacy_bill" => DocumentType::PharmacyBill,
            "aadhaar" => DocumentType::Aadhaar,
            "pan" => DocumentType::Pan,
            "birth_certificate" => DocumentType::BirthCertificate,
            "policy" => DocumentType::Policy,
            _ => DocumentType::Other,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentType::HospitalBill => "Hospital Bill",
            DocumentType::PharmacyBill => "Pharmacy Bill",
            DocumentType::Aadhaar => "Aadhaar Card",
            DocumentType::Pan => "PAN Card",
            DocumentType::BirthCertificate => "Birth Certificate",
            DocumentType::Policy => "Policy Document",
            DocumentType::Other => "Other Document",
        }
    }

    /// Storage bucket holding documents of this type
    pub fn bucket_name(&self) -> &'static str {
        match self {
            DocumentType::HospitalBill => "hospital_bills",
            DocumentType::PharmacyBill => "pharmacy_bills",
            DocumentType::Aadhaar => "aadhaar",
            DocumentType::Pan => "pan",
            DocumentType::BirthCertificate => "Birth_certificates",
            DocumentType::Policy | DocumentType::Other => "policies",
        }
    }

    /// Birth certificates are never sent for extraction.
    pub fn is_extraction_exempt(&self) -> bool {
        matches!(self, DocumentType::BirthCertificate)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Per-document review disposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Where a document's file can be fetched from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageLocator {
    /// A time-limited URL already signed by the backend
    SignedUrl { url: String },
    /// An object path inside a storage bucket that still needs signing
    StoragePath { bucket: String, path: String },
}

impl StorageLocator {
    /// Picks a locator from the fields the backend reports for a document.
    ///
    /// Empty values and the literal `"undefined"` count as absent.
    pub fn from_parts(
        signed_url: Option<&str>,
        bucket: Option<&str>,
        file_path: Option<&str>,
    ) -> Option<Self> {
        fn present(value: Option<&str>) -> Option<&str> {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty() && *v != "undefined")
        }

        if let Some(url) = present(signed_url) {
            return Some(StorageLocator::SignedUrl { url: url.to_string() });
        }
        match (present(bucket), present(file_path)) {
            (Some(bucket), Some(path)) => Some(StorageLocator::StoragePath {
                bucket: bucket.to_string(),
                path: path.to_string(),
            }),
            _ => None,
        }
    }
}

/// A document attached to a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub document_type: DocumentType,
    pub locator: Option<StorageLocator>,
    pub original_filename: Option<String>,
    pub uploaded_at: Option<String>,
    pub review_status: ReviewStatus,
    pub review_remarks: Option<String>,
}

impl Document {
    /// Creates a pending document with no locator
    pub fn new(id: DocumentId, document_type: DocumentType) -> Self {
        Self {
            id,
            document_type,
            locator: None,
            original_filename: None,
            uploaded_at: None,
            review_status: ReviewStatus::Pending,
            review_remarks: None,
        }
    }

    pub fn is_extraction_exempt(&self) -> bool {
        self.document_type.is_extraction_exempt()
    }
}

/// Locally resolved preview of a document's file
///
/// Held for the session only; cloning shares the underlying bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct PreviewHandle {
    handle_id: Uuid,
    content_type: Option<String>,
    bytes: Arc<[u8]>,
}

impl PreviewHandle {
    pub fn new(content_type: Option<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            handle_id: Uuid::new_v4(),
            content_type,
            bytes: bytes.into(),
        }
    }

    pub fn handle_id(&self) -> Uuid {
        self.handle_id
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle")
            .field("handle_id", &self.handle_id)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
