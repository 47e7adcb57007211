//! Fields recognised by the extraction service

use serde::{Deserialize, Serialize};

/// Field name used for the synthetic entry recorded when extraction fails
pub const EXTRACTION_ERROR_FIELD: &str = "extraction_error";

/// Status reported when the service does not name one
pub const STATUS_COMPLETED: &str = "completed";

/// Status recorded after a failed extraction
pub const STATUS_ERROR: &str = "error";

/// A single extracted field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub field_name: String,
    pub value: String,
    /// Always within `[0, 1]`
    pub confidence: f64,
}

impl ExtractedField {
    pub fn new(field_name: impl Into<String>, value: impl Into<String>, confidence: f64) -> Self {
        Self {
            field_name: field_name.into(),
            value: value.into(),
            confidence: normalize_confidence(confidence),
        }
    }

    /// The synthetic field standing in for a failed extraction
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(EXTRACTION_ERROR_FIELD, message, 0.0)
    }

    pub fn is_error(&self) -> bool {
        self.field_name == EXTRACTION_ERROR_FIELD
    }
}

/// Clamps a reported confidence into `[0, 1]`; NaN becomes 0
pub fn normalize_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// Result of one extraction attempt for one document
///
/// Success and failure share this shape so the caller can render either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    pub status: String,
    pub fields: Vec<ExtractedField>,
}

impl ExtractionOutcome {
    pub fn completed(fields: Vec<ExtractedField>) -> Self {
        Self {
            status: STATUS_COMPLETED.to_string(),
            fields,
        }
    }

    pub fn with_status(status: impl Into<String>, fields: Vec<ExtractedField>) -> Self {
        Self {
            status: status.into(),
            fields,
        }
    }

    /// A failed attempt, carrying exactly one synthetic error field
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            fields: vec![ExtractedField::error(message)],
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == STATUS_ERROR && self.fields.iter().any(ExtractedField::is_error)
    }

    /// Message of the synthetic error field, if this attempt failed
    pub fn error_message(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.is_error())
            .map(|f| f.value.as_str())
    }
}
