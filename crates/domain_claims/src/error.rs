//! Review workflow errors

use thiserror::Error;

use core_kernel::{ClaimId, DocumentId, PortError};

/// Errors surfaced by the review coordinator
///
/// Extraction failures are normally folded into the extraction results as a
/// synthetic field; [`ReviewError::Extraction`] only carries their message.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("{0}")]
    Auth(String),

    #[error("{message}")]
    Fetch {
        status: Option<u16>,
        message: String,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Extraction(String),

    #[error("No claim is loaded")]
    NoClaimLoaded,

    #[error("Claim {claim_id} is no longer loaded")]
    ClaimReplaced { claim_id: ClaimId },

    #[error("Document {document_id} is not part of claim {claim_id}")]
    UnknownDocument {
        claim_id: ClaimId,
        document_id: DocumentId,
    },
}

impl ReviewError {
    pub fn not_authenticated() -> Self {
        ReviewError::Auth("Not authenticated".to_string())
    }

    pub fn session_expired() -> Self {
        ReviewError::Auth("Session expired".to_string())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ReviewError::Validation(message.into())
    }

    /// Returns true for failures the operator can fix by signing in again
    pub fn is_auth(&self) -> bool {
        matches!(self, ReviewError::Auth(_))
    }
}

impl From<PortError> for ReviewError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Unauthorized { message } => ReviewError::Auth(message),
            other => ReviewError::Fetch {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}
