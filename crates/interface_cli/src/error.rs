//! CLI error handling

use serde::Serialize;
use thiserror::Error;

use domain_claims::ReviewError;

#[derive(Debug, Error)]
pub enum CliError {
    /// The arguments could not be parsed
    #[error("{0}")]
    Usage(String),

    /// The adapters could not be set up
    #[error("{0}")]
    Setup(String),

    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        CliError::Usage(message.into())
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            _ => 1,
        }
    }
}

/// Error body printed on failure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl From<&CliError> for ErrorResponse {
    fn from(err: &CliError) -> Self {
        let (error_type, status) = match err {
            CliError::Usage(_) => ("usage_error", None),
            CliError::Setup(_) => ("setup_error", None),
            CliError::Output(_) => ("output_error", None),
            CliError::Review(review) => match review {
                ReviewError::Auth(_) => ("auth_error", None),
                ReviewError::Fetch { status, .. } => ("fetch_error", *status),
                ReviewError::Validation(_) => ("validation_error", None),
                ReviewError::Extraction(_) => ("extraction_error", None),
                ReviewError::NoClaimLoaded => ("no_claim_loaded", None),
                ReviewError::ClaimReplaced { .. } => ("claim_replaced", None),
                ReviewError::UnknownDocument { .. } => ("unknown_document", None),
            },
        };
        ErrorResponse {
            error: error_type.to_string(),
            message: err.to_string(),
            status,
        }
    }
}
