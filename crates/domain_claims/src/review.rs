//! Review decisions on individual documents

use serde::{Deserialize, Serialize};

use crate::claim::ClaimStatus;
use crate::document::ReviewStatus;
use crate::error::ReviewError;

/// Decision an operator can record for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewDecision::Approved => "approved",
            ReviewDecision::Rejected => "rejected",
        }
    }
}

/// A validated review ready to be posted to the claims backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRequest {
    #[serde(rename = "status")]
    decision: ReviewDecision,
    remarks: String,
}

impl ReviewRequest {
    /// Validates a review locally.
    ///
    /// A rejection needs remarks that are non-empty after trimming. An
    /// approval never carries remarks.
    pub fn new(decision: ReviewDecision, remarks: &str) -> Result<Self, ReviewError> {
        let remarks = match decision {
            ReviewDecision::Approved => String::new(),
            ReviewDecision::Rejected => {
                let trimmed = remarks.trim();
                if trimmed.is_empty() {
                    return Err(ReviewError::validation(
                        "Please add remarks before rejecting.",
                    ));
                }
                trimmed.to_string()
            }
        };
        Ok(Self { decision, remarks })
    }

    pub fn decision(&self) -> ReviewDecision {
        self.decision
    }

    pub fn remarks(&self) -> &str {
        &self.remarks
    }
}

/// What the backend reports after accepting a review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub review_status: ReviewStatus,
    pub review_remarks: Option<String>,
    pub claim_status: ClaimStatus,
}
