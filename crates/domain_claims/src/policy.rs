//! Policy approval
//!
//! Besides claims, administrators approve or reject the policies users
//! upload. Rejections must say why.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use core_kernel::{PolicyId, Session};

use crate::coordinator::require_token;
use crate::error::ReviewError;
use crate::ports::PolicyReviewPort;

/// Policy verification status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Decision an administrator can take on a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyDecision {
    Approved,
    Rejected,
}

/// A validated policy status change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyStatusUpdate {
    status: PolicyDecision,
    rejection_reason: Option<String>,
}

impl PolicyStatusUpdate {
    pub fn new(decision: PolicyDecision, rejection_reason: Option<&str>) -> Result<Self, ReviewError> {
        let reason = rejection_reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        match decision {
            PolicyDecision::Approved => Ok(Self {
                status: decision,
                rejection_reason: None,
            }),
            PolicyDecision::Rejected => match reason {
                Some(reason) => Ok(Self {
                    status: decision,
                    rejection_reason: Some(reason),
                }),
                None => Err(ReviewError::validation(
                    "A rejection reason is required to reject a policy.",
                )),
            },
        }
    }

    pub fn decision(&self) -> PolicyDecision {
        self.status
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }
}

/// Policy as returned by the backend after a status change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub id: PolicyId,
    pub policy_number: Option<String>,
    pub status: PolicyStatus,
    pub rejection_reason: Option<String>,
}

/// Applies administrator decisions to policies
pub struct PolicyReviewService {
    port: Arc<dyn PolicyReviewPort>,
}

impl PolicyReviewService {
    pub fn new(port: Arc<dyn PolicyReviewPort>) -> Self {
        Self { port }
    }

    /// Approves or rejects a policy.
    ///
    /// Validation and the session check both happen before any request.
    pub async fn review_policy(
        &self,
        session: Option<&Session>,
        policy_id: &PolicyId,
        decision: PolicyDecision,
        rejection_reason: Option<&str>,
    ) -> Result<PolicyRecord, ReviewError> {
        let update = PolicyStatusUpdate::new(decision, rejection_reason)?;
        let token = require_token(session)?;

        let record = self
            .port
            .update_policy_status(&token, policy_id, &update)
            .await
            .map_err(|e| {
                warn!(policy_id = %policy_id, error = %e, "Policy status update failed");
                ReviewError::from(e)
            })?;

        info!(policy_id = %policy_id, status = ?record.status, "Policy status updated");
        Ok(record)
    }
}
