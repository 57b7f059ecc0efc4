//! Seller verification application model.

use fire_suite_core::status::{ApplicationStatus, StatusId};
use fire_suite_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::serialize_application_status;

/// A row from the `seller_applications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SellerApplication {
    pub id: DbId,
    pub user_id: DbId,
    pub suite_id: DbId,
    #[serde(rename = "status", serialize_with = "serialize_application_status")]
    pub status_id: StatusId,
    pub notes: Option<String>,
    pub reviewer_id: Option<DbId>,
    pub review_comment: Option<String>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SellerApplication {
    /// Typed status; `None` only if the lookup table has drifted from the enum.
    pub fn status(&self) -> Option<ApplicationStatus> {
        ApplicationStatus::from_id(self.status_id)
    }
}

/// DTO for submitting an application. The applicant is the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSellerApplication {
    pub user_id: DbId,
    pub suite_id: DbId,
    pub notes: Option<String>,
}

/// DTO for recording an approver's decision.
#[derive(Debug, Clone)]
pub struct DecideSellerApplication {
    pub reviewer_id: DbId,
    pub decision: ApplicationStatus,
    pub comment: Option<String>,
}
