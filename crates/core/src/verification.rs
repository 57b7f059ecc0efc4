//! Seller verification workflow rules.
//!
//! A user applies to sell tickets for one suite; an approver or admin then
//! approves or rejects the application. Only pending applications can be
//! decided, and a decision is final.

use crate::roles::{ROLE_GUEST, ROLE_ID_SELLER};
use crate::status::ApplicationStatus;

/// Check that an application in `current` may move to `decision`.
pub fn validate_decision(
    current: ApplicationStatus,
    decision: ApplicationStatus,
) -> Result<(), String> {
    if decision == ApplicationStatus::Pending {
        return Err("A decision must be approved or rejected".to_string());
    }
    if current != ApplicationStatus::Pending {
        return Err(format!("Application has already been {current}"));
    }
    Ok(())
}

/// Whether an existing application blocks a new one for the same suite.
///
/// Rejected applicants may re-apply; pending and approved ones may not.
pub fn blocks_new_application(existing: ApplicationStatus) -> bool {
    matches!(
        existing,
        ApplicationStatus::Pending | ApplicationStatus::Approved
    )
}

/// The role id an applicant should hold after approval, if it changes.
///
/// Guests become sellers; every other role is left untouched.
pub fn promoted_role_id(current_role: &str) -> Option<i64> {
    (current_role == ROLE_GUEST).then_some(ROLE_ID_SELLER)
}
