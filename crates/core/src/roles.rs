//! Well-known role name constants.
//!
//! These must match the seed data in `20260301000001_create_roles_and_users.sql`.

pub const ROLE_GUEST: &str = "guest";
pub const ROLE_SELLER: &str = "seller";
pub const ROLE_APPROVER: &str = "approver";
pub const ROLE_ADMIN: &str = "admin";

/// Seeded role ids, in the same order as the migration inserts them.
pub const ROLE_ID_GUEST: i64 = 1;
pub const ROLE_ID_SELLER: i64 = 2;
pub const ROLE_ID_APPROVER: i64 = 3;
pub const ROLE_ID_ADMIN: i64 = 4;

/// Whether the role may review seller applications.
pub fn can_review_applications(role: &str) -> bool {
    role == ROLE_APPROVER || role == ROLE_ADMIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approver_and_admin_review() {
        assert!(can_review_applications(ROLE_APPROVER));
        assert!(can_review_applications(ROLE_ADMIN));
    }

    #[test]
    fn guest_and_seller_do_not_review() {
        assert!(!can_review_applications(ROLE_GUEST));
        assert!(!can_review_applications(ROLE_SELLER));
        assert!(!can_review_applications(""));
    }
}
