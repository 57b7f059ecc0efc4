//! Browse visibility and pagination helpers.

use crate::status::ListingStatus;

/// Default page size for listing browse and message lists.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Statuses anyone may browse.
pub fn is_public(status: ListingStatus) -> bool {
    matches!(status, ListingStatus::Active | ListingStatus::Sold)
}

/// Which listing statuses a browse query should return.
///
/// - An explicit `requested` status wins, but non-public statuses come back
///   empty unless the caller `may_see_private` (owner or admin).
/// - Otherwise ACTIVE is always shown, SOLD only with `include_sold`, and
///   DRAFT only to callers who `may_see_private`.
pub fn visible_statuses(
    requested: Option<ListingStatus>,
    include_sold: bool,
    may_see_private: bool,
) -> Vec<ListingStatus> {
    match requested {
        Some(status) if is_public(status) || may_see_private => vec![status],
        Some(_) => Vec::new(),
        None => {
            let mut statuses = vec![ListingStatus::Active];
            if include_sold {
                statuses.push(ListingStatus::Sold);
            }
            if may_see_private {
                statuses.push(ListingStatus::Draft);
            }
            statuses
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sold_hidden_by_default() {
        assert_eq!(visible_statuses(None, false, false), vec![ListingStatus::Active]);
        assert_eq!(
            visible_statuses(None, true, false),
            vec![ListingStatus::Active, ListingStatus::Sold]
        );
    }

    #[test]
    fn explicit_sold_overrides_include_flag() {
        assert_eq!(
            visible_statuses(Some(ListingStatus::Sold), false, false),
            vec![ListingStatus::Sold]
        );
    }

    #[test]
    fn drafts_only_for_owner_or_admin() {
        assert!(visible_statuses(Some(ListingStatus::Draft), false, false).is_empty());
        assert_eq!(
            visible_statuses(Some(ListingStatus::Draft), false, true),
            vec![ListingStatus::Draft]
        );
        assert!(visible_statuses(None, false, true).contains(&ListingStatus::Draft));
    }

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE), 20);
    }

    #[test]
    fn clamp_limit_respects_max() {
        assert_eq!(clamp_limit(Some(500), DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE), 100);
    }

    #[test]
    fn clamp_limit_floors_at_one() {
        assert_eq!(clamp_limit(Some(0), 20, 100), 1);
        assert_eq!(clamp_limit(Some(-3), 20, 100), 1);
    }

    #[test]
    fn clamp_offset_never_negative() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(-10)), 0);
        assert_eq!(clamp_offset(Some(40)), 40);
    }
}
