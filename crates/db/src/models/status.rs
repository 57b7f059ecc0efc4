//! Serde helpers that render SMALLINT status ids as their names.
//!
//! Rows keep the raw `status_id` so they map 1:1 onto the table, but API
//! consumers see `"status": "ACTIVE"` rather than a bare number.

use fire_suite_core::status::{ApplicationStatus, ListingStatus, StatusId};
use serde::Serializer;

/// Serialize a `listing_statuses` id as its name.
pub fn serialize_listing_status<S: Serializer>(id: &StatusId, s: S) -> Result<S::Ok, S::Error> {
    match ListingStatus::from_id(*id) {
        Some(status) => s.serialize_str(status.name()),
        None => s.serialize_i16(*id),
    }
}

/// Serialize an `application_statuses` id as its name.
pub fn serialize_application_status<S: Serializer>(
    id: &StatusId,
    s: S,
) -> Result<S::Ok, S::Error> {
    match ApplicationStatus::from_id(*id) {
        Some(status) => s.serialize_str(status.name()),
        None => s.serialize_i16(*id),
    }
}
