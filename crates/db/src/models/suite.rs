//! Venue suite model.

use fire_suite_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `suites` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Suite {
    pub id: DbId,
    pub name: String,
    pub venue: String,
    pub section: Option<String>,
    /// Seat ceiling for listings tied to this suite.
    pub capacity: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a suite. `capacity` defaults to 8 when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSuite {
    pub name: String,
    pub venue: String,
    pub section: Option<String>,
    pub capacity: Option<i32>,
}
