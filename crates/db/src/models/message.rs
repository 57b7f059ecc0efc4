//! Buyer/seller message model.

use fire_suite_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub listing_id: DbId,
    pub sender_id: DbId,
    pub recipient_id: DbId,
    pub body: String,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for sending a message.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMessage {
    pub listing_id: DbId,
    pub sender_id: DbId,
    pub recipient_id: DbId,
    pub body: String,
}
