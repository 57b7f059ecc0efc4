//! Repository for the `messages` table.

use fire_suite_core::types::DbId;
use sqlx::PgPool;

use crate::models::message::{CreateMessage, Message};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, listing_id, sender_id, recipient_id, body, read_at, \
                        created_at, updated_at";

/// Provides CRUD operations for buyer/seller messages.
pub struct MessageRepo;

impl MessageRepo {
    /// Insert a new message, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMessage) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (listing_id, sender_id, recipient_id, body)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(input.listing_id)
            .bind(input.sender_id)
            .bind(input.recipient_id)
            .bind(&input.body)
            .fetch_one(pool)
            .await
    }

    /// Find a message by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Message>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM messages WHERE id = $1");
        sqlx::query_as::<_, Message>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Messages received by a user, newest first.
    pub async fn list_inbox(
        pool: &PgPool,
        recipient_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages
             WHERE recipient_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(recipient_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Messages sent by a user, newest first.
    pub async fn list_sent(
        pool: &PgPool,
        sender_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages
             WHERE sender_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(sender_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Messages on a listing, oldest first.
    ///
    /// With `participant_id` set, only messages that user sent or received
    /// are returned; `None` returns the whole thread (seller view).
    pub async fn list_for_listing(
        pool: &PgPool,
        listing_id: DbId,
        participant_id: Option<DbId>,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages
             WHERE listing_id = $1
               AND ($2::BIGINT IS NULL OR sender_id = $2 OR recipient_id = $2)
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(listing_id)
            .bind(participant_id)
            .fetch_all(pool)
            .await
    }

    /// Whether `user_id` has sent at least one message about the listing.
    pub async fn has_written_about(
        pool: &PgPool,
        listing_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM messages WHERE listing_id = $1 AND sender_id = $2)",
        )
        .bind(listing_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Mark a message read by its recipient. Already-read messages keep
    /// their original `read_at`.
    ///
    /// Returns `None` if the message does not exist or `recipient_id` is not
    /// its recipient.
    pub async fn mark_read(
        pool: &PgPool,
        id: DbId,
        recipient_id: DbId,
    ) -> Result<Option<Message>, sqlx::Error> {
        let query = format!(
            "UPDATE messages SET read_at = COALESCE(read_at, NOW())
             WHERE id = $1 AND recipient_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(id)
            .bind(recipient_id)
            .fetch_optional(pool)
            .await
    }
}
