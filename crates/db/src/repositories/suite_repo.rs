//! Repository for the `suites` table.

use fire_suite_core::listing::DEFAULT_SUITE_CAPACITY;
use fire_suite_core::types::DbId;
use sqlx::PgPool;

use crate::models::suite::{CreateSuite, Suite};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, venue, section, capacity, created_at, updated_at";

/// Provides CRUD operations for suites.
pub struct SuiteRepo;

impl SuiteRepo {
    /// Insert a new suite, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSuite) -> Result<Suite, sqlx::Error> {
        let query = format!(
            "INSERT INTO suites (name, venue, section, capacity)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Suite>(&query)
            .bind(&input.name)
            .bind(&input.venue)
            .bind(&input.section)
            .bind(input.capacity.unwrap_or(DEFAULT_SUITE_CAPACITY))
            .fetch_one(pool)
            .await
    }

    /// Find a suite by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Suite>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM suites WHERE id = $1");
        sqlx::query_as::<_, Suite>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all suites grouped by venue.
    pub async fn list(pool: &PgPool) -> Result<Vec<Suite>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM suites ORDER BY venue ASC, name ASC");
        sqlx::query_as::<_, Suite>(&query).fetch_all(pool).await
    }

    /// Capacity of the suite a listing belongs to.
    pub async fn capacity_for_listing(
        pool: &PgPool,
        listing_id: DbId,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT s.capacity FROM suites s
             JOIN listings l ON l.suite_id = s.id
             WHERE l.id = $1",
        )
        .bind(listing_id)
        .fetch_optional(pool)
        .await
    }
}
