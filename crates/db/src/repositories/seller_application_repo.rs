//! Repository for the `seller_applications` table.

use fire_suite_core::status::{ApplicationStatus, StatusId};
use fire_suite_core::types::DbId;
use sqlx::PgPool;

use crate::models::seller_application::{
    CreateSellerApplication, DecideSellerApplication, SellerApplication,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, suite_id, status_id, notes, reviewer_id, \
                        review_comment, reviewed_at, created_at, updated_at";

/// Provides CRUD operations and the verification check for seller applications.
pub struct SellerApplicationRepo;

impl SellerApplicationRepo {
    /// Insert a new pending application, returning the created row.
    ///
    /// Fails with a `uq_seller_applications_open` violation when the user
    /// already has a pending or approved application for the suite.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSellerApplication,
    ) -> Result<SellerApplication, sqlx::Error> {
        let query = format!(
            "INSERT INTO seller_applications (user_id, suite_id, status_id, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SellerApplication>(&query)
            .bind(input.user_id)
            .bind(input.suite_id)
            .bind(ApplicationStatus::Pending.id())
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find an application by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SellerApplication>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM seller_applications WHERE id = $1");
        sqlx::query_as::<_, SellerApplication>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The user's most recent pending or approved application for a suite.
    pub async fn find_open(
        pool: &PgPool,
        user_id: DbId,
        suite_id: DbId,
    ) -> Result<Option<SellerApplication>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM seller_applications
             WHERE user_id = $1 AND suite_id = $2 AND status_id = ANY($3)
             ORDER BY created_at DESC
             LIMIT 1"
        );
        let open: Vec<StatusId> = vec![
            ApplicationStatus::Pending.id(),
            ApplicationStatus::Approved.id(),
        ];
        sqlx::query_as::<_, SellerApplication>(&query)
            .bind(user_id)
            .bind(suite_id)
            .bind(open)
            .fetch_optional(pool)
            .await
    }

    /// List a user's applications, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<SellerApplication>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM seller_applications
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, SellerApplication>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Review queue: applications optionally filtered by status, oldest first.
    pub async fn list(
        pool: &PgPool,
        status: Option<ApplicationStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SellerApplication>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM seller_applications
             WHERE ($1::SMALLINT IS NULL OR status_id = $1)
             ORDER BY created_at ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, SellerApplication>(&query)
            .bind(status.map(ApplicationStatus::id))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Record a decision on a pending application.
    ///
    /// When `promote_to_role_id` is set the applicant's role is changed in the
    /// same transaction. Returns `None` if the application was not pending
    /// (already decided, possibly by a concurrent reviewer); nothing is
    /// written in that case.
    pub async fn decide(
        pool: &PgPool,
        id: DbId,
        input: &DecideSellerApplication,
        promote_to_role_id: Option<DbId>,
    ) -> Result<Option<SellerApplication>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE seller_applications SET
                status_id = $2,
                reviewer_id = $3,
                review_comment = $4,
                reviewed_at = NOW()
             WHERE id = $1 AND status_id = $5
             RETURNING {COLUMNS}"
        );
        let decided = sqlx::query_as::<_, SellerApplication>(&query)
            .bind(id)
            .bind(input.decision.id())
            .bind(input.reviewer_id)
            .bind(&input.comment)
            .bind(ApplicationStatus::Pending.id())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(application) = decided else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(role_id) = promote_to_role_id {
            sqlx::query("UPDATE users SET role_id = $2 WHERE id = $1")
                .bind(application.user_id)
                .bind(role_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(Some(application))
    }

    /// Whether the user holds an approved application for the suite.
    pub async fn is_verified_for_suite(
        pool: &PgPool,
        user_id: DbId,
        suite_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM seller_applications
                WHERE user_id = $1 AND suite_id = $2 AND status_id = $3
             )",
        )
        .bind(user_id)
        .bind(suite_id)
        .bind(ApplicationStatus::Approved.id())
        .fetch_one(pool)
        .await
    }
}
