//! Handlers for seller verification applications.
//!
//! Any signed-in user may apply to sell for a suite. Approvers and admins
//! work the review queue; approving a guest also promotes them to seller.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fire_suite_core::error::CoreError;
use fire_suite_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use fire_suite_core::status::ApplicationStatus;
use fire_suite_core::types::DbId;
use fire_suite_core::verification::{promoted_role_id, validate_decision};
use fire_suite_db::models::seller_application::{
    CreateSellerApplication, DecideSellerApplication, SellerApplication,
};
use fire_suite_db::repositories::{RoleRepo, SellerApplicationRepo, SuiteRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireApprover;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /applications`.
#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub suite_id: DbId,
    pub notes: Option<String>,
}

/// Request body for approve and reject. Send `{}` for no comment.
#[derive(Debug, Default, Deserialize)]
pub struct DecisionRequest {
    pub comment: Option<String>,
}

/// Query parameters for the review queue.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewQueueParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /api/v1/applications
pub async fn apply(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ApplyRequest>,
) -> AppResult<impl IntoResponse> {
    SuiteRepo::find_by_id(&state.pool, input.suite_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Suite",
            id: input.suite_id,
        }))?;

    if let Some(open) =
        SellerApplicationRepo::find_open(&state.pool, auth.user_id, input.suite_id).await?
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "An application for this suite is already {}",
            open.status().map_or("open", |s| s.name())
        ))));
    }

    // The partial unique index still backs the check above under concurrency.
    let application = SellerApplicationRepo::create(
        &state.pool,
        &CreateSellerApplication {
            user_id: auth.user_id,
            suite_id: input.suite_id,
            notes: input.notes,
        },
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        application_id = application.id,
        suite_id = application.suite_id,
        "Seller application submitted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: application })))
}

/// GET /api/v1/applications/mine
pub async fn list_mine(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<SellerApplication>>>> {
    let data = SellerApplicationRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/applications?status=pending
pub async fn review_queue(
    RequireApprover(_reviewer): RequireApprover,
    State(state): State<AppState>,
    Query(params): Query<ReviewQueueParams>,
) -> AppResult<Json<DataResponse<Vec<SellerApplication>>>> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<ApplicationStatus>)
        .transpose()
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let data = SellerApplicationRepo::list(
        &state.pool,
        status,
        clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/applications/{id}/approve
pub async fn approve(
    RequireApprover(reviewer): RequireApprover,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<DecisionRequest>,
) -> AppResult<Json<DataResponse<SellerApplication>>> {
    decide(&state, &reviewer, id, ApplicationStatus::Approved, input.comment).await
}

/// POST /api/v1/applications/{id}/reject
pub async fn reject(
    RequireApprover(reviewer): RequireApprover,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<DecisionRequest>,
) -> AppResult<Json<DataResponse<SellerApplication>>> {
    decide(&state, &reviewer, id, ApplicationStatus::Rejected, input.comment).await
}

async fn decide(
    state: &AppState,
    reviewer: &AuthUser,
    id: DbId,
    decision: ApplicationStatus,
    comment: Option<String>,
) -> AppResult<Json<DataResponse<SellerApplication>>> {
    let application = SellerApplicationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SellerApplication",
            id,
        }))?;

    let current = application.status().ok_or_else(|| {
        AppError::InternalError(format!(
            "application {id} has unknown status id {}",
            application.status_id
        ))
    })?;
    validate_decision(current, decision).map_err(|msg| AppError::Core(CoreError::Conflict(msg)))?;

    let promote_to = if decision == ApplicationStatus::Approved {
        let applicant = UserRepo::find_by_id(&state.pool, application.user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: application.user_id,
            }))?;
        let role = RoleRepo::resolve_name(&state.pool, applicant.role_id).await?;
        promoted_role_id(&role)
    } else {
        None
    };

    let input = DecideSellerApplication {
        reviewer_id: reviewer.user_id,
        decision,
        comment,
    };
    let decided = SellerApplicationRepo::decide(&state.pool, id, &input, promote_to)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Application was decided by another reviewer".into(),
            ))
        })?;

    tracing::info!(
        user_id = reviewer.user_id,
        application_id = id,
        applicant_id = decided.user_id,
        decision = %decision,
        promoted = promote_to.is_some(),
        "Seller application decided"
    );

    Ok(Json(DataResponse { data: decided }))
}
