//! Handlers for suites: public browse plus admin creation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fire_suite_core::error::CoreError;
use fire_suite_core::types::DbId;
use fire_suite_db::models::suite::{CreateSuite, Suite};
use fire_suite_db::repositories::SuiteRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/suites
pub async fn list_suites(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Suite>>>> {
    let data = SuiteRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/suites/{id}
pub async fn get_suite(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Suite>>> {
    let data = SuiteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Suite",
            id,
        }))?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/admin/suites
pub async fn create_suite(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateSuite>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() || input.venue.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Suite name and venue are required".into(),
        )));
    }
    if input.capacity.is_some_and(|c| c < 1) {
        return Err(AppError::Core(CoreError::Validation(
            "Suite capacity must be at least 1".into(),
        )));
    }

    let suite = SuiteRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = admin.user_id,
        suite_id = suite.id,
        capacity = suite.capacity,
        "Suite created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: suite })))
}
