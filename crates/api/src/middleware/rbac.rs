//! Role-gated extractors.
//!
//! Each wraps [`AuthUser`] and rejects with 403 when the token's role is not
//! allowed on the route.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use fire_suite_core::error::CoreError;
use fire_suite_core::roles::{can_review_applications, ROLE_ADMIN};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `approver` or `admin`: the roles that decide seller applications.
pub struct RequireApprover(pub AuthUser);

impl FromRequestParts<AppState> for RequireApprover {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_review_applications(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Approver or Admin role required".into(),
            )));
        }
        Ok(RequireApprover(user))
    }
}

/// Any signed-in user, named for routes where that is the whole requirement.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        AuthUser::from_request_parts(parts, state)
            .await
            .map(RequireAuth)
    }
}
