//! User handlers.
//!
//! The all-users listing is admin-only: exposing the full identity list to
//! any authenticated caller is the access-control defect this service
//! refuses to reintroduce.

use crate::auth::Identity;
use crate::authz::{self, Requirement};
use crate::errors::ApiError;
use crate::models::UserResponse;
use crate::repositories::users;
use crate::routes::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Response for GET /api/v1/users/me.
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
}

/// Handler for GET /api/v1/users/me
///
/// Returns the requester's resolved identity. The role shown is the current
/// persisted one, not whatever the token was issued with.
#[instrument(skip_all, name = "shop.handlers.me")]
pub async fn get_me(Extension(identity): Extension<Identity>) -> Result<Json<MeResponse>, ApiError> {
    authz::require(Some(&identity), &Requirement::AuthenticatedOnly)?;

    Ok(Json(MeResponse {
        user_id: identity.user_id,
        email: identity.email.clone(),
        role: identity.role.as_str().to_string(),
    }))
}

/// Body for PATCH /api/v1/users/me.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Handler for PATCH /api/v1/users/me
#[instrument(skip_all, name = "shop.handlers.update_me")]
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    authz::require(Some(&identity), &Requirement::AuthenticatedOnly)?;

    let email = payload.email.as_ref().map(|e| e.trim());
    let display_name = payload.display_name.as_ref().map(|n| n.trim());

    if matches!(email, Some("")) || matches!(display_name, Some("")) {
        return Err(ApiError::BadRequest("Fields cannot be empty".to_string()));
    }

    let user = users::update_profile(&state.pool, identity.user_id, email, display_name)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    Ok(Json(UserResponse::from(user)))
}

/// Handler for GET /api/v1/users
///
/// Admin-only listing of all users.
#[instrument(skip_all, name = "shop.handlers.list_users")]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    authz::require(Some(&identity), &Requirement::AdminOnly)?;

    let users = users::list_all(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Handler for DELETE /api/v1/users/:id
///
/// A user may delete their own account; admins may delete anyone.
#[instrument(skip_all, name = "shop.handlers.delete_user")]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    authz::require(Some(&identity), &Requirement::SelfOrAdmin(user_id))?;

    if !users::delete(&state.pool, user_id).await? {
        return Err(ApiError::NotFound("user"));
    }

    tracing::info!(
        target: "shop.handlers.delete_user",
        deleted_user_id = %user_id,
        requested_by = %identity.user_id,
        "User deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::auth::Role;

    #[tokio::test]
    async fn test_get_me_reflects_resolved_role() {
        let identity = Identity {
            user_id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            role: Role::Admin,
        };

        let Json(response) = get_me(Extension(identity.clone())).await.unwrap();
        assert_eq!(response.user_id, identity.user_id);
        assert_eq!(response.role, "admin");
    }
}
