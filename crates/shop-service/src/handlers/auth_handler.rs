//! Login handler: exchanges email + password for a signed access token.

use crate::errors::{ApiError, CredentialFailure};
use crate::models::TokenResponse;
use crate::routes::AppState;
use axum::{extract::State, Json};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

/// Login request body. The password is redacted in Debug output.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
}

/// Handle POST /api/v1/auth/login
///
/// Verifies the password against the stored bcrypt hash and issues an HS256
/// access token. Unknown email, wrong password, and deactivated accounts all
/// return the same `invalid-credential` outcome.
#[instrument(skip_all, name = "shop.handlers.login")]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = state
        .user_store
        .find_by_email(&payload.email)
        .await?
        .ok_or(ApiError::Unauthenticated(
            CredentialFailure::InvalidCredential,
        ))?;

    if !user.is_active {
        return Err(ApiError::Unauthenticated(
            CredentialFailure::InvalidCredential,
        ));
    }

    let password_matches = bcrypt::verify(payload.password.expose_secret(), &user.password_hash)
        .map_err(|e| {
            tracing::error!(target: "shop.handlers.login", error = %e, "Password verification failed");
            ApiError::Internal
        })?;

    if !password_matches {
        tracing::debug!(target: "shop.handlers.login", "Password mismatch");
        return Err(ApiError::Unauthenticated(
            CredentialFailure::InvalidCredential,
        ));
    }

    let (access_token, expires_in) = state.tokens.issue(user.user_id, &user.role)?;

    tracing::info!(target: "shop.handlers.login", user_id = %user.user_id, "User logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in,
    }))
}
