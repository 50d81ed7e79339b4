//! Authentication middleware for protected routes.
//!
//! Extracts the Bearer credential from the Authorization header, verifies it,
//! resolves the subject to a trusted [`Identity`] via a fresh store lookup,
//! and injects the identity into request extensions for handlers.
//!
//! The identity's role comes from the store lookup, never from the token:
//! role changes take effect on the next request, not the next token refresh.

use crate::auth::{self, extract_bearer, Identity, TokenError};
use crate::errors::ApiError;
use crate::observability::metrics::record_token_validation;
use crate::routes::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authentication middleware.
///
/// # Response
///
/// - 401 with a reason code when the credential is missing, malformed,
///   invalid, or expired, or when no active user record matches the subject
/// - 500 when the store lookup itself fails (distinguishable from denial)
/// - Continues to the handler with [`Identity`] in extensions otherwise
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = {
        let token = extract_bearer(req.headers()).map_err(|e| {
            tracing::debug!(target: "shop.middleware.auth", error = %e, "No usable bearer credential");
            record_token_validation("error", Some(error_category(&e)));
            ApiError::from(e)
        })?;

        state.tokens.verify(token).map_err(|e| {
            record_token_validation("error", Some(error_category(&e)));
            ApiError::from(e)
        })?
    };

    // Claims are advisory until corroborated: re-read the user record
    let identity: Identity = auth::resolve(state.user_store.as_ref(), &claims)
        .await
        .map_err(|e| {
            tracing::debug!(target: "shop.middleware.auth", error = %e, "Identity resolution failed");
            record_token_validation("error", Some("unresolved"));
            ApiError::from(e)
        })?;

    record_token_validation("success", None);

    // Middleware-to-handler handoff via extensions
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

fn error_category(err: &TokenError) -> &'static str {
    match err {
        TokenError::MissingCredential => "missing",
        TokenError::MalformedCredential => "malformed",
        TokenError::InvalidToken => "invalid",
        TokenError::ExpiredToken => "expired",
        TokenError::Signing => "signing",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    // Full middleware behavior is covered by the pipeline integration tests,
    // which drive the real router with an in-memory store. Unit tests here
    // focus on helpers.

    use super::*;

    #[test]
    fn test_error_categories_are_bounded() {
        let categories = [
            error_category(&TokenError::MissingCredential),
            error_category(&TokenError::MalformedCredential),
            error_category(&TokenError::InvalidToken),
            error_category(&TokenError::ExpiredToken),
        ];
        assert_eq!(categories, ["missing", "malformed", "invalid", "expired"]);
    }
}
