//! Storefront API error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl. Messages
//! returned to clients are intentionally generic; the concrete failure is
//! logged server-side. The authentication family carries a machine-readable
//! reason code, but lookup failures and signature failures collapse into the
//! same `invalid-credential` code so callers cannot probe which accounts
//! exist.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Reason code attached to 401 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialFailure {
    /// No `Authorization` header, or not a Bearer credential.
    MissingCredential,
    /// Signature mismatch, undecodable token, or no matching user record.
    InvalidCredential,
    /// Credential expired.
    ExpiredCredential,
}

impl CredentialFailure {
    /// Machine-readable reason code for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            CredentialFailure::MissingCredential => "missing-credential",
            CredentialFailure::InvalidCredential => "invalid-credential",
            CredentialFailure::ExpiredCredential => "expired-credential",
        }
    }
}

/// Storefront API error type.
///
/// Maps to HTTP status codes:
/// - `Unauthenticated`: 401 Unauthorized
/// - `Forbidden`: 403 Forbidden
/// - `RateLimited`: 429 Too Many Requests
/// - `NotFound`: 404 Not Found
/// - `BadRequest`: 400 Bad Request
/// - `Database`, `Internal`: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthenticated: {}", .0.code())]
    Unauthenticated(CredentialFailure),

    #[error("forbidden")]
    Forbidden,

    #[error("rate limit exceeded")]
    RateLimited {
        /// Seconds until the current window resets.
        retry_after_seconds: u64,
        /// Window capacity.
        limit: u32,
        /// Unix timestamp at which the window resets.
        reset_epoch_seconds: u64,
    },

    #[error("not found: {0}")]
    NotFound(&'static str),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("internal server error")]
    Internal,
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Database(_) | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reset: Option<u64>,
}

impl ErrorDetail {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            retry_after_seconds: None,
            limit: None,
            remaining: None,
            reset: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail, rate_headers) = match &self {
            ApiError::Unauthenticated(failure) => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new(failure.code(), "Authentication required"),
                None,
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                ErrorDetail::new("forbidden", "Insufficient permissions"),
                None,
            ),
            ApiError::RateLimited {
                retry_after_seconds,
                limit,
                reset_epoch_seconds,
            } => {
                let mut detail = ErrorDetail::new(
                    "rate-limited",
                    "Too many requests. Please try again later.",
                );
                detail.retry_after_seconds = Some(*retry_after_seconds);
                detail.limit = Some(*limit);
                detail.remaining = Some(0);
                detail.reset = Some(*reset_epoch_seconds);
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    detail,
                    Some((*retry_after_seconds, *limit, *reset_epoch_seconds)),
                )
            }
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("not-found", format!("{resource} not found")),
                None,
            ),
            ApiError::BadRequest(reason) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("bad-request", reason.clone()),
                None,
            ),
            ApiError::Database(err) => {
                // Log the actual error server-side, return a generic message
                tracing::error!(target: "shop.database", error = %err, "Database operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorDetail::new("internal-error", "An internal error occurred"),
                    None,
                )
            }
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("internal-error", "An internal error occurred"),
                None,
            ),
        };

        let mut response = (status, Json(ErrorResponse { error: detail })).into_response();

        if let Some((retry_after, limit, reset)) = rate_headers {
            let headers = response.headers_mut();
            headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
            headers.insert("ratelimit-limit", HeaderValue::from(limit));
            headers.insert("ratelimit-remaining", HeaderValue::from(0u32));
            headers.insert("ratelimit-reset", HeaderValue::from(reset));
        }

        response
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unauthenticated_carries_reason_code() {
        let response =
            ApiError::Unauthenticated(CredentialFailure::ExpiredCredential).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "expired-credential");
    }

    #[tokio::test]
    async fn test_forbidden_response() {
        let response = ApiError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "forbidden");
    }

    #[tokio::test]
    async fn test_rate_limited_sets_headers_and_body() {
        let response = ApiError::RateLimited {
            retry_after_seconds: 42,
            limit: 100,
            reset_epoch_seconds: 1_700_000_000,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["retry-after"], "42");
        assert_eq!(response.headers()["ratelimit-limit"], "100");
        assert_eq!(response.headers()["ratelimit-remaining"], "0");
        assert_eq!(response.headers()["ratelimit-reset"], "1700000000");

        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "rate-limited");
        assert_eq!(json["error"]["retry_after_seconds"], 42);
        assert_eq!(json["error"]["limit"], 100);
    }

    #[tokio::test]
    async fn test_database_error_is_generic_to_clients() {
        let response =
            ApiError::Database("connection refused to 10.0.0.5:5432".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        let message = json["error"]["message"].as_str().unwrap();
        assert!(!message.contains("10.0.0.5"), "must not leak internals");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Unauthenticated(CredentialFailure::MissingCredential).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("user").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
