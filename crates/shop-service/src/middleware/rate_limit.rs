//! Rate-limiting middleware.
//!
//! Runs before authentication so unauthenticated flooding is cut off at the
//! door. The client key is the peer IP from `ConnectInfo`; requests arriving
//! without connect info (non-IP test transports) share a single fallback
//! bucket. Admitted responses carry the standard `RateLimit-*` headers;
//! rejections short-circuit with 429 plus `Retry-After`.

use crate::errors::ApiError;
use crate::observability::metrics::record_rate_limit_decision;
use crate::rate_limit::RateDecision;
use crate::routes::AppState;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;

/// Rate-limiting middleware.
pub async fn enforce_rate_limit(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path();
    if state
        .config
        .rate_limit_exempt_paths
        .iter()
        .any(|prefix| path.starts_with(prefix.as_str()))
    {
        return Ok(next.run(req).await);
    }

    let key = client_key(&req);

    match state.rate_limiter.admit(&key, Utc::now()) {
        RateDecision::Admitted {
            limit,
            remaining,
            reset,
        } => {
            record_rate_limit_decision("allowed");

            let mut response = next.run(req).await;
            let headers = response.headers_mut();
            headers.insert("ratelimit-limit", HeaderValue::from(limit));
            headers.insert("ratelimit-remaining", HeaderValue::from(remaining));
            headers.insert(
                "ratelimit-reset",
                HeaderValue::from(reset.timestamp().max(0) as u64),
            );
            Ok(response)
        }
        RateDecision::Rejected {
            retry_after_seconds,
            limit,
            reset,
        } => {
            record_rate_limit_decision("rejected");
            tracing::warn!(
                target: "shop.middleware.rate_limit",
                client_key = %key,
                retry_after_seconds,
                "Rate limit exceeded"
            );
            Err(ApiError::RateLimited {
                retry_after_seconds,
                limit,
                reset_epoch_seconds: reset.timestamp().max(0) as u64,
            })
        }
    }
}

/// Derive the rate-limit bucket key for a request.
fn client_key(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|connect_info| connect_info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_client_key_uses_peer_ip_not_port() {
        let mut req = axum::http::Request::new(Body::empty());
        req.extensions_mut().insert(ConnectInfo(SocketAddr::from((
            [192, 168, 1, 7],
            54321,
        ))));

        assert_eq!(client_key(&req), "192.168.1.7");
    }

    #[test]
    fn test_client_key_falls_back_without_connect_info() {
        let req = axum::http::Request::new(Body::empty());
        assert_eq!(client_key(&req), "unknown");
    }
}
