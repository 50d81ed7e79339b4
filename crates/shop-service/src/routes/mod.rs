//! HTTP routes for the shop API.
//!
//! Defines the Axum router and application state. Every request to an
//! `/api/v1` path passes through the admission pipeline in a fixed order:
//! rate limiting first, then (for protected routes) token verification and
//! identity resolution, then the per-handler authorization guard.

use crate::auth::{TokenService, UserStore};
use crate::config::Config;
use crate::handlers::{auth_handler, health, orders, products, users};
use crate::middleware::{enforce_rate_limit, require_auth};
use crate::rate_limit::RateLimiter;
use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: PgPool,

    /// Service configuration.
    pub config: Config,

    /// Token signing and verification service.
    pub tokens: TokenService,

    /// User lookup used for login and per-request identity resolution.
    pub user_store: Arc<dyn UserStore>,

    /// Shared fixed-window rate limiter.
    pub rate_limiter: Arc<RateLimiter>,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health` - Liveness probe (public, unversioned, not rate limited)
/// - `/api/v1/auth/login` - Credential exchange (rate limited, no auth)
/// - `/api/v1/users`, `/api/v1/products`, `/api/v1/orders` - Protected
///   resources behind the full admission pipeline
/// - TraceLayer for request logging
/// - 30 second request timeout
pub fn build_routes(state: Arc<AppState>) -> Router {
    // Operational routes live outside the /api prefix and skip the pipeline
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(state.clone());

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        // Current user
        .route(
            "/api/v1/users/me",
            get(users::get_me).patch(users::update_me),
        )
        // User administration
        .route("/api/v1/users", get(users::list_users))
        .route("/api/v1/users/:id", delete(users::delete_user))
        // Product catalog
        .route(
            "/api/v1/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/api/v1/products/search", get(products::search_products))
        .route(
            "/api/v1/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        // Orders
        .route("/api/v1/orders", get(orders::list_orders))
        .route("/api/v1/orders/:id", get(orders::get_order))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    // Login sits under /api/v1 so it is rate limited, but carries no auth layer
    let api_routes = Router::new()
        .route("/api/v1/auth/login", post(auth_handler::login))
        .merge(protected_routes)
        // Rate limiting wraps the whole /api surface, so it runs before auth
        .layer(middleware::from_fn_with_state(
            state.clone(),
            enforce_rate_limit,
        ))
        .with_state(state);

    // Merge routes and apply global middleware layers
    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    public_routes
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // AppState must implement Clone for Axum's State extractor.
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_config_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<Config>();
    }
}
