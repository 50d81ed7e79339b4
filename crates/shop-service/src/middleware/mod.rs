//! Request admission middleware.
//!
//! Applied to the `/api` prefix in a fixed order: rate limiting first
//! (protects against unauthenticated flooding), then authentication. Each
//! failing stage short-circuits with its terminal response; handlers then
//! apply their declared authorization requirement before business logic runs.

pub mod auth;
pub mod rate_limit;

pub use auth::require_auth;
pub use rate_limit::enforce_rate_limit;
