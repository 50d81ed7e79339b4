//! Database access layer.
//!
//! All queries bind their parameters; no query string is ever built from
//! request input.

pub mod orders;
pub mod products;
pub mod users;

pub use users::PgUserStore;
