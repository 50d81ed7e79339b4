//! Shop API service library.
//!
//! A small ecommerce HTTP API whose core is the request admission pipeline:
//! per-client rate limiting, bearer token verification, identity resolution
//! against the user store, and per-handler authorization, in that order.
//!
//! Exposed as a library so integration tests can drive the full router
//! in-process.

pub mod auth;
pub mod authz;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod rate_limit;
pub mod repositories;
pub mod routes;
pub mod tasks;
