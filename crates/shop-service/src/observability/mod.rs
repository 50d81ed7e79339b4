//! Observability helpers for the storefront API.

pub mod metrics;
