//! Metrics for the request admission pipeline.
//!
//! All metrics follow Prometheus naming conventions with a `shop_` prefix and
//! `_total` suffix for counters.
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `decision`: 2 values (allowed, rejected)
//! - `status`: 2 values (success, error)
//! - `error_category`: 4 values (missing, malformed, invalid, expired)

use metrics::counter;

/// Record a rate-limit admission decision.
///
/// Metric: `shop_rate_limit_decisions_total`
/// Labels: `decision`
pub fn record_rate_limit_decision(decision: &str) {
    counter!("shop_rate_limit_decisions_total", "decision" => decision.to_string()).increment(1);
}

/// Record a token validation result.
///
/// Metric: `shop_token_validations_total`
/// Labels: `status`, `error_category`
pub fn record_token_validation(status: &str, error_category: Option<&str>) {
    let category = error_category.unwrap_or("none");
    counter!("shop_token_validations_total", "status" => status.to_string(), "error_category" => category.to_string())
        .increment(1);
}
