//! Health check handler.

use crate::models::HealthResponse;
use axum::Json;
use chrono::Utc;

/// Handler for GET /health
///
/// Liveness probe. Deliberately outside the rate-limited prefix and the auth
/// layer so orchestrators can always reach it.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_ok() {
        let Json(response) = health_check().await;
        assert_eq!(response.status, "ok");
    }
}
