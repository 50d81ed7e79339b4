//! Rate-limiter window sweeper background task.
//!
//! The limiter itself never removes entries on the request path; this task
//! periodically evicts windows that are too old to influence any future
//! admission decision.
//!
//! # Graceful Shutdown
//!
//! The task supports graceful shutdown via a cancellation token. When the
//! token is cancelled, the task exits at the next select point.

use crate::rate_limit::RateLimiter;
use chrono::Utc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Start the window sweeper background task.
///
/// Runs one sweep per rate-limit window length. Entries become unreachable
/// for admission after one full window, so sweeping at this cadence bounds
/// the key map at roughly two windows of distinct clients.
///
/// # Returns
///
/// Returns when the cancellation token is triggered.
#[instrument(skip_all, name = "shop.task.window_sweeper")]
pub async fn start_window_sweeper(limiter: Arc<RateLimiter>, cancel_token: CancellationToken) {
    let sweep_interval = limiter.window_duration();

    info!(
        target: "shop.task.window_sweeper",
        sweep_interval_seconds = sweep_interval.as_secs(),
        "Starting rate-limit window sweeper"
    );

    let mut interval = tokio::time::interval(sweep_interval);
    // The first tick fires immediately; skip it so the first real sweep
    // happens one window in.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let evicted = limiter.evict_stale(Utc::now());
                if evicted > 0 {
                    debug!(
                        target: "shop.task.window_sweeper",
                        evicted,
                        tracked_keys = limiter.tracked_keys(),
                        "Evicted stale rate-limit windows"
                    );
                }
            }
            _ = cancel_token.cancelled() => {
                info!(
                    target: "shop.task.window_sweeper",
                    "Window sweeper received shutdown signal, exiting"
                );
                break;
            }
        }
    }

    info!(target: "shop.task.window_sweeper", "Window sweeper stopped");
}
