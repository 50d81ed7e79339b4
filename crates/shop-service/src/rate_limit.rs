//! Fixed-window request rate limiting.
//!
//! One window exists per distinct client key in a process-wide table owned by
//! [`RateLimiter`]. The limiter is an explicit object held in application
//! state and injected where needed, never a module-level singleton.
//!
//! # Algorithm
//!
//! Classic fixed window counter: per key `(window_start, count)`. A request
//! at or past `window_start + W` resets the window to `(now, 1)` and is
//! admitted; otherwise the count is incremented and the request admitted
//! while `count <= capacity`. The boundary burst at window edges is an
//! accepted property of the algorithm.
//!
//! # Concurrency
//!
//! Each key's state sits behind its own mutex inside a shared read-locked
//! map, so concurrent requests for the same key serialize their
//! increment (no lost updates) while distinct keys never contend. `admit` is
//! synchronous and never held across an await point. A consumed slot is
//! never refunded: callers that abort mid-request keep their increment.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

/// Per-key window state.
#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: DateTime<Utc>,
    count: u32,
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Admitted {
        /// Window capacity.
        limit: u32,
        /// Slots left in the current window.
        remaining: u32,
        /// Instant at which the current window resets.
        reset: DateTime<Utc>,
    },
    Rejected {
        /// Seconds (rounded up) until the current window resets.
        retry_after_seconds: u64,
        /// Window capacity.
        limit: u32,
        /// Instant at which the current window resets.
        reset: DateTime<Utc>,
    },
}

/// Process-wide fixed-window rate limiter.
pub struct RateLimiter {
    capacity: u32,
    window: Duration,
    windows: RwLock<HashMap<String, Arc<Mutex<Window>>>>,
}

impl RateLimiter {
    /// Create a limiter admitting `capacity` requests per `window_seconds`
    /// per client key.
    pub fn new(capacity: u32, window_seconds: u64) -> Self {
        Self {
            capacity,
            window: Duration::seconds(window_seconds as i64),
            windows: RwLock::new(HashMap::new()),
        }
    }

    /// Window capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Window duration as a std duration (for the sweeper interval).
    pub fn window_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.window.num_seconds().max(1) as u64)
    }

    /// Decide whether to admit a request from `key` at `now`.
    ///
    /// Creates the key's window lazily on first sight. The caller supplies
    /// `now` so decisions are deterministic under test.
    pub fn admit(&self, key: &str, now: DateTime<Utc>) -> RateDecision {
        let window = self.entry(key, now);
        let mut state = lock_unpoisoned(&window);

        if now - state.started_at >= self.window {
            // Window expired (or fresh entry): start a new one
            state.started_at = now;
            state.count = 1;
        } else {
            state.count += 1;
        }

        let reset = state.started_at + self.window;

        if state.count <= self.capacity {
            RateDecision::Admitted {
                limit: self.capacity,
                remaining: self.capacity - state.count,
                reset,
            }
        } else {
            let millis = (reset - now).num_milliseconds().max(0);
            RateDecision::Rejected {
                // Round up so a client never retries into the same window
                retry_after_seconds: ((millis + 999) / 1000) as u64,
                limit: self.capacity,
                reset,
            }
        }
    }

    /// Drop windows whose start is at least twice the window duration old.
    ///
    /// Returns the number of evicted keys. Called periodically by the window
    /// sweeper task to bound table growth under client-key churn.
    pub fn evict_stale(&self, now: DateTime<Utc>) -> usize {
        let mut map = self
            .windows
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = map.len();
        map.retain(|_, window| {
            let state = lock_unpoisoned(window);
            now - state.started_at < self.window * 2
        });
        before - map.len()
    }

    /// Number of tracked client keys.
    pub fn tracked_keys(&self) -> usize {
        self.windows
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn entry(&self, key: &str, now: DateTime<Utc>) -> Arc<Mutex<Window>> {
        // Fast path: key already tracked
        {
            let map = self
                .windows
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(window) = map.get(key) {
                return Arc::clone(window);
            }
        }

        let mut map = self
            .windows
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(map.entry(key.to_string()).or_insert_with(|| {
            Arc::new(Mutex::new(Window {
                // Backdated so the first admit() resets to (now, 1)
                started_at: now - self.window,
                count: 0,
            }))
        }))
    }
}

/// Lock a window mutex, recovering the inner state if a holder panicked.
fn lock_unpoisoned(window: &Mutex<Window>) -> MutexGuard<'_, Window> {
    window.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
