//! Sliding-window rate limiting keyed by client identifier.
//!
//! Per-instance and in-memory; counts reset on restart. A periodic sweep
//! drops identifiers that have been idle for more than twice the window.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use axum::http::HeaderMap;
use dashmap::DashMap;

/// Maximum requests allowed per window.
pub const DEFAULT_MAX_REQUESTS: usize = 3;

/// Window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(10 * 60);

/// How often the background sweep runs.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The request was counted and may proceed.
    Allowed,
    /// The client has exhausted the window.
    Limited {
        /// Time until the oldest counted request leaves the window.
        retry_after: Duration,
    },
}

/// Sliding-window limiter over per-client timestamp lists.
pub struct SlidingWindowLimiter {
    max_requests: usize,
    window: Duration,
    hits: DashMap<String, Vec<Instant>>,
}

impl SlidingWindowLimiter {
    /// Creates a limiter allowing `max_requests` per `window`.
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            hits: DashMap::new(),
        }
    }

    /// Checks and counts a request for `key` at the current time.
    pub fn check(&self, key: &str) -> Decision {
        self.check_at(key, Instant::now())
    }

    /// Checks and counts a request for `key` as of `now`.
    ///
    /// Timestamps older than the window are dropped before counting, so the
    /// window slides rather than resetting on a fixed boundary.
    pub fn check_at(&self, key: &str, now: Instant) -> Decision {
        let mut entry = self.hits.entry(key.to_string()).or_default();
        entry.retain(|t| now.duration_since(*t) < self.window);

        if entry.len() >= self.max_requests {
            let oldest = entry[0];
            let retry_after = self.window.saturating_sub(now.duration_since(oldest));
            return Decision::Limited { retry_after };
        }

        entry.push(now);
        Decision::Allowed
    }

    /// Evicts clients whose newest request is older than twice the window.
    pub fn sweep(&self) {
        self.sweep_at(Instant::now());
    }

    /// Sweep as of `now`.
    pub fn sweep_at(&self, now: Instant) {
        let cutoff = self.window * 2;
        self.hits.retain(|_, times| {
            times
                .last()
                .is_some_and(|newest| now.duration_since(*newest) < cutoff)
        });
    }

    /// Number of client identifiers currently tracked.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.hits.len()
    }
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}

/// Derives the rate-limit key for a request.
///
/// Takes the first `x-forwarded-for` entry, then `x-real-ip`, else
/// `unknown`. Loopback, private, and unknown addresses get a fresh key per
/// request so local development is never throttled.
#[must_use]
pub fn client_key(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let mut ip = forwarded.or(real_ip).unwrap_or("unknown");
    if let Some(mapped) = ip.strip_prefix("::ffff:") {
        ip = mapped;
    }

    if is_local(ip) {
        // Unique per request; milliseconds alone can collide under load.
        static DEV_SEQ: AtomicU64 = AtomicU64::new(0);
        return format!("dev-{}", DEV_SEQ.fetch_add(1, Ordering::Relaxed));
    }
    ip.to_string()
}

fn is_local(ip: &str) -> bool {
    ip == "127.0.0.1"
        || ip == "::1"
        || ip == "unknown"
        || ip.starts_with("192.168.")
        || ip.starts_with("10.")
}
