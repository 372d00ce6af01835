// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Process-wide fixed-window rate limiter.
//!
//! A single timestamp records the last allowed gated request. Any gated
//! request arriving less than `delay` after it is denied. Both the
//! `rate_limited` page outcome and the `/rate_limit` endpoint share one
//! instance.
//!
//! The read-compare-write sequence runs under one lock, so concurrent gated
//! requests cannot both be allowed inside the same window.

use crate::config::RateLimitConfig;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is allowed and opened a new window
    Allowed,
    /// Request is rate limited
    Limited {
        /// Time until the current window closes
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed)
    }
}

/// Decide a gated request arriving at `now`.
///
/// Returns the decision and the timestamp to store. `last_success` of `None`
/// means no gated request has ever been allowed.
pub fn evaluate(
    now: Instant,
    last_success: Option<Instant>,
    delay: Duration,
) -> (RateLimitResult, Option<Instant>) {
    if let Some(last) = last_success {
        let elapsed = now.saturating_duration_since(last);
        if elapsed < delay {
            return (
                RateLimitResult::Limited {
                    retry_after: delay - elapsed,
                },
                last_success,
            );
        }
    }
    (RateLimitResult::Allowed, Some(now))
}

/// Thread-safe shared rate limiter.
#[derive(Debug)]
pub struct RateLimiter {
    delay: Duration,
    last_success: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_delay(config.delay())
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            last_success: Mutex::new(None),
        }
    }

    /// Gate a request arriving now.
    pub async fn try_acquire(&self) -> RateLimitResult {
        self.try_acquire_at(Instant::now()).await
    }

    /// Gate a request arriving at `now`.
    pub async fn try_acquire_at(&self, now: Instant) -> RateLimitResult {
        let mut last_success = self.last_success.lock().await;
        let (result, updated) = evaluate(now, *last_success, self.delay);
        *last_success = updated;

        if let RateLimitResult::Limited { retry_after } = result {
            debug!(?retry_after, "Gated request denied");
        }
        result
    }

    /// Timestamp of the last allowed gated request.
    pub async fn last_success(&self) -> Option<Instant> {
        *self.last_success.lock().await
    }
}
