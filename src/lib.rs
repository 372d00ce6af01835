// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Crawler Testbed
//!
//! A synthetic site for testing web crawlers against hostile servers. Pages
//! form a depth-bounded link graph, and every `/page/<depth>` request draws
//! one injected behavior:
//!
//! - Slow responses (2-5s)
//! - Oversized payloads (1 MB of filler)
//! - 404 and 503 statuses
//! - Infinite self-redirects
//! - Duplicate links
//! - Rate limiting shared with the `/rate_limit` endpoint

pub mod config;
pub mod error;
pub mod graph;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod outcome;
pub mod render;
pub mod selector;

pub use config::Config;
pub use limiter::{RateLimitResult, RateLimiter};
pub use outcome::{EdgeCase, OutcomeSource};
pub use selector::{EdgeCaseSelector, PageResponse};
