// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-request edge-case injection.
//!
//! Each page request draws one [`EdgeCase`] and turns it into a response.
//! The only state that outlives a request is the shared [`RateLimiter`].

use crate::config::{Config, SiteConfig, SlowConfig};
use crate::graph::{generate_page_links, page_url};
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::metrics::{GatedEndpoint, Metrics};
use crate::outcome::{EdgeCase, OutcomeSource};
use crate::render::{large_payload, render_page, RATE_LIMITED_PAGE};
use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const NOT_FOUND_BODY: &str = "404 Not Found";
const SERVICE_UNAVAILABLE_BODY: &str = "503 Service Unavailable";
const TOO_MANY_REQUESTS_BODY: &str = "429 Too Many Requests";

/// Response chosen for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageResponse {
    /// 200 with an HTML body
    Page(String),
    /// Injected error status with a plain body
    Fault {
        status: StatusCode,
        message: &'static str,
    },
    /// 429 from the shared rate limiter
    Throttled { retry_after: Duration },
    /// 302 to `location`
    Redirect { location: String },
}

impl PageResponse {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Page(_) => StatusCode::OK,
            Self::Fault { status, .. } => *status,
            Self::Throttled { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Redirect { .. } => StatusCode::FOUND,
        }
    }

    /// HTML body, if this is a page.
    pub fn html(&self) -> Option<&str> {
        match self {
            Self::Page(body) => Some(body),
            _ => None,
        }
    }
}

impl IntoResponse for PageResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Page(body) => Html(body).into_response(),
            Self::Fault { status, message } => (status, message).into_response(),
            Self::Throttled { retry_after } => (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after_secs(retry_after).to_string())],
                TOO_MANY_REQUESTS_BODY,
            )
                .into_response(),
            Self::Redirect { location } => {
                (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
            }
        }
    }
}

/// Whole seconds to advertise in `Retry-After`, rounded up.
fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}

/// Draws an outcome per page request and builds the response.
pub struct EdgeCaseSelector {
    site: SiteConfig,
    slow: SlowConfig,
    limiter: Arc<RateLimiter>,
    outcomes: Arc<dyn OutcomeSource>,
    metrics: Arc<Metrics>,
}

impl EdgeCaseSelector {
    pub fn new(
        config: &Config,
        limiter: Arc<RateLimiter>,
        outcomes: Arc<dyn OutcomeSource>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            site: config.site.clone(),
            slow: config.slow.clone(),
            limiter,
            outcomes,
            metrics,
        }
    }

    /// Entry page. Never draws an outcome.
    pub fn home(&self, base_url: &str) -> PageResponse {
        let links = generate_page_links(0, self.site.max_depth, base_url);
        self.metrics.record_outcome(EdgeCase::Normal);
        PageResponse::Page(render_page(0, &links))
    }

    /// Page at `depth` with a freshly drawn outcome.
    pub async fn page(&self, depth: u64, base_url: &str) -> PageResponse {
        let outcome = self.outcomes.next_outcome(depth);
        self.respond(depth, base_url, outcome).await
    }

    /// Page at `depth` with the given outcome.
    pub async fn respond(&self, depth: u64, base_url: &str, outcome: EdgeCase) -> PageResponse {
        let mut links = generate_page_links(depth, self.site.max_depth, base_url);
        self.metrics.record_outcome(outcome);
        debug!(depth, %outcome, links = links.len(), "Serving page");

        match outcome {
            EdgeCase::Slow => {
                let delay = self.slow_delay();
                info!(depth, delay_ms = delay.as_millis() as u64, "Injecting slow response");
                tokio::time::sleep(delay).await;
            }
            EdgeCase::Large => {
                let mut body = render_page(depth, &links);
                body.push_str(&large_payload(self.site.large_payload_bytes));
                info!(depth, bytes = body.len(), "Injecting large response");
                return PageResponse::Page(body);
            }
            EdgeCase::NotFound => {
                info!(depth, "Injecting 404");
                return PageResponse::Fault {
                    status: StatusCode::NOT_FOUND,
                    message: NOT_FOUND_BODY,
                };
            }
            EdgeCase::ServiceUnavailable => {
                info!(depth, "Injecting 503");
                return PageResponse::Fault {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    message: SERVICE_UNAVAILABLE_BODY,
                };
            }
            EdgeCase::Redirect => {
                let location = page_url(base_url, depth);
                info!(depth, location = %location, "Injecting self-redirect");
                return PageResponse::Redirect { location };
            }
            EdgeCase::Duplicate => {
                // Depth-capped pages have nothing to duplicate
                if let Some(first) = links.first().cloned() {
                    links.push(first);
                }
            }
            EdgeCase::RateLimited => {
                if let Some(throttled) = self.gate(GatedEndpoint::Page).await {
                    info!(depth, "Rate limited page request");
                    return throttled;
                }
            }
            EdgeCase::Normal => {}
        }

        PageResponse::Page(render_page(depth, &links))
    }

    /// Standalone rate-limited page sharing the page limiter.
    pub async fn rate_limit_page(&self) -> PageResponse {
        match self.gate(GatedEndpoint::RateLimit).await {
            Some(throttled) => {
                info!("Rate limited /rate_limit request");
                throttled
            }
            None => PageResponse::Page(RATE_LIMITED_PAGE.to_string()),
        }
    }

    /// Returns the 429 response when the shared limiter denies the request.
    async fn gate(&self, endpoint: GatedEndpoint) -> Option<PageResponse> {
        let result = self.limiter.try_acquire().await;
        self.metrics.record_rate_limit(endpoint, result.is_allowed());
        match result {
            RateLimitResult::Allowed => None,
            RateLimitResult::Limited { retry_after } => {
                Some(PageResponse::Throttled { retry_after })
            }
        }
    }

    fn slow_delay(&self) -> Duration {
        let (min, max) = (self.slow.min_delay_ms, self.slow.max_delay_ms);
        if min >= max {
            return Duration::from_millis(min);
        }
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}
