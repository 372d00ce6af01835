// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the crawler testbed.
//!
//! Routes map request paths onto page depths and hand off to the
//! [`EdgeCaseSelector`]. Malformed depths are rejected by the `Path`
//! extractor before reaching it.

use crate::config::Config;
use crate::limiter::RateLimiter;
use crate::metrics::Metrics;
use crate::outcome::{FixedOutcome, OutcomeSource, RandomOutcomes};
use crate::selector::{EdgeCaseSelector, PageResponse};
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shared application state.
pub struct AppState {
    pub selector: EdgeCaseSelector,
    pub metrics: Arc<Metrics>,
    pub config: Config,
}

impl AppState {
    /// Build state with the outcome source implied by the configuration.
    pub fn from_config(config: Config) -> Result<Self, prometheus::Error> {
        let outcomes: Arc<dyn OutcomeSource> = match config.site.force_outcome {
            Some(outcome) => {
                info!(%outcome, "Every page request pinned to one outcome");
                Arc::new(FixedOutcome(outcome))
            }
            None => Arc::new(RandomOutcomes),
        };
        Self::new(config, outcomes)
    }

    /// Build state drawing outcomes from `outcomes`.
    pub fn new(config: Config, outcomes: Arc<dyn OutcomeSource>) -> Result<Self, prometheus::Error> {
        let limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));
        let metrics = Arc::new(Metrics::new()?);
        let selector = EdgeCaseSelector::new(&config, limiter, outcomes, metrics.clone());

        Ok(Self {
            selector,
            metrics,
            config,
        })
    }

    /// Base URL for links and redirects in a response to a request
    /// carrying `headers`.
    pub fn base_url(&self, headers: &HeaderMap) -> String {
        if let Some(base) = &self.config.site.public_base_url {
            return base.trim_end_matches('/').to_string();
        }

        match headers.get(header::HOST).and_then(|v| v.to_str().ok()) {
            Some(host) => format!("http://{}", host.trim_end_matches('/')),
            None => {
                warn!("Request without Host header, linking to bind address");
                format!("http://{}", self.config.bind_addr)
            }
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/", get(home))
        .route("/page/:depth", get(page))
        .route("/rate_limit", get(rate_limit))
        .route("/health", get(health))
        .route("/healthz", get(health));

    if state.config.metrics.enabled {
        router = router.route(&state.config.metrics.path, get(metrics));
    }

    router.with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "crawler-testbed",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Entry point for the crawler. Always a normal page at depth 0.
pub async fn home(State(state): State<Arc<AppState>>, headers: HeaderMap) -> PageResponse {
    let base_url = state.base_url(&headers);
    debug!(base_url = %base_url, "Serving entry page");
    state.selector.home(&base_url)
}

/// Page at a specific depth with an injected edge case.
pub async fn page(
    State(state): State<Arc<AppState>>,
    Path(depth): Path<u64>,
    headers: HeaderMap,
) -> PageResponse {
    let base_url = state.base_url(&headers);
    state.selector.page(depth, &base_url).await
}

/// Standalone rate-limited endpoint.
pub async fn rate_limit(State(state): State<Arc<AppState>>) -> PageResponse {
    state.selector.rate_limit_page().await
}

/// Prometheus metrics endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
