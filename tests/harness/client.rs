// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! In-process HTTP helpers.

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use crawler_testbed::{
    config::Config,
    handlers::{router, AppState},
    OutcomeSource,
};
use std::sync::Arc;
use tower::ServiceExt;

/// Host header sent with every request.
pub const HOST: &str = "crawl.test";

/// Base URL the site links to when addressed as [`HOST`].
pub const BASE_URL: &str = "http://crawl.test";

/// A fully buffered response.
#[derive(Debug)]
pub struct Fetched {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Fetched {
    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Build a router drawing outcomes from `outcomes`.
pub fn app_with(config: Config, outcomes: Arc<dyn OutcomeSource>) -> Router {
    let state = AppState::new(config, outcomes).unwrap();
    router(Arc::new(state))
}

/// GET `uri` through the router.
pub async fn get(app: &Router, uri: &str) -> Fetched {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::HOST, HOST)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    Fetched {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

/// Every `href` target in an HTML body, in document order.
pub fn extract_links(html: &str) -> Vec<String> {
    html.split("<a href=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .map(|link| link.to_string())
        .collect()
}

/// Request path for an absolute site URL.
pub fn path_of(url: &str) -> String {
    url.strip_prefix(BASE_URL).unwrap_or(url).to_string()
}
