// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Minimal breadth-first crawler for simulation tests.

use super::client::{extract_links, get, path_of};
use super::metrics::CrawlMetrics;
use axum::{
    http::{header, StatusCode},
    Router,
};
use std::collections::{HashSet, VecDeque};

/// Crawler limits.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Stop after this many requests
    pub max_requests: usize,
    /// Give up on a redirect chain after this many hops
    pub max_redirects: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_requests: 500,
            max_redirects: 5,
        }
    }
}

/// Crawl the site from `/`, deduplicating links and abandoning redirect loops.
pub async fn crawl(app: &Router, config: &CrawlConfig) -> CrawlMetrics {
    let mut metrics = CrawlMetrics::new();
    let mut seen = HashSet::from(["/".to_string()]);
    let mut queue = VecDeque::from(["/".to_string()]);
    let mut requests = 0;

    'pages: while let Some(start) = queue.pop_front() {
        let mut current = start;
        let mut chain = HashSet::new();

        let response = loop {
            if requests >= config.max_requests {
                break 'pages;
            }
            let response = get(app, &current).await;
            requests += 1;
            metrics.record_response(response.status.as_u16(), response.body.len());

            if response.status != StatusCode::FOUND {
                break response;
            }

            chain.insert(current.clone());
            match response.header(header::LOCATION).map(path_of) {
                Some(next) if !chain.contains(&next) && chain.len() <= config.max_redirects => {
                    current = next;
                }
                _ => {
                    metrics.record_redirect_loop();
                    continue 'pages;
                }
            }
        };

        if response.status != StatusCode::OK {
            continue;
        }

        metrics.record_page(&current, depth_of(&current));
        for link in extract_links(&response.body) {
            let next = path_of(&link);
            if seen.insert(next.clone()) {
                queue.push_back(next);
            } else {
                metrics.record_duplicate_link();
            }
        }
    }

    metrics
}

fn depth_of(path: &str) -> u64 {
    path.strip_prefix("/page/")
        .and_then(|depth| depth.parse().ok())
        .unwrap_or(0)
}
