// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metrics collection for crawl simulation results.

use std::collections::{HashMap, HashSet};
use std::fmt;

/// Collects what a crawl observed.
#[derive(Debug, Default)]
pub struct CrawlMetrics {
    /// Responses by status code
    statuses: HashMap<u16, usize>,
    /// Distinct paths that returned a page
    pages: HashSet<String>,
    /// Links skipped because they were already queued or visited
    duplicate_links: usize,
    /// Redirect chains abandoned as loops
    redirect_loops: usize,
    /// Deepest page that returned 200
    max_depth: u64,
    /// Total body bytes received
    bytes: usize,
}

impl CrawlMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_response(&mut self, status: u16, bytes: usize) {
        *self.statuses.entry(status).or_insert(0) += 1;
        self.bytes += bytes;
    }

    pub fn record_page(&mut self, path: &str, depth: u64) {
        self.pages.insert(path.to_string());
        self.max_depth = self.max_depth.max(depth);
    }

    pub fn record_duplicate_link(&mut self) {
        self.duplicate_links += 1;
    }

    pub fn record_redirect_loop(&mut self) {
        self.redirect_loops += 1;
    }

    pub fn report(&self) -> CrawlReport {
        CrawlReport {
            requests: self.statuses.values().sum(),
            pages: self.pages.len(),
            status_ok: self.count(200),
            status_redirect: self.count(302),
            status_not_found: self.count(404),
            status_rate_limited: self.count(429),
            status_unavailable: self.count(503),
            duplicate_links: self.duplicate_links,
            redirect_loops: self.redirect_loops,
            max_depth: self.max_depth,
            bytes: self.bytes,
        }
    }

    fn count(&self, status: u16) -> usize {
        self.statuses.get(&status).copied().unwrap_or(0)
    }
}

/// Summary of a crawl.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub requests: usize,
    pub pages: usize,
    pub status_ok: usize,
    pub status_redirect: usize,
    pub status_not_found: usize,
    pub status_rate_limited: usize,
    pub status_unavailable: usize,
    pub duplicate_links: usize,
    pub redirect_loops: usize,
    pub max_depth: u64,
    pub bytes: usize,
}

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Crawl Report ===")?;
        writeln!(f, "Requests:        {}", self.requests)?;
        writeln!(f, "Pages:           {}", self.pages)?;
        writeln!(f, "Max depth:       {}", self.max_depth)?;
        writeln!(f, "200 / 302:       {} / {}", self.status_ok, self.status_redirect)?;
        writeln!(
            f,
            "404 / 429 / 503: {} / {} / {}",
            self.status_not_found, self.status_rate_limited, self.status_unavailable
        )?;
        writeln!(f, "Duplicate links: {}", self.duplicate_links)?;
        writeln!(f, "Redirect loops:  {}", self.redirect_loops)?;
        write!(f, "Bytes:           {}", self.bytes)
    }
}
