// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Edge-case outcomes and the sources that draw them.

use crate::error::OutcomeParseError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One injected behavior for a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeCase {
    /// Respond after a 2-5 second delay
    Slow,
    /// Append a 1 MB filler block to the page
    Large,
    /// 404 with a plain body
    NotFound,
    /// 503 with a plain body
    ServiceUnavailable,
    /// 302 back to the requested address
    Redirect,
    /// Repeat the first link at the end of the link list
    Duplicate,
    /// Plain page
    Normal,
    /// Gate the page behind the shared rate limiter
    RateLimited,
}

impl EdgeCase {
    /// Every outcome, in draw order.
    pub const ALL: [EdgeCase; 8] = [
        EdgeCase::Slow,
        EdgeCase::Large,
        EdgeCase::NotFound,
        EdgeCase::ServiceUnavailable,
        EdgeCase::Redirect,
        EdgeCase::Duplicate,
        EdgeCase::Normal,
        EdgeCase::RateLimited,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Large => "large",
            Self::NotFound => "not_found",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Redirect => "redirect",
            Self::Duplicate => "duplicate",
            Self::Normal => "normal",
            Self::RateLimited => "rate_limited",
        }
    }
}

impl std::fmt::Display for EdgeCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeCase {
    type Err = OutcomeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|case| case.as_str() == name)
            .ok_or_else(|| OutcomeParseError(s.to_string()))
    }
}

/// Yields the outcome for the next page request.
pub trait OutcomeSource: Send + Sync {
    fn next_outcome(&self, depth: u64) -> EdgeCase;
}

/// Uniform draw over all eight outcomes.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomOutcomes;

impl OutcomeSource for RandomOutcomes {
    fn next_outcome(&self, _depth: u64) -> EdgeCase {
        let index = rand::thread_rng().gen_range(0..EdgeCase::ALL.len());
        EdgeCase::ALL[index]
    }
}

/// Always the same outcome.
#[derive(Debug, Clone, Copy)]
pub struct FixedOutcome(pub EdgeCase);

impl OutcomeSource for FixedOutcome {
    fn next_outcome(&self, _depth: u64) -> EdgeCase {
        self.0
    }
}

/// Round-robin over a fixed script of outcomes.
///
/// An empty script yields [`EdgeCase::Normal`].
#[derive(Debug)]
pub struct CycleOutcomes {
    script: Vec<EdgeCase>,
    next: AtomicUsize,
}

impl CycleOutcomes {
    pub fn new(script: Vec<EdgeCase>) -> Self {
        Self {
            script,
            next: AtomicUsize::new(0),
        }
    }
}

impl OutcomeSource for CycleOutcomes {
    fn next_outcome(&self, _depth: u64) -> EdgeCase {
        if self.script.is_empty() {
            return EdgeCase::Normal;
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.script.len();
        self.script[index]
    }
}
