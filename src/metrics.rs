// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for served outcomes and rate-limit decisions.

use crate::outcome::EdgeCase;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Gated entry points sharing the rate limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatedEndpoint {
    /// `rate_limited` outcome on `/page/<depth>`
    Page,
    /// Standalone `/rate_limit`
    RateLimit,
}

impl GatedEndpoint {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::RateLimit => "rate_limit",
        }
    }
}

/// Service metrics in a private registry.
pub struct Metrics {
    registry: Registry,
    outcomes: IntCounterVec,
    rate_limit_decisions: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let outcomes = IntCounterVec::new(
            Opts::new(
                "crawler_testbed_outcomes_total",
                "Page responses served, by injected outcome",
            ),
            &["outcome"],
        )?;
        let rate_limit_decisions = IntCounterVec::new(
            Opts::new(
                "crawler_testbed_rate_limit_decisions_total",
                "Shared rate limiter decisions, by entry point",
            ),
            &["endpoint", "decision"],
        )?;

        registry.register(Box::new(outcomes.clone()))?;
        registry.register(Box::new(rate_limit_decisions.clone()))?;

        Ok(Self {
            registry,
            outcomes,
            rate_limit_decisions,
        })
    }

    pub fn record_outcome(&self, outcome: EdgeCase) {
        self.outcomes.with_label_values(&[outcome.as_str()]).inc();
    }

    pub fn record_rate_limit(&self, endpoint: GatedEndpoint, allowed: bool) {
        let decision = if allowed { "allowed" } else { "denied" };
        self.rate_limit_decisions
            .with_label_values(&[endpoint.as_str(), decision])
            .inc();
    }

    pub fn outcome_count(&self, outcome: EdgeCase) -> u64 {
        self.outcomes.with_label_values(&[outcome.as_str()]).get()
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buffer) {
            tracing::warn!(error = %e, "Failed to encode metrics");
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_render() {
        let metrics = Metrics::new().unwrap();
        metrics.record_outcome(EdgeCase::Redirect);
        metrics.record_outcome(EdgeCase::Redirect);
        metrics.record_rate_limit(GatedEndpoint::RateLimit, false);

        assert_eq!(metrics.outcome_count(EdgeCase::Redirect), 2);
        assert_eq!(metrics.outcome_count(EdgeCase::Slow), 0);

        let text = metrics.render();
        assert!(text.contains("crawler_testbed_outcomes_total{outcome=\"redirect\"} 2"));
        let decision_line = text
            .lines()
            .find(|l| l.starts_with("crawler_testbed_rate_limit_decisions_total{"))
            .unwrap();
        assert!(decision_line.contains("decision=\"denied\""));
        assert!(decision_line.contains("endpoint=\"rate_limit\""));
        assert!(decision_line.ends_with(" 1"));
    }
}
