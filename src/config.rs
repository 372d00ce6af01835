// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the crawler testbed.
//!
//! Defaults reproduce the reference fixture site: 50 levels deep, a two
//! second rate-limit window and 2-5 second slow pages.

use crate::error::ConfigError;
use crate::outcome::EdgeCase;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Smallest filler block the `large` outcome may append.
pub const MIN_LARGE_PAYLOAD_BYTES: usize = 1_000_000;

/// Configuration for the crawler testbed service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 127.0.0.1:5000)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Link graph and page content configuration
    #[serde(default)]
    pub site: SiteConfig,

    /// Shared rate limiter configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Slow outcome configuration
    #[serde(default)]
    pub slow: SlowConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Shape of the generated site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Depth at which pages stop linking deeper (default: 50)
    #[serde(default = "default_max_depth")]
    pub max_depth: u64,

    /// Size of the filler block added by the `large` outcome (default: 1,000,000)
    #[serde(default = "default_large_payload_bytes")]
    pub large_payload_bytes: usize,

    /// Absolute base URL used in links and redirects. Derived from the
    /// request's Host header when unset.
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Pin every page request to one outcome instead of drawing at random
    #[serde(default)]
    pub force_outcome: Option<EdgeCase>,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Minimum spacing between allowed gated requests in seconds (default: 2)
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
}

/// Delay range for the `slow` outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlowConfig {
    #[serde(default = "default_slow_min_ms")]
    pub min_delay_ms: u64,

    #[serde(default = "default_slow_max_ms")]
    pub max_delay_ms: u64,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_max_depth() -> u64 {
    50
}

fn default_large_payload_bytes() -> usize {
    MIN_LARGE_PAYLOAD_BYTES
}

fn default_delay_secs() -> u64 {
    2
}

fn default_slow_min_ms() -> u64 {
    2000
}

fn default_slow_max_ms() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            site: SiteConfig::default(),
            rate_limit: RateLimitConfig::default(),
            slow: SlowConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            large_payload_bytes: default_large_payload_bytes(),
            public_base_url: None,
            force_outcome: None,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            delay_secs: default_delay_secs(),
        }
    }
}

impl Default for SlowConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_slow_min_ms(),
            max_delay_ms: default_slow_max_ms(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the rate limit window
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

impl SlowConfig {
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// - `BIND_ADDR`, `PUBLIC_BASE_URL`
    /// - `MAX_DEPTH`, `LARGE_PAYLOAD_BYTES`, `FORCE_OUTCOME`
    /// - `RATE_LIMIT_DELAY_SECS`
    /// - `SLOW_MIN_MS`, `SLOW_MAX_MS`
    /// - `METRICS_ENABLED`, `METRICS_PATH`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let force_outcome = match lookup("FORCE_OUTCOME") {
            Some(name) if !name.trim().is_empty() => Some(name.parse::<EdgeCase>()?),
            _ => None,
        };

        let config = Config {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            site: SiteConfig {
                max_depth: parse_var(&lookup, "MAX_DEPTH", defaults.site.max_depth)?,
                large_payload_bytes: parse_var(
                    &lookup,
                    "LARGE_PAYLOAD_BYTES",
                    defaults.site.large_payload_bytes,
                )?,
                public_base_url: lookup("PUBLIC_BASE_URL")
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| normalize_base_url(&v))
                    .transpose()?,
                force_outcome,
            },
            rate_limit: RateLimitConfig {
                delay_secs: parse_var(
                    &lookup,
                    "RATE_LIMIT_DELAY_SECS",
                    defaults.rate_limit.delay_secs,
                )?,
            },
            slow: SlowConfig {
                min_delay_ms: parse_var(&lookup, "SLOW_MIN_MS", defaults.slow.min_delay_ms)?,
                max_delay_ms: parse_var(&lookup, "SLOW_MAX_MS", defaults.slow.max_delay_ms)?,
            },
            metrics: MetricsConfig {
                enabled: parse_var(&lookup, "METRICS_ENABLED", defaults.metrics.enabled)?,
                path: lookup("METRICS_PATH").unwrap_or(defaults.metrics.path),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slow.min_delay_ms > self.slow.max_delay_ms {
            return Err(ConfigError::InvalidSlowRange {
                min_ms: self.slow.min_delay_ms,
                max_ms: self.slow.max_delay_ms,
            });
        }

        let path = &self.metrics.path;
        let reserved = ["/", "/rate_limit", "/health", "/healthz"];
        let shadows_site = path.starts_with("/page/") || reserved.contains(&path.as_str());
        if self.metrics.enabled && (!path.starts_with('/') || shadows_site) {
            return Err(ConfigError::InvalidMetricsPath(path.clone()));
        }

        if self.site.large_payload_bytes < MIN_LARGE_PAYLOAD_BYTES {
            return Err(ConfigError::LargePayloadTooSmall {
                bytes: self.site.large_payload_bytes,
                min: MIN_LARGE_PAYLOAD_BYTES,
            });
        }

        if let Some(base) = &self.site.public_base_url {
            let normalized = normalize_base_url(base)?;
            if normalized != *base {
                return Err(ConfigError::UnnormalizedBaseUrl {
                    url: base.clone(),
                    normalized,
                });
            }
        }

        Ok(())
    }

    /// True when links would fall back to a wildcard bind address such as
    /// `0.0.0.0`, which crawlers cannot reach.
    pub fn links_to_unspecified_bind(&self) -> bool {
        self.site.public_base_url.is_none()
            && self
                .bind_addr
                .parse::<SocketAddr>()
                .map(|addr| addr.ip().is_unspecified())
                .unwrap_or(false)
    }
}

/// Parse `raw` as an absolute URL and return it without a trailing `/`.
///
/// Parsing drops stray tabs and newlines, so only the normalized form may
/// end up in links and `Location` headers.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        None => Ok(default),
    }
}
