// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for startup configuration.
//!
//! Request handling has no error path: every injected fault is an ordinary
//! response. Only loading the configuration can fail.

use thiserror::Error;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Invalid slow delay range: min {min_ms}ms exceeds max {max_ms}ms")]
    InvalidSlowRange { min_ms: u64, max_ms: u64 },

    #[error("Invalid public base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Public base URL {url:?} is not in normalized form {normalized:?}")]
    UnnormalizedBaseUrl { url: String, normalized: String },

    #[error("Large payload of {bytes} bytes is below the {min} byte minimum")]
    LargePayloadTooSmall { bytes: usize, min: usize },

    #[error("Invalid metrics path {0:?}: must start with '/' and not shadow a site route")]
    InvalidMetricsPath(String),

    #[error(transparent)]
    Outcome(#[from] OutcomeParseError),
}

/// Unknown edge-case name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown edge case {0:?}")]
pub struct OutcomeParseError(pub String);
