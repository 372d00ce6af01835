// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Crawler Testbed Service
//!
//! Serves a synthetic site for exercising web crawlers. Every page request
//! draws one of eight behaviors: slow, large, 404, 503, self-redirect,
//! duplicate links, normal, or rate limited.
//!
//! ## Routes
//!
//! - `/`: entry page, always normal
//! - `/page/<depth>`: page with an injected edge case
//! - `/rate_limit`: page gated by the shared rate limiter
//! - `/health`, `/healthz`: liveness
//! - `/metrics`: Prometheus counters
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 127.0.0.1:5000)
//! - `MAX_DEPTH`: Depth at which pages stop linking (default: 50)
//! - `RATE_LIMIT_DELAY_SECS`: Shared rate limit window (default: 2)
//! - `SLOW_MIN_MS` / `SLOW_MAX_MS`: Slow page delay range (default: 2000/5000)
//! - `FORCE_OUTCOME`: Pin every page to one outcome (e.g. `redirect`)
//! - `PUBLIC_BASE_URL`: Absolute base for links instead of the Host header

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crawler_testbed::{
    config::Config,
    handlers::{router, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        max_depth = config.site.max_depth,
        rate_limit_delay_secs = config.rate_limit.delay_secs,
        slow_min_ms = config.slow.min_delay_ms,
        slow_max_ms = config.slow.max_delay_ms,
        force_outcome = ?config.site.force_outcome,
        "Starting crawler testbed"
    );

    if config.links_to_unspecified_bind() {
        warn!(
            bind_addr = %config.bind_addr,
            "Wildcard bind without PUBLIC_BASE_URL; requests lacking a Host header get unreachable links"
        );
    }

    let addr: SocketAddr = config.bind_addr.parse()?;
    let state = Arc::new(AppState::from_config(config)?);

    let app = router(state).layer(TraceLayer::new_for_http());

    // Start server
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
