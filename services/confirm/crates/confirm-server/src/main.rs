//! scalegate confirm server entry point.
//!
//! Initialises tracing, loads configuration from environment variables
//! (prefixed with `SCALEGATE_`), and serves the lifecycle notification
//! endpoint over HTTPS or plaintext HTTP.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum_server::tls_rustls::RustlsConfig;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use scalegate_common::config::ProbeConfig;
use scalegate_confirm::http::{AppState, router};

// ===================================================================
// Configuration
// ===================================================================

/// Server configuration loaded from environment variables via `envy`.
///
/// Each field maps to `SCALEGATE_<FIELD>`:
///   - `SCALEGATE_LISTEN_ADDR`              (default `0.0.0.0:8080`)
///   - `SCALEGATE_PROBE_POLL_ATTEMPTS`      (default `20`)
///   - `SCALEGATE_PROBE_POLL_INTERVAL_SECS` (default `2`)
///   - `SCALEGATE_TLS_CERT`                 (optional, path to TLS cert)
///   - `SCALEGATE_TLS_KEY`                  (optional, path to TLS key)
#[derive(Debug, Deserialize)]
struct Config {
    /// Socket address to bind the HTTP server to.
    #[serde(default = "default_listen_addr")]
    listen_addr: String,

    /// Poll-loop retry budget for the readiness probe.
    #[serde(default = "default_poll_attempts")]
    probe_poll_attempts: u32,

    /// Seconds slept before each probe status query.
    #[serde(default = "default_poll_interval_secs")]
    probe_poll_interval_secs: u64,

    /// Path to TLS certificate (enables HTTPS when set).
    tls_cert: Option<String>,

    /// Path to TLS private key.
    tls_key: Option<String>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_poll_attempts() -> u32 {
    scalegate_common::config::DEFAULT_POLL_ATTEMPTS
}

fn default_poll_interval_secs() -> u64 {
    scalegate_common::config::DEFAULT_POLL_INTERVAL.as_secs()
}

// ===================================================================
// Entry point
// ===================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialise tracing with RUST_LOG env filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("scalegate-confirmd starting");

    // 2. Load configuration from SCALEGATE_* env vars.
    let config: Config = envy::prefixed("SCALEGATE_")
        .from_env()
        .context("failed to load config from SCALEGATE_* env vars")?;

    // 3. The probe configuration is fixed here, once; the workflow itself
    //    never reads the environment.
    let probe = ProbeConfig {
        poll_attempts: config.probe_poll_attempts,
        poll_interval: Duration::from_secs(config.probe_poll_interval_secs),
    };

    tracing::info!(
        listen_addr = %config.listen_addr,
        poll_attempts = probe.poll_attempts,
        poll_interval_secs = probe.poll_interval.as_secs(),
        tls_enabled = config.tls_cert.is_some(),
        "configuration loaded",
    );

    // 4. Build shared state and the router.
    let state = Arc::new(AppState::new(probe));
    let app = router(state);

    // 5. Bind and serve (TLS or plaintext).
    let addr: std::net::SocketAddr = config
        .listen_addr
        .parse()
        .context("invalid listen address")?;

    if let (Some(cert_path), Some(key_path)) = (&config.tls_cert, &config.tls_key) {
        tracing::info!("TLS enabled — loading cert from {}", cert_path);
        let tls_config = RustlsConfig::from_pem_file(cert_path, key_path)
            .await
            .context("failed to load TLS certificates")?;

        tracing::info!("confirm server ready — https://{}/lifecycle", config.listen_addr);

        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .context("HTTPS server error")?;
    } else {
        tracing::info!(
            "confirm server ready — http://{}/lifecycle (TLS disabled)",
            config.listen_addr,
        );

        let listener = tokio::net::TcpListener::bind(&config.listen_addr)
            .await
            .context("failed to bind TCP listener")?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")?;
    }

    tracing::info!("scalegate-confirmd shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) for graceful shutdown.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl-C handler");
    tracing::info!("received shutdown signal");
}
