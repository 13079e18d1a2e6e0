// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use binance_futures_relay::{
    api::router,
    auth::ApiCredentials,
    config::{AppConfig, LogFormat, BINANCE_FUTURES_BASE_URL, DEFAULT_LOG_FILTER},
    providers::BinanceFuturesClient,
    state::AppState,
};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the process environment is authoritative.
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    let credentials = ApiCredentials::from_env().inspect_err(|e| {
        error!(error = %e, "Binance credentials are not configured");
    })?;

    let client = BinanceFuturesClient::new(
        BINANCE_FUTURES_BASE_URL,
        credentials,
        config.upstream_timeout,
    )?;
    let app = router(AppState::new(client));

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    info!(
        address = %addr,
        upstream = BINANCE_FUTURES_BASE_URL,
        timeout_secs = config.upstream_timeout.map(|t| t.as_secs()),
        "Server running (docs at /docs)"
    );
    info!(environment = %config.app_env, "Environment");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
