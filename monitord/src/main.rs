mod config;
mod handler;
mod service;

use axum::{routing::get, Router};
use clap::Parser;
use config::Config;
use handler::AppState;
use monitor::Metrics;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span, Instrument};
use tracing_subscriber::EnvFilter;

/// How long outstanding requests get to complete once shutdown starts
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let span = info_span!("monitord", host = %config.host);
    run(config).instrument(span).await
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting price monitor");

    let metrics = Arc::new(Metrics::new()?);
    let monitor = service::build_monitor(&config, Arc::clone(&metrics));

    let shutdown = CancellationToken::new();

    // Start price checks; the first one runs immediately
    let monitor_task = tokio::spawn({
        let shutdown = shutdown.clone();
        async move { monitor.run(shutdown).await }.in_current_span()
    });

    // Start HTTP server
    let app = Router::new()
        .route("/metrics", get(handler::metrics))
        .route("/healthz", get(handler::healthz))
        .route("/readyz", get(handler::readyz))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { metrics });

    info!("Listening on {}", config.http_address);

    let server = axum::Server::try_bind(&config.http_address)?
        .serve(app.into_make_service())
        .with_graceful_shutdown({
            let shutdown = shutdown.clone();
            async move { shutdown.cancelled().await }
        });
    let mut server = tokio::spawn(server);

    // Block until the server dies or we are asked to stop
    let result: Result<(), Box<dyn std::error::Error>> = tokio::select! {
        res = &mut server => {
            shutdown.cancel();
            match res {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(format!("server error: {}", e).into()),
                Err(e) => Err(format!("server task failed: {}", e).into()),
            }
        }
        signal = shutdown_signal() => {
            info!("Start shutdown caused by {}", signal);
            shutdown.cancel();

            // Give outstanding requests a deadline for completion
            match tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut server).await {
                Ok(Ok(Ok(()))) => Ok(()),
                Ok(Ok(Err(e))) => Err(format!("could not stop server gracefully: {}", e).into()),
                Ok(Err(e)) => Err(format!("server task failed: {}", e).into()),
                Err(_) => {
                    error!("Graceful shutdown did not complete in {:?}", SHUTDOWN_TIMEOUT);
                    server.abort();
                    Err("could not stop server gracefully".into())
                }
            }
        }
    };

    if let Err(e) = monitor_task.await {
        error!("Price monitor task failed: {}", e);
    }

    info!("Shutdown complete");
    result
}

async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", e);
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
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}
