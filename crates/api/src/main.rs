use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cre8_api::config::ServerConfig;
use cre8_api::router::build_app_router;
use cre8_api::state::AppState;
use cre8_engine::config::EngineConfig;
use cre8_engine::registry::ModelRegistry;
use cre8_engine::renderer::SdProcessRenderer;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cre8_api=debug,cre8_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    let engine = EngineConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Model registry ---
    // Every capability must be resident before the server accepts traffic;
    // partial availability would yield silently broken endpoints.
    let registry = Arc::new(ModelRegistry::new());
    if let Err(e) = registry.initialize(&engine) {
        tracing::error!(error = %e, "Failed to initialize model registry");
        std::process::exit(1);
    }

    // --- External renderer ---
    let renderer = Arc::new(SdProcessRenderer::new(
        engine.sd_binary.clone(),
        engine.process_timeout,
    ));

    // --- App state ---
    let state = AppState::new(config.clone(), engine, registry, renderer);

    // --- Artifact directories ---
    for dir in state.store.directories() {
        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            tracing::error!(dir = %dir.display(), error = %e, "Failed to create artifact directory");
            std::process::exit(1);
        }
    }
    tracing::info!(root = %state.store.root().display(), "Artifact directories ready");

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
