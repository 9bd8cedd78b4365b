use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nanodash_api::automation::BrowserAutomation;
use nanodash_api::config::ServerConfig;
use nanodash_api::engine::GenerationSupervisor;
use nanodash_api::prompts::PromptDeck;
use nanodash_api::router::build_app_router;
use nanodash_api::state::AppState;
use nanodash_core::ledger::JobLedger;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nanodash_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Outputs directory ---
    tokio::fs::create_dir_all(&config.outputs_dir)
        .await
        .expect("Failed to create outputs directory");
    tracing::info!(dir = %config.outputs_dir.display(), "Outputs directory ready");

    // --- Prompt deck ---
    let prompt_deck = PromptDeck::load(&config.prompts_file).await;

    // --- App state ---
    let config = Arc::new(config);
    let ledger = Arc::new(JobLedger::new());
    let supervisor = Arc::new(GenerationSupervisor::new(
        Arc::clone(&ledger),
        Arc::clone(&config),
    ));
    let state = AppState {
        config: Arc::clone(&config),
        ledger,
        supervisor: Arc::clone(&supervisor),
        uploader: Arc::new(BrowserAutomation::new(config.automation_bin.clone())),
        prompts: Arc::new(prompt_deck),
    };

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

    // --- Post-shutdown cleanup ---
    // Launched generations cannot be cancelled; give them a window to reach
    // a terminal state so the exit is clean.
    tracing::info!("Server stopped accepting connections, draining generation jobs");
    if tokio::time::timeout(Duration::from_secs(30), supervisor.shutdown())
        .await
        .is_err()
    {
        tracing::warn!("Generation jobs still running after drain timeout");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
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
