use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use estate_core::app_state::build_app_state;
use estate_core::config::AppConfig;
use estate_core::core::persistence::database::Database;
use estate_core::{debug, logging, routes, scheduler};

#[tokio::main]
async fn main() -> Result<()> {
    let (config, fallbacks) = AppConfig::from_env();
    let _log_guard = logging::init(&config)?;
    for fallback in &fallbacks {
        fallback.log();
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting estate-core");

    let db = Database::open(&config.database_path)?;
    if config.debug_mode {
        debug::run_debug(&db).await?;
        return Ok(());
    }

    let state = build_app_state(db, &config);
    let sweeper = scheduler::spawn(state.clone(), &config);
    let app = routes::app_router().with_state(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    sweeper.abort();
    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
