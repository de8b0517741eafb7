//! Drink Water - A state-managed hydration reminder companion daemon
//!
//! This is the main entry point for the drink-water application.

use std::sync::Arc;
use std::time::Instant;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::info;

use drink_water::{
    api::{create_router, ApiContext},
    backend::{Backend, LocalBackend},
    config::Config,
    controller::ViewModeController,
    tasks::controller_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "drink_water={},tower_http=info",
            config.log_level()
        ))
        .init();

    info!("Starting drink-water daemon v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, interval={}s, dwell={}s",
        config.host, config.port, config.interval, config.startup_dwell
    );

    // The in-process backend owns scheduling truth; the controller only
    // observes it. Subscribe before the controller starts so no early
    // reminder-due is missed.
    let backend = Arc::new(LocalBackend::start(config.interval));
    let reminders = backend.subscribe();

    // Controller event loop: the single serialization point for transitions.
    let (events_tx, events_rx) = mpsc::channel(64);
    let controller =
        ViewModeController::new(Arc::clone(&backend), config.dwell(), events_tx.clone());
    let controller_handle = tokio::spawn(controller_task(controller, events_rx, reminders));

    // Create HTTP router with all endpoints
    let ctx = Arc::new(ApiContext {
        events_tx,
        start_time: Instant::now(),
        port: config.port,
        host: config.host.clone(),
    });
    let app = create_router(ctx);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Control surface on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /dismiss         - Dismiss the reminder (\"Later\")");
    info!("  POST /drink           - Confirm water intake");
    info!("  POST /close           - Close the startup screen");
    info!("  POST /settings/open   - Open settings");
    info!("  PUT  /settings/draft  - Update the interval draft");
    info!("  POST /settings/preset - Apply a quick preset");
    info!("  POST /settings/save   - Save settings");
    info!("  POST /settings/back   - Leave settings without saving");
    info!("  GET  /status          - Current view mode and countdown");
    info!("  GET  /health          - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Stopping the loop drops the reminder subscription and the countdown
    // timers with it.
    controller_handle.abort();
    info!("Daemon shutdown complete");
    Ok(())
}
