//! Timer Keeper - named, categorized activity timers with persisted history
//!
//! This is the main entry point for the timer-keeper application.

use std::sync::Arc;
use tokio::{net::TcpListener, sync::broadcast::error::RecvError};
use tracing::{info, warn};

use timer_keeper::{
    api::create_router,
    config::Config,
    state::{AppState, TimerController},
    storage::{JsonFileStore, MemoryStore, PersistenceGateway, TimerStore},
    tasks::{spawn_persistence_writer, spawn_ticker, TICK_PERIOD},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("timer_keeper={},tower_http=info", config.log_level()))
        .init();

    info!("Starting timer-keeper v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn TimerStore> = if config.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(JsonFileStore::in_dir(&config.data_dir))
    };
    info!(
        "Configuration: host={}, port={}, store={}, persist_on_tick={}",
        config.host,
        config.port,
        store.describe(),
        config.persist_on_tick
    );

    let controller = Arc::new(TimerController::new(
        PersistenceGateway::new(store),
        config.persist_on_tick,
    ));

    // Commands are refused until this completes
    controller.load().await;

    let writer = spawn_persistence_writer(&controller);
    let ticker = spawn_ticker(Arc::clone(&controller), TICK_PERIOD);

    let mut completions = controller.subscribe_completed();
    let notifier = tokio::spawn(async move {
        loop {
            match completions.recv().await {
                Ok(name) => info!("Timer {} Completed!", name),
                Err(RecvError::Lagged(missed)) => warn!("Missed {} completion notices", missed),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let state = Arc::new(AppState::new(
        Arc::clone(&controller),
        config.port,
        config.host.clone(),
    ));
    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timers              - List timers");
    info!("  POST /timers              - Add a timer");
    info!("  GET  /timers/grouped      - Timers grouped by category");
    info!("  POST /timers/:id/start    - Start or resume a timer");
    info!("  POST /timers/:id/pause    - Pause a running timer");
    info!("  POST /timers/:id/reset    - Reset a timer");
    info!("  POST /timers/:id/complete - Mark a timer completed");
    info!("  GET  /status              - Collection and server status");
    info!("  GET  /health              - Health check");

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

    drop(ticker);
    notifier.abort();

    // Keep elapsed time accumulated since the last command
    controller.request_save();
    writer.shutdown().await;

    info!("Server shutdown complete");
    Ok(())
}
