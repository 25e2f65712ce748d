//! Interval Timer - work/break phase cycling served over HTTP
//!
//! This is the main entry point for the interval-timer server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use interval_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::{phase_notifier_task, session_reaper_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("interval_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting interval-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, work={}min, break={}min, session_ttl={}min",
          config.host, config.port, config.work_minutes, config.break_minutes, config.session_ttl);

    let state = Arc::new(AppState::new(config.port, config.host.clone(), config.default_durations()));

    tokio::spawn(phase_notifier_task(Arc::clone(&state)));
    tokio::spawn(session_reaper_task(
        Arc::clone(&state),
        config.session_ttl(),
        config.reap_interval(),
    ));

    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /sessions               - Create a timer session");
    info!("  GET    /sessions/:id           - Poll remaining time, progress and statistics");
    info!("  POST   /sessions/:id/start     - Start a fresh work phase");
    info!("  POST   /sessions/:id/pause     - Pause the timer");
    info!("  POST   /sessions/:id/stop      - Stop the timer");
    info!("  POST   /sessions/:id/reset     - Reset counters, keep durations");
    info!("  PUT    /sessions/:id/durations - Change work/break durations");
    info!("  DELETE /sessions/:id           - Drop a session");
    info!("  GET    /status                 - Server status");
    info!("  GET    /health                 - Health check");

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

    info!("Server shutdown complete");
    Ok(())
}
