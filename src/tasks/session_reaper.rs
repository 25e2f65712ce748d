//! Idle session expiry

use std::{sync::Arc, time::Duration};
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Background task that drops sessions idle for longer than `ttl`
pub async fn session_reaper_task(state: Arc<AppState>, ttl: Duration, every: Duration) {
    info!("Starting session reaper task (ttl={}s)", ttl.as_secs());

    let mut interval = interval(every);

    loop {
        interval.tick().await;

        match state.expire_idle(ttl) {
            Ok(0) => debug!("No idle sessions to expire"),
            Ok(n) => info!("Reaped {} idle sessions", n),
            Err(e) => warn!("Failed to expire idle sessions: {}", e),
        }
    }
}
