//! Phase completion notifier

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::{state::AppState, timer::Phase};

/// Background task that announces every phase switch reported by polls
pub async fn phase_notifier_task(state: Arc<AppState>) {
    info!("Starting phase notifier task");

    let mut events = state.phase_event_tx.subscribe();

    loop {
        match events.recv().await {
            Ok(event) => match event.phase {
                Phase::Break => info!(
                    "Session {}: work phase complete, break started",
                    event.session_id
                ),
                Phase::Work => info!(
                    "Session {}: break complete, loop {} finished",
                    event.session_id, event.loop_count
                ),
            },
            Err(RecvError::Lagged(skipped)) => {
                warn!("Phase notifier lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => {
                error!("Phase event channel closed, stopping notifier");
                break;
            }
        }
    }
}
