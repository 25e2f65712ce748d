//! Main application state management

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::TimerSnapshot;
use crate::timer::{Clock, IntervalTimer, Phase, PhaseDurations, SystemClock};

/// Errors raised while looking up or mutating sessions
#[derive(Debug, Error)]
pub enum StateError {
    #[error("session {0} not found")]
    SessionNotFound(Uuid),
    #[error("failed to lock session table: {0}")]
    LockPoisoned(String),
}

/// Published whenever a poll moves a session into a new phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseEvent {
    pub session_id: Uuid,
    pub phase: Phase,
    pub loop_count: u64,
    pub at: DateTime<Utc>,
}

/// One client's timer plus bookkeeping for idle expiry
#[derive(Debug, Clone)]
pub struct Session {
    pub timer: IntervalTimer,
    pub last_seen: Instant,
}

/// Main application state holding one independent timer per session
#[derive(Debug)]
pub struct AppState {
    sessions: Mutex<HashMap<Uuid, Session>>,
    clock: Arc<dyn Clock>,
    /// Durations handed to newly created sessions
    pub default_durations: PhaseDurations,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel for phase switch notifications
    pub phase_event_tx: broadcast::Sender<PhaseEvent>,
}

impl AppState {
    /// Create a new AppState driven by the system clock
    pub fn new(port: u16, host: String, default_durations: PhaseDurations) -> Self {
        Self::with_clock(port, host, default_durations, Arc::new(SystemClock))
    }

    /// Create a new AppState with an injected clock
    pub fn with_clock(
        port: u16,
        host: String,
        default_durations: PhaseDurations,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (phase_event_tx, _) = broadcast::channel(100);

        Self {
            sessions: Mutex::new(HashMap::new()),
            start_time: clock.now(),
            clock,
            default_durations,
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            phase_event_tx,
        }
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    fn lock_sessions(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Session>>, StateError> {
        self.sessions
            .lock()
            .map_err(|e| StateError::LockPoisoned(e.to_string()))
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Register a new stopped timer and return its id
    pub fn create_session(
        &self,
        durations: Option<PhaseDurations>,
    ) -> Result<(Uuid, TimerSnapshot), StateError> {
        let now = self.now();
        let timer = IntervalTimer::with_durations(durations.unwrap_or(self.default_durations));
        let snapshot = TimerSnapshot::capture(&timer, now);
        let id = Uuid::new_v4();

        self.lock_sessions()?.insert(id, Session { timer, last_seen: now });
        self.record_action("create");

        info!("Created session {}", id);
        Ok((id, snapshot))
    }

    /// Drop a session and its timer
    pub fn remove_session(&self, id: Uuid) -> Result<(), StateError> {
        self.lock_sessions()?
            .remove(&id)
            .ok_or(StateError::SessionNotFound(id))?;
        self.record_action("delete");

        info!("Removed session {}", id);
        Ok(())
    }

    /// Apply a user action to a session's timer and return the fresh snapshot
    pub fn update_timer<F, R>(&self, id: Uuid, action: &str, updater: F) -> Result<(R, TimerSnapshot), StateError>
    where
        F: FnOnce(&mut IntervalTimer, Instant) -> R,
    {
        let now = self.now();
        let mut sessions = self.lock_sessions()?;
        let session = sessions.get_mut(&id).ok_or(StateError::SessionNotFound(id))?;

        session.last_seen = now;
        let result = updater(&mut session.timer, now);
        let snapshot = TimerSnapshot::capture(&session.timer, now);
        drop(sessions); // Release the lock early

        self.record_action(action);
        debug!("Session {} handled action '{}'", id, action);

        Ok((result, snapshot))
    }

    /// Advance a session's timer to now and read its display values
    pub fn poll(&self, id: Uuid) -> Result<TimerSnapshot, StateError> {
        let now = self.now();
        let mut sessions = self.lock_sessions()?;
        let session = sessions.get_mut(&id).ok_or(StateError::SessionNotFound(id))?;

        session.last_seen = now;
        let tick = session.timer.tick(now);
        let snapshot = TimerSnapshot::capture(&session.timer, now);
        drop(sessions);

        if tick.switched {
            let event = PhaseEvent {
                session_id: id,
                phase: tick.phase,
                loop_count: snapshot.loop_count,
                at: Utc::now(),
            };
            if let Err(e) = self.phase_event_tx.send(event) {
                warn!("Failed to send phase event: {}", e);
            }
        }

        Ok(snapshot)
    }

    /// Remove sessions not seen for longer than `ttl`; returns how many went
    pub fn expire_idle(&self, ttl: Duration) -> Result<usize, StateError> {
        let now = self.now();
        let mut sessions = self.lock_sessions()?;

        let before = sessions.len();
        sessions.retain(|_, session| now.saturating_duration_since(session.last_seen) <= ttl);
        let expired = before - sessions.len();

        if expired > 0 {
            info!("Expired {} idle sessions", expired);
        }
        Ok(expired)
    }

    pub fn session_count(&self) -> Result<usize, StateError> {
        Ok(self.lock_sessions()?.len())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.now().saturating_duration_since(self.start_time);
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
