//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::state::{AppState, StateError};
use super::responses::{DurationsRequest, HealthResponse, SessionResponse, StatusResponse};

/// Map a state error to the HTTP status reported to the client
fn error_status(id: Uuid, e: &StateError) -> StatusCode {
    match e {
        StateError::SessionNotFound(_) => {
            warn!("Request for unknown session {}", id);
            StatusCode::NOT_FOUND
        }
        StateError::LockPoisoned(_) => {
            error!("Session {} unavailable: {}", id, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Handle POST /sessions - Create a new stopped timer
pub async fn create_session_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DurationsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionResponse>), StatusCode> {
    // No JSON body means "use the server defaults"; a body that fails to parse is rejected
    let durations = match body {
        Ok(Json(request)) => match request.validate() {
            Ok(d) => Some(d),
            Err(msg) => {
                warn!("Rejected session durations: {}", msg);
                return Err(StatusCode::UNPROCESSABLE_ENTITY);
            }
        },
        Err(JsonRejection::MissingJsonContentType(_)) => None,
        Err(rejection) => {
            warn!("Rejected session body: {}", rejection.body_text());
            return Err(StatusCode::UNPROCESSABLE_ENTITY);
        }
    };

    match state.create_session(durations) {
        Ok((id, timer)) => Ok((
            StatusCode::CREATED,
            Json(SessionResponse::from_timer("Session created".to_string(), id, timer)),
        )),
        Err(e) => {
            error!("Failed to create session: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle DELETE /sessions/:id - Drop a session
pub async fn delete_session_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    match state.remove_session(id) {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(e) => error_status(id, &e),
    }
}

/// Handle GET /sessions/:id - Advance the timer and return display values
pub async fn poll_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, StatusCode> {
    state
        .poll(id)
        .map(|timer| Json(SessionResponse::from_timer("Timer polled".to_string(), id, timer)))
        .map_err(|e| error_status(id, &e))
}

/// Handle POST /sessions/:id/start - Begin a fresh work phase
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, StatusCode> {
    match state.update_timer(id, "start", |timer, now| timer.start(now)) {
        Ok(((), timer)) => {
            info!("Session {} started", id);
            Ok(Json(SessionResponse::from_timer("Timer started".to_string(), id, timer)))
        }
        Err(e) => Err(error_status(id, &e)),
    }
}

/// Handle POST /sessions/:id/pause - Halt the countdown
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, StatusCode> {
    match state.update_timer(id, "pause", |timer, _| timer.pause()) {
        Ok(((), timer)) => {
            info!("Session {} paused", id);
            Ok(Json(SessionResponse::from_timer("Timer paused".to_string(), id, timer)))
        }
        Err(e) => Err(error_status(id, &e)),
    }
}

/// Handle POST /sessions/:id/stop - Halt the countdown
pub async fn stop_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, StatusCode> {
    match state.update_timer(id, "stop", |timer, _| timer.stop()) {
        Ok(((), timer)) => {
            info!("Session {} stopped", id);
            Ok(Json(SessionResponse::from_timer("Timer stopped".to_string(), id, timer)))
        }
        Err(e) => Err(error_status(id, &e)),
    }
}

/// Handle POST /sessions/:id/reset - Clear counters, keep durations
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, StatusCode> {
    match state.update_timer(id, "reset", |timer, _| timer.reset()) {
        Ok(((), timer)) => {
            info!("Session {} reset", id);
            Ok(Json(SessionResponse::from_timer("Timer reset".to_string(), id, timer)))
        }
        Err(e) => Err(error_status(id, &e)),
    }
}

/// Handle PUT /sessions/:id/durations - Change work/break lengths
pub async fn durations_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<DurationsRequest>,
) -> Result<Json<SessionResponse>, StatusCode> {
    let durations = match request.validate() {
        Ok(d) => d,
        Err(msg) => {
            warn!("Rejected durations for session {}: {}", id, msg);
            return Err(StatusCode::UNPROCESSABLE_ENTITY);
        }
    };

    match state.update_timer(id, "configure", |timer, _| timer.configure(durations)) {
        Ok((true, timer)) => Ok(Json(SessionResponse::from_timer(
            "Durations updated".to_string(),
            id,
            timer,
        ))),
        Ok((false, timer)) => {
            info!("Session {} is running, durations left unchanged", id);
            Ok(Json(SessionResponse::ignored(
                "Durations cannot change while the timer is running".to_string(),
                id,
                timer,
            )))
        }
        Err(e) => Err(error_status(id, &e)),
    }
}

/// Handle GET /status - Return server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let sessions = match state.session_count() {
        Ok(n) => n,
        Err(e) => {
            error!("Failed to count sessions: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        sessions,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
