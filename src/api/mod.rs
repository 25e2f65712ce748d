//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sessions", post(create_session_handler))
        .route("/sessions/:id", get(poll_handler).delete(delete_session_handler))
        .route("/sessions/:id/start", post(start_handler))
        .route("/sessions/:id/pause", post(pause_handler))
        .route("/sessions/:id/stop", post(stop_handler))
        .route("/sessions/:id/reset", post(reset_handler))
        .route("/sessions/:id/durations", put(durations_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::timer::{ManualClock, PhaseDurations};

    fn test_app() -> (Arc<ManualClock>, Router) {
        let clock = Arc::new(ManualClock::new());
        let state = Arc::new(AppState::with_clock(
            0,
            "127.0.0.1".to_string(),
            PhaseDurations::default(),
            clock.clone(),
        ));
        (clock, create_router(state))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(v) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(v.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        // Extractor rejections come back as plain text
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    async fn create(app: &Router, body: Option<Value>) -> String {
        let (status, value) = send(app, "POST", "/sessions", body).await;
        assert_eq!(status, StatusCode::CREATED);
        value["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_full_cycle_over_http() {
        let (clock, app) = test_app();
        let id = create(
            &app,
            Some(json!({"work_minutes": 0, "work_seconds": 2, "break_minutes": 0, "break_seconds": 1})),
        )
        .await;

        let (status, value) = send(&app, "POST", &format!("/sessions/{}/start", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["status"], "running");
        assert_eq!(value["timer"]["phase"], "work");
        assert_eq!(value["timer"]["remaining_seconds"], 2);

        clock.advance(Duration::from_secs(2));
        let (_, value) = send(&app, "GET", &format!("/sessions/{}", id), None).await;
        assert_eq!(value["timer"]["phase"], "break");
        assert_eq!(value["timer"]["remaining_display"], "00:01");
        assert_eq!(value["timer"]["notification_active"], true);
        assert_eq!(value["timer"]["loop_count"], 0);

        clock.advance(Duration::from_secs(1));
        let (_, value) = send(&app, "GET", &format!("/sessions/{}", id), None).await;
        assert_eq!(value["timer"]["phase"], "work");
        assert_eq!(value["timer"]["loop_count"], 1);
        assert_eq!(value["timer"]["statistics"]["completed_loops"], 1);
    }

    #[tokio::test]
    async fn test_default_session_durations() {
        let (_, app) = test_app();
        let id = create(&app, None).await;

        let (status, value) = send(&app, "GET", &format!("/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["status"], "stopped");
        assert_eq!(value["timer"]["durations"]["work_minutes"], 50);
        assert_eq!(value["timer"]["durations"]["break_minutes"], 10);
        assert_eq!(value["timer"]["remaining_display"], "00:00");
    }

    #[tokio::test]
    async fn test_durations_ignored_while_running() {
        let (_, app) = test_app();
        let id = create(&app, None).await;
        let body = json!({"work_minutes": 25, "break_minutes": 5});

        send(&app, "POST", &format!("/sessions/{}/start", id), None).await;
        let (status, value) =
            send(&app, "PUT", &format!("/sessions/{}/durations", id), Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["status"], "ignored");
        assert_eq!(value["timer"]["durations"]["work_minutes"], 50);

        send(&app, "POST", &format!("/sessions/{}/pause", id), None).await;
        let (_, value) = send(&app, "PUT", &format!("/sessions/{}/durations", id), Some(body)).await;
        assert_eq!(value["status"], "stopped");
        assert_eq!(value["timer"]["durations"]["work_minutes"], 25);
        assert_eq!(value["timer"]["durations"]["break_minutes"], 5);
    }

    #[tokio::test]
    async fn test_out_of_range_durations_rejected() {
        let (_, app) = test_app();
        let id = create(&app, None).await;

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/sessions/{}/durations", id),
            Some(json!({"work_minutes": 100, "break_minutes": 5})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/sessions/{}/durations", id),
            Some(json!({"work_minutes": -1, "break_minutes": 5})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_body() {
        let (_, app) = test_app();

        let (status, _) = send(
            &app,
            "POST",
            "/sessions",
            Some(json!({"work_minutes": -1, "break_minutes": 5})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(
            &app,
            "POST",
            "/sessions",
            Some(json!({"work_minutes": 100, "break_minutes": 5})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(&app, "POST", "/sessions", Some(json!("not an object"))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (_, value) = send(&app, "GET", "/status", None).await;
        assert_eq!(value["sessions"], 0);
    }

    #[tokio::test]
    async fn test_reset_and_delete() {
        let (clock, app) = test_app();
        let id = create(
            &app,
            Some(json!({"work_minutes": 0, "work_seconds": 1, "break_minutes": 0, "break_seconds": 1})),
        )
        .await;

        send(&app, "POST", &format!("/sessions/{}/start", id), None).await;
        for _ in 0..4 {
            clock.advance(Duration::from_secs(1));
            send(&app, "GET", &format!("/sessions/{}", id), None).await;
        }

        let (_, value) = send(&app, "POST", &format!("/sessions/{}/reset", id), None).await;
        assert_eq!(value["status"], "stopped");
        assert_eq!(value["timer"]["loop_count"], 0);
        assert_eq!(value["timer"]["durations"]["work_seconds"], 1);

        let (status, _) = send(&app, "DELETE", &format!("/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &format!("/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_status_and_health() {
        let (_, app) = test_app();
        create(&app, None).await;

        let (status, value) = send(&app, "GET", "/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["sessions"], 1);
        assert_eq!(value["last_action"], "create");

        let (status, value) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["status"], "ok");
    }
}
