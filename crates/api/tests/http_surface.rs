//! HTTP surface tests that run without a live database: transport-bound
//! validation, parameter checks, degraded health, and the SSE stream.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use vitalwatch_api::config::ServerConfig;
use vitalwatch_api::routes;
use vitalwatch_api::state::AppState;
use vitalwatch_events::{SubscriptionRegistry, EVENT_UPDATE};

/// A pool that never connects: port 1 refuses immediately, so handlers that
/// do touch the database fail fast instead of hanging the test.
fn lazy_pool() -> sqlx::PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(1))
        .connect_lazy("postgres://localhost:1/vitalwatch_unreachable")
        .expect("valid database URL")
}

fn test_state() -> AppState {
    let config = ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec![],
        request_timeout_secs: 30,
    };
    AppState::new(lazy_pool(), config, Arc::new(SubscriptionRegistry::new()))
}

fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::api_routes())
        .with_state(state)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn measurement_outside_transport_bounds_is_rejected() {
    // SpO2 60 passes the sensor-valid range but not the transport bound.
    let response = app(test_state())
        .oneshot(post_json(
            "/monitoring/measurements",
            r#"{"patientId":1,"deviceId":101,"heartRate":78,"oxygenLevel":60,"temperature":36.6}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn measurement_with_missing_field_is_a_client_error() {
    let response = app(test_state())
        .oneshot(post_json(
            "/monitoring/measurements",
            r#"{"patientId":1,"deviceId":101,"heartRate":78}"#,
        ))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn recent_measurements_limit_is_validated() {
    let response = app(test_state())
        .oneshot(get("/monitoring/measurements/recent?limit=0"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn recent_alerts_hours_window_is_validated() {
    let response = app(test_state())
        .oneshot(get("/monitoring/alerts/recent?hours=0"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn external_alert_requires_a_message() {
    let response = app(test_state())
        .oneshot(post_json(
            "/monitoring/alerts",
            r#"{"patientId":1,"deviceId":101,"severity":"HIGH","message":"  "}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_degraded_without_a_database() {
    let response = app(test_state()).oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
    assert_eq!(json["subscribers"], 0);
}

#[tokio::test]
async fn sse_stream_delivers_emitted_events() {
    let state = test_state();
    let response = app(state.clone())
        .oneshot(get("/monitoring/stream/user/7"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/event-stream"
    );

    // The subscription is live once the response is produced.
    state
        .registry
        .send_to_user(7, EVENT_UPDATE, &serde_json::json!({"ping": true}));

    let mut body = response.into_body();
    let frame = body
        .frame()
        .await
        .expect("stream yields a frame")
        .expect("frame is not an error");
    let text = String::from_utf8(frame.into_data().expect("data frame").to_vec()).unwrap();
    assert!(text.contains("event: update"), "got: {text}");
    assert!(text.contains(r#""ping":true"#), "got: {text}");
}
