//! Route definitions for the monitoring endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{alerts, monitoring};
use crate::sse;
use crate::state::AppState;

/// Routes mounted at `/monitoring`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/measurements", post(monitoring::create_measurement))
        .route("/measurements/recent", get(monitoring::get_recent))
        .route("/measurements/{id}", get(monitoring::get_by_id))
        .route(
            "/patients/{id}/measurements",
            get(monitoring::get_by_patient),
        )
        .route("/patients/{id}/alerts", get(alerts::get_by_patient))
        .route("/alerts", get(alerts::list).post(alerts::register))
        .route("/alerts/recent", get(alerts::get_recent))
        .route("/stream/user/{user_id}", get(sse::stream_user))
}
