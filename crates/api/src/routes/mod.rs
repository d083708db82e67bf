pub mod health;
pub mod monitoring;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /monitoring/measurements                     submit (POST)
/// /monitoring/measurements/recent              most recent N system-wide
/// /monitoring/measurements/{id}                single measurement
/// /monitoring/patients/{id}/measurements       patient history
/// /monitoring/patients/{id}/alerts             patient alerts
/// /monitoring/alerts                           list / register (GET, POST)
/// /monitoring/alerts/recent                    last-N-hours window
/// /monitoring/stream/user/{userId}             SSE subscriber stream
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/monitoring", monitoring::router())
}
