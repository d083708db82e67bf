//! Handlers for alert retrieval and external alert registration.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use vitalwatch_core::alert::{Alert, AlertSeverity};
use vitalwatch_core::error::CoreError;
use vitalwatch_core::types::DbId;
use vitalwatch_db::models::alert::AlertRow;
use vitalwatch_db::repositories::AlertRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for the alert listing endpoint.
#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    /// Optional severity filter, matched case-insensitively.
    pub severity: Option<String>,
}

/// Query parameters for the recent-alerts endpoint.
#[derive(Debug, Deserialize)]
pub struct RecentAlertsQuery {
    /// Window size in hours (default: 24).
    pub hours: Option<i64>,
}

/// Request body for registering an alert from an external trusted source
/// (e.g. another IoT ingestion service). The category is inferred from the
/// message exactly like record-derived alerts.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAlertRequest {
    pub patient_id: DbId,
    pub device_id: DbId,
    pub severity: AlertSeverity,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /monitoring/patients/{id}/alerts
///
/// All alerts of a patient, most recent first.
pub async fn get_by_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AlertRow>>>> {
    let rows = AlertRepo::find_by_patient(&state.pool, patient_id).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /monitoring/alerts
///
/// All alerts, optionally filtered by severity, most recent first.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<AlertsQuery>,
) -> AppResult<Json<DataResponse<Vec<AlertRow>>>> {
    let rows = match query.severity.as_deref() {
        Some(severity) => AlertRepo::find_by_severity(&state.pool, severity).await?,
        None => {
            let mut rows = AlertRepo::find_all(&state.pool).await?;
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            rows
        }
    };
    Ok(Json(DataResponse { data: rows }))
}

/// GET /monitoring/alerts/recent
///
/// Alerts created within the last N hours, most recent first. The time
/// window is applied here, on top of the store's plain `find_all`.
pub async fn get_recent(
    State(state): State<AppState>,
    Query(query): Query<RecentAlertsQuery>,
) -> AppResult<Json<DataResponse<Vec<AlertRow>>>> {
    let hours = query.hours.unwrap_or(24);
    if !(1..=168).contains(&hours) {
        return Err(AppError::BadRequest(
            "hours must be between 1 and 168".to_string(),
        ));
    }

    let cutoff = chrono::Utc::now() - chrono::Duration::hours(hours);
    let mut rows: Vec<AlertRow> = AlertRepo::find_all(&state.pool)
        .await?
        .into_iter()
        .filter(|a| a.created_at > cutoff)
        .collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(DataResponse { data: rows }))
}

/// POST /monitoring/alerts
///
/// Register an externally sourced alert: persist it and push it to live
/// subscribers like any record-derived alert.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterAlertRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AlertRow>>)> {
    if input.message.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "message is required".to_string(),
        )));
    }
    if input.patient_id <= 0 || input.device_id <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "patientId and deviceId are required".to_string(),
        )));
    }

    let alert = Alert::new(
        input.patient_id,
        input.device_id,
        input.severity,
        None,
        input.message,
    );
    let row = state.monitoring.register_external_alert(alert).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}
