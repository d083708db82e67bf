//! Handlers for measurement ingestion and retrieval.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use vitalwatch_core::types::DbId;
use vitalwatch_db::models::vital_sign::VitalSignRow;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for submitting a new measurement.
///
/// The declared bounds are the transport-layer contract for device payloads
/// and are deliberately tighter than the core's sensor-valid ranges (SpO2
/// 70 vs 50, temperature 43.0 vs 45.0): a payload can pass the sensor check
/// yet still be rejected here. Both boundaries are kept distinct on purpose.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeasurementRequest {
    pub patient_id: DbId,
    pub device_id: DbId,
    /// Beats per minute.
    #[validate(range(min = 30, max = 220, message = "heartRate must be between 30 and 220 bpm"))]
    pub heart_rate: i32,
    /// SpO2 percent.
    #[validate(range(min = 70, max = 100, message = "oxygenLevel must be between 70 and 100%"))]
    pub oxygen_level: i32,
    /// Degrees Celsius.
    #[validate(range(
        min = 30.0,
        max = 43.0,
        message = "temperature must be between 30.0 and 43.0 C"
    ))]
    pub temperature: f64,
}

/// Query parameters for the recent-measurements endpoint.
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    /// How many records to return (default: 20).
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /monitoring/measurements
///
/// Ingest a new vital-sign measurement. Validates transport bounds, then
/// runs the full create-and-evaluate sequence (persist record, synthesize
/// and persist alert when abnormal, emit real-time events).
pub async fn create_measurement(
    State(state): State<AppState>,
    Json(input): Json<CreateMeasurementRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<VitalSignRow>>)> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let row = state
        .monitoring
        .create_measurement(
            input.patient_id,
            input.device_id,
            input.heart_rate,
            input.oxygen_level,
            input.temperature,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

/// GET /monitoring/patients/{id}/measurements
///
/// All historical measurements of a patient, most recent first.
pub async fn get_by_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<VitalSignRow>>>> {
    let rows = state.monitoring.measurements_by_patient(patient_id).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /monitoring/measurements/recent
///
/// The N most recent measurements system-wide (dashboards).
pub async fn get_recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> AppResult<Json<DataResponse<Vec<VitalSignRow>>>> {
    let limit = query.limit.unwrap_or(20);
    if !(1..=500).contains(&limit) {
        return Err(AppError::BadRequest(
            "limit must be between 1 and 500".to_string(),
        ));
    }
    let rows = state.monitoring.recent_measurements(limit).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /monitoring/measurements/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<VitalSignRow>>> {
    let row = state.monitoring.measurement_by_id(id).await?;
    Ok(Json(DataResponse { data: row }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
