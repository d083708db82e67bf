//! Vital-sign record row model.

use serde::Serialize;
use sqlx::FromRow;
use vitalwatch_core::types::{DbId, Timestamp};

/// A row from the `vital_sign_records` table.
///
/// Serialized in camelCase: this shape is returned directly by the REST
/// handlers and matches the real-time `vital-sign-update` payload.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSignRow {
    pub id: DbId,
    pub patient_id: DbId,
    pub device_id: DbId,
    pub heart_rate: i32,
    pub oxygen_level: i32,
    pub temperature: f64,
    pub timestamp: Timestamp,
}
