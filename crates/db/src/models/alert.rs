//! Alert row model.

use serde::Serialize;
use sqlx::FromRow;
use vitalwatch_core::types::{DbId, Timestamp};

/// A row from the `alerts` table.
///
/// Severity and category are stored as their wire strings (`CRITICAL`,
/// `TEMPERATURE`, ...) exactly as the core enums serialize them.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRow {
    pub id: DbId,
    pub patient_id: DbId,
    pub device_id: DbId,
    pub severity: String,
    pub category: String,
    pub message: String,
    pub created_at: Timestamp,
}
