//! Repository for the `vital_sign_records` table.

use sqlx::PgPool;
use vitalwatch_core::record::VitalSignRecord;
use vitalwatch_core::types::{DbId, Timestamp};

use crate::models::vital_sign::VitalSignRow;

/// Column list for `vital_sign_records` queries.
const COLUMNS: &str = "id, patient_id, device_id, heart_rate, oxygen_level, temperature, timestamp";

/// Provides persistence operations for vital-sign records.
pub struct VitalSignRepo;

impl VitalSignRepo {
    /// Persist a record, returning the stored row with its generated id.
    pub async fn insert(pool: &PgPool, record: &VitalSignRecord) -> Result<VitalSignRow, sqlx::Error> {
        sqlx::query_as(&format!(
            "INSERT INTO vital_sign_records \
                 (patient_id, device_id, heart_rate, oxygen_level, temperature, timestamp) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        ))
        .bind(record.patient_id)
        .bind(record.device_id)
        .bind(record.heart_rate.value())
        .bind(record.oxygen_level.value())
        .bind(record.temperature.value())
        .bind(record.timestamp)
        .fetch_one(pool)
        .await
    }

    /// Look up a single record by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<VitalSignRow>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM vital_sign_records WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// All records of a patient, most recent first.
    pub async fn find_by_patient(
        pool: &PgPool,
        patient_id: DbId,
    ) -> Result<Vec<VitalSignRow>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM vital_sign_records \
             WHERE patient_id = $1 \
             ORDER BY timestamp DESC"
        ))
        .bind(patient_id)
        .fetch_all(pool)
        .await
    }

    /// All records produced by a device, most recent first.
    pub async fn find_by_device(
        pool: &PgPool,
        device_id: DbId,
    ) -> Result<Vec<VitalSignRow>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM vital_sign_records \
             WHERE device_id = $1 \
             ORDER BY timestamp DESC"
        ))
        .bind(device_id)
        .fetch_all(pool)
        .await
    }

    /// Records measured within a time range, most recent first.
    pub async fn find_between(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<VitalSignRow>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM vital_sign_records \
             WHERE timestamp BETWEEN $1 AND $2 \
             ORDER BY timestamp DESC"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// The most recent record of a patient.
    pub async fn find_latest_for_patient(
        pool: &PgPool,
        patient_id: DbId,
    ) -> Result<Option<VitalSignRow>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM vital_sign_records \
             WHERE patient_id = $1 \
             ORDER BY timestamp DESC \
             LIMIT 1"
        ))
        .bind(patient_id)
        .fetch_optional(pool)
        .await
    }

    /// The `limit` most recent records system-wide (native limited query).
    pub async fn find_recent(pool: &PgPool, limit: i64) -> Result<Vec<VitalSignRow>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM vital_sign_records \
             ORDER BY timestamp DESC \
             LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Every record, unordered. Fallback source when the native limited
    /// query path is unavailable; the caller sorts and truncates.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<VitalSignRow>, sqlx::Error> {
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM vital_sign_records"))
            .fetch_all(pool)
            .await
    }
}
