//! Repository for the `alerts` table.

use sqlx::PgPool;
use vitalwatch_core::alert::Alert;
use vitalwatch_core::types::{DbId, Timestamp};

use crate::models::alert::AlertRow;

/// Column list for `alerts` queries.
const COLUMNS: &str = "id, patient_id, device_id, severity, category, message, created_at";

/// Provides persistence operations for alerts.
pub struct AlertRepo;

impl AlertRepo {
    /// Persist an alert, returning the stored row with its generated id.
    pub async fn insert(pool: &PgPool, alert: &Alert) -> Result<AlertRow, sqlx::Error> {
        sqlx::query_as(&format!(
            "INSERT INTO alerts \
                 (patient_id, device_id, severity, category, message, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        ))
        .bind(alert.patient_id)
        .bind(alert.device_id)
        .bind(alert.severity.as_str())
        .bind(alert.category.as_str())
        .bind(&alert.message)
        .bind(alert.created_at)
        .fetch_one(pool)
        .await
    }

    /// All alerts of a patient, most recent first.
    pub async fn find_by_patient(
        pool: &PgPool,
        patient_id: DbId,
    ) -> Result<Vec<AlertRow>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM alerts \
             WHERE patient_id = $1 \
             ORDER BY created_at DESC"
        ))
        .bind(patient_id)
        .fetch_all(pool)
        .await
    }

    /// Alerts matching a severity, case-insensitively, most recent first.
    pub async fn find_by_severity(
        pool: &PgPool,
        severity: &str,
    ) -> Result<Vec<AlertRow>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM alerts \
             WHERE LOWER(severity) = LOWER($1) \
             ORDER BY created_at DESC"
        ))
        .bind(severity)
        .fetch_all(pool)
        .await
    }

    /// Alerts created within a time range, most recent first.
    pub async fn find_between(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<AlertRow>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM alerts \
             WHERE created_at BETWEEN $1 AND $2 \
             ORDER BY created_at DESC"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// Every alert, unordered. Callers apply their own time-window filter.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<AlertRow>, sqlx::Error> {
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM alerts"))
            .fetch_all(pool)
            .await
    }
}
