//! Measurement orchestrator: persist, evaluate, emit.
//!
//! Sequencing per inbound reading:
//!   1. construct the domain record (value-object validation): failure
//!      aborts the whole operation and nothing is emitted;
//!   2. persist the record;
//!   3. if the record is abnormal, persist the synthesized alert and emit it;
//!   4. emit the `vital-sign-update` event for the persisted record.
//!
//! Emission is fire-and-forget: send failures are absorbed inside the
//! registry and never surface here. Persistence failures propagate; there
//! is no compensation; a failed alert save leaves the record persisted.

use std::sync::Arc;

use vitalwatch_core::alert::Alert;
use vitalwatch_core::error::CoreError;
use vitalwatch_core::record::VitalSignRecord;
use vitalwatch_core::types::DbId;
use vitalwatch_core::vitals::{HeartRate, OxygenLevel, Temperature};
use vitalwatch_db::models::alert::AlertRow;
use vitalwatch_db::models::vital_sign::VitalSignRow;
use vitalwatch_db::repositories::{AlertRepo, VitalSignRepo};
use vitalwatch_db::DbPool;
use vitalwatch_events::SubscriptionRegistry;

use crate::error::AppResult;

/// Orchestrates the create-and-evaluate flow and the read paths.
///
/// Owns its collaborators explicitly (pool + injected registry); shared via
/// `Arc` in [`AppState`](crate::state::AppState).
pub struct MonitoringService {
    pool: DbPool,
    registry: Arc<SubscriptionRegistry>,
}

impl MonitoringService {
    pub fn new(pool: DbPool, registry: Arc<SubscriptionRegistry>) -> Self {
        Self { pool, registry }
    }

    /// Ingest one reading: validate, persist, evaluate, emit.
    pub async fn create_measurement(
        &self,
        patient_id: DbId,
        device_id: DbId,
        heart_rate: i32,
        oxygen_level: i32,
        temperature: f64,
    ) -> AppResult<VitalSignRow> {
        let record = VitalSignRecord::create(
            patient_id,
            device_id,
            HeartRate::new(heart_rate)?,
            OxygenLevel::new(oxygen_level)?,
            Temperature::new(temperature)?,
        )?;

        let row = VitalSignRepo::insert(&self.pool, &record).await?;
        let record = record.with_id(row.id);

        if let Some(alert) = record.generate_alert_if_needed() {
            let stored = AlertRepo::insert(&self.pool, &alert).await?;
            tracing::info!(
                patient_id,
                alert_id = stored.id,
                category = %stored.category,
                "Abnormal measurement, alert created"
            );
            self.registry.emit_alert(&alert.with_id(stored.id)).await;
        }

        self.registry.emit_vital_sign(&record);
        Ok(row)
    }

    /// Persist and emit an alert received from an external trusted source.
    pub async fn register_external_alert(&self, alert: Alert) -> AppResult<AlertRow> {
        let row = AlertRepo::insert(&self.pool, &alert).await?;
        self.registry.emit_alert(&alert.with_id(row.id)).await;
        Ok(row)
    }

    /// All measurements of a patient, most recent first.
    pub async fn measurements_by_patient(&self, patient_id: DbId) -> AppResult<Vec<VitalSignRow>> {
        Ok(VitalSignRepo::find_by_patient(&self.pool, patient_id).await?)
    }

    /// The `limit` most recent measurements system-wide.
    ///
    /// Prefers the native limited query; if that path fails, loads the full
    /// set and sorts/truncates in memory so the endpoint keeps working on
    /// stores without limited/ordered query support.
    pub async fn recent_measurements(&self, limit: i64) -> AppResult<Vec<VitalSignRow>> {
        match VitalSignRepo::find_recent(&self.pool, limit).await {
            Ok(rows) => Ok(rows),
            Err(e) => {
                tracing::warn!(error = %e, "Native recent query failed, using in-memory fallback");
                let rows = VitalSignRepo::find_all(&self.pool).await?;
                Ok(take_recent(rows, limit.max(0) as usize))
            }
        }
    }

    /// A single measurement by id.
    pub async fn measurement_by_id(&self, id: DbId) -> AppResult<VitalSignRow> {
        VitalSignRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "measurement",
                    id,
                }
                .into()
            })
    }
}

/// Sort descending by timestamp and keep the first `limit` rows.
///
/// Fallback for stores without a native limited/ordered query; must produce
/// the same output as [`VitalSignRepo::find_recent`] for the same data.
fn take_recent(mut rows: Vec<VitalSignRow>, limit: usize) -> Vec<VitalSignRow> {
    rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    rows.truncate(limit);
    rows
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
