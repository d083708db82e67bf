//! The vital-sign record aggregate: one timestamped triple of validated
//! readings tied to a patient/device pair.

use serde::Serialize;

use crate::alert::Alert;
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};
use crate::vitals::{HeartRate, OxygenLevel, Temperature};

/// One persisted measurement from an IoT device.
///
/// Immutable after creation; the store assigns `id` on persistence. All
/// three readings must already be valid value objects; there is no partial
/// construction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSignRecord {
    pub id: Option<DbId>,
    pub patient_id: DbId,
    pub device_id: DbId,
    pub heart_rate: HeartRate,
    pub oxygen_level: OxygenLevel,
    pub temperature: Temperature,
    /// Stamped from the server clock at construction.
    pub timestamp: Timestamp,
}

impl VitalSignRecord {
    /// Create a record for a patient/device pair, stamped with the current
    /// time.
    ///
    /// Fails with [`CoreError::InvalidAggregate`] when either identity is
    /// absent (non-positive id).
    pub fn create(
        patient_id: DbId,
        device_id: DbId,
        heart_rate: HeartRate,
        oxygen_level: OxygenLevel,
        temperature: Temperature,
    ) -> Result<Self, CoreError> {
        if patient_id <= 0 || device_id <= 0 {
            return Err(CoreError::InvalidAggregate(
                "patientId and deviceId are required".to_string(),
            ));
        }
        Ok(Self {
            id: None,
            patient_id,
            device_id,
            heart_rate,
            oxygen_level,
            temperature,
            timestamp: chrono::Utc::now(),
        })
    }

    /// Copy of this record with the store-assigned id.
    pub fn with_id(mut self, id: DbId) -> Self {
        self.id = Some(id);
        self
    }

    /// True iff any single reading is clinically abnormal.
    pub fn is_abnormal(&self) -> bool {
        self.heart_rate.is_abnormal()
            || self.oxygen_level.is_abnormal()
            || self.temperature.is_abnormal()
    }

    /// Synthesize a CRITICAL alert when the record is abnormal.
    ///
    /// The message carries one fragment per abnormal reading, in the fixed
    /// order heart rate, oxygen, temperature; normal readings are omitted.
    /// The fragment labels double as the category-inference markers on
    /// [`AlertCategory`](crate::alert::AlertCategory).
    pub fn generate_alert_if_needed(&self) -> Option<Alert> {
        if !self.is_abnormal() {
            return None;
        }

        let mut fragments = Vec::with_capacity(3);
        if self.heart_rate.is_abnormal() {
            fragments.push(format!("HR={} bpm", self.heart_rate.value()));
        }
        if self.oxygen_level.is_abnormal() {
            fragments.push(format!("SpO2={}%", self.oxygen_level.value()));
        }
        if self.temperature.is_abnormal() {
            fragments.push(format!("Temp={:.1} C", self.temperature.value()));
        }

        let message = format!("Vital signs out of range: {}", fragments.join(" | "));
        Some(Alert::critical(
            self.patient_id,
            self.device_id,
            Some(self.timestamp),
            message,
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
