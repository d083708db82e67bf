//! Clinical alert entity, synthesized from abnormal vital-sign records or
//! registered from an external trusted source.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Alert severity taxonomy.
///
/// Record-derived alerts are always [`Critical`](AlertSeverity::Critical);
/// `High` and `Low` exist in the response schema and are accepted from
/// external sources, but no internal gradation rule produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Critical,
    High,
    Low,
}

impl AlertSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertSeverity::Critical => "CRITICAL",
            AlertSeverity::High => "HIGH",
            AlertSeverity::Low => "LOW",
        }
    }
}

/// Alert category, inferred from the message text at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertCategory {
    Temperature,
    HeartRate,
    Oxygenation,
    General,
}

impl AlertCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertCategory::Temperature => "TEMPERATURE",
            AlertCategory::HeartRate => "HEART_RATE",
            AlertCategory::Oxygenation => "OXYGENATION",
            AlertCategory::General => "GENERAL",
        }
    }

    /// Infer a category from free-text message content.
    ///
    /// Case-insensitive substring match against the reading labels used by
    /// [`VitalSignRecord::generate_alert_if_needed`](crate::record::VitalSignRecord::generate_alert_if_needed),
    /// checked in priority order: temperature, then oxygen, then heart rate.
    /// Falls back to [`General`](AlertCategory::General).
    ///
    /// Message formatting and this inference are deliberately coupled: any
    /// change to the message labels must keep these markers matching.
    pub fn infer_from_message(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("temp") {
            AlertCategory::Temperature
        } else if lower.contains("spo2") {
            AlertCategory::Oxygenation
        } else if lower.contains("hr") {
            AlertCategory::HeartRate
        } else {
            AlertCategory::General
        }
    }
}

/// A clinical event derived from an abnormal record.
///
/// Immutable after creation; the store assigns `id` on persistence.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Option<DbId>,
    pub patient_id: DbId,
    pub device_id: DbId,
    pub severity: AlertSeverity,
    pub category: AlertCategory,
    pub message: String,
    pub created_at: Timestamp,
}

impl Alert {
    /// Build an alert with the given severity.
    ///
    /// `created_at` inherits the triggering record's timestamp when one is
    /// given, otherwise the current time. The category is inferred from the
    /// message once, here, and carried as an explicit field from then on.
    pub fn new(
        patient_id: DbId,
        device_id: DbId,
        severity: AlertSeverity,
        created_at: Option<Timestamp>,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        let category = AlertCategory::infer_from_message(&message);
        Self {
            id: None,
            patient_id,
            device_id,
            severity,
            category,
            message,
            created_at: created_at.unwrap_or_else(chrono::Utc::now),
        }
    }

    /// Build a CRITICAL alert, the only severity the threshold policy emits.
    pub fn critical(
        patient_id: DbId,
        device_id: DbId,
        created_at: Option<Timestamp>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(patient_id, device_id, AlertSeverity::Critical, created_at, message)
    }

    /// Copy of this alert with the store-assigned id.
    pub fn with_id(mut self, id: DbId) -> Self {
        self.id = Some(id);
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_prefers_temperature_over_other_markers() {
        // All three markers present: temperature wins.
        let cat = AlertCategory::infer_from_message("HR=140 bpm | SpO2=85% | Temp=39.2 C");
        assert_eq!(cat, AlertCategory::Temperature);
    }

    #[test]
    fn infer_prefers_oxygen_over_heart_rate() {
        let cat = AlertCategory::infer_from_message("HR=140 bpm | SpO2=85%");
        assert_eq!(cat, AlertCategory::Oxygenation);
    }

    #[test]
    fn infer_heart_rate_alone() {
        assert_eq!(
            AlertCategory::infer_from_message("HR=140 bpm"),
            AlertCategory::HeartRate
        );
    }

    #[test]
    fn infer_is_case_insensitive() {
        assert_eq!(
            AlertCategory::infer_from_message("TEMPERATURE SPIKE"),
            AlertCategory::Temperature
        );
    }

    #[test]
    fn infer_defaults_to_general() {
        assert_eq!(
            AlertCategory::infer_from_message("device battery low"),
            AlertCategory::General
        );
    }

    #[test]
    fn critical_alert_inherits_record_timestamp() {
        let ts = chrono::Utc::now() - chrono::Duration::minutes(5);
        let alert = Alert::critical(1, 101, Some(ts), "Temp=39.2 C");
        assert_eq!(alert.created_at, ts);
        assert_eq!(alert.severity, AlertSeverity::Critical);
        assert_eq!(alert.category, AlertCategory::Temperature);
        assert!(alert.id.is_none());
    }

    #[test]
    fn alert_without_timestamp_uses_now() {
        let before = chrono::Utc::now();
        let alert = Alert::critical(1, 101, None, "msg");
        assert!(alert.created_at >= before);
    }

    #[test]
    fn severity_wire_values() {
        assert_eq!(AlertSeverity::Critical.as_str(), "CRITICAL");
        assert_eq!(AlertSeverity::High.as_str(), "HIGH");
        assert_eq!(AlertSeverity::Low.as_str(), "LOW");
        assert_eq!(
            serde_json::to_value(AlertSeverity::Critical).unwrap(),
            serde_json::json!("CRITICAL")
        );
    }

    #[test]
    fn category_wire_values() {
        assert_eq!(
            serde_json::to_value(AlertCategory::HeartRate).unwrap(),
            serde_json::json!("HEART_RATE")
        );
    }
}
