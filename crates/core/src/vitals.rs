//! Validated vital-sign value objects and the clinical threshold policy.
//!
//! Two distinct range sets apply to every reading:
//!
//! - the *sensor-valid* range: values outside it are instrument-implausible
//!   and construction fails (device malfunction, never stored);
//! - the *clinical* range: values outside it are valid readings that flag
//!   the patient as abnormal.
//!
//! The sensor range is always wider than the clinical range, so a reading
//! can be valid-but-abnormal but never invalid-and-accepted. Thresholds are
//! a fixed policy table (hard-coded constants, not runtime configuration):
//!
//! | vital       | sensor-valid  | clinically abnormal |
//! |-------------|---------------|---------------------|
//! | heart rate  | 30..=220 bpm  | <50 or >110         |
//! | SpO2        | 50..=100 %    | <90                 |
//! | temperature | 30.0..=45.0 C | <35.0 or >38.0      |

use serde::Serialize;

use crate::error::CoreError;

/// Sensor-plausible heart rate bounds (bpm).
pub const HEART_RATE_SENSOR_MIN: i32 = 30;
pub const HEART_RATE_SENSOR_MAX: i32 = 220;
/// Clinical comfort bounds for heart rate (bpm).
const HEART_RATE_NORMAL_MIN: i32 = 50;
const HEART_RATE_NORMAL_MAX: i32 = 110;

/// Sensor-plausible SpO2 bounds (percent).
pub const OXYGEN_SENSOR_MIN: i32 = 50;
pub const OXYGEN_SENSOR_MAX: i32 = 100;
/// SpO2 below this is clinically abnormal (percent).
const OXYGEN_NORMAL_MIN: i32 = 90;

/// Sensor-plausible body temperature bounds (degrees Celsius).
pub const TEMPERATURE_SENSOR_MIN: f64 = 30.0;
pub const TEMPERATURE_SENSOR_MAX: f64 = 45.0;
/// Clinical comfort bounds for body temperature (degrees Celsius).
const TEMPERATURE_NORMAL_MIN: f64 = 35.0;
const TEMPERATURE_NORMAL_MAX: f64 = 38.0;

/// A heart rate reading in beats per minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HeartRate(i32);

impl HeartRate {
    pub fn new(value: i32) -> Result<Self, CoreError> {
        if !(HEART_RATE_SENSOR_MIN..=HEART_RATE_SENSOR_MAX).contains(&value) {
            return Err(CoreError::OutOfSensorRange {
                vital: "heart rate",
                value: f64::from(value),
                min: f64::from(HEART_RATE_SENSOR_MIN),
                max: f64::from(HEART_RATE_SENSOR_MAX),
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> i32 {
        self.0
    }

    /// Pure predicate against the fixed clinical thresholds.
    pub fn is_abnormal(self) -> bool {
        self.0 < HEART_RATE_NORMAL_MIN || self.0 > HEART_RATE_NORMAL_MAX
    }
}

/// A blood-oxygen saturation reading in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OxygenLevel(i32);

impl OxygenLevel {
    pub fn new(value: i32) -> Result<Self, CoreError> {
        if !(OXYGEN_SENSOR_MIN..=OXYGEN_SENSOR_MAX).contains(&value) {
            return Err(CoreError::OutOfSensorRange {
                vital: "oxygen level",
                value: f64::from(value),
                min: f64::from(OXYGEN_SENSOR_MIN),
                max: f64::from(OXYGEN_SENSOR_MAX),
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> i32 {
        self.0
    }

    pub fn is_abnormal(self) -> bool {
        self.0 < OXYGEN_NORMAL_MIN
    }
}

/// A body temperature reading in degrees Celsius.
///
/// Rounded to one decimal place at construction to suppress upstream
/// floating-point sensor noise, so repeated evaluation of the same stored
/// reading is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Temperature(f64);

impl Temperature {
    pub fn new(value: f64) -> Result<Self, CoreError> {
        if !(TEMPERATURE_SENSOR_MIN..=TEMPERATURE_SENSOR_MAX).contains(&value) {
            return Err(CoreError::OutOfSensorRange {
                vital: "temperature",
                value,
                min: TEMPERATURE_SENSOR_MIN,
                max: TEMPERATURE_SENSOR_MAX,
            });
        }
        // Round half-up to 0.1 degree.
        Ok(Self((value * 10.0).round() / 10.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_abnormal(self) -> bool {
        self.0 < TEMPERATURE_NORMAL_MIN || self.0 > TEMPERATURE_NORMAL_MAX
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn heart_rate_accepts_full_sensor_range() {
        for bpm in [30, 50, 78, 110, 220] {
            assert!(HeartRate::new(bpm).is_ok(), "{bpm} should be accepted");
        }
    }

    #[test]
    fn heart_rate_rejects_outside_sensor_range() {
        assert_matches!(
            HeartRate::new(29),
            Err(CoreError::OutOfSensorRange { vital: "heart rate", .. })
        );
        assert_matches!(HeartRate::new(221), Err(CoreError::OutOfSensorRange { .. }));
    }

    #[test]
    fn heart_rate_clinical_thresholds() {
        assert!(HeartRate::new(49).unwrap().is_abnormal());
        assert!(!HeartRate::new(50).unwrap().is_abnormal());
        assert!(!HeartRate::new(110).unwrap().is_abnormal());
        assert!(HeartRate::new(111).unwrap().is_abnormal());
    }

    #[test]
    fn oxygen_accepts_full_sensor_range() {
        for pct in [50, 89, 90, 100] {
            assert!(OxygenLevel::new(pct).is_ok(), "{pct} should be accepted");
        }
    }

    #[test]
    fn oxygen_rejects_outside_sensor_range() {
        assert_matches!(OxygenLevel::new(49), Err(CoreError::OutOfSensorRange { .. }));
        assert_matches!(OxygenLevel::new(101), Err(CoreError::OutOfSensorRange { .. }));
    }

    #[test]
    fn oxygen_abnormal_only_below_ninety() {
        assert!(OxygenLevel::new(89).unwrap().is_abnormal());
        assert!(!OxygenLevel::new(90).unwrap().is_abnormal());
        // A valid sensor reading can still be abnormal, never the reverse.
        assert!(OxygenLevel::new(50).unwrap().is_abnormal());
    }

    #[test]
    fn temperature_accepts_full_sensor_range() {
        for t in [30.0, 34.9, 36.6, 38.0, 45.0] {
            assert!(Temperature::new(t).is_ok(), "{t} should be accepted");
        }
    }

    #[test]
    fn temperature_rejects_outside_sensor_range() {
        assert_matches!(
            Temperature::new(29.9),
            Err(CoreError::OutOfSensorRange { vital: "temperature", .. })
        );
        assert_matches!(Temperature::new(45.1), Err(CoreError::OutOfSensorRange { .. }));
        assert_matches!(Temperature::new(f64::NAN), Err(CoreError::OutOfSensorRange { .. }));
    }

    #[test]
    fn temperature_rounds_to_one_decimal() {
        assert_eq!(Temperature::new(36.649).unwrap().value(), 36.6);
        assert_eq!(Temperature::new(36.65).unwrap().value(), 36.7);
        assert_eq!(Temperature::new(39.2).unwrap().value(), 39.2);
    }

    #[test]
    fn temperature_rounding_is_idempotent() {
        let once = Temperature::new(37.04999).unwrap();
        let twice = Temperature::new(once.value()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn temperature_clinical_thresholds() {
        assert!(Temperature::new(34.9).unwrap().is_abnormal());
        assert!(!Temperature::new(35.0).unwrap().is_abnormal());
        assert!(!Temperature::new(38.0).unwrap().is_abnormal());
        assert!(Temperature::new(38.1).unwrap().is_abnormal());
    }
}
