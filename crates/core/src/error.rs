use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A raw instrument value outside the sensor-plausible range.
    /// Distinct from clinical abnormality: an out-of-range value is a
    /// malformed device payload and is rejected before any domain logic.
    #[error("{vital} out of sensor range: {value} (valid {min}..={max})")]
    OutOfSensorRange {
        vital: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid aggregate: {0}")]
    InvalidAggregate(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Internal error: {0}")]
    Internal(String),
}
