//! Domain core for the vital-sign monitoring service.
//!
//! Pure logic only, no database or HTTP dependency. The db crate persists
//! these types; the api crate orchestrates them; the events crate fans them
//! out to live subscribers.

pub mod alert;
pub mod error;
pub mod record;
pub mod types;
pub mod vitals;

pub use alert::{Alert, AlertCategory, AlertSeverity};
pub use error::CoreError;
pub use record::VitalSignRecord;
pub use vitals::{HeartRate, OxygenLevel, Temperature};
