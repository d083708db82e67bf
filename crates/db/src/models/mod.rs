pub mod alert;
pub mod vital_sign;
