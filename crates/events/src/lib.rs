//! Real-time fan-out for vital-sign readings and alerts.
//!
//! [`SubscriptionRegistry`] keeps one outbound channel per live subscriber
//! identity and delivers named events to them with per-subscriber failure
//! isolation. The caregiver-assignment seam lives in [`resolver`].

pub mod registry;
pub mod resolver;

pub use registry::{
    OutboundEvent, Subscription, SubscriptionRegistry, EVENT_ALERT, EVENT_UPDATE,
    EVENT_VITAL_SIGN_UPDATE,
};
pub use resolver::{BroadcastAllResolver, CaregiverResolver};
