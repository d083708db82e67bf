//! Caregiver-assignment seam for alert fan-out.

use async_trait::async_trait;
use vitalwatch_core::types::DbId;

/// Decides which subscriber identities receive the caregiver fan-out of a
/// patient's alert.
///
/// `connected` is the snapshot of identities currently holding a live
/// channel; implementations may ignore it (e.g. a future assignment lookup
/// backed by a care-management service returns assigned caregivers whether
/// or not they are connected; delivery to absent identities is a no-op).
#[async_trait]
pub trait CaregiverResolver: Send + Sync {
    async fn resolve(&self, patient_id: DbId, connected: &[DbId]) -> Vec<DbId>;
}

/// Placeholder resolver standing in for a real caregiver-assignment lookup:
/// every currently connected identity receives the alert.
pub struct BroadcastAllResolver;

#[async_trait]
impl CaregiverResolver for BroadcastAllResolver {
    async fn resolve(&self, _patient_id: DbId, connected: &[DbId]) -> Vec<DbId> {
        connected.to_vec()
    }
}
