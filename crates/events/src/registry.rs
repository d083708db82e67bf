//! Subscriber channel registry and event fan-out.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use dashmap::DashMap;
use futures::Stream;
use serde::Serialize;
use tokio::sync::mpsc;
use vitalwatch_core::alert::Alert;
use vitalwatch_core::record::VitalSignRecord;
use vitalwatch_core::types::DbId;

use crate::resolver::{BroadcastAllResolver, CaregiverResolver};

/// Event name for a newly persisted measurement, sent to its patient.
pub const EVENT_VITAL_SIGN_UPDATE: &str = "vital-sign-update";
/// Event name for a synthesized or externally registered alert.
pub const EVENT_ALERT: &str = "alert";
/// Event name for generic broadcasts (dashboards, care panels).
pub const EVENT_UPDATE: &str = "update";

/// A named event ready for delivery on a subscriber channel.
#[derive(Debug, Clone)]
pub struct OutboundEvent {
    pub event: &'static str,
    pub data: serde_json::Value,
}

/// Channel sender half for pushing events to one subscriber.
type EventSender = mpsc::UnboundedSender<OutboundEvent>;

/// Registry of live subscriber channels, keyed by user identity.
///
/// At most one channel per identity: a new subscription replaces (and
/// thereby closes) the previous one. Backed by a sharded concurrent map so
/// insert/lookup/remove for unrelated subscribers do not serialize on a
/// single lock. Designed to be shared via `Arc` and injected wherever
/// events are emitted.
///
/// Sends never block the caller: channels are unbounded, and a send failure
/// (subscriber gone) removes exactly that identity's entry and nothing else.
pub struct SubscriptionRegistry {
    channels: DashMap<DbId, EventSender>,
    caregivers: Arc<dyn CaregiverResolver>,
}

impl SubscriptionRegistry {
    /// Registry with the placeholder broadcast-to-all caregiver resolver.
    pub fn new() -> Self {
        Self::with_resolver(Arc::new(BroadcastAllResolver))
    }

    /// Registry with a custom caregiver-assignment resolver.
    pub fn with_resolver(caregivers: Arc<dyn CaregiverResolver>) -> Self {
        Self {
            channels: DashMap::new(),
            caregivers,
        }
    }

    /// Open a long-lived channel for `user_id` and return its event stream.
    ///
    /// Any prior channel for the same identity is dropped, which ends the
    /// old subscriber's stream. The returned [`Subscription`] deregisters
    /// itself when the transport ends for any reason (disconnect, timeout,
    /// error), so the map never accumulates dead entries.
    ///
    /// Takes an `Arc` receiver (clone one in): the subscription keeps a
    /// handle to the registry for its cleanup-on-drop.
    pub fn subscribe(self: Arc<Self>, user_id: DbId) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        // The subscription keeps only a weak handle: the registry's entry
        // must be the sole thing holding the channel open, so dropping the
        // entry (replacement, shutdown) deterministically ends the stream.
        let sender = tx.downgrade();
        if self.channels.insert(user_id, tx).is_some() {
            tracing::debug!(user_id, "Replaced existing subscription channel");
        }
        tracing::info!(user_id, "Subscriber registered");
        Subscription {
            user_id,
            receiver: rx,
            sender,
            registry: self,
        }
    }

    /// Deliver a named event to one identity.
    ///
    /// A missing identity is a silent no-op: an offline subscriber simply
    /// misses the event, nothing is queued. A send failure is terminal for
    /// that channel: the entry is removed and the failure goes no further.
    pub fn send_to_user(&self, user_id: DbId, event: &'static str, data: &impl Serialize) {
        let data = match serde_json::to_value(data) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, event, "Failed to serialize event payload");
                return;
            }
        };
        self.send_value(user_id, event, data);
    }

    fn send_value(&self, user_id: DbId, event: &'static str, data: serde_json::Value) {
        // The map ref must be released before the removal below.
        let failed = match self.channels.get(&user_id) {
            Some(tx) => {
                if tx.send(OutboundEvent { event, data }).is_err() {
                    Some(tx.clone())
                } else {
                    None
                }
            }
            None => return,
        };
        if let Some(sender) = failed {
            // Remove only the channel that failed; a concurrent resubscribe
            // may have installed a fresh one under the same key.
            self.channels
                .remove_if(&user_id, |_, tx| tx.same_channel(&sender));
            tracing::debug!(user_id, event, "Subscriber channel closed, deregistered");
        }
    }

    /// Send a `vital-sign-update` event to the record's patient only.
    pub fn emit_vital_sign(&self, record: &VitalSignRecord) {
        self.send_to_user(record.patient_id, EVENT_VITAL_SIGN_UPDATE, record);
    }

    /// Send an `alert` event to the patient, then fan it out to the
    /// identities named by the caregiver resolver.
    ///
    /// With the default resolver that is every connected identity, so a
    /// connected patient sees the alert twice (direct + fan-out).
    pub async fn emit_alert(&self, alert: &Alert) {
        self.send_to_user(alert.patient_id, EVENT_ALERT, alert);

        let connected = self.subscriber_ids();
        let targets = self.caregivers.resolve(alert.patient_id, &connected).await;
        if targets.is_empty() {
            return;
        }
        let data = match serde_json::to_value(alert) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize alert payload");
                return;
            }
        };
        for user_id in targets {
            self.send_value(user_id, EVENT_ALERT, data.clone());
        }
    }

    /// Send a generic `update` event to every registered identity.
    ///
    /// Each send is independently guarded: one subscriber's failure removes
    /// that subscriber and never affects delivery to the others.
    pub fn broadcast(&self, data: &impl Serialize) {
        let data = match serde_json::to_value(data) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize broadcast payload");
                return;
            }
        };

        // Collect failed channels first; removing while iterating would
        // deadlock on the shard lock.
        let mut dead: Vec<(DbId, EventSender)> = Vec::new();
        for entry in self.channels.iter() {
            let sent = entry.value().send(OutboundEvent {
                event: EVENT_UPDATE,
                data: data.clone(),
            });
            if sent.is_err() {
                dead.push((*entry.key(), entry.value().clone()));
            }
        }
        for (user_id, sender) in dead {
            // Only remove the channel that actually failed; a concurrent
            // resubscribe may have installed a fresh one under the same key.
            self.channels
                .remove_if(&user_id, |_, tx| tx.same_channel(&sender));
            tracing::debug!(user_id, "Subscriber channel closed, deregistered");
        }
    }

    /// Identities currently holding a live channel.
    pub fn subscriber_ids(&self) -> Vec<DbId> {
        self.channels.iter().map(|entry| *entry.key()).collect()
    }

    /// Whether an identity currently holds a live channel.
    pub fn is_subscribed(&self, user_id: DbId) -> bool {
        self.channels.contains_key(&user_id)
    }

    /// Number of live subscriber channels.
    pub fn subscriber_count(&self) -> usize {
        self.channels.len()
    }

    /// Drop every channel, ending all subscriber streams.
    ///
    /// Used during graceful shutdown before the server stops.
    pub fn shutdown_all(&self) {
        let count = self.channels.len();
        self.channels.clear();
        tracing::info!(count, "Closed all subscriber channels");
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscriber's event stream.
///
/// Ends when the registry drops the channel (replacement or shutdown). On
/// drop (however the transport finished) it deregisters its identity,
/// unless a newer channel has already taken the slot.
pub struct Subscription {
    user_id: DbId,
    receiver: mpsc::UnboundedReceiver<OutboundEvent>,
    sender: mpsc::WeakUnboundedSender<OutboundEvent>,
    registry: Arc<SubscriptionRegistry>,
}

impl Subscription {
    pub fn user_id(&self) -> DbId {
        self.user_id
    }

    /// Stop accepting events on this channel.
    ///
    /// Subsequent sends to this identity fail and deregister it.
    pub fn close(&mut self) {
        self.receiver.close();
    }
}

impl Stream for Subscription {
    type Item = OutboundEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // An upgrade failure means the registry no longer holds this channel
        // (it was replaced or shut down); nothing to clean up. Otherwise
        // remove the entry, but only if it is still this channel.
        let Some(sender) = self.sender.upgrade() else {
            return;
        };
        let removed = self
            .registry
            .channels
            .remove_if(&self.user_id, |_, tx| tx.same_channel(&sender));
        if removed.is_some() {
            tracing::info!(user_id = self.user_id, "Subscriber deregistered");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
