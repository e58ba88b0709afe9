//! In-process capability bus backed by a tokio broadcast channel.

use serde::Serialize;
use tokio::sync::broadcast;

use minibridge_domain::characteristic::{Characteristic, CharacteristicValue};
use minibridge_domain::device_kind::DeviceKind;
use minibridge_domain::id::InstanceId;
use minibridge_domain::time::{Timestamp, now};

use crate::ports::CapabilitySink;

/// One characteristic push, as seen by hub-side subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacteristicUpdate {
    pub kind: DeviceKind,
    pub id: InstanceId,
    pub characteristic: Characteristic,
    pub value: CharacteristicValue,
    pub timestamp: Timestamp,
}

/// Capability sink fanning pushes out to every subscriber.
///
/// Publishing succeeds even when there are no active subscribers
/// (the update is simply dropped).
pub struct InProcessCapabilityBus {
    sender: broadcast::Sender<CharacteristicUpdate>,
}

impl InProcessCapabilityBus {
    /// Create a new bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to updates on this bus.
    ///
    /// Returns a receiver that will get all updates published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CharacteristicUpdate> {
        self.sender.subscribe()
    }
}

impl CapabilitySink for InProcessCapabilityBus {
    fn push_characteristic(
        &self,
        kind: DeviceKind,
        id: InstanceId,
        characteristic: Characteristic,
        value: &CharacteristicValue,
    ) {
        tracing::debug!(%kind, %id, %characteristic, %value, "pushing characteristic");
        // broadcast::send fails only when there are zero receivers.
        let _ = self.sender.send(CharacteristicUpdate {
            kind,
            id,
            characteristic,
            value: value.clone(),
            timestamp: now(),
        });
    }
}
