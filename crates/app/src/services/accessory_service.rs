//! Accessory service — one device state machine wired to the ports.
//!
//! The engine sits behind a per-device mutex so that hub operations and
//! inbound controller messages for the same device never interleave. The
//! ports are invoked while the lock is held, which keeps outbound commands
//! and hub pushes in the order the engine produced them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use minibridge_domain::accessory::AccessoryConfig;
use minibridge_domain::characteristic::{Characteristic, CharacteristicValue};
use minibridge_domain::device_kind::DeviceKind;
use minibridge_domain::error::BridgeError;
use minibridge_domain::id::InstanceId;
use minibridge_domain::message::Message;
use minibridge_domain::state::{DeviceEngine, DeviceSnapshot, StateDelta, Transition};

use crate::ports::{CapabilitySink, CommandSender};
use crate::router::{EventRouter, RouteKey};

/// A configured accessory and its collaborators.
pub struct Accessory<S, C> {
    kind: DeviceKind,
    id: InstanceId,
    engine: Mutex<DeviceEngine>,
    sink: S,
    sender: C,
}

impl<S: CapabilitySink, C: CommandSender> Accessory<S, C> {
    pub fn new(engine: DeviceEngine, sink: S, sender: C) -> Self {
        let (kind, id) = (engine.descriptor().kind, engine.descriptor().id);
        Self {
            kind,
            id,
            engine: Mutex::new(engine),
            sink,
            sender,
        }
    }

    /// Build the accessory described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidConfiguration`] when the configuration
    /// is inconsistent.
    pub fn from_config(config: &AccessoryConfig, sink: S, sender: C) -> Result<Self, BridgeError> {
        Ok(Self::new(DeviceEngine::from_config(config)?, sink, sender))
    }

    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Answer a hub read immediately and ask the controller for a fresh value.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnsupportedCharacteristic`] when the
    /// characteristic cannot be read on this accessory.
    #[tracing::instrument(skip(self), fields(kind = %self.kind, id = %self.id))]
    pub fn handle_hub_get(
        &self,
        characteristic: Characteristic,
    ) -> Result<CharacteristicValue, BridgeError> {
        let engine = self.lock();
        let (value, query) = engine.hub_get(characteristic)?;
        if let Some(query) = query {
            self.sender.send(&query);
        }
        tracing::debug!(%value, "hub read");
        Ok(value)
    }

    /// Apply a hub write, returning the commands sent to the controller.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidCharacteristicValue`] or
    /// [`BridgeError::UnsupportedCharacteristic`]; nothing is sent or pushed
    /// in that case.
    #[tracing::instrument(skip(self), fields(kind = %self.kind, id = %self.id))]
    pub fn handle_hub_set(
        &self,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<Vec<Message>, BridgeError> {
        let mut engine = self.lock();
        let transition = engine.hub_set(characteristic, value)?;
        if transition.is_empty() {
            tracing::debug!("value unchanged, nothing to send");
        } else {
            tracing::info!(commands = transition.outbound.len(), "hub write applied");
        }
        self.apply(&transition);
        Ok(transition.outbound)
    }

    /// Apply an inbound controller message, returning the hub pushes.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnroutedMessage`] for a message not bound on
    /// this accessory and [`BridgeError::InvalidCharacteristicValue`] for a
    /// value the engine rejects.
    #[tracing::instrument(skip(self), fields(kind = %self.kind, id = %self.id))]
    pub fn handle_inbound_event(&self, message: &Message) -> Result<Vec<StateDelta>, BridgeError> {
        let mut engine = self.lock();
        let transition = engine.inbound(message)?;
        if !transition.deltas.is_empty() {
            tracing::info!(pushes = transition.deltas.len(), "controller update applied");
        }
        self.apply(&transition);
        Ok(transition.deltas)
    }

    /// Ask the controller to report every readable value.
    pub fn refresh(&self) {
        let engine = self.lock();
        for query in engine.refresh_queries() {
            self.sender.send(&query);
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> DeviceSnapshot {
        self.lock().snapshot()
    }

    fn apply(&self, transition: &Transition) {
        for message in &transition.outbound {
            self.sender.send(message);
        }
        for delta in &transition.deltas {
            self.sink
                .push_characteristic(self.kind, self.id, delta.characteristic, &delta.value);
        }
    }

    fn lock(&self) -> MutexGuard<'_, DeviceEngine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S, C> Accessory<S, C>
where
    S: CapabilitySink + 'static,
    C: CommandSender + 'static,
{
    /// Subscribe this accessory for every inbound message it consumes.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::DuplicateSubscription`] when another handler
    /// already owns one of the keys.
    pub fn register(self: &Arc<Self>, router: &EventRouter) -> Result<(), BridgeError> {
        let names: Vec<&'static str> = self
            .lock()
            .descriptor()
            .inbound
            .iter()
            .map(|binding| binding.message)
            .collect();
        for name in names {
            let accessory = Arc::clone(self);
            router.subscribe(
                RouteKey::new(self.kind.as_str(), self.id.get(), name),
                move |message: &Message| accessory.handle_inbound_event(message).map(|_| ()),
            )?;
        }
        tracing::debug!(kind = %self.kind, id = %self.id, "accessory registered");
        Ok(())
    }
}
