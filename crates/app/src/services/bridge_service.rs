//! Bridge service — the accessory registry and the inbound line pipeline.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use minibridge_domain::accessory::AccessoryConfig;
use minibridge_domain::device_kind::DeviceKind;
use minibridge_domain::error::BridgeError;
use minibridge_domain::id::InstanceId;
use minibridge_domain::message::Message;
use minibridge_domain::state::DeviceSnapshot;

use crate::ports::{CapabilitySink, CommandSender};
use crate::router::{Dispatch, EventRouter};
use crate::services::accessory_service::Accessory;

/// What happened to one inbound line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Decoded and handled by an accessory.
    Applied,
    /// Decoded, but nothing is subscribed for it.
    Unrouted,
    /// Not a valid frame.
    Malformed,
    /// Routed, but the accessory refused the value.
    Rejected,
}

/// Counters exposed for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BridgeStats {
    pub accessories: usize,
    pub subscriptions: usize,
    pub malformed: u64,
    pub unrouted: u64,
    pub rejected: u64,
}

/// All configured accessories plus the router feeding them.
pub struct Bridge<S, C> {
    accessories: BTreeMap<(DeviceKind, InstanceId), Arc<Accessory<S, C>>>,
    router: EventRouter,
    malformed: AtomicU64,
    rejected: AtomicU64,
}

impl<S, C> Bridge<S, C>
where
    S: CapabilitySink + Clone + 'static,
    C: CommandSender + Clone + 'static,
{
    /// Build and register one accessory per configuration entry.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidConfiguration`] for an inconsistent
    /// entry and [`BridgeError::DuplicateSubscription`] when two entries
    /// share a `(type, id)` pair.
    #[tracing::instrument(skip_all, fields(count = configs.len()))]
    pub fn from_configs(configs: &[AccessoryConfig], sink: S, sender: C) -> Result<Self, BridgeError> {
        let router = EventRouter::new();
        let mut accessories = BTreeMap::new();
        for config in configs {
            let accessory = Arc::new(Accessory::from_config(config, sink.clone(), sender.clone())?);
            accessory.register(&router)?;
            tracing::info!(kind = %accessory.kind(), id = %accessory.id(), name = config.name(), "accessory ready");
            accessories.insert((accessory.kind(), accessory.id()), accessory);
        }
        Ok(Self {
            accessories,
            router,
            malformed: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        })
    }
}

impl<S, C> Bridge<S, C>
where
    S: CapabilitySink,
    C: CommandSender,
{
    /// Decode one line from the controller and hand it to its accessory.
    ///
    /// Never fails: malformed, unrouted and rejected lines are counted,
    /// logged and dropped.
    pub fn handle_line(&self, line: &str) -> LineOutcome {
        let message = match Message::decode(line) {
            Ok(message) => message,
            Err(err) => {
                self.malformed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(line = line.trim(), error = %err, "dropping malformed line");
                return LineOutcome::Malformed;
            }
        };
        match self.router.dispatch(&message) {
            Ok(Dispatch::Delivered) => LineOutcome::Applied,
            Ok(Dispatch::Unrouted) => LineOutcome::Unrouted,
            Err(err) => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(%message, error = %err, "rejected controller message");
                LineOutcome::Rejected
            }
        }
    }

    /// Look up an accessory.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] when no such accessory is configured.
    pub fn accessory(&self, kind: DeviceKind, id: InstanceId) -> Result<&Arc<Accessory<S, C>>, BridgeError> {
        self.accessories
            .get(&(kind, id))
            .ok_or(BridgeError::NotFound { kind, id })
    }

    /// All accessories, ordered by kind then id.
    pub fn accessories(&self) -> impl Iterator<Item = &Arc<Accessory<S, C>>> {
        self.accessories.values()
    }

    #[must_use]
    pub fn snapshots(&self) -> Vec<DeviceSnapshot> {
        self.accessories().map(|a| a.snapshot()).collect()
    }

    /// Ask the controller for every accessory's current values.
    pub fn refresh_all(&self) {
        for accessory in self.accessories.values() {
            accessory.refresh();
        }
        tracing::debug!(accessories = self.accessories.len(), "refresh queries sent");
    }

    #[must_use]
    pub fn stats(&self) -> BridgeStats {
        BridgeStats {
            accessories: self.accessories.len(),
            subscriptions: self.router.len(),
            malformed: self.malformed.load(Ordering::Relaxed),
            unrouted: self.router.unrouted_count(),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}
