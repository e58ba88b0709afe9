//! Event router — exact-match dispatch of inbound controller messages.
//!
//! Handlers are keyed by `(deviceType, id, messageName)`. A key has at most
//! one handler and subscriptions are never removed. The router is an
//! ordinary value owned by the [`Bridge`](crate::services::bridge_service::Bridge);
//! there is no process-wide instance.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use minibridge_domain::error::BridgeError;
use minibridge_domain::message::Message;

type Handler = Box<dyn Fn(&Message) -> Result<(), BridgeError> + Send + Sync>;

/// Subscription key: the three addressing fields of a [`Message`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub device_type: String,
    pub id: u32,
    pub name: String,
}

impl RouteKey {
    #[must_use]
    pub fn new(device_type: impl Into<String>, id: u32, name: impl Into<String>) -> Self {
        Self {
            device_type: device_type.into(),
            id,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn of(message: &Message) -> Self {
        Self::new(message.device_type.as_str(), message.id, message.name.as_str())
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.device_type, self.id, self.name)
    }
}

/// What happened to a dispatched message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Delivered,
    Unrouted,
}

/// Maps inbound message keys to handlers.
#[derive(Default)]
pub struct EventRouter {
    handlers: RwLock<HashMap<RouteKey, Handler>>,
    unrouted: AtomicU64,
}

impl EventRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::DuplicateSubscription`] when `key` already has
    /// a handler; the existing handler is kept.
    pub fn subscribe<F>(&self, key: RouteKey, handler: F) -> Result<(), BridgeError>
    where
        F: Fn(&Message) -> Result<(), BridgeError> + Send + Sync + 'static,
    {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if handlers.contains_key(&key) {
            return Err(BridgeError::DuplicateSubscription {
                device_type: key.device_type,
                id: key.id,
                name: key.name,
            });
        }
        tracing::trace!(%key, "subscribed");
        handlers.insert(key, Box::new(handler));
        Ok(())
    }

    /// Invoke the handler subscribed for `message`, synchronously.
    ///
    /// Handlers run under the router's read lock and must not subscribe.
    ///
    /// # Errors
    ///
    /// Propagates the handler's error.
    pub fn dispatch(&self, message: &Message) -> Result<Dispatch, BridgeError> {
        let key = RouteKey::of(message);
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        match handlers.get(&key) {
            Some(handler) => handler(message).map(|()| Dispatch::Delivered),
            None => {
                self.unrouted.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(%key, "no subscriber, dropping message");
                Ok(Dispatch::Unrouted)
            }
        }
    }

    /// Number of messages dropped for lack of a subscriber.
    #[must_use]
    pub fn unrouted_count(&self) -> u64 {
        self.unrouted.load(Ordering::Relaxed)
    }

    /// Number of subscribed keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex;

    fn recorder() -> (
        Arc<Mutex<Vec<Message>>>,
        impl Fn(&Message) -> Result<(), BridgeError> + Send + Sync + 'static,
    ) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |msg: &Message| {
            sink.lock().unwrap().push(msg.clone());
            Ok(())
        })
    }

    #[test]
    fn should_deliver_to_exact_key_only() {
        let router = EventRouter::new();
        let (seen, handler) = recorder();
        router
            .subscribe(RouteKey::new("Television", 3, "eventMuteState"), handler)
            .unwrap();

        let hit = Message::command("Television", 3, "eventMuteState", "1");
        let other_id = Message::command("Television", 4, "eventMuteState", "1");
        let other_name = Message::command("Television", 3, "eventVolumeState", "1");

        assert_eq!(router.dispatch(&hit).unwrap(), Dispatch::Delivered);
        assert_eq!(router.dispatch(&other_id).unwrap(), Dispatch::Unrouted);
        assert_eq!(router.dispatch(&other_name).unwrap(), Dispatch::Unrouted);
        assert_eq!(*seen.lock().unwrap(), vec![hit]);
    }

    #[test]
    fn should_count_unrouted_messages() {
        let router = EventRouter::new();
        router
            .dispatch(&Message::query("Fan", 1, "getSpeed"))
            .unwrap();
        router
            .dispatch(&Message::query("Fan", 1, "getSpeed"))
            .unwrap();
        assert_eq!(router.unrouted_count(), 2);
    }

    #[test]
    fn should_reject_duplicate_subscription_and_keep_first_handler() {
        let router = EventRouter::new();
        let (first, handler) = recorder();
        let key = RouteKey::new("DimLightBulb", 1, "eventLightBrightness");
        router.subscribe(key.clone(), handler).unwrap();

        let err = router
            .subscribe(key, |_: &Message| -> Result<(), BridgeError> {
                panic!("replacement handler must never run")
            })
            .unwrap_err();
        assert!(matches!(err, BridgeError::DuplicateSubscription { id: 1, .. }));

        router
            .dispatch(&Message::command("DimLightBulb", 1, "eventLightBrightness", "5"))
            .unwrap();
        assert_eq!(first.lock().unwrap().len(), 1);
        assert_eq!(router.len(), 1);
    }

    #[test]
    fn should_propagate_handler_error() {
        let router = EventRouter::new();
        router
            .subscribe(RouteKey::new("Television", 3, "eventMuteState"), |_: &Message| {
                Err(BridgeError::InvalidConfiguration("boom".to_string()))
            })
            .unwrap();
        let result = router.dispatch(&Message::command("Television", 3, "eventMuteState", "1"));
        assert!(result.is_err());
        assert_eq!(router.unrouted_count(), 0);
    }

    #[test]
    fn should_start_empty() {
        let router = EventRouter::new();
        assert!(router.is_empty());
        assert_eq!(router.len(), 0);
    }

    #[test]
    fn should_display_key_in_wire_order() {
        assert_eq!(
            RouteKey::new("HeaterCooler", 12, "getPowerState").to_string(),
            "HeaterCooler:12:getPowerState"
        );
    }
}
