//! # minibridge-adapter-virtual
//!
//! Virtual controller that plays the other end of the wire, for testing and
//! demonstration without real hardware.
//!
//! ## Behaviour
//!
//! | Outbound message | Reply |
//! |------------------|-------|
//! | `<type>:<id>:set<State>:<v>:*` | remembers `v`, replies `<type>:<id>:event<State>:<v>:*` |
//! | `<type>:<id>:get<State>:*` | replies `<type>:<id>:get<State>:<v>:*` with the remembered `v`, if any |
//!
//! Replies are queued on a channel rather than delivered in place, so the
//! controller never calls back into the accessory that is sending.
//!
//! ## Dependency rule
//!
//! Depends on `minibridge-app` (port traits) and `minibridge-domain` only.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;

use minibridge_app::ports::CommandSender;
use minibridge_domain::message::Message;

type StateKey = (String, u32, String);

/// Simulated controller implementing [`CommandSender`].
pub struct VirtualController {
    memory: Mutex<HashMap<StateKey, String>>,
    replies: mpsc::UnboundedSender<String>,
}

impl VirtualController {
    /// Create a controller and the receiving end of its reply lines.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (replies, rx) = mpsc::unbounded_channel();
        let controller = Self {
            memory: Mutex::new(HashMap::new()),
            replies,
        };
        (controller, rx)
    }

    /// Pre-load a state value, e.g. `seed("HeaterCooler", 12, "CurrentTemperature", "215")`.
    pub fn seed(&self, device_type: &str, id: u32, state: &str, value: &str) {
        self.memory
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                (device_type.to_string(), id, state.to_string()),
                value.to_string(),
            );
    }

    /// The remembered raw value of a state, if any.
    #[must_use]
    pub fn value(&self, device_type: &str, id: u32, state: &str) -> Option<String> {
        self.memory
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(device_type.to_string(), id, state.to_string()))
            .cloned()
    }

    fn reply(&self, message: &Message) {
        tracing::trace!(%message, "virtual controller reply");
        if self.replies.send(message.encode()).is_err() {
            tracing::debug!("reply receiver dropped, discarding reply");
        }
    }
}

impl CommandSender for VirtualController {
    fn send(&self, message: &Message) {
        if let (Some(state), Some(value)) = (message.name.strip_prefix("set"), &message.value) {
            self.seed(&message.device_type, message.id, state, value);
            self.reply(&Message::command(
                message.device_type.as_str(),
                message.id,
                format!("event{state}"),
                value.as_str(),
            ));
        } else if let Some(state) = message.name.strip_prefix("get") {
            match self.value(&message.device_type, message.id, state) {
                Some(value) => self.reply(&Message::command(
                    message.device_type.as_str(),
                    message.id,
                    message.name.as_str(),
                    value,
                )),
                None => tracing::debug!(%message, "no remembered value, not answering"),
            }
        } else {
            tracing::debug!(%message, "ignoring unknown command");
        }
    }
}

/// Feed every reply line to `on_line` until the controller is dropped.
pub async fn forward_replies<F>(mut rx: mpsc::UnboundedReceiver<String>, on_line: F)
where
    F: Fn(&str),
{
    while let Some(line) = rx.recv().await {
        on_line(&line);
    }
}
