//! Command sender port — outbound wire messages to the controller.

use std::sync::Arc;

use minibridge_domain::message::Message;

/// Fire-and-forget delivery of a message to the controller.
///
/// `send` must return without waiting for the transport; delivery failures
/// are the adapter's to log.
pub trait CommandSender: Send + Sync {
    fn send(&self, message: &Message);
}

impl<T: CommandSender + ?Sized> CommandSender for Arc<T> {
    fn send(&self, message: &Message) {
        (**self).send(message);
    }
}
