//! Shared application state for axum handlers.

use std::sync::Arc;

use minibridge_app::event_bus::InProcessCapabilityBus;
use minibridge_app::ports::{CapabilitySink, CommandSender};
use minibridge_app::services::bridge_service::Bridge;

/// Application state shared across all axum handlers.
///
/// Generic over the capability sink and command sender the bridge was built
/// with. `Clone` is implemented manually so neither needs to be `Clone`.
pub struct AppState<S, C> {
    /// Accessory registry and inbound pipeline.
    pub bridge: Arc<Bridge<S, C>>,
    /// Bus the SSE stream subscribes to.
    pub bus: Arc<InProcessCapabilityBus>,
}

impl<S, C> Clone for AppState<S, C> {
    fn clone(&self) -> Self {
        Self {
            bridge: Arc::clone(&self.bridge),
            bus: Arc::clone(&self.bus),
        }
    }
}

impl<S, C> AppState<S, C>
where
    S: CapabilitySink + 'static,
    C: CommandSender + 'static,
{
    pub fn new(bridge: Arc<Bridge<S, C>>, bus: Arc<InProcessCapabilityBus>) -> Self {
        Self { bridge, bus }
    }
}
