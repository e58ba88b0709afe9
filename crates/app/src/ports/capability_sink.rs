//! Capability sink port — hub-facing characteristic notifications.

use std::sync::Arc;

use minibridge_domain::characteristic::{Characteristic, CharacteristicValue};
use minibridge_domain::device_kind::DeviceKind;
use minibridge_domain::id::InstanceId;

/// Receives characteristic values that must be pushed to the hub.
///
/// Implementations must not fail the core and must not call back into the
/// accessory that is pushing.
pub trait CapabilitySink: Send + Sync {
    fn push_characteristic(
        &self,
        kind: DeviceKind,
        id: InstanceId,
        characteristic: Characteristic,
        value: &CharacteristicValue,
    );
}

impl<T: CapabilitySink + ?Sized> CapabilitySink for Arc<T> {
    fn push_characteristic(
        &self,
        kind: DeviceKind,
        id: InstanceId,
        characteristic: Characteristic,
        value: &CharacteristicValue,
    ) {
        (**self).push_characteristic(kind, id, characteristic, value);
    }
}
