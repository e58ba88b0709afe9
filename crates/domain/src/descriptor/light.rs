use crate::accessory::LightConfig;
use crate::characteristic::{Characteristic, ValueDomain};
use crate::descriptor::{CharacteristicSpec, DeviceDescriptor, InboundBinding};
use crate::device_kind::DeviceKind;

const PERCENT: ValueDomain = ValueDomain::Int { min: 0, max: 100 };

// The controller's brightness reports are authoritative: every one is
// pushed to the hub, even when the value did not move.
pub(super) fn describe(config: &LightConfig) -> DeviceDescriptor {
    DeviceDescriptor {
        kind: DeviceKind::DimLightBulb,
        id: config.id,
        name: config.name.clone(),
        characteristics: vec![
            CharacteristicSpec::stateful(Characteristic::Brightness, PERCENT, 100)
                .set("setLightBrightness")
                .get("getLightBrightness"),
        ],
        inbound: vec![
            InboundBinding::always("eventLightBrightness", Characteristic::Brightness),
            InboundBinding::always("getLightBrightness", Characteristic::Brightness),
        ],
        rules: Vec::new(),
        inputs: Vec::new(),
    }
}
