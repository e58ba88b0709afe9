use crate::accessory::TelevisionConfig;
use crate::characteristic::{Characteristic, ValueDomain};
use crate::descriptor::{CharacteristicSpec, DeviceDescriptor, InboundBinding};
use crate::device_kind::DeviceKind;
use crate::error::BridgeError;

const BINARY: ValueDomain = ValueDomain::Int { min: 0, max: 1 };
const MAX_INPUTS: usize = 256;

pub(super) fn describe(config: &TelevisionConfig) -> Result<DeviceDescriptor, BridgeError> {
    if config.inputs.len() > MAX_INPUTS {
        return Err(BridgeError::InvalidConfiguration(format!(
            "television {} declares {} inputs, at most {MAX_INPUTS} are addressable",
            config.id,
            config.inputs.len()
        )));
    }
    // Without a configured input list the controller owns the identifiers.
    let last_input = match config.inputs.len() {
        0 => 255,
        n => i64::try_from(n - 1).unwrap_or(255),
    };

    Ok(DeviceDescriptor {
        kind: DeviceKind::Television,
        id: config.id,
        name: config.name.clone(),
        characteristics: vec![
            CharacteristicSpec::stateful(Characteristic::Active, BINARY, 0)
                .set("setPowerState")
                .get("getPowerState"),
            CharacteristicSpec::stateful(
                Characteristic::ActiveIdentifier,
                ValueDomain::Int {
                    min: 0,
                    max: last_input,
                },
                0,
            )
            .set("setInputState")
            .get("getInputState"),
            CharacteristicSpec::stateful(Characteristic::Mute, BINARY, 0)
                .set("setMuteState")
                .get("getMuteState"),
            CharacteristicSpec::stateful(
                Characteristic::Volume,
                ValueDomain::Int { min: 0, max: 100 },
                0,
            )
            .clamped()
            .set("setVolumeState")
            .get("getVolumeState"),
            CharacteristicSpec::relative(Characteristic::VolumeSelector, Characteristic::Volume),
            CharacteristicSpec::command(
                Characteristic::RemoteKey,
                ValueDomain::Int { min: 0, max: 16 },
            )
            .set("setRemoteKey"),
            CharacteristicSpec::stateful(
                Characteristic::ConfiguredName,
                ValueDomain::Text,
                config.name.as_str(),
            ),
            CharacteristicSpec::read_only(Characteristic::SleepDiscoveryMode, BINARY, 1),
        ],
        inbound: vec![
            InboundBinding::on_change("eventPowerState", Characteristic::Active),
            InboundBinding::on_change("getPowerState", Characteristic::Active),
            InboundBinding::on_change("eventInputState", Characteristic::ActiveIdentifier),
            InboundBinding::on_change("getInputState", Characteristic::ActiveIdentifier),
            InboundBinding::on_change("eventMuteState", Characteristic::Mute),
            InboundBinding::on_change("getMuteState", Characteristic::Mute),
            InboundBinding::on_change("eventVolumeState", Characteristic::Volume),
            InboundBinding::on_change("getVolumeState", Characteristic::Volume),
        ],
        rules: Vec::new(),
        inputs: config.inputs.clone(),
    })
}
