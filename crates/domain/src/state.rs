//! Device state machines.
//!
//! A [`DeviceEngine`] owns the state of one accessory instance and is driven
//! from two directions:
//!
//! - **hub side**: [`hub_get`](DeviceEngine::hub_get) and
//!   [`hub_set`](DeviceEngine::hub_set) answer and apply typed capability
//!   operations, producing outbound wire commands;
//! - **controller side**: [`inbound`](DeviceEngine::inbound) applies event and
//!   get-response messages, producing hub notifications.
//!
//! Every mutation returns a [`Transition`] describing what must be sent to
//! the controller and pushed to the hub. The engine performs no IO itself.
//!
//! ## Echo suppression
//!
//! A write equal to the stored value is a no-op: nothing is sent and nothing
//! is pushed. Inbound writes never produce outbound commands, so a command
//! echoed back by the controller settles after one round trip. Bindings
//! declared with [`Notify::Always`] bypass the equality guard on the inbound
//! side only.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::accessory::{AccessoryConfig, InputSource};
use crate::characteristic::{Characteristic, CharacteristicValue, RangePolicy, ValueDomain};
use crate::descriptor::{Access, CharacteristicSpec, DerivedRule, DeviceDescriptor, Notify};
use crate::device_kind::DeviceKind;
use crate::error::BridgeError;
use crate::id::InstanceId;
use crate::message::Message;

/// A characteristic whose hub-visible value must be pushed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateDelta {
    pub characteristic: Characteristic,
    pub value: CharacteristicValue,
}

/// Side effects of one state-machine call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    /// Commands for the controller, in send order.
    pub outbound: Vec<Message>,
    /// Hub notifications, the written characteristic first.
    pub deltas: Vec<StateDelta>,
}

impl Transition {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outbound.is_empty() && self.deltas.is_empty()
    }
}

/// Hub-facing view of one characteristic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacteristicView {
    pub characteristic: Characteristic,
    pub value: Option<CharacteristicValue>,
    pub domain: ValueDomain,
    pub access: Access,
}

/// Point-in-time copy of a device's hub-visible state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSnapshot {
    pub kind: DeviceKind,
    pub id: InstanceId,
    pub name: String,
    pub characteristics: Vec<CharacteristicView>,
    pub inputs: Vec<InputSource>,
}

impl DeviceSnapshot {
    #[must_use]
    pub fn value(&self, characteristic: Characteristic) -> Option<&CharacteristicValue> {
        self.characteristics
            .iter()
            .find(|view| view.characteristic == characteristic)
            .and_then(|view| view.value.as_ref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Hub,
    Controller,
}

/// State machine of one accessory instance.
#[derive(Debug, Clone)]
pub struct DeviceEngine {
    descriptor: DeviceDescriptor,
    values: BTreeMap<Characteristic, CharacteristicValue>,
}

impl DeviceEngine {
    /// Create an engine holding every characteristic's initial value.
    #[must_use]
    pub fn new(descriptor: DeviceDescriptor) -> Self {
        let values = descriptor
            .characteristics
            .iter()
            .filter_map(|spec| spec.initial.clone().map(|v| (spec.characteristic, v)))
            .collect();
        Self { descriptor, values }
    }

    /// Build the descriptor for `config` and create its engine.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidConfiguration`] when the configuration
    /// is rejected by [`DeviceDescriptor::from_config`].
    pub fn from_config(config: &AccessoryConfig) -> Result<Self, BridgeError> {
        DeviceDescriptor::from_config(config).map(Self::new)
    }

    #[must_use]
    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    /// The stored value of any characteristic, hidden ones included.
    #[must_use]
    pub fn value(&self, characteristic: Characteristic) -> Option<&CharacteristicValue> {
        self.values.get(&characteristic)
    }

    /// Answer a hub read with the last-known value.
    ///
    /// The returned message, when present, is the query to send to the
    /// controller so that a fresher value arrives later as an inbound
    /// message. The read itself never waits for it.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnsupportedCharacteristic`] when the device does
    /// not expose the characteristic to the hub or it is write-only.
    pub fn hub_get(
        &self,
        characteristic: Characteristic,
    ) -> Result<(CharacteristicValue, Option<Message>), BridgeError> {
        let spec = self.hub_spec(characteristic, "read")?;
        let value = match (spec.access.readable(), self.values.get(&characteristic)) {
            (true, Some(value)) => value.clone(),
            _ => return Err(self.unsupported(characteristic, "read")),
        };
        let query = spec
            .get_message
            .map(|name| Message::query(self.descriptor.kind.as_str(), self.descriptor.id.get(), name));
        Ok((value, query))
    }

    /// Apply a hub write.
    ///
    /// The value is validated against the characteristic's domain first; on
    /// error nothing is mutated. Relative characteristics step their target
    /// by one and saturate at its bounds.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidCharacteristicValue`] for a value outside
    /// the domain, and [`BridgeError::UnsupportedCharacteristic`] for a
    /// read-only or unexposed characteristic.
    pub fn hub_set(
        &mut self,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<Transition, BridgeError> {
        let spec = self.hub_spec(characteristic, "write")?.clone();
        match spec.access {
            Access::ReadOnly => Err(self.unsupported(characteristic, "write")),
            Access::CommandOnly => {
                let value = spec.domain.validate(characteristic, value, spec.policy)?;
                Ok(Transition {
                    outbound: self.command_for(&spec, &value).into_iter().collect(),
                    deltas: Vec::new(),
                })
            }
            Access::Relative { target } => {
                let step = spec
                    .domain
                    .validate(characteristic, value, RangePolicy::Reject)?;
                let target_spec = self.hub_spec(target, "write")?.clone();
                let current = self
                    .values
                    .get(&target)
                    .and_then(CharacteristicValue::as_int)
                    .unwrap_or_default();
                let next = if step.as_int() == Some(0) {
                    current.saturating_add(1)
                } else {
                    current.saturating_sub(1)
                };
                let next = target_spec
                    .domain
                    .validate(target, next.into(), RangePolicy::Clamp)?;
                Ok(self.write(&target_spec, next, Origin::Hub, Notify::OnChange))
            }
            Access::Stateful => {
                let value = spec.domain.validate(characteristic, value, spec.policy)?;
                Ok(self.write(&spec, value, Origin::Hub, Notify::OnChange))
            }
        }
    }

    /// Apply an inbound controller message addressed to this device.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnroutedMessage`] when the message is not for
    /// this device or its name is not bound, and
    /// [`BridgeError::InvalidCharacteristicValue`] when the value is missing,
    /// not an integer, or outside the domain under a reject policy. No state
    /// is mutated on error.
    pub fn inbound(&mut self, message: &Message) -> Result<Transition, BridgeError> {
        let binding = message
            .targets(self.descriptor.kind.as_str(), self.descriptor.id.get())
            .then(|| self.descriptor.binding(&message.name).copied())
            .flatten()
            .ok_or_else(|| BridgeError::UnroutedMessage {
                device_type: message.device_type.clone(),
                id: message.id,
                name: message.name.clone(),
            })?;
        let characteristic = binding.characteristic;
        let spec = self
            .descriptor
            .spec(characteristic)
            .cloned()
            .ok_or_else(|| self.unsupported(characteristic, "report"))?;

        let raw = message.value.as_deref().unwrap_or_default();
        let raw = raw
            .parse::<i64>()
            .map_err(|_| BridgeError::InvalidCharacteristicValue {
                characteristic,
                value: raw.to_string(),
                reason: "expected an integer",
            })?;
        let value = spec
            .domain
            .validate(characteristic, spec.scale.decode(raw), spec.policy)?;
        Ok(self.write(&spec, value, Origin::Controller, binding.notify))
    }

    /// Queries asking the controller to report every readable value.
    #[must_use]
    pub fn refresh_queries(&self) -> Vec<Message> {
        self.descriptor
            .queries()
            .into_iter()
            .map(|name| Message::query(self.descriptor.kind.as_str(), self.descriptor.id.get(), name))
            .collect()
    }

    #[must_use]
    pub fn snapshot(&self) -> DeviceSnapshot {
        DeviceSnapshot {
            kind: self.descriptor.kind,
            id: self.descriptor.id,
            name: self.descriptor.name.clone(),
            characteristics: self
                .descriptor
                .characteristics
                .iter()
                .filter(|spec| spec.observed)
                .map(|spec| CharacteristicView {
                    characteristic: spec.characteristic,
                    value: self.values.get(&spec.characteristic).cloned(),
                    domain: spec.domain,
                    access: spec.access,
                })
                .collect(),
            inputs: self.descriptor.inputs.clone(),
        }
    }

    fn hub_spec(
        &self,
        characteristic: Characteristic,
        access: &'static str,
    ) -> Result<&CharacteristicSpec, BridgeError> {
        self.descriptor
            .spec(characteristic)
            .filter(|spec| spec.observed)
            .ok_or_else(|| self.unsupported(characteristic, access))
    }

    fn unsupported(&self, characteristic: Characteristic, access: &'static str) -> BridgeError {
        BridgeError::UnsupportedCharacteristic {
            kind: self.descriptor.kind,
            characteristic,
            access,
        }
    }

    fn command_for(&self, spec: &CharacteristicSpec, value: &CharacteristicValue) -> Option<Message> {
        spec.set_message.map(|name| {
            Message::command(
                self.descriptor.kind.as_str(),
                self.descriptor.id.get(),
                name,
                spec.scale.encode(value),
            )
        })
    }

    fn write(
        &mut self,
        spec: &CharacteristicSpec,
        value: CharacteristicValue,
        origin: Origin,
        notify: Notify,
    ) -> Transition {
        let characteristic = spec.characteristic;
        let changed = self.values.get(&characteristic) != Some(&value);
        if !changed && notify == Notify::OnChange {
            return Transition::default();
        }

        let before = self.derived_before(characteristic);
        let previous = self.values.insert(characteristic, value.clone());
        self.apply_rules(characteristic, origin);

        let mut deltas = Vec::new();
        if spec.observed
            && let Some(after) = self.values.get(&characteristic)
            && (notify == Notify::Always || previous.as_ref() != Some(after))
        {
            deltas.push(StateDelta {
                characteristic,
                value: after.clone(),
            });
        }
        for (c, previous) in before {
            if c == characteristic || !self.descriptor.spec(c).is_some_and(|s| s.observed) {
                continue;
            }
            if let Some(after) = self.values.get(&c).filter(|after| previous.as_ref() != Some(*after)) {
                deltas.push(StateDelta {
                    characteristic: c,
                    value: after.clone(),
                });
            }
        }

        let outbound = match origin {
            Origin::Hub => self.command_for(spec, &value).into_iter().collect(),
            Origin::Controller => Vec::new(),
        };
        Transition { outbound, deltas }
    }

    /// Current values of everything the rules may overwrite after a write to
    /// `changed`, in descriptor order.
    fn derived_before(&self, changed: Characteristic) -> Vec<(Characteristic, Option<CharacteristicValue>)> {
        let mut touched: Vec<Characteristic> = self
            .descriptor
            .rules
            .iter()
            .flat_map(DerivedRule::writes)
            .copied()
            .filter(|c| *c != changed)
            .collect();
        touched.sort_by_key(|c| {
            self.descriptor
                .characteristics
                .iter()
                .position(|spec| spec.characteristic == *c)
        });
        touched.dedup();
        touched
            .into_iter()
            .map(|c| (c, self.values.get(&c).cloned()))
            .collect()
    }

    fn apply_rules(&mut self, changed: Characteristic, origin: Origin) {
        use Characteristic::{Active, CurrentHeaterCoolerState, TargetHeaterCoolerState};

        let values = &mut self.values;
        for rule in &self.descriptor.rules {
            match *rule {
                DerivedRule::CurrentFromActive if changed == Active => {
                    let current = match int(values, Active) {
                        Some(0) => Some(0),
                        Some(_) => int(values, TargetHeaterCoolerState).map(|t| t + 1),
                        None => None,
                    };
                    if let Some(current) = current {
                        values.insert(CurrentHeaterCoolerState, current.into());
                    }
                }
                DerivedRule::CurrentFromTarget
                    if changed == TargetHeaterCoolerState && int(values, Active) == Some(1) =>
                {
                    if let Some(target) = int(values, TargetHeaterCoolerState) {
                        values.insert(CurrentHeaterCoolerState, (target + 1).into());
                    }
                }
                DerivedRule::TargetFromCurrent(modes)
                    if changed == CurrentHeaterCoolerState && origin == Origin::Controller =>
                {
                    if let Some(current) = int(values, CurrentHeaterCoolerState).filter(|c| *c != 0) {
                        let target = modes.clamp(current - 1);
                        values.insert(TargetHeaterCoolerState, target.into());
                        if target != current - 1 && int(values, Active) == Some(1) {
                            values.insert(CurrentHeaterCoolerState, (target + 1).into());
                        }
                    }
                }
                DerivedRule::Mirror(group) if group.contains(&changed) => {
                    if let Some(value) = values.get(&changed).cloned() {
                        for member in group.iter().filter(|m| **m != changed) {
                            values.insert(*member, value.clone());
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

fn int(values: &BTreeMap<Characteristic, CharacteristicValue>, c: Characteristic) -> Option<i64> {
    values.get(&c).and_then(CharacteristicValue::as_int)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessory::{HeaterCoolerConfig, LightConfig, TelevisionConfig};
    use Characteristic::*;

    fn light() -> DeviceEngine {
        DeviceEngine::from_config(&AccessoryConfig::DimLightBulb(LightConfig {
            id: InstanceId::new(7),
            name: "Hall".to_string(),
        }))
        .unwrap()
    }

    fn heater_cooler(mode_selection: u8) -> DeviceEngine {
        DeviceEngine::from_config(&AccessoryConfig::HeaterCooler(HeaterCoolerConfig {
            id: InstanceId::new(12),
            name: "AC".to_string(),
            mode_selection,
            min_temperature: 10.0,
            max_temperature: 38.0,
            temperature_display_units: 0,
        }))
        .unwrap()
    }

    fn television() -> DeviceEngine {
        DeviceEngine::from_config(&AccessoryConfig::Television(TelevisionConfig {
            id: InstanceId::new(3),
            name: "TV".to_string(),
            inputs: Vec::new(),
        }))
        .unwrap()
    }

    fn line(engine: &mut DeviceEngine, wire: &str) -> Result<Transition, BridgeError> {
        engine.inbound(&Message::decode(wire).unwrap())
    }

    fn wire(transition: &Transition) -> Vec<String> {
        transition.outbound.iter().map(Message::encode).collect()
    }

    fn changed(transition: &Transition) -> Vec<Characteristic> {
        transition.deltas.iter().map(|d| d.characteristic).collect()
    }

    #[test]
    fn should_send_command_and_notify_once_on_hub_set() {
        let mut engine = light();

        let first = engine.hub_set(Brightness, 55.into()).unwrap();
        assert_eq!(wire(&first), ["DimLightBulb:7:setLightBrightness:55:*"]);
        assert_eq!(changed(&first), [Brightness]);

        let second = engine.hub_set(Brightness, 55.into()).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn should_notify_every_light_report_even_when_unchanged() {
        let mut engine = light();

        let first = line(&mut engine, "DimLightBulb:7:eventLightBrightness:40:*").unwrap();
        let second = line(&mut engine, "DimLightBulb:7:getLightBrightness:40:*").unwrap();

        assert_eq!(changed(&first), [Brightness]);
        assert_eq!(changed(&second), [Brightness]);
        assert!(second.outbound.is_empty());
        assert_eq!(engine.value(Brightness), Some(&40.into()));
    }

    #[test]
    fn should_not_echo_inbound_event_back_to_controller() {
        let mut engine = television();
        engine.hub_set(Active, 1.into()).unwrap();

        let echo = line(&mut engine, "Television:3:eventPowerState:1:*").unwrap();
        assert!(echo.is_empty());
    }

    #[test]
    fn should_return_last_known_value_and_query_on_hub_get() {
        let engine = heater_cooler(10);

        let (value, query) = engine.hub_get(RotationSpeed).unwrap();
        assert_eq!(value, 100.into());
        assert_eq!(query.unwrap().encode(), "HeaterCooler:12:getRotationSpeed:*");
    }

    #[test]
    fn should_answer_local_only_characteristic_without_query() {
        let engine = television();
        let (value, query) = engine.hub_get(SleepDiscoveryMode).unwrap();
        assert_eq!(value, 1.into());
        assert!(query.is_none());
    }

    #[test]
    fn should_derive_current_state_from_active_and_target() {
        let mut engine = heater_cooler(10);
        engine.hub_set(TargetHeaterCoolerState, 2.into()).unwrap();
        assert_eq!(engine.value(CurrentHeaterCoolerState), Some(&0.into()));

        let on = engine.hub_set(Active, 1.into()).unwrap();
        assert_eq!(wire(&on), ["HeaterCooler:12:setPowerState:1:*"]);
        assert_eq!(changed(&on), [Active, CurrentHeaterCoolerState]);
        assert_eq!(engine.value(CurrentHeaterCoolerState), Some(&3.into()));

        let off = engine.hub_set(Active, 0.into()).unwrap();
        assert_eq!(engine.value(CurrentHeaterCoolerState), Some(&0.into()));
        assert_eq!(changed(&off), [Active, CurrentHeaterCoolerState]);
    }

    #[test]
    fn should_follow_target_changes_only_while_active() {
        let mut engine = heater_cooler(10);
        engine.hub_set(Active, 1.into()).unwrap();
        assert_eq!(engine.value(CurrentHeaterCoolerState), Some(&1.into()));

        let heat = engine.hub_set(TargetHeaterCoolerState, 1.into()).unwrap();
        assert_eq!(engine.value(CurrentHeaterCoolerState), Some(&2.into()));
        assert_eq!(wire(&heat), ["HeaterCooler:12:setTargetHeaterCoolerState:1:*"]);

        engine.hub_set(Active, 0.into()).unwrap();
        engine.hub_set(TargetHeaterCoolerState, 2.into()).unwrap();
        assert_eq!(engine.value(CurrentHeaterCoolerState), Some(&0.into()));
    }

    #[test]
    fn should_derive_current_state_from_inbound_power_event() {
        let mut engine = heater_cooler(10);
        let on = line(&mut engine, "HeaterCooler:12:eventPowerState:1:*").unwrap();
        assert!(on.outbound.is_empty());
        assert_eq!(changed(&on), [Active, CurrentHeaterCoolerState]);
    }

    #[test]
    fn should_back_derive_target_from_reported_current_state() {
        let mut engine = heater_cooler(10);
        let report = line(&mut engine, "HeaterCooler:12:getCurrentHeaterCoolerState:3:*").unwrap();
        assert_eq!(engine.value(TargetHeaterCoolerState), Some(&2.into()));
        assert_eq!(changed(&report), [CurrentHeaterCoolerState, TargetHeaterCoolerState]);
    }

    #[test]
    fn should_clamp_back_derived_target_to_mode_range() {
        let mut engine = heater_cooler(13);
        line(&mut engine, "HeaterCooler:12:getCurrentHeaterCoolerState:3:*").unwrap();
        assert_eq!(engine.value(TargetHeaterCoolerState), Some(&1.into()));
    }

    #[test]
    fn should_keep_current_consistent_with_clamped_target_while_active() {
        let mut engine = heater_cooler(13);
        engine.hub_set(Active, 1.into()).unwrap();

        let transition = line(&mut engine, "HeaterCooler:12:getCurrentHeaterCoolerState:3:*").unwrap();

        assert_eq!(engine.value(Active), Some(&1.into()));
        assert_eq!(engine.value(TargetHeaterCoolerState), Some(&1.into()));
        assert_eq!(engine.value(CurrentHeaterCoolerState), Some(&2.into()));
        assert_eq!(
            transition.deltas,
            [
                StateDelta {
                    characteristic: CurrentHeaterCoolerState,
                    value: 2.into()
                },
                StateDelta {
                    characteristic: TargetHeaterCoolerState,
                    value: 1.into()
                },
            ]
        );
    }

    #[test]
    fn should_push_nothing_when_clamped_report_lands_on_current_state() {
        let mut engine = heater_cooler(13);
        engine.hub_set(Active, 1.into()).unwrap();
        engine.hub_set(TargetHeaterCoolerState, 1.into()).unwrap();

        let transition = line(&mut engine, "HeaterCooler:12:getCurrentHeaterCoolerState:3:*").unwrap();

        assert_eq!(engine.value(CurrentHeaterCoolerState), Some(&2.into()));
        assert!(transition.deltas.is_empty());
    }

    #[test]
    fn should_keep_target_when_reported_current_state_is_inactive() {
        let mut engine = heater_cooler(10);
        engine.hub_set(TargetHeaterCoolerState, 2.into()).unwrap();
        line(&mut engine, "HeaterCooler:12:getCurrentHeaterCoolerState:2:*").unwrap();
        line(&mut engine, "HeaterCooler:12:getCurrentHeaterCoolerState:0:*").unwrap();
        assert_eq!(engine.value(TargetHeaterCoolerState), Some(&1.into()));
    }

    #[test]
    fn should_reject_target_state_outside_mode_range_without_mutation() {
        let mut engine = heater_cooler(25);
        let before = engine.value(TargetHeaterCoolerState).cloned();

        let err = engine.hub_set(TargetHeaterCoolerState, 0.into()).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidCharacteristicValue { .. }));
        assert_eq!(engine.value(TargetHeaterCoolerState).cloned(), before);
    }

    #[test]
    fn should_start_target_state_at_lowest_allowed_mode() {
        let engine = heater_cooler(2);
        assert_eq!(engine.value(TargetHeaterCoolerState), Some(&1.into()));
    }

    #[test]
    fn should_mirror_setpoints_and_scale_wire_value() {
        let mut engine = heater_cooler(10);

        let set = engine.hub_set(CoolingThresholdTemperature, 22.0.into()).unwrap();
        assert_eq!(wire(&set), ["HeaterCooler:12:setTargetTemperature:220:*"]);
        assert_eq!(changed(&set), [CoolingThresholdTemperature, HeatingThresholdTemperature]);
        for c in [TargetTemperature, CoolingThresholdTemperature, HeatingThresholdTemperature] {
            assert_eq!(engine.value(c), Some(&22.0.into()));
        }
    }

    #[test]
    fn should_unscale_inbound_target_temperature_into_both_thresholds() {
        let mut engine = heater_cooler(10);

        let event = line(&mut engine, "HeaterCooler:12:eventTargetTemperature:245:*").unwrap();
        assert_eq!(changed(&event), [CoolingThresholdTemperature, HeatingThresholdTemperature]);
        assert_eq!(engine.value(HeatingThresholdTemperature), Some(&24.5.into()));
        assert!(event.outbound.is_empty());
    }

    #[test]
    fn should_read_current_temperature_in_degrees() {
        let mut engine = heater_cooler(10);
        line(&mut engine, "HeaterCooler:12:eventCurrentTemperature:215:*").unwrap();
        let (value, _) = engine.hub_get(CurrentTemperature).unwrap();
        assert_eq!(value, 21.5.into());
    }

    #[test]
    fn should_hide_shared_setpoint_from_hub() {
        let mut engine = heater_cooler(10);
        assert!(matches!(
            engine.hub_get(TargetTemperature),
            Err(BridgeError::UnsupportedCharacteristic { .. })
        ));
        assert!(engine.hub_set(TargetTemperature, 20.0.into()).is_err());
    }

    #[test]
    fn should_reject_hub_write_to_read_only_characteristic() {
        let mut engine = heater_cooler(10);
        let err = engine.hub_set(CurrentHeaterCoolerState, 1.into()).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::UnsupportedCharacteristic { access: "write", .. }
        ));
    }

    #[test]
    fn should_clamp_inbound_volume_into_range() {
        let mut engine = television();

        line(&mut engine, "Television:3:eventVolumeState:150:*").unwrap();
        assert_eq!(engine.value(Volume), Some(&100.into()));

        line(&mut engine, "Television:3:getVolumeState:-5:*").unwrap();
        assert_eq!(engine.value(Volume), Some(&0.into()));
    }

    #[test]
    fn should_step_volume_and_saturate_at_bounds() {
        let mut engine = television();
        engine.hub_set(Volume, 100.into()).unwrap();

        let up = engine.hub_set(VolumeSelector, 0.into()).unwrap();
        assert!(up.is_empty());
        assert_eq!(engine.value(Volume), Some(&100.into()));

        let down = engine.hub_set(VolumeSelector, 1.into()).unwrap();
        assert_eq!(wire(&down), ["Television:3:setVolumeState:99:*"]);
        assert_eq!(changed(&down), [Volume]);
    }

    #[test]
    fn should_forward_remote_key_without_storing_it() {
        let mut engine = television();

        let press = engine.hub_set(RemoteKey, 4.into()).unwrap();
        assert_eq!(wire(&press), ["Television:3:setRemoteKey:4:*"]);
        assert!(press.deltas.is_empty());

        let again = engine.hub_set(RemoteKey, 4.into()).unwrap();
        assert_eq!(again.outbound.len(), 1);

        assert!(matches!(
            engine.hub_get(RemoteKey),
            Err(BridgeError::UnsupportedCharacteristic { access: "read", .. })
        ));
    }

    #[test]
    fn should_keep_configured_name_local() {
        let mut engine = television();
        let rename = engine.hub_set(ConfiguredName, "Bedroom TV".into()).unwrap();
        assert!(rename.outbound.is_empty());
        assert_eq!(changed(&rename), [ConfiguredName]);
    }

    #[test]
    fn should_reject_non_integer_inbound_value_without_mutation() {
        let mut engine = television();
        let err = line(&mut engine, "Television:3:eventMuteState:yes:*").unwrap_err();
        assert!(matches!(err, BridgeError::InvalidCharacteristicValue { .. }));
        assert_eq!(engine.value(Mute), Some(&0.into()));
    }

    #[test]
    fn should_reject_inbound_without_value() {
        let mut engine = television();
        assert!(line(&mut engine, "Television:3:getMuteState:*").is_err());
    }

    #[test]
    fn should_refuse_messages_for_other_devices_or_names() {
        let mut engine = television();
        assert!(matches!(
            line(&mut engine, "Television:4:eventMuteState:1:*"),
            Err(BridgeError::UnroutedMessage { .. })
        ));
        assert!(matches!(
            line(&mut engine, "Television:3:eventChannel:5:*"),
            Err(BridgeError::UnroutedMessage { .. })
        ));
    }

    #[test]
    fn should_reject_characteristic_of_other_class() {
        let engine = light();
        assert!(matches!(
            engine.hub_get(Volume),
            Err(BridgeError::UnsupportedCharacteristic { .. })
        ));
    }

    #[test]
    fn should_list_each_refresh_query_once() {
        let queries: Vec<String> = heater_cooler(10)
            .refresh_queries()
            .iter()
            .map(Message::encode)
            .collect();
        assert_eq!(
            queries,
            [
                "HeaterCooler:12:getPowerState:*",
                "HeaterCooler:12:getCurrentHeaterCoolerState:*",
                "HeaterCooler:12:getTargetHeaterCoolerState:*",
                "HeaterCooler:12:getRotationSpeed:*",
                "HeaterCooler:12:getCurrentTemperature:*",
                "HeaterCooler:12:getTargetTemperature:*",
                "HeaterCooler:12:getTemperatureDisplayUnit:*",
            ]
        );
    }

    #[test]
    fn should_snapshot_only_hub_visible_characteristics() {
        let snapshot = heater_cooler(10).snapshot();
        assert_eq!(snapshot.kind, DeviceKind::HeaterCooler);
        assert_eq!(snapshot.value(RotationSpeed), Some(&100.into()));
        assert!(snapshot
            .characteristics
            .iter()
            .all(|view| view.characteristic != TargetTemperature));
    }
}
