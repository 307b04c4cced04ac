use serde::Serialize;

use crate::connection::RegisterValues;
use crate::registers::{FanSpeed, OperationMode, Register};

/// The groups of registers the driver knows how to fetch in one batch.
#[derive(Clone, Copy, PartialEq, Eq, Debug, clap::ValueEnum)]
pub enum SnapshotKind {
    /// Sensor and status values from the input bank.
    Readings,
    /// Actuator states and persisted setpoints from the holding bank.
    Holdings,
    /// The active control settings.
    Settings,
    /// The summarized alarm flags.
    Errors,
}

impl SnapshotKind {
    /// The ordered register list behind this snapshot. The list fully
    /// determines the snapshot's shape.
    pub fn registers(self) -> &'static [Register] {
        match self {
            SnapshotKind::Readings => Readings::REGISTERS,
            SnapshotKind::Holdings => HoldingState::REGISTERS,
            SnapshotKind::Settings => Settings::REGISTERS,
            SnapshotKind::Errors => ErrorFlags::REGISTERS,
        }
    }
}

/// A fetched snapshot of one of the register groups.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Snapshot {
    Readings(Readings),
    Holdings(HoldingState),
    Settings(Settings),
    Errors(ErrorFlags),
}

impl Snapshot {
    /// Decodes the raw words into the typed snapshot for `kind`. Pure: no
    /// I/O, and the same map always produces the same snapshot.
    pub fn build(kind: SnapshotKind, values: &RegisterValues) -> Snapshot {
        match kind {
            SnapshotKind::Readings => Snapshot::Readings(Readings::from_raw(values)),
            SnapshotKind::Holdings => Snapshot::Holdings(HoldingState::from_raw(values)),
            SnapshotKind::Settings => Snapshot::Settings(Settings::from_raw(values)),
            SnapshotKind::Errors => Snapshot::Errors(ErrorFlags::from_raw(values)),
        }
    }
}

// A register missing from the map decodes to the bank's zero value instead of
// failing. A successful batch read always carries every requested register,
// so this only papers over maps built by hand.
fn word(values: &RegisterValues, register: Register) -> u16 {
    values.get(&register).copied().unwrap_or(0)
}

fn signed(values: &RegisterValues, register: Register) -> i16 {
    word(values, register) as i16
}

fn switch(values: &RegisterValues, register: Register) -> bool {
    word(values, register) == 1
}

fn fan(values: &RegisterValues, register: Register) -> FanSpeed {
    FanSpeed(word(values, register))
}

fn mode(values: &RegisterValues, register: Register) -> OperationMode {
    OperationMode(word(values, register))
}

/// Sensor and status snapshot of the unit.
///
/// Every temperature is degrees Celsius multiplied by 100.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Readings {
    pub t0_controller: i16,
    pub t1_intake: i16,
    pub t2_inlet: i16,
    pub t3_exhaust: i16,
    pub t4_outlet: i16,
    pub t5_condenser: i16,
    pub t6_evaporator: i16,
    pub t7_inlet: i16,
    pub t8_outdoor: i16,
    pub t9_heater: i16,
    pub t10_external: i16,
    pub t11_hot_water_top: i16,
    pub t12_hot_water_bottom: i16,
    pub t13_return: i16,
    pub t14_supply: i16,
    pub t15_room: i16,
    pub relative_humidity: i16,
    pub co2: i16,
    pub alarm_status: u16,
    pub alarm_id_1: u16,
    pub alarm_id_2: u16,
    pub alarm_id_3: u16,
    pub control_run_active: bool,
    pub control_mode_active: OperationMode,
    pub control_state: u16,
    pub control_seconds_in_state: u16,
    pub vent_active: FanSpeed,
    pub inlet_active: u16,
    pub exhaust_active: u16,
    pub days_since_filter_change: u16,
    pub days_to_filter_change: u16,
    pub is_summer: bool,
    pub temperature_set: i16,
    pub temp_control: i16,
    pub temp_room: i16,
    pub efficiency: i16,
    pub requested_capacity: i16,
    pub actual_capacity: i16,
    pub hot_water_type: u16,
    pub hot_water_anode_state: u16,
    pub display_led_1: u16,
    pub display_led_2: u16,
    pub heat_external_set: i16,
}

impl Readings {
    pub const REGISTERS: &'static [Register] = &[
        Register::T0Controller,
        Register::T1Intake,
        Register::T2Inlet,
        Register::T3Exhaust,
        Register::T4Outlet,
        Register::T5Condenser,
        Register::T6Evaporator,
        Register::T7Inlet,
        Register::T8Outdoor,
        Register::T9Heater,
        Register::T10External,
        Register::T11HotWaterTop,
        Register::T12HotWaterBottom,
        Register::T13Return,
        Register::T14Supply,
        Register::T15Room,
        Register::RelativeHumidity,
        Register::Co2,
        Register::AlarmStatus,
        Register::AlarmId1,
        Register::AlarmId2,
        Register::AlarmId3,
        Register::ControlRunActive,
        Register::ControlModeActive,
        Register::ControlState,
        Register::ControlSecondsInState,
        Register::VentActive,
        Register::InletActive,
        Register::ExhaustActive,
        Register::DaysSinceFilterChange,
        Register::DaysToFilterChange,
        Register::IsSummer,
        Register::TemperatureSet,
        Register::TempControl,
        Register::TempRoom,
        Register::Efficiency,
        Register::RequestedCapacity,
        Register::ActualCapacity,
        Register::HotWaterType,
        Register::HotWaterAnodeState,
        Register::DisplayLed1,
        Register::DisplayLed2,
        Register::HeatExternalSet,
    ];

    pub fn from_raw(values: &RegisterValues) -> Self {
        Self {
            t0_controller: signed(values, Register::T0Controller),
            t1_intake: signed(values, Register::T1Intake),
            t2_inlet: signed(values, Register::T2Inlet),
            t3_exhaust: signed(values, Register::T3Exhaust),
            t4_outlet: signed(values, Register::T4Outlet),
            t5_condenser: signed(values, Register::T5Condenser),
            t6_evaporator: signed(values, Register::T6Evaporator),
            t7_inlet: signed(values, Register::T7Inlet),
            t8_outdoor: signed(values, Register::T8Outdoor),
            t9_heater: signed(values, Register::T9Heater),
            t10_external: signed(values, Register::T10External),
            t11_hot_water_top: signed(values, Register::T11HotWaterTop),
            t12_hot_water_bottom: signed(values, Register::T12HotWaterBottom),
            t13_return: signed(values, Register::T13Return),
            t14_supply: signed(values, Register::T14Supply),
            t15_room: signed(values, Register::T15Room),
            relative_humidity: signed(values, Register::RelativeHumidity),
            co2: signed(values, Register::Co2),
            alarm_status: word(values, Register::AlarmStatus),
            alarm_id_1: word(values, Register::AlarmId1),
            alarm_id_2: word(values, Register::AlarmId2),
            alarm_id_3: word(values, Register::AlarmId3),
            control_run_active: switch(values, Register::ControlRunActive),
            control_mode_active: mode(values, Register::ControlModeActive),
            control_state: word(values, Register::ControlState),
            control_seconds_in_state: word(values, Register::ControlSecondsInState),
            vent_active: fan(values, Register::VentActive),
            inlet_active: word(values, Register::InletActive),
            exhaust_active: word(values, Register::ExhaustActive),
            days_since_filter_change: word(values, Register::DaysSinceFilterChange),
            days_to_filter_change: word(values, Register::DaysToFilterChange),
            is_summer: switch(values, Register::IsSummer),
            temperature_set: signed(values, Register::TemperatureSet),
            temp_control: signed(values, Register::TempControl),
            temp_room: signed(values, Register::TempRoom),
            efficiency: signed(values, Register::Efficiency),
            requested_capacity: signed(values, Register::RequestedCapacity),
            actual_capacity: signed(values, Register::ActualCapacity),
            hot_water_type: word(values, Register::HotWaterType),
            hot_water_anode_state: word(values, Register::HotWaterAnodeState),
            display_led_1: word(values, Register::DisplayLed1),
            display_led_2: word(values, Register::DisplayLed2),
            heat_external_set: signed(values, Register::HeatExternalSet),
        }
    }
}

/// Snapshot of the whole holding bank: actuator states and persisted
/// setpoints. Temperatures are degrees Celsius multiplied by 100.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HoldingState {
    pub compressor: u16,
    pub water_heat: u16,
    pub central_circ_pump: u16,
    pub central_heat_1: u16,
    pub central_heat_2: u16,
    pub central_heat_3: u16,
    pub central_heat_external: u16,
    pub defrosting: bool,
    pub exhaust_fan_speed: u16,
    pub inlet_fan_speed: u16,
    pub air_heat_capacity: u16,
    pub central_heat_capacity: u16,
    pub compressor_capacity: u16,
    pub control_run_set: bool,
    pub control_mode_set: OperationMode,
    pub control_vent_set: FanSpeed,
    pub control_temp_set: i16,
    pub cool_vent_set: FanSpeed,
    pub cool_temp_set: i16,
    pub summer_temp_min: i16,
    pub winter_temp_min: i16,
    pub summer_temp_max: i16,
    pub winter_temp_max: i16,
    pub summer_temp_limit: i16,
    pub hot_water_electric_set: i16,
    pub hot_water_compressor_set: i16,
}

impl HoldingState {
    pub const REGISTERS: &'static [Register] = &[
        Register::Compressor,
        Register::WaterHeat,
        Register::CentralCircPump,
        Register::CentralHeat1,
        Register::CentralHeat2,
        Register::CentralHeat3,
        Register::CentralHeatExternal,
        Register::Defrosting,
        Register::ExhaustFanSpeed,
        Register::InletFanSpeed,
        Register::AirHeatCapacity,
        Register::CentralHeatCapacity,
        Register::CompressorCapacity,
        Register::ControlRunSet,
        Register::ControlModeSet,
        Register::ControlVentSet,
        Register::ControlTempSet,
        Register::CoolVentSet,
        Register::CoolTempSet,
        Register::SummerTempMin,
        Register::WinterTempMin,
        Register::SummerTempMax,
        Register::WinterTempMax,
        Register::SummerTempLimit,
        Register::HotWaterElectricSet,
        Register::HotWaterCompressorSet,
    ];

    pub fn from_raw(values: &RegisterValues) -> Self {
        Self {
            compressor: word(values, Register::Compressor),
            water_heat: word(values, Register::WaterHeat),
            central_circ_pump: word(values, Register::CentralCircPump),
            central_heat_1: word(values, Register::CentralHeat1),
            central_heat_2: word(values, Register::CentralHeat2),
            central_heat_3: word(values, Register::CentralHeat3),
            central_heat_external: word(values, Register::CentralHeatExternal),
            defrosting: switch(values, Register::Defrosting),
            exhaust_fan_speed: word(values, Register::ExhaustFanSpeed),
            inlet_fan_speed: word(values, Register::InletFanSpeed),
            air_heat_capacity: word(values, Register::AirHeatCapacity),
            central_heat_capacity: word(values, Register::CentralHeatCapacity),
            compressor_capacity: word(values, Register::CompressorCapacity),
            control_run_set: switch(values, Register::ControlRunSet),
            control_mode_set: mode(values, Register::ControlModeSet),
            control_vent_set: fan(values, Register::ControlVentSet),
            control_temp_set: signed(values, Register::ControlTempSet),
            cool_vent_set: fan(values, Register::CoolVentSet),
            cool_temp_set: signed(values, Register::CoolTempSet),
            summer_temp_min: signed(values, Register::SummerTempMin),
            winter_temp_min: signed(values, Register::WinterTempMin),
            summer_temp_max: signed(values, Register::SummerTempMax),
            winter_temp_max: signed(values, Register::WinterTempMax),
            summer_temp_limit: signed(values, Register::SummerTempLimit),
            hot_water_electric_set: signed(values, Register::HotWaterElectricSet),
            hot_water_compressor_set: signed(values, Register::HotWaterCompressorSet),
        }
    }
}

/// The active control settings of the unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Whether the unit is requested to run at all.
    pub run: bool,
    pub mode: OperationMode,
    pub fan_speed: FanSpeed,
    /// Requested temperature, degrees Celsius multiplied by 100. The unit
    /// accepts 5.00 through 40.00 degrees.
    pub requested_temperature: i16,
    /// Ventilation step used while actively cooling.
    pub cool_vent: FanSpeed,
    /// Cooling setpoint, degrees Celsius multiplied by 100.
    pub cool_temperature: i16,
}

impl Settings {
    pub const REGISTERS: &'static [Register] = &[
        Register::ControlRunSet,
        Register::ControlModeSet,
        Register::ControlVentSet,
        Register::ControlTempSet,
        Register::CoolVentSet,
        Register::CoolTempSet,
    ];

    pub fn from_raw(values: &RegisterValues) -> Self {
        Self {
            run: switch(values, Register::ControlRunSet),
            mode: mode(values, Register::ControlModeSet),
            fan_speed: fan(values, Register::ControlVentSet),
            requested_temperature: signed(values, Register::ControlTempSet),
            cool_vent: fan(values, Register::CoolVentSet),
            cool_temperature: signed(values, Register::CoolTempSet),
        }
    }
}

/// Summarized alarm state of the unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorFlags {
    /// The air filter is due for replacement.
    pub old_filter_warning: bool,
    /// Any other protection or alarm condition that needs to be looked at.
    pub other_errors: bool,
}

impl ErrorFlags {
    pub const REGISTERS: &'static [Register] = &[
        Register::AirFilter,
        Register::DoorOpen,
        Register::FireSmoke,
        Register::FrostOverHeat,
        Register::HighPressure,
        Register::BoilWater,
        Register::Defrost,
    ];

    pub fn from_raw(values: &RegisterValues) -> Self {
        // The door switch is reported by the unit but does not count as an
        // error condition here.
        let other_errors = switch(values, Register::FireSmoke)
            || switch(values, Register::FrostOverHeat)
            || switch(values, Register::HighPressure)
            || switch(values, Register::BoilWater)
            || switch(values, Register::Defrost);
        Self {
            old_filter_warning: switch(values, Register::AirFilter),
            other_errors,
        }
    }
}

/// A sparse settings update: only the fields that are present get written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettingsChange {
    pub run: Option<bool>,
    pub mode: Option<OperationMode>,
    pub fan_speed: Option<FanSpeed>,
    /// Degrees Celsius multiplied by 100.
    pub requested_temperature: Option<i16>,
    pub cool_vent: Option<FanSpeed>,
    /// Degrees Celsius multiplied by 100.
    pub cool_temperature: Option<i16>,
}

impl SettingsChange {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The register writes this change amounts to, keyed (and therefore
    /// written) in ascending register order.
    pub fn to_register_values(&self) -> RegisterValues {
        let mut values = RegisterValues::new();
        if let Some(run) = self.run {
            values.insert(Register::ControlRunSet, run as u16);
        }
        if let Some(mode) = self.mode {
            values.insert(Register::ControlModeSet, mode.0);
        }
        if let Some(fan_speed) = self.fan_speed {
            values.insert(Register::ControlVentSet, fan_speed.0);
        }
        if let Some(temperature) = self.requested_temperature {
            values.insert(Register::ControlTempSet, temperature as u16);
        }
        if let Some(cool_vent) = self.cool_vent {
            values.insert(Register::CoolVentSet, cool_vent.0);
        }
        if let Some(cool_temperature) = self.cool_temperature {
            values.insert(Register::CoolTempSet, cool_temperature as u16);
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_lists_stay_within_their_bank() {
        use crate::registers::Bank;
        for register in Readings::REGISTERS.iter().chain(ErrorFlags::REGISTERS) {
            assert_eq!(register.bank(), Bank::Input, "{}", register.name());
        }
        for register in HoldingState::REGISTERS.iter().chain(Settings::REGISTERS) {
            assert_eq!(register.bank(), Bank::Holding, "{}", register.name());
        }
    }

    #[test]
    fn register_lists_have_no_duplicates() {
        for kind in [
            SnapshotKind::Readings,
            SnapshotKind::Holdings,
            SnapshotKind::Settings,
            SnapshotKind::Errors,
        ] {
            let registers = kind.registers();
            let unique: std::collections::BTreeSet<_> = registers.iter().collect();
            assert_eq!(unique.len(), registers.len(), "{kind:?}");
        }
    }

    #[test]
    fn filter_warning_sets_only_the_filter_flag() {
        let values = RegisterValues::from([
            (Register::AirFilter, 1),
            (Register::FireSmoke, 0),
            (Register::FrostOverHeat, 0),
            (Register::HighPressure, 0),
            (Register::BoilWater, 0),
            (Register::Defrost, 0),
        ]);
        let flags = ErrorFlags::from_raw(&values);
        assert!(flags.old_filter_warning);
        assert!(!flags.other_errors);
    }

    #[test]
    fn open_door_is_not_an_error() {
        let values = RegisterValues::from([(Register::DoorOpen, 1)]);
        let flags = ErrorFlags::from_raw(&values);
        assert!(!flags.old_filter_warning);
        assert!(!flags.other_errors);
    }

    #[test]
    fn any_tripped_protection_raises_other_errors() {
        for register in [
            Register::FireSmoke,
            Register::FrostOverHeat,
            Register::HighPressure,
            Register::BoilWater,
            Register::Defrost,
        ] {
            let values = RegisterValues::from([(register, 1)]);
            assert!(ErrorFlags::from_raw(&values).other_errors, "{}", register.name());
        }
    }

    #[test]
    fn building_twice_from_the_same_map_is_identical() {
        let values = RegisterValues::from([
            (Register::T8Outdoor, 0xFF38),
            (Register::ControlModeActive, 1),
            (Register::VentActive, 2),
            (Register::ControlRunActive, 1),
        ]);
        for kind in [SnapshotKind::Readings, SnapshotKind::Errors] {
            assert_eq!(Snapshot::build(kind, &values), Snapshot::build(kind, &values));
        }
    }

    #[test]
    fn readings_decode_signed_and_enumerated_fields() {
        let values = RegisterValues::from([
            (Register::T8Outdoor, 0xFF38),
            (Register::TemperatureSet, 2050),
            (Register::ControlRunActive, 1),
            (Register::ControlModeActive, 1),
            (Register::VentActive, 4),
        ]);
        let readings = Readings::from_raw(&values);
        assert_eq!(readings.t8_outdoor, -200);
        assert_eq!(readings.temperature_set, 2050);
        assert!(readings.control_run_active);
        assert_eq!(readings.control_mode_active, OperationMode::HEAT);
        assert_eq!(readings.vent_active, FanSpeed::VERY_HIGH);
    }

    #[test]
    fn missing_registers_decode_to_zero() {
        let readings = Readings::from_raw(&RegisterValues::new());
        assert_eq!(readings.t0_controller, 0);
        assert_eq!(readings.vent_active, FanSpeed::OFF);
        assert!(!readings.control_run_active);
        let settings = Settings::from_raw(&RegisterValues::new());
        assert_eq!(settings.mode, OperationMode::OFF);
        assert_eq!(settings.requested_temperature, 0);
    }

    #[test]
    fn settings_change_encodes_to_the_expected_writes() {
        let change = SettingsChange {
            run: Some(true),
            mode: Some(OperationMode::HEAT),
            fan_speed: Some(FanSpeed::HIGH),
            requested_temperature: Some(-200),
            ..SettingsChange::default()
        };
        let values = change.to_register_values();
        assert_eq!(values[&Register::ControlRunSet], 1);
        assert_eq!(values[&Register::ControlModeSet], 1);
        assert_eq!(values[&Register::ControlVentSet], 3);
        assert_eq!(values[&Register::ControlTempSet], 0xFF38);
        assert_eq!(values.len(), 4);
    }

    #[test]
    fn empty_settings_change_produces_no_writes() {
        let change = SettingsChange::default();
        assert!(change.is_empty());
        assert!(change.to_register_values().is_empty());
    }

    #[test]
    fn settings_decode_out_of_range_ordinals_without_failing() {
        let values = RegisterValues::from([
            (Register::ControlVentSet, 9),
            (Register::ControlModeSet, 7),
        ]);
        let settings = Settings::from_raw(&values);
        assert_eq!(settings.fan_speed, FanSpeed(9));
        assert_eq!(settings.mode, OperationMode(7));
    }
}
