pub mod registers {
    use crate::output;
    use crate::registers::{Bank, DataType, Register};

    /// Search and output the known registers of the unit.
    #[derive(clap::Parser)]
    pub struct Args {
        #[clap(flatten)]
        output: output::Args,
        /// Only show registers whose name, address or description contains
        /// this string.
        filter: Option<String>,
    }

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error(transparent)]
        Output(#[from] output::Error),
    }

    #[derive(serde::Serialize)]
    pub struct RegisterSchema {
        pub bank: Bank,
        pub address: u16,
        pub name: &'static str,
        pub data_type: DataType,
        pub signed: bool,
        pub scale: u16,
        pub description: &'static str,
    }

    impl RegisterSchema {
        pub fn new(register: Register) -> Self {
            let data_type = register.data_type();
            Self {
                bank: register.bank(),
                address: register.address(),
                name: register.name(),
                data_type,
                signed: data_type.is_signed(),
                scale: data_type.scale(),
                description: register.description(),
            }
        }

        pub fn is_match(&self, pattern: &str) -> bool {
            let pattern = pattern.to_uppercase();
            if self.name.contains(&pattern) {
                return true;
            }
            if self.description.to_uppercase().contains(&pattern) {
                return true;
            }
            self.address.to_string().contains(&pattern)
        }
    }

    pub fn run(args: Args) -> Result<(), Error> {
        let Args { output, filter } = args;
        let mut output = output.to_output()?;
        output.table_headers(vec![
            "Bank",
            "Address",
            "Name",
            "Type",
            "Scale",
            "Description",
        ])?;
        for &register in Register::ALL {
            let schema = RegisterSchema::new(register);
            if let Some(pattern) = &filter {
                if !schema.is_match(pattern) {
                    continue;
                }
            }
            output.result(
                || {
                    vec![
                        schema.bank.to_string(),
                        schema.address.to_string(),
                        schema.name.to_string(),
                        format!("{:?}", schema.data_type).to_lowercase(),
                        schema.scale.to_string(),
                        schema.description.to_string(),
                    ]
                },
                || &schema,
            )?;
        }
        output.commit()?;
        Ok(())
    }
}

pub mod read {
    use crate::connection;
    use crate::device::Device;
    use crate::output;
    use crate::registers::{Bank, Register, Value};

    /// Read registers by name or address within one session.
    #[derive(clap::Parser)]
    pub struct Args {
        #[clap(flatten)]
        connection: connection::Args,
        #[clap(flatten)]
        output: output::Args,
        /// Registers to read: catalog names (`T8_OUTDOOR`) or `bank:address`
        /// pairs (`input:208`).
        #[arg(required = true)]
        registers: Vec<String>,
    }

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error("`{0}` does not name a known register")]
        UnknownRegister(String),
        #[error(transparent)]
        Connection(#[from] connection::Error),
        #[error(transparent)]
        Output(#[from] output::Error),
    }

    #[derive(serde::Serialize)]
    struct ReadRecord {
        register: &'static str,
        bank: Bank,
        address: u16,
        raw: u16,
        value: Value,
    }

    pub(super) fn resolve(spec: &str) -> Option<Register> {
        if let Some(register) = Register::from_name(spec) {
            return Some(register);
        }
        let (bank, address) = spec.split_once(':')?;
        let bank = match bank {
            "input" => Bank::Input,
            "holding" => Bank::Holding,
            _ => return None,
        };
        Register::from_address(bank, address.parse().ok()?)
    }

    pub fn run(args: Args) -> Result<(), Error> {
        let Args { connection, output, registers } = args;
        let registers = registers
            .iter()
            .map(|spec| resolve(spec).ok_or_else(|| Error::UnknownRegister(spec.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        let device = Device::new(connection.to_config());
        let values = device.read_registers(&registers)?;
        let mut output = output.to_output()?;
        output.table_headers(vec!["Bank", "Address", "Name", "Raw", "Value"])?;
        for register in registers {
            let raw = values[&register];
            let value = register.data_type().decode(raw);
            output.result(
                || {
                    vec![
                        register.bank().to_string(),
                        register.address().to_string(),
                        register.name().to_string(),
                        raw.to_string(),
                        value.to_string(),
                    ]
                },
                || ReadRecord {
                    register: register.name(),
                    bank: register.bank(),
                    address: register.address(),
                    raw,
                    value,
                },
            )?;
        }
        output.commit()?;
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn register_specs_resolve_by_name_and_address() {
            assert_eq!(resolve("T8_OUTDOOR"), Some(Register::T8Outdoor));
            assert_eq!(resolve("input:208"), Some(Register::T8Outdoor));
            assert_eq!(resolve("holding:200"), Some(Register::ExhaustFanSpeed));
            assert_eq!(resolve("register:200"), None);
            assert_eq!(resolve("208"), None);
        }
    }
}

pub mod write {
    use crate::connection;
    use crate::device::Device;
    use crate::registers::ParseValueError;
    use tracing::info;

    /// Write a value to a single holding register.
    #[derive(clap::Parser)]
    pub struct Args {
        #[clap(flatten)]
        connection: connection::Args,
        /// The register to write: a catalog name or a `holding:address` pair.
        register: String,
        /// The value, in the register's own terms (`20.5` for temperatures,
        /// `high` or `3` for fan steps, `on` for switches).
        value: String,
    }

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error("`{0}` does not name a known register")]
        UnknownRegister(String),
        #[error("could not interpret the value to write")]
        BadValue(#[from] ParseValueError),
        #[error(transparent)]
        Connection(#[from] connection::Error),
    }

    pub fn run(args: Args) -> Result<(), Error> {
        let register = super::read::resolve(&args.register)
            .ok_or_else(|| Error::UnknownRegister(args.register.clone()))?;
        let word = register.data_type().parse(&args.value)?;
        let device = Device::new(args.connection.to_config());
        device.write_register(register, word)?;
        info!(message = "written", register = register.name(), word);
        Ok(())
    }
}

pub mod fetch {
    use crate::connection;
    use crate::device::Device;
    use crate::output;
    use crate::registers::Value;
    use crate::snapshots::SnapshotKind;

    /// Fetch one of the register groups and print the decoded values.
    #[derive(clap::Parser)]
    pub struct Args {
        #[clap(flatten)]
        connection: connection::Args,
        #[clap(flatten)]
        output: output::Args,
        /// Which group of registers to fetch.
        #[arg(value_enum)]
        kind: SnapshotKind,
    }

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error(transparent)]
        Connection(#[from] connection::Error),
        #[error(transparent)]
        Output(#[from] output::Error),
    }

    #[derive(serde::Serialize)]
    struct FetchRecord {
        register: &'static str,
        address: u16,
        value: Value,
    }

    pub fn run(args: Args) -> Result<(), Error> {
        let Args { connection, output, kind } = args;
        let device = Device::new(connection.to_config());
        let values = device.fetch(kind)?;
        let mut output = output.to_output()?;
        output.table_headers(vec!["Register", "Address", "Value"])?;
        for &register in kind.registers() {
            let value = register.data_type().decode(values[&register]);
            output.result(
                || {
                    vec![
                        register.name().to_string(),
                        register.address().to_string(),
                        value.to_string(),
                    ]
                },
                || FetchRecord {
                    register: register.name(),
                    address: register.address(),
                    value,
                },
            )?;
        }
        output.commit()?;
        Ok(())
    }
}

pub mod set {
    use crate::connection;
    use crate::device::Device;
    use crate::registers::{FanSpeed, OperationMode};
    use crate::snapshots::SettingsChange;
    use tracing::info;

    /// Change the active control settings of the unit.
    ///
    /// Only the settings given on the command line are written; the rest are
    /// left as they are. Writes are not read back for verification.
    #[derive(clap::Parser)]
    pub struct Args {
        #[clap(flatten)]
        connection: connection::Args,

        /// Turn the unit on or off.
        #[arg(long, value_parser = switch_value)]
        run: Option<bool>,

        /// Operation mode: off, heat, cool, auto or service.
        #[arg(long)]
        mode: Option<OperationMode>,

        /// Ventilation step: off, low, normal, high or very-high (0 to 4).
        #[arg(long)]
        fan_speed: Option<FanSpeed>,

        /// Requested temperature in degrees Celsius, e.g. `20.5`. The unit
        /// accepts 5 through 40 degrees.
        #[arg(long)]
        temperature: Option<f32>,

        /// Ventilation step to use while actively cooling.
        #[arg(long)]
        cool_vent: Option<FanSpeed>,

        /// Cooling setpoint in degrees Celsius.
        #[arg(long)]
        cool_temperature: Option<f32>,
    }

    fn switch_value(input: &str) -> Result<bool, String> {
        match input {
            "on" | "1" | "true" => Ok(true),
            "off" | "0" | "false" => Ok(false),
            other => Err(format!("`{other}` is not `on` or `off`")),
        }
    }

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error("no settings given, nothing to write")]
        NothingToDo,
        #[error("{0} degrees cannot be represented on the wire")]
        TemperatureRange(f32),
        #[error(transparent)]
        Connection(#[from] connection::Error),
    }

    fn scaled(celsius: f32) -> Result<i16, Error> {
        let scaled = (celsius * 100.0).round();
        if !(f32::from(i16::MIN)..=f32::from(i16::MAX)).contains(&scaled) {
            return Err(Error::TemperatureRange(celsius));
        }
        Ok(scaled as i16)
    }

    pub fn run(args: Args) -> Result<(), Error> {
        let change = SettingsChange {
            run: args.run,
            mode: args.mode,
            fan_speed: args.fan_speed,
            requested_temperature: args.temperature.map(scaled).transpose()?,
            cool_vent: args.cool_vent,
            cool_temperature: args.cool_temperature.map(scaled).transpose()?,
        };
        if change.is_empty() {
            return Err(Error::NothingToDo);
        }
        let device = Device::new(args.connection.to_config());
        device.apply(&change)?;
        info!(message = "settings applied", writes = change.to_register_values().len());
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn temperatures_scale_to_wire_words() {
            assert_eq!(scaled(20.5).unwrap(), 2050);
            assert_eq!(scaled(-2.0).unwrap(), -200);
            assert!(matches!(scaled(400.0), Err(Error::TemperatureRange(_))));
        }
    }
}
