use std::collections::BTreeMap;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use tokio_modbus::Slave;
use tokio_modbus::client::sync::{self, Context};
use tokio_modbus::prelude::{SyncReader, SyncWriter};
use tracing::{debug, info};

use crate::registers::{Bank, Register};

// The line parameters of the CTS bus port are fixed on the device side; only
// the link address, unit id and timeout are configurable.
pub const BAUD_RATE: u32 = 19_200;
pub const UNIT_ID: u8 = 30;
pub const DEFAULT_ADDRESS: &str = "/dev/ttyUSB1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Raw words keyed by register, as returned by a batch read. Built fresh for
/// every fetch and discarded once decoded.
pub type RegisterValues = BTreeMap<Register, u16>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("lookup of `{1}` failed")]
    LookupHost(#[source] std::io::Error, String),
    #[error("could not connect to `{1}` over TCP")]
    Connect(#[source] std::io::Error, String),
    #[error("could not open the serial device at `{1}`")]
    OpenSerial(#[source] std::io::Error, String),
    #[error("modbus request failed in transit")]
    Transport(#[source] tokio_modbus::Error),
    #[error("device responded with modbus exception {0:?}")]
    Exception(tokio_modbus::ExceptionCode),
    #[error("response for register `{register}` carried {actual} words, expected {expected}")]
    PayloadLength {
        register: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("register `{0}` is in the input bank and cannot be written")]
    ReadOnly(&'static str),
}

#[derive(clap::Parser, Clone)]
#[group(id = "connection::Args")]
pub struct Args {
    /// Address of the unit: `host:port` for Modbus TCP or a serial device
    /// path for Modbus RTU.
    #[arg(long, short = 'a', env = "NILAN_ADDRESS", default_value = DEFAULT_ADDRESS)]
    address: String,

    /// The modbus unit (slave) identifier of the device.
    #[arg(long, short = 'i', default_value_t = UNIT_ID)]
    unit_id: u8,

    /// Give up on connecting or on an outstanding request after this amount
    /// of time.
    #[arg(long, default_value = "10s")]
    timeout: humantime::Duration,
}

impl Args {
    pub fn to_config(&self) -> Config {
        Config {
            address: self.address.clone(),
            unit_id: self.unit_id,
            timeout: *self.timeout,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub address: String,
    pub unit_id: u8,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            unit_id: UNIT_ID,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Configuration for the given link address with the factory-default unit
    /// id and timeout.
    pub fn new(address: impl Into<String>) -> Self {
        Self { address: address.into(), ..Self::default() }
    }
}

/// The transport seam. Everything above this trait deals in catalog registers
/// and raw words; framing, checksums and byte-level retries belong below it.
///
/// The single-register operations are deliberate: the unit does not handle
/// multi-register requests spanning non-contiguous addresses, so batches are
/// issued one register at a time in the order given.
pub trait RegisterIo {
    fn read_registers(&mut self, bank: Bank, address: u16, count: u16) -> Result<Vec<u16>, Error>;
    fn write_register(&mut self, address: u16, value: u16) -> Result<(), Error>;

    fn read_one(&mut self, register: Register) -> Result<u16, Error> {
        let words = self.read_registers(register.bank(), register.address(), 1)?;
        match words[..] {
            [word] => Ok(word),
            _ => Err(Error::PayloadLength {
                register: register.name(),
                expected: 1,
                actual: words.len(),
            }),
        }
    }

    /// Reads every register in `registers`, in order, one request each. The
    /// first failure aborts the batch; no partial map is ever returned.
    fn read_many(&mut self, registers: &[Register]) -> Result<RegisterValues, Error> {
        let mut values = RegisterValues::new();
        for &register in registers {
            values.insert(register, self.read_one(register)?);
        }
        Ok(values)
    }

    fn write_one(&mut self, register: Register, value: u16) -> Result<(), Error> {
        if !register.bank().is_writable() {
            return Err(Error::ReadOnly(register.name()));
        }
        self.write_register(register.address(), value)
    }

    /// Writes registers in ascending (bank, address) order. The first failure
    /// aborts the remainder; registers already written stay written.
    fn write_many(&mut self, values: &RegisterValues) -> Result<(), Error> {
        for (&register, &value) in values {
            self.write_one(register, value)?;
        }
        Ok(())
    }
}

/// An open session against one unit.
///
/// A session serves at most one logical fetch or write operation and is
/// released when the value is dropped, on every exit path. Sessions are never
/// pooled or reused: a failed or hung link can at worst take its own call
/// down with it.
pub struct Connection {
    context: Context,
}

impl Connection {
    pub fn open(config: &Config) -> Result<Connection, Error> {
        let slave = Slave(config.unit_id);
        let mut context = match resolve_tcp(&config.address)? {
            Some(socket) => {
                info!(message = "connecting", address = %config.address, unit = config.unit_id);
                sync::tcp::connect_slave(socket, slave)
                    .map_err(|e| Error::Connect(e, config.address.clone()))?
            }
            None => {
                info!(
                    message = "opening serial device",
                    device = %config.address,
                    unit = config.unit_id
                );
                let builder = tokio_serial::new(config.address.as_str(), BAUD_RATE)
                    .data_bits(tokio_serial::DataBits::Eight)
                    .parity(tokio_serial::Parity::Even)
                    .stop_bits(tokio_serial::StopBits::One);
                sync::rtu::connect_slave(&builder, slave)
                    .map_err(|e| Error::OpenSerial(e, config.address.clone()))?
            }
        };
        context.set_timeout(Some(config.timeout));
        Ok(Connection { context })
    }
}

impl RegisterIo for Connection {
    fn read_registers(&mut self, bank: Bank, address: u16, count: u16) -> Result<Vec<u16>, Error> {
        debug!(message = "reading", bank = %bank, address, count);
        flatten(match bank {
            Bank::Input => self.context.read_input_registers(address, count),
            Bank::Holding => self.context.read_holding_registers(address, count),
        })
    }

    fn write_register(&mut self, address: u16, value: u16) -> Result<(), Error> {
        debug!(message = "writing", address, value);
        flatten(self.context.write_single_register(address, value))
    }
}

/// An address that parses as `host:port` selects Modbus TCP; anything without
/// a port is taken to be a serial device path.
fn resolve_tcp(address: &str) -> Result<Option<SocketAddr>, Error> {
    if let Ok(socket) = address.parse() {
        return Ok(Some(socket));
    }
    if !address.contains(':') {
        return Ok(None);
    }
    let mut resolved = address
        .to_socket_addrs()
        .map_err(|e| Error::LookupHost(e, address.to_string()))?;
    match resolved.next() {
        Some(socket) => Ok(Some(socket)),
        None => Err(Error::LookupHost(
            std::io::Error::new(std::io::ErrorKind::NotFound, "resolved to no addresses"),
            address.to_string(),
        )),
    }
}

fn flatten<T>(response: tokio_modbus::Result<T>) -> Result<T, Error> {
    match response {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(exception)) => Err(Error::Exception(exception)),
        Err(error) => Err(Error::Transport(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::Register;

    /// Records every transport call and fails the nth read or write on cue.
    #[derive(Default)]
    struct ScriptedIo {
        reads: Vec<(Bank, u16, u16)>,
        writes: Vec<(u16, u16)>,
        fail_read_at: Option<usize>,
        fail_write_at: Option<usize>,
        words_per_response: usize,
    }

    impl ScriptedIo {
        fn new() -> Self {
            Self { words_per_response: 1, ..Self::default() }
        }

        fn scripted_failure() -> Error {
            Error::Transport(tokio_modbus::Error::Transport(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "scripted failure",
            )))
        }
    }

    impl RegisterIo for ScriptedIo {
        fn read_registers(
            &mut self,
            bank: Bank,
            address: u16,
            count: u16,
        ) -> Result<Vec<u16>, Error> {
            if self.fail_read_at == Some(self.reads.len()) {
                self.reads.push((bank, address, count));
                return Err(Self::scripted_failure());
            }
            self.reads.push((bank, address, count));
            Ok(vec![0x0001; self.words_per_response])
        }

        fn write_register(&mut self, address: u16, value: u16) -> Result<(), Error> {
            if self.fail_write_at == Some(self.writes.len()) {
                return Err(Self::scripted_failure());
            }
            self.writes.push((address, value));
            Ok(())
        }
    }

    const BATCH: &[Register] = &[
        Register::T0Controller,
        Register::T8Outdoor,
        Register::RelativeHumidity,
    ];

    #[test]
    fn read_many_issues_one_read_per_register_in_order() {
        let mut io = ScriptedIo::new();
        let values = io.read_many(BATCH).unwrap();
        assert_eq!(
            io.reads,
            vec![
                (Bank::Input, 200, 1),
                (Bank::Input, 208, 1),
                (Bank::Input, 221, 1),
            ]
        );
        assert_eq!(values.len(), BATCH.len());
        assert_eq!(values[&Register::T8Outdoor], 0x0001);
    }

    #[test]
    fn read_many_returns_nothing_when_a_read_fails_midway() {
        let mut io = ScriptedIo::new();
        io.fail_read_at = Some(1);
        let result = io.read_many(BATCH);
        assert!(matches!(result, Err(Error::Transport(_))));
        // The first read went out, the second failed, the third was never
        // attempted.
        assert_eq!(io.reads.len(), 2);
    }

    #[test]
    fn read_one_rejects_responses_of_the_wrong_length() {
        let mut io = ScriptedIo::new();
        io.words_per_response = 2;
        let result = io.read_one(Register::T0Controller);
        assert!(matches!(
            result,
            Err(Error::PayloadLength { expected: 1, actual: 2, .. })
        ));
    }

    #[test]
    fn writes_to_the_input_bank_fail_before_any_transport_call() {
        let mut io = ScriptedIo::new();
        let result = io.write_one(Register::T0Controller, 2050);
        assert!(matches!(result, Err(Error::ReadOnly("T0_CONTROLLER"))));
        assert!(io.writes.is_empty());
    }

    #[test]
    fn write_many_goes_out_in_address_order() {
        let mut io = ScriptedIo::new();
        let values = RegisterValues::from([
            (Register::ControlVentSet, 3),
            (Register::ControlRunSet, 1),
            (Register::ControlModeSet, 1),
        ]);
        io.write_many(&values).unwrap();
        assert_eq!(io.writes, vec![(1001, 1), (1002, 1), (1003, 3)]);
    }

    #[test]
    fn write_many_aborts_after_the_first_failure_without_rollback() {
        let mut io = ScriptedIo::new();
        io.fail_write_at = Some(1);
        let values = RegisterValues::from([
            (Register::ControlRunSet, 1),
            (Register::ControlModeSet, 1),
            (Register::ControlVentSet, 3),
        ]);
        let result = io.write_many(&values);
        assert!(matches!(result, Err(Error::Transport(_))));
        // The write that went through stays written; the rest were never
        // attempted.
        assert_eq!(io.writes, vec![(1001, 1)]);
    }
}
