use crate::connection::{Config, Connection, Error, RegisterIo as _, RegisterValues};
use crate::registers::Register;
use crate::snapshots::{
    ErrorFlags, HoldingState, Readings, Settings, SettingsChange, Snapshot, SnapshotKind,
};

/// Client for one physical unit.
///
/// Every operation opens its own session and releases it before returning,
/// successful or not. Nothing is cached or retried here: callers that need
/// resilience re-invoke the operation, and concurrent callers against the
/// same physical link need to bring their own mutual exclusion.
pub struct Device {
    config: Config,
}

impl Device {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reads an arbitrary register list within a single session, in order.
    pub fn read_registers(&self, registers: &[Register]) -> Result<RegisterValues, Error> {
        let mut session = Connection::open(&self.config)?;
        session.read_many(registers)
    }

    /// Reads the raw words behind `kind` within a single session.
    pub fn fetch(&self, kind: SnapshotKind) -> Result<RegisterValues, Error> {
        self.read_registers(kind.registers())
    }

    /// Fetches and decodes a snapshot of `kind`.
    pub fn snapshot(&self, kind: SnapshotKind) -> Result<Snapshot, Error> {
        Ok(Snapshot::build(kind, &self.fetch(kind)?))
    }

    pub fn readings(&self) -> Result<Readings, Error> {
        Ok(Readings::from_raw(&self.fetch(SnapshotKind::Readings)?))
    }

    pub fn holding_state(&self) -> Result<HoldingState, Error> {
        Ok(HoldingState::from_raw(&self.fetch(SnapshotKind::Holdings)?))
    }

    pub fn settings(&self) -> Result<Settings, Error> {
        Ok(Settings::from_raw(&self.fetch(SnapshotKind::Settings)?))
    }

    pub fn error_flags(&self) -> Result<ErrorFlags, Error> {
        Ok(ErrorFlags::from_raw(&self.fetch(SnapshotKind::Errors)?))
    }

    pub fn read_register(&self, register: Register) -> Result<u16, Error> {
        let mut session = Connection::open(&self.config)?;
        session.read_one(register)
    }

    pub fn write_register(&self, register: Register, value: u16) -> Result<(), Error> {
        let mut session = Connection::open(&self.config)?;
        session.write_one(register, value)
    }

    /// Applies a sparse settings update in one session. The first failed
    /// write aborts the remainder; registers already written stay written.
    pub fn apply(&self, change: &SettingsChange) -> Result<(), Error> {
        let values = change.to_register_values();
        if values.is_empty() {
            return Ok(());
        }
        let mut session = Connection::open(&self.config)?;
        session.write_many(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_settings_change_does_not_open_a_session() {
        // Nothing listens on this address, so reaching for the link would
        // fail the test.
        let device = Device::new(Config::new("127.0.0.1:1"));
        assert!(device.apply(&SettingsChange::default()).is_ok());
    }
}
