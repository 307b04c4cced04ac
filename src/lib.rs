//! Driver for Nilan CTS700/EC9 climate units spoken to over Modbus.
//!
//! The unit exposes everything through numbered 16-bit registers in two
//! banks. [`registers`] holds the catalog of known registers and their
//! decode rules, [`connection`] opens per-operation sessions and moves raw
//! words, [`snapshots`] turns raw words into typed state, and [`device`]
//! ties the three together behind a per-call session lifecycle.

pub mod commands;
pub mod connection;
pub mod device;
pub mod output;
pub mod registers;
pub mod snapshots;

pub use connection::{Config, Connection, Error, RegisterIo, RegisterValues};
pub use device::Device;
pub use registers::{Bank, DataType, FanSpeed, OperationMode, Register, Value};
pub use snapshots::{
    ErrorFlags, HoldingState, Readings, Settings, SettingsChange, Snapshot, SnapshotKind,
};
