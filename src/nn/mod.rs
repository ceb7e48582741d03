//! Neural Network Module
//!
//! Provides the building blocks of the three-layer classifier:
//! - Units (input attributes, bias constants, hidden and output neurons)
//! - The network itself, with construction, inference and training
//! - Random weight-table initialization

mod init;
mod network;
mod unit;

pub use init::xavier_tables;
pub use network::Network;
pub use unit::{Connection, Unit, UnitRole};
