//! Simulation driver and input loading.
//!
//! Reads the logical address stream and runs it through the translator.

/// Address stream reader.
pub mod loader;

/// Run loop over an address stream.
pub mod simulator;

pub use loader::{AddressReader, open_addresses};
pub use simulator::Simulator;
