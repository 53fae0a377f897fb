//! Paged virtual memory simulator library.
//!
//! This crate simulates logical-to-physical address translation with demand paging:
//! 1. **Core:** TLB, page table, frame allocator with FIFO/LRU replacement, and the translator.
//! 2. **Storage:** Physical main memory and the backing store pages are loaded from.
//! 3. **Simulation:** Address stream loading, the run loop, configuration and statistics.

/// Common types and constants (addresses, page geometry, errors).
pub mod common;
/// Simulator configuration (defaults, policy enums, sectioned config structures).
pub mod config;
/// Translation pipeline (TLB, page table, replacement, translator).
pub mod core;
/// Address stream loader and run loop.
pub mod sim;
/// Physical memory and backing stores.
pub mod soc;
/// Translation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Address translator; owns the TLB, page table, frames and memory.
pub use crate::core::Translator;
/// Run loop over an address stream.
pub use crate::sim::Simulator;
