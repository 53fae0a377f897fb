//! Storage side of the simulated machine.
//!
//! 1. **Memory:** physical main memory divided into frames.
//! 2. **Backing Store:** read-only secondary storage pages are demand-loaded from.

/// Backing store trait and implementations.
pub mod backing_store;

/// Physical main memory.
pub mod memory;

pub use backing_store::{BackingStore, FileBackingStore, MemoryBackingStore};
pub use memory::PhysicalMemory;
