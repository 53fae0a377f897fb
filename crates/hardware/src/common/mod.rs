//! Common utilities and types used throughout the simulator.
//!
//! This module provides the building blocks shared by every component:
//! 1. **Address Types:** Strong types for logical and physical addresses, and page geometry.
//! 2. **Constants:** Geometry of the reference machine.
//! 3. **Error Handling:** Run errors, backing-store errors and invariant violations.

/// Address type definitions (logical and physical addresses, page geometry).
pub mod addr;

/// Reference machine constants.
pub mod constants;

/// Error types.
pub mod error;

pub use addr::{FrameNumber, LogicalAddr, PageGeometry, PageNumber, PhysAddr};
pub use constants::{OFFSET_BITS, PAGE_SIZE};
pub use error::{BackingStoreError, InvariantViolation, SimError, SimResult};
