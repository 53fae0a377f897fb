//! Reference Machine Constants.
//!
//! This module defines the geometry of the reference machine. It includes:
//! 1. **Paging Constants:** Page size, offset width and masks.
//! 2. **Capacity Constants:** Logical page count, physical frame count and TLB size.
//!
//! These are the values `Config::default()` is built from; a run may override
//! any of them through configuration.

/// Page size in bytes (1 KiB).
pub const PAGE_SIZE: u32 = 1024;

/// Number of bits holding the page offset.
pub const OFFSET_BITS: u32 = 10;

/// Mask for extracting the page offset from a logical address.
pub const OFFSET_MASK: u32 = PAGE_SIZE - 1;

/// Number of logical pages in the address space.
pub const PAGES: u32 = 1024;

/// Mask for extracting the page number once the offset is shifted out.
pub const PAGE_MASK: u32 = PAGES - 1;

/// Number of physical frames in main memory.
pub const FRAMES: u32 = 256;

/// Number of TLB entries.
pub const TLB_SIZE: usize = 16;

/// Size of the logical address space (and of the backing store) in bytes.
pub const MEMORY_SIZE: u64 = PAGES as u64 * PAGE_SIZE as u64;
