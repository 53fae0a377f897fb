//! Logical and Physical Address types.
//!
//! This module defines strong types for the two address spaces of the simulator
//! and the page geometry that connects them. It provides the following:
//! 1. **Type Safety:** Distinguishes logical (virtual) from physical addresses at compile time.
//! 2. **Address Splitting:** Splits a logical address into page number and offset.
//! 3. **Address Composition:** Builds a physical address from a frame number and offset.

use std::fmt;

/// Logical page number (index into the page table).
pub type PageNumber = u32;

/// Physical frame number (index into main memory).
pub type FrameNumber = u32;

/// A logical address as issued by the simulated program.
///
/// Logical addresses are split into a page number (high bits) and an
/// offset (low bits) and must be translated before main memory is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogicalAddr(pub u32);

/// A physical address into simulated main memory.
///
/// Physical addresses are the concatenation of a frame number and the
/// offset carried over unchanged from the logical address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysAddr(pub u64);

impl LogicalAddr {
    /// Creates a new logical address from a raw 32-bit value.
    #[inline(always)]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Returns the raw 32-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u32 {
        self.0
    }
}

impl PhysAddr {
    /// Creates a new physical address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LogicalAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Page geometry shared by the page table, main memory and the translator.
///
/// The page size is always a power of two, so splitting an address is a
/// shift and a mask. Construct through [`crate::config::Config::geometry`],
/// which validates the sizes first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageGeometry {
    page_size: u32,
    offset_bits: u32,
    page_count: u32,
}

impl PageGeometry {
    /// Creates a geometry from a power-of-two page size and a page count.
    ///
    /// # Arguments
    ///
    /// * `page_size` - Bytes per page; must be a non-zero power of two.
    /// * `page_count` - Number of logical pages in the address space.
    pub const fn new(page_size: u32, page_count: u32) -> Self {
        Self {
            page_size,
            offset_bits: page_size.trailing_zeros(),
            page_count,
        }
    }

    /// Bytes per page (and per frame).
    #[inline(always)]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of low address bits holding the page offset.
    #[inline(always)]
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Mask selecting the page offset.
    #[inline(always)]
    pub const fn offset_mask(&self) -> u32 {
        self.page_size - 1
    }

    /// Number of logical pages.
    #[inline(always)]
    pub const fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Size of the logical address space in bytes.
    pub const fn address_space(&self) -> u64 {
        self.page_count as u64 * self.page_size as u64
    }

    /// Returns `true` if `addr` lies inside the logical address space.
    pub const fn contains(&self, addr: LogicalAddr) -> bool {
        (addr.0 as u64) < self.address_space()
    }

    /// Splits a logical address into `(page, offset)`.
    ///
    /// Pure bit manipulation; range checking is the caller's concern.
    #[inline(always)]
    pub const fn split(&self, addr: LogicalAddr) -> (PageNumber, u32) {
        (addr.0 >> self.offset_bits, addr.0 & self.offset_mask())
    }

    /// Composes a physical address from a frame number and page offset.
    #[inline(always)]
    pub const fn compose(&self, frame: FrameNumber, offset: u32) -> PhysAddr {
        PhysAddr(((frame as u64) << self.offset_bits) | offset as u64)
    }

    /// Byte offset of the first byte of `page` in the backing store.
    #[inline(always)]
    pub const fn page_base(&self, page: PageNumber) -> u64 {
        page as u64 * self.page_size as u64
    }
}
