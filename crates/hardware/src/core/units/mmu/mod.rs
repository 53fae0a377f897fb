//! Memory Management Unit structures.
//!
//! The two halves of address translation state:
//! 1. **TLB:** small associative cache of recent page to frame mappings.
//! 2. **Page Table:** authoritative page to frame mapping for the whole address space.

/// Single-level page table.
pub mod page_table;

/// Translation Lookaside Buffer.
pub mod tlb;

pub use page_table::PageTable;
pub use tlb::{CircularInsert, FrameAwareInsert, Tlb, TlbEntry, TlbInsertStrategy};
