//! Translation units.
//!
//! This module contains the components the translator drives: the memory
//! management structures (TLB and page table) and the frame allocator with
//! its page replacement policies.

/// Memory Management Unit structures: TLB and page table.
pub mod mmu;

/// Frame allocation and page replacement (FIFO, LRU).
pub mod replacement;
