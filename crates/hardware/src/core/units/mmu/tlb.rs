//! Translation Lookaside Buffer (TLB).
//!
//! A small fully associative cache of logical page to physical frame
//! mappings. Lookups scan every entry, the way a hardware associative array
//! compares all tags at once; the TLB is never a source of truth and every
//! valid entry must agree with the page table.
//!
//! Which slot an insert overwrites is decided by a [`TlbInsertStrategy`]:
//! - [`CircularInsert`]: round-robin over the slots (oldest insert is replaced).
//! - [`FrameAwareInsert`]: reuse the slot that already describes the incoming
//!   frame (live, or invalidated by the eviction that freed it), so two
//!   entries never name the same frame after it is reassigned.

use std::fmt;

use crate::common::addr::{FrameNumber, PageNumber};
use crate::config::TlbInsertPolicy;

/// A single entry in the TLB.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TlbEntry {
    /// Logical page number (tag).
    pub page: PageNumber,
    /// Physical frame number (data).
    pub frame: FrameNumber,
    /// Entry validity flag.
    pub valid: bool,
}

/// Chooses the slot overwritten by a TLB insert.
pub trait TlbInsertStrategy: fmt::Debug + Send + Sync {
    /// Returns the index in `entries` that receives a mapping to `frame`.
    ///
    /// `entries` is never empty.
    fn slot(&mut self, entries: &[TlbEntry], frame: FrameNumber) -> usize;
}

/// Round-robin slot selection.
///
/// Slot `inserts % len` is written, then `inserts` is incremented, so the
/// oldest insert is always the one replaced.
#[derive(Debug, Default)]
pub struct CircularInsert {
    inserts: usize,
}

impl CircularInsert {
    /// Creates a strategy whose first insert lands in slot 0.
    pub const fn new() -> Self {
        Self { inserts: 0 }
    }

    /// Number of inserts routed through the circular buffer so far.
    pub const fn inserts(&self) -> usize {
        self.inserts
    }
}

impl TlbInsertStrategy for CircularInsert {
    fn slot(&mut self, entries: &[TlbEntry], _frame: FrameNumber) -> usize {
        let idx = self.inserts % entries.len();
        self.inserts += 1;
        idx
    }
}

/// Frame-identity slot selection with a circular fallback.
///
/// A slot that describes the incoming frame is overwritten in place, whether
/// it is still valid or was invalidated when the frame's previous page was
/// evicted. Slots the fallback has never handed out are not candidates.
#[derive(Debug, Default)]
pub struct FrameAwareInsert {
    fallback: CircularInsert,
}

impl FrameAwareInsert {
    /// Creates a strategy with an empty circular fallback.
    pub const fn new() -> Self {
        Self {
            fallback: CircularInsert::new(),
        }
    }
}

impl TlbInsertStrategy for FrameAwareInsert {
    fn slot(&mut self, entries: &[TlbEntry], frame: FrameNumber) -> usize {
        // Reuse never advances the fallback, so written slots are a prefix.
        let written = &entries[..self.fallback.inserts().min(entries.len())];
        written
            .iter()
            .position(|e| e.valid && e.frame == frame)
            .or_else(|| written.iter().position(|e| e.frame == frame))
            .unwrap_or_else(|| self.fallback.slot(entries, frame))
    }
}

/// Translation Lookaside Buffer structure.
#[derive(Debug)]
pub struct Tlb {
    entries: Vec<TlbEntry>,
    strategy: Box<dyn TlbInsertStrategy>,
}

impl Tlb {
    /// Creates a TLB with the strategy named by `policy`.
    ///
    /// # Arguments
    ///
    /// * `size` - Number of entries (at least 1).
    /// * `policy` - Slot selection on insert.
    pub fn new(size: usize, policy: TlbInsertPolicy) -> Self {
        let strategy: Box<dyn TlbInsertStrategy> = match policy {
            TlbInsertPolicy::Circular => Box::new(CircularInsert::new()),
            TlbInsertPolicy::FrameAware => Box::new(FrameAwareInsert::new()),
        };
        Self::with_strategy(size, strategy)
    }

    /// Creates a TLB with a caller-supplied insertion strategy.
    pub fn with_strategy(size: usize, strategy: Box<dyn TlbInsertStrategy>) -> Self {
        Self {
            entries: vec![TlbEntry::default(); size.max(1)],
            strategy,
        }
    }

    /// Looks up a logical page.
    ///
    /// Scans every entry; O(capacity).
    ///
    /// # Returns
    ///
    /// `Some(frame)` if a valid entry for `page` exists, otherwise `None`.
    pub fn lookup(&self, page: PageNumber) -> Option<FrameNumber> {
        self.entries
            .iter()
            .find(|e| e.valid && e.page == page)
            .map(|e| e.frame)
    }

    /// Inserts a new mapping into the slot chosen by the strategy.
    pub fn insert(&mut self, page: PageNumber, frame: FrameNumber) {
        let idx = self.strategy.slot(&self.entries, frame);
        self.entries[idx] = TlbEntry {
            page,
            frame,
            valid: true,
        };
    }

    /// Invalidates every entry that caches `page`.
    ///
    /// Called when `page` is evicted from physical memory.
    pub fn invalidate(&mut self, page: PageNumber) {
        for e in self.entries.iter_mut().filter(|e| e.page == page) {
            e.valid = false;
        }
    }

    /// Flushes all entries from the TLB.
    pub fn flush(&mut self) {
        for e in &mut self.entries {
            e.valid = false;
        }
    }

    /// Iterates over the valid `(page, frame)` mappings.
    pub fn mappings(&self) -> impl Iterator<Item = (PageNumber, FrameNumber)> + '_ {
        self.entries
            .iter()
            .filter(|e| e.valid)
            .map(|e| (e.page, e.frame))
    }

    /// Raw view of every slot, valid or not.
    pub fn entries(&self) -> &[TlbEntry] {
        &self.entries
    }

    /// Number of valid entries.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.valid).count()
    }

    /// Returns `true` if no entry is valid.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }
}
