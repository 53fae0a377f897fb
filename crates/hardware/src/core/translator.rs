//! Address Translator.
//!
//! Orchestrates one logical-to-physical translation:
//! 1. **TLB:** Look the page up in the TLB; a hit needs nothing else.
//! 2. **Page Table:** On a TLB miss consult the page table and cache a resident mapping.
//! 3. **Page Fault:** Otherwise read the page from the backing store, obtain a frame
//!    (evicting a resident page if memory is full), map it and cache it.
//! 4. **Result:** Record the access with the replacement policy, compose the physical
//!    address and read the byte it names.
//!
//! All mutable simulation state lives in one [`TranslationState`] owned by the
//! translator, so independent simulations never share anything.

use std::fmt;

use tracing::{debug, trace, warn};

use crate::common::addr::{FrameNumber, LogicalAddr, PageGeometry, PageNumber, PhysAddr};
use crate::common::error::{InvariantViolation, SimError, SimResult};
use crate::config::Config;
use crate::core::units::mmu::{PageTable, Tlb};
use crate::core::units::replacement::{Allocation, FrameAllocator};
use crate::soc::backing_store::BackingStore;
use crate::soc::memory::PhysicalMemory;
use crate::stats::TranslationStats;

/// How a translation was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// The TLB held the mapping.
    TlbHit,
    /// TLB miss; the page was already resident.
    PageTableHit,
    /// The page was loaded from the backing store.
    PageFault {
        /// Page evicted to make room, if memory was full.
        evicted: Option<PageNumber>,
    },
}

/// Result of translating one logical address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Translation {
    /// Address that was translated.
    pub logical: LogicalAddr,
    /// Logical page of `logical`.
    pub page: PageNumber,
    /// Frame holding `page`.
    pub frame: FrameNumber,
    /// Resolved physical address.
    pub physical: PhysAddr,
    /// Signed byte stored at `physical`.
    pub value: i8,
    /// How the mapping was found.
    pub outcome: TranslationOutcome,
}

impl Translation {
    /// Returns `true` if the TLB resolved the translation.
    pub const fn is_tlb_hit(&self) -> bool {
        matches!(self.outcome, TranslationOutcome::TlbHit)
    }

    /// Returns `true` if the translation page-faulted.
    pub const fn is_page_fault(&self) -> bool {
        matches!(self.outcome, TranslationOutcome::PageFault { .. })
    }
}

impl fmt::Display for Translation {
    /// Formats the per-address output line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Virtual address: {} Physical address: {} Value: {}",
            self.logical, self.physical, self.value
        )
    }
}

/// Mutable state of one simulation.
#[derive(Debug)]
pub struct TranslationState {
    /// Translation lookaside buffer.
    pub tlb: Tlb,
    /// Page table over the whole logical address space.
    pub page_table: PageTable,
    /// Frame allocator and replacement policy.
    pub frames: FrameAllocator,
    /// Main memory.
    pub memory: PhysicalMemory,
    /// Run counters.
    pub stats: TranslationStats,
}

impl TranslationState {
    /// Builds empty state sized by `config`.
    ///
    /// `config` is expected to be validated.
    pub fn new(config: &Config) -> Self {
        let m = &config.memory;
        Self {
            tlb: Tlb::new(config.tlb.size, config.tlb.insert_policy),
            page_table: PageTable::new(m.page_count, m.frame_count),
            frames: FrameAllocator::new(m.frame_count, m.policy),
            memory: PhysicalMemory::new(m.frame_count, m.page_size),
            stats: TranslationStats::default(),
        }
    }
}

/// Drives translations against a backing store.
#[derive(Debug)]
pub struct Translator<B> {
    geometry: PageGeometry,
    state: TranslationState,
    backing: B,
    scratch: Vec<u8>,
    trace: bool,
}

impl<B: BackingStore> Translator<B> {
    /// Creates a translator with empty memory.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if `config` fails validation.
    pub fn new(config: &Config, backing: B) -> SimResult<Self> {
        config.validate()?;
        let geometry = config.geometry();
        if backing.len() != geometry.address_space() {
            warn!(
                store_len = backing.len(),
                expected = geometry.address_space(),
                "backing store size does not match the logical address space"
            );
        }
        Ok(Self {
            geometry,
            state: TranslationState::new(config),
            backing,
            scratch: vec![0; geometry.page_size() as usize],
            trace: config.general.trace_translations,
        })
    }

    /// Translates one logical address.
    ///
    /// # Errors
    ///
    /// - [`SimError::AddressOutOfRange`] if `addr` is outside the logical address space.
    /// - [`SimError::BackingStore`] if a faulting page cannot be read; state is left unchanged.
    /// - [`SimError::Invariant`] if the page table or replacement engine is inconsistent.
    pub fn translate(&mut self, addr: LogicalAddr) -> SimResult<Translation> {
        if !self.geometry.contains(addr) {
            return Err(SimError::AddressOutOfRange {
                addr: addr.val(),
                limit: self.geometry.address_space(),
            });
        }
        let (page, offset) = self.geometry.split(addr);

        let (frame, outcome) = if let Some(frame) = self.state.tlb.lookup(page) {
            (frame, TranslationOutcome::TlbHit)
        } else if let Some(frame) = self.state.page_table.lookup(page) {
            self.state.tlb.insert(page, frame);
            (frame, TranslationOutcome::PageTableHit)
        } else {
            let Allocation { frame, evicted } = self.handle_fault(page)?;
            (frame, TranslationOutcome::PageFault { evicted })
        };

        self.state.frames.record_access(page);

        let physical = self.geometry.compose(frame, offset);
        let value = self
            .state
            .memory
            .read_byte(physical)
            .ok_or(InvariantViolation::FrameOutOfRange {
                frame,
                frame_count: self.state.frames.frame_count(),
            })?;

        let stats = &mut self.state.stats;
        stats.total_addresses += 1;
        match outcome {
            TranslationOutcome::TlbHit => stats.tlb_hits += 1,
            TranslationOutcome::PageTableHit => stats.page_table_hits += 1,
            TranslationOutcome::PageFault { evicted } => {
                stats.page_faults += 1;
                if evicted.is_some() {
                    stats.evictions += 1;
                }
            }
        }

        let translation = Translation {
            logical: addr,
            page,
            frame,
            physical,
            value,
            outcome,
        };
        if self.trace {
            trace!(
                logical = addr.val(),
                page,
                frame,
                physical = physical.val(),
                value,
                outcome = ?outcome,
                "translated"
            );
        }
        Ok(translation)
    }

    /// Resolves a page fault: load, allocate (or evict), map, cache.
    fn handle_fault(&mut self, page: PageNumber) -> SimResult<Allocation> {
        self.backing
            .read_block(self.geometry.page_base(page), &mut self.scratch)
            .map_err(|source| SimError::BackingStore { page, source })?;

        let state = &mut self.state;
        let allocation = state.frames.allocate_or_evict(page, &mut state.page_table)?;
        if let Some(victim) = allocation.evicted {
            state.tlb.invalidate(victim);
        }

        let frame_count = state.frames.frame_count();
        state
            .memory
            .frame_mut(allocation.frame)
            .ok_or(InvariantViolation::FrameOutOfRange {
                frame: allocation.frame,
                frame_count,
            })?
            .copy_from_slice(&self.scratch);

        state.page_table.map(page, allocation.frame)?;
        state.tlb.insert(page, allocation.frame);
        debug!(page, frame = allocation.frame, evicted = ?allocation.evicted, "page fault");
        Ok(allocation)
    }

    /// Verifies that every TLB entry agrees with the page table and that no
    /// frame is mapped by two pages.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_consistency(&self) -> Result<(), InvariantViolation> {
        let state = &self.state;
        for (page, tlb_frame) in state.tlb.mappings() {
            let table_frame = state.page_table.lookup(page);
            if table_frame != Some(tlb_frame) {
                return Err(InvariantViolation::TlbPageTableMismatch {
                    page,
                    tlb_frame,
                    table_frame,
                });
            }
        }
        for (page, frame) in state.page_table.mappings() {
            match state.page_table.owner_of(frame) {
                Some(owner) if owner == page => {}
                owner => {
                    return Err(InvariantViolation::FrameDoubleMapped {
                        frame,
                        owner: owner.unwrap_or(page),
                        incoming: page,
                    });
                }
            }
        }
        Ok(())
    }

    /// Page geometry in use.
    pub const fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    /// Read-only view of the simulation state.
    pub const fn state(&self) -> &TranslationState {
        &self.state
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> &TranslationStats {
        &self.state.stats
    }

    /// The backing store pages are loaded from.
    pub const fn backing(&self) -> &B {
        &self.backing
    }
}
