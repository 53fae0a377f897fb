//! Single-level page table.
//!
//! Maps every logical page to either nothing (not resident) or a physical
//! frame. Indexed directly by page number. A reverse index from frame to
//! owning page enforces frame exclusivity: a frame can only be mapped again
//! after its previous owner has been unmapped.

use crate::common::addr::{FrameNumber, PageNumber};
use crate::common::error::InvariantViolation;

/// Page table covering the whole logical address space.
#[derive(Debug, Clone)]
pub struct PageTable {
    entries: Vec<Option<FrameNumber>>,
    owners: Vec<Option<PageNumber>>,
    resident: usize,
}

impl PageTable {
    /// Creates a page table with every entry unmapped.
    ///
    /// # Arguments
    ///
    /// * `page_count` - Number of logical pages.
    /// * `frame_count` - Number of physical frames.
    pub fn new(page_count: u32, frame_count: u32) -> Self {
        Self {
            entries: vec![None; page_count as usize],
            owners: vec![None; frame_count as usize],
            resident: 0,
        }
    }

    /// Returns the frame holding `page`, or `None` if it is not resident.
    ///
    /// Pages outside the table are reported as not resident.
    #[inline]
    pub fn lookup(&self, page: PageNumber) -> Option<FrameNumber> {
        self.entries.get(page as usize).copied().flatten()
    }

    /// Returns the page currently mapped to `frame`.
    #[inline]
    pub fn owner_of(&self, frame: FrameNumber) -> Option<PageNumber> {
        self.owners.get(frame as usize).copied().flatten()
    }

    /// Maps `page` to `frame`.
    ///
    /// # Errors
    ///
    /// - [`InvariantViolation::FrameOutOfRange`] if `frame` is not a physical frame.
    /// - [`InvariantViolation::FrameDoubleMapped`] if another page owns `frame`.
    /// - [`InvariantViolation::PageAlreadyMapped`] if `page` already has a frame.
    pub fn map(&mut self, page: PageNumber, frame: FrameNumber) -> Result<(), InvariantViolation> {
        let frame_count = self.owners.len() as u32;
        let owner = self
            .owners
            .get_mut(frame as usize)
            .ok_or(InvariantViolation::FrameOutOfRange { frame, frame_count })?;
        if let Some(current) = *owner {
            return Err(InvariantViolation::FrameDoubleMapped {
                frame,
                owner: current,
                incoming: page,
            });
        }
        let entry = &mut self.entries[page as usize];
        if let Some(existing) = *entry {
            return Err(InvariantViolation::PageAlreadyMapped {
                page,
                frame: existing,
            });
        }
        *entry = Some(frame);
        *owner = Some(page);
        self.resident += 1;
        Ok(())
    }

    /// Unmaps `page`, returning the frame it occupied.
    pub fn unmap(&mut self, page: PageNumber) -> Option<FrameNumber> {
        let frame = self.entries.get_mut(page as usize)?.take()?;
        self.owners[frame as usize] = None;
        self.resident -= 1;
        Some(frame)
    }

    /// Number of resident pages.
    pub const fn resident_count(&self) -> usize {
        self.resident
    }

    /// Number of logical pages covered.
    pub fn page_count(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over the resident `(page, frame)` mappings in page order.
    pub fn mappings(&self) -> impl Iterator<Item = (PageNumber, FrameNumber)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(page, frame)| frame.map(|f| (page as PageNumber, f)))
    }
}
