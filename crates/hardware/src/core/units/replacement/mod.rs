//! Frame Allocator and Replacement Engine.
//!
//! Hands out physical frames to faulting pages. While free frames remain
//! they are handed out in increasing order and no replacement logic runs.
//! Once memory is full, the configured [`ReplacementPolicy`] picks a victim,
//! the victim is unmapped from the page table, and its frame is reused.
//!
//! The engine never touches frame contents; loading the incoming page is
//! the translator's job.

/// Page replacement policy implementations (FIFO, LRU).
pub mod policies;

use tracing::debug;

use self::policies::{FifoPolicy, LruPolicy, ReplacementPolicy};
use crate::common::addr::{FrameNumber, PageNumber};
use crate::common::error::InvariantViolation;
use crate::config::ReplacementPolicy as PolicyType;
use crate::core::units::mmu::PageTable;

/// Outcome of a frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Allocation {
    /// Frame assigned to the incoming page.
    pub frame: FrameNumber,
    /// Page that was evicted to free `frame`, if any.
    pub evicted: Option<PageNumber>,
}

/// Physical frame allocator with pluggable replacement.
#[derive(Debug)]
pub struct FrameAllocator {
    frame_count: u32,
    next_free: u32,
    policy: Box<dyn ReplacementPolicy>,
}

impl FrameAllocator {
    /// Creates an allocator over `frame_count` frames with the policy named by `policy`.
    pub fn new(frame_count: u32, policy: PolicyType) -> Self {
        let frames = frame_count as usize;
        let policy: Box<dyn ReplacementPolicy> = match policy {
            PolicyType::Fifo => Box::new(FifoPolicy::new(frames)),
            PolicyType::Lru => Box::new(LruPolicy::new(frames)),
        };
        Self::with_policy(frame_count, policy)
    }

    /// Creates an allocator with a caller-supplied policy.
    pub fn with_policy(frame_count: u32, policy: Box<dyn ReplacementPolicy>) -> Self {
        Self {
            frame_count,
            next_free: 0,
            policy,
        }
    }

    /// Returns a frame for `incoming`, evicting a resident page if memory is full.
    ///
    /// On eviction the victim's page-table entry is removed here; the caller
    /// must map `incoming` to the returned frame in the same fault.
    ///
    /// # Errors
    ///
    /// - [`InvariantViolation::EmptyResidentSet`] if memory is full but the
    ///   policy tracks no resident page.
    /// - [`InvariantViolation::VictimNotResident`] if the chosen victim has no
    ///   page-table entry.
    pub fn allocate_or_evict(
        &mut self,
        incoming: PageNumber,
        page_table: &mut PageTable,
    ) -> Result<Allocation, InvariantViolation> {
        let allocation = if self.next_free < self.frame_count {
            let frame = self.next_free;
            self.next_free += 1;
            Allocation {
                frame,
                evicted: None,
            }
        } else {
            let victim = self
                .policy
                .select_victim()
                .ok_or(InvariantViolation::EmptyResidentSet)?;
            let frame = page_table
                .unmap(victim)
                .ok_or(InvariantViolation::VictimNotResident { page: victim })?;
            debug!(victim, frame, incoming, "evicting page");
            Allocation {
                frame,
                evicted: Some(victim),
            }
        };
        self.policy.record_load(incoming);
        Ok(allocation)
    }

    /// Reports an access to a resident page to the policy.
    #[inline]
    pub fn record_access(&mut self, page: PageNumber) {
        self.policy.record_access(page);
    }

    /// Frames never handed out yet.
    pub const fn free_frames(&self) -> u32 {
        self.frame_count - self.next_free
    }

    /// Total number of physical frames.
    pub const fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Number of pages the policy tracks as resident.
    pub fn resident(&self) -> usize {
        self.policy.resident()
    }
}
