//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! This policy evicts the resident page that was loaded earliest, regardless
//! of how often or how recently it was accessed since. Resident pages are kept
//! in a queue in load order; loads push to the back, evictions pop the front.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `record_load()`: O(1)
//!   - `record_access()`: O(1) (no-op)
//!   - `select_victim()`: O(1)
//! - **Space Complexity:** O(F) where F is the number of frames
//! - **Worst Case:** Hot pages loaded early are evicted as readily as cold ones

use std::collections::VecDeque;

use super::ReplacementPolicy;
use crate::common::addr::PageNumber;

/// FIFO Policy state.
#[derive(Debug, Default)]
pub struct FifoPolicy {
    /// Resident pages, oldest load at the front.
    queue: VecDeque<PageNumber>,
}

impl FifoPolicy {
    /// Creates a new FIFO policy instance.
    ///
    /// # Arguments
    ///
    /// * `frames` - Number of physical frames (queue capacity hint).
    pub fn new(frames: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(frames),
        }
    }

    /// Resident pages in load order, oldest first.
    pub fn load_order(&self) -> impl Iterator<Item = PageNumber> + '_ {
        self.queue.iter().copied()
    }
}

impl ReplacementPolicy for FifoPolicy {
    fn record_load(&mut self, page: PageNumber) {
        self.queue.push_back(page);
    }

    /// Accesses do not change load order.
    fn record_access(&mut self, _page: PageNumber) {}

    fn select_victim(&mut self) -> Option<PageNumber> {
        self.queue.pop_front()
    }

    fn resident(&self) -> usize {
        self.queue.len()
    }
}
