//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the resident page that has gone the longest without an
//! access. Every resident page carries an age: an access resets the accessed
//! page's age to 0 and increments the age of every other resident page, so
//! the oldest page is the one with the largest age.
//!
//! Ages are plain counters, which is only sound because accesses are
//! strictly serialized.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `record_load()`: O(1)
//!   - `record_access()`: O(F) where F is the number of resident pages
//!   - `select_victim()`: O(F)
//! - **Space Complexity:** O(F)
//! - **Worst Case:** Cyclic scans one page larger than memory fault on every access

use super::ReplacementPolicy;
use crate::common::addr::PageNumber;

/// Per-resident-page recency record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LruRecord {
    /// Resident logical page.
    pub page: PageNumber,
    /// Accesses to other pages since this page was last accessed.
    pub age: u64,
}

/// LRU Policy state.
#[derive(Debug, Default)]
pub struct LruPolicy {
    /// One record per resident page, in load order.
    records: Vec<LruRecord>,
}

impl LruPolicy {
    /// Creates a new LRU policy instance.
    ///
    /// # Arguments
    ///
    /// * `frames` - Number of physical frames (record capacity hint).
    pub fn new(frames: usize) -> Self {
        Self {
            records: Vec::with_capacity(frames),
        }
    }

    /// Current age of `page`, or `None` if it is not resident.
    pub fn age_of(&self, page: PageNumber) -> Option<u64> {
        self.records.iter().find(|r| r.page == page).map(|r| r.age)
    }

    /// All resident records in load order.
    pub fn records(&self) -> &[LruRecord] {
        &self.records
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Adds `page` with age 0; the access that follows the load ages the rest.
    fn record_load(&mut self, page: PageNumber) {
        self.records.push(LruRecord { page, age: 0 });
    }

    fn record_access(&mut self, page: PageNumber) {
        for record in &mut self.records {
            if record.page == page {
                record.age = 0;
            } else {
                record.age = record.age.saturating_add(1);
            }
        }
    }

    /// Removes the record with the largest age; the earliest loaded wins a tie.
    fn select_victim(&mut self) -> Option<PageNumber> {
        let mut oldest: Option<(usize, u64)> = None;
        for (idx, record) in self.records.iter().enumerate() {
            if oldest.is_none_or(|(_, age)| record.age > age) {
                oldest = Some((idx, record.age));
            }
        }
        oldest.map(|(idx, _)| self.records.remove(idx).page)
    }

    fn resident(&self) -> usize {
        self.records.len()
    }
}
