//! Page Replacement Policies.
//!
//! Implements the algorithms that choose which resident page gives up its
//! frame when physical memory is full.
//!
//! # Policies
//!
//! - `Fifo`: First-In, First-Out by load order.
//! - `Lru`: Least Recently Used by access age.

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

use std::fmt;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;

use crate::common::addr::PageNumber;

/// Trait for page replacement policies.
///
/// A policy tracks the resident set. The replacement engine reports every
/// page load and every access; when no free frame is left it asks for a
/// victim, which the policy removes from its resident set.
pub trait ReplacementPolicy: fmt::Debug + Send + Sync {
    /// Records that `page` was loaded into a frame and is now resident.
    fn record_load(&mut self, page: PageNumber);

    /// Records an access (TLB hit, page-table hit, or fault) to a resident page.
    fn record_access(&mut self, page: PageNumber);

    /// Removes and returns the page to evict.
    ///
    /// # Returns
    ///
    /// `None` if no page is resident.
    fn select_victim(&mut self) -> Option<PageNumber>;

    /// Number of pages the policy considers resident.
    fn resident(&self) -> usize;
}
