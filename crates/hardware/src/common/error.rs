//! Error definitions.
//!
//! This module defines the error handling for the simulator. It provides:
//! 1. **Run Errors:** Every condition that aborts a simulation run (`SimError`).
//! 2. **Backing Store Errors:** Failures to fetch a page-sized block.
//! 3. **Invariant Violations:** Programming errors in the page table or replacement engine.
//!
//! TLB misses and page-table misses are not errors; they are ordinary
//! branches of the translation pipeline and never surface here.

use std::io;

use thiserror::Error;

use super::addr::{FrameNumber, PageNumber};

/// Convenience alias used throughout the crate.
pub type SimResult<T> = Result<T, SimError>;

/// Errors that abort a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// An input record is not a non-negative integer that fits in 32 bits.
    #[error("malformed input on line {line}: {record:?}")]
    MalformedInput {
        /// 1-based line number in the address stream.
        line: usize,
        /// The offending record, trimmed.
        record: String,
    },

    /// A logical address lies outside the logical address space.
    #[error("logical address {addr} is outside the {limit}-byte address space")]
    AddressOutOfRange {
        /// The offending address.
        addr: u32,
        /// Size of the logical address space in bytes.
        limit: u64,
    },

    /// The backing store could not supply the page requested by a fault.
    #[error("failed to load page {page} from the backing store")]
    BackingStore {
        /// Logical page being loaded.
        page: PageNumber,
        /// Underlying failure.
        #[source]
        source: BackingStoreError,
    },

    /// Internal bookkeeping is inconsistent; always a bug.
    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    /// The configuration was rejected before the run started.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O failure on the address stream, a configuration file, or the report.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Failure to read a block from a backing store.
#[derive(Debug, Error)]
pub enum BackingStoreError {
    /// The requested block extends past the end of the store.
    #[error("block at offset {offset} of {len} bytes exceeds store size {size}")]
    OutOfBounds {
        /// Byte offset of the block.
        offset: u64,
        /// Requested block length.
        len: usize,
        /// Total store size in bytes.
        size: u64,
    },

    /// The underlying file could not be read.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Broken internal invariants of the page table and replacement engine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// Eviction was requested while no page was resident.
    #[error("eviction requested with an empty resident set")]
    EmptyResidentSet,

    /// The replacement policy chose a page the page table does not map.
    #[error("replacement victim page {page} is not resident")]
    VictimNotResident {
        /// The chosen victim.
        page: PageNumber,
    },

    /// A frame was about to be mapped by a second logical page.
    #[error("frame {frame} is owned by page {owner}, cannot map page {incoming}")]
    FrameDoubleMapped {
        /// Frame being mapped.
        frame: FrameNumber,
        /// Current owner of the frame.
        owner: PageNumber,
        /// Page that tried to take the frame.
        incoming: PageNumber,
    },

    /// A page that already has a frame was mapped again.
    #[error("page {page} is already mapped to frame {frame}")]
    PageAlreadyMapped {
        /// Page being mapped.
        page: PageNumber,
        /// Frame it already owns.
        frame: FrameNumber,
    },

    /// A TLB entry disagrees with the page table.
    #[error("TLB maps page {page} to frame {tlb_frame}, page table says {table_frame:?}")]
    TlbPageTableMismatch {
        /// Page of the stale entry.
        page: PageNumber,
        /// Frame cached in the TLB.
        tlb_frame: FrameNumber,
        /// Frame in the page table, if any.
        table_frame: Option<FrameNumber>,
    },

    /// A frame number outside physical memory was handed out.
    #[error("frame {frame} is outside physical memory of {frame_count} frames")]
    FrameOutOfRange {
        /// The offending frame.
        frame: FrameNumber,
        /// Number of frames in physical memory.
        frame_count: u32,
    },
}
