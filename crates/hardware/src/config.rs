//! Configuration system for the virtual memory simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! a simulation run. It provides:
//! 1. **Defaults:** The reference machine (1 KiB pages, 1024 pages, 256 frames, 16-entry TLB).
//! 2. **Structures:** Sectioned config for general options, memory geometry and the TLB.
//! 3. **Enums:** Page replacement policy and TLB insertion policy selectors.
//!
//! Configuration is read from JSON (`Config::from_json`, `Config::load`) or built
//! with `Config::default()` and overridden field by field by the CLI. It is fixed
//! for the lifetime of a run.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::common::addr::PageGeometry;
use crate::common::error::{SimError, SimResult};

/// Default configuration constants for the simulator.
mod defaults {
    use crate::common::constants;

    /// Bytes per page and per frame (1 KiB).
    pub const PAGE_SIZE: u32 = constants::PAGE_SIZE;

    /// Logical pages in the address space.
    ///
    /// Together with `PAGE_SIZE` this fixes the expected backing store size.
    pub const PAGE_COUNT: u32 = constants::PAGES;

    /// Physical frames in main memory.
    ///
    /// Smaller than `PAGE_COUNT`, so a full run exercises page replacement.
    pub const FRAME_COUNT: u32 = constants::FRAMES;

    /// Translation Lookaside Buffer entry count.
    pub const TLB_SIZE: usize = constants::TLB_SIZE;
}

/// Upper bound on the logical and physical address space (32-bit addresses).
const MAX_ADDRESS_SPACE: u64 = 1 << 32;

/// Page replacement policy algorithms.
///
/// Selects how the replacement engine picks a resident page to evict
/// when every physical frame is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// First In First Out.
    ///
    /// Evicts the page that was loaded earliest, regardless of later accesses.
    #[default]
    #[serde(alias = "Fifo", alias = "fifo")]
    Fifo,
    /// Least Recently Used.
    ///
    /// Evicts the resident page whose last access is the oldest.
    #[serde(alias = "Lru", alias = "lru")]
    Lru,
}

impl FromStr for ReplacementPolicy {
    type Err = SimError;

    /// Parses a policy selector: `0`/`fifo` or `1`/`lru` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "fifo" => Ok(Self::Fifo),
            "1" | "lru" => Ok(Self::Lru),
            other => Err(SimError::Config(format!(
                "unknown replacement policy {other:?} (expected 0/fifo or 1/lru)"
            ))),
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fifo => write!(f, "FIFO"),
            Self::Lru => write!(f, "LRU"),
        }
    }
}

/// TLB insertion policy.
///
/// Selects which slot a new TLB entry overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum TlbInsertPolicy {
    /// Circular buffer: always overwrite the oldest slot.
    ///
    /// Only valid while frames are never reused.
    #[serde(alias = "circular")]
    Circular,
    /// Overwrite the entry that already describes the incoming frame,
    /// otherwise fall back to the circular slot.
    #[default]
    #[serde(alias = "frame-aware", alias = "frame_aware")]
    FrameAware,
}

impl FromStr for TlbInsertPolicy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circular" | "fifo" => Ok(Self::Circular),
            "frame-aware" | "frame_aware" | "frameaware" => Ok(Self::FrameAware),
            other => Err(SimError::Config(format!(
                "unknown TLB policy {other:?} (expected circular or frame-aware)"
            ))),
        }
    }
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use vmsim_core::config::{Config, ReplacementPolicy};
///
/// let config = Config::default();
/// assert_eq!(config.memory.page_size, 1024);
/// assert_eq!(config.memory.policy, ReplacementPolicy::Fifo);
/// assert_eq!(config.tlb.size, 16);
/// ```
///
/// Deserializing from JSON; missing sections and fields take their defaults:
///
/// ```
/// use vmsim_core::config::{Config, ReplacementPolicy, TlbInsertPolicy};
///
/// let json = r#"{
///     "memory": { "frame_count": 128, "policy": "LRU" },
///     "tlb": { "size": 8, "insert_policy": "FrameAware" }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.memory.frame_count, 128);
/// assert_eq!(config.memory.page_count, 1024);
/// assert_eq!(config.memory.policy, ReplacementPolicy::Lru);
/// assert_eq!(config.tlb.insert_policy, TlbInsertPolicy::FrameAware);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// General simulation settings
    pub general: GeneralConfig,
    /// Page geometry, physical memory and replacement policy
    pub memory: MemoryConfig,
    /// Translation lookaside buffer
    pub tlb: TlbConfig,
}

/// General simulation settings and options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    /// Emit a `trace` event for every translation.
    pub trace_translations: bool,
    /// Check TLB/page-table consistency and frame exclusivity after every translation.
    pub verify: bool,
}

/// Memory geometry and page replacement configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemoryConfig {
    /// Bytes per page and per frame; must be a power of two.
    pub page_size: u32,
    /// Number of logical pages.
    pub page_count: u32,
    /// Number of physical frames.
    pub frame_count: u32,
    /// Page replacement policy used once every frame is in use.
    pub policy: ReplacementPolicy,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::PAGE_SIZE,
            page_count: defaults::PAGE_COUNT,
            frame_count: defaults::FRAME_COUNT,
            policy: ReplacementPolicy::default(),
        }
    }
}

/// TLB configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TlbConfig {
    /// Number of entries.
    pub size: usize,
    /// Slot selection on insert.
    pub insert_policy: TlbInsertPolicy,
}

impl Default for TlbConfig {
    fn default() -> Self {
        Self {
            size: defaults::TLB_SIZE,
            insert_policy: TlbInsertPolicy::default(),
        }
    }
}

impl Config {
    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the document is not valid configuration JSON.
    pub fn from_json(json: &str) -> SimResult<Self> {
        serde_json::from_str(json).map_err(|e| SimError::Config(e.to_string()))
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be read and
    /// [`SimError::Config`] if its contents are invalid.
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Returns `true` when the address space is larger than physical memory,
    /// i.e. a run may have to evict pages.
    pub const fn eviction_possible(&self) -> bool {
        self.memory.frame_count < self.memory.page_count
    }

    /// Checks capacities and policy combinations before a run.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] when:
    /// - the page size is zero or not a power of two,
    /// - the page count, frame count or TLB size is zero,
    /// - the logical or physical address space exceeds 32 bits,
    /// - the circular TLB policy is combined with possible eviction.
    pub fn validate(&self) -> SimResult<()> {
        let m = &self.memory;
        if m.page_size == 0 || !m.page_size.is_power_of_two() {
            return Err(SimError::Config(format!(
                "page size {} is not a non-zero power of two",
                m.page_size
            )));
        }
        if m.page_count == 0 {
            return Err(SimError::Config("page count must be positive".into()));
        }
        if m.frame_count == 0 {
            return Err(SimError::Config("frame count must be positive".into()));
        }
        if self.tlb.size == 0 {
            return Err(SimError::Config("TLB size must be positive".into()));
        }
        if m.page_count as u64 * m.page_size as u64 > MAX_ADDRESS_SPACE {
            return Err(SimError::Config(format!(
                "{} pages of {} bytes exceed a 32-bit logical address space",
                m.page_count, m.page_size
            )));
        }
        if m.frame_count as u64 * m.page_size as u64 > MAX_ADDRESS_SPACE {
            return Err(SimError::Config(format!(
                "{} frames of {} bytes exceed a 32-bit physical address space",
                m.frame_count, m.page_size
            )));
        }
        if self.tlb.insert_policy == TlbInsertPolicy::Circular && self.eviction_possible() {
            return Err(SimError::Config(format!(
                "circular TLB insertion requires frame_count >= page_count ({} < {}); use FrameAware",
                m.frame_count, m.page_count
            )));
        }
        Ok(())
    }

    /// Page geometry derived from the memory section.
    pub const fn geometry(&self) -> PageGeometry {
        PageGeometry::new(self.memory.page_size, self.memory.page_count)
    }
}
