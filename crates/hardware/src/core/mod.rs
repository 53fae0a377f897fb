//! Core translation machinery.
//!
//! This module contains the translation pipeline: the hardware-like units
//! (TLB, page table, frame allocator and replacement policies) and the
//! translator that drives them for every logical address.

/// Address translator and the simulation state it owns.
pub mod translator;

/// Translation units (MMU structures, frame allocation and replacement).
pub mod units;

pub use self::translator::{Translation, TranslationOutcome, TranslationState, Translator};
