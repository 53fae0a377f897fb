//! Simulator: drives the translator over an address stream.
//!
//! Translations happen strictly one after another; the first error stops the
//! run. With `general.verify` set, TLB/page-table consistency and frame
//! exclusivity are checked after every translation.

use std::io::Write;

use tracing::info;

use crate::common::addr::LogicalAddr;
use crate::common::error::SimResult;
use crate::config::Config;
use crate::core::translator::{Translation, Translator};
use crate::soc::backing_store::BackingStore;
use crate::stats::TranslationStats;

/// Top-level simulator.
#[derive(Debug)]
pub struct Simulator<B> {
    /// Translator and the simulation state it owns.
    pub translator: Translator<B>,
    verify: bool,
}

impl<B: BackingStore> Simulator<B> {
    /// Creates a simulator over `backing`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation.
    pub fn new(config: &Config, backing: B) -> SimResult<Self> {
        let translator = Translator::new(config, backing)?;
        info!(
            page_size = config.memory.page_size,
            pages = config.memory.page_count,
            frames = config.memory.frame_count,
            tlb_size = config.tlb.size,
            policy = %config.memory.policy,
            tlb_policy = ?config.tlb.insert_policy,
            "simulator ready"
        );
        Ok(Self {
            translator,
            verify: config.general.verify,
        })
    }

    /// Translates one address, verifying invariants afterwards when enabled.
    ///
    /// # Errors
    ///
    /// Propagates translation errors and, in verify mode, invariant violations.
    pub fn step(&mut self, addr: LogicalAddr) -> SimResult<Translation> {
        let translation = self.translator.translate(addr)?;
        if self.verify {
            self.translator.check_consistency()?;
        }
        Ok(translation)
    }

    /// Translates every address of `addresses`, handing each result to `sink`.
    ///
    /// # Errors
    ///
    /// Stops at the first input, translation or sink error and returns it.
    pub fn run<I, F>(&mut self, addresses: I, mut sink: F) -> SimResult<TranslationStats>
    where
        I: IntoIterator<Item = SimResult<LogicalAddr>>,
        F: FnMut(&Translation) -> SimResult<()>,
    {
        for addr in addresses {
            let translation = self.step(addr?)?;
            sink(&translation)?;
        }
        let stats = *self.translator.stats();
        info!(
            addresses = stats.total_addresses,
            page_faults = stats.page_faults,
            tlb_hits = stats.tlb_hits,
            evictions = stats.evictions,
            "run complete"
        );
        Ok(stats)
    }

    /// Runs the stream, writing one line per translation to `out`.
    ///
    /// The summary is not written; callers choose text or JSON.
    ///
    /// # Errors
    ///
    /// As [`Simulator::run`], plus write failures on `out`.
    pub fn run_to_writer<I, W>(&mut self, addresses: I, out: &mut W) -> SimResult<TranslationStats>
    where
        I: IntoIterator<Item = SimResult<LogicalAddr>>,
        W: Write + ?Sized,
    {
        self.run(addresses, |t| {
            writeln!(out, "{t}")?;
            Ok(())
        })
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> &TranslationStats {
        self.translator.stats()
    }
}
