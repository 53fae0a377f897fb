//! Translation statistics collection and reporting.
//!
//! This module tracks the counters of a simulation run. It provides:
//! 1. **Counters:** Translated addresses, TLB hits, page-table hits, page faults, evictions.
//! 2. **Rates:** Page fault rate and TLB hit rate over all translated addresses.
//! 3. **Reporting:** The end-of-run summary in text or JSON form.

use std::io::{self, Write};

use serde::Serialize;

/// Counters accumulated by the translator.
///
/// Every translation is exactly one of a TLB hit, a page-table hit, or a
/// page fault, so the three outcome counters always sum to `total_addresses`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TranslationStats {
    /// Addresses translated.
    pub total_addresses: u64,
    /// Translations resolved by the TLB.
    pub tlb_hits: u64,
    /// Translations that missed the TLB but found the page resident.
    pub page_table_hits: u64,
    /// Translations that loaded the page from the backing store.
    pub page_faults: u64,
    /// Page faults that had to evict a resident page.
    pub evictions: u64,
}

/// Summary as written by `--stats-json`.
#[derive(Debug, Serialize)]
struct Summary<'a> {
    #[serde(flatten)]
    counters: &'a TranslationStats,
    page_fault_rate: Option<f64>,
    tlb_hit_rate: Option<f64>,
}

impl TranslationStats {
    /// `count / total_addresses`, or `None` when nothing was translated.
    fn rate(&self, count: u64) -> Option<f64> {
        (self.total_addresses > 0).then(|| count as f64 / self.total_addresses as f64)
    }

    /// Fraction of translations that page-faulted; `None` for an empty run.
    pub fn page_fault_rate(&self) -> Option<f64> {
        self.rate(self.page_faults)
    }

    /// Fraction of translations resolved by the TLB; `None` for an empty run.
    pub fn tlb_hit_rate(&self) -> Option<f64> {
        self.rate(self.tlb_hits)
    }

    /// Writes the end-of-run summary.
    ///
    /// Rates use three decimals; an empty run prints `n/a` instead of dividing by zero.
    ///
    /// # Errors
    ///
    /// Propagates write failures on `out`.
    pub fn write_summary<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        let fmt_rate = |rate: Option<f64>| rate.map_or_else(|| "n/a".to_string(), |r| format!("{r:.3}"));
        writeln!(out, "Number of Translated Addresses = {}", self.total_addresses)?;
        writeln!(out, "Page Faults = {}", self.page_faults)?;
        writeln!(out, "Page Fault Rate = {}", fmt_rate(self.page_fault_rate()))?;
        writeln!(out, "TLB Hits = {}", self.tlb_hits)?;
        writeln!(out, "TLB Hit Rate = {}", fmt_rate(self.tlb_hit_rate()))?;
        Ok(())
    }

    /// Writes the summary, including rates, as a single JSON object.
    ///
    /// # Errors
    ///
    /// Propagates serialization and write failures on `out`.
    pub fn write_json<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let summary = Summary {
            counters: self,
            page_fault_rate: self.page_fault_rate(),
            tlb_hit_rate: self.tlb_hit_rate(),
        };
        serde_json::to_writer_pretty(&mut *out, &summary)?;
        writeln!(out)
    }

    /// Prints the text summary to stdout.
    ///
    /// # Errors
    ///
    /// Propagates write failures on stdout.
    pub fn print(&self) -> io::Result<()> {
        self.write_summary(&mut io::stdout().lock())
    }
}
