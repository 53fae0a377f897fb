//! Virtual memory simulator CLI.
//!
//! This binary translates a file of logical addresses against a backing store. It performs:
//! 1. **Configuration:** Built-in defaults, an optional JSON config file, then flag overrides.
//! 2. **Translation:** One output line per address (`Virtual address: .. Physical address: .. Value: ..`).
//! 3. **Summary:** Address count, page faults, TLB hits and their rates, as text or JSON.
//!
//! Logs go to stderr (`-v` or `RUST_LOG`), so stdout only carries the report.

use std::error::Error;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use vmsim_core::Simulator;
use vmsim_core::common::error::{SimError, SimResult};
use vmsim_core::config::{Config, ReplacementPolicy, TlbInsertPolicy};
use vmsim_core::sim::open_addresses;
use vmsim_core::soc::{BackingStore, FileBackingStore, MemoryBackingStore};

#[derive(Parser, Debug)]
#[command(
    name = "vmsim",
    author,
    version,
    about = "Paged virtual memory simulator (TLB, page table, FIFO/LRU demand paging)",
    long_about = "Translate logical addresses read from INPUT, one decimal address per line, \
loading pages on demand from BACKING_STORE.\n\nExamples:\n  vmsim BACKING_STORE.bin addresses.txt\n  vmsim -p 1 BACKING_STORE.bin addresses.txt\n  vmsim --policy lru --frames 128 --stats-json BACKING_STORE.bin addresses.txt"
)]
struct Cli {
    /// Backing store file (page_count * page_size bytes).
    backing_store: PathBuf,

    /// Address file, one decimal logical address per line.
    input: PathBuf,

    /// Page replacement policy: 0/fifo or 1/lru.
    #[arg(short, long, value_parser = parse_policy)]
    policy: Option<ReplacementPolicy>,

    /// Number of physical frames.
    #[arg(short, long)]
    frames: Option<u32>,

    /// Page (and frame) size in bytes; a power of two.
    #[arg(long)]
    page_size: Option<u32>,

    /// Number of logical pages.
    #[arg(long)]
    pages: Option<u32>,

    /// Number of TLB entries.
    #[arg(long)]
    tlb_size: Option<usize>,

    /// TLB insertion policy: circular or frame-aware.
    #[arg(long, value_parser = parse_tlb_policy)]
    tlb_policy: Option<TlbInsertPolicy>,

    /// JSON configuration file; flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the summary as JSON.
    #[arg(long)]
    stats_json: bool,

    /// Check TLB/page-table consistency after every translation.
    #[arg(long)]
    verify: bool,

    /// Read the backing store with seek/read instead of loading it into memory.
    #[arg(long)]
    stream_file: bool,

    /// Log every translation (implies trace-level logging).
    #[arg(long)]
    trace: bool,

    /// Debug-level logging on stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_policy(s: &str) -> Result<ReplacementPolicy, String> {
    s.parse().map_err(|e: SimError| e.to_string())
}

fn parse_tlb_policy(s: &str) -> Result<TlbInsertPolicy, String> {
    s.parse().map_err(|e: SimError| e.to_string())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(e) = run(&cli) {
        eprintln!("[!] FATAL: {e}");
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("    caused by: {cause}");
            source = cause.source();
        }
        process::exit(1);
    }
}

/// Installs the stderr subscriber; `RUST_LOG` wins over the flags.
fn init_tracing(cli: &Cli) {
    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Defaults, then the config file, then individual flags.
fn build_config(cli: &Cli) -> SimResult<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(policy) = cli.policy {
        config.memory.policy = policy;
    }
    if let Some(frames) = cli.frames {
        config.memory.frame_count = frames;
    }
    if let Some(page_size) = cli.page_size {
        config.memory.page_size = page_size;
    }
    if let Some(pages) = cli.pages {
        config.memory.page_count = pages;
    }
    if let Some(size) = cli.tlb_size {
        config.tlb.size = size;
    }
    if let Some(tlb_policy) = cli.tlb_policy {
        config.tlb.insert_policy = tlb_policy;
    }
    config.general.verify |= cli.verify;
    config.general.trace_translations |= cli.trace;
    config.validate()?;
    debug!(?config, "effective configuration");
    Ok(config)
}

fn run(cli: &Cli) -> SimResult<()> {
    let config = build_config(cli)?;

    let backing: Box<dyn BackingStore> = if cli.stream_file {
        Box::new(FileBackingStore::open(&cli.backing_store)?)
    } else {
        Box::new(MemoryBackingStore::from_file(&cli.backing_store)?)
    };
    debug!(
        store = %cli.backing_store.display(),
        len = backing.len(),
        streaming = cli.stream_file,
        "backing store opened"
    );
    let addresses = open_addresses(&cli.input)?;

    let mut sim = Simulator::new(&config, backing)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let stats = sim.run_to_writer(addresses, &mut out)?;
    if cli.stats_json {
        stats.write_json(&mut out)?;
    } else {
        stats.write_summary(&mut out)?;
    }
    out.flush()?;
    Ok(())
}
