//! # Simulator Run Loop Tests
//!
//! Drives whole address streams through the simulator and checks the
//! per-address report lines, the returned counters, error propagation
//! and verification mode.

use std::io::{Cursor, Write};

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;
use vmsim_core::Simulator;
use vmsim_core::common::addr::LogicalAddr;
use vmsim_core::common::error::SimError;
use vmsim_core::config::ReplacementPolicy;
use vmsim_core::sim::{AddressReader, open_addresses};

use crate::common::harness::{Machine, init_tracing, pattern_value, store_with_first_bytes};

fn stream(addrs: &[u32]) -> impl Iterator<Item = Result<LogicalAddr, SimError>> + '_ {
    addrs.iter().map(|&a| Ok(LogicalAddr(a)))
}

#[test]
fn run_to_writer_emits_one_line_per_address() {
    init_tracing();
    let machine = Machine {
        page_size: 1024,
        pages: 1024,
        frames: 2,
        tlb_size: 2,
        policy: ReplacementPolicy::Fifo,
    };
    let store = store_with_first_bytes(1024, 1024, &[1, 2, 3]);
    let mut sim = Simulator::new(&machine.config(), store).unwrap();

    let mut out = Vec::new();
    let stats = sim.run_to_writer(stream(&[0, 1024, 2048, 0]), &mut out).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Virtual address: 0 Physical address: 0 Value: 1\n\
         Virtual address: 1024 Physical address: 1024 Value: 2\n\
         Virtual address: 2048 Physical address: 0 Value: 3\n\
         Virtual address: 0 Physical address: 1024 Value: 1\n"
    );
    assert_eq!(stats.total_addresses, 4);
    assert_eq!(stats.page_faults, 4);
    assert_eq!(stats.tlb_hits, 0);
    assert_eq!(*sim.stats(), stats);
}

#[test]
fn run_reads_address_file() {
    let machine = Machine::reference(256, ReplacementPolicy::Lru);
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "16916\n62493\n\n16916").unwrap();
    file.flush().unwrap();

    let mut sim = Simulator::new(&machine.config(), machine.store()).unwrap();
    let mut seen = Vec::new();
    let stats = sim
        .run(open_addresses(file.path()).unwrap(), |t| {
            seen.push((t.logical.val(), t.value));
            Ok(())
        })
        .unwrap();

    assert_eq!(
        seen,
        vec![
            (16916, pattern_value(LogicalAddr(16916), 1024)),
            (62493, pattern_value(LogicalAddr(62493), 1024)),
            (16916, pattern_value(LogicalAddr(16916), 1024)),
        ]
    );
    assert_eq!(stats.total_addresses, 3);
    assert_eq!(stats.page_faults, 2);
    assert_eq!(stats.tlb_hits, 1);
}

#[test]
fn empty_stream_yields_zero_counters() {
    let machine = Machine::tiny(4, 2, 2, ReplacementPolicy::Fifo);
    let mut sim = Simulator::new(&machine.config(), machine.store()).unwrap();
    let mut out = Vec::new();
    let stats = sim.run_to_writer(stream(&[]), &mut out).unwrap();
    assert!(out.is_empty());
    assert_eq!(stats.total_addresses, 0);
    assert_eq!(stats.page_fault_rate(), None);
}

/// Output written before the bad record is kept; nothing after it runs.
#[test]
fn malformed_record_stops_run() {
    let machine = Machine::tiny(4, 2, 2, ReplacementPolicy::Fifo);
    let mut sim = Simulator::new(&machine.config(), machine.store()).unwrap();
    let input = AddressReader::new(Cursor::new("1\n2\nthree\n4\n"));

    let mut out = Vec::new();
    let err = sim.run_to_writer(input, &mut out).unwrap_err();

    assert!(matches!(err, SimError::MalformedInput { line: 3, .. }));
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
    assert_eq!(sim.stats().total_addresses, 2);
}

#[test]
fn out_of_range_address_stops_run() {
    let machine = Machine::tiny(4, 2, 2, ReplacementPolicy::Fifo);
    let mut sim = Simulator::new(&machine.config(), machine.store()).unwrap();
    let err = sim
        .run(stream(&[3, 64, 5]), |_| Ok(()))
        .unwrap_err();
    assert!(matches!(err, SimError::AddressOutOfRange { addr: 64, .. }));
    assert_eq!(sim.stats().total_addresses, 1);
}

#[test]
fn sink_error_is_propagated() {
    let machine = Machine::tiny(4, 2, 2, ReplacementPolicy::Fifo);
    let mut sim = Simulator::new(&machine.config(), machine.store()).unwrap();
    let mut calls = 0;
    let err = sim
        .run(stream(&[0, 16, 32]), |_| {
            calls += 1;
            Err(SimError::Config("sink closed".into()))
        })
        .unwrap_err();
    assert!(matches!(err, SimError::Config(_)));
    assert_eq!(calls, 1);
}

#[test]
fn verify_mode_runs_clean_over_thrashing_stream() {
    let machine = Machine::tiny(8, 3, 2, ReplacementPolicy::Lru);
    let mut config = machine.config();
    config.general.verify = true;
    let mut sim = Simulator::new(&config, machine.store()).unwrap();

    let addrs: Vec<u32> = (0..400).map(|i| (i * 37) % 128).collect();
    let stats = sim.run(stream(&addrs), |_| Ok(())).unwrap();
    assert_eq!(stats.total_addresses, 400);
    assert!(stats.evictions > 0);
}

#[test]
fn step_translates_single_address() {
    let machine = Machine::tiny(4, 2, 2, ReplacementPolicy::Fifo);
    let mut sim = Simulator::new(&machine.config(), machine.store()).unwrap();
    let t = sim.step(machine.addr(3, 2)).unwrap();
    assert_eq!(t.page, 3);
    assert_eq!(t.value, pattern_value(machine.addr(3, 2), 16));
    assert!(sim.translator.state().page_table.lookup(3).is_some());
}

#[test]
fn invalid_config_is_rejected() {
    let machine = Machine::tiny(4, 0, 2, ReplacementPolicy::Fifo);
    assert!(matches!(
        Simulator::new(&machine.config(), machine.store()),
        Err(SimError::Config(_))
    ));
}
