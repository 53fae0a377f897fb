//! Translator Tests.
//!
//! End-to-end translation scenarios: fault, TLB hit and page-table hit
//! paths, FIFO against LRU on the same stream, backing-store access
//! patterns (checked with a mock store), and error paths that must leave
//! the simulation state untouched.

use mockall::Sequence;
use pretty_assertions::assert_eq;
use rstest::rstest;
use vmsim_core::common::addr::{LogicalAddr, PhysAddr};
use vmsim_core::common::error::{BackingStoreError, SimError};
use vmsim_core::config::{ReplacementPolicy, TlbInsertPolicy};
use vmsim_core::core::{Translation, TranslationOutcome, Translator};
use vmsim_core::soc::{BackingStore, MemoryBackingStore};

use crate::common::harness::{Machine, init_tracing, pattern_value, store_with_first_bytes};
use crate::common::mocks::backing_store::MockStore;

/// Translates every address, panicking on error.
fn run_all<B: BackingStore>(translator: &mut Translator<B>, addrs: &[u32]) -> Vec<Translation> {
    addrs
        .iter()
        .map(|&a| translator.translate(LogicalAddr(a)).unwrap())
        .collect()
}

// ══════════════════════════════════════════════════════════
// 1. Reference Scenarios
// ══════════════════════════════════════════════════════════

/// Two frames, FIFO, pages 0, 1, 2 then 0 again: page 0 has been
/// evicted by the time it is revisited, so every access faults.
#[test]
fn fifo_two_frames_refault_after_eviction() {
    init_tracing();
    let machine = Machine {
        page_size: 1024,
        pages: 1024,
        frames: 2,
        tlb_size: 2,
        policy: ReplacementPolicy::Fifo,
    };
    let store = store_with_first_bytes(1024, 1024, &[1, 2, 3]);
    let mut translator = Translator::new(&machine.config(), store).unwrap();

    let out = run_all(&mut translator, &[0, 1024, 2048, 0]);

    let frames: Vec<u32> = out.iter().map(|t| t.frame).collect();
    let values: Vec<i8> = out.iter().map(|t| t.value).collect();
    let physical: Vec<PhysAddr> = out.iter().map(|t| t.physical).collect();
    assert_eq!(frames, vec![0, 1, 0, 1]);
    assert_eq!(values, vec![1, 2, 3, 1]);
    assert_eq!(
        physical,
        vec![PhysAddr(0), PhysAddr(1024), PhysAddr(0), PhysAddr(1024)]
    );
    assert_eq!(
        out[2].outcome,
        TranslationOutcome::PageFault { evicted: Some(0) }
    );
    assert_eq!(
        out[3].outcome,
        TranslationOutcome::PageFault { evicted: Some(1) }
    );

    let stats = translator.stats();
    assert_eq!(stats.total_addresses, 4);
    assert_eq!(stats.page_faults, 4);
    assert_eq!(stats.tlb_hits, 0);
    assert_eq!(stats.evictions, 2);
    translator.check_consistency().unwrap();
}

#[test]
fn first_reference_addresses() {
    let machine = Machine::reference(256, ReplacementPolicy::Fifo);
    let mut translator = machine.translator();

    let a = translator.translate(LogicalAddr(16_916)).unwrap();
    assert_eq!((a.page, a.frame), (16, 0));
    assert_eq!(a.physical, PhysAddr(532));
    assert_eq!(a.value, pattern_value(LogicalAddr(16_916), 1024));
    assert!(a.is_page_fault());

    let b = translator.translate(LogicalAddr(62_493)).unwrap();
    assert_eq!((b.page, b.frame), (61, 1));
    assert_eq!(b.physical, PhysAddr(1024 + 29));
    assert_eq!(b.value, pattern_value(LogicalAddr(62_493), 1024));
}

#[test]
fn display_matches_report_line() {
    let machine = Machine::reference(256, ReplacementPolicy::Fifo);
    let mut translator = machine.translator();
    let t = translator.translate(LogicalAddr(16_916)).unwrap();
    assert_eq!(
        t.to_string(),
        format!(
            "Virtual address: 16916 Physical address: 532 Value: {}",
            t.value
        )
    );
}

// ══════════════════════════════════════════════════════════
// 2. Resolution Paths
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(ReplacementPolicy::Fifo)]
#[case(ReplacementPolicy::Lru)]
fn repeated_address_hits_tlb_with_same_result(#[case] policy: ReplacementPolicy) {
    let mut translator = Machine::tiny(8, 4, 4, policy).translator();
    let first = translator.translate(LogicalAddr(37)).unwrap();
    let second = translator.translate(LogicalAddr(37)).unwrap();

    assert!(first.is_page_fault());
    assert!(second.is_tlb_hit());
    assert_eq!(first.physical, second.physical);
    assert_eq!(first.value, second.value);
    assert_eq!(translator.stats().tlb_hits, 1);
}

/// A one-entry TLB forgets page 0 when page 1 is loaded; the page
/// table still has it.
#[test]
fn tlb_miss_on_resident_page_is_page_table_hit() {
    let machine = Machine::tiny(8, 4, 1, ReplacementPolicy::Fifo);
    let mut translator = machine.translator();
    let _ = translator.translate(machine.addr(0, 1)).unwrap();
    let _ = translator.translate(machine.addr(1, 1)).unwrap();

    let t = translator.translate(machine.addr(0, 5)).unwrap();
    assert_eq!(t.outcome, TranslationOutcome::PageTableHit);
    assert_eq!(t.frame, 0);
    assert_eq!(t.value, pattern_value(machine.addr(0, 5), 16));
    assert_eq!(translator.state().tlb.lookup(0), Some(0));
    assert_eq!(translator.stats().page_table_hits, 1);
}

#[test]
fn eviction_invalidates_victim_in_tlb() {
    let machine = Machine::tiny(8, 2, 4, ReplacementPolicy::Fifo);
    let mut translator = machine.translator();
    for page in [0, 1, 2] {
        let _ = translator.translate(machine.addr(page, 0)).unwrap();
    }
    let state = translator.state();
    assert_eq!(state.tlb.lookup(0), None);
    assert_eq!(state.page_table.lookup(0), None);
    assert_eq!(state.tlb.lookup(2), Some(0));
    translator.check_consistency().unwrap();
}

/// LRU evicts page 1 to load page 2 into frame 1. Page 2 takes the slot
/// page 1 held, so page 0 keeps its TLB entry and the revisit hits.
#[test]
fn evicted_frame_reuses_victim_tlb_slot() {
    let machine = Machine {
        page_size: 1024,
        pages: 3,
        frames: 2,
        tlb_size: 2,
        policy: ReplacementPolicy::Lru,
    };
    let mut translator = machine.translator();
    let out = run_all(&mut translator, &[0, 1024, 0, 2048, 0]);

    assert_eq!(
        out[3].outcome,
        TranslationOutcome::PageFault { evicted: Some(1) }
    );
    assert_eq!(out[3].frame, 1);
    assert_eq!(out[4].outcome, TranslationOutcome::TlbHit);

    let tlb = &translator.state().tlb;
    assert_eq!(tlb.entries()[0].page, 0);
    assert_eq!(tlb.entries()[1].page, 2);
    assert_eq!(tlb.len(), 2);
    assert_eq!(translator.stats().tlb_hits, 2);
    translator.check_consistency().unwrap();
}

/// Pages 0, 1, 0, 2, 0 with two frames: FIFO throws out the hot page,
/// LRU keeps it.
#[rstest]
#[case(ReplacementPolicy::Fifo, 4, Some(0))]
#[case(ReplacementPolicy::Lru, 3, Some(1))]
fn fifo_and_lru_diverge(
    #[case] policy: ReplacementPolicy,
    #[case] faults: u64,
    #[case] first_victim: Option<u32>,
) {
    let machine = Machine::tiny(8, 2, 4, policy);
    let mut translator = machine.translator();
    let out: Vec<_> = [0, 1, 0, 2, 0]
        .into_iter()
        .map(|p| translator.translate(machine.addr(p, 3)).unwrap())
        .collect();

    assert_eq!(
        out[3].outcome,
        TranslationOutcome::PageFault {
            evicted: first_victim
        }
    );
    assert_eq!(translator.stats().page_faults, faults);
    for t in &out {
        assert_eq!(t.value, pattern_value(t.logical, 16));
    }
}

#[test]
fn circular_tlb_without_eviction() {
    let mut config = Machine::tiny(4, 4, 2, ReplacementPolicy::Fifo).config();
    config.tlb.insert_policy = TlbInsertPolicy::Circular;
    let store = Machine::tiny(4, 4, 2, ReplacementPolicy::Fifo).store();
    let mut translator = Translator::new(&config, store).unwrap();

    let out = run_all(&mut translator, &[0, 16, 32, 0, 48, 16]);
    // Page 2 took slot 0 from page 0, and page 0 comes back through the table.
    assert_eq!(out[3].outcome, TranslationOutcome::PageTableHit);
    assert_eq!(translator.stats().page_faults, 4);
    assert_eq!(translator.stats().evictions, 0);
    translator.check_consistency().unwrap();
}

#[test]
fn circular_tlb_with_eviction_is_rejected() {
    let mut config = Machine::tiny(8, 2, 2, ReplacementPolicy::Fifo).config();
    config.tlb.insert_policy = TlbInsertPolicy::Circular;
    let store = Machine::tiny(8, 2, 2, ReplacementPolicy::Fifo).store();
    assert!(matches!(
        Translator::new(&config, store),
        Err(SimError::Config(_))
    ));
}

// ══════════════════════════════════════════════════════════
// 3. Backing Store Access
// ══════════════════════════════════════════════════════════

/// Every fault reads exactly one page-sized block at `page * page_size`;
/// hits never touch the store.
#[test]
fn faults_read_one_aligned_block_each() {
    let machine = Machine::tiny(8, 4, 4, ReplacementPolicy::Fifo);
    let mut seq = Sequence::new();
    let mut store = MockStore::new();
    let _ = store.expect_len().return_const(8u64 * 16);
    for (page, fill) in [(2u64, 20u8), (5, 50)] {
        let _ = store
            .expect_read_block()
            .withf(move |offset, buf| *offset == page * 16 && buf.len() == 16)
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, buf| {
                buf.fill(fill);
                Ok(())
            });
    }

    let mut translator = Translator::new(&machine.config(), store).unwrap();
    let addrs = [
        machine.addr(2, 0),
        machine.addr(2, 9),
        machine.addr(5, 15),
        machine.addr(2, 1),
    ];
    let values: Vec<i8> = addrs
        .into_iter()
        .map(|a| translator.translate(a).unwrap().value)
        .collect();
    assert_eq!(values, vec![20, 20, 50, 20]);
}

#[test]
fn failed_read_leaves_state_unchanged() {
    let machine = Machine::tiny(8, 2, 2, ReplacementPolicy::Lru);
    let mut store = MockStore::new();
    let _ = store.expect_len().return_const(8u64 * 16);
    let _ = store
        .expect_read_block()
        .withf(|offset, _| *offset == 0)
        .returning(|_, buf| {
            buf.fill(1);
            Ok(())
        });
    let _ = store
        .expect_read_block()
        .withf(|offset, _| *offset == 16)
        .returning(|_, _| {
            Err(BackingStoreError::Io(std::io::Error::other("disk gone")))
        });

    let mut translator = Translator::new(&machine.config(), store).unwrap();
    let _ = translator.translate(machine.addr(0, 0)).unwrap();
    let before = *translator.stats();

    let err = translator.translate(machine.addr(1, 0)).unwrap_err();
    assert!(matches!(err, SimError::BackingStore { page: 1, .. }));

    let state = translator.state();
    assert_eq!(*translator.stats(), before);
    assert_eq!(state.page_table.resident_count(), 1);
    assert_eq!(state.page_table.lookup(1), None);
    assert_eq!(state.frames.free_frames(), 1);
    assert_eq!(state.frames.resident(), 1);
    assert_eq!(state.tlb.len(), 1);
    translator.check_consistency().unwrap();
}

#[test]
fn short_store_reports_out_of_bounds_page() {
    let machine = Machine::tiny(4, 4, 2, ReplacementPolicy::Fifo);
    let store = MemoryBackingStore::new(vec![9; 32]);
    let mut translator = Translator::new(&machine.config(), store).unwrap();

    assert_eq!(translator.translate(machine.addr(1, 0)).unwrap().value, 9);
    match translator.translate(machine.addr(3, 0)) {
        Err(SimError::BackingStore {
            page: 3,
            source: BackingStoreError::OutOfBounds { offset, len, size },
        }) => assert_eq!((offset, len, size), (48, 16, 32)),
        other => panic!("expected out-of-bounds read, got {other:?}"),
    }
    assert_eq!(translator.state().page_table.resident_count(), 1);
}

// ══════════════════════════════════════════════════════════
// 4. Address Range
// ══════════════════════════════════════════════════════════

#[test]
fn address_past_space_is_rejected_without_side_effects() {
    let machine = Machine::tiny(4, 2, 2, ReplacementPolicy::Fifo);
    let mut translator = machine.translator();
    match translator.translate(LogicalAddr(64)) {
        Err(SimError::AddressOutOfRange { addr, limit }) => {
            assert_eq!(addr, 64);
            assert_eq!(limit, 64);
        }
        other => panic!("expected out-of-range, got {other:?}"),
    }
    assert_eq!(translator.stats().total_addresses, 0);
    assert_eq!(translator.state().page_table.resident_count(), 0);

    assert!(translator.translate(LogicalAddr(63)).is_ok());
}

#[test]
fn last_byte_of_address_space_translates() {
    let machine = Machine::reference(4, ReplacementPolicy::Lru);
    let mut translator = machine.translator();
    let t = translator.translate(LogicalAddr(1_048_575)).unwrap();
    assert_eq!(t.page, 1023);
    assert_eq!(t.physical, PhysAddr(1023));
    assert_eq!(t.value, pattern_value(LogicalAddr(1_048_575), 1024));
}
