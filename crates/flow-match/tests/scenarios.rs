//! End-to-end traceback scenarios over small ledgers.

use flow_ledger::{Ledger, LedgerNormalizer, RawEntry};
use flow_match::{DropReason, EngineConfig, MatchingEngine, Resolution};
use flow_paths::PathStore;
use flow_types::{Quantity, Stage};
use proptest::prelude::*;

fn entry(stage: &str, period: i64, quantity: f64, origin: &str, destination: &str) -> RawEntry {
    RawEntry {
        stage: stage.into(),
        period,
        quantity,
        origin: origin.into(),
        destination: destination.into(),
    }
}

fn ledger(entries: Vec<RawEntry>) -> Ledger {
    LedgerNormalizer::default().normalize_entries(entries).unwrap()
}

fn trace(entries: Vec<RawEntry>) -> MatchingEngine {
    MatchingEngine::trace(&ledger(entries), EngineConfig::default()).unwrap()
}

fn q(v: f64) -> Quantity {
    Quantity::from_f64(v).unwrap()
}

fn stages_of(store: &PathStore, path: usize, segment: usize) -> Vec<Option<Stage>> {
    let (id, _) = store.paths().nth(path).unwrap();
    store.segments_of(id).unwrap()[segment]
        .slots()
        .into_iter()
        .map(|slot| slot.map(|hop| hop.stage))
        .collect()
}

#[test]
fn scenario_a_exact_match() {
    let engine = trace(vec![
        entry("Forwarding", 1, 10.0, "NL", "X"),
        entry("Delivery", 2, 10.0, "X", "FR"),
    ]);
    let store = engine.store();
    assert_eq!(store.path_count(), 1);
    assert_eq!(store.segment_count(), 1);
    assert_eq!(
        stages_of(store, 0, 0),
        vec![Some(Stage::Forwarding), Some(Stage::Delivery)]
    );
    assert_eq!(engine.stats().exact_matches, 1);
}

#[test]
fn scenario_b_split() {
    let engine = trace(vec![
        entry("Forwarding", 1, 4.0, "NL", "X"),
        entry("Delivery", 2, 10.0, "X", "FR"),
    ]);
    let store = engine.store();
    let (id, path) = store.paths().next().unwrap();
    assert_eq!(path.len(), 2);

    let segments = store.segments_of(id).unwrap();
    assert_eq!(segments[0].open_quantity(), Some(q(6.0)));
    assert_eq!(segments[0].pending_quantity(), Some(q(10.0)));
    assert_eq!(segments[1].open_quantity(), Some(q(4.0)));
    assert_eq!(
        stages_of(store, 0, 1),
        vec![Some(Stage::Forwarding), None]
    );
}

#[test]
fn scenario_c_unattributable_destination() {
    let mut engine = MatchingEngine::default();
    let l = ledger(vec![entry("Delivery", 2, 10.0, "X", "FR")]);
    for tx in l.newest_first() {
        engine.process(tx).unwrap();
    }
    let before = engine.store().to_string();

    let stray = ledger(vec![entry("Forwarding", 1, 10.0, "NL", "Y")]);
    let res = engine.process(&stray.transactions()[0]).unwrap();
    assert_eq!(res, Resolution::Dropped(DropReason::NoCandidate));
    assert_eq!(engine.store().to_string(), before);
}

#[test]
fn scenario_d_over_demand() {
    let engine = trace(vec![
        entry("Forwarding", 1, 12.0, "NL", "X"),
        entry("Delivery", 2, 10.0, "X", "FR"),
    ]);
    let store = engine.store();
    assert_eq!(store.segment_count(), 1);
    assert_eq!(stages_of(store, 0, 0), vec![Some(Stage::Delivery)]);
    assert_eq!(engine.stats().dropped_over_demand, 1);
}

#[test]
fn split_then_heal_restores_pre_split_quantity() {
    // The 4.00 forwarding splits the delivery. The remaining 6.00 is then
    // covered exactly, which records the full 10.00 in the frozen history.
    let engine = trace(vec![
        entry("Forwarding", 1, 6.0, "BE", "X"),
        entry("Forwarding", 2, 4.0, "NL", "X"),
        entry("Delivery", 3, 10.0, "X", "FR"),
    ]);
    let store = engine.store();
    let (id, _) = store.paths().next().unwrap();
    let segments = store.segments_of(id).unwrap();

    let healed = &segments[0];
    assert_eq!(healed.pending_quantity(), None);
    let slots = healed.slots();
    assert_eq!(slots[0].as_ref().unwrap().quantity, q(6.0));
    assert_eq!(slots[1].as_ref().unwrap().quantity, q(10.0));
    assert_eq!(engine.stats().splits, 1);
    assert_eq!(engine.stats().exact_matches, 1);
}

#[test]
fn sibling_grows_on_its_own_origin() {
    let engine = trace(vec![
        entry("Treatment", 1, 4.0, "BR", "NL"),
        entry("Forwarding", 2, 4.0, "NL", "X"),
        entry("Delivery", 3, 10.0, "X", "FR"),
    ]);
    let store = engine.store();
    assert_eq!(
        stages_of(store, 0, 1),
        vec![Some(Stage::Treatment), Some(Stage::Forwarding), None]
    );
    assert_eq!(stages_of(store, 0, 0), vec![Some(Stage::Delivery)]);
}

#[test]
fn separable_merge_within_one_path() {
    // Two splits leave [X 5.00, NL 2.00, NL 3.00]. The treatment hop of 3.00
    // into NL is explained by the second sibling alone.
    let engine = trace(vec![
        entry("Treatment", 1, 3.0, "BR", "NL"),
        entry("Forwarding", 2, 2.0, "NL", "X"),
        entry("Forwarding", 2, 3.0, "NL", "X"),
        entry("Delivery", 3, 10.0, "X", "FR"),
    ]);
    let store = engine.store();
    let (id, path) = store.paths().next().unwrap();
    assert_eq!(path.len(), 3);

    let segments = store.segments_of(id).unwrap();
    assert_eq!(segments[0].open_quantity(), Some(q(5.0)));
    assert_eq!(segments[1].open_quantity(), Some(q(2.0)));
    assert_eq!(
        stages_of(store, 0, 1),
        vec![Some(Stage::Forwarding), None]
    );
    assert_eq!(
        stages_of(store, 0, 2),
        vec![Some(Stage::Treatment), Some(Stage::Forwarding), None]
    );
    assert_eq!(engine.stats().separable_matches, 1);
    assert_eq!(engine.stats().splits, 2);
}

#[test]
fn multi_segment_exact_merge_retires_sibling() {
    // Both branches end up arriving from BR, so the sourcing hop into BR
    // covers them together and the sibling is retired.
    let engine = trace(vec![
        entry("Sourcing", 1, 10.0, "CL", "BR"),
        entry("Treatment", 2, 3.0, "BR", "NL"),
        entry("Treatment", 2, 7.0, "BR", "X"),
        entry("Forwarding", 3, 3.0, "NL", "X"),
        entry("Delivery", 4, 10.0, "X", "FR"),
    ]);
    let store = engine.store();
    let (id, path) = store.paths().next().unwrap();
    assert_eq!(path.len(), 2);
    let segments = store.segments_of(id).unwrap();

    let grown = &segments[0];
    assert_eq!(grown.open_quantity(), Some(q(10.0)));
    assert_eq!(
        stages_of(store, 0, 0),
        vec![
            Some(Stage::Sourcing),
            Some(Stage::Treatment),
            Some(Stage::Delivery)
        ]
    );

    let retired = &segments[1];
    assert!(retired.is_retired());
    assert_eq!(
        stages_of(store, 0, 1),
        vec![
            None,
            Some(Stage::Treatment),
            Some(Stage::Forwarding),
            None
        ]
    );
}

#[test]
fn tie_quantities_round_to_even_before_matching() {
    // Both 0.125 hops round to 0.12, so each splits the delivery and 0.01
    // stays open instead of the second hop being dropped.
    let engine = trace(vec![
        entry("Forwarding", 1, 0.125, "NL", "X"),
        entry("Forwarding", 1, 0.125, "BE", "X"),
        entry("Delivery", 2, 0.25, "X", "FR"),
    ]);
    assert_eq!(engine.stats().splits, 2);
    assert_eq!(engine.stats().dropped(), 0);

    let store = engine.store();
    let (id, path) = store.paths().next().unwrap();
    assert_eq!(path.len(), 3);
    let open: Vec<Option<Quantity>> = store
        .segments_of(id)
        .unwrap()
        .iter()
        .map(|s| s.open_quantity())
        .collect();
    assert_eq!(
        open,
        vec![
            Some(Quantity::from_hundredths(1)),
            Some(Quantity::from_hundredths(12)),
            Some(Quantity::from_hundredths(12))
        ]
    );
}

#[test]
fn tracing_twice_is_deterministic() {
    let entries = vec![
        entry("Sourcing", 1, 10.0, "CL", "BR"),
        entry("Treatment", 2, 3.0, "BR", "NL"),
        entry("Treatment", 2, 7.0, "BR", "X"),
        entry("Forwarding", 3, 3.0, "NL", "X"),
        entry("Forwarding", 3, 1.5, "PT", "Y"),
        entry("Delivery", 4, 10.0, "X", "FR"),
        entry("Delivery", 4, 1.5, "Y", "ES"),
    ];
    let a = trace(entries.clone()).store().to_string();
    let b = trace(entries).store().to_string();
    assert_eq!(a, b);
}

fn arb_entry() -> impl Strategy<Value = RawEntry> {
    let stages = prop::sample::select(vec![
        "Sourcing",
        "Conditioning",
        "Treatment",
        "Forwarding",
        "Delivery",
    ]);
    let countries = prop::sample::select(vec!["A", "B", "C"]);
    (stages, 1i64..6, 1i64..8, countries.clone(), countries).prop_map(
        |(stage, period, quantity, origin, destination)| {
            entry(stage, period, quantity as f64, origin, destination)
        },
    )
}

proptest! {
    #[test]
    fn stages_strictly_increase_toward_delivery(entries in prop::collection::vec(arb_entry(), 0..14)) {
        let engine = trace(entries);
        let store = engine.store();
        for (id, _) in store.paths() {
            for segment in store.segments_of(id).unwrap() {
                let stages: Vec<Stage> = segment
                    .slots()
                    .into_iter()
                    .flatten()
                    .map(|hop| hop.stage)
                    .collect();
                prop_assert!(stages.windows(2).all(|w| w[0] < w[1]), "{:?}", stages);
                prop_assert!(segment.depth() <= 5);
            }
        }
    }

    #[test]
    fn identical_ledgers_trace_identically(entries in prop::collection::vec(arb_entry(), 0..14)) {
        let a = trace(entries.clone());
        let b = trace(entries);
        prop_assert_eq!(a.store().to_string(), b.store().to_string());
        prop_assert_eq!(a.stats(), b.stats());
    }
}
