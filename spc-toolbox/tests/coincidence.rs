use std::collections::{BTreeSet, HashSet};

use spc_toolbox::spc_tools::coincidence::CoincidenceTable;
use spc_toolbox::{Click, Event};

/// Deterministic pseudo random clicks with plenty of shared timestamps.
fn clicks(n: usize) -> Vec<Event> {
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut t = 0;
    (0..n)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            t += state % 3;
            Event::new(t, (state % 20) as u8 + 1, false)
        })
        .collect()
}

#[test]
fn rows_match_distinct_timestamps() {
    let events = clicks(2_000);
    let table = CoincidenceTable::from_events(&events);
    let distinct: BTreeSet<u64> = events.iter().map(|e| *e.timestamp()).collect();
    assert_eq!(table.n_rows(), distinct.len());
    assert_eq!(table.timestamps(), &distinct.into_iter().collect::<Vec<_>>()[..]);
}

#[test]
fn cells_are_true_exactly_for_observed_pairs() {
    let events = clicks(2_000);
    let table = CoincidenceTable::from_events(&events);
    let observed: HashSet<(u64, u8)> = events
        .iter()
        .map(|e| (*e.timestamp(), *e.channel()))
        .collect();

    for (row, &t) in table.timestamps().iter().enumerate() {
        for (col, &ch) in table.channels().iter().enumerate() {
            assert_eq!(table.table()[[row, col]], observed.contains(&(t, ch)));
        }
    }
}

#[test]
fn reversed_order_gives_same_table() {
    let events = clicks(500);
    let mut reversed = events.clone();
    reversed.reverse();
    assert_eq!(
        CoincidenceTable::from_events(&events),
        CoincidenceTable::from_events(&reversed)
    );
}
