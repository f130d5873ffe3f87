use std::collections::BTreeSet;

use ndarray::{Array2, ArrayView1, Axis};

use crate::errors::Error;
use crate::headers::File;
use crate::{Click, Event};

/// Events folded into one row per distinct timestamp.
///
/// Columns are the distinct channels seen in the events, in ascending order.
/// Rows are the distinct timestamps, also ascending. A cell is true when at
/// least one event has that timestamp and channel.
#[derive(Debug, Clone, PartialEq)]
pub struct CoincidenceTable {
    timestamps: Vec<u64>,
    channels: Vec<u8>,
    table: Array2<bool>,
}

impl CoincidenceTable {
    /// Build the table from events in any order.
    ///
    /// Events sharing a timestamp are clicks on different detectors at the same
    /// time. They are grouped and their channel flags OR-ed into a single row, so
    /// no click ever overwrites another.
    pub fn from_events(events: &[Event]) -> Self {
        let channels: Vec<u8> = events
            .iter()
            .map(|e| *e.channel())
            .collect::<BTreeSet<u8>>()
            .into_iter()
            .collect();

        let mut clicks: Vec<(u64, u8)> = events
            .iter()
            .map(|e| (*e.timestamp(), *e.channel()))
            .collect();
        clicks.sort_unstable();

        let mut timestamps: Vec<u64> = clicks.iter().map(|&(t, _)| t).collect();
        timestamps.dedup();

        let mut table = Array2::<bool>::default((timestamps.len(), channels.len()));
        let mut row = 0;
        for (i, &(t, ch)) in clicks.iter().enumerate() {
            // Sorted clicks: a new timestamp opens the next row.
            if i > 0 && t != clicks[i - 1].0 {
                row += 1;
            }
            // `channels` holds every channel in `clicks`, so the lookup always succeeds.
            if let Ok(col) = channels.binary_search(&ch) {
                table[[row, col]] = true;
            }
        }

        Self {
            timestamps,
            channels,
            table,
        }
    }

    pub fn timestamps(&self) -> &[u64] {
        &self.timestamps
    }

    pub fn channels(&self) -> &[u8] {
        &self.channels
    }

    /// Rows are timestamps and columns channels.
    pub fn table(&self) -> &Array2<bool> {
        &self.table
    }

    pub fn n_rows(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Channel flags at `timestamp`, if any event happened then.
    pub fn row(&self, timestamp: u64) -> Option<ArrayView1<bool>> {
        let idx = self.timestamps.binary_search(&timestamp).ok()?;
        Some(self.table.index_axis(Axis(0), idx))
    }

    /// Whether `channel` clicked at `timestamp`.
    pub fn is_set(&self, timestamp: u64, channel: u8) -> bool {
        let col = match self.channels.binary_search(&channel) {
            Ok(col) => col,
            Err(_) => return false,
        };
        self.row(timestamp).map(|row| row[col]).unwrap_or(false)
    }

    /// Timestamps where two or more channels clicked.
    pub fn multi_click_rows(&self) -> Vec<u64> {
        self.table
            .axis_iter(Axis(0))
            .zip(self.timestamps.iter())
            .filter(|(row, _)| row.iter().filter(|&&x| x).count() > 1)
            .map(|(_, &t)| t)
            .collect()
    }

    /// Number of rows in which each channel clicked.
    pub fn column_counts(&self) -> Vec<(u8, usize)> {
        self.table
            .axis_iter(Axis(1))
            .zip(self.channels.iter())
            .map(|(col, &ch)| (ch, col.iter().filter(|&&x| x).count()))
            .collect()
    }
}

/// Coincidence table of every event in a file.
pub fn coincidences(f: &File) -> Result<CoincidenceTable, Error> {
    match f {
        File::SPC(x) => {
            let decoded = x.decode()?;
            Ok(CoincidenceTable::from_events(&decoded.events))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coincident_clicks_share_a_row() {
        let events = vec![Event::new(5, 3, false), Event::new(5, 7, false)];
        let table = CoincidenceTable::from_events(&events);

        assert_eq!(table.n_rows(), 1);
        assert_eq!(table.channels(), &[3, 7]);
        assert!(table.is_set(5, 3));
        assert!(table.is_set(5, 7));
        assert_eq!(table.multi_click_rows(), vec![5]);
    }

    #[test]
    fn unobserved_cells_are_false() {
        let events = vec![
            Event::new(1, 1, false),
            Event::new(2, 2, false),
            Event::new(2, 3, false),
            Event::new(4, 1, false),
        ];
        let table = CoincidenceTable::from_events(&events);

        assert_eq!(table.timestamps(), &[1, 2, 4]);
        assert_eq!(table.channels(), &[1, 2, 3]);
        let expected = ndarray::arr2(&[
            [true, false, false],
            [false, true, true],
            [true, false, false],
        ]);
        assert_eq!(table.table(), &expected);
        assert!(!table.is_set(3, 1));
        assert!(!table.is_set(1, 9));
        assert_eq!(table.column_counts(), vec![(1, 2), (2, 1), (3, 1)]);
    }

    #[test]
    fn repeated_clicks_are_idempotent() {
        let events = vec![
            Event::new(8, 4, false),
            Event::new(8, 4, true),
            Event::new(8, 6, false),
        ];
        let table = CoincidenceTable::from_events(&events);
        assert_eq!(table.n_rows(), 1);
        assert_eq!(table.row(8).unwrap().to_vec(), vec![true, true]);
        assert!(table.row(9).is_none());
    }

    #[test]
    fn merge_ignores_order_within_a_timestamp() {
        let a = vec![
            Event::new(1, 2, false),
            Event::new(3, 1, false),
            Event::new(3, 5, false),
            Event::new(3, 9, false),
        ];
        let b = vec![
            Event::new(1, 2, false),
            Event::new(3, 9, false),
            Event::new(3, 1, false),
            Event::new(3, 5, false),
        ];
        assert_eq!(CoincidenceTable::from_events(&a), CoincidenceTable::from_events(&b));
    }

    #[test]
    fn empty() {
        let table = CoincidenceTable::from_events(&[]);
        assert!(table.is_empty());
        assert!(table.channels().is_empty());
        assert_eq!(table.table().dim(), (0, 0));
    }
}
