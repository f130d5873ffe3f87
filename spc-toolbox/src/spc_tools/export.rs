use std::io::{Seek, Write};

use ndarray::Array1;
use ndarray_npy::NpzWriter;

use crate::errors::Error;
use crate::spc_tools::coincidence::CoincidenceTable;
use crate::{Click, Event};

/// Write one `timestamp channel` line per event, CRLF terminated.
///
/// Timestamps are written in femtoseconds, already scaled by the file's time
/// unit, not as raw macro time ticks.
pub fn write_ascii<W: Write>(events: &[Event], mut out: W) -> Result<(), Error> {
    for e in events {
        write!(out, "{} {:2}\r\n", e.timestamp(), e.channel())?;
    }
    out.flush()?;
    Ok(())
}

/// Store a coincidence table as an npz archive with three arrays:
/// `timestamps` (u64, fs), `channels` (u8) and `table` (bool, rows by channels).
pub fn write_npz<W: Write + Seek>(table: &CoincidenceTable, out: W) -> Result<(), Error> {
    let mut npz = NpzWriter::new(out);
    npz.add_array("timestamps", &Array1::from(table.timestamps().to_vec()))?;
    npz.add_array("channels", &Array1::from(table.channels().to_vec()))?;
    npz.add_array("table", table.table())?;
    npz.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2, Array2};
    use ndarray_npy::NpzReader;
    use std::io::Cursor;

    #[test]
    fn ascii_lines() {
        let events = vec![Event::new(5, 3, false), Event::new(1_000_000, 17, true)];
        let mut out = vec![];
        write_ascii(&events, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "5  3\r\n1000000 17\r\n");
    }

    #[test]
    fn npz_archive() {
        let events = vec![Event::new(5, 3, false), Event::new(5, 7, false)];
        let table = CoincidenceTable::from_events(&events);
        let mut buffer = Cursor::new(vec![]);
        write_npz(&table, &mut buffer).unwrap();

        // zip local file header
        assert_eq!(&buffer.get_ref()[..4], b"PK\x03\x04");

        buffer.set_position(0);
        let mut npz = NpzReader::new(buffer).unwrap();
        let names = npz.names().unwrap();
        assert_eq!(names.len(), 3);
        for (name, expected) in names.iter().zip(["timestamps", "channels", "table"].iter()) {
            assert!(name.starts_with(expected), "unexpected array {}", name);
        }

        let timestamps: Array1<u64> = npz.by_index(0).unwrap();
        let channels: Array1<u8> = npz.by_index(1).unwrap();
        let cells: Array2<bool> = npz.by_index(2).unwrap();
        assert_eq!(timestamps, arr1(&[5u64]));
        assert_eq!(channels, arr1(&[3u8, 7]));
        assert_eq!(cells, arr2(&[[true, true]]));
    }
}
