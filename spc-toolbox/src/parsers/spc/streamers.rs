use std::slice::ChunksExact;

use tracing::{debug, warn};

use crate::errors::Error;
use crate::parsers::spc::header::{self, FormatAdvisory, StreamHeader};
use crate::parsers::spc::records::{HighTime, LowTime, Record, RECORD_SIZE};
use crate::parsers::spc::HEADER_SIZE;
use crate::spc_tools::channels::select_channel;
use crate::spc_tools::coincidence::CoincidenceTable;
use crate::{Click, Event, TTTRStream};

// - - - - - - - - - - //
// Time reconstruction //
// - - - - - - - - - - //

/// High time state of a decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighTimeContext {
    /// No high time record has been seen yet. Low time records can't be
    /// turned into timestamps in this state.
    AwaitingHighTime,
    /// Bits 24 to 53 of the macro time of every following low time record.
    Active(u32),
}

/// Combines high time context with low time records into absolute timestamps.
#[derive(Debug, Clone)]
pub struct TimeReconstructor {
    context: HighTimeContext,
    time_unit_fs: u64,
}

impl TimeReconstructor {
    pub fn new(time_unit_fs: u64) -> Self {
        Self {
            context: HighTimeContext::AwaitingHighTime,
            time_unit_fs,
        }
    }

    pub fn context(&self) -> HighTimeContext {
        self.context
    }

    /// The last high time record always wins.
    #[inline]
    pub fn update_high(&mut self, high: HighTime) {
        self.context = HighTimeContext::Active(high.bits());
    }

    /// Absolute timestamp in femtoseconds of a low time record.
    #[inline]
    pub fn reconstruct(&self, low: &LowTime, ordinal: usize) -> Result<Event, Error> {
        let high = match self.context {
            HighTimeContext::Active(high) => high,
            HighTimeContext::AwaitingHighTime => {
                return Err(Error::MissingHighTimeContext { ordinal })
            }
        };
        let ticks = (low.low_time as u64) | ((high as u64) << 24);
        let timestamp = ticks
            .checked_mul(self.time_unit_fs)
            .ok_or(Error::TimestampOverflow { ordinal })?;

        Ok(Event {
            timestamp,
            channel: low.channel,
            gap: low.gap,
        })
    }
}

// - - - - - - - //
// Gap detection //
// - - - - - - - //

/// A FIFO overflow flagged on record `ordinal`. Photons preceding it may have
/// been lost by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapNotice {
    pub ordinal: usize,
    pub timestamp: u64,
    pub channel: u8,
}

#[inline]
pub fn detect_gap(event: &Event, ordinal: usize) -> Option<GapNotice> {
    if event.is_gap() {
        Some(GapNotice {
            ordinal,
            timestamp: *event.timestamp(),
            channel: *event.channel(),
        })
    } else {
        None
    }
}

// - - - - - - - - - - - //
// DPC-230 Record Stream //
// - - - - - - - - - - - //

/// Record at a time decoder for the body of a DPC-230 FIFO file.
///
/// Yields one `Result<Event, Error>` per low time record. High time records
/// only update the decoder state. The stream stops after the first error.
pub struct DPC230Stream<'a> {
    records: ChunksExact<'a, u8>,
    reconstructor: TimeReconstructor,
    time_unit_fs: u64,
    ordinal: usize,
    gap_notices: Vec<GapNotice>,
    failed: bool,
}

impl<'a> DPC230Stream<'a> {
    /// `records` is everything that follows the 4 byte header.
    ///
    /// A body that does not split evenly into records is rejected up front so
    /// that a partial last record is never silently dropped.
    pub fn new(header: &StreamHeader, records: &'a [u8]) -> Result<Self, Error> {
        let trailing = records.len() % RECORD_SIZE;
        if trailing != 0 {
            return Err(Error::TruncatedStream(trailing));
        }

        Ok(Self {
            records: records.chunks_exact(RECORD_SIZE),
            reconstructor: TimeReconstructor::new(header.time_unit_fs),
            time_unit_fs: header.time_unit_fs,
            ordinal: 0,
            gap_notices: vec![],
            failed: false,
        })
    }

    /// Gaps found in the records consumed so far.
    pub fn gap_notices(&self) -> &[GapNotice] {
        &self.gap_notices
    }

    pub fn into_gap_notices(self) -> Vec<GapNotice> {
        self.gap_notices
    }

    pub fn context(&self) -> HighTimeContext {
        self.reconstructor.context()
    }
}

impl<'a> TTTRStream for DPC230Stream<'a> {
    type RecordSize = [u8; RECORD_SIZE];

    #[inline(always)]
    fn parse_record(&mut self, record: Self::RecordSize) -> Result<Option<Event>, Error> {
        let ordinal = self.ordinal;
        match Record::classify(record, ordinal)? {
            Record::HighTime(high) => {
                self.reconstructor.update_high(high);
                Ok(None)
            }
            Record::LowTime(low) => {
                let event = self.reconstructor.reconstruct(&low, ordinal)?;
                if let Some(notice) = detect_gap(&event, ordinal) {
                    warn!(
                        "There is a gap at record {}, data before this entry is lost.",
                        ordinal
                    );
                    self.gap_notices.push(notice);
                }
                Ok(Some(event))
            }
        }
    }

    fn time_unit_fs(&self) -> u64 {
        self.time_unit_fs
    }
}

impl<'a> Iterator for DPC230Stream<'a> {
    type Item = Result<Event, Error>;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while let Some(chunk) = self.records.next() {
            // Header is record 0.
            self.ordinal += 1;
            let mut record = [0u8; RECORD_SIZE];
            record.copy_from_slice(chunk);
            match self.parse_record(record) {
                Ok(Some(event)) => return Some(Ok(event)),
                Ok(None) => continue,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

// - - - - - - - -//
// Whole decoding //
// - - - - - - - -//

/// Everything recovered from one SPC file.
#[derive(Debug, Clone)]
pub struct DecodedStream {
    pub header: StreamHeader,
    pub format_advisory: Option<FormatAdvisory>,
    /// Events in file order.
    pub events: Vec<Event>,
    pub gap_notices: Vec<GapNotice>,
}

impl DecodedStream {
    /// Events on a single channel (1 to 20), or every event for channel 0.
    pub fn select_channel(&self, channel: i32) -> Result<Vec<Event>, Error> {
        select_channel(&self.events, channel)
    }

    /// Timestamps in fs on a single channel (1 to 20), or every timestamp for
    /// channel 0.
    pub fn timestamps_on(&self, channel: i32) -> Result<Vec<u64>, Error> {
        Ok(self
            .select_channel(channel)?
            .iter()
            .map(|e| *e.timestamp())
            .collect())
    }

    /// Timestamp and channel of every gap flagged event.
    pub fn gap_list(&self) -> Vec<(u64, u8)> {
        self.gap_notices
            .iter()
            .map(|g| (g.timestamp, g.channel))
            .collect()
    }

    pub fn coincidences(&self) -> CoincidenceTable {
        CoincidenceTable::from_events(&self.events)
    }
}

/// Decode the full contents of an SPC file.
///
/// Fails on the first problem found. No partial results are returned.
pub fn decode(bytes: &[u8]) -> Result<DecodedStream, Error> {
    let (header, format_advisory) = header::parse_header(bytes)?;
    decode_body(header, format_advisory, &bytes[HEADER_SIZE..])
}

pub(in crate::parsers) fn decode_body(
    header: StreamHeader,
    format_advisory: Option<FormatAdvisory>,
    body: &[u8],
) -> Result<DecodedStream, Error> {
    let mut stream = DPC230Stream::new(&header, body)?;
    let events = stream.by_ref().collect::<Result<Vec<Event>, Error>>()?;
    let time_unit_fs = stream.time_unit_fs();
    let gap_notices = stream.into_gap_notices();

    debug!(
        records = body.len() / RECORD_SIZE,
        time_unit_fs,
        events = events.len(),
        gaps = gap_notices.len(),
        "decoded SPC stream"
    );

    Ok(DecodedStream {
        header,
        format_advisory,
        events,
        gap_notices,
    })
}
