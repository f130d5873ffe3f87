#[macro_use]
extern crate num_derive;
extern crate byteorder;

pub mod errors;
pub mod headers;
pub mod parsers;
pub mod spc_tools;

pub use parsers::spc::streamers::{decode, DecodedStream, GapNotice};

pub(crate) trait TTTRStream {
    type RecordSize;
    fn parse_record(&mut self, raw_record: Self::RecordSize) -> Result<Option<Event>, errors::Error>;
    fn time_unit_fs(&self) -> u64;
}

/// A photon detected on `channel` at `timestamp` femtoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event {
    pub(crate) timestamp: u64,
    pub(crate) channel: u8,
    pub(crate) gap: bool,
}

impl Event {
    pub fn new(timestamp: u64, channel: u8, gap: bool) -> Self {
        Self {
            timestamp,
            channel,
            gap,
        }
    }

    /// Whether the device flagged a FIFO overflow right before this event.
    #[inline]
    pub fn is_gap(&self) -> bool {
        self.gap
    }
}

pub trait Click {
    fn channel(&self) -> &u8;
    fn timestamp(&self) -> &u64;
}

impl Click for Event {
    #[inline]
    fn channel(&self) -> &u8 {&self.channel}
    #[inline]
    fn timestamp(&self) -> &u64 {&self.timestamp}
}

/// The TTTRFile trait ensures that all files we support are aware of their time unit
/// and the kind of data they contain.
pub trait TTTRFile {
    fn time_unit_fs(&self) -> u64;
    fn data_type(&self) -> headers::DataType;
}
