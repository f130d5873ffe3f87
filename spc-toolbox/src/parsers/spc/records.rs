use byteorder::{ByteOrder, LittleEndian};
use num_traits::FromPrimitive;

use crate::errors::Error;

pub const RECORD_SIZE: usize = 4;

const KIND_SHIFT: u8 = 6;
const HIGH_TIME_MASK: u8 = 0b0011_1111;
const CHANNEL_MASK: u8 = 0b0001_1111;
const GAP_FLAG: u8 = 1 << 5;

#[derive(FromPrimitive, ToPrimitive, Debug, Clone, Copy, PartialEq, Eq)]
enum RecordKind {
    LowTime = 0,
    HighTime = 1,
}

/// Bits 24 to 53 of the macro time. The top two bits are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighTime(u32);

impl HighTime {
    #[inline]
    pub fn bits(&self) -> u32 {
        self.0
    }
}

/// Per photon part of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LowTime {
    /// Bits 0 to 23 of the macro time.
    pub low_time: u32,
    pub channel: u8,
    /// FIFO overflow: photons right before this one may have been lost.
    pub gap: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    HighTime(HighTime),
    LowTime(LowTime),
}

impl Record {
    /// Classify a record by the two most significant bits of its last byte and
    /// pull out its fields. `ordinal` is the position of the record in the file,
    /// counting the header as record 0.
    #[inline]
    pub fn classify(raw: [u8; RECORD_SIZE], ordinal: usize) -> Result<Self, Error> {
        let tail = raw[RECORD_SIZE - 1];
        match FromPrimitive::from_u8(tail >> KIND_SHIFT) {
            Some(RecordKind::HighTime) => {
                let high = LittleEndian::read_u24(&raw[..3]) | (((tail & HIGH_TIME_MASK) as u32) << 24);
                Ok(Record::HighTime(HighTime(high)))
            }
            Some(RecordKind::LowTime) => Ok(Record::LowTime(LowTime {
                low_time: LittleEndian::read_u24(&raw[..3]),
                channel: tail & CHANNEL_MASK,
                gap: (tail & GAP_FLAG) != 0,
            })),
            None => Err(Error::MalformedRecord { ordinal }),
        }
    }
}
