use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use num_traits::FromPrimitive;
use tracing::{debug, warn};

use crate::errors::Error;
use crate::headers::DataType;
use crate::parsers::spc::{DEVICE_DPC230, HEADER_SIZE};

#[derive(FromPrimitive, ToPrimitive, Debug, Clone, Copy, PartialEq, Eq)]
enum FormatByte {
    PreProcessed = 0b1100_0001,
    Raw = 0b1100_0101,
}

/// Descriptor found in the first four bytes of an SPC file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    pub device_type: &'static str,
    pub data_type: DataType,
    /// Length of one macro time tick in femtoseconds.
    pub time_unit_fs: u64,
}

impl StreamHeader {
    pub fn is_raw(&self) -> bool {
        self.data_type == DataType::Raw
    }
}

impl fmt::Display for StreamHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{:<35}: {}", "Device", self.device_type)?;
        writeln!(f, "{:<35}: {}", "DataType", self.data_type)?;
        write!(f, "{:<35}: {} fs", "TimeUnit", self.time_unit_fs)
    }
}

/// Non fatal observations about the file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatAdvisory {
    /// The file holds raw, not pre-processed, data. It has not been validated
    /// and should only be used for testing.
    UnvalidatedRawData,
}

impl fmt::Display for FormatAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FormatAdvisory::UnvalidatedRawData => {
                write!(f, "Data is not pre-processed. It should be used for test only.")
            }
        }
    }
}

/// Parse the stream descriptor.
///
/// Only the two DPC-230 FIFO formats are understood. Any other value in the
/// format byte is rejected with `UnsupportedFormat`. A raw data file parses fine
/// but comes back with an advisory attached.
pub fn parse_header(bytes: &[u8]) -> Result<(StreamHeader, Option<FormatAdvisory>), Error> {
    if bytes.len() < HEADER_SIZE {
        return Err(Error::TruncatedStream(bytes.len()));
    }
    let descriptor = &bytes[..HEADER_SIZE];
    let format_byte = descriptor[HEADER_SIZE - 1];

    let (data_type, advisory) = match FromPrimitive::from_u8(format_byte) {
        Some(FormatByte::PreProcessed) => (DataType::PreProcessed, None),
        Some(FormatByte::Raw) => (DataType::Raw, Some(FormatAdvisory::UnvalidatedRawData)),
        None => return Err(Error::UnsupportedFormat(format_byte)),
    };

    let header = StreamHeader {
        device_type: DEVICE_DPC230,
        data_type,
        time_unit_fs: BigEndian::read_u24(&descriptor[..3]) as u64,
    };

    debug!(
        device = header.device_type,
        data_type = %header.data_type,
        time_unit_fs = header.time_unit_fs,
        "parsed SPC header"
    );
    if let Some(advisory) = advisory {
        warn!("{}", advisory);
    }

    Ok((header, advisory))
}
