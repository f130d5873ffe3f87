pub mod header;
pub mod records;
pub mod streamers;

use std::path::PathBuf;

use crate::errors::Error;
use crate::headers::DataType;
use crate::TTTRFile;

use self::header::{FormatAdvisory, StreamHeader};
use self::streamers::{DPC230Stream, DecodedStream};

pub const HEADER_SIZE: usize = 4;
pub const DEVICE_DPC230: &str = "DPC-230";

/// An SPC file from a DPC-230 FIFO measurement, loaded into memory.
pub struct SPCFile {
    pub path: PathBuf,
    pub header: StreamHeader,
    pub format_advisory: Option<FormatAdvisory>,
    data: Vec<u8>,
}

impl SPCFile {
    /// Read an SPCFile from its filepath and parse its header.
    ///
    /// If the file does not exist a FileNotAvailable error will be returned.
    pub fn new(filename: PathBuf) -> Result<Self, Error> {
        if filename.exists() {
            let data = std::fs::read(&filename)?;
            Self::from_bytes(filename, data)
        } else {
            let filename_string = filename.display().to_string();
            Err(Error::FileNotAvailable(filename_string))
        }
    }

    /// Wrap bytes that were already read from `path`.
    pub fn from_bytes(path: PathBuf, data: Vec<u8>) -> Result<Self, Error> {
        let (header, format_advisory) = header::parse_header(&data)?;
        Ok(Self {
            path,
            header,
            format_advisory,
            data,
        })
    }

    /// Number of 4 byte records after the header. A trailing partial record is
    /// not counted.
    pub fn num_records(&self) -> usize {
        (self.data.len() - HEADER_SIZE) / records::RECORD_SIZE
    }

    /// Record at a time view of the file.
    pub fn stream(&self) -> Result<DPC230Stream<'_>, Error> {
        DPC230Stream::new(&self.header, &self.data[HEADER_SIZE..])
    }

    pub fn decode(&self) -> Result<DecodedStream, Error> {
        streamers::decode_body(self.header, self.format_advisory, &self.data[HEADER_SIZE..])
    }
}

impl TTTRFile for SPCFile {
    fn time_unit_fs(&self) -> u64 {
        self.header.time_unit_fs
    }

    fn data_type(&self) -> DataType {
        self.header.data_type
    }
}

impl std::fmt::Display for SPCFile {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "{:<35}: {}", "Path", self.path.display())?;
        writeln!(f, "{}", self.header)?;
        write!(f, "{:<35}: {}", "NumberOfRecords", self.num_records())
    }
}
