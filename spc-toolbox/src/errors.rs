use std::io;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("File {0} does not exist.")]
    FileNotAvailable(String),
    #[error("IO error.")]
    IOError(#[from] io::Error),
    #[error("Format byte {0:#010b} is not FIFO data from a DPC-230.")]
    UnsupportedFormat(u8),
    #[error("Data format is wrong at record {ordinal}.")]
    MalformedRecord { ordinal: usize },
    #[error("Low time record {ordinal} arrived before any high time record.")]
    MissingHighTimeContext { ordinal: usize },
    #[error("Timestamp of record {ordinal} does not fit in 64 bits.")]
    TimestampOverflow { ordinal: usize },
    #[error("Stream ends with {0} bytes that do not form a complete record.")]
    TruncatedStream(usize),
    #[error("No such channel {0}. Expected 1 to 20, or 0 for all channels.")]
    InvalidChannel(i32),
    #[error("Failed to write npz archive.")]
    NpzError(#[from] ndarray_npy::WriteNpzError),
}
