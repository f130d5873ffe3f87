use std::fmt;

/// Kind of data stored in a DPC-230 FIFO file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    PreProcessed,
    Raw,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataType::PreProcessed => write!(f, "pre-processed"),
            DataType::Raw => write!(f, "raw"),
        }
    }
}

pub enum File {
    SPC(crate::parsers::spc::SPCFile),
}
