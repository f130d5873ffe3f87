//! Builder for synthetic DPC-230 FIFO streams.

#![allow(dead_code)]

pub const PRE_PROCESSED: u8 = 0b1100_0001;
pub const RAW: u8 = 0b1100_0101;

pub struct StreamBuilder {
    bytes: Vec<u8>,
    time_unit_fs: u64,
}

impl StreamBuilder {
    pub fn new(time_unit_fs: u32, format: u8) -> Self {
        let unit = time_unit_fs.to_be_bytes();
        Self {
            bytes: vec![unit[1], unit[2], unit[3], format],
            time_unit_fs: time_unit_fs as u64,
        }
    }

    /// Bits 24 to 53 of the macro time.
    pub fn high(mut self, high: u32) -> Self {
        let b = high.to_le_bytes();
        self.bytes
            .extend_from_slice(&[b[0], b[1], b[2], 0b0100_0000 | (b[3] & 0b0011_1111)]);
        self
    }

    pub fn low(mut self, low: u32, channel: u8, gap: bool) -> Self {
        let b = low.to_le_bytes();
        let tail = (channel & 0b0001_1111) | if gap { 1 << 5 } else { 0 };
        self.bytes.extend_from_slice(&[b[0], b[1], b[2], tail]);
        self
    }

    pub fn raw(mut self, raw: &[u8]) -> Self {
        self.bytes.extend_from_slice(raw);
        self
    }

    /// Expected timestamp in fs of a low time record under `high`.
    pub fn timestamp(&self, high: u32, low: u32) -> u64 {
        (((high as u64) << 24) | low as u64) * self.time_unit_fs
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}
