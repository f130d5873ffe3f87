use std::fmt;

use crate::errors::Error;
use crate::{Click, Event};

pub const MIN_CHANNEL: i32 = 1;
pub const MAX_CHANNEL: i32 = 20;

/// Events recorded on `channel`.
///
/// Channel 0 selects every event. Valid DPC-230 channels go from 1 to 20, any
/// other value is an `InvalidChannel` error.
pub fn select_channel(events: &[Event], channel: i32) -> Result<Vec<Event>, Error> {
    match channel {
        0 => Ok(events.to_vec()),
        MIN_CHANNEL..=MAX_CHANNEL => Ok(events
            .iter()
            .filter(|e| *e.channel() as i32 == channel)
            .copied()
            .collect()),
        _ => Err(Error::InvalidChannel(channel)),
    }
}

/// Physical input of the DPC-230 behind a channel number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelInput {
    /// Constant fraction discriminator input `input` on time to digital converter `tdc`.
    CFD { tdc: u8, input: u8 },
    /// LVTTL input `input` on time to digital converter `tdc`.
    LVTTL { tdc: u8, input: u8 },
}

impl ChannelInput {
    /// Channels 1-2 are CFD 1-2 and 3-10 LVTTL 1-8 on TDC1. Channels 11-12 are
    /// CFD 3-4 and 13-20 LVTTL 9-16 on TDC2.
    pub fn from_channel(channel: u8) -> Option<Self> {
        match channel {
            1..=2 => Some(ChannelInput::CFD { tdc: 1, input: channel }),
            3..=10 => Some(ChannelInput::LVTTL { tdc: 1, input: channel - 2 }),
            11..=12 => Some(ChannelInput::CFD { tdc: 2, input: channel - 8 }),
            13..=20 => Some(ChannelInput::LVTTL { tdc: 2, input: channel - 4 }),
            _ => None,
        }
    }
}

impl fmt::Display for ChannelInput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChannelInput::CFD { tdc, input } => write!(f, "CFD {} at TDC{}", input, tdc),
            ChannelInput::LVTTL { tdc, input } => write!(f, "LVTTL {} at TDC{}", input, tdc),
        }
    }
}
