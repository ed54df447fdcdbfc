//! Sample data formats and device modes.
//!
//! Both are index-encoded on the wire: the byte sent is the position of the
//! variant in its ordered list.

use std::fmt;
use std::str::FromStr;

use crate::error::FrameError;

/// How the device interprets the sample bytes of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataFormat {
    /// One byte per sample, 8-bit right aligned.
    #[default]
    Bits8,
    /// Two bytes per sample, 12-bit left aligned.
    Bits12Left,
    /// Two bytes per sample, 12-bit right aligned.
    Bits12Right,
}

impl DataFormat {
    /// All formats in wire order.
    pub const ALL: [DataFormat; 3] = [Self::Bits8, Self::Bits12Left, Self::Bits12Right];

    /// Command-line names in wire order.
    pub const NAMES: [&'static str; 3] = ["8bit", "12bit_LEFT", "12bit_RIGHT"];

    /// The byte written to a channel config's `format` field.
    pub fn index(self) -> u8 {
        match self {
            Self::Bits8 => 0,
            Self::Bits12Left => 1,
            Self::Bits12Right => 2,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    pub fn name(self) -> &'static str {
        Self::NAMES[usize::from(self.index())]
    }

    /// Bytes per sample as transferred by the device's DMA in single-DAC modes.
    pub fn sample_width(self) -> usize {
        match self {
            Self::Bits8 => 1,
            Self::Bits12Left | Self::Bits12Right => 2,
        }
    }
}

impl FromStr for DataFormat {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .position(|name| *name == s)
            .map(|pos| Self::ALL[pos])
            .ok_or_else(|| FrameError::UnknownFormat(s.to_string()))
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the device drives its two DAC channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Each channel runs from its own timer.
    Independent,
    /// Both channels share channel 0's timer trigger.
    #[default]
    SingleTrigger,
    /// Both DACs are fed from one interleaved buffer.
    Dual,
}

impl Mode {
    /// All modes in wire order.
    pub const ALL: [Mode; 3] = [Self::Independent, Self::SingleTrigger, Self::Dual];

    /// Command-line names in wire order.
    pub const NAMES: [&'static str; 3] = ["independent", "single_trigger", "dual"];

    /// The byte written to the header's `mode` field.
    pub fn code(self) -> u8 {
        match self {
            Self::Independent => 0,
            Self::SingleTrigger => 1,
            Self::Dual => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    pub fn name(self) -> &'static str {
        Self::NAMES[usize::from(self.code())]
    }
}

impl FromStr for Mode {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .position(|name| *name == s)
            .map(|pos| Self::ALL[pos])
            .ok_or_else(|| FrameError::UnknownMode(s.to_string()))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
