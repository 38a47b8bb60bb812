//! Sensor array geometry.
//!
//! The glove carries five fingers, each with four analog channels, and every
//! channel runs through a chain of four programmable amplifier stages.
//! These cardinalities are fixed by the board and size every array in the
//! crate.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Number of fingers on the array.
pub const FINGERS: usize = 5;
/// Analog channels per finger.
pub const CHANNELS: usize = 4;
/// Amplifier stages per channel.
pub const STAGES: usize = 4;
/// Total (finger, channel) cells.
pub const CELL_COUNT: usize = FINGERS * CHANNELS;

/// Length of one raw acquisition (one ADC count per cell).
pub const RAW_SAMPLE_LEN: usize = CELL_COUNT;
/// Derived axes produced per finger by the game-mode rotation.
pub const AXES: usize = 3;
/// Length of one rotated acquisition.
pub const ROTATED_SAMPLE_LEN: usize = FINGERS * AXES;

/// One raw read of every cell, finger-major.
pub type RawSample = [u16; RAW_SAMPLE_LEN];
/// Rotated game-mode vector, finger-major.
pub type RotatedSample = [f32; ROTATED_SAMPLE_LEN];

/// Wire value meaning "every finger" / "every channel" on writes.
pub const BROADCAST: i8 = -1;

/// One of the four amplification points in a channel's PGA chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Stage {
    FrontGain = 0,
    Fine = 1,
    Output = 2,
    Product = 3,
}

impl Stage {
    pub const ALL: [Stage; STAGES] = [Self::FrontGain, Self::Fine, Self::Output, Self::Product];

    /// Decode the wire index.  Stages never broadcast, so `-1` is rejected.
    pub fn from_wire(raw: i8) -> Option<Self> {
        match raw {
            0 => Some(Self::FrontGain),
            1 => Some(Self::Fine),
            2 => Some(Self::Output),
            3 => Some(Self::Product),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrontGain => write!(f, "front-gain"),
            Self::Fine => write!(f, "fine"),
            Self::Output => write!(f, "output"),
            Self::Product => write!(f, "product"),
        }
    }
}

/// Finger or channel selection decoded from a signed wire byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    All,
    One(usize),
}

impl Selector {
    /// Decode a write-side index: `-1` broadcasts, `0..bound` selects one,
    /// everything else is invalid.
    pub fn for_write(raw: i8, bound: usize) -> Option<Self> {
        if raw == BROADCAST {
            return Some(Self::All);
        }
        Self::concrete(raw, bound).map(Self::One)
    }

    /// Decode a read-side index.  Reads have no aggregation rule, so only
    /// concrete indices are accepted.
    pub fn concrete(raw: i8, bound: usize) -> Option<usize> {
        usize::try_from(raw).ok().filter(|&i| i < bound)
    }

    /// Iterate the indices covered by this selection.
    pub fn indices(self, bound: usize) -> core::ops::Range<usize> {
        match self {
            Self::All => 0..bound,
            Self::One(i) => i..i + 1,
        }
    }
}

/// A single (finger, channel) sensing site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub finger: usize,
    pub channel: usize,
}

impl Cell {
    pub const fn new(finger: usize, channel: usize) -> Self {
        Self { finger, channel }
    }

    /// Position of this cell in a finger-major raw sample.
    pub const fn raw_index(self) -> usize {
        self.finger * CHANNELS + self.channel
    }

    /// Every cell, finger-major.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..FINGERS).flat_map(|f| (0..CHANNELS).map(move |c| Cell::new(f, c)))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}/c{}", self.finger, self.channel)
    }
}
