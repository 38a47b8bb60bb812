//! Operating mode.

use core::fmt;

/// Whether the device is accepting configuration or streaming samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Mode {
    /// Settings may be read and written.  Power-on mode.
    #[default]
    Configuring = 0,
    /// Continuous acquisition.  Only `c` is honoured.
    Sampling = 1,
}

impl Mode {
    pub fn is_sampling(self) -> bool {
        self == Self::Sampling
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuring => write!(f, "configuring"),
            Self::Sampling => write!(f, "sampling"),
        }
    }
}
