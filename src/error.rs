//! Unified error types for the glove controller.
//!
//! Settings validation failures travel back to the host as one-byte codes,
//! so [`SettingsError`] carries a stable `#[repr(u8)]` discriminant.  Port
//! failures (link, calibration hardware) never reach the host; the
//! dispatcher logs them.  All variants are `Copy`.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A settings mutation was rejected.
    Settings(SettingsError),
    /// The host link failed to send or receive.
    Link(LinkError),
    /// The calibration hardware reported a failure.
    Calibration(CalibrationError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settings(e) => write!(f, "settings: {e}"),
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Calibration(e) => write!(f, "calibration: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Settings validation
// ---------------------------------------------------------------------------

/// Validation failures of the settings model.  The discriminant is the code
/// reported by the `g e` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SettingsError {
    FrequencyOutOfRange = 1,
    InvalidFinger = 2,
    InvalidChannel = 3,
    InvalidStage = 4,
    /// Boolean flags accept only 0 or 1.
    InvalidFlag = 5,
    /// NaN or infinite gain value.
    InvalidGain = 6,
}

impl SettingsError {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrequencyOutOfRange => write!(f, "sampling frequency out of range"),
            Self::InvalidFinger => write!(f, "invalid finger index"),
            Self::InvalidChannel => write!(f, "invalid channel index"),
            Self::InvalidStage => write!(f, "invalid stage index"),
            Self::InvalidFlag => write!(f, "flag must be 0 or 1"),
            Self::InvalidGain => write!(f, "gain value not finite"),
        }
    }
}

impl From<SettingsError> for Error {
    fn from(e: SettingsError) -> Self {
        Self::Settings(e)
    }
}

/// One-byte outcome of the most recent set command (`0` = success).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ErrorCode(u8);

impl ErrorCode {
    pub const SUCCESS: Self = Self(0);

    pub const fn as_byte(self) -> u8 {
        self.0
    }

    pub const fn is_success(self) -> bool {
        self.0 == 0
    }
}

impl From<core::result::Result<(), SettingsError>> for ErrorCode {
    fn from(result: core::result::Result<(), SettingsError>) -> Self {
        match result {
            Ok(()) => Self::SUCCESS,
            Err(e) => Self(e.code()),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The transport accepted fewer bytes than a full packet.
    ShortWrite,
    /// The underlying transport returned an error.
    Transport,
    /// The far end went away.
    Disconnected,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortWrite => write!(f, "short write"),
            Self::Transport => write!(f, "transport error"),
            Self::Disconnected => write!(f, "disconnected"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Calibration hardware errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationError {
    /// SPI transfer to the PGA chain failed.
    BusWriteFailed,
    /// The requested stage value cannot be represented by the PGA register.
    ValueOutOfRange,
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusWriteFailed => write!(f, "PGA bus write failed"),
            Self::ValueOutOfRange => write!(f, "stage value out of register range"),
        }
    }
}

impl From<CalibrationError> for Error {
    fn from(e: CalibrationError) -> Self {
        Self::Calibration(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
