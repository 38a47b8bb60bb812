//! Outbound application events.
//!
//! The [`Dispatcher`](super::dispatcher::Dispatcher) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  They never travel over the
//! host link; the host learns about outcomes by polling.

use crate::error::SettingsError;
use crate::geometry::CELL_COUNT;

use super::mode::Mode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The dispatcher is ready to accept packets.
    Started(Mode),

    /// The device switched between configuring and sampling.
    ModeChanged { from: Mode, to: Mode },

    /// A calibration pass finished.
    Recalibrated(CalibrationSummary),

    /// A set command failed validation.  The code is also stored as the
    /// last error.
    SettingRejected(SettingsError),
}

/// What a calibration pass touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationSummary {
    /// `true` for the unconditional `t` pass.
    pub full: bool,
    /// Cells handed to the hardware.
    pub cells: usize,
    /// Cells whose hardware call reported an error.
    pub failures: usize,
}

impl CalibrationSummary {
    pub const fn full(failures: usize) -> Self {
        Self {
            full: true,
            cells: CELL_COUNT,
            failures,
        }
    }
}
