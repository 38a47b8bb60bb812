//! Hardware adapter: one value that satisfies both hardware ports.
//!
//! The dispatcher takes a single `hw` handle implementing
//! [`AcquisitionPort`] and [`CalibrationPort`].  On the board the two are
//! separate drivers (ADC front end, PGA chain on SPI); this adapter owns
//! both and forwards each port to its driver.

use crate::app::ports::{AcquisitionPort, CalibrationPort};
use crate::error::CalibrationError;
use crate::geometry::{RawSample, RotatedSample};
use crate::pins::MuxAddress;
use crate::settings::{GainMatrix, GainSet};

/// Pairs an acquisition driver with a calibration driver.
pub struct HardwareAdapter<A, C> {
    front_end: A,
    calibrator: C,
}

impl<A: AcquisitionPort, C: CalibrationPort> HardwareAdapter<A, C> {
    pub fn new(front_end: A, calibrator: C) -> Self {
        Self {
            front_end,
            calibrator,
        }
    }

    pub fn front_end(&self) -> &A {
        &self.front_end
    }

    pub fn calibrator(&self) -> &C {
        &self.calibrator
    }

    pub fn into_parts(self) -> (A, C) {
        (self.front_end, self.calibrator)
    }
}

// ── AcquisitionPort implementation ────────────────────────────

impl<A: AcquisitionPort, C> AcquisitionPort for HardwareAdapter<A, C> {
    fn read_all_once(&mut self) -> RawSample {
        self.front_end.read_all_once()
    }

    fn apply_rotation(&self, raw: &RawSample) -> RotatedSample {
        self.front_end.apply_rotation(raw)
    }
}

// ── CalibrationPort implementation ────────────────────────────

impl<A, C: CalibrationPort> CalibrationPort for HardwareAdapter<A, C> {
    fn calibrate_channel(
        &mut self,
        mux: MuxAddress,
        gains: &GainSet,
    ) -> Result<(), CalibrationError> {
        self.calibrator.calibrate_channel(mux, gains)
    }

    fn calibrate_all(&mut self, matrix: &GainMatrix) -> Result<(), CalibrationError> {
        self.calibrator.calibrate_all(matrix)
    }
}
