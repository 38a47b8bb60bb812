//! Calibration trigger.
//!
//! Two passes keep the PGA hardware in step with the settings model:
//!
//! - **smart** (on `a`): only cells whose live gains differ from the shadow
//!   are recalibrated, one [`CalibrationPort::calibrate_channel`] call each,
//!   and each cell's shadow is synced as soon as its call returns.
//!   Calibration has a physical settle time, so the cost is bounded by the
//!   diff size.
//! - **full** (on `t`): one [`CalibrationPort::calibrate_all`] call, then the
//!   whole shadow is replaced by the live matrix.
//!
//! The diff and shadow bookkeeping live in [`Settings`]; this module only
//! decides which hardware calls to make.  Hardware errors are logged and
//! do not stop the bookkeeping: the shadow records what was *requested*.

use heapless::Vec;
use log::{debug, info, warn};

use crate::error::CalibrationError;
use crate::geometry::{CELL_COUNT, Cell};
use crate::pins;
use crate::settings::{GainMatrix, GainSet, Settings};

use super::events::CalibrationSummary;
use super::ports::CalibrationPort;

/// Cells touched by a smart pass, finger-major.
pub type ChangedCells = Vec<Cell, CELL_COUNT>;

/// Recalibrate only the cells whose gains changed since the last pass.
pub fn smart_recalibrate(
    settings: &mut Settings,
    hw: &mut impl CalibrationPort,
) -> (ChangedCells, CalibrationSummary) {
    let changed: ChangedCells = settings.changed_cells().collect();

    let mut failures = 0;
    for &cell in &changed {
        let gains = *settings.gains().cell(cell);
        debug!("calibrating {} -> {:?}", cell, gains.stages());
        if let Err(e) = hw.calibrate_channel(pins::mux_address(cell), &gains) {
            warn!("calibration of {} failed: {}", cell, e);
            failures += 1;
        }
        settings.sync_cell(cell);
    }

    if !changed.is_empty() {
        info!(
            "smart recalibration: {} cell(s), {} failure(s)",
            changed.len(),
            failures
        );
    }
    let summary = CalibrationSummary {
        full: false,
        cells: changed.len(),
        failures,
    };
    (changed, summary)
}

/// Recalibrate every cell regardless of the diff.
pub fn full_recalibrate(
    settings: &mut Settings,
    hw: &mut impl CalibrationPort,
) -> CalibrationSummary {
    let failures = match hw.calibrate_all(settings.gains()) {
        Ok(()) => 0,
        Err(e) => {
            warn!("full calibration failed: {}", e);
            1
        }
    };
    settings.sync_all();
    info!("full recalibration: {} cells", CELL_COUNT);
    CalibrationSummary::full(failures)
}

// ───────────────────────────────────────────────────────────────
// Null calibrator
// ───────────────────────────────────────────────────────────────

/// A calibrator that accepts every request and touches no hardware.
/// Selected when `DeviceConfig::hardware_calibration` is false and in
/// simulation builds; shadow bookkeeping still runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCalibrator;

impl CalibrationPort for NullCalibrator {
    fn calibrate_channel(
        &mut self,
        _mux: pins::MuxAddress,
        _gains: &GainSet,
    ) -> Result<(), CalibrationError> {
        Ok(())
    }

    fn calibrate_all(&mut self, _matrix: &GainMatrix) -> Result<(), CalibrationError> {
        Ok(())
    }
}

/// `None` behaves like [`NullCalibrator`].  Lets the boot path decide once
/// whether the PGA chain is driven without changing the adapter's type.
impl<C: CalibrationPort> CalibrationPort for Option<C> {
    fn calibrate_channel(
        &mut self,
        mux: pins::MuxAddress,
        gains: &GainSet,
    ) -> Result<(), CalibrationError> {
        match self {
            Some(hw) => hw.calibrate_channel(mux, gains),
            None => Ok(()),
        }
    }

    fn calibrate_all(&mut self, matrix: &GainMatrix) -> Result<(), CalibrationError> {
        match self {
            Some(hw) => hw.calibrate_all(matrix),
            None => Ok(()),
        }
    }
}
