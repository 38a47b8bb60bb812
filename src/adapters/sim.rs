//! Simulated analog front end for host runs and tests.
//!
//! Produces a deterministic triangle wave per cell around the ADC
//! midscale, phase-shifted by cell index so every channel differs.
//! Each [`read_all_once`](AcquisitionPort::read_all_once) advances the
//! wave by one step.

use crate::app::ports::AcquisitionPort;
use crate::app::sampling::Rotation;
use crate::config::DeviceConfig;
use crate::geometry::{RAW_SAMPLE_LEN, RawSample, RotatedSample};

/// Steps in one rising or falling ramp of the wave.
const HALF_PERIOD: u32 = 64;
/// Phase offset between neighbouring cells, in steps.
const CELL_PHASE: u32 = 7;

pub struct SimulatedFrontEnd {
    rotation: Rotation,
    midscale: u16,
    amplitude: u16,
    step: u32,
}

impl SimulatedFrontEnd {
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            rotation: Rotation::from_config(config),
            midscale: config.adc_midscale,
            amplitude: config.adc_midscale / 2,
            step: 0,
        }
    }

    /// Frozen at midscale: every read returns the rest position.
    pub fn at_rest(config: &DeviceConfig) -> Self {
        Self {
            amplitude: 0,
            ..Self::new(config)
        }
    }

    /// Reads performed so far.
    pub fn reads(&self) -> u32 {
        self.step
    }

    fn count(&self, cell: usize) -> u16 {
        let period = 2 * HALF_PERIOD;
        let pos = self.step.wrapping_add(cell as u32 * CELL_PHASE) % period;
        // Triangle in 0..=HALF_PERIOD, then centred.
        let tri = if pos < HALF_PERIOD { pos } else { period - pos };
        let offset = i64::from(tri) * 2 - i64::from(HALF_PERIOD);
        let delta = offset * i64::from(self.amplitude) / i64::from(HALF_PERIOD);
        (i64::from(self.midscale) + delta).clamp(0, i64::from(u16::MAX)) as u16
    }
}

impl AcquisitionPort for SimulatedFrontEnd {
    fn read_all_once(&mut self) -> RawSample {
        let mut raw = [0; RAW_SAMPLE_LEN];
        for (cell, slot) in raw.iter_mut().enumerate() {
            *slot = self.count(cell);
        }
        self.step = self.step.wrapping_add(1);
        raw
    }

    fn apply_rotation(&self, raw: &RawSample) -> RotatedSample {
        self.rotation.apply(raw)
    }
}
