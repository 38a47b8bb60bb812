//! Settings model.
//!
//! Owns everything the host can configure: sampling frequency, the
//! verbosity and game-mode flags, and the per-cell gain matrix.  A second
//! copy of the matrix, the *shadow*, records what the PGA hardware was last
//! calibrated to.  The two only diverge between a `set gain` and the next
//! calibration pass.
//!
//! Every setter validates before mutating, so a rejected call leaves the
//! model untouched.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::DeviceConfig;
use crate::error::SettingsError;
use crate::geometry::{CHANNELS, Cell, FINGERS, STAGES, Selector, Stage};

// ---------------------------------------------------------------------------
// Gain values
// ---------------------------------------------------------------------------

/// Stage values for one channel's PGA chain, indexed by [`Stage`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainSet([f32; STAGES]);

impl GainSet {
    pub const fn new(stages: [f32; STAGES]) -> Self {
        Self(stages)
    }

    pub fn get(&self, stage: Stage) -> f32 {
        self.0[stage.index()]
    }

    pub fn set(&mut self, stage: Stage, value: f32) {
        self.0[stage.index()] = value;
    }

    pub fn stages(&self) -> &[f32; STAGES] {
        &self.0
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

/// Gain values for every cell, `cells[finger][channel]`.
///
/// Equality is exact `f32` equality per slot.  The recalibration diff
/// relies on a stored value comparing equal to itself bit-for-bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainMatrix {
    cells: [[GainSet; CHANNELS]; FINGERS],
}

impl GainMatrix {
    /// A matrix with every cell set to `initial`.
    pub fn filled(initial: GainSet) -> Self {
        Self {
            cells: [[initial; CHANNELS]; FINGERS],
        }
    }

    pub fn cell(&self, cell: Cell) -> &GainSet {
        &self.cells[cell.finger][cell.channel]
    }

    pub fn cell_mut(&mut self, cell: Cell) -> &mut GainSet {
        &mut self.cells[cell.finger][cell.channel]
    }

    /// Iterate `(cell, gains)` finger-major.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &GainSet)> {
        Cell::all().map(move |cell| (cell, self.cell(cell)))
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Host-configurable device settings plus the calibration shadow.
#[derive(Debug, Clone)]
pub struct Settings {
    sampling_frequency: f32,
    verbosity: bool,
    game_mode: bool,
    gains: GainMatrix,
    shadow: GainMatrix,
    min_frequency_hz: f32,
    max_frequency_hz: f32,
}

impl Settings {
    /// Power-on settings.  Live and shadow matrices start equal, i.e. the
    /// hardware is assumed to hold the defaults after the boot calibration.
    pub fn new(config: &DeviceConfig) -> Self {
        let gains = GainMatrix::filled(config.default_gain);
        Self {
            sampling_frequency: config.default_frequency_hz,
            verbosity: false,
            game_mode: false,
            gains,
            shadow: gains,
            min_frequency_hz: config.min_frequency_hz,
            max_frequency_hz: config.max_frequency_hz,
        }
    }

    // ── Sampling frequency ────────────────────────────────────

    pub fn set_sampling_frequency(&mut self, hz: f32) -> Result<(), SettingsError> {
        if !hz.is_finite() || hz < self.min_frequency_hz || hz > self.max_frequency_hz {
            return Err(SettingsError::FrequencyOutOfRange);
        }
        self.sampling_frequency = hz;
        Ok(())
    }

    pub fn sampling_frequency(&self) -> f32 {
        self.sampling_frequency
    }

    // ── Flags ─────────────────────────────────────────────────

    pub fn set_game_mode(&mut self, raw: u8) -> Result<(), SettingsError> {
        self.game_mode = decode_flag(raw)?;
        Ok(())
    }

    pub fn game_mode(&self) -> bool {
        self.game_mode
    }

    pub fn set_verbosity(&mut self, raw: u8) -> Result<(), SettingsError> {
        self.verbosity = decode_flag(raw)?;
        Ok(())
    }

    pub fn verbosity(&self) -> bool {
        self.verbosity
    }

    // ── Gains ─────────────────────────────────────────────────

    /// Write one stage of one or more cells.
    ///
    /// `finger == -1` selects every finger and `channel == -1` every
    /// channel of the selected finger(s).  `stage` never broadcasts.
    /// Only the live matrix is written.
    pub fn set_gain(
        &mut self,
        finger: i8,
        channel: i8,
        stage: i8,
        value: f32,
    ) -> Result<(), SettingsError> {
        let fingers = Selector::for_write(finger, FINGERS).ok_or(SettingsError::InvalidFinger)?;
        let channels =
            Selector::for_write(channel, CHANNELS).ok_or(SettingsError::InvalidChannel)?;
        let stage = Stage::from_wire(stage).ok_or(SettingsError::InvalidStage)?;
        if !value.is_finite() {
            return Err(SettingsError::InvalidGain);
        }

        for f in fingers.indices(FINGERS) {
            for c in channels.indices(CHANNELS) {
                self.gains.cell_mut(Cell::new(f, c)).set(stage, value);
            }
        }
        debug!("gain {:?}/{:?} {} = {}", fingers, channels, stage, value);
        Ok(())
    }

    /// Read one stage of one cell.  Broadcast indices are rejected: a read
    /// has no aggregation rule.
    pub fn gain(&self, finger: i8, channel: i8, stage: i8) -> Result<f32, SettingsError> {
        let f = Selector::concrete(finger, FINGERS).ok_or(SettingsError::InvalidFinger)?;
        let c = Selector::concrete(channel, CHANNELS).ok_or(SettingsError::InvalidChannel)?;
        let stage = Stage::from_wire(stage).ok_or(SettingsError::InvalidStage)?;
        Ok(self.gains.cell(Cell::new(f, c)).get(stage))
    }

    /// Live gain matrix.
    pub fn gains(&self) -> &GainMatrix {
        &self.gains
    }

    /// Last-calibrated gain matrix.
    pub fn shadow(&self) -> &GainMatrix {
        &self.shadow
    }

    // ── Shadow bookkeeping ────────────────────────────────────

    /// Cells whose live gains differ from the shadow, finger-major.
    pub fn changed_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        Cell::all().filter(move |&cell| self.gains.cell(cell) != self.shadow.cell(cell))
    }

    /// Record that `cell` now holds its live gains in hardware.
    pub fn sync_cell(&mut self, cell: Cell) {
        *self.shadow.cell_mut(cell) = *self.gains.cell(cell);
    }

    /// Record that every cell now holds its live gains in hardware.
    pub fn sync_all(&mut self) {
        self.shadow = self.gains;
    }

    /// True when no cell awaits calibration.
    pub fn is_calibrated(&self) -> bool {
        self.gains == self.shadow
    }
}

fn decode_flag(raw: u8) -> Result<bool, SettingsError> {
    match raw {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(SettingsError::InvalidFlag),
    }
}
