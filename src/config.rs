//! Device configuration parameters
//!
//! Construction-time parameters for the controller: the accepted sampling
//! frequency range, power-on settings, the game-mode rotation, and whether
//! physical calibration is wired up at all.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::geometry::{AXES, CHANNELS};
use crate::settings::GainSet;

/// √3 / 4, scale of the tetrahedral pseudo-inverse.
const TETRA: f32 = 0.433_012_7;

/// Core device configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    // --- Sampling ---
    /// Lowest accepted sampling frequency (Hz)
    pub min_frequency_hz: f32,
    /// Highest accepted sampling frequency (Hz)
    pub max_frequency_hz: f32,
    /// Sampling frequency at power-on (Hz)
    pub default_frequency_hz: f32,

    // --- Amplifier chain ---
    /// Stage values every cell starts with
    pub default_gain: GainSet,
    /// Drive the PGA hardware during calibration.  When false the shadow
    /// bookkeeping still runs but no register writes happen.
    pub hardware_calibration: bool,

    // --- Game mode ---
    /// ADC count that maps to zero deflection
    pub adc_midscale: u16,
    /// Per-finger projection from the four channel axes onto x/y/z
    pub rotation: [[f32; CHANNELS]; AXES],
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            // Sampling
            min_frequency_hz: 1.0,
            max_frequency_hz: 10_000.0,
            default_frequency_hz: 1000.0,

            // Amplifier chain: unity gains, zero output offset
            default_gain: GainSet::new([1.0, 1.0, 0.0, 1.0]),
            hardware_calibration: true,

            // Game mode: 12-bit ADC, tetrahedral sensor arrangement
            adc_midscale: 2048,
            rotation: [
                [TETRA, TETRA, -TETRA, -TETRA],
                [TETRA, -TETRA, TETRA, -TETRA],
                [TETRA, -TETRA, -TETRA, TETRA],
            ],
        }
    }
}

impl DeviceConfig {
    /// Check internal consistency.  Returns the offending field on failure.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(self.min_frequency_hz.is_finite() && self.min_frequency_hz > 0.0) {
            return Err("min_frequency_hz must be positive");
        }
        if !(self.max_frequency_hz.is_finite() && self.max_frequency_hz >= self.min_frequency_hz) {
            return Err("max_frequency_hz must be >= min_frequency_hz");
        }
        if !self.frequency_in_range(self.default_frequency_hz) {
            return Err("default_frequency_hz outside accepted range");
        }
        if !self.default_gain.is_finite() {
            return Err("default_gain must be finite");
        }
        if self.adc_midscale == 0 {
            return Err("adc_midscale must be nonzero");
        }
        if self.rotation.iter().flatten().any(|v| !v.is_finite()) {
            return Err("rotation must be finite");
        }
        Ok(())
    }

    /// Whether `hz` may be stored as the sampling frequency.
    pub fn frequency_in_range(&self, hz: f32) -> bool {
        hz.is_finite() && (self.min_frequency_hz..=self.max_frequency_hz).contains(&hz)
    }

    /// Parse and validate a JSON config, as written by host tooling.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON config"))?;
        config.validate().map_err(Error::Config)?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|_| Error::Config("config not serialisable"))
    }

    /// Compact binary form for flash storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        postcard::to_allocvec(self).map_err(|_| Error::Config("config not serialisable"))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let config: Self =
            postcard::from_bytes(bytes).map_err(|_| Error::Config("corrupted config blob"))?;
        config.validate().map_err(Error::Config)?;
        Ok(config)
    }
}
