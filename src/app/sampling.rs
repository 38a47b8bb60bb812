//! Sampling path.
//!
//! One synchronous read of every cell, then either the raw counts or the
//! game-mode rotation goes to the host.  The same routine serves the
//! one-shot `d` command and each tick of continuous acquisition.

use crate::config::DeviceConfig;
use crate::error::LinkError;
use crate::geometry::{AXES, CHANNELS, FINGERS, RawSample, RotatedSample, ROTATED_SAMPLE_LEN};

use super::ports::{AcquisitionPort, PacketLink};

/// Channel-group header sent with raw samples.  Reserved for group
/// addressing; always zero.
pub const RAW_GROUP_A: u8 = 0;
pub const RAW_GROUP_B: u8 = 0;

/// Read once and send.  Game mode selects the rotated vector.
pub fn sample_once(
    game_mode: bool,
    hw: &mut impl AcquisitionPort,
    link: &mut impl PacketLink,
) -> Result<(), LinkError> {
    let raw = hw.read_all_once();
    if game_mode {
        let rotated = hw.apply_rotation(&raw);
        link.send_rotated_sample(&rotated)
    } else {
        link.send_raw_sample(RAW_GROUP_A, RAW_GROUP_B, &raw)
    }
}

// ───────────────────────────────────────────────────────────────
// Rotation
// ───────────────────────────────────────────────────────────────

/// Per-finger linear projection from the four channel axes to x/y/z.
///
/// Counts are centred on the ADC midscale and normalised to ±1 before the
/// projection, so a finger at rest maps to the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    matrix: [[f32; CHANNELS]; AXES],
    midscale: f32,
}

impl Rotation {
    pub fn new(matrix: [[f32; CHANNELS]; AXES], midscale: u16) -> Self {
        Self {
            matrix,
            midscale: f32::from(midscale),
        }
    }

    pub fn from_config(config: &DeviceConfig) -> Self {
        Self::new(config.rotation, config.adc_midscale)
    }

    pub fn apply(&self, raw: &RawSample) -> RotatedSample {
        let mut out = [0.0; ROTATED_SAMPLE_LEN];
        for finger in 0..FINGERS {
            let counts = &raw[finger * CHANNELS..(finger + 1) * CHANNELS];
            for (axis, row) in self.matrix.iter().enumerate() {
                out[finger * AXES + axis] = row
                    .iter()
                    .zip(counts)
                    .map(|(w, &c)| w * (f32::from(c) - self.midscale) / self.midscale)
                    .sum();
            }
        }
        out
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::from_config(&DeviceConfig::default())
    }
}
