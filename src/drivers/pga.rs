//! Programmable-gain amplifier chain on SPI.
//!
//! Every finger board carries one PGA controller behind the shared SPI
//! bus.  A calibration request for one channel is a single write frame:
//!
//! ```text
//!   byte 0      CMD_WRITE_GAINS | pga_select
//!   byte 1      mux select code of the channel
//!   bytes 2..18 the four stage gains, f32 big-endian, in stage order
//! ```
//!
//! The controller applies the gains and re-trims its offset, which takes
//! [`PGA_SETTLE_US`].  The driver blocks for that long after each frame.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{Error as _, SpiDevice};
use log::{debug, warn};

use crate::app::ports::CalibrationPort;
use crate::error::CalibrationError;
use crate::geometry::{Cell, STAGES};
use crate::pins::{self, MuxAddress};
use crate::settings::{GainMatrix, GainSet};

/// Command nibble of a gain write; the low bits carry the board index.
pub const CMD_WRITE_GAINS: u8 = 0x40;
/// Write frame length.
pub const FRAME_LEN: usize = 2 + STAGES * 4;
/// Settle time after each frame.
pub const PGA_SETTLE_US: u32 = 500;

pub struct PgaDriver<SPI, D> {
    spi: SPI,
    delay: D,
    frames: u32,
}

impl<SPI: SpiDevice, D: DelayNs> PgaDriver<SPI, D> {
    pub fn new(spi: SPI, delay: D) -> Self {
        Self {
            spi,
            delay,
            frames: 0,
        }
    }

    /// Frames written successfully.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn release(self) -> (SPI, D) {
        (self.spi, self.delay)
    }

    fn write_frame(&mut self, mux: MuxAddress, gains: &GainSet) -> Result<(), CalibrationError> {
        if !gains.is_finite() {
            return Err(CalibrationError::ValueOutOfRange);
        }
        let frame = encode_frame(mux, gains);
        self.spi.write(&frame).map_err(|e| {
            warn!("pga: SPI write to board {} failed: {:?}", mux.pga_select, e.kind());
            CalibrationError::BusWriteFailed
        })?;
        self.delay.delay_us(PGA_SETTLE_US);
        self.frames = self.frames.wrapping_add(1);
        Ok(())
    }
}

pub fn encode_frame(mux: MuxAddress, gains: &GainSet) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[0] = CMD_WRITE_GAINS | (mux.pga_select & 0x0f);
    frame[1] = mux.select;
    for (i, g) in gains.stages().iter().enumerate() {
        frame[2 + i * 4..6 + i * 4].copy_from_slice(&g.to_be_bytes());
    }
    frame
}

impl<SPI: SpiDevice, D: DelayNs> CalibrationPort for PgaDriver<SPI, D> {
    fn calibrate_channel(
        &mut self,
        mux: MuxAddress,
        gains: &GainSet,
    ) -> Result<(), CalibrationError> {
        debug!("pga: board {} select {:#04b}", mux.pga_select, mux.select);
        self.write_frame(mux, gains)
    }

    /// Writes every cell even if some fail; reports the first failure.
    fn calibrate_all(&mut self, matrix: &GainMatrix) -> Result<(), CalibrationError> {
        let mut first_err = None;
        for cell in Cell::all() {
            if let Err(e) = self.write_frame(pins::mux_address(cell), matrix.cell(cell)) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}
