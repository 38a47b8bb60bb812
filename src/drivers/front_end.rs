//! Analog front end: five 4:1 muxes feeding ADC1.
//!
//! A full read walks [`pins::MUX_PINS`] finger-major.  For each cell the
//! muxes are inhibited, the two select lines are driven, the inhibit is
//! released, and after a short settle the finger's ADC channel is sampled.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: GPIO and ADC go through `hw_init` (raw sys calls).
//! On host/test: counts come from a static table for injection, keyed by
//! ADC channel and select code the same way the board routes them.

use embedded_hal::delay::DelayNs;

use crate::app::ports::AcquisitionPort;
use crate::app::sampling::Rotation;
use crate::geometry::{Cell, RAW_SAMPLE_LEN, RawSample, RotatedSample};
#[cfg(not(target_os = "espidf"))]
use crate::geometry::{CHANNELS, FINGERS};
use crate::pins::{self, MuxAddress};

use super::hw_init;

/// Select-line settle time before each conversion.
pub const MUX_SETTLE_US: u32 = 5;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(not(target_os = "espidf"))]
static SIM_COUNTS: [[AtomicU16; CHANNELS]; FINGERS] =
    [const { [const { AtomicU16::new(0) }; CHANNELS] }; FINGERS];

/// Inject the count the host build returns for `cell`.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_count(cell: Cell, raw: u16) {
    SIM_COUNTS[cell.finger][cell.channel].store(raw, Ordering::Relaxed);
}

pub struct AnalogFrontEnd<D> {
    rotation: Rotation,
    delay: D,
    reads: u32,
}

impl<D: DelayNs> AnalogFrontEnd<D> {
    pub fn new(rotation: Rotation, delay: D) -> Self {
        Self {
            rotation,
            delay,
            reads: 0,
        }
    }

    /// Completed full reads.
    pub fn reads(&self) -> u32 {
        self.reads
    }

    fn select(&mut self, addr: MuxAddress) {
        hw_init::gpio_write(pins::MUX_INHIBIT_GPIO, true);
        hw_init::gpio_write(pins::MUX_SEL_A_GPIO, addr.select & 0b01 != 0);
        hw_init::gpio_write(pins::MUX_SEL_B_GPIO, addr.select & 0b10 != 0);
        hw_init::gpio_write(pins::MUX_INHIBIT_GPIO, false);
        self.delay.delay_us(MUX_SETTLE_US);
    }

    fn read_cell(&mut self, cell: Cell) -> u16 {
        let addr = pins::mux_address(cell);
        self.select(addr);
        self.convert(addr, cell)
    }

    #[cfg(target_os = "espidf")]
    fn convert(&self, addr: MuxAddress, _cell: Cell) -> u16 {
        hw_init::adc1_read(addr.adc_channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn convert(&self, _addr: MuxAddress, cell: Cell) -> u16 {
        SIM_COUNTS[cell.finger][cell.channel].load(Ordering::Relaxed)
    }
}

impl<D: DelayNs> AcquisitionPort for AnalogFrontEnd<D> {
    fn read_all_once(&mut self) -> RawSample {
        let mut raw = [0; RAW_SAMPLE_LEN];
        for cell in Cell::all() {
            raw[cell.raw_index()] = self.read_cell(cell);
        }
        hw_init::gpio_write(pins::MUX_INHIBIT_GPIO, true);
        self.reads = self.reads.wrapping_add(1);
        raw
    }

    fn apply_rotation(&self, raw: &RawSample) -> RotatedSample {
        self.rotation.apply(raw)
    }
}
