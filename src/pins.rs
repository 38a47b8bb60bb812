//! GPIO / peripheral pin assignments for the glove main board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  The SPI and UART pins are claimed in `main` as
//! typed esp-idf-hal peripherals, so moving one of those means changing the
//! claim too; the boot check in `main` refuses a mismatch.

use crate::geometry::{CHANNELS, Cell, FINGERS};

// ---------------------------------------------------------------------------
// Analog multiplexers (one CD4052-style 4:1 mux per finger)
// ---------------------------------------------------------------------------

/// Route from a (finger, channel) cell to the ADC and to the PGA chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MuxAddress {
    /// ADC1 channel the finger's mux output is wired to.
    pub adc_channel: u32,
    /// SPI chip-select index of the finger's PGA chain.
    pub pga_select: u8,
    /// Two-bit select code driven on [`MUX_SEL_A_GPIO`] / [`MUX_SEL_B_GPIO`].
    pub select: u8,
}

/// Mux select line A (LSB).
pub const MUX_SEL_A_GPIO: i32 = 38;
/// Mux select line B (MSB).
pub const MUX_SEL_B_GPIO: i32 = 39;
/// Mux inhibit, active HIGH.  Held HIGH while the select lines settle.
pub const MUX_INHIBIT_GPIO: i32 = 40;

/// ADC1 channel per finger (thumb → little finger).
pub const FINGER_ADC_CHANNELS: [u32; FINGERS] = [0, 1, 2, 3, 4];

/// The glove routes channel 1 and 2 crossed on every finger board, so the
/// select code is not simply the channel index.
const CHANNEL_SELECT: [u8; CHANNELS] = [0b00, 0b10, 0b01, 0b11];

/// Full mux mapping, `MUX_PINS[finger][channel]`.
pub const MUX_PINS: [[MuxAddress; CHANNELS]; FINGERS] = build_mux_table();

const fn build_mux_table() -> [[MuxAddress; CHANNELS]; FINGERS] {
    let mut table = [[MuxAddress {
        adc_channel: 0,
        pga_select: 0,
        select: 0,
    }; CHANNELS]; FINGERS];
    let mut f = 0;
    while f < FINGERS {
        let mut c = 0;
        while c < CHANNELS {
            table[f][c] = MuxAddress {
                adc_channel: FINGER_ADC_CHANNELS[f],
                pga_select: f as u8,
                select: CHANNEL_SELECT[c],
            };
            c += 1;
        }
        f += 1;
    }
    table
}

/// Look up the mux route for a cell.
pub fn mux_address(cell: Cell) -> MuxAddress {
    MUX_PINS[cell.finger][cell.channel]
}

// ---------------------------------------------------------------------------
// PGA chain (SPI2)
// ---------------------------------------------------------------------------

pub const PGA_SCLK_GPIO: i32 = 12;
pub const PGA_MOSI_GPIO: i32 = 11;
pub const PGA_MISO_GPIO: i32 = 13;
pub const PGA_CS_GPIO: i32 = 10;
/// SPI clock for the PGA register writes.
pub const PGA_SPI_FREQ_HZ: u32 = 1_000_000;

// ---------------------------------------------------------------------------
// Host link (UART1 through the USB bridge)
// ---------------------------------------------------------------------------

pub const HOST_UART_TX_GPIO: i32 = 17;
pub const HOST_UART_RX_GPIO: i32 = 18;
pub const HOST_UART_BAUD: u32 = 921_600;
