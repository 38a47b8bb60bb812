//! Port traits: the hexagonal boundary between the dispatcher and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Dispatcher (domain)
//! ```
//!
//! Driven adapters (host link, analog front end, PGA chain, event sinks)
//! implement these traits.  The [`Dispatcher`](super::dispatcher::Dispatcher)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::error::{CalibrationError, LinkError};
use crate::geometry::{RawSample, RotatedSample};
use crate::pins::MuxAddress;
use crate::protocol::packet::Packet;
use crate::settings::{GainMatrix, GainSet};

// ───────────────────────────────────────────────────────────────
// Packet link (driven adapter: domain → host)
// ───────────────────────────────────────────────────────────────

/// Outbound side of the host link.
pub trait PacketLink {
    /// Send a response packet as-is.
    fn send_raw_packet(&mut self, packet: &Packet) -> Result<(), LinkError>;

    /// Send a game-mode sample.
    fn send_rotated_sample(&mut self, sample: &RotatedSample) -> Result<(), LinkError>;

    /// Send a raw sample tagged with a channel-group header.  Both groups
    /// are `0` until channel-group addressing exists.
    fn send_raw_sample(
        &mut self,
        group_a: u8,
        group_b: u8,
        sample: &RawSample,
    ) -> Result<(), LinkError>;
}

// ───────────────────────────────────────────────────────────────
// Acquisition port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Analog front end: the domain calls this to obtain samples.
pub trait AcquisitionPort {
    /// Synchronously read every cell once.
    fn read_all_once(&mut self) -> RawSample;

    /// Project a raw sample onto the per-finger game-mode axes.
    fn apply_rotation(&self, raw: &RawSample) -> RotatedSample;
}

// ───────────────────────────────────────────────────────────────
// Calibration port (driven adapter: domain → PGA hardware)
// ───────────────────────────────────────────────────────────────

/// Physical calibration of the amplifier chain.  Calls block until the
/// hardware has settled.
pub trait CalibrationPort {
    /// Calibrate one channel, routed through `mux`, to `gains`.
    fn calibrate_channel(&mut self, mux: MuxAddress, gains: &GainSet)
    -> Result<(), CalibrationError>;

    /// Calibrate every channel to `matrix`.
    fn calibrate_all(&mut self, matrix: &GainMatrix) -> Result<(), CalibrationError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
