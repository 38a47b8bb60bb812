//! Command dispatcher: the hexagonal core.
//!
//! [`Dispatcher`] owns the settings model, the operating mode and the
//! last-error byte.  Each call to [`Dispatcher::handle_packet`] processes
//! exactly one packet to completion and zero-fills it before returning.
//!
//! ```text
//!                   ┌───────────────────────────────┐
//!  Packet ────────▶ │          Dispatcher           │ ──▶ PacketLink
//!                   │  Mode · Settings · LastError  │
//! Acquisition ◀──── │  Calibration trigger          │ ──▶ EventSink
//! Calibration ◀──── └───────────────────────────────┘
//! ```
//!
//! ## Mode rules
//!
//! | Mode          | Honoured                | Everything else |
//! |---------------|-------------------------|-----------------|
//! | `Sampling`    | `c`                     | dropped         |
//! | `Configuring` | `s` `g` `a` `t` `d`     | dropped         |
//!
//! Dropped packets produce no response and leave the last error alone.

use core::time::Duration;

use log::{Level, debug, info, log, trace, warn};

use crate::config::DeviceConfig;
use crate::error::{ErrorCode, LinkError};
use crate::protocol::codec;
use crate::protocol::packet::Packet;
use crate::settings::Settings;

use super::calibration;
use super::commands::{Command, GetCommand, SetCommand};
use super::events::AppEvent;
use super::mode::Mode;
use super::ports::{AcquisitionPort, CalibrationPort, EventSink, PacketLink};
use super::sampling;

// ───────────────────────────────────────────────────────────────
// Dispatcher
// ───────────────────────────────────────────────────────────────

pub struct Dispatcher {
    settings: Settings,
    mode: Mode,
    /// Outcome of the most recent set command.
    last_error: ErrorCode,
    packets_handled: u64,
    samples_sent: u64,
}

impl Dispatcher {
    /// Construct in `Configuring` mode with power-on settings.
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            settings: Settings::new(config),
            mode: Mode::Configuring,
            last_error: ErrorCode::SUCCESS,
            packets_handled: 0,
            samples_sent: 0,
        }
    }

    /// Announce readiness.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started(self.mode));
        info!("Dispatcher started in {} mode", self.mode);
    }

    // ── Packet handling ───────────────────────────────────────

    /// Decode and execute one packet, then zero it.
    ///
    /// The `hw` parameter satisfies **both** [`AcquisitionPort`] and
    /// [`CalibrationPort`]; one handle avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn handle_packet(
        &mut self,
        packet: &mut Packet,
        hw: &mut (impl AcquisitionPort + CalibrationPort),
        link: &mut impl PacketLink,
        sink: &mut impl EventSink,
    ) {
        self.packets_handled += 1;
        trace!("rx {:02X?}", &packet[..8]);

        match Command::decode(packet) {
            Some(cmd) => self.execute(cmd, hw, link, sink),
            None => trace!("unrecognised tag {:#04X}, dropped", packet[0]),
        }

        packet.fill(0);
    }

    fn execute(
        &mut self,
        cmd: Command,
        hw: &mut (impl AcquisitionPort + CalibrationPort),
        link: &mut impl PacketLink,
        sink: &mut impl EventSink,
    ) {
        if self.mode.is_sampling() != cmd.allowed_while_sampling() {
            trace!("{:?} not honoured in {} mode", cmd, self.mode);
            return;
        }

        let level = if self.settings.verbosity() {
            Level::Info
        } else {
            Level::Debug
        };
        log!(level, "cmd {:?}", cmd);

        match cmd {
            Command::ReturnToConfig => self.change_mode(Mode::Configuring, sink),
            Command::Set(set) => self.apply_set(set, sink),
            Command::Get(get) => self.answer_get(get, link),
            Command::EnterSampling => {
                let (_, summary) = calibration::smart_recalibrate(&mut self.settings, hw);
                sink.emit(&AppEvent::Recalibrated(summary));
                self.change_mode(Mode::Sampling, sink);
            }
            Command::FullCalibration => {
                let summary = calibration::full_recalibrate(&mut self.settings, hw);
                sink.emit(&AppEvent::Recalibrated(summary));
            }
            Command::SampleOnce => self.send_sample(hw, link),
        }
    }

    fn apply_set(&mut self, set: SetCommand, sink: &mut impl EventSink) {
        let result = match set {
            SetCommand::SamplingFrequency(hz) => self.settings.set_sampling_frequency(hz),
            SetCommand::GameMode(v) => self.settings.set_game_mode(v),
            SetCommand::Verbosity(v) => self.settings.set_verbosity(v),
            SetCommand::Gain {
                finger,
                channel,
                stage,
                value,
            } => self.settings.set_gain(finger, channel, stage, value),
        };
        if let Err(e) = result {
            debug!("{:?} rejected: {}", set, e);
            sink.emit(&AppEvent::SettingRejected(e));
        }
        self.last_error = ErrorCode::from(result);
    }

    fn answer_get(&mut self, get: GetCommand, link: &mut impl PacketLink) {
        let response = match get {
            GetCommand::SamplingFrequency => {
                codec::encode_f32_response(self.settings.sampling_frequency())
            }
            GetCommand::GameMode => codec::encode_byte_response(u8::from(self.settings.game_mode())),
            GetCommand::Verbosity => codec::encode_byte_response(u8::from(self.settings.verbosity())),
            GetCommand::Gain {
                finger,
                channel,
                stage,
            } => {
                // Reads have no error channel; an invalid address reads NaN.
                let value = self
                    .settings
                    .gain(finger, channel, stage)
                    .unwrap_or_else(|e| {
                        debug!("gain read ({finger}, {channel}, {stage}) rejected: {e}");
                        f32::NAN
                    });
                codec::encode_f32_response(value)
            }
            GetCommand::LastError => codec::encode_byte_response(self.last_error.as_byte()),
        };
        Self::send(link.send_raw_packet(&response));
    }

    fn send_sample(&mut self, hw: &mut impl AcquisitionPort, link: &mut impl PacketLink) {
        let sent = sampling::sample_once(self.settings.game_mode(), hw, link);
        if sent.is_ok() {
            self.samples_sent += 1;
        }
        Self::send(sent);
    }

    fn send(result: Result<(), LinkError>) {
        if let Err(e) = result {
            warn!("host link send failed: {}", e);
        }
    }

    fn change_mode(&mut self, to: Mode, sink: &mut impl EventSink) {
        let from = self.mode;
        if from == to {
            return;
        }
        self.mode = to;
        sink.emit(&AppEvent::ModeChanged { from, to });
        info!("Mode: {} -> {}", from, to);
    }

    // ── Continuous acquisition ────────────────────────────────

    /// Emit one sample if, and only if, the device is sampling.
    /// Returns whether a sample was taken.
    pub fn acquisition_tick(
        &mut self,
        hw: &mut impl AcquisitionPort,
        link: &mut impl PacketLink,
    ) -> bool {
        if !self.mode.is_sampling() {
            return false;
        }
        self.send_sample(hw, link);
        true
    }

    /// Interval between acquisition ticks at the current sampling frequency.
    pub fn sample_period(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.settings.sampling_frequency())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn last_error(&self) -> ErrorCode {
        self.last_error
    }

    /// Packets seen since startup, recognised or not.
    pub fn packets_handled(&self) -> u64 {
        self.packets_handled
    }

    /// Samples successfully handed to the link since startup.
    pub fn samples_sent(&self) -> u64 {
        self.samples_sent
    }
}
