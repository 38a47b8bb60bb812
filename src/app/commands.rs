//! Inbound commands decoded from host packets.
//!
//! The wire layout lives in [`protocol::codec`](crate::protocol::codec);
//! this module only names what the host can ask for.  Index fields keep
//! their raw signed wire values so the settings model can apply its own
//! broadcast and validation rules.

use crate::protocol::codec;
use crate::protocol::packet::Packet;

/// A decoded host command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// `c`: leave sampling mode.  Only meaningful while sampling.
    ReturnToConfig,
    /// `s …`: mutate a setting.
    Set(SetCommand),
    /// `g …`: read a setting back.
    Get(GetCommand),
    /// `a`: smart recalibration, then enter sampling mode.
    EnterSampling,
    /// `t`: recalibrate every cell, stay in configuring mode.
    FullCalibration,
    /// `d`: one synchronous sample without entering sampling mode.
    SampleOnce,
}

/// Targets of the `s` command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetCommand {
    SamplingFrequency(f32),
    GameMode(u8),
    Verbosity(u8),
    Gain {
        finger: i8,
        channel: i8,
        stage: i8,
        value: f32,
    },
}

/// Targets of the `g` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetCommand {
    SamplingFrequency,
    GameMode,
    Verbosity,
    Gain { finger: i8, channel: i8, stage: i8 },
    LastError,
}

impl Command {
    /// Decode a host packet.  `None` means the packet is ignored.
    pub fn decode(packet: &Packet) -> Option<Self> {
        codec::decode_command(packet)
    }

    /// Encode into a host packet (host side and tests).
    pub fn encode(&self) -> Packet {
        codec::encode_command(self)
    }

    /// Whether this command is honoured while the device is sampling.
    pub fn allowed_while_sampling(&self) -> bool {
        matches!(self, Self::ReturnToConfig)
    }
}
