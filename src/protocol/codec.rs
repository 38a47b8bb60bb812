//! Command decoding and response encoding.
//!
//! Command layout (byte offsets within the 64-byte packet):
//! ```text
//! ┌─────┬─────┬──────────────────────────────────────────────┐
//! │ [0] │ [1] │ fields                                       │
//! ├─────┼─────┼──────────────────────────────────────────────┤
//! │ 'c' │     │                                              │
//! │ 's' │ 'f' │ [2..6] f32 BE frequency                      │
//! │ 's' │ 'm' │ [2] flag                                     │
//! │ 's' │ 'v' │ [2] flag                                     │
//! │ 's' │ 'g' │ [2] finger i8 [3] channel i8 [4] stage i8    │
//! │     │     │ [5..9] f32 BE value                          │
//! │ 'g' │ 'f' 'm' 'v' 'e'                                    │
//! │ 'g' │ 'g' │ [2] finger i8 [3] channel i8 [4] stage i8    │
//! │ 'a' │ 't' │ 'd'                                          │
//! └─────┴─────┴──────────────────────────────────────────────┘
//! ```
//!
//! Unknown tags decode to `None`.  That is the documented no-op path: the
//! dispatcher drops the packet without replying or recording an error.

use super::packet::{self, Packet};
use crate::app::commands::{Command, GetCommand, SetCommand};
use crate::geometry::{RawSample, RotatedSample};

pub const TAG_CONFIG: u8 = b'c';
pub const TAG_SET: u8 = b's';
pub const TAG_GET: u8 = b'g';
pub const TAG_ACQUIRE: u8 = b'a';
pub const TAG_TEST_CALIBRATION: u8 = b't';
pub const TAG_DATA: u8 = b'd';

pub const SUB_FREQUENCY: u8 = b'f';
pub const SUB_GAME_MODE: u8 = b'm';
pub const SUB_VERBOSITY: u8 = b'v';
pub const SUB_GAIN: u8 = b'g';
pub const SUB_LAST_ERROR: u8 = b'e';

/// Offset of the first tag-specific field.
const FIELD_OFFSET: usize = 2;
/// Offset of the gain value in `s g`.
const GAIN_VALUE_OFFSET: usize = 5;

/// Offset of the first ADC count in a raw sample packet.
pub const RAW_SAMPLE_OFFSET: usize = 2;

/// Decode a packet into a command.  Returns `None` for unknown tags.
pub fn decode_command(packet: &Packet) -> Option<Command> {
    match packet[0] {
        TAG_CONFIG => Some(Command::ReturnToConfig),
        TAG_SET => decode_set(packet).map(Command::Set),
        TAG_GET => decode_get(packet).map(Command::Get),
        TAG_ACQUIRE => Some(Command::EnterSampling),
        TAG_TEST_CALIBRATION => Some(Command::FullCalibration),
        TAG_DATA => Some(Command::SampleOnce),
        _ => None,
    }
}

fn decode_set(packet: &Packet) -> Option<SetCommand> {
    match packet[1] {
        SUB_FREQUENCY => Some(SetCommand::SamplingFrequency(packet::read_f32_be(
            packet,
            FIELD_OFFSET,
        ))),
        SUB_GAME_MODE => Some(SetCommand::GameMode(packet[FIELD_OFFSET])),
        SUB_VERBOSITY => Some(SetCommand::Verbosity(packet[FIELD_OFFSET])),
        SUB_GAIN => {
            let (finger, channel, stage) = gain_address(packet);
            Some(SetCommand::Gain {
                finger,
                channel,
                stage,
                value: packet::read_f32_be(packet, GAIN_VALUE_OFFSET),
            })
        }
        _ => None,
    }
}

fn decode_get(packet: &Packet) -> Option<GetCommand> {
    match packet[1] {
        SUB_FREQUENCY => Some(GetCommand::SamplingFrequency),
        SUB_GAME_MODE => Some(GetCommand::GameMode),
        SUB_VERBOSITY => Some(GetCommand::Verbosity),
        SUB_GAIN => {
            let (finger, channel, stage) = gain_address(packet);
            Some(GetCommand::Gain {
                finger,
                channel,
                stage,
            })
        }
        SUB_LAST_ERROR => Some(GetCommand::LastError),
        _ => None,
    }
}

fn gain_address(packet: &Packet) -> (i8, i8, i8) {
    (
        packet::read_i8(packet, FIELD_OFFSET),
        packet::read_i8(packet, FIELD_OFFSET + 1),
        packet::read_i8(packet, FIELD_OFFSET + 2),
    )
}

// ── Command encoding (host side / tests) ──────────────────────

/// Encode a command into a packet.  Inverse of [`decode_command`].
pub fn encode_command(cmd: &Command) -> Packet {
    let mut p = packet::empty();
    match *cmd {
        Command::ReturnToConfig => p[0] = TAG_CONFIG,
        Command::EnterSampling => p[0] = TAG_ACQUIRE,
        Command::FullCalibration => p[0] = TAG_TEST_CALIBRATION,
        Command::SampleOnce => p[0] = TAG_DATA,
        Command::Set(set) => {
            p[0] = TAG_SET;
            match set {
                SetCommand::SamplingFrequency(hz) => {
                    p[1] = SUB_FREQUENCY;
                    packet::write_f32_be(&mut p, FIELD_OFFSET, hz);
                }
                SetCommand::GameMode(v) => {
                    p[1] = SUB_GAME_MODE;
                    p[FIELD_OFFSET] = v;
                }
                SetCommand::Verbosity(v) => {
                    p[1] = SUB_VERBOSITY;
                    p[FIELD_OFFSET] = v;
                }
                SetCommand::Gain {
                    finger,
                    channel,
                    stage,
                    value,
                } => {
                    p[1] = SUB_GAIN;
                    p[FIELD_OFFSET] = finger as u8;
                    p[FIELD_OFFSET + 1] = channel as u8;
                    p[FIELD_OFFSET + 2] = stage as u8;
                    packet::write_f32_be(&mut p, GAIN_VALUE_OFFSET, value);
                }
            }
        }
        Command::Get(get) => {
            p[0] = TAG_GET;
            p[1] = match get {
                GetCommand::SamplingFrequency => SUB_FREQUENCY,
                GetCommand::GameMode => SUB_GAME_MODE,
                GetCommand::Verbosity => SUB_VERBOSITY,
                GetCommand::LastError => SUB_LAST_ERROR,
                GetCommand::Gain {
                    finger,
                    channel,
                    stage,
                } => {
                    p[FIELD_OFFSET] = finger as u8;
                    p[FIELD_OFFSET + 1] = channel as u8;
                    p[FIELD_OFFSET + 2] = stage as u8;
                    SUB_GAIN
                }
            };
        }
    }
    p
}

// ── Responses ─────────────────────────────────────────────────

/// Response carrying a single float at bytes 0..4.
pub fn encode_f32_response(value: f32) -> Packet {
    let mut p = packet::empty();
    packet::write_f32_be(&mut p, 0, value);
    p
}

/// Response carrying a single byte at byte 0.
pub fn encode_byte_response(value: u8) -> Packet {
    let mut p = packet::empty();
    p[0] = value;
    p
}

/// Raw sample: group header at bytes 0/1, then every ADC count as BE u16.
pub fn encode_raw_sample(group_a: u8, group_b: u8, raw: &RawSample) -> Packet {
    let mut p = packet::empty();
    p[0] = group_a;
    p[1] = group_b;
    for (i, &count) in raw.iter().enumerate() {
        packet::write_u16_be(&mut p, RAW_SAMPLE_OFFSET + i * 2, count);
    }
    p
}

/// Rotated sample: every axis value as BE f32 from byte 0.
pub fn encode_rotated_sample(rotated: &RotatedSample) -> Packet {
    let mut p = packet::empty();
    for (i, &v) in rotated.iter().enumerate() {
        packet::write_f32_be(&mut p, i * 4, v);
    }
    p
}
