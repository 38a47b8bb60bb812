//! Integration tests: Dispatcher → settings → ports.

use glovectl::app::commands::{Command, GetCommand, SetCommand};
use glovectl::app::events::{AppEvent, CalibrationSummary};
use glovectl::app::mode::Mode;
use glovectl::error::SettingsError;
use glovectl::geometry::{AXES, RAW_SAMPLE_LEN};
use glovectl::protocol::codec::{self, RAW_SAMPLE_OFFSET};
use glovectl::protocol::packet::{self, Packet};
use glovectl::{DeviceConfig, Dispatcher};

use crate::mock_hw::{MockHardware, MockLink, MockSink};

struct Rig {
    dispatcher: Dispatcher,
    hw: MockHardware,
    link: MockLink,
    sink: MockSink,
}

impl Rig {
    fn new() -> Self {
        let mut sink = MockSink::default();
        let mut dispatcher = Dispatcher::new(&DeviceConfig::default());
        dispatcher.start(&mut sink);
        Self {
            dispatcher,
            hw: MockHardware::new(),
            link: MockLink::new(),
            sink,
        }
    }

    fn send(&mut self, cmd: Command) {
        let mut p = codec::encode_command(&cmd);
        self.send_packet(&mut p);
    }

    fn send_packet(&mut self, p: &mut Packet) {
        self.dispatcher
            .handle_packet(p, &mut self.hw, &mut self.link, &mut self.sink);
        assert_eq!(*p, packet::empty(), "packet must be zeroed after handling");
    }

    fn set(&mut self, set: SetCommand) {
        self.send(Command::Set(set));
    }

    fn get(&mut self, get: GetCommand) -> Packet {
        self.send(Command::Get(get));
        let sent = self.link.take();
        assert_eq!(sent.len(), 1, "get must answer with exactly one packet");
        sent[0]
    }

    fn last_error(&mut self) -> u8 {
        self.get(GetCommand::LastError)[0]
    }
}

fn gain(finger: i8, channel: i8, stage: i8, value: f32) -> SetCommand {
    SetCommand::Gain {
        finger,
        channel,
        stage,
        value,
    }
}

fn gain_query(finger: i8, channel: i8, stage: i8) -> GetCommand {
    GetCommand::Gain {
        finger,
        channel,
        stage,
    }
}

#[test]
fn start_emits_started_in_configuring() {
    let rig = Rig::new();
    assert_eq!(rig.sink.events, vec![AppEvent::Started(Mode::Configuring)]);
}

#[test]
fn get_defaults() {
    let mut rig = Rig::new();
    let f = rig.get(GetCommand::SamplingFrequency);
    assert_eq!(packet::read_f32_be(&f, 0), 1000.0);
    assert_eq!(rig.get(GetCommand::GameMode)[0], 0);
    assert_eq!(rig.get(GetCommand::Verbosity)[0], 0);
    assert_eq!(rig.last_error(), 0);

    let g = rig.get(gain_query(4, 3, 3));
    assert_eq!(packet::read_f32_be(&g, 0), 1.0);
}

#[test]
fn flags_round_trip_and_reject_garbage() {
    let mut rig = Rig::new();
    rig.set(SetCommand::GameMode(1));
    rig.set(SetCommand::Verbosity(1));
    assert_eq!(rig.get(GetCommand::GameMode)[0], 1);
    assert_eq!(rig.get(GetCommand::Verbosity)[0], 1);
    assert_eq!(rig.last_error(), 0);

    rig.set(SetCommand::GameMode(7));
    assert_eq!(rig.last_error(), SettingsError::InvalidFlag.code());
    assert_eq!(rig.get(GetCommand::GameMode)[0], 1);
}

#[test]
fn each_set_overwrites_last_error() {
    let mut rig = Rig::new();
    rig.set(SetCommand::SamplingFrequency(0.0));
    assert_eq!(rig.last_error(), SettingsError::FrequencyOutOfRange.code());
    rig.set(gain(5, 0, 0, 1.0));
    assert_eq!(rig.last_error(), SettingsError::InvalidFinger.code());
    rig.set(gain(0, 4, 0, 1.0));
    assert_eq!(rig.last_error(), SettingsError::InvalidChannel.code());
    rig.set(gain(0, 0, -1, 1.0));
    assert_eq!(rig.last_error(), SettingsError::InvalidStage.code());
    rig.set(gain(0, 0, 0, f32::INFINITY));
    assert_eq!(rig.last_error(), SettingsError::InvalidGain.code());
    rig.set(SetCommand::SamplingFrequency(250.0));
    assert_eq!(rig.last_error(), 0);

    let rejected: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::SettingRejected(_)))
        .collect();
    assert_eq!(rejected.len(), 5);
}

#[test]
fn failed_gain_write_changes_nothing() {
    let mut rig = Rig::new();
    rig.set(gain(-1, -1, 9, 5.0));
    assert!(rig.dispatcher.settings().is_calibrated());
    let g = rig.get(gain_query(0, 0, 0));
    assert_eq!(packet::read_f32_be(&g, 0), 1.0);
}

#[test]
fn broadcast_gain_reaches_every_cell() {
    let mut rig = Rig::new();
    rig.set(gain(-1, -1, 1, 0.75));
    for f in 0..5 {
        for c in 0..4 {
            let g = rig.get(gain_query(f, c, 1));
            assert_eq!(packet::read_f32_be(&g, 0), 0.75);
        }
    }
}

#[test]
fn broadcast_read_is_nan_and_keeps_error() {
    let mut rig = Rig::new();
    rig.set(SetCommand::Verbosity(3));
    let before = rig.last_error();
    let g = rig.get(gain_query(-1, 0, 0));
    assert!(packet::read_f32_be(&g, 0).is_nan());
    assert_eq!(rig.last_error(), before);
}

#[test]
fn acquire_recalibrates_then_samples() {
    let mut rig = Rig::new();
    rig.set(gain(2, 1, 0, 4.0));
    rig.send(Command::EnterSampling);

    assert_eq!(rig.dispatcher.mode(), Mode::Sampling);
    let calls = rig.hw.channel_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, glovectl::pins::MUX_PINS[2][1]);
    assert_eq!(calls[0].1.stages(), &[4.0, 1.0, 0.0, 1.0]);

    let tail = &rig.sink.events[rig.sink.events.len() - 2..];
    assert_eq!(
        tail,
        &[
            AppEvent::Recalibrated(CalibrationSummary {
                full: false,
                cells: 1,
                failures: 0,
            }),
            AppEvent::ModeChanged {
                from: Mode::Configuring,
                to: Mode::Sampling,
            },
        ]
    );
}

#[test]
fn sampling_honours_only_config() {
    let mut rig = Rig::new();
    rig.send(Command::EnterSampling);
    rig.hw.clear();

    rig.set(SetCommand::SamplingFrequency(10.0));
    rig.send(Command::Get(GetCommand::LastError));
    rig.send(Command::SampleOnce);
    rig.send(Command::FullCalibration);
    rig.send(Command::EnterSampling);

    assert!(rig.link.sent.is_empty());
    assert!(rig.hw.calls.is_empty());
    assert_eq!(rig.dispatcher.settings().sampling_frequency(), 1000.0);

    rig.send(Command::ReturnToConfig);
    assert_eq!(rig.dispatcher.mode(), Mode::Configuring);
    assert_eq!(rig.last_error(), 0);
}

#[test]
fn full_calibration_runs_without_changes() {
    let mut rig = Rig::new();
    rig.send(Command::FullCalibration);
    rig.send(Command::FullCalibration);
    assert_eq!(rig.hw.full_calls(), 2);
    assert!(rig.hw.channel_calls().is_empty());
    assert_eq!(rig.dispatcher.mode(), Mode::Configuring);
}

#[test]
fn calibration_failure_is_not_a_setting_error() {
    let mut rig = Rig::new();
    rig.hw.fail_calibration = true;
    rig.set(gain(0, 0, 3, 2.0));
    rig.send(Command::EnterSampling);
    assert_eq!(rig.dispatcher.mode(), Mode::Sampling);
    assert!(rig.dispatcher.settings().is_calibrated());
    rig.send(Command::ReturnToConfig);
    assert_eq!(rig.last_error(), 0);
}

#[test]
fn sample_once_sends_raw_counts() {
    let mut rig = Rig::new();
    for (i, c) in rig.hw.sample.iter_mut().enumerate() {
        *c = 100 * i as u16;
    }
    rig.send(Command::SampleOnce);
    let sent = rig.link.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(&sent[0][..2], &[0, 0]);
    for i in 0..RAW_SAMPLE_LEN {
        assert_eq!(
            packet::read_u16_be(&sent[0], RAW_SAMPLE_OFFSET + i * 2),
            100 * i as u16
        );
    }
    assert_eq!(rig.hw.reads(), 1);
}

#[test]
fn game_mode_sends_rotated_sample() {
    let mut rig = Rig::new();
    rig.set(SetCommand::GameMode(1));
    rig.hw.sample[0] = 4096;
    rig.send(Command::SampleOnce);
    let sent = rig.link.take();
    assert_eq!(sent.len(), 1);
    for axis in 0..AXES {
        let v = packet::read_f32_be(&sent[0], axis * 4);
        assert!((v - 0.433_012_7).abs() < 1e-5, "axis {axis}: {v}");
    }
    // Finger 1 is at rest.
    assert_eq!(packet::read_f32_be(&sent[0], AXES * 4), 0.0);
}

#[test]
fn ticks_stream_samples_until_config() {
    let mut rig = Rig::new();
    assert!(!rig.dispatcher.acquisition_tick(&mut rig.hw, &mut rig.link));
    rig.send(Command::EnterSampling);
    for _ in 0..3 {
        assert!(rig.dispatcher.acquisition_tick(&mut rig.hw, &mut rig.link));
    }
    rig.send(Command::ReturnToConfig);
    assert!(!rig.dispatcher.acquisition_tick(&mut rig.hw, &mut rig.link));
    assert_eq!(rig.link.sent.len(), 3);
    assert_eq!(rig.dispatcher.samples_sent(), 3);
}

#[test]
fn broken_link_does_not_count_samples() {
    let mut rig = Rig::new();
    rig.link.broken = true;
    rig.send(Command::SampleOnce);
    assert_eq!(rig.dispatcher.samples_sent(), 0);
    assert_eq!(rig.dispatcher.packets_handled(), 1);
}

#[test]
fn unknown_tag_is_silent() {
    let mut rig = Rig::new();
    rig.set(SetCommand::GameMode(9));
    let mut p = packet::empty();
    p[0] = b'z';
    p[1] = 0xff;
    rig.send_packet(&mut p);
    assert!(rig.link.sent.is_empty());
    assert_eq!(rig.last_error(), SettingsError::InvalidFlag.code());
}
