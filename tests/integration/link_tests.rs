//! Integration tests: byte transport → FramedLink → Dispatcher → back out.

use glovectl::adapters::hardware::HardwareAdapter;
use glovectl::adapters::packet_link::FramedLink;
use glovectl::adapters::sim::SimulatedFrontEnd;
use glovectl::app::calibration::NullCalibrator;
use glovectl::app::commands::{Command, GetCommand, SetCommand};
use glovectl::protocol::codec;
use glovectl::protocol::packet::{self, PACKET_LEN};
use glovectl::{DeviceConfig, Dispatcher};

use crate::mock_hw::{LoopbackTransport, MockSink};

/// Pump every complete packet currently buffered through the dispatcher.
fn pump(
    d: &mut Dispatcher,
    link: &mut FramedLink<LoopbackTransport>,
    hw: &mut HardwareAdapter<SimulatedFrontEnd, NullCalibrator>,
) -> usize {
    let mut rx = packet::empty();
    let mut sink = MockSink::default();
    let mut handled = 0;
    while link.poll_packet(&mut rx).unwrap() {
        d.handle_packet(&mut rx, hw, link, &mut sink);
        handled += 1;
    }
    handled
}

fn rig(chunk: usize) -> (
    Dispatcher,
    FramedLink<LoopbackTransport>,
    HardwareAdapter<SimulatedFrontEnd, NullCalibrator>,
) {
    let config = DeviceConfig::default();
    (
        Dispatcher::new(&config),
        FramedLink::new(LoopbackTransport::new(chunk)),
        HardwareAdapter::new(SimulatedFrontEnd::at_rest(&config), NullCalibrator),
    )
}

#[test]
fn frequency_round_trip_over_the_wire() {
    let (mut d, mut link, mut hw) = rig(13);
    let t = link.transport_mut();
    t.push_packet(&codec::encode_command(&Command::Set(
        SetCommand::SamplingFrequency(3000.0),
    )));
    t.push_packet(&codec::encode_command(&Command::Get(
        GetCommand::SamplingFrequency,
    )));

    assert_eq!(pump(&mut d, &mut link, &mut hw), 2);

    let out = link.into_inner().outbound;
    assert_eq!(out.len(), PACKET_LEN);
    assert_eq!(&out[..4], &[0x45, 0x3B, 0x80, 0x00]);
    assert!(out[4..].iter().all(|&b| b == 0));
}

#[test]
fn half_packet_waits_for_the_rest() {
    let (mut d, mut link, mut hw) = rig(64);
    let get = codec::encode_command(&Command::Get(GetCommand::LastError));
    link.transport_mut().inbound.extend(&get[..40]);
    assert_eq!(pump(&mut d, &mut link, &mut hw), 0);
    assert_eq!(link.pending(), 40);

    link.transport_mut().inbound.extend(&get[40..]);
    assert_eq!(pump(&mut d, &mut link, &mut hw), 1);
    assert_eq!(link.transport().sent_packets(), vec![packet::empty()]);
}

#[test]
fn sampling_stream_is_whole_packets() {
    let (mut d, mut link, mut hw) = rig(9);
    link.transport_mut()
        .push_packet(&codec::encode_command(&Command::EnterSampling));
    pump(&mut d, &mut link, &mut hw);

    for _ in 0..4 {
        d.acquisition_tick(&mut hw, &mut link);
    }
    let sent = link.transport().sent_packets();
    assert_eq!(sent.len(), 4);
    assert_eq!(link.transport().outbound.len(), 4 * PACKET_LEN);
    // Rest position: every count at midscale.
    for p in &sent {
        assert_eq!(packet::read_u16_be(p, codec::RAW_SAMPLE_OFFSET), 2048);
    }
}
