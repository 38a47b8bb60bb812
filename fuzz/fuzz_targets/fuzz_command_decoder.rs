//! Fuzz target: `decode_command` and `Dispatcher::handle_packet`
//!
//! Splits the input into 64-byte packets and drives each one through the
//! decoder and then a live dispatcher with null adapters.  Asserts that
//! nothing panics, every handled packet comes back zeroed, and a decoded
//! command survives an encode/decode cycle.
//!
//! cargo fuzz run fuzz_command_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;

use glovectl::adapters::hardware::HardwareAdapter;
use glovectl::adapters::log_sink::LogEventSink;
use glovectl::adapters::packet_link::FramedLink;
use glovectl::adapters::sim::SimulatedFrontEnd;
use glovectl::app::calibration::NullCalibrator;
use glovectl::protocol::codec::{decode_command, encode_command};
use glovectl::protocol::packet::{self, PACKET_LEN};
use glovectl::protocol::transport::NullTransport;
use glovectl::{DeviceConfig, Dispatcher};

fuzz_target!(|data: &[u8]| {
    let config = DeviceConfig::default();
    let mut dispatcher = Dispatcher::new(&config);
    let mut hw = HardwareAdapter::new(SimulatedFrontEnd::new(&config), NullCalibrator);
    let mut link = FramedLink::new(NullTransport::default());
    let mut sink = LogEventSink::new();

    for chunk in data.chunks(PACKET_LEN) {
        let mut pkt = packet::empty();
        pkt[..chunk.len()].copy_from_slice(chunk);

        if let Some(cmd) = decode_command(&pkt) {
            // Bit-exact: NaN payloads must survive too.
            let again = decode_command(&encode_command(&cmd));
            assert_eq!(format!("{:?}", again), format!("{:?}", Some(cmd)));
        }

        dispatcher.handle_packet(&mut pkt, &mut hw, &mut link, &mut sink);
        assert!(pkt.iter().all(|&b| b == 0), "packet not zeroed");
        dispatcher.acquisition_tick(&mut hw, &mut link);
    }
});
