//! Integration tests: dispatcher → calibration trigger → PGA driver on a
//! recording SPI bus.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{ErrorType, Operation, SpiDevice};

use glovectl::adapters::hardware::HardwareAdapter;
use glovectl::adapters::sim::SimulatedFrontEnd;
use glovectl::app::calibration::{self, NullCalibrator};
use glovectl::app::commands::{Command, SetCommand};
use glovectl::app::mode::Mode;
use glovectl::app::ports::{AcquisitionPort, CalibrationPort};
use glovectl::drivers::pga::{self, CMD_WRITE_GAINS, PgaDriver};
use glovectl::geometry::{CELL_COUNT, Cell};
use glovectl::pins;
use glovectl::protocol::codec;
use glovectl::settings::Settings;
use glovectl::{DeviceConfig, Dispatcher};

use crate::mock_hw::{MockHardware, MockLink, MockSink};

#[derive(Default)]
struct RecordingSpi {
    frames: Vec<Vec<u8>>,
}

impl ErrorType for RecordingSpi {
    type Error = core::convert::Infallible;
}

impl SpiDevice for RecordingSpi {
    fn transaction(
        &mut self,
        operations: &mut [Operation<'_, u8>],
    ) -> Result<(), core::convert::Infallible> {
        for op in operations {
            if let Operation::Write(buf) = op {
                self.frames.push(buf.to_vec());
            }
        }
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

type Board = HardwareAdapter<SimulatedFrontEnd, PgaDriver<RecordingSpi, NoDelay>>;

fn board(config: &DeviceConfig) -> Board {
    HardwareAdapter::new(
        SimulatedFrontEnd::new(config),
        PgaDriver::new(RecordingSpi::default(), NoDelay),
    )
}

fn run<H: AcquisitionPort + CalibrationPort>(d: &mut Dispatcher, hw: &mut H, cmd: Command) {
    let mut p = codec::encode_command(&cmd);
    d.handle_packet(&mut p, hw, &mut MockLink::new(), &mut MockSink::default());
}

fn set_gain(finger: i8, channel: i8, stage: i8, value: f32) -> Command {
    Command::Set(SetCommand::Gain {
        finger,
        channel,
        stage,
        value,
    })
}

#[test]
fn acquire_writes_one_frame_per_changed_cell() {
    let config = DeviceConfig::default();
    let mut d = Dispatcher::new(&config);
    let mut hw = board(&config);

    run(&mut d, &mut hw, set_gain(1, -1, 0, 2.0));
    run(&mut d, &mut hw, set_gain(4, 2, 3, 0.5));
    run(&mut d, &mut hw, Command::EnterSampling);

    let (_, pga) = hw.into_parts();
    assert_eq!(pga.frames(), 5);
    let (spi, _) = pga.release();
    let expected: Vec<_> = (0..4)
        .map(|c| {
            pga::encode_frame(
                pins::MUX_PINS[1][c],
                d.settings().gains().cell(Cell::new(1, c)),
            )
        })
        .chain(std::iter::once(pga::encode_frame(
            pins::MUX_PINS[4][2],
            d.settings().gains().cell(Cell::new(4, 2)),
        )))
        .map(|f| f.to_vec())
        .collect();
    assert_eq!(spi.frames, expected);
}

#[test]
fn second_acquire_without_changes_touches_nothing() {
    let config = DeviceConfig::default();
    let mut d = Dispatcher::new(&config);
    let mut hw = board(&config);

    run(&mut d, &mut hw, set_gain(0, 0, 0, 3.0));
    run(&mut d, &mut hw, Command::EnterSampling);
    run(&mut d, &mut hw, Command::ReturnToConfig);
    run(&mut d, &mut hw, Command::EnterSampling);

    assert_eq!(hw.calibrator().frames(), 1);
}

#[test]
fn setting_a_gain_back_to_its_calibrated_value_is_not_a_change() {
    let config = DeviceConfig::default();
    let mut d = Dispatcher::new(&config);
    let mut hw = board(&config);

    run(&mut d, &mut hw, set_gain(3, 3, 1, 9.0));
    run(&mut d, &mut hw, set_gain(3, 3, 1, 1.0));
    run(&mut d, &mut hw, Command::EnterSampling);

    assert_eq!(hw.calibrator().frames(), 0);
}

#[test]
fn full_calibration_writes_every_cell() {
    let config = DeviceConfig::default();
    let mut d = Dispatcher::new(&config);
    let mut hw = board(&config);

    run(&mut d, &mut hw, Command::FullCalibration);

    let (_, pga) = hw.into_parts();
    let (spi, _) = pga.release();
    assert_eq!(spi.frames.len(), CELL_COUNT);
    assert_eq!(spi.frames[0][0], CMD_WRITE_GAINS);
    assert_eq!(spi.frames[CELL_COUNT - 1][0], CMD_WRITE_GAINS | 4);
}

#[test]
fn disabled_hardware_still_tracks_shadow() {
    let config = DeviceConfig {
        hardware_calibration: false,
        ..DeviceConfig::default()
    };
    let mut d = Dispatcher::new(&config);
    let mut hw = HardwareAdapter::new(
        SimulatedFrontEnd::new(&config),
        None::<PgaDriver<RecordingSpi, NoDelay>>,
    );

    run(&mut d, &mut hw, set_gain(-1, 0, 2, 0.1));
    assert!(!d.settings().is_calibrated());
    run(&mut d, &mut hw, Command::EnterSampling);
    assert!(d.settings().is_calibrated());
    assert_eq!(d.mode(), Mode::Sampling);
    assert!(hw.calibrator().is_none());

    run(&mut d, &mut hw, Command::ReturnToConfig);
    run(&mut d, &mut hw, Command::FullCalibration);
    assert!(d.settings().is_calibrated());
}

#[test]
fn enabled_option_drives_the_pga() {
    let config = DeviceConfig::default();
    let mut d = Dispatcher::new(&config);
    let mut hw = HardwareAdapter::new(
        SimulatedFrontEnd::new(&config),
        Some(PgaDriver::new(RecordingSpi::default(), NoDelay)),
    );

    run(&mut d, &mut hw, set_gain(2, 3, 0, 6.0));
    run(&mut d, &mut hw, Command::EnterSampling);

    let frames = hw.calibrator().as_ref().map(|pga| pga.frames());
    assert_eq!(frames, Some(1));
}

#[test]
fn smart_pass_reports_cells_in_finger_major_order() {
    let mut settings = Settings::new(&DeviceConfig::default());
    settings.set_gain(4, 0, 0, 2.0).unwrap();
    settings.set_gain(0, 3, 0, 2.0).unwrap();
    settings.set_gain(2, 2, 0, 2.0).unwrap();

    let mut hw = MockHardware::new();
    let (changed, summary) = calibration::smart_recalibrate(&mut settings, &mut hw);

    assert_eq!(
        changed.as_slice(),
        &[Cell::new(0, 3), Cell::new(2, 2), Cell::new(4, 0)]
    );
    assert_eq!(summary.cells, 3);
    let muxes: Vec<_> = hw.channel_calls().into_iter().map(|(m, _)| m).collect();
    assert_eq!(
        muxes,
        vec![
            pins::MUX_PINS[0][3],
            pins::MUX_PINS[2][2],
            pins::MUX_PINS[4][0]
        ]
    );
}

#[test]
fn null_calibrator_full_pass_syncs() {
    let mut settings = Settings::new(&DeviceConfig::default());
    settings.set_gain(-1, -1, 0, 8.0).unwrap();
    let summary = calibration::full_recalibrate(&mut settings, &mut NullCalibrator);
    assert!(summary.full);
    assert_eq!(summary.failures, 0);
    assert!(settings.is_calibrated());
}
