//! Glove controller firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  FramedLink<UartTransport>   HardwareAdapter   LogEventSink  │
//! │  (PacketLink)                (Acquisition +    (EventSink)   │
//! │                               Calibration)                   │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ─────────────────       │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │          Dispatcher (pure logic)                       │  │
//! │  │  Mode · Settings · Calibration trigger · Sampling     │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! One thread.  Each loop iteration feeds the task watchdog, drains the
//! UART into the packet framer, handles at most one complete packet, then
//! emits a sample if sampling mode is active and the sample period has
//! elapsed.  The loop always sleeps before the next poll.
#![deny(unused_must_use)]

use std::time::{Duration, Instant};

use anyhow::Result;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyIOPin, Pin};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::spi::{SpiDeviceDriver, SpiDriverConfig, config::Config as SpiConfig};
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;
use log::{error, info, warn};

use glovectl::adapters::hardware::HardwareAdapter;
use glovectl::adapters::log_sink::LogEventSink;
use glovectl::adapters::packet_link::FramedLink;
use glovectl::adapters::uart::UartTransport;
use glovectl::app::sampling::Rotation;
use glovectl::drivers::front_end::AnalogFrontEnd;
use glovectl::drivers::hw_init;
use glovectl::drivers::pga::PgaDriver;
use glovectl::drivers::watchdog::Watchdog;
use glovectl::pins;
use glovectl::protocol::packet;
use glovectl::{DeviceConfig, Dispatcher};

/// Task watchdog timeout for the main loop.
const WATCHDOG_TIMEOUT_MS: u32 = 5_000;
/// Longest sleep between link polls while waiting for the next sample.
const MAX_POLL_SLEEP: Duration = Duration::from_millis(10);

/// Hand a typed pin through after checking it is the GPIO `pins` assigns
/// to `role`.
fn claim<P: Pin>(pin: P, gpio: i32, role: &str) -> Result<P> {
    anyhow::ensure!(
        i64::from(pin.pin()) == i64::from(gpio),
        "{role}: board wiring is GPIO{gpio}, driver got GPIO{}",
        pin.pin()
    );
    Ok(pin)
}

/// Sleep until `deadline`, but no longer than [`MAX_POLL_SLEEP`] so a `c`
/// from the host is still seen promptly.  Sub-millisecond waits spin in
/// ROM because the scheduler tick is coarser.
fn sleep_until(deadline: Instant) {
    let left = deadline.saturating_duration_since(Instant::now());
    let ms = left.min(MAX_POLL_SLEEP).as_millis() as u32;
    if ms > 0 {
        FreeRtos::delay_ms(ms);
    } else {
        Ets::delay_us(left.as_micros() as u32);
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("glovectl v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Config ─────────────────────────────────────────────
    let config = match option_env!("GLOVECTL_CONFIG_JSON") {
        Some(json) => {
            info!("Using build-time config override");
            DeviceConfig::from_json(json)?
        }
        None => DeviceConfig::default(),
    };
    config.validate().map_err(|e| anyhow::anyhow!("invalid config: {e}"))?;

    // ── 3. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Without the ADC and mux lines there is nothing to sample.
        error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let mut watchdog = Watchdog::subscribe(WATCHDOG_TIMEOUT_MS);
    let p = Peripherals::take()?;

    let uart = UartDriver::new(
        p.uart1,
        claim(p.pins.gpio17, pins::HOST_UART_TX_GPIO, "UART TX")?,
        claim(p.pins.gpio18, pins::HOST_UART_RX_GPIO, "UART RX")?,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::default().baudrate(Hertz(pins::HOST_UART_BAUD)),
    )?;
    let mut link = FramedLink::new(UartTransport::new(uart));
    info!("Host link on UART1 @ {} baud", pins::HOST_UART_BAUD);

    let calibrator = if config.hardware_calibration {
        let spi = SpiDeviceDriver::new_single(
            p.spi2,
            claim(p.pins.gpio12, pins::PGA_SCLK_GPIO, "PGA SCLK")?,
            claim(p.pins.gpio11, pins::PGA_MOSI_GPIO, "PGA MOSI")?,
            Some(claim(p.pins.gpio13, pins::PGA_MISO_GPIO, "PGA MISO")?),
            Some(claim(p.pins.gpio10, pins::PGA_CS_GPIO, "PGA CS")?),
            &SpiDriverConfig::new(),
            &SpiConfig::new()
                .baudrate(Hertz(pins::PGA_SPI_FREQ_HZ))
                .data_mode(embedded_hal::spi::MODE_0),
        )?;
        info!("PGA chain on SPI2 @ {} Hz", pins::PGA_SPI_FREQ_HZ);
        Some(PgaDriver::new(spi, Ets))
    } else {
        warn!("Hardware calibration disabled; gains are tracked only");
        None
    };

    let front_end = AnalogFrontEnd::new(Rotation::from_config(&config), Ets);
    let mut hw = HardwareAdapter::new(front_end, calibrator);
    let mut sink = LogEventSink::new();

    // ── 4. Dispatcher ─────────────────────────────────────────
    let mut dispatcher = Dispatcher::new(&config);
    dispatcher.start(&mut sink);

    // ── 5. Main loop ──────────────────────────────────────────
    let mut rx = packet::empty();
    let mut next_sample = Instant::now();

    loop {
        watchdog.feed();

        match link.poll_packet(&mut rx) {
            Ok(true) => dispatcher.handle_packet(&mut rx, &mut hw, &mut link, &mut sink),
            Ok(false) => {}
            Err(e) => {
                warn!("Host link read failed: {}", e);
                link.resync();
            }
        }

        if dispatcher.mode().is_sampling() {
            let now = Instant::now();
            if now >= next_sample {
                dispatcher.acquisition_tick(&mut hw, &mut link);
                next_sample = now + dispatcher.sample_period();
            }
            sleep_until(next_sample);
        } else {
            FreeRtos::delay_ms(1);
            next_sample = Instant::now();
        }
    }
}
