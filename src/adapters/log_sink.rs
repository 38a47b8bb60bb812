//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the logger
//! (UART console on the board, stderr in host runs).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(mode) => {
                info!("START | mode={}", mode);
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE  | {} -> {}", from, to);
            }
            AppEvent::Recalibrated(summary) => {
                let kind = if summary.full { "full" } else { "smart" };
                if summary.failures == 0 {
                    info!("CALIB | {} pass, {} cell(s)", kind, summary.cells);
                } else {
                    warn!(
                        "CALIB | {} pass, {} cell(s), {} failure(s)",
                        kind, summary.cells, summary.failures
                    );
                }
            }
            AppEvent::SettingRejected(err) => {
                warn!("SET   | rejected: {} (code {})", err, err.code());
            }
        }
    }
}
