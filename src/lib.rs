//! Glove controller firmware library.
//!
//! Exposes the command dispatcher, settings model and protocol codec for
//! integration testing and host-side tooling.  All ESP-IDF-specific code
//! is guarded by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod geometry;
pub mod pins;
pub mod protocol;
pub mod settings;

// Hardware-facing modules compile on every target; the board-only parts
// are cfg-gated inside.
pub mod adapters;
pub mod drivers;

pub use app::dispatcher::Dispatcher;
pub use config::DeviceConfig;
pub use error::{Error, ErrorCode, Result};
