//! Application core: pure domain logic, zero I/O.
//!
//! The command dispatcher, its mode state machine, and the calibration
//! trigger live here.  All interaction with hardware and the host link
//! happens through **port traits** defined in [`ports`], keeping this layer
//! fully testable without real peripherals.

pub mod calibration;
pub mod commands;
pub mod dispatcher;
pub mod events;
pub mod mode;
pub mod ports;
pub mod sampling;
