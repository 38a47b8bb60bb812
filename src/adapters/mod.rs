//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements          | Connects to                  |
//! |---------------|---------------------|------------------------------|
//! | `hardware`    | AcquisitionPort     | front-end driver             |
//! |               | CalibrationPort     | PGA driver (or none)         |
//! | `log_sink`    | EventSink           | Serial log output            |
//! | `packet_link` | PacketLink          | any byte `Transport`         |
//! | `sim`         | AcquisitionPort     | synthetic counts (host runs) |
//! | `uart`        | Transport           | ESP-IDF UART (espidf only)   |

pub mod hardware;
pub mod log_sink;
pub mod packet_link;
pub mod sim;
#[cfg(target_os = "espidf")]
pub mod uart;
