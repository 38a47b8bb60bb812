//! Peripheral drivers and one-shot hardware initialisation.

pub mod front_end;
pub mod hw_init;
pub mod pga;
pub mod watchdog;
