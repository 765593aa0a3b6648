//! Synthetic stand-in for the 64-channel sensor board.
//!
//! [`FauxSensor`] implements `Read` and yields the same bit-packed frames the
//! hardware does, cycling through channels 0-63 with random 10-bit values.

pub mod config;
pub mod sensor;

pub use config::{SimConfig, DEFAULT_PACE};
pub use sensor::FauxSensor;
