//! Sweep assembly and timestamped CSV logging for 64-channel sensor readings.
//!
//! Decoded readings are gathered into a [`Sweep`] (one value per channel)
//! by a [`SweepAssembler`], and each full sweep becomes one row written by a
//! [`LogWriter`]:
//!
//! ```text
//! 2024-05-01T12:00:00.000123,512,3,1023,...,77
//! ```

pub mod config;
pub mod error;
pub mod sweep;
pub mod writer;

pub use config::{LogConfig, DEFAULT_BASEDIR, DEFAULT_FILENAME_TEMPLATE};
pub use error::{Result, SinkError};
pub use sweep::{Sweep, SweepAssembler};
pub use writer::{format_row, format_timestamp, LogWriter, FIELDS_PER_ROW};
