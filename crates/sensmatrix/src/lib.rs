//! Decode a 64-channel marker-bit sensor stream and log sweeps as CSV.
//!
//! # Crate Structure
//!
//! - [`frame`] — Marker-bit framing decoder and encoder
//! - [`sink`] — Sweep assembly and timestamped CSV log writer
//! - [`sim`] — Synthetic sensor speaking the same protocol (behind `sim` feature)
//! - [`pipeline`] — Source → decoder → sweep → log loop

pub mod error;
pub mod pipeline;

pub use error::{Error, Result};
pub use pipeline::{RecordSummary, Recorder, StopReason};

/// Re-export frame types.
pub mod frame {
    pub use sensmatrix_frame::*;
}

/// Re-export sink types.
pub mod sink {
    pub use sensmatrix_sink::*;
}

/// Re-export simulator types (requires `sim` feature).
#[cfg(feature = "sim")]
pub mod sim {
    pub use sensmatrix_sim::*;
}
