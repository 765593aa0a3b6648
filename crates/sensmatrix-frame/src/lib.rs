//! Marker-bit framing for the 64-channel serial sensor protocol.
//!
//! Every reading travels as a 3-byte frame:
//! - A marker byte with bit 7 set, carrying the channel in bits 6..1
//! - An MSB data byte carrying value bits 9..6 in bits 4..1
//! - An LSB data byte carrying value bits 5..0 in bits 6..1
//!
//! There is no length, delimiter or checksum. The decoder synchronizes by
//! discarding bytes until it sees a marker.

pub mod codec;
pub mod decoder;
pub mod error;
pub mod protocol;
pub mod reader;

pub use codec::{encode_bytes, encode_frame};
#[cfg(feature = "async")]
pub use codec::SensorCodec;
pub use decoder::{read_channel, read_frame, DecoderState, FrameDecoder, Step};
pub use error::{FrameError, Result};
pub use protocol::{Reading, CHANNEL_COUNT, FRAME_SIZE, MAX_CHANNEL, MAX_VALUE};
pub use reader::{FrameReader, Frames, ReaderStats};
