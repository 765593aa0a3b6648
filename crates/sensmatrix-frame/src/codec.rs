use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};
use crate::protocol::{Reading, LSB_MASK, LSB_PADDING, MARKER_BIT, MAX_CHANNEL, MAX_VALUE};

/// Encode a reading into its 3 wire bytes.
///
/// Wire format:
/// ```text
/// ┌────────────────────┬──────────────────────┬──────────────────────────┐
/// │ Marker             │ MSB                  │ LSB                      │
/// │ 1 ccc ccc x        │ 0 00 vvvv x          │ 0 vvvvvv 1               │
/// │ channel << 1 | 0x80│ (value >> 6) << 1    │ (value & 0x3F) << 1 | 1  │
/// └────────────────────┴──────────────────────┴──────────────────────────┘
/// ```
pub fn encode_bytes(reading: Reading) -> Result<[u8; 3]> {
    if reading.channel > MAX_CHANNEL {
        return Err(FrameError::ChannelOutOfRange(reading.channel));
    }
    if reading.value > MAX_VALUE {
        return Err(FrameError::ValueOutOfRange(reading.value));
    }

    let marker = (reading.channel << 1) | MARKER_BIT;
    let msb = ((reading.value >> 6) as u8) << 1;
    let lsb = (((reading.value as u8) & LSB_MASK) << 1) | LSB_PADDING;
    Ok([marker, msb, lsb])
}

/// Encode a reading and append it to `dst`.
pub fn encode_frame(reading: Reading, dst: &mut BytesMut) -> Result<()> {
    let wire = encode_bytes(reading)?;
    dst.reserve(wire.len());
    dst.put_slice(&wire);
    Ok(())
}

#[cfg(feature = "async")]
pub use self::tokio_codec::SensorCodec;

#[cfg(feature = "async")]
mod tokio_codec {
    use bytes::{Buf, BytesMut};
    use tokio_util::codec::{Decoder, Encoder};

    use super::encode_frame;
    use crate::decoder::{FrameDecoder, Step};
    use crate::error::FrameError;
    use crate::protocol::Reading;

    /// `tokio_util` codec over the same state machine as the blocking reader.
    ///
    /// Partial frames survive across `decode` calls, so arbitrarily chunked
    /// input decodes the same as a byte-at-a-time stream.
    #[derive(Debug, Default)]
    pub struct SensorCodec {
        decoder: FrameDecoder,
    }

    impl SensorCodec {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Decoder for SensorCodec {
        type Item = Reading;
        type Error = FrameError;

        fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Reading>, FrameError> {
            while src.has_remaining() {
                let byte = src.get_u8();
                if let Step::Complete(reading) = self.decoder.push(byte) {
                    return Ok(Some(reading));
                }
            }
            Ok(None)
        }

        fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Reading>, FrameError> {
            match self.decode(src)? {
                Some(reading) => Ok(Some(reading)),
                None if self.decoder.is_hunting() => Ok(None),
                None => Err(FrameError::EndOfStream),
            }
        }
    }

    impl Encoder<Reading> for SensorCodec {
        type Error = FrameError;

        fn encode(&mut self, item: Reading, dst: &mut BytesMut) -> Result<(), FrameError> {
            encode_frame(item, dst)
        }
    }
}
