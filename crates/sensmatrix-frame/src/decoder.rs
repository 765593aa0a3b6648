use std::io::{ErrorKind, Read};

use crate::error::{FrameError, Result};
use crate::protocol::{channel_from_marker, is_marker, value_from_data, Reading, MAX_VALUE};

/// Where the decoder is inside a frame.
///
/// `Hunting` is both the initial state and the state re-entered after every
/// completed frame. Only bytes seen while hunting are checked for the marker
/// bit; the two data bytes are taken unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoderState {
    #[default]
    Hunting,
    GotChannel {
        channel: u8,
    },
    GotMsb {
        channel: u8,
        msb: u8,
    },
}

/// Outcome of feeding one byte to a [`FrameDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Step {
    /// A non-marker byte was dropped while hunting.
    Discarded(u8),
    /// The byte was consumed and the frame is still incomplete.
    Pending,
    /// The byte completed a frame.
    Complete(Reading),
}

/// Byte-at-a-time frame state machine.
///
/// Holds no I/O; callers feed it bytes from whatever source they have.
#[derive(Debug, Clone, Default)]
pub struct FrameDecoder {
    state: DecoderState,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// True while the decoder is waiting for a marker byte.
    pub fn is_hunting(&self) -> bool {
        self.state == DecoderState::Hunting
    }

    /// Drop any partial frame and go back to hunting.
    pub fn reset(&mut self) {
        self.state = DecoderState::Hunting;
    }

    /// Advance the state machine by one byte.
    ///
    /// A marker byte that arrives in a data position is consumed as data.
    /// The protocol has no way to detect that, so neither does the decoder.
    pub fn push(&mut self, byte: u8) -> Step {
        match self.state {
            DecoderState::Hunting => {
                if !is_marker(byte) {
                    return Step::Discarded(byte);
                }
                self.state = DecoderState::GotChannel {
                    channel: channel_from_marker(byte),
                };
                Step::Pending
            }
            DecoderState::GotChannel { channel } => {
                self.state = DecoderState::GotMsb { channel, msb: byte };
                Step::Pending
            }
            DecoderState::GotMsb { channel, msb } => {
                self.state = DecoderState::Hunting;
                let value = value_from_data(msb, byte);
                debug_assert!(value <= MAX_VALUE, "value out of bounds: {value}");
                Step::Complete(Reading { channel, value })
            }
        }
    }
}

/// Read bytes until a marker arrives and return its channel number.
///
/// Non-marker bytes are discarded. Blocks as long as the source blocks;
/// returns [`FrameError::EndOfStream`] once the source is exhausted.
pub fn read_channel<R: Read + ?Sized>(source: &mut R) -> Result<u8> {
    let mut decoder = FrameDecoder::new();
    loop {
        let _ = decoder.push(read_byte(source)?);
        if let DecoderState::GotChannel { channel } = decoder.state() {
            return Ok(channel);
        }
    }
}

/// Read one complete frame: synchronize on a marker, then take two data bytes.
pub fn read_frame<R: Read + ?Sized>(source: &mut R) -> Result<Reading> {
    let mut decoder = FrameDecoder::new();
    loop {
        if let Step::Complete(reading) = decoder.push(read_byte(source)?) {
            return Ok(reading);
        }
    }
}

/// Blocking single-byte read. Interrupted reads are retried.
pub(crate) fn read_byte<R: Read + ?Sized>(source: &mut R) -> Result<u8> {
    let mut byte = [0u8; 1];
    loop {
        match source.read(&mut byte) {
            Ok(0) => return Err(FrameError::EndOfStream),
            Ok(_) => return Ok(byte[0]),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
}
