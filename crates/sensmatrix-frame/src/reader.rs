use std::io::Read;

use crate::decoder::{read_byte, FrameDecoder, Step};
use crate::error::Result;
use crate::protocol::Reading;

/// Running counters kept by a [`FrameReader`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    /// Complete frames returned to the caller.
    pub frames: u64,
    /// Bytes dropped while hunting for a marker.
    pub discarded: u64,
    /// Times the reader had to skip bytes before finding a marker.
    pub resyncs: u64,
}

/// Reads complete frames from any `Read` source.
///
/// Pulls exactly one byte per read call, so the source's cursor never runs
/// ahead of the decoder. Wrap slow device handles in a `BufReader` if needed.
pub struct FrameReader<T> {
    inner: T,
    decoder: FrameDecoder,
    stats: ReaderStats,
}

impl<T: Read> FrameReader<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            decoder: FrameDecoder::new(),
            stats: ReaderStats::default(),
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(FrameError::EndOfStream)` when the source is exhausted.
    /// A partial frame at that point is kept, so a source that later yields
    /// more bytes resumes where it stopped.
    pub fn read_frame(&mut self) -> Result<Reading> {
        let mut skipped = 0u64;
        loop {
            let byte = read_byte(&mut self.inner)?;
            match self.decoder.push(byte) {
                Step::Discarded(_) => {
                    skipped += 1;
                    self.stats.discarded += 1;
                }
                Step::Pending => {
                    if skipped > 0 && !self.decoder.is_hunting() {
                        self.stats.resyncs += 1;
                        tracing::trace!(skipped, "resynchronized on channel marker");
                        skipped = 0;
                    }
                }
                Step::Complete(reading) => {
                    self.stats.frames += 1;
                    return Ok(reading);
                }
            }
        }
    }

    /// Iterate over frames until the source fails or runs dry.
    pub fn frames(&mut self) -> Frames<'_, T> {
        Frames {
            reader: self,
            done: false,
        }
    }

    pub fn stats(&self) -> ReaderStats {
        self.stats
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying source.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner source.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

/// Iterator returned by [`FrameReader::frames`].
///
/// Ends cleanly at end of stream; any other error is yielded once and then
/// iteration stops.
pub struct Frames<'a, T> {
    reader: &'a mut FrameReader<T>,
    done: bool,
}

impl<T: Read> Iterator for Frames<'_, T> {
    type Item = Result<Reading>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_frame() {
            Ok(reading) => Some(Ok(reading)),
            Err(crate::FrameError::EndOfStream) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
