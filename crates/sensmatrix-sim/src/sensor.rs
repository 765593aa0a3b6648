use std::io::{self, Read};

use bytes::BytesMut;
use rand::rngs::ThreadRng;
use rand::Rng;
use sensmatrix_frame::{encode_frame, Reading, FRAME_SIZE, MAX_CHANNEL, MAX_VALUE};

use crate::config::SimConfig;

/// Emulated sensor board exposed as a byte stream.
///
/// Frames are generated on demand. Reads always return the full requested
/// count (until a frame limit is hit); leftover bytes from a partially
/// consumed frame are kept for the next read.
pub struct FauxSensor<R = ThreadRng> {
    rng: R,
    config: SimConfig,
    channel: u8,
    emitted: u64,
    buf: BytesMut,
}

impl FauxSensor<ThreadRng> {
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    pub fn with_config(config: SimConfig) -> Self {
        Self::with_rng(rand::rng(), config)
    }
}

impl Default for FauxSensor<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> FauxSensor<R> {
    /// Build a sensor drawing values from `rng`. Seed it for reproducible streams.
    pub fn with_rng(rng: R, config: SimConfig) -> Self {
        Self {
            rng,
            config,
            channel: 0,
            emitted: 0,
            buf: BytesMut::with_capacity(FRAME_SIZE * 64),
        }
    }

    /// Channel the next generated frame will carry.
    pub fn next_channel(&self) -> u8 {
        self.channel
    }

    /// Frames generated so far, including any still buffered.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Bytes generated but not yet read.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// True once the configured frame limit has been generated.
    pub fn is_exhausted(&self) -> bool {
        self.config
            .frames
            .is_some_and(|limit| self.emitted >= limit)
    }

    /// Generate one frame into the internal buffer and return its reading.
    pub fn emit(&mut self) -> sensmatrix_frame::Result<Reading> {
        let reading = Reading::new(self.channel, self.rng.random_range(0..=MAX_VALUE));
        encode_frame(reading, &mut self.buf)?;

        self.channel = if self.channel < MAX_CHANNEL {
            self.channel + 1
        } else {
            0
        };
        self.emitted += 1;
        Ok(reading)
    }
}

impl<R: Rng> Read for FauxSensor<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }

        while self.buf.len() < out.len() && !self.is_exhausted() {
            self.emit().map_err(io::Error::other)?;
        }

        let n = out.len().min(self.buf.len());
        if n == 0 {
            tracing::debug!(frames = self.emitted, "synthetic sensor exhausted");
            return Ok(0);
        }
        out[..n].copy_from_slice(&self.buf.split_to(n));

        if !self.config.pace.is_zero() {
            std::thread::sleep(self.config.pace);
        }
        Ok(n)
    }
}
