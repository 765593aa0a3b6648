use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};

use sensmatrix_frame::{FrameError, FrameReader, Reading};
use sensmatrix_sink::{LogWriter, Sweep, SweepAssembler};

use crate::error::Result;

/// Why a recording run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The requested number of sweeps was written.
    SweepLimit,
    /// The byte source ran dry.
    EndOfStream,
    /// The caller cleared the running flag.
    Stopped,
}

/// Totals for one recording run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSummary {
    pub frames: u64,
    pub sweeps: u64,
    pub discarded: u64,
    pub resyncs: u64,
    pub overwrites: u64,
    /// Channels held by the unfinished sweep when the run ended. Never written.
    pub pending: usize,
    pub reason: StopReason,
}

/// Drives bytes from a source through the decoder into the sweep log.
///
/// Single-threaded: one frame is decoded, slotted and (when a sweep
/// completes) written before the next byte is read.
pub struct Recorder<T> {
    reader: FrameReader<T>,
    assembler: SweepAssembler,
    writer: LogWriter,
}

impl<T: Read> Recorder<T> {
    pub fn new(source: T, writer: LogWriter) -> Self {
        Self {
            reader: FrameReader::new(source),
            assembler: SweepAssembler::new(),
            writer,
        }
    }

    /// Decode one frame and write the sweep it completes, if any.
    pub fn step(&mut self) -> Result<(Reading, Option<Sweep>)> {
        let reading = self.reader.read_frame()?;
        let sweep = self.assembler.push(reading);
        if let Some(sweep) = &sweep {
            self.writer.write(sweep.values())?;
        }
        Ok((reading, sweep))
    }

    /// Record until `max_sweeps` rows are written, the source ends, or
    /// `running` is cleared. End of stream is a normal stop, not an error.
    pub fn run(
        &mut self,
        max_sweeps: Option<u64>,
        running: &AtomicBool,
    ) -> Result<RecordSummary> {
        let start = self.assembler.completed();

        let reason = loop {
            if max_sweeps.is_some_and(|max| self.assembler.completed() - start >= max) {
                break StopReason::SweepLimit;
            }
            if !running.load(Ordering::SeqCst) {
                break StopReason::Stopped;
            }

            match self.step() {
                Ok(_) => {}
                Err(crate::Error::Frame(FrameError::EndOfStream)) => {
                    break StopReason::EndOfStream
                }
                Err(err) => return Err(err),
            }
        };

        let summary = self.summary(reason);
        if summary.pending > 0 {
            tracing::debug!(pending = summary.pending, "dropping incomplete sweep");
        }
        tracing::info!(
            frames = summary.frames,
            sweeps = summary.sweeps,
            discarded = summary.discarded,
            reason = ?reason,
            "recording stopped"
        );
        Ok(summary)
    }

    pub fn summary(&self, reason: StopReason) -> RecordSummary {
        let stats = self.reader.stats();
        RecordSummary {
            frames: stats.frames,
            sweeps: self.assembler.completed(),
            discarded: stats.discarded,
            resyncs: stats.resyncs,
            overwrites: self.assembler.overwrites(),
            pending: self.assembler.pending(),
            reason,
        }
    }

    pub fn writer(&self) -> &LogWriter {
        &self.writer
    }

    /// Close the log and hand back the source.
    pub fn finish(mut self) -> Result<T> {
        self.writer.close()?;
        let Self { reader, .. } = self;
        Ok(reader.into_inner())
    }
}
