use std::time::Duration;

/// Delay applied once per read call, roughly matching the serial link.
pub const DEFAULT_PACE: Duration = Duration::from_micros(100);

/// Knobs for the synthetic sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    /// Sleep after each read. `Duration::ZERO` disables pacing.
    pub pace: Duration,
    /// Stop after this many frames; reads then report end of stream.
    pub frames: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            pace: DEFAULT_PACE,
            frames: None,
        }
    }
}

impl SimConfig {
    /// Unpaced and unbounded, for tests and benchmarks.
    pub fn unpaced() -> Self {
        Self {
            pace: Duration::ZERO,
            frames: None,
        }
    }
}
