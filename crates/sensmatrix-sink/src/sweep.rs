use sensmatrix_frame::{Reading, CHANNEL_COUNT};

const ALL_FILLED: u64 = u64::MAX;

/// One complete sampling cycle: a value for every channel, indexed by channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sweep {
    values: [u16; CHANNEL_COUNT],
}

impl Sweep {
    pub fn values(&self) -> &[u16] {
        &self.values
    }

    pub fn get(&self, channel: u8) -> Option<u16> {
        self.values.get(usize::from(channel)).copied()
    }
}

/// Collects readings until every channel has reported once.
///
/// A channel that reports again before the sweep completes replaces its
/// earlier value. Only full sweeps ever leave the assembler.
#[derive(Debug, Clone)]
pub struct SweepAssembler {
    values: [u16; CHANNEL_COUNT],
    filled: u64,
    overwrites: u64,
    completed: u64,
}

impl Default for SweepAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepAssembler {
    pub fn new() -> Self {
        Self {
            values: [0; CHANNEL_COUNT],
            filled: 0,
            overwrites: 0,
            completed: 0,
        }
    }

    /// Slot a reading in. Returns the sweep it completed, if any.
    pub fn push(&mut self, reading: Reading) -> Option<Sweep> {
        let slot = reading.slot();
        if slot >= CHANNEL_COUNT {
            tracing::warn!(channel = reading.channel, "dropping reading for unknown channel");
            return None;
        }

        let bit = 1u64 << slot;
        if self.filled & bit != 0 {
            self.overwrites += 1;
            tracing::debug!(channel = reading.channel, "channel repeated before sweep completed");
        }
        self.values[slot] = reading.value;
        self.filled |= bit;

        if self.filled != ALL_FILLED {
            return None;
        }

        self.filled = 0;
        self.completed += 1;
        Some(Sweep {
            values: self.values,
        })
    }

    /// Number of channels filled in the current, incomplete sweep.
    pub fn pending(&self) -> usize {
        self.filled.count_ones() as usize
    }

    /// Readings that replaced a value already held for the current sweep.
    pub fn overwrites(&self) -> u64 {
        self.overwrites
    }

    /// Full sweeps handed out so far.
    pub fn completed(&self) -> u64 {
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completes_after_every_channel() {
        let mut asm = SweepAssembler::new();
        for channel in 0..63u8 {
            assert!(asm.push(Reading::new(channel, u16::from(channel) * 10)).is_none());
        }
        assert_eq!(asm.pending(), 63);

        let sweep = asm.push(Reading::new(63, 630)).expect("sweep should complete");
        assert_eq!(sweep.values().len(), CHANNEL_COUNT);
        for channel in 0..64u8 {
            assert_eq!(sweep.get(channel), Some(u16::from(channel) * 10));
        }
        assert_eq!(asm.pending(), 0);
        assert_eq!(asm.completed(), 1);
    }

    #[test]
    fn order_does_not_matter() {
        let mut asm = SweepAssembler::new();
        let mut result = None;
        for channel in (0..64u8).rev() {
            result = asm.push(Reading::new(channel, 1));
        }
        assert!(result.is_some());
    }

    #[test]
    fn repeated_channel_overwrites_without_completing() {
        let mut asm = SweepAssembler::new();
        for channel in 0..32u8 {
            assert!(asm.push(Reading::new(channel, 1)).is_none());
        }
        assert!(asm.push(Reading::new(5, 99)).is_none());
        assert_eq!(asm.overwrites(), 1);
        assert_eq!(asm.pending(), 32);

        let mut sweep = None;
        for channel in 32..64u8 {
            sweep = asm.push(Reading::new(channel, 2));
        }
        let sweep = sweep.expect("sweep should complete");
        assert_eq!(sweep.get(5), Some(99));
        assert_eq!(sweep.get(40), Some(2));
    }

    #[test]
    fn unknown_channel_is_ignored() {
        let mut asm = SweepAssembler::new();
        assert!(asm.push(Reading::new(64, 1)).is_none());
        assert_eq!(asm.pending(), 0);
    }

    #[test]
    fn second_sweep_starts_empty() {
        let mut asm = SweepAssembler::new();
        for channel in 0..64u8 {
            let _ = asm.push(Reading::new(channel, 0));
        }
        assert!(asm.push(Reading::new(0, 1)).is_none());
        assert_eq!(asm.pending(), 1);
    }
}
