//! Time measurement utilities

use std::time::{Duration, Instant};

/// Wall-clock timer started on creation
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Create a stopwatch that starts measuring immediately
    pub fn start_new() -> Self {
        Self { started: Instant::now() }
    }

    /// Time since the stopwatch was started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Running statistics over a series of measured durations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationStats {
    samples: u64,
    total: Duration,
    max: Duration,
}

impl DurationStats {
    /// Record one sample
    pub fn record(&mut self, sample: Duration) {
        self.samples += 1;
        self.total += sample;
        self.max = self.max.max(sample);
    }

    /// Number of recorded samples
    pub const fn samples(&self) -> u64 {
        self.samples
    }

    /// Longest recorded sample
    pub const fn max(&self) -> Duration {
        self.max
    }

    /// Mean of the recorded samples (zero when empty)
    pub fn average(&self) -> Duration {
        if self.samples == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total.as_nanos() / u128::from(self.samples);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Mean in milliseconds
    pub fn average_millis(&self) -> f32 {
        self.average().as_secs_f32() * 1000.0
    }
}
