//! Continuous health tests for raw entropy bytes (NIST SP 800-90B §4.4).
//!
//! - Repetition Count Test: a stuck source repeats the same byte.
//! - Adaptive Proportion Test: a biased source over-produces one byte value
//!   within a fixed window.
//!
//! Failures latch: once a monitor has failed it rejects every further sample
//! until it is explicitly reset.

use ctrdrbg_types::DrbgError;

/// RCT cutoff for H = 1 bit/sample, α = 2⁻²⁰: C = 1 + ⌈20 / H⌉.
pub const DEFAULT_RCT_CUTOFF: u32 = 21;

/// APT window size W for non-binary samples.
pub const DEFAULT_APT_WINDOW: u32 = 512;

/// APT cutoff for H = 1 bit/sample, W = 512, α = 2⁻²⁰.
pub const DEFAULT_APT_CUTOFF: u32 = 410;

/// Samples examined by the startup test (SP 800-90B §4.3).
pub const STARTUP_TEST_SAMPLES: usize = 1024;

/// Repetition Count Test state.
#[derive(Debug, Clone)]
pub struct RepetitionCount {
    /// Cutoff C: failure once `run` reaches it.
    cutoff: u32,
    /// Previous sample (A), `None` until the first one arrives.
    last: Option<u8>,
    /// Length of the current run of `last` (B).
    run: u32,
}

impl RepetitionCount {
    pub fn new(cutoff: u32) -> Self {
        RepetitionCount {
            cutoff,
            last: None,
            run: 0,
        }
    }

    /// Feed one sample; fails once the same value has been seen `cutoff` times in a row.
    pub fn feed(&mut self, sample: u8) -> Result<(), DrbgError> {
        if self.last == Some(sample) {
            self.run += 1;
            if self.run >= self.cutoff {
                return Err(DrbgError::EntropyRctFailure);
            }
        } else {
            self.last = Some(sample);
            self.run = 1;
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.last = None;
        self.run = 0;
    }
}

/// Adaptive Proportion Test state.
#[derive(Debug, Clone)]
pub struct AdaptiveProportion {
    /// Window size W in samples.
    window: u32,
    /// Cutoff C: failure once `hits` reaches it inside one window.
    cutoff: u32,
    /// First sample of the current window (A), `None` between windows.
    base: Option<u8>,
    /// Samples consumed in the current window, `base` included.
    seen: u32,
    /// Occurrences of `base` in the current window (B).
    hits: u32,
}

impl AdaptiveProportion {
    pub fn new(window: u32, cutoff: u32) -> Self {
        AdaptiveProportion {
            window,
            cutoff,
            base: None,
            seen: 0,
            hits: 0,
        }
    }

    /// Feed one sample; fails when the window's first value recurs `cutoff` times.
    pub fn feed(&mut self, sample: u8) -> Result<(), DrbgError> {
        let base = match self.base {
            Some(base) => base,
            None => {
                self.base = Some(sample);
                self.seen = 1;
                self.hits = 1;
                return Ok(());
            }
        };

        if sample == base {
            self.hits += 1;
            if self.hits >= self.cutoff {
                return Err(DrbgError::EntropyAptFailure);
            }
        }

        self.seen += 1;
        if self.seen >= self.window {
            self.base = None;
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.base = None;
        self.seen = 0;
        self.hits = 0;
    }
}

/// Both continuous tests, with a latched failure flag.
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    /// Repetition Count Test.
    rct: RepetitionCount,
    /// Adaptive Proportion Test.
    apt: AdaptiveProportion,
    /// First failure seen; returned for every later check until reset.
    failure: Option<DrbgError>,
}

impl HealthMonitor {
    pub fn new(rct_cutoff: u32, apt_window: u32, apt_cutoff: u32) -> Self {
        HealthMonitor {
            rct: RepetitionCount::new(rct_cutoff),
            apt: AdaptiveProportion::new(apt_window, apt_cutoff),
            failure: None,
        }
    }

    /// Run every byte of `samples` through both tests.
    pub fn check(&mut self, samples: &[u8]) -> Result<(), DrbgError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        for &sample in samples {
            let result = self.rct.feed(sample).and_then(|_| self.apt.feed(sample));
            if let Err(err) = result {
                log::error!("entropy health test failed: {err}");
                self.failure = Some(err.clone());
                return Err(err);
            }
        }
        Ok(())
    }

    pub fn has_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Clear both tests and the latched failure.
    pub fn reset(&mut self) {
        self.rct.reset();
        self.apt.reset();
        self.failure = None;
    }
}

impl Default for HealthMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_RCT_CUTOFF, DEFAULT_APT_WINDOW, DEFAULT_APT_CUTOFF)
    }
}
