//! Entropy acquisition for the DRBG.
//!
//! A DRBG asks for a total number of entropy bits; the underlying source can
//! only hand out a bounded number per draw. [`request_entropy`] pulls chunks
//! until the total is met and returns them as one [`BitStream`].
//!
//! Sources provided here:
//! - [`SystemEntropySource`]: OS randomness via `getrandom`
//! - [`ReplayEntropySource`]: replays fixed bytes (known-answer tests)
//! - [`HealthTestedSource`]: wraps any source with SP 800-90B health tests
//!
//! # Example
//!
//! ```
//! use ctrdrbg_crypto::entropy::{request_entropy, ReplayEntropySource};
//!
//! let mut source = ReplayEntropySource::new(vec![0xA5; 48]);
//! let bits = request_entropy(&mut source, 384, 384).expect("entropy");
//! assert_eq!(bits.bit_len(), 384);
//! ```

pub mod health;

pub use health::{AdaptiveProportion, HealthMonitor, RepetitionCount};

use ctrdrbg_bits::{byte_len, BitStream};
use ctrdrbg_types::DrbgError;
use zeroize::Zeroizing;

pub use crate::provider::EntropySource;

/// Largest single draw served by [`SystemEntropySource`], in bits.
pub const SYSTEM_MAX_ENTROPY_BITS: usize = 256;

/// Collect at least `min_bits` of entropy from `source`.
///
/// Draws are capped at `source.max_supported_entropy_bits()`; the last draw
/// is shortened so exactly `min_bits` are returned. Fails with `Aborted` if
/// the running total would pass `max_bits`.
pub fn request_entropy(
    source: &mut dyn EntropySource,
    min_bits: usize,
    max_bits: usize,
) -> Result<BitStream, DrbgError> {
    if min_bits > max_bits {
        return Err(DrbgError::InvalidParameter);
    }
    let chunk_max = source.max_supported_entropy_bits();
    if chunk_max == 0 {
        return Err(DrbgError::InvalidParameter);
    }

    let mut collected = BitStream::new(min_bits)?;
    let mut buf = Zeroizing::new(vec![0u8; byte_len(chunk_max)]);
    let mut filled = 0;

    while filled < min_bits {
        let chunk = (min_bits - filled).min(chunk_max);
        if filled + chunk > max_bits {
            return Err(DrbgError::Aborted);
        }

        let out = &mut buf[..byte_len(chunk)];
        out.fill(0);
        source.get_entropy(chunk, out)?;
        collected.write(out, filled, chunk)?;
        filled += chunk;
    }

    log::trace!(
        "collected {} entropy bits from {}",
        collected.bit_len(),
        source.name()
    );
    Ok(collected)
}

/// Health-test settings for [`HealthTestedSource`].
#[derive(Debug, Clone)]
pub struct EntropyConfig {
    /// Run the continuous tests on every byte. Default: true.
    pub enable_health_tests: bool,
    /// Run the startup test when the source is created. Default: true.
    pub startup_test: bool,
    /// RCT cutoff. Default: 21.
    pub rct_cutoff: u32,
    /// APT window size. Default: 512.
    pub apt_window_size: u32,
    /// APT cutoff. Default: 410.
    pub apt_cutoff: u32,
}

impl Default for EntropyConfig {
    fn default() -> Self {
        EntropyConfig {
            enable_health_tests: true,
            startup_test: true,
            rct_cutoff: health::DEFAULT_RCT_CUTOFF,
            apt_window_size: health::DEFAULT_APT_WINDOW,
            apt_cutoff: health::DEFAULT_APT_CUTOFF,
        }
    }
}

/// OS entropy through `getrandom`, served in draws of at most 256 bits.
#[cfg(feature = "system-entropy")]
#[derive(Debug, Default)]
pub struct SystemEntropySource;

#[cfg(feature = "system-entropy")]
impl SystemEntropySource {
    pub fn new() -> Self {
        SystemEntropySource
    }
}

#[cfg(feature = "system-entropy")]
impl EntropySource for SystemEntropySource {
    fn name(&self) -> &str {
        "system"
    }

    fn max_supported_entropy_bits(&self) -> usize {
        SYSTEM_MAX_ENTROPY_BITS
    }

    fn get_entropy(&mut self, requested_bits: usize, out: &mut [u8]) -> Result<(), DrbgError> {
        if requested_bits > SYSTEM_MAX_ENTROPY_BITS || out.len() != byte_len(requested_bits) {
            return Err(DrbgError::InvalidParameter);
        }
        getrandom::getrandom(out).map_err(|_| DrbgError::DeviceError)
    }
}

/// Replays a fixed byte sequence as entropy.
///
/// Each draw consumes `ceil(bits / 8)` bytes. Once the sequence is exhausted
/// draws fail with `DeviceError`, unless the source was built with
/// [`ReplayEntropySource::cycle`].
pub struct ReplayEntropySource {
    data: Zeroizing<Vec<u8>>,
    pos: usize,
    max_bits: usize,
    wrap: bool,
}

impl ReplayEntropySource {
    /// Replay `data` once, 256 bits per draw.
    pub fn new(data: Vec<u8>) -> Self {
        ReplayEntropySource {
            data: Zeroizing::new(data),
            pos: 0,
            max_bits: SYSTEM_MAX_ENTROPY_BITS,
            wrap: false,
        }
    }

    /// Replay `data` forever, wrapping to the start.
    pub fn cycle(data: Vec<u8>) -> Self {
        ReplayEntropySource {
            wrap: true,
            ..Self::new(data)
        }
    }

    /// Limit single draws to `max_bits`.
    pub fn with_max_bits(mut self, max_bits: usize) -> Self {
        self.max_bits = max_bits;
        self
    }

    /// Bytes not yet replayed (ignores wrapping).
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl EntropySource for ReplayEntropySource {
    fn name(&self) -> &str {
        "replay"
    }

    fn max_supported_entropy_bits(&self) -> usize {
        self.max_bits
    }

    fn get_entropy(&mut self, requested_bits: usize, out: &mut [u8]) -> Result<(), DrbgError> {
        if requested_bits > self.max_bits || out.len() != byte_len(requested_bits) {
            return Err(DrbgError::InvalidParameter);
        }
        for byte in out.iter_mut() {
            if self.pos == self.data.len() {
                if !self.wrap || self.data.is_empty() {
                    return Err(DrbgError::DeviceError);
                }
                self.pos = 0;
            }
            *byte = self.data[self.pos];
            self.pos += 1;
        }
        Ok(())
    }
}

/// Runs every byte drawn from `S` through RCT and APT.
///
/// A failed test latches: the source keeps returning the failure until it is
/// rebuilt.
pub struct HealthTestedSource<S> {
    inner: S,
    monitor: Option<HealthMonitor>,
}

impl<S: EntropySource> HealthTestedSource<S> {
    /// Wrap `inner`, running the startup test first if configured.
    pub fn new(inner: S, config: &EntropyConfig) -> Result<Self, DrbgError> {
        let monitor = config.enable_health_tests.then(|| {
            HealthMonitor::new(config.rct_cutoff, config.apt_window_size, config.apt_cutoff)
        });
        let mut source = HealthTestedSource { inner, monitor };
        if config.startup_test {
            source.startup_test()?;
        }
        Ok(source)
    }

    /// Draw and test `STARTUP_TEST_SAMPLES` bytes, then discard them.
    ///
    /// Sources narrower than a byte are drawn one partial sample at a time.
    pub fn startup_test(&mut self) -> Result<(), DrbgError> {
        if self.monitor.is_none() {
            return Ok(());
        }

        let max_bits = self.inner.max_supported_entropy_bits();
        if max_bits == 0 {
            return Err(DrbgError::InvalidParameter);
        }
        let buf_len = byte_len(max_bits).min(health::STARTUP_TEST_SAMPLES);
        let mut buf = Zeroizing::new(vec![0u8; buf_len]);
        let mut tested = 0;
        while tested < health::STARTUP_TEST_SAMPLES {
            let n = (health::STARTUP_TEST_SAMPLES - tested).min(buf.len());
            let bits = (n * 8).min(max_bits);
            self.get_entropy(bits, &mut buf[..n])?;
            tested += n;
        }
        log::debug!("startup health test passed for {}", self.inner.name());
        Ok(())
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: EntropySource> EntropySource for HealthTestedSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn max_supported_entropy_bits(&self) -> usize {
        self.inner.max_supported_entropy_bits()
    }

    fn get_entropy(&mut self, requested_bits: usize, out: &mut [u8]) -> Result<(), DrbgError> {
        self.inner.get_entropy(requested_bits, out)?;
        // Only value bits are tested; a partial leading byte loses its padding.
        let pad = (8 - requested_bits % 8) % 8;
        if let Some(first) = out.first_mut() {
            *first &= 0xFF >> pad;
        }
        if let Some(monitor) = self.monitor.as_mut() {
            if let Err(err) = monitor.check(out) {
                out.fill(0);
                return Err(err);
            }
        }
        Ok(())
    }
}
