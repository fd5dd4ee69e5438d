//! Mechanism constants and caller-tunable limits.

use ctrdrbg_types::DrbgError;

/// Largest reseed interval SP 800-90A allows for CTR_DRBG.
pub const MAX_RESEED_INTERVAL: u64 = 1 << 48;

/// Largest single request SP 800-90A allows for CTR_DRBG, in bits.
pub const MAX_BITS_PER_REQUEST: usize = 1 << 19;

/// Smallest counter field SP 800-90A allows, in bits.
pub const MIN_COUNTER_BITS: usize = 4;

/// Highest security strength any mechanism here can grant.
pub const MAX_SECURITY_STRENGTH: u32 = 256;

/// Limits and capabilities chosen when a generator is instantiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrbgConfig {
    /// Generate calls allowed per seeding. Default: 2^48.
    pub reseed_interval: u64,
    /// Largest single Generate request in bits. Default: 2^19.
    pub max_bits_per_request: usize,
    /// Width of the counter field in V. Default: the full block (128).
    pub counter_bits: usize,
    /// Whether prediction resistance may be requested. Default: true.
    pub prediction_resistance_supported: bool,
    /// Whether the generator may be reseeded. Default: true.
    pub reseed_supported: bool,
}

impl Default for DrbgConfig {
    fn default() -> Self {
        DrbgConfig {
            reseed_interval: MAX_RESEED_INTERVAL,
            max_bits_per_request: MAX_BITS_PER_REQUEST,
            counter_bits: 128,
            prediction_resistance_supported: true,
            reseed_supported: true,
        }
    }
}

impl DrbgConfig {
    /// Check the limits against SP 800-90A Table 3 for a cipher with
    /// `block_bits`-bit blocks.
    pub fn validate(&self, block_bits: usize) -> Result<(), DrbgError> {
        if self.reseed_interval == 0 || self.reseed_interval > MAX_RESEED_INTERVAL {
            return Err(DrbgError::InvalidParameter);
        }
        if self.counter_bits < MIN_COUNTER_BITS || self.counter_bits > block_bits {
            return Err(DrbgError::InvalidParameter);
        }
        if self.max_bits_per_request == 0 || self.max_bits_per_request > MAX_BITS_PER_REQUEST {
            return Err(DrbgError::InvalidParameter);
        }
        // B = (2^ctr_len - 4) * blocklen
        if self.counter_bits < 64 {
            let blocks = (1u128 << self.counter_bits) - 4;
            if (self.max_bits_per_request as u128) > blocks * block_bits as u128 {
                return Err(DrbgError::InvalidParameter);
            }
        }
        // Prediction resistance is served by reseeding.
        if self.prediction_resistance_supported && !self.reseed_supported {
            return Err(DrbgError::InvalidParameter);
        }
        Ok(())
    }
}

/// Fixed algorithm constants of one mechanism instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MechanismParams {
    pub block_bits: usize,
    pub key_bits: usize,
    /// `block_bits + key_bits`.
    pub seed_bits: usize,
    pub counter_bits: usize,
    pub min_entropy_bits: usize,
    pub max_entropy_bits: usize,
    pub max_personalization_bits: usize,
    pub max_additional_input_bits: usize,
    pub max_bits_per_request: usize,
    pub reseed_interval: u64,
    pub max_security_strength: u32,
}

impl MechanismParams {
    /// Constants for CTR_DRBG without a derivation function.
    ///
    /// Every input (entropy, personalization, additional input) is bounded
    /// by the seed length, and entropy must be exactly one seed long.
    pub fn ctr_no_df(
        block_bits: usize,
        key_bits: usize,
        config: &DrbgConfig,
    ) -> Result<Self, DrbgError> {
        config.validate(block_bits)?;
        let seed_bits = block_bits + key_bits;
        Ok(MechanismParams {
            block_bits,
            key_bits,
            seed_bits,
            counter_bits: config.counter_bits,
            min_entropy_bits: seed_bits,
            max_entropy_bits: seed_bits,
            max_personalization_bits: seed_bits,
            max_additional_input_bits: seed_bits,
            max_bits_per_request: config.max_bits_per_request,
            reseed_interval: config.reseed_interval,
            max_security_strength: MAX_SECURITY_STRENGTH.min(key_bits as u32),
        })
    }
}
