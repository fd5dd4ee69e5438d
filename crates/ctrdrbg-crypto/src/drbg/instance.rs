//! DRBG instance lifecycle (SP 800-90A §9).
//!
//! Instantiate, Reseed, Generate and Uninstantiate functions on top of a
//! [`Mechanism`]. This layer owns the entropy source, the granted security
//! strength and the prediction-resistance flag, and is the only place that
//! recovers from an exhausted reseed interval.

use ctrdrbg_bits::{byte_len, BitStream};
use ctrdrbg_types::{DrbgError, RandAlgId};

use super::params::{DrbgConfig, MechanismParams, MAX_SECURITY_STRENGTH};
use super::{DrbgMechanism, Mechanism};
use crate::entropy::{request_entropy, EntropySource};

/// An instantiated DRBG together with its entropy source.
///
/// Dropping the instance zeroizes the working state. A failed Generate on an
/// instance that cannot be reseeded destroys the state; every later call then
/// fails with `InvalidParameter`.
pub struct DrbgInstance {
    alg: RandAlgId,
    mechanism: Mechanism,
    entropy: Box<dyn EntropySource>,
    security_strength: u32,
    prediction_resistance: bool,
    reseed_supported: bool,
}

impl DrbgInstance {
    /// Instantiate function (SP 800-90A §9.1).
    ///
    /// `personalization` holds `personalization_bits` bits in the bit-stream
    /// layout: big-endian, right-aligned in `ceil(bits / 8)` leading bytes.
    /// Pass an empty slice with zero bits for no personalization string.
    pub fn instantiate(
        alg: RandAlgId,
        config: DrbgConfig,
        mut entropy: Box<dyn EntropySource>,
        requested_strength: u32,
        prediction_resistance: bool,
        personalization: &[u8],
        personalization_bits: usize,
    ) -> Result<Self, DrbgError> {
        if requested_strength > MAX_SECURITY_STRENGTH {
            return Err(DrbgError::InvalidParameter);
        }
        let mut mechanism = Mechanism::new(alg, &config)?;
        if prediction_resistance && !config.prediction_resistance_supported {
            return Err(DrbgError::InvalidParameter);
        }
        let params = *mechanism.params();
        if personalization_bits > params.max_personalization_bits {
            return Err(DrbgError::InvalidParameter);
        }
        let personalization = BitStream::from_bytes(personalization, personalization_bits)?;

        let entropy_input = request_entropy(
            &mut *entropy,
            params.min_entropy_bits,
            params.max_entropy_bits,
        )?;
        let nonce = mechanism.get_nonce()?;
        mechanism.instantiate(&entropy_input, &nonce, &personalization)?;

        let instance = DrbgInstance {
            alg,
            mechanism,
            entropy,
            security_strength: params.max_security_strength,
            prediction_resistance,
            reseed_supported: config.reseed_supported,
        };

        log::debug!(
            "instantiated {} at strength {} (prediction resistance: {})",
            alg.name(),
            instance.security_strength,
            prediction_resistance
        );
        Ok(instance)
    }

    /// Instantiate CTR_DRBG(AES-256) at full strength from OS entropy, with
    /// SP 800-90B health tests on every draw.
    #[cfg(feature = "system-entropy")]
    pub fn from_system_entropy() -> Result<Self, DrbgError> {
        use crate::entropy::{EntropyConfig, HealthTestedSource, SystemEntropySource};

        let source = HealthTestedSource::new(SystemEntropySource::new(), &EntropyConfig::default())?;
        Self::instantiate(
            RandAlgId::Aes256Ctr,
            DrbgConfig::default(),
            Box::new(source),
            MAX_SECURITY_STRENGTH,
            false,
            &[],
            0,
        )
    }

    /// Reseed function (SP 800-90A §9.2).
    pub fn reseed(
        &mut self,
        prediction_resistance: bool,
        additional_input: &[u8],
        additional_input_bits: usize,
    ) -> Result<(), DrbgError> {
        self.mechanism.check_state()?;
        if prediction_resistance && !self.prediction_resistance {
            return Err(DrbgError::InvalidParameter);
        }
        if !self.reseed_supported {
            return Err(DrbgError::Unsupported);
        }
        if additional_input_bits > self.mechanism.params().max_additional_input_bits {
            return Err(DrbgError::InvalidParameter);
        }
        let additional = BitStream::from_bytes(additional_input, additional_input_bits)?;
        self.reseed_with(&additional)
    }

    /// Generate function (SP 800-90A §9.3).
    ///
    /// Writes `ceil(requested_bits / 8)` bytes to the front of `out` in the
    /// bit-stream layout; a request that is not a whole number of bytes leaves
    /// its unused high bits of `out[0]` zero.
    pub fn generate(
        &mut self,
        requested_strength: u32,
        prediction_resistance: bool,
        additional_input: &[u8],
        additional_input_bits: usize,
        requested_bits: usize,
        out: &mut [u8],
    ) -> Result<(), DrbgError> {
        self.mechanism.check_state()?;
        let params = *self.mechanism.params();
        if requested_bits > params.max_bits_per_request {
            return Err(DrbgError::InvalidParameter);
        }
        if requested_strength > self.security_strength {
            return Err(DrbgError::InvalidParameter);
        }
        if prediction_resistance && !self.prediction_resistance {
            return Err(DrbgError::InvalidParameter);
        }
        if additional_input_bits > params.max_additional_input_bits {
            return Err(DrbgError::InvalidParameter);
        }
        if out.len() < byte_len(requested_bits) {
            return Err(DrbgError::InvalidParameter);
        }

        let additional = BitStream::from_bytes(additional_input, additional_input_bits)?;
        let output = if prediction_resistance {
            self.reseed_then_generate(&additional, requested_bits)?
        } else {
            match self.mechanism.generate(&additional, requested_bits) {
                Err(DrbgError::NotReady) => {
                    if !self.reseed_supported {
                        log::warn!(
                            "{}: reseed interval exhausted and reseeding unsupported; destroying instance",
                            self.alg.name()
                        );
                        self.mechanism.zeroize_state();
                        return Err(DrbgError::NotReady);
                    }
                    log::warn!("{}: reseed interval exhausted; reseeding", self.alg.name());
                    self.reseed_then_generate(&additional, requested_bits)?
                }
                result => result?,
            }
        };

        output.to_bytes(out)
    }

    /// Generate `len` bytes at the granted strength, without prediction
    /// resistance, splitting the request at the per-call limit.
    pub fn generate_bytes(&mut self, len: usize) -> Result<Vec<u8>, DrbgError> {
        let chunk = self.mechanism.params().max_bits_per_request / 8;
        if chunk == 0 {
            return Err(DrbgError::InvalidParameter);
        }
        let mut output = vec![0u8; len];
        for piece in output.chunks_mut(chunk) {
            let bits = piece.len() * 8;
            self.generate(self.security_strength, false, &[], 0, bits, piece)?;
        }
        Ok(output)
    }

    /// Uninstantiate function (SP 800-90A §9.4).
    ///
    /// Fails with `InvalidParameter` if the state was already destroyed.
    pub fn uninstantiate(mut self) -> Result<(), DrbgError> {
        self.mechanism.uninstantiate()?;
        log::debug!("uninstantiated {}", self.alg.name());
        Ok(())
    }

    /// Generate calls since the last (re)seed, plus one; zero once destroyed.
    pub fn reseed_counter(&self) -> u64 {
        self.mechanism.reseed_counter()
    }

    pub fn security_strength(&self) -> u32 {
        self.security_strength
    }

    pub fn prediction_resistance(&self) -> bool {
        self.prediction_resistance
    }

    pub fn mechanism_id(&self) -> RandAlgId {
        self.alg
    }

    pub fn params(&self) -> &MechanismParams {
        self.mechanism.params()
    }

    fn fresh_entropy(&mut self) -> Result<BitStream, DrbgError> {
        let params = *self.mechanism.params();
        request_entropy(
            &mut *self.entropy,
            params.min_entropy_bits,
            params.max_entropy_bits,
        )
    }

    fn reseed_with(&mut self, additional: &BitStream) -> Result<(), DrbgError> {
        let entropy_input = self.fresh_entropy()?;
        self.mechanism.reseed(&entropy_input, additional)?;
        log::debug!("reseeded {}", self.alg.name());
        Ok(())
    }

    /// Reseed and generate in one step, so a failed generate does not leave
    /// the state reseeded.
    fn reseed_then_generate(
        &mut self,
        additional: &BitStream,
        requested_bits: usize,
    ) -> Result<BitStream, DrbgError> {
        let entropy_input = self.fresh_entropy()?;
        let output = self
            .mechanism
            .reseed_and_generate(&entropy_input, additional, requested_bits)?;
        log::debug!("reseeded {}", self.alg.name());
        Ok(output)
    }

    #[cfg(test)]
    fn mechanism(&self) -> &Mechanism {
        &self.mechanism
    }
}
