//! Deterministic Random Bit Generators (NIST SP 800-90A).
//!
//! - CTR_DRBG (Section 10.2.1) with AES-256 and no derivation function
//!
//! [`DrbgInstance`] owns the lifecycle (entropy, security strength,
//! prediction resistance, automatic reseeding); the mechanism below it only
//! transforms working state.

mod params;
pub use params::{
    DrbgConfig, MechanismParams, MAX_BITS_PER_REQUEST, MAX_RESEED_INTERVAL,
    MAX_SECURITY_STRENGTH, MIN_COUNTER_BITS,
};

pub mod ctr_drbg;
pub use ctr_drbg::CtrDrbg;

mod instance;
pub use instance::DrbgInstance;

mod kat;
pub use kat::self_test;

use ctrdrbg_bits::BitStream;
use ctrdrbg_types::{DrbgError, RandAlgId};

use crate::aes::new_cipher;

/// Operations every SP 800-90A mechanism provides to the lifecycle layer.
///
/// Input lengths are validated by the caller against [`MechanismParams`];
/// implementations still reject anything their algorithm cannot absorb.
pub trait DrbgMechanism {
    /// Algorithm constants and configured limits.
    fn params(&self) -> &MechanismParams;

    /// Nonce for Instantiate. Empty when the mechanism takes none.
    fn get_nonce(&mut self) -> Result<BitStream, DrbgError>;

    /// `InvalidParameter` unless the working state is instantiated and well formed.
    fn check_state(&self) -> Result<(), DrbgError>;

    /// Mix `provided_data` (exactly seedlen bits) into the working state.
    fn update(&mut self, provided_data: &BitStream) -> Result<(), DrbgError>;

    fn instantiate(
        &mut self,
        entropy_input: &BitStream,
        nonce: &BitStream,
        personalization: &BitStream,
    ) -> Result<(), DrbgError>;

    fn reseed(
        &mut self,
        entropy_input: &BitStream,
        additional_input: &BitStream,
    ) -> Result<(), DrbgError>;

    /// Produce `requested_bits` bits, or `NotReady` once the reseed interval
    /// is exhausted (the state is not touched in that case).
    fn generate(
        &mut self,
        additional_input: &BitStream,
        requested_bits: usize,
    ) -> Result<BitStream, DrbgError>;

    /// Reseed with `additional_input`, then generate with none. The working
    /// state changes only if both steps succeed.
    fn reseed_and_generate(
        &mut self,
        entropy_input: &BitStream,
        additional_input: &BitStream,
        requested_bits: usize,
    ) -> Result<BitStream, DrbgError>;

    /// Wipe an instantiated state.
    fn uninstantiate(&mut self) -> Result<(), DrbgError>;

    /// Wipe the state unconditionally.
    fn zeroize_state(&mut self);
}

/// The closed set of mechanisms an instance can run.
pub enum Mechanism {
    Ctr(CtrDrbg),
}

impl Mechanism {
    /// Build an uninstantiated mechanism for `alg`.
    ///
    /// Only [`RandAlgId::Aes256Ctr`] is implemented; the Hash_DRBG ids
    /// report `Unsupported`.
    pub fn new(alg: RandAlgId, config: &DrbgConfig) -> Result<Self, DrbgError> {
        match alg {
            RandAlgId::Aes256Ctr => {
                let cipher = new_cipher(alg.cipher().ok_or(DrbgError::Unsupported)?);
                let params =
                    MechanismParams::ctr_no_df(cipher.block_bits(), cipher.key_bits(), config)?;
                Ok(Mechanism::Ctr(CtrDrbg::new(cipher, params)?))
            }
            RandAlgId::Sha256 | RandAlgId::Sha512 => Err(DrbgError::Unsupported),
        }
    }

    /// Generate calls since the last (re)seed, plus one; zero when empty.
    pub fn reseed_counter(&self) -> u64 {
        match self {
            Mechanism::Ctr(m) => m.reseed_counter(),
        }
    }
}

impl DrbgMechanism for Mechanism {
    fn params(&self) -> &MechanismParams {
        match self {
            Mechanism::Ctr(m) => m.params(),
        }
    }

    fn get_nonce(&mut self) -> Result<BitStream, DrbgError> {
        match self {
            Mechanism::Ctr(m) => m.get_nonce(),
        }
    }

    fn check_state(&self) -> Result<(), DrbgError> {
        match self {
            Mechanism::Ctr(m) => m.check_state(),
        }
    }

    fn update(&mut self, provided_data: &BitStream) -> Result<(), DrbgError> {
        match self {
            Mechanism::Ctr(m) => m.update(provided_data),
        }
    }

    fn instantiate(
        &mut self,
        entropy_input: &BitStream,
        nonce: &BitStream,
        personalization: &BitStream,
    ) -> Result<(), DrbgError> {
        match self {
            Mechanism::Ctr(m) => m.instantiate(entropy_input, nonce, personalization),
        }
    }

    fn reseed(
        &mut self,
        entropy_input: &BitStream,
        additional_input: &BitStream,
    ) -> Result<(), DrbgError> {
        match self {
            Mechanism::Ctr(m) => m.reseed(entropy_input, additional_input),
        }
    }

    fn generate(
        &mut self,
        additional_input: &BitStream,
        requested_bits: usize,
    ) -> Result<BitStream, DrbgError> {
        match self {
            Mechanism::Ctr(m) => m.generate(additional_input, requested_bits),
        }
    }

    fn reseed_and_generate(
        &mut self,
        entropy_input: &BitStream,
        additional_input: &BitStream,
        requested_bits: usize,
    ) -> Result<BitStream, DrbgError> {
        match self {
            Mechanism::Ctr(m) => m.reseed_and_generate(entropy_input, additional_input, requested_bits),
        }
    }

    fn uninstantiate(&mut self) -> Result<(), DrbgError> {
        match self {
            Mechanism::Ctr(m) => m.uninstantiate(),
        }
    }

    fn zeroize_state(&mut self) {
        match self {
            Mechanism::Ctr(m) => m.zeroize_state(),
        }
    }
}
