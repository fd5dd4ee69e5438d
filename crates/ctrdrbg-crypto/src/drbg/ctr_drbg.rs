//! CTR_DRBG (Counter-mode Deterministic Random Bit Generator).
//!
//! Implements NIST SP 800-90A Section 10.2.1 without a derivation function.
//! All working-state arithmetic runs on [`BitStream`]s, so block, key and
//! counter-field widths come from [`MechanismParams`] rather than being fixed
//! at compile time.
//!
//! Every algorithm works on a copy of the working state and only commits it
//! when the whole call succeeds.

use ctrdrbg_bits::BitStream;
use ctrdrbg_types::DrbgError;
use zeroize::{Zeroize, Zeroizing};

use super::params::MechanismParams;
use super::DrbgMechanism;
use crate::provider::BlockCipher;

/// (Key, V, reseed_counter). A zero reseed counter marks an empty state.
#[derive(Clone, Default, Zeroize)]
pub(crate) struct WorkingState {
    pub(crate) key: BitStream,
    pub(crate) v: BitStream,
    pub(crate) reseed_counter: u64,
}

impl WorkingState {
    fn try_clone(&self) -> Result<Self, DrbgError> {
        Ok(WorkingState {
            key: self.key.try_clone()?,
            v: self.v.try_clone()?,
            reseed_counter: self.reseed_counter,
        })
    }
}

/// CTR_DRBG instance: constants, cipher collaborator and working state.
pub struct CtrDrbg {
    params: MechanismParams,
    cipher: Box<dyn BlockCipher>,
    state: WorkingState,
}

/// Increment the counter field of `v` (SP 800-90A §10.2.1.2 step 2.1).
///
/// With a counter field narrower than the block only the rightmost
/// `counter_bits` wrap; the leftmost bits of V stay fixed.
fn increment_counter(v: &mut BitStream, counter_bits: usize) -> Result<(), DrbgError> {
    let block_bits = v.bit_len();
    if counter_bits < block_bits {
        let mut ctr = v.rightmost(counter_bits)?;
        ctr.add_modulo(1, counter_bits)?;
        v.write_stream(&ctr, block_bits - counter_bits)
    } else {
        v.add_modulo(1, block_bits)
    }
}

/// Right-pad `input` with zero bits to `bits`.
fn pad_right(input: &BitStream, bits: usize) -> Result<BitStream, DrbgError> {
    let missing = bits
        .checked_sub(input.bit_len())
        .ok_or(DrbgError::InvalidParameter)?;
    let zeros = BitStream::new(missing)?;
    BitStream::concat(input, &zeros)
}

/// Increment V and encrypt it until `bits` of output exist, under the key
/// currently loaded in `cipher`.
fn keystream(
    cipher: &dyn BlockCipher,
    params: &MechanismParams,
    v: &mut BitStream,
    bits: usize,
) -> Result<BitStream, DrbgError> {
    let blocks = bits.div_ceil(params.block_bits);
    let mut temp = BitStream::new(blocks * params.block_bits)?;
    let mut block = Zeroizing::new(vec![0u8; params.block_bits / 8]);

    for i in 0..blocks {
        increment_counter(v, params.counter_bits)?;
        cipher.encrypt_block(v.as_bytes(), &mut block)?;
        temp.write(&block, i * params.block_bits, params.block_bits)?;
    }

    temp.truncate_leftmost(bits)?;
    Ok(temp)
}

/// CTR_DRBG_Update (SP 800-90A §10.2.1.2) applied to `state`.
fn update_state(
    cipher: &mut dyn BlockCipher,
    params: &MechanismParams,
    state: &mut WorkingState,
    provided_data: &BitStream,
) -> Result<(), DrbgError> {
    if provided_data.bit_len() != params.seed_bits {
        return Err(DrbgError::InvalidParameter);
    }

    cipher.set_encrypt_key(state.key.as_bytes())?;
    let mut temp = keystream(&*cipher, params, &mut state.v, params.seed_bits)?;
    temp.xor_assign(provided_data)?;

    state.key = temp.leftmost(params.key_bits)?;
    state.v = temp.rightmost(params.block_bits)?;
    Ok(())
}

impl CtrDrbg {
    /// Create an uninstantiated CTR_DRBG around `cipher`.
    pub fn new(cipher: Box<dyn BlockCipher>, params: MechanismParams) -> Result<Self, DrbgError> {
        if cipher.block_bits() != params.block_bits
            || cipher.key_bits() != params.key_bits
            || params.block_bits % 8 != 0
            || params.key_bits % 8 != 0
        {
            return Err(DrbgError::InvalidParameter);
        }
        Ok(CtrDrbg {
            params,
            cipher,
            state: WorkingState::default(),
        })
    }

    /// Build seed material: `data` zero-padded to seedlen, XOR `entropy`.
    fn seed_material(&self, entropy: &BitStream, data: &BitStream) -> Result<BitStream, DrbgError> {
        if entropy.bit_len() != self.params.seed_bits
            || data.bit_len() > self.params.seed_bits
        {
            return Err(DrbgError::InvalidParameter);
        }
        let mut seed = pad_right(data, self.params.seed_bits)?;
        seed.xor_assign(entropy)?;
        Ok(seed)
    }

    /// Reseed steps applied to a staged copy of the working state.
    fn reseed_staged(
        &mut self,
        next: &mut WorkingState,
        entropy_input: &BitStream,
        additional_input: &BitStream,
    ) -> Result<(), DrbgError> {
        let seed_material = self.seed_material(entropy_input, additional_input)?;
        update_state(&mut *self.cipher, &self.params, next, &seed_material)?;
        next.reseed_counter = 1;
        Ok(())
    }

    /// Generate steps applied to a staged copy of the working state.
    fn generate_staged(
        &mut self,
        next: &mut WorkingState,
        additional_input: &BitStream,
        requested_bits: usize,
    ) -> Result<BitStream, DrbgError> {
        if additional_input.bit_len() > self.params.seed_bits {
            return Err(DrbgError::InvalidParameter);
        }

        let additional = if additional_input.is_empty() {
            BitStream::new(self.params.seed_bits)?
        } else {
            let padded = pad_right(additional_input, self.params.seed_bits)?;
            update_state(&mut *self.cipher, &self.params, next, &padded)?;
            padded
        };

        self.cipher.set_encrypt_key(next.key.as_bytes())?;
        let output = keystream(&*self.cipher, &self.params, &mut next.v, requested_bits)?;

        update_state(&mut *self.cipher, &self.params, next, &additional)?;
        next.reseed_counter += 1;
        Ok(output)
    }

    /// Generate calls made since the last (re)seed, plus one.
    pub fn reseed_counter(&self) -> u64 {
        self.state.reseed_counter
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &WorkingState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut WorkingState {
        &mut self.state
    }
}

impl DrbgMechanism for CtrDrbg {
    fn params(&self) -> &MechanismParams {
        &self.params
    }

    /// No derivation function: full-entropy input replaces the nonce.
    fn get_nonce(&mut self) -> Result<BitStream, DrbgError> {
        BitStream::new(0)
    }

    fn check_state(&self) -> Result<(), DrbgError> {
        if self.state.reseed_counter == 0
            || self.state.key.bit_len() != self.params.key_bits
            || self.state.v.bit_len() != self.params.block_bits
        {
            return Err(DrbgError::InvalidParameter);
        }
        Ok(())
    }

    fn update(&mut self, provided_data: &BitStream) -> Result<(), DrbgError> {
        self.check_state()?;
        let mut next = self.state.try_clone()?;
        update_state(&mut *self.cipher, &self.params, &mut next, provided_data)?;
        self.state = next;
        Ok(())
    }

    /// CTR_DRBG_Instantiate_algorithm (SP 800-90A §10.2.1.3.1).
    fn instantiate(
        &mut self,
        entropy_input: &BitStream,
        _nonce: &BitStream,
        personalization: &BitStream,
    ) -> Result<(), DrbgError> {
        let seed_material = self.seed_material(entropy_input, personalization)?;

        let mut next = WorkingState {
            key: BitStream::new(self.params.key_bits)?,
            v: BitStream::new(self.params.block_bits)?,
            reseed_counter: 0,
        };
        update_state(&mut *self.cipher, &self.params, &mut next, &seed_material)?;
        next.reseed_counter = 1;

        self.state = next;
        Ok(())
    }

    /// CTR_DRBG_Reseed_algorithm (SP 800-90A §10.2.1.4.1).
    fn reseed(
        &mut self,
        entropy_input: &BitStream,
        additional_input: &BitStream,
    ) -> Result<(), DrbgError> {
        self.check_state()?;
        let mut next = self.state.try_clone()?;
        self.reseed_staged(&mut next, entropy_input, additional_input)?;
        self.state = next;
        Ok(())
    }

    /// CTR_DRBG_Generate_algorithm (SP 800-90A §10.2.1.5.1).
    fn generate(
        &mut self,
        additional_input: &BitStream,
        requested_bits: usize,
    ) -> Result<BitStream, DrbgError> {
        self.check_state()?;
        if self.state.reseed_counter > self.params.reseed_interval {
            return Err(DrbgError::NotReady);
        }

        let mut next = self.state.try_clone()?;
        let output = self.generate_staged(&mut next, additional_input, requested_bits)?;
        self.state = next;
        Ok(output)
    }

    fn reseed_and_generate(
        &mut self,
        entropy_input: &BitStream,
        additional_input: &BitStream,
        requested_bits: usize,
    ) -> Result<BitStream, DrbgError> {
        self.check_state()?;
        let mut next = self.state.try_clone()?;
        self.reseed_staged(&mut next, entropy_input, additional_input)?;
        let output = self.generate_staged(&mut next, &BitStream::new(0)?, requested_bits)?;
        self.state = next;
        Ok(output)
    }

    fn uninstantiate(&mut self) -> Result<(), DrbgError> {
        self.check_state()?;
        self.zeroize_state();
        Ok(())
    }

    /// Overwrite Key and V with zeros in place and mark the state empty.
    fn zeroize_state(&mut self) {
        let WorkingState {
            key,
            v,
            reseed_counter,
        } = &mut self.state;
        key.wipe();
        v.wipe();
        *reseed_counter = 0;
    }
}
