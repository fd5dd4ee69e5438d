//! Collaborator interfaces consumed by the DRBG.
//!
//! The generator never talks to hardware or cipher implementations directly;
//! it goes through these two traits so platform code can plug in its own
//! true-random source and block cipher.

use ctrdrbg_types::DrbgError;

/// A block cipher used in the forward (encrypt) direction only.
pub trait BlockCipher: Send {
    /// Block size in bits.
    fn block_bits(&self) -> usize;

    /// Key size in bits.
    fn key_bits(&self) -> usize;

    /// Load the encryption key. `key` must be exactly `key_bits() / 8` bytes.
    fn set_encrypt_key(&mut self, key: &[u8]) -> Result<(), DrbgError>;

    /// Encrypt one block from `input` into `output` under the loaded key.
    fn encrypt_block(&self, input: &[u8], output: &mut [u8]) -> Result<(), DrbgError>;
}

/// A true-random source with a bounded single draw.
///
/// Every returned bit is assessed as carrying one bit of entropy.
pub trait EntropySource: Send {
    /// Human-readable name of the source.
    fn name(&self) -> &str;

    /// Largest number of bits a single `get_entropy` call may return.
    fn max_supported_entropy_bits(&self) -> usize;

    /// Fill `out` with `requested_bits` bits of entropy.
    ///
    /// `out` is exactly `ceil(requested_bits / 8)` bytes; the bits are
    /// right-aligned, so any unused high bits of `out[0]` are ignored.
    fn get_entropy(&mut self, requested_bits: usize, out: &mut [u8]) -> Result<(), DrbgError>;
}
