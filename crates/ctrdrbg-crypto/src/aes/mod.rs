//! AES-256 block cipher collaborator.
//!
//! Wraps the RustCrypto `aes` implementation behind [`BlockCipher`]. Key
//! expansion runs once per `set_encrypt_key`; the expanded schedule is
//! zeroized when replaced or dropped.

use ::aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use ctrdrbg_types::{CipherAlgId, DrbgError};

use crate::provider::BlockCipher;

/// AES block size in bytes (128 bits).
pub const AES_BLOCK_SIZE: usize = 16;
/// AES-256 key size in bytes.
pub const AES256_KEY_SIZE: usize = 32;

/// AES-256 in the encrypt direction.
#[derive(Default)]
pub struct Aes256Cipher {
    cipher: Option<::aes::Aes256>,
}

impl Aes256Cipher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockCipher for Aes256Cipher {
    fn block_bits(&self) -> usize {
        AES_BLOCK_SIZE * 8
    }

    fn key_bits(&self) -> usize {
        AES256_KEY_SIZE * 8
    }

    fn set_encrypt_key(&mut self, key: &[u8]) -> Result<(), DrbgError> {
        if key.len() != AES256_KEY_SIZE {
            return Err(DrbgError::InvalidParameter);
        }
        let cipher =
            ::aes::Aes256::new_from_slice(key).map_err(|_| DrbgError::InvalidParameter)?;
        self.cipher = Some(cipher);
        Ok(())
    }

    fn encrypt_block(&self, input: &[u8], output: &mut [u8]) -> Result<(), DrbgError> {
        if input.len() != AES_BLOCK_SIZE || output.len() != AES_BLOCK_SIZE {
            return Err(DrbgError::InvalidParameter);
        }
        let cipher = self.cipher.as_ref().ok_or(DrbgError::InvalidParameter)?;
        let block: &mut ::aes::Block = GenericArray::from_mut_slice(output);
        block.copy_from_slice(input);
        cipher.encrypt_block(block);
        Ok(())
    }
}

/// Create a cipher collaborator for `id`.
pub fn new_cipher(id: CipherAlgId) -> Box<dyn BlockCipher> {
    match id {
        CipherAlgId::Aes256 => Box::new(Aes256Cipher::new()),
    }
}
