//! Exclusive-or, concatenation and modular addition on bit-streams.

use ctrdrbg_types::DrbgError;

use crate::bitstream::BitStream;

impl BitStream {
    /// `self XOR other` as a new stream. Lengths must match.
    pub fn xor(&self, other: &BitStream) -> Result<BitStream, DrbgError> {
        if self.bit_len() != other.bit_len() {
            return Err(DrbgError::InvalidParameter);
        }
        let mut out = self.try_clone()?;
        out.xor_assign(other)?;
        Ok(out)
    }

    /// `self ^= other`. Lengths must match; the empty stream is a no-op.
    pub fn xor_assign(&mut self, other: &BitStream) -> Result<(), DrbgError> {
        if self.bit_len() != other.bit_len() {
            return Err(DrbgError::InvalidParameter);
        }
        for (a, b) in self.data_mut().iter_mut().zip(other.as_bytes()) {
            *a ^= b;
        }
        Ok(())
    }

    /// `high || low`, with `low` at the least-significant end.
    pub fn concat(high: &BitStream, low: &BitStream) -> Result<BitStream, DrbgError> {
        let total = high
            .bit_len()
            .checked_add(low.bit_len())
            .ok_or(DrbgError::InvalidParameter)?;
        let mut out = BitStream::new(total)?;
        out.write_stream(high, 0)?;
        out.write_stream(low, high.bit_len())?;
        Ok(out)
    }

    /// `self = self || low`.
    ///
    /// Always moves into a fresh exact-size buffer; the old buffer is wiped
    /// when it is dropped rather than left behind by a reallocation.
    pub fn append(&mut self, low: &BitStream) -> Result<(), DrbgError> {
        let joined = BitStream::concat(self, low)?;
        *self = joined;
        Ok(())
    }

    /// Add `value` to the stream as an unsigned big-endian integer modulo
    /// `2^modulus_bits`. The stream must be exactly `modulus_bits` long.
    pub fn add_modulo(&mut self, value: u64, modulus_bits: usize) -> Result<(), DrbgError> {
        if self.bit_len() != modulus_bits {
            return Err(DrbgError::InvalidParameter);
        }
        if modulus_bits == 0 {
            return Ok(());
        }

        let mut carry = value;
        for byte in self.data_mut().iter_mut().rev() {
            if carry == 0 {
                break;
            }
            let sum = *byte as u64 + (carry & 0xFF);
            *byte = sum as u8;
            carry = (carry >> 8) + (sum >> 8);
        }

        self.clear_padding();
        Ok(())
    }
}
