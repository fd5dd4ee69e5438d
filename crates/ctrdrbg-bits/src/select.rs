//! Bit-range selection and bit-range writes.

use ctrdrbg_types::DrbgError;

use crate::bitstream::{byte_len, copy_bits, BitStream};

impl BitStream {
    /// Return value bits `[start_bit, start_bit + bit_count)` as a new stream.
    pub fn select(&self, start_bit: usize, bit_count: usize) -> Result<BitStream, DrbgError> {
        let end = start_bit
            .checked_add(bit_count)
            .ok_or(DrbgError::InvalidParameter)?;
        if end > self.bit_len() {
            return Err(DrbgError::InvalidParameter);
        }

        let mut out = BitStream::new(bit_count)?;
        let dst_pos = out.padding_bits();
        copy_bits(
            self.as_bytes(),
            self.padding_bits() + start_bit,
            out.data_mut(),
            dst_pos,
            bit_count,
        );
        Ok(out)
    }

    /// Trim `self` to value bits `[start_bit, start_bit + bit_count)`.
    pub fn select_in_place(&mut self, start_bit: usize, bit_count: usize) -> Result<(), DrbgError> {
        let selected = self.select(start_bit, bit_count)?;
        *self = selected;
        Ok(())
    }

    /// The leftmost (most significant) `bit_count` bits.
    pub fn leftmost(&self, bit_count: usize) -> Result<BitStream, DrbgError> {
        self.select(0, bit_count)
    }

    /// The rightmost (least significant) `bit_count` bits.
    pub fn rightmost(&self, bit_count: usize) -> Result<BitStream, DrbgError> {
        let start = self
            .bit_len()
            .checked_sub(bit_count)
            .ok_or(DrbgError::InvalidParameter)?;
        self.select(start, bit_count)
    }

    /// Keep only the leftmost `bit_count` bits.
    pub fn truncate_leftmost(&mut self, bit_count: usize) -> Result<(), DrbgError> {
        if bit_count == self.bit_len() {
            return Ok(());
        }
        self.select_in_place(0, bit_count)
    }

    /// Keep only the rightmost `bit_count` bits.
    pub fn truncate_rightmost(&mut self, bit_count: usize) -> Result<(), DrbgError> {
        let start = self
            .bit_len()
            .checked_sub(bit_count)
            .ok_or(DrbgError::InvalidParameter)?;
        if start == 0 {
            return Ok(());
        }
        self.select_in_place(start, bit_count)
    }

    /// Write `bit_count` bits from a big-endian buffer at value position `start_bit`.
    ///
    /// `buf` holds the bits right-aligned in its leading
    /// `ceil(bit_count / 8)` bytes, the same layout a stream uses. Bits of
    /// `self` outside the written range are preserved.
    pub fn write(&mut self, buf: &[u8], start_bit: usize, bit_count: usize) -> Result<(), DrbgError> {
        let end = start_bit
            .checked_add(bit_count)
            .ok_or(DrbgError::InvalidParameter)?;
        if end > self.bit_len() {
            return Err(DrbgError::InvalidParameter);
        }
        if bit_count == 0 {
            return Ok(());
        }
        let src_len = byte_len(bit_count);
        if buf.len() < src_len {
            return Err(DrbgError::InvalidParameter);
        }

        let dst_pos = self.padding_bits() + start_bit;
        copy_bits(
            &buf[..src_len],
            src_len * 8 - bit_count,
            self.data_mut(),
            dst_pos,
            bit_count,
        );
        Ok(())
    }

    /// Write all of `src` at value position `start_bit`.
    pub fn write_stream(&mut self, src: &BitStream, start_bit: usize) -> Result<(), DrbgError> {
        self.write(src.as_bytes(), start_bit, src.bit_len())
    }
}
