//! Bit-stream type, allocation, import/export and the shared bit-copy kernel.

use core::fmt;

use ctrdrbg_types::DrbgError;
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Number of bytes needed to store `bit_len` bits.
pub const fn byte_len(bit_len: usize) -> usize {
    bit_len.div_ceil(8)
}

/// An owned, arbitrary-length, big-endian bit string that is zeroized on drop.
///
/// The value is stored most-significant byte first. When the length is not a
/// multiple of eight, the leading byte carries the value in its low
/// `bit_len % 8` bits and its high bits are always zero, so the buffer reads
/// as an ordinary big-endian integer.
///
/// Value bit 0 is the leftmost (most significant) bit.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct BitStream {
    data: Vec<u8>,
    bit_len: usize,
}

/// Allocate a zero-filled byte buffer, reporting allocation failure instead of aborting.
pub(crate) fn alloc_zeroed(len: usize) -> Result<Vec<u8>, DrbgError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| DrbgError::OutOfResources)?;
    buf.resize(len, 0);
    Ok(buf)
}

impl BitStream {
    /// Allocate a zero-filled stream of `bit_len` bits. Zero length is valid.
    pub fn new(bit_len: usize) -> Result<Self, DrbgError> {
        Ok(BitStream {
            data: alloc_zeroed(byte_len(bit_len))?,
            bit_len,
        })
    }

    /// Import `bit_len` bits from a big-endian buffer.
    ///
    /// The leading `byte_len(bit_len)` bytes of `buf` are copied; any bits of
    /// the first byte above the value are cleared. An empty buffer is only
    /// accepted together with a zero length, and vice versa.
    pub fn from_bytes(buf: &[u8], bit_len: usize) -> Result<Self, DrbgError> {
        if buf.is_empty() != (bit_len == 0) {
            return Err(DrbgError::InvalidParameter);
        }
        let len = byte_len(bit_len);
        if buf.len() < len {
            return Err(DrbgError::InvalidParameter);
        }

        let mut data = alloc_zeroed(len)?;
        data.copy_from_slice(&buf[..len]);
        let mut stream = BitStream { data, bit_len };
        stream.clear_padding();
        Ok(stream)
    }

    /// Import a whole byte slice as a stream of `8 * bytes.len()` bits.
    pub fn from_octets(bytes: &[u8]) -> Result<Self, DrbgError> {
        Self::from_bytes(bytes, bytes.len() * 8)
    }

    /// Export the stream into `out`, most-significant byte first.
    ///
    /// Exactly `self.byte_len()` bytes are written; `out` may be longer.
    pub fn to_bytes(&self, out: &mut [u8]) -> Result<(), DrbgError> {
        if out.len() < self.data.len() {
            return Err(DrbgError::InvalidParameter);
        }
        out[..self.data.len()].copy_from_slice(&self.data);
        Ok(())
    }

    /// Fallible deep copy.
    pub fn try_clone(&self) -> Result<Self, DrbgError> {
        let mut data = alloc_zeroed(self.data.len())?;
        data.copy_from_slice(&self.data);
        Ok(BitStream {
            data,
            bit_len: self.bit_len,
        })
    }

    /// Overwrite `self` with a deep copy of `src`, wiping the previous buffer.
    ///
    /// On allocation failure `self` is left untouched.
    pub fn replace(&mut self, src: &BitStream) -> Result<(), DrbgError> {
        let copy = src.try_clone()?;
        *self = copy;
        Ok(())
    }

    /// Overwrite every byte with zero, keeping the length.
    pub fn wipe(&mut self) {
        self.data.as_mut_slice().zeroize();
    }

    /// Length in bits.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Length in bytes, `ceil(bit_len / 8)`.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    /// Raw big-endian storage.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Copy of the raw big-endian storage.
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.clone()
    }

    /// True if every bit is zero (and trivially for the empty stream).
    pub fn is_zero(&self) -> bool {
        self.data.iter().fold(0u8, |acc, &b| acc | b) == 0
    }

    /// Read value bit `index` (0 = most significant).
    pub fn bit(&self, index: usize) -> Result<bool, DrbgError> {
        if index >= self.bit_len {
            return Err(DrbgError::InvalidParameter);
        }
        let pos = self.padding_bits() + index;
        Ok((self.data[pos / 8] >> (7 - pos % 8)) & 1 == 1)
    }

    /// Number of unused high bits in the leading byte.
    pub(crate) fn padding_bits(&self) -> usize {
        self.data.len() * 8 - self.bit_len
    }

    /// Re-clear the unused high bits of the leading byte.
    pub(crate) fn clear_padding(&mut self) {
        let pad = self.padding_bits();
        if pad > 0 {
            self.data[0] &= 0xFF >> pad;
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl ConstantTimeEq for BitStream {
    fn ct_eq(&self, other: &Self) -> Choice {
        if self.bit_len != other.bit_len {
            return Choice::from(0);
        }
        self.data.as_slice().ct_eq(other.data.as_slice())
    }
}

impl PartialEq for BitStream {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for BitStream {}

impl fmt::Debug for BitStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitStream")
            .field("bit_len", &self.bit_len)
            .finish_non_exhaustive()
    }
}

/// Copy `count` bits from `src` to `dst`.
///
/// Positions are absolute storage offsets counted from the most significant
/// bit of byte 0. Callers guarantee both ranges are in bounds. When the two
/// offsets share the same remainder mod 8, whole interior bytes are block
/// copied and only the boundary bytes are masked.
pub(crate) fn copy_bits(src: &[u8], src_pos: usize, dst: &mut [u8], dst_pos: usize, count: usize) {
    if count == 0 {
        return;
    }

    let align = dst_pos % 8;
    if align != src_pos % 8 {
        copy_bits_shifted(src, src_pos, dst, dst_pos, count);
        return;
    }

    let head = if align == 0 { 0 } else { (8 - align).min(count) };
    copy_bits_shifted(src, src_pos, dst, dst_pos, head);

    let body = (count - head) / 8;
    let s = (src_pos + head) / 8;
    let d = (dst_pos + head) / 8;
    dst[d..d + body].copy_from_slice(&src[s..s + body]);

    let done = head + body * 8;
    copy_bits_shifted(src, src_pos + done, dst, dst_pos + done, count - done);
}

/// Byte-at-a-time copy for unaligned ranges.
fn copy_bits_shifted(src: &[u8], src_pos: usize, dst: &mut [u8], dst_pos: usize, count: usize) {
    let end = dst_pos + count;
    let mut pos = dst_pos;
    while pos < end {
        let idx = pos / 8;
        let off = pos % 8;
        let width = (8 - off).min(end - pos);
        let bits = read_bits(src, src_pos + (pos - dst_pos), width);
        let shift = 8 - off - width;
        let mask = (((1u16 << width) - 1) as u8) << shift;
        dst[idx] = (dst[idx] & !mask) | (bits << shift);
        pos += width;
    }
}

/// Read `width` (1..=8) bits starting at absolute bit `pos`, right-aligned.
fn read_bits(src: &[u8], pos: usize, width: usize) -> u8 {
    let idx = pos / 8;
    let off = pos % 8;
    let hi = src[idx] as u16;
    let lo = if off + width > 8 { src[idx + 1] as u16 } else { 0 };
    let window = (hi << 8) | lo;
    ((window >> (16 - off - width)) & ((1u16 << width) - 1)) as u8
}
