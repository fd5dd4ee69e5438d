#![forbid(unsafe_code)]
#![doc = "Arbitrary-length big-endian bit-stream buffers with a fixed algebra (select, write, xor, concatenate, modular add)."]

mod bitstream;
mod ops;
mod select;

pub use bitstream::{byte_len, BitStream};
