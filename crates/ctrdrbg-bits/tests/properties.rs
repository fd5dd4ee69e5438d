//! Property tests for the bit-stream algebra.

use ctrdrbg_bits::{byte_len, BitStream};
use proptest::prelude::*;

/// An arbitrary stream of 0..=200 bits.
fn arb_stream() -> impl Strategy<Value = BitStream> {
    (0usize..=200).prop_flat_map(|bits| {
        proptest::collection::vec(any::<u8>(), byte_len(bits).max(1)).prop_map(move |bytes| {
            if bits == 0 {
                BitStream::new(0).unwrap()
            } else {
                BitStream::from_bytes(&bytes, bits).unwrap()
            }
        })
    })
}

proptest! {
    #[test]
    fn split_then_concat_is_identity(s in arb_stream(), split in 0usize..=200) {
        let k = split.min(s.bit_len());
        let left = s.leftmost(k).unwrap();
        let right = s.rightmost(s.bit_len() - k).unwrap();
        prop_assert_eq!(BitStream::concat(&left, &right).unwrap(), s);
    }

    #[test]
    fn xor_with_self_is_zero(s in arb_stream()) {
        let z = s.xor(&s).unwrap();
        prop_assert_eq!(z.bit_len(), s.bit_len());
        prop_assert!(z.is_zero());
    }

    #[test]
    fn padding_stays_clear(s in arb_stream(), value in any::<u64>()) {
        let mut t = s.clone();
        let bits = t.bit_len();
        t.add_modulo(value, bits).unwrap();
        let pad = t.byte_len() * 8 - bits;
        if pad > 0 {
            prop_assert_eq!(t.as_bytes()[0] >> (8 - pad), 0);
        }
    }

    #[test]
    fn write_then_select_returns_input(bytes in proptest::collection::vec(any::<u8>(), 1..32)) {
        let n = bytes.len() * 8;
        let mut s = BitStream::new(n).unwrap();
        s.write(&bytes, 0, n).unwrap();
        let sel = s.select(0, n).unwrap();
        prop_assert_eq!(sel.as_bytes(), bytes.as_slice());
    }

    #[test]
    fn write_leaves_other_bits_alone(
        s in arb_stream(),
        fill in any::<u8>(),
        start in 0usize..200,
        count in 0usize..200,
    ) {
        let len = s.bit_len();
        let start = start.min(len);
        let count = count.min(len - start);
        let src = vec![fill; byte_len(count).max(1)];

        let mut t = s.clone();
        t.write(&src, start, count).unwrap();

        prop_assert_eq!(t.leftmost(start).unwrap(), s.leftmost(start).unwrap());
        let tail = len - start - count;
        prop_assert_eq!(t.rightmost(tail).unwrap(), s.rightmost(tail).unwrap());
        if count > 0 {
            let written = t.select(start, count).unwrap();
            let expected = BitStream::from_bytes(&src, count).unwrap();
            prop_assert_eq!(written, expected);
        }
    }

    #[test]
    fn add_modulo_matches_integer_arithmetic(start in any::<u32>(), value in any::<u64>(), bits in 1usize..=32) {
        let modulus = 1u128 << bits;
        let initial = (start as u128) % modulus;
        let bytes = (initial as u32).to_be_bytes();
        let mut s = BitStream::from_bytes(&bytes[4 - byte_len(bits)..], bits).unwrap();
        s.add_modulo(value, bits).unwrap();

        let expected = ((initial + value as u128) % modulus) as u32;
        let mut out = [0u8; 4];
        s.to_bytes(&mut out[4 - byte_len(bits)..]).unwrap();
        prop_assert_eq!(u32::from_be_bytes(out), expected);
    }
}
