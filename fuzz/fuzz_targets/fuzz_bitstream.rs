#![no_main]
use ctrdrbg_bits::BitStream;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let (head, body) = data.split_at(4);
    let bit_len = body.len() * 8 - (head[0] as usize % 8).min(body.len() * 8);
    let Ok(s) = BitStream::from_bytes(body, bit_len) else {
        return;
    };
    let len = s.bit_len();
    let k = if len == 0 { 0 } else { head[1] as usize % (len + 1) };

    let left = s.leftmost(k).unwrap();
    let right = s.rightmost(len - k).unwrap();
    assert_eq!(BitStream::concat(&left, &right).unwrap(), s);
    assert!(s.xor(&s).unwrap().is_zero());

    let mut w = s.clone();
    let start = if len == 0 { 0 } else { head[2] as usize % (len + 1) };
    let count = (len - start).min(left.bit_len());
    let piece = left.leftmost(count).unwrap();
    w.write_stream(&piece, start).unwrap();
    assert_eq!(w.select(start, count).unwrap(), piece);

    let mut m = s.clone();
    m.add_modulo(head[3] as u64, len).unwrap();
    if len % 8 != 0 {
        assert_eq!(m.as_bytes()[0] >> (len % 8), 0);
    }
});
