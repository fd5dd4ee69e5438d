#![no_main]
use ctrdrbg_crypto::entropy::ReplayEntropySource;
use ctrdrbg_crypto::{DrbgConfig, DrbgInstance, RandAlgId};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let (head, rest) = data.split_at(4);
    let requested_bits = u16::from_be_bytes([head[0], head[1]]) as usize;
    let add_bits = (head[2] as usize).min(rest.len() * 8);
    let pr = head[3] & 1 == 1;

    let Ok(mut drbg) = DrbgInstance::instantiate(
        RandAlgId::Aes256Ctr,
        DrbgConfig::default(),
        Box::new(ReplayEntropySource::cycle(rest.to_vec())),
        256,
        pr,
        &[],
        0,
    ) else {
        return;
    };

    let add = if add_bits == 0 { &[][..] } else { rest };
    let mut out = vec![0u8; requested_bits.div_ceil(8)];
    if drbg
        .generate(256, pr, add, add_bits, requested_bits, &mut out)
        .is_ok()
        && requested_bits % 8 != 0
    {
        assert_eq!(out[0] >> (requested_bits % 8), 0);
    }
});
