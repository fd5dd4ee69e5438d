//! CTR_DRBG and bit-stream benchmarks.
//!
//! Run with: cargo bench -p ctrdrbg-crypto

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ctrdrbg_crypto::entropy::ReplayEntropySource;
use ctrdrbg_crypto::{BitStream, DrbgConfig, DrbgInstance, RandAlgId};

fn instance(counter_bits: usize) -> DrbgInstance {
    let config = DrbgConfig {
        counter_bits,
        ..Default::default()
    };
    DrbgInstance::instantiate(
        RandAlgId::Aes256Ctr,
        config,
        Box::new(ReplayEntropySource::cycle(vec![0x5A; 48])),
        256,
        false,
        &[],
        0,
    )
    .unwrap()
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("ctr_drbg_generate");

    for bits in [128usize, 1024, 8192, 1 << 16] {
        let mut out = vec![0u8; bits / 8];
        group.throughput(Throughput::Bytes((bits / 8) as u64));

        let mut drbg = instance(128);
        group.bench_with_input(BenchmarkId::new("ctr128", bits), &bits, |bench, &bits| {
            bench.iter(|| drbg.generate(256, false, &[], 0, bits, &mut out).unwrap());
        });

        let mut drbg = instance(32);
        group.bench_with_input(BenchmarkId::new("ctr32", bits), &bits, |bench, &bits| {
            bench.iter(|| drbg.generate(256, false, &[], 0, bits, &mut out).unwrap());
        });
    }

    group.finish();
}

fn bench_reseed(c: &mut Criterion) {
    let mut drbg = instance(128);
    c.bench_function("ctr_drbg_reseed", |bench| {
        bench.iter(|| drbg.reseed(false, &[], 0).unwrap());
    });
}

fn bench_bitstream(c: &mut Criterion) {
    let mut group = c.benchmark_group("bitstream");

    for bits in [384usize, 4096] {
        let a = BitStream::from_octets(&vec![0xA5u8; bits / 8]).unwrap();
        let b = BitStream::from_octets(&vec![0x3Cu8; bits / 8]).unwrap();

        group.bench_with_input(BenchmarkId::new("xor", bits), &bits, |bench, _| {
            bench.iter(|| a.xor(&b).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("select_unaligned", bits), &bits, |bench, &bits| {
            bench.iter(|| a.select(3, bits - 11).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("add_modulo", bits), &bits, |bench, &bits| {
            let mut s = a.clone();
            bench.iter(|| s.add_modulo(1, bits).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generate, bench_reseed, bench_bitstream);
criterion_main!(benches);
