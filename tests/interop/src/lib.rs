//! Integration tests for the ctrdrbg workspace.
//! End-to-end DRBG lifecycles across the types, bits and crypto crates.

#[cfg(test)]
mod tests {
    use ctrdrbg_bits::BitStream;
    use ctrdrbg_crypto::entropy::{
        request_entropy, EntropyConfig, EntropySource, HealthTestedSource, ReplayEntropySource,
    };
    use ctrdrbg_crypto::{self_test, DrbgConfig, DrbgInstance};
    use ctrdrbg_types::{DrbgError, RandAlgId};

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    fn instantiate(entropy: Vec<u8>, config: DrbgConfig, pr: bool) -> DrbgInstance {
        DrbgInstance::instantiate(
            RandAlgId::Aes256Ctr,
            config,
            Box::new(ReplayEntropySource::new(entropy)),
            256,
            pr,
            &[],
            0,
        )
        .unwrap()
    }

    // -------------------------------------------------------
    // 1. CAVP CTR_DRBG.rsp [AES-256 no df] [PR = False] COUNT 0
    // -------------------------------------------------------
    #[test]
    fn test_cavp_aes256_no_df_count0() {
        let entropy = hex(concat!(
            "df5d73faa468649edda33b5cca79b0b05600419ccb7a879d",
            "dfec9db32ee494e5531b51de16a30f769262474c73bec010"
        ));
        let expected = hex(concat!(
            "d1c07cd95af8a7f11012c84ce48bb8cb87189e99d40fccb1771c619bdf82ab22",
            "80b1dc2f2581f39164f7ac0c510494b3a43c41b7db17514c87b107ae793e01c5"
        ));

        let mut drbg = instantiate(entropy, DrbgConfig::default(), false);
        let mut out = [0u8; 64];
        drbg.generate(256, false, &[], 0, 512, &mut out).unwrap();
        drbg.generate(256, false, &[], 0, 512, &mut out).unwrap();
        assert_eq!(out.to_vec(), expected);
        assert_eq!(drbg.reseed_counter(), 3);
        drbg.uninstantiate().unwrap();
    }

    // -------------------------------------------------------
    // 2. Full lifecycle: personalization, additional input, reseed
    // -------------------------------------------------------
    #[test]
    fn test_full_lifecycle() {
        let entropy: Vec<u8> = (0x00u8..0x60).collect();
        let pers: Vec<u8> = (0x80u8..0x90).collect();
        let add: Vec<u8> = (0xC0u8..0xD0).collect();

        let mut drbg = DrbgInstance::instantiate(
            RandAlgId::Aes256Ctr,
            DrbgConfig::default(),
            Box::new(ReplayEntropySource::new(entropy)),
            128,
            false,
            &pers,
            128,
        )
        .unwrap();
        // strength is always granted at the mechanism ceiling
        assert_eq!(drbg.security_strength(), 256);

        let mut out = [0u8; 32];
        drbg.generate(128, false, &add, 128, 256, &mut out).unwrap();
        assert_eq!(
            out.to_vec(),
            hex("c28338de1d2a7a3be975ce1db67bc3fe0f94e101f8562f19be5fe1dbcb3b3418")
        );

        drbg.reseed(false, &[0x5A; 48], 384).unwrap();
        drbg.generate(256, false, &[], 0, 256, &mut out).unwrap();
        assert_eq!(
            out.to_vec(),
            hex("a69c752011233ce0996f8bfebf512a87f9182fb51609b82e4011e7682d358e74")
        );

        drbg.uninstantiate().unwrap();
    }

    // -------------------------------------------------------
    // 3. Prediction resistance draws fresh entropy on every call
    // -------------------------------------------------------
    #[test]
    fn test_prediction_resistance_consumes_entropy() {
        let entropy: Vec<u8> = (0x00u8..0x60).collect();
        let add: Vec<u8> = (0xC0u8..0xD0).collect();
        let mut drbg = instantiate(entropy, DrbgConfig::default(), true);

        let mut out = [0u8; 32];
        drbg.generate(256, true, &add, 128, 256, &mut out).unwrap();
        assert_eq!(
            out.to_vec(),
            hex("d2a7488f7cfcc9387336db100a45178bfba3730aecf97b4b013ebf56beacd1e7")
        );

        // replay source is exhausted; the next PR request cannot reseed
        assert_eq!(
            drbg.generate(256, true, &[], 0, 256, &mut out),
            Err(DrbgError::DeviceError)
        );
        // but a request without PR still works
        drbg.generate(256, false, &[], 0, 256, &mut out).unwrap();
    }

    // -------------------------------------------------------
    // 4. Exhausted reseed interval is recovered transparently
    // -------------------------------------------------------
    #[test]
    fn test_reseed_interval_recovery() {
        let entropy: Vec<u8> = (0x00u8..0x60).collect();
        let add: Vec<u8> = (0xC0u8..0xD0).collect();
        let config = DrbgConfig {
            reseed_interval: 1,
            ..Default::default()
        };
        let mut drbg = instantiate(entropy, config, false);

        let mut out = [0u8; 16];
        drbg.generate(256, false, &[], 0, 128, &mut out).unwrap();
        assert_eq!(out.to_vec(), hex("061550234d158c5ec95595fe04ef7a25"));
        drbg.generate(256, false, &add, 128, 128, &mut out).unwrap();
        assert_eq!(out.to_vec(), hex("d4616c6781a6fef16ad2634acef55bed"));
    }

    // -------------------------------------------------------
    // 5. Narrow counter fields agree with the full counter until they wrap
    // -------------------------------------------------------
    #[test]
    fn test_counter_width_equivalence() {
        let expected = hex(concat!(
            "91618fe99a8f9420497b246f735b27a019078a9d3ca6b2a001aec0b9e07e680b",
            "af4443922a119178fb8191d4c9d0a58f8c4f42410a638a32df06fa6ea75aba6b"
        ));
        for counter_bits in [32, 64, 128] {
            let config = DrbgConfig {
                counter_bits,
                ..Default::default()
            };
            let mut drbg = instantiate(vec![0u8; 48], config, false);
            let mut out = [0u8; 64];
            drbg.generate(256, false, &[], 0, 512, &mut out).unwrap();
            assert_eq!(out.to_vec(), expected, "counter_bits = {counter_bits}");
        }
    }

    // -------------------------------------------------------
    // 6. Non-byte-aligned inputs and outputs
    // -------------------------------------------------------
    #[test]
    fn test_unaligned_personalization_and_output() {
        let mut drbg = DrbgInstance::instantiate(
            RandAlgId::Aes256Ctr,
            DrbgConfig::default(),
            Box::new(ReplayEntropySource::new(vec![0u8; 48])),
            256,
            false,
            &[0x0A],
            4,
        )
        .unwrap();
        let mut out = [0u8; 16];
        drbg.generate(256, false, &[], 0, 128, &mut out).unwrap();
        assert_eq!(out.to_vec(), hex("ba6746621cacf73b1da65447a082ddbd"));

        let mut drbg = instantiate(vec![0u8; 48], DrbgConfig::default(), false);
        let mut out = [0u8; 2];
        drbg.generate(256, false, &[], 0, 13, &mut out).unwrap();
        let stream = BitStream::from_bytes(&out, 13).unwrap();
        assert_eq!(stream.as_bytes(), &[0x12, 0x2C]);
        // 0x122C = 1 0010 0010 1100
        assert!(stream.bit(0).unwrap());
        assert!(!stream.bit(12).unwrap());
    }

    // -------------------------------------------------------
    // 7. Health-tested entropy feeding a DRBG
    // -------------------------------------------------------
    #[test]
    fn test_health_tested_source_rejects_stuck_input() {
        let config = EntropyConfig::default();
        let stuck = ReplayEntropySource::cycle(vec![0x00]);
        assert!(matches!(
            HealthTestedSource::new(stuck, &config),
            Err(DrbgError::EntropyRctFailure)
        ));

        let counter: Vec<u8> = (0..=255u8).collect();
        let source = HealthTestedSource::new(ReplayEntropySource::cycle(counter), &config).unwrap();
        let mut drbg = DrbgInstance::instantiate(
            RandAlgId::Aes256Ctr,
            DrbgConfig::default(),
            Box::new(source),
            256,
            true,
            &[],
            0,
        )
        .unwrap();
        let mut out = [0u8; 32];
        drbg.generate(256, true, &[], 0, 256, &mut out).unwrap();
        assert!(out.iter().any(|&b| b != 0));
    }

    // -------------------------------------------------------
    // 8. Entropy collection across draws keeps byte order
    // -------------------------------------------------------
    #[test]
    fn test_request_entropy_preserves_order() {
        let bytes: Vec<u8> = (0u8..48).collect();
        let mut source = ReplayEntropySource::new(bytes.clone()).with_max_bits(64);
        let stream = request_entropy(&mut source, 384, 384).unwrap();
        assert_eq!(stream.to_vec(), bytes);
        assert_eq!(source.remaining(), 0);
        assert_eq!(source.name(), "replay");
    }

    // -------------------------------------------------------
    // 9. Unsupported mechanisms and self-test
    // -------------------------------------------------------
    #[test]
    fn test_hash_drbg_unsupported_and_self_test() {
        for alg in [RandAlgId::Sha256, RandAlgId::Sha512] {
            let result = DrbgInstance::instantiate(
                alg,
                DrbgConfig::default(),
                Box::new(ReplayEntropySource::new(vec![0u8; 48])),
                256,
                false,
                &[],
                0,
            );
            assert!(matches!(result, Err(DrbgError::Unsupported)));
        }
        self_test().unwrap();
    }

    #[test]
    fn test_instances_are_send() {
        fn assert_send<T: Send>() {}
        assert_send::<DrbgInstance>();
    }
}
