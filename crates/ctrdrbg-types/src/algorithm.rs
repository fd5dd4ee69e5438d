/// DRBG mechanism identifiers.
///
/// Only the counter-mode mechanism is implemented; the Hash-DRBG identifiers
/// are accepted by the API and rejected with `DrbgError::Unsupported`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RandAlgId {
    // CTR-DRBG, no derivation function
    Aes256Ctr,
    // Hash-DRBG
    Sha256,
    Sha512,
}

impl RandAlgId {
    /// Human-readable mechanism name.
    pub fn name(&self) -> &'static str {
        match self {
            RandAlgId::Aes256Ctr => "CTR_DRBG(AES-256, no df)",
            RandAlgId::Sha256 => "Hash_DRBG(SHA-256)",
            RandAlgId::Sha512 => "Hash_DRBG(SHA-512)",
        }
    }

    /// Block cipher behind a counter-mode mechanism, `None` for Hash_DRBG.
    pub fn cipher(&self) -> Option<CipherAlgId> {
        match self {
            RandAlgId::Aes256Ctr => Some(CipherAlgId::Aes256),
            RandAlgId::Sha256 | RandAlgId::Sha512 => None,
        }
    }
}

/// Block cipher identifiers usable by the counter-mode mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherAlgId {
    Aes256,
}
