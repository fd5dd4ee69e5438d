#![forbid(unsafe_code)]
#![doc = "NIST SP 800-90A CTR_DRBG over arbitrary-length bit-streams, with pluggable entropy and block-cipher collaborators."]

// Core traits
pub mod provider;

// Block cipher collaborator
pub mod aes;

// Entropy acquisition
pub mod entropy;

// DRBG mechanism and lifecycle
pub mod drbg;

pub use ctrdrbg_bits::BitStream;
pub use ctrdrbg_types::{CipherAlgId, DrbgError, RandAlgId};
pub use drbg::{self_test, DrbgConfig, DrbgInstance};
