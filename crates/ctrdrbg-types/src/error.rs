/// Errors raised by the bit-stream engine, the entropy layer and the DRBG.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DrbgError {
    // General errors
    #[error("invalid parameter")]
    InvalidParameter,
    #[error("out of resources")]
    OutOfResources,
    #[error("operation not supported")]
    Unsupported,
    #[error("internal accounting invariant violated")]
    Aborted,

    // DRBG errors
    #[error("drbg: reseed required")]
    NotReady,
    #[error("drbg: self-test failed: {0}")]
    SelfTestFailure(String),

    // Entropy errors
    #[error("entropy: source device error")]
    DeviceError,
    #[error("entropy: repetition count test failed")]
    EntropyRctFailure,
    #[error("entropy: adaptive proportion test failed")]
    EntropyAptFailure,
}
