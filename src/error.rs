use thiserror::Error;

/// A `Result` alias where the `Err` case is `threshold_pre::Error`.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("malformed point encoding: {0}")]
    MalformedPoint(&'static str),
    #[error("scalar encoding is not below the group order")]
    MalformedScalar,
    #[error("tried to deserialize {object} with {actual} bytes, expected {expected}")]
    InvalidLength {
        object: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("unsupported encoding version {0:#04x}")]
    UnsupportedVersion(u8),
    #[error("invalid threshold: {threshold} out of {shares} fragments")]
    InvalidThreshold { threshold: usize, shares: usize },
    #[error("no capsule fragments were provided")]
    NoFragments,
    #[error("two capsule fragments share the same evaluation point")]
    DuplicateFragment,
    #[error("capsule verification failed")]
    CapsuleVerification,
    #[error("capsule fragment verification failed")]
    CFragVerification,
    #[error("re-encryption proof did not verify after construction")]
    ProofConstruction,
    #[error("hash-to-scalar output is not below the group order")]
    HashOutOfRange,
    #[error("scalar has no modular inverse")]
    NotInvertible,
    #[error("system randomness unavailable")]
    Rng,
    #[error("key derivation failed")]
    Kdf,
    #[error("symmetric encryption failed")]
    Encryption,
    #[error("symmetric decryption failed")]
    Decryption,
}
