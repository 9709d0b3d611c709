use thiserror::Error;

/// Alias for results produced by this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure modes surfaced by the library.
///
/// Cryptographic primitives never recover from these locally; every error
/// propagates to the caller unchanged. [`Error::AuthFailure`] in particular
/// is definitive: the blob was tampered with or the key is wrong, and
/// retrying with other keys is never appropriate.
#[derive(Debug, Error)]
pub enum Error {
    /// A byte input failed canonical decoding or a length check.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// A symmetric key length outside {16, 24, 32}.
    #[error("invalid key size: {0} bytes (want 16, 24 or 32)")]
    InvalidKeySize(usize),

    /// An input that decodes fine but cannot be used for the operation.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// A scalar at or above the subgroup order, or zero where a unit is
    /// required.
    #[error("scalar is out of range")]
    ScalarOutOfRange,

    /// AEAD tag verification failed. No plaintext accompanies this error.
    #[error("authentication failed")]
    AuthFailure,

    /// A secret component has no inverse modulo the subgroup order. Cannot
    /// happen for well-formed keys.
    #[error("secret component has no modular inverse")]
    ModInverseUndefined,

    /// Storage lookup miss.
    #[error("data not found")]
    NotFound,

    /// The operating system's random source failed.
    #[error("random source failure: {0}")]
    Rng(#[from] rand::Error),

    /// File I/O failure while persisting or loading key material.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
