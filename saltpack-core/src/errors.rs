//! Error types for saltpack-core.
//!
//! Every failure mode a decoder can hit has its own variant, so callers
//! can distinguish a wrong key from a corrupted stream from a message
//! that was never saltpack at all. All errors are fatal for the current
//! call; nothing is retried internally.

/// Unified error type for all saltpack-core operations.
#[derive(Debug, thiserror::Error)]
pub enum SaltpackError {
    /// Header format name is not `"saltpack"`.
    #[error("unrecognized format name: '{0}'")]
    BadFormat(String),

    /// Header major version is not 1 or 2.
    #[error("incompatible major version: {0}")]
    BadVersion(i64),

    /// Header mode is not 0 (encryption).
    #[error("incompatible mode: {0}")]
    BadMode(i64),

    /// No recipient slot in the header decrypts with the given private key.
    #[error("no recipient slot matches the given private key")]
    NoMatchingRecipient,

    /// A packet authenticator does not match the recomputed value.
    #[error("packet authenticator failed to verify")]
    HmacFailure,

    /// A box or secretbox rejected its ciphertext.
    #[error("ciphertext rejected: {0}")]
    CryptoFailure(&'static str),

    /// MessagePack parse failure, wrong packet shape, or truncated stream.
    #[error("malformed message: {0}")]
    Malformed(String),
}
