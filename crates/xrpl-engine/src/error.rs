//! Error types for the signing engine.

use thiserror::Error;
use xrpl_engine_core::CoreError;
use xrpl_engine_crypto::CryptoError;

/// Errors that can occur while signing or verifying transactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A required input is missing: an empty transaction, or a transaction
    /// without the signature being verified.
    #[error("missing argument: {0}")]
    NullArgument(&'static str),

    /// An input is present but unusable, e.g. an empty signature set.
    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// A freshly produced signature failed to verify.
    #[error("signature failed self-verification")]
    SelfVerificationFailed,

    /// Codec, hashing or address error.
    #[error("codec error: {0}")]
    Core(#[from] CoreError),

    /// Key or signature error.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
