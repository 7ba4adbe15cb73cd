//! Error types for keys and signatures.

use thiserror::Error;
use xrpl_engine_core::CoreError;

/// Errors raised by key handling and the signature engine.
///
/// A signature that simply does not match is not an error: verification
/// returns `Ok(false)` for that.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Key bytes are the wrong length, carry the wrong tag, or are not a
    /// valid curve point or scalar. Also raised for a key/operation mismatch.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Signature bytes are structurally invalid (bad DER, wrong length).
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// Address or base58 failure while parsing key text.
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

/// Result type for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
