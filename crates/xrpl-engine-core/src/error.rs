//! Error types for the XRPL engine core.

use thiserror::Error;

/// Errors raised by the field table, the binary codec and the address codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A field name (or a `(type, field)` code pair) has no definition.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A value's runtime type disagrees with its field definition.
    #[error("type mismatch for field {field}: expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A variable-length payload exceeds the protocol maximum.
    #[error("length {0} exceeds the maximum variable length of 918744 bytes")]
    LengthOverflow(usize),

    /// The input ended before a complete value could be read.
    #[error("truncated input: needed {needed} more bytes at offset {offset}")]
    TruncatedInput { offset: usize, needed: usize },

    /// Bytes remained after a complete top-level object was read.
    #[error("unexpected trailing bytes at offset {0}")]
    TrailingBytes(usize),

    /// A value is structurally valid but outside the protocol's range.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// A base58 checksum did not match its payload.
    #[error("base58 checksum mismatch")]
    ChecksumMismatch,

    /// A character outside the XRPL base58 alphabet.
    #[error("invalid base58 character {character:?} at index {index}")]
    InvalidAlphabet { character: char, index: usize },

    /// A base58 payload carried an unexpected version prefix.
    #[error("unexpected version prefix: {0}")]
    InvalidVersion(String),

    /// A base58 payload had the wrong length for its version.
    #[error("invalid payload length: expected {expected}, got {actual}")]
    InvalidPayloadLength { expected: usize, actual: usize },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
