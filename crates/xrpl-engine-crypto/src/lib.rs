//! # XRPL Engine Crypto
//!
//! Keys, signatures and the signature engine for both XRPL schemes:
//! secp256k1 ECDSA and ed25519.
//!
//! The engine is stateless. Every call borrows its key for the duration of
//! the call and keeps nothing afterwards.
//!
//! ## Key Types
//!
//! - [`PublicKey`] - 33-byte key, scheme read from the tag byte
//! - [`PrivateKey`] - Secret key of either scheme
//! - [`Signature`] - Signature bytes plus the producing scheme

pub mod error;
pub mod keys;
pub mod scheme;
pub mod signature;

pub use error::{CryptoError, Result};
pub use keys::{KeyType, PrivateKey, PublicKey, ED25519_PREFIX, PUBLIC_KEY_LENGTH};
pub use scheme::{
    sign, sign_digest, verify, verify_digest, verify_with, Canonicality, Ed25519, Secp256k1,
    SignatureScheme,
};
pub use signature::Signature;
