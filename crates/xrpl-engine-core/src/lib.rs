//! # XRPL Engine Core
//!
//! Pure primitives for the XRPL engine: the field table, the canonical
//! binary codec, protocol hashes and the address codec.
//!
//! This crate does no I/O and holds no keys. It is pure computation over
//! protocol data structures.
//!
//! ## Key Types
//!
//! - [`SerializableObject`] - A field-name to value mapping, the codec's input
//! - [`FieldValue`] - One typed value
//! - [`CanonicalBytes`] - The immutable encoded form
//! - [`AccountId`] - 20-byte account identifier with its `r...` address form
//! - [`Hash256`] - Transaction ids and signing hashes
//!
//! ## Canonicalization
//!
//! Fields are emitted sorted by `(type code, field code)` from the
//! [`definitions`] table. See the [`canonical`] module.

pub mod address;
pub mod amount;
pub mod binary;
pub mod canonical;
pub mod definitions;
pub mod error;
pub mod hash;
pub mod object;
pub mod path;
pub mod types;

pub use address::{
    decode_base58_check, derive_account_id, encode_base58_check, is_valid_classic_address,
    SeedKind,
};
pub use amount::{Amount, Currency, IssuedAmount, IssuedValue};
pub use canonical::{
    decode, decode_with, encode, encode_for_multisigning, encode_for_signing, CanonicalBytes,
    CodecOptions, UnknownFieldPolicy,
};
pub use definitions::{lookup, sort_key, FieldDefinition, TypeCode, TF_FULLY_CANONICAL_SIG};
pub use error::{CoreError, Result};
pub use hash::{
    claim_hash, claim_signing_data, multi_signing_data, multi_signing_hash, sha512_half,
    signing_data, single_signing_hash, transaction_hash, HashPrefix,
};
pub use object::{FieldValue, OpaqueField, SerializableObject};
pub use path::{Path, PathSet, PathStep};
pub use types::{AccountId, Hash256};
