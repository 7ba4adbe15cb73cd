//! # XRPL Engine
//!
//! Client-side transaction signing for the XRP Ledger: canonical binary
//! encoding, single signing, multi signing with weighted quorums, and
//! payment channel claims.
//!
//! ## Overview
//!
//! The engine is offline and stateless. It never talks to a node, never
//! autofills fees or sequence numbers and never stores keys. Callers hand it
//! a field mapping and a key; it hands back the submit-ready blob and the
//! transaction id.
//!
//! - **Single sign**: sets `SigningPubKey`, signs `STX\0 || encoding`,
//!   attaches `TxnSignature`
//! - **Multi sign**: each signer signs `SMT\0 || encoding || account`; the
//!   signatures are collected into a sorted `Signers` array
//! - **Quorum**: the weights of the valid, authorized signatures are summed
//!   and compared against the signer list's quorum
//!
//! ## Usage
//!
//! ```rust,no_run
//! use xrpl_engine::{Engine, SerializableObject, PrivateKey, KeyType};
//! use xrpl_engine::core::{AccountId, Amount};
//!
//! let key = PrivateKey::generate(KeyType::Ed25519);
//! let tx = SerializableObject::new()
//!     .with("TransactionType", 0u16)
//!     .with("Account", key.account_id())
//!     .with("Destination", AccountId::ZERO)
//!     .with("Amount", Amount::drops(1_000_000))
//!     .with("Fee", Amount::drops(12))
//!     .with("Sequence", 1u32);
//!
//! let engine = Engine::default();
//! let signed = engine.sign_single(&key, &tx).unwrap();
//! println!("{} {}", signed.hash(), signed.to_hex());
//! ```
//!
//! ## Re-exports
//!
//! - `xrpl_engine::core` - Field table, codec, hashes, addresses
//! - `xrpl_engine::crypto` - Keys and signature schemes

pub mod engine;
pub mod error;
pub mod multisig;
pub mod signed;

// Re-export component crates
pub use xrpl_engine_core as core;
pub use xrpl_engine_crypto as crypto;

// Re-export main types for convenience
pub use engine::{
    add_multi_signatures, add_signature, sign_claim, sign_multi, sign_single, verify_claim,
    verify_multi, verify_single, Engine, EngineConfig,
};
pub use error::{EngineError, Result};
pub use multisig::{MultiSignatureSet, SignerList, SignerSignature, SignerWeights};
pub use signed::{Signable, SignedTransaction};

// Re-export commonly used component types
pub use xrpl_engine_core::{AccountId, CanonicalBytes, CodecOptions, Hash256, SerializableObject};
pub use xrpl_engine_crypto::{Canonicality, KeyType, PrivateKey, PublicKey, Signature};
