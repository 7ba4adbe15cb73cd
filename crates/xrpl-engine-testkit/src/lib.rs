//! # XRPL Engine Testkit
//!
//! Testing utilities for the XRPL engine.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known inputs with expected outputs for cross-implementation verification
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Deterministic wallets and multi-party signing setups
//!
//! ## Golden Vectors
//!
//! ```rust
//! use xrpl_engine_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, computed) in verify_all_vectors() {
//!     println!("{}: {} ({})", name, matches, computed);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use xrpl_engine_testkit::generators::{transaction_from_params, TransactionParams};
//!
//! proptest! {
//!     #[test]
//!     fn encoding_is_deterministic(params in any::<TransactionParams>()) {
//!         let tx = transaction_from_params(&params);
//!         prop_assert_eq!(encode(&tx).unwrap(), encode(&tx).unwrap());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use xrpl_engine_testkit::fixtures::{multi_party_fixtures, signer_list, collect_signatures};
//!
//! let wallets = multi_party_fixtures(3);
//! let list = signer_list(&wallets, &[1, 1, 1], 2);
//! let tx = wallets[0].payment_to(wallets[1].account(), 1_000, 1);
//! let signatures = collect_signatures(&wallets[..2], &tx);
//! assert!(xrpl_engine::verify_multi(&signatures, &tx, &list, 2).unwrap());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, reference_payment, TestWallet};
pub use generators::{transaction_from_params, TransactionParams};
pub use vectors::{all_vectors, export_vectors_json, verify_all_vectors, GoldenVector, VectorRecord};
