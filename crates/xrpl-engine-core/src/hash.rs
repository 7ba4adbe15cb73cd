//! Protocol hashes.
//!
//! Every hash is the first half of a SHA-512 digest over a 4-byte prefix
//! and a payload. The prefix says what is being hashed, so the same bytes
//! hashed as a transaction id and as signing data never collide.

use sha2::{Digest, Sha512};

use crate::canonical::{encode_for_multisigning, encode_for_signing, CanonicalBytes};
use crate::error::Result;
use crate::object::SerializableObject;
use crate::types::{AccountId, Hash256};

/// The 4-byte hash prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashPrefix {
    /// `TXN\0`: transaction id over the signed encoding.
    TransactionId,
    /// `STX\0`: single-signing data.
    TransactionSign,
    /// `SMT\0`: multi-signing data.
    TransactionMultiSign,
    /// `CLM\0`: payment channel claim.
    PaymentChannelClaim,
}

impl HashPrefix {
    pub const fn bytes(self) -> [u8; 4] {
        match self {
            Self::TransactionId => *b"TXN\0",
            Self::TransactionSign => *b"STX\0",
            Self::TransactionMultiSign => *b"SMT\0",
            Self::PaymentChannelClaim => *b"CLM\0",
        }
    }

    pub const fn value(self) -> u32 {
        u32::from_be_bytes(self.bytes())
    }
}

/// First 32 bytes of SHA-512.
pub fn sha512_half(data: &[u8]) -> Hash256 {
    let digest = Sha512::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..32]);
    Hash256(out)
}

fn prefixed_half(prefix: HashPrefix, parts: &[&[u8]]) -> Hash256 {
    let mut hasher = Sha512::new();
    hasher.update(prefix.bytes());
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..32]);
    Hash256(out)
}

fn prefixed(prefix: HashPrefix, parts: &[&[u8]]) -> Vec<u8> {
    let len = 4 + parts.iter().map(|p| p.len()).sum::<usize>();
    let mut out = Vec::with_capacity(len);
    out.extend_from_slice(&prefix.bytes());
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

/// The transaction id: `TXN\0` over the fully signed encoding.
pub fn transaction_hash(signed_bytes: &[u8]) -> Hash256 {
    prefixed_half(HashPrefix::TransactionId, &[signed_bytes])
}

/// `STX\0` over the signing encoding.
pub fn single_signing_hash(unsigned_bytes: &[u8]) -> Hash256 {
    prefixed_half(HashPrefix::TransactionSign, &[unsigned_bytes])
}

/// `SMT\0` over the signing encoding and the signer's account id.
pub fn multi_signing_hash(unsigned_bytes: &[u8], signer: &AccountId) -> Hash256 {
    prefixed_half(
        HashPrefix::TransactionMultiSign,
        &[unsigned_bytes, &signer.as_bytes()[..]],
    )
}

/// The exact bytes a single signer signs.
pub fn signing_data(tx: &SerializableObject) -> Result<Vec<u8>> {
    let body = encode_for_signing(tx)?;
    Ok(prefixed(HashPrefix::TransactionSign, &[body.as_slice()]))
}

/// The exact bytes a multi-signer signs.
pub fn multi_signing_data(tx: &SerializableObject, signer: &AccountId) -> Result<Vec<u8>> {
    let body: CanonicalBytes = encode_for_multisigning(tx, signer)?;
    Ok(prefixed(HashPrefix::TransactionMultiSign, &[body.as_slice()]))
}

/// The exact bytes signed to authorize a payment channel claim.
pub fn claim_signing_data(channel: &Hash256, drops: u64) -> Vec<u8> {
    prefixed(
        HashPrefix::PaymentChannelClaim,
        &[&channel.as_bytes()[..], &drops.to_be_bytes()[..]],
    )
}

/// `CLM\0` hash of a payment channel claim.
pub fn claim_hash(channel: &Hash256, drops: u64) -> Hash256 {
    prefixed_half(
        HashPrefix::PaymentChannelClaim,
        &[&channel.as_bytes()[..], &drops.to_be_bytes()[..]],
    )
}
