//! Signature values.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::keys::KeyType;

/// Length of an ed25519 signature.
pub const ED25519_SIGNATURE_LENGTH: usize = 64;

/// Signature bytes and the scheme that produced them.
///
/// secp256k1 signatures are DER-encoded `(r, s)` pairs of up to 72 bytes;
/// ed25519 signatures are always 64 bytes.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    bytes: Vec<u8>,
    key_type: KeyType,
}

impl Signature {
    pub fn new(bytes: impl Into<Vec<u8>>, key_type: KeyType) -> Self {
        Self {
            bytes: bytes.into(),
            key_type,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Upper-case hex, as carried in `TxnSignature`.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.bytes)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "Signature({}, {}...)", self.key_type, &hex[..hex.len().min(16)])
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
