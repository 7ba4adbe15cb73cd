//! Strong identifier types shared across the engine.
//!
//! All identifiers are newtypes so an account id can never be passed where a
//! ledger hash is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::address;
use crate::error::{CoreError, Result};

/// A 20-byte account identifier: `RIPEMD160(SHA256(public_key))`.
///
/// Orders bytewise, which is the order signers must appear in a
/// multi-signed transaction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 20]);

impl AccountId {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Derive the account id of a serialized public key.
    pub fn from_public_key(public_key: &[u8]) -> Self {
        address::derive_account_id(public_key)
    }

    /// Parse a classic `r...` address.
    pub fn from_address(text: &str) -> Result<Self> {
        address::decode_classic_address(text)
    }

    /// Encode as a classic `r...` address.
    pub fn to_address(&self) -> String {
        address::encode_classic_address(self)
    }

    /// Convert to upper-case hex.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    /// The all-zero account (`rrrrrrrrrrrrrrrrrrrrrhoLvTp`).
    pub const ZERO: Self = Self([0u8; 20]);
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_address())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_address())
    }
}

impl FromStr for AccountId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_address(s)
    }
}

impl AsRef<[u8]> for AccountId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 20]> for AccountId {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for AccountId {
    type Error = CoreError;

    fn try_from(slice: &[u8]) -> Result<Self> {
        let arr: [u8; 20] = slice
            .try_into()
            .map_err(|_| CoreError::InvalidPayloadLength {
                expected: 20,
                actual: slice.len(),
            })?;
        Ok(Self(arr))
    }
}

/// A 256-bit digest: transaction ids, signing hashes, ledger object ids.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to upper-case hex, the form the network publishes.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    /// Parse from hex (either case).
    pub fn from_hex(s: &str) -> std::result::Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The zero hash.
    pub const ZERO: Self = Self([0u8; 32]);
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_hex_roundtrip() {
        let hash = Hash256::from_bytes([0x42; 32]);
        let recovered = Hash256::from_hex(&hash.to_hex()).unwrap();
        assert_eq!(hash, recovered);
        assert!(Hash256::from_hex("abcd").is_err());
    }

    #[test]
    fn test_hash_display_is_upper_hex() {
        let hash = Hash256::from_bytes([0xab; 32]);
        assert_eq!(format!("{}", hash), "AB".repeat(32));
        assert!(format!("{:?}", hash).starts_with("Hash256(ABABAB"));
    }

    #[test]
    fn test_account_zero_address() {
        assert_eq!(AccountId::ZERO.to_address(), "rrrrrrrrrrrrrrrrrrrrrhoLvTp");
        let parsed: AccountId = "rrrrrrrrrrrrrrrrrrrrrhoLvTp".parse().unwrap();
        assert_eq!(parsed, AccountId::ZERO);
    }

    #[test]
    fn test_account_ordering_is_bytewise() {
        let mut low = [0u8; 20];
        low[19] = 1;
        let mut high = [0u8; 20];
        high[0] = 1;
        assert!(AccountId(low) < AccountId(high));
    }

    #[test]
    fn test_account_try_from_slice() {
        assert!(AccountId::try_from(&[0u8; 19][..]).is_err());
        assert_eq!(AccountId::try_from(&[0u8; 20][..]).unwrap(), AccountId::ZERO);
    }
}
