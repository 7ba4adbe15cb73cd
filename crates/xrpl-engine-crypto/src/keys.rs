//! Public and private keys for both signature schemes.
//!
//! Public keys are always 33 bytes. The first byte says which scheme the key
//! belongs to: `0xED` for ed25519, `0x02`/`0x03` for a compressed
//! secp256k1 point.

use ed25519_dalek::SigningKey as Ed25519SigningKey;
use ed25519_dalek::VerifyingKey as Ed25519VerifyingKey;
use k256::ecdsa::SigningKey as Secp256k1SigningKey;
use k256::ecdsa::VerifyingKey as Secp256k1VerifyingKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use xrpl_engine_core::address;
use xrpl_engine_core::AccountId;

use crate::error::{CryptoError, Result};

/// Tag byte that marks an ed25519 public or private key.
pub const ED25519_PREFIX: u8 = 0xED;

/// Length of a serialized public key.
pub const PUBLIC_KEY_LENGTH: usize = 33;

/// The two supported signature schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    Secp256k1,
    Ed25519,
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secp256k1 => f.write_str("secp256k1"),
            Self::Ed25519 => f.write_str("ed25519"),
        }
    }
}

/// A tagged 33-byte public key.
///
/// Construction validates the tag and the curve point, so every value of
/// this type can be handed to the verifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    /// Parse and validate serialized key bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidKey(format!(
                "public key must be {} bytes, got {}",
                PUBLIC_KEY_LENGTH,
                bytes.len()
            ))
        })?;

        match arr[0] {
            ED25519_PREFIX => {
                let mut raw = [0u8; 32];
                raw.copy_from_slice(&arr[1..]);
                Ed25519VerifyingKey::from_bytes(&raw)
                    .map_err(|e| CryptoError::InvalidKey(format!("ed25519 point: {}", e)))?;
            }
            0x02 | 0x03 => {
                Secp256k1VerifyingKey::from_sec1_bytes(&arr)
                    .map_err(|e| CryptoError::InvalidKey(format!("secp256k1 point: {}", e)))?;
            }
            tag => {
                return Err(CryptoError::InvalidKey(format!(
                    "unknown public key tag {:#04x}",
                    tag
                )))
            }
        }
        Ok(Self(arr))
    }

    /// Parse from hex (either case).
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes =
            hex::decode(s).map_err(|e| CryptoError::InvalidKey(format!("public key hex: {}", e)))?;
        Self::from_slice(&bytes)
    }

    /// Parse the base58 account public key form (`a...`).
    pub fn from_base58(text: &str) -> Result<Self> {
        let bytes = address::decode_account_public_key(text)?;
        Self::from_slice(&bytes)
    }

    /// The scheme this key belongs to, read from the tag byte.
    pub fn key_type(&self) -> KeyType {
        if self.0[0] == ED25519_PREFIX {
            KeyType::Ed25519
        } else {
            KeyType::Secp256k1
        }
    }

    pub const fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// Upper-case hex, as carried in `SigningPubKey`.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    /// The base58 account public key form.
    pub fn to_base58(&self) -> String {
        address::encode_base58_check(&self.0, address::ACCOUNT_PUBLIC_KEY_VERSION)
    }

    /// The account controlled by this key as its master key.
    pub fn account_id(&self) -> AccountId {
        AccountId::from_public_key(&self.0)
    }

    pub(crate) fn ed25519_key(&self) -> Result<Ed25519VerifyingKey> {
        let mut raw = [0u8; 32];
        raw.copy_from_slice(&self.0[1..]);
        Ed25519VerifyingKey::from_bytes(&raw)
            .map_err(|e| CryptoError::InvalidKey(format!("ed25519 point: {}", e)))
    }

    pub(crate) fn secp256k1_key(&self) -> Result<Secp256k1VerifyingKey> {
        Secp256k1VerifyingKey::from_sec1_bytes(&self.0)
            .map_err(|e| CryptoError::InvalidKey(format!("secp256k1 point: {}", e)))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}, {}...)", self.key_type(), &self.to_hex()[..16])
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for PublicKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = CryptoError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_slice(bytes)
    }
}

// Serialized as hex: serde has no impls for 33-byte arrays.
impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[derive(Clone)]
pub(crate) enum SecretKey {
    Secp256k1(Secp256k1SigningKey),
    Ed25519(Ed25519SigningKey),
}

/// A private key of either scheme.
///
/// The wrapped key types zeroize their secret on drop. `Debug` shows only
/// the scheme and the public key.
#[derive(Clone)]
pub struct PrivateKey {
    secret: SecretKey,
}

impl PrivateKey {
    /// Load a key from raw bytes.
    ///
    /// Accepts the 32-byte secret, or the 33-byte form prefixed with `0xED`
    /// (ed25519) or `0x00` (secp256k1).
    pub fn from_slice(bytes: &[u8], key_type: KeyType) -> Result<Self> {
        let raw = match (bytes.len(), key_type) {
            (32, _) => bytes,
            (33, KeyType::Ed25519) if bytes[0] == ED25519_PREFIX => &bytes[1..],
            (33, KeyType::Secp256k1) if bytes[0] == 0x00 => &bytes[1..],
            (len, _) => {
                return Err(CryptoError::InvalidKey(format!(
                    "{} private key must be 32 bytes or 33 with its prefix, got {}",
                    key_type, len
                )))
            }
        };

        let secret = match key_type {
            KeyType::Secp256k1 => SecretKey::Secp256k1(
                Secp256k1SigningKey::from_slice(raw)
                    .map_err(|e| CryptoError::InvalidKey(format!("secp256k1 scalar: {}", e)))?,
            ),
            KeyType::Ed25519 => {
                let mut seed = [0u8; 32];
                seed.copy_from_slice(raw);
                SecretKey::Ed25519(Ed25519SigningKey::from_bytes(&seed))
            }
        };
        Ok(Self { secret })
    }

    /// Load a 33-byte prefixed key, taking the scheme from the prefix.
    pub fn from_prefixed_slice(bytes: &[u8]) -> Result<Self> {
        match bytes.first() {
            Some(&ED25519_PREFIX) if bytes.len() == 33 => Self::from_slice(bytes, KeyType::Ed25519),
            Some(&0x00) if bytes.len() == 33 => Self::from_slice(bytes, KeyType::Secp256k1),
            _ => Err(CryptoError::InvalidKey(
                "prefixed private key must be 33 bytes starting with 0xED or 0x00".into(),
            )),
        }
    }

    /// Parse from hex with an explicit scheme.
    pub fn from_hex(s: &str, key_type: KeyType) -> Result<Self> {
        let bytes =
            hex::decode(s).map_err(|e| CryptoError::InvalidKey(format!("private key hex: {}", e)))?;
        Self::from_slice(&bytes, key_type)
    }

    /// Generate a new random key.
    pub fn generate(key_type: KeyType) -> Self {
        let mut rng = rand::thread_rng();
        let secret = match key_type {
            KeyType::Secp256k1 => SecretKey::Secp256k1(Secp256k1SigningKey::random(&mut rng)),
            KeyType::Ed25519 => SecretKey::Ed25519(Ed25519SigningKey::generate(&mut rng)),
        };
        Self { secret }
    }

    pub fn key_type(&self) -> KeyType {
        match self.secret {
            SecretKey::Secp256k1(_) => KeyType::Secp256k1,
            SecretKey::Ed25519(_) => KeyType::Ed25519,
        }
    }

    /// Derive the tagged public key.
    pub fn public_key(&self) -> PublicKey {
        let mut out = [0u8; PUBLIC_KEY_LENGTH];
        match &self.secret {
            SecretKey::Secp256k1(key) => {
                let point = key.verifying_key().to_encoded_point(true);
                out.copy_from_slice(point.as_bytes());
            }
            SecretKey::Ed25519(key) => {
                out[0] = ED25519_PREFIX;
                out[1..].copy_from_slice(key.verifying_key().as_bytes());
            }
        }
        PublicKey(out)
    }

    /// The master-key account of this key.
    pub fn account_id(&self) -> AccountId {
        self.public_key().account_id()
    }

    pub(crate) fn secret(&self) -> &SecretKey {
        &self.secret
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("key_type", &self.key_type())
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}
