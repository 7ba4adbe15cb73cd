//! The signature engine.
//!
//! Signing input is always the *signing data*: the hash prefix followed by
//! the canonical encoding. The two schemes consume it differently:
//! - secp256k1 signs `sha512_half(data)` as a prehash with RFC 6979 nonces,
//!   low-S normalized and DER encoded
//! - ed25519 signs `data` itself
//!
//! Each scheme implements [`SignatureScheme`]; the public functions pick one
//! with a `match` on the key type.

use ed25519_dalek::{Signer as _, SigningKey as Ed25519SigningKey};
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature as EcdsaSignature, SigningKey as Secp256k1SigningKey};
use tracing::trace;

use xrpl_engine_core::sha512_half;

use crate::error::{CryptoError, Result};
use crate::keys::{KeyType, PrivateKey, PublicKey, SecretKey};
use crate::signature::{Signature, ED25519_SIGNATURE_LENGTH};

/// How strictly secp256k1 signatures are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Canonicality {
    /// Reject high-S signatures (fully canonical).
    #[default]
    Strict,
    /// Accept high-S signatures by normalizing them first.
    Lenient,
}

/// One signature scheme.
pub trait SignatureScheme {
    type SigningKey;

    const KEY_TYPE: KeyType;

    /// Sign signing data.
    fn sign(key: &Self::SigningKey, data: &[u8]) -> Result<Vec<u8>>;

    /// Verify a signature over signing data.
    fn verify(
        public_key: &PublicKey,
        data: &[u8],
        signature: &[u8],
        canonicality: Canonicality,
    ) -> Result<bool>;
}

/// ECDSA over secp256k1.
pub struct Secp256k1;

/// EdDSA over edwards25519.
pub struct Ed25519;

impl Secp256k1 {
    /// Sign a 32-byte digest.
    pub fn sign_prehash(key: &Secp256k1SigningKey, digest: &[u8; 32]) -> Result<Vec<u8>> {
        let signature: EcdsaSignature = key
            .sign_prehash(digest)
            .map_err(|e| CryptoError::InvalidKey(format!("secp256k1 signing failed: {}", e)))?;
        let signature = signature.normalize_s().unwrap_or(signature);
        Ok(signature.to_der().as_bytes().to_vec())
    }

    /// Verify a DER signature over a 32-byte digest.
    pub fn verify_prehash(
        public_key: &PublicKey,
        digest: &[u8; 32],
        signature: &[u8],
        canonicality: Canonicality,
    ) -> Result<bool> {
        let key = public_key.secp256k1_key()?;
        let parsed = EcdsaSignature::from_der(signature)
            .map_err(|e| CryptoError::MalformedSignature(format!("DER: {}", e)))?;

        let parsed = match parsed.normalize_s() {
            Some(_) if canonicality == Canonicality::Strict => {
                trace!("rejecting high-S secp256k1 signature");
                return Ok(false);
            }
            Some(low) => low,
            None => parsed,
        };
        Ok(key.verify_prehash(digest, &parsed).is_ok())
    }
}

impl SignatureScheme for Secp256k1 {
    type SigningKey = Secp256k1SigningKey;

    const KEY_TYPE: KeyType = KeyType::Secp256k1;

    fn sign(key: &Self::SigningKey, data: &[u8]) -> Result<Vec<u8>> {
        Self::sign_prehash(key, sha512_half(data).as_bytes())
    }

    fn verify(
        public_key: &PublicKey,
        data: &[u8],
        signature: &[u8],
        canonicality: Canonicality,
    ) -> Result<bool> {
        Self::verify_prehash(public_key, sha512_half(data).as_bytes(), signature, canonicality)
    }
}

impl SignatureScheme for Ed25519 {
    type SigningKey = Ed25519SigningKey;

    const KEY_TYPE: KeyType = KeyType::Ed25519;

    fn sign(key: &Self::SigningKey, data: &[u8]) -> Result<Vec<u8>> {
        Ok(key.sign(data).to_bytes().to_vec())
    }

    fn verify(
        public_key: &PublicKey,
        data: &[u8],
        signature: &[u8],
        _canonicality: Canonicality,
    ) -> Result<bool> {
        let key = public_key.ed25519_key()?;
        let bytes: [u8; ED25519_SIGNATURE_LENGTH] = signature.try_into().map_err(|_| {
            CryptoError::MalformedSignature(format!(
                "ed25519 signature must be {} bytes, got {}",
                ED25519_SIGNATURE_LENGTH,
                signature.len()
            ))
        })?;
        let parsed = ed25519_dalek::Signature::from_bytes(&bytes);
        Ok(key.verify_strict(data, &parsed).is_ok())
    }
}

/// Sign signing data with either kind of key.
pub fn sign(key: &PrivateKey, data: &[u8]) -> Result<Signature> {
    match key.secret() {
        SecretKey::Secp256k1(k) => Ok(Signature::new(Secp256k1::sign(k, data)?, Secp256k1::KEY_TYPE)),
        SecretKey::Ed25519(k) => Ok(Signature::new(Ed25519::sign(k, data)?, Ed25519::KEY_TYPE)),
    }
}

/// Verify with fully canonical secp256k1 signatures required.
pub fn verify(public_key: &PublicKey, data: &[u8], signature: &Signature) -> Result<bool> {
    verify_with(public_key, data, signature, Canonicality::Strict)
}

/// Verify a signature over signing data.
///
/// A mismatch is `Ok(false)`. Errors are reserved for bytes that cannot be
/// a signature at all.
pub fn verify_with(
    public_key: &PublicKey,
    data: &[u8],
    signature: &Signature,
    canonicality: Canonicality,
) -> Result<bool> {
    if signature.key_type() != public_key.key_type() {
        trace!(
            signature = %signature.key_type(),
            key = %public_key.key_type(),
            "signature and key schemes differ"
        );
        return Ok(false);
    }
    match public_key.key_type() {
        KeyType::Secp256k1 => {
            Secp256k1::verify(public_key, data, signature.as_bytes(), canonicality)
        }
        KeyType::Ed25519 => Ed25519::verify(public_key, data, signature.as_bytes(), canonicality),
    }
}

/// Sign an explicit 32-byte digest. secp256k1 only.
pub fn sign_digest(key: &PrivateKey, digest: &[u8; 32]) -> Result<Signature> {
    match key.secret() {
        SecretKey::Secp256k1(k) => Ok(Signature::new(
            Secp256k1::sign_prehash(k, digest)?,
            KeyType::Secp256k1,
        )),
        SecretKey::Ed25519(_) => Err(CryptoError::InvalidKey(
            "ed25519 keys sign the message, not a digest".into(),
        )),
    }
}

/// Verify a signature over an explicit 32-byte digest. secp256k1 only.
pub fn verify_digest(
    public_key: &PublicKey,
    digest: &[u8; 32],
    signature: &Signature,
    canonicality: Canonicality,
) -> Result<bool> {
    match public_key.key_type() {
        KeyType::Secp256k1 => {
            Secp256k1::verify_prehash(public_key, digest, signature.as_bytes(), canonicality)
        }
        KeyType::Ed25519 => Err(CryptoError::InvalidKey(
            "ed25519 keys verify the message, not a digest".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ED_SEED: &str = "0102030405060708090A0B0C0D0E0F101112131415161718191A1B1C1D1E1F20";
    const EC_SECRET: &str = "1A2B3C4D5E6F708192A3B4C5D6E7F8091A2B3C4D5E6F708192A3B4C5D6E7F809";

    // CLM\0 || channel || 1_000_000 drops
    fn claim_data() -> Vec<u8> {
        let mut data = b"CLM\0".to_vec();
        data.extend_from_slice(
            &hex::decode("5DB01B7FFED6B67E6B0414DED11E051D2EE2B7619CE0EAA6286D67A3A4D5BDB3")
                .unwrap(),
        );
        data.extend_from_slice(&1_000_000u64.to_be_bytes());
        data
    }

    fn ed_key() -> PrivateKey {
        PrivateKey::from_hex(ED_SEED, KeyType::Ed25519).unwrap()
    }

    fn ec_key() -> PrivateKey {
        PrivateKey::from_hex(EC_SECRET, KeyType::Secp256k1).unwrap()
    }

    #[test]
    fn test_ed25519_golden_signature() {
        let sig = sign(&ed_key(), &claim_data()).unwrap();
        assert_eq!(
            sig.to_hex(),
            "89A2AFC4F0CD238A9CEE16E770C2F0A64FEB69B7EA972142D8D1B39F109C48A8\
             24EE6B5B09E7ABAAC354930DA62DFB1D7660D2E239EF4E05D5435ADF7CC38003"
        );
        assert!(verify(&ed_key().public_key(), &claim_data(), &sig).unwrap());
    }

    #[test]
    fn test_secp256k1_golden_signature() {
        let sig = sign(&ec_key(), &claim_data()).unwrap();
        assert_eq!(
            sig.to_hex(),
            "304402204372AB9DC7C2A28871CE6115D4D39F71BEE420B4DE705E8B1BF16C0E948D7D47\
             0220173E030A6702A8395BCC58FD5A2D43BC419A07DFF80654C78BD05ED78973C84D"
        );
        assert!(verify(&ec_key().public_key(), &claim_data(), &sig).unwrap());
    }

    #[test]
    fn test_secp256k1_is_deterministic() {
        let a = sign(&ec_key(), b"same message").unwrap();
        let b = sign(&ec_key(), b"same message").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_mismatch_is_false_not_error() {
        for key in [ed_key(), ec_key()] {
            let sig = sign(&key, b"message").unwrap();
            assert!(!verify(&key.public_key(), b"massage", &sig).unwrap());

            let other = PrivateKey::generate(key.key_type()).public_key();
            assert!(!verify(&other, b"message", &sig).unwrap());
        }
    }

    #[test]
    fn test_scheme_mismatch_is_false() {
        let sig = sign(&ed_key(), b"message").unwrap();
        assert!(!verify(&ec_key().public_key(), b"message", &sig).unwrap());
    }

    #[test]
    fn test_malformed_signatures() {
        let ec = ec_key().public_key();
        let garbage = Signature::new(vec![0x30, 0x02, 0x01], KeyType::Secp256k1);
        assert!(matches!(
            verify(&ec, b"m", &garbage),
            Err(CryptoError::MalformedSignature(_))
        ));

        let ed = ed_key().public_key();
        let short = Signature::new(vec![0u8; 63], KeyType::Ed25519);
        assert!(matches!(
            verify(&ed, b"m", &short),
            Err(CryptoError::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_high_s_policy() {
        let key = ec_key();
        let digest = sha512_half(b"high s");
        let sig = sign_digest(&key, digest.as_bytes()).unwrap();
        let low = EcdsaSignature::from_der(sig.as_bytes()).unwrap();
        let high = EcdsaSignature::from_scalars(low.r(), -low.s()).unwrap();
        let high = Signature::new(high.to_der().as_bytes().to_vec(), KeyType::Secp256k1);

        let public = key.public_key();
        assert!(verify_digest(&public, digest.as_bytes(), &sig, Canonicality::Strict).unwrap());
        assert!(!verify_digest(&public, digest.as_bytes(), &high, Canonicality::Strict).unwrap());
        assert!(verify_digest(&public, digest.as_bytes(), &high, Canonicality::Lenient).unwrap());
    }

    #[test]
    fn test_digest_operations_reject_ed25519() {
        let digest = [7u8; 32];
        assert!(matches!(
            sign_digest(&ed_key(), &digest),
            Err(CryptoError::InvalidKey(_))
        ));
        let sig = Signature::new(vec![0u8; 64], KeyType::Ed25519);
        assert!(matches!(
            verify_digest(&ed_key().public_key(), &digest, &sig, Canonicality::Strict),
            Err(CryptoError::InvalidKey(_))
        ));
    }

    /// A byte inside the scalars of a signature. For DER this skips the
    /// framing and the leading byte of r and s so the encoding stays valid.
    fn signature_payload_index(sig: &[u8], ed25519: bool, pick: usize) -> usize {
        if ed25519 {
            return pick % sig.len();
        }
        let r_len = sig[3] as usize;
        let s_start = 4 + r_len + 2;
        let mut positions: Vec<usize> = (5..4 + r_len).collect();
        positions.extend(s_start + 1..sig.len());
        positions[pick % positions.len()]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_sign_verify_and_tamper(
            data in proptest::collection::vec(any::<u8>(), 1..256),
            flip in any::<usize>(),
            use_ed in any::<bool>()
        ) {
            let key = if use_ed { ed_key() } else { ec_key() };
            let public = key.public_key();
            let sig = sign(&key, &data).unwrap();
            prop_assert!(verify(&public, &data, &sig).unwrap());

            let mut tampered = data.clone();
            let i = flip % tampered.len();
            tampered[i] ^= 0x01;
            prop_assert!(!verify(&public, &tampered, &sig).unwrap());

            let mut bad_sig = sig.as_bytes().to_vec();
            let i = signature_payload_index(&bad_sig, use_ed, flip);
            bad_sig[i] ^= 0x01;
            let bad_sig = Signature::new(bad_sig, key.key_type());
            prop_assert_eq!(verify(&public, &data, &bad_sig), Ok(false));
        }
    }
}
