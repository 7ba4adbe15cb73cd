//! Account identifiers and base58-check encoding.
//!
//! XRPL text encodings are `base58(version || payload || checksum)` where the
//! checksum is the first four bytes of `SHA256(SHA256(version || payload))`
//! and the alphabet is the XRPL permutation (starts with `rpshnaf39w`), not
//! Bitcoin's. Decoding with the wrong alphabet does not fail, it silently
//! yields different bytes, so the alphabet is fixed here and nowhere else.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::error::{CoreError, Result};
use crate::types::AccountId;

/// Version byte of classic `r...` addresses.
pub const CLASSIC_ADDRESS_VERSION: &[u8] = &[0x00];

/// Version byte of base58 account public keys (`a...`).
pub const ACCOUNT_PUBLIC_KEY_VERSION: &[u8] = &[0x23];

/// Version byte of base58 node public keys (`n...`).
pub const NODE_PUBLIC_KEY_VERSION: &[u8] = &[0x1C];

/// Version byte of secp256k1 family seeds (`s...`).
pub const FAMILY_SEED_VERSION: &[u8] = &[0x21];

/// Version prefix of ed25519 seeds (`sEd...`).
pub const ED25519_SEED_VERSION: &[u8] = &[0x01, 0xE1, 0x4B];

const CHECKSUM_LEN: usize = 4;
const PUBLIC_KEY_LEN: usize = 33;
const SEED_LEN: usize = 16;

/// Which algorithm a base58 seed was tagged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedKind {
    Secp256k1,
    Ed25519,
}

/// Derive an account id: `RIPEMD160(SHA256(public_key))`.
pub fn derive_account_id(public_key: &[u8]) -> AccountId {
    let sha = Sha256::digest(public_key);
    let ripe = Ripemd160::digest(sha);
    AccountId(ripe.into())
}

/// Encode `version || payload || checksum` with the XRPL alphabet.
pub fn encode_base58_check(payload: &[u8], version: &[u8]) -> String {
    let mut buf = Vec::with_capacity(version.len() + payload.len() + CHECKSUM_LEN);
    buf.extend_from_slice(version);
    buf.extend_from_slice(payload);
    let checksum = checksum(&buf);
    buf.extend_from_slice(&checksum);

    bs58::encode(buf)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .into_string()
}

/// Decode a base58-check string whose version prefix is `version_len` bytes.
///
/// Returns `(version, payload)`.
pub fn decode_base58_check(text: &str, version_len: usize) -> Result<(Vec<u8>, Vec<u8>)> {
    let mut decoded = bs58::decode(text)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .into_vec()
        .map_err(|e| map_bs58_error(text, e))?;

    if decoded.len() < version_len + CHECKSUM_LEN {
        return Err(CoreError::InvalidPayloadLength {
            expected: version_len + CHECKSUM_LEN,
            actual: decoded.len(),
        });
    }

    let check = decoded.split_off(decoded.len() - CHECKSUM_LEN);
    if checksum(&decoded) != check.as_slice() {
        return Err(CoreError::ChecksumMismatch);
    }

    let payload = decoded.split_off(version_len);
    Ok((decoded, payload))
}

/// Decode and require a specific version prefix and payload length.
pub fn decode_versioned(text: &str, version: &[u8], payload_len: usize) -> Result<Vec<u8>> {
    let (found, payload) = decode_base58_check(text, version.len())?;
    if found != version {
        return Err(CoreError::InvalidVersion(hex::encode_upper(&found)));
    }
    if payload.len() != payload_len {
        return Err(CoreError::InvalidPayloadLength {
            expected: payload_len,
            actual: payload.len(),
        });
    }
    Ok(payload)
}

/// Encode an account id as a classic address.
pub fn encode_classic_address(account: &AccountId) -> String {
    encode_base58_check(account.as_bytes(), CLASSIC_ADDRESS_VERSION)
}

/// Decode a classic address into an account id.
pub fn decode_classic_address(text: &str) -> Result<AccountId> {
    let payload = decode_versioned(text, CLASSIC_ADDRESS_VERSION, 20)?;
    AccountId::try_from(payload.as_slice())
}

/// Whether `text` is a well-formed classic address.
pub fn is_valid_classic_address(text: &str) -> bool {
    decode_classic_address(text).is_ok()
}

/// Encode a 33-byte account public key (`a...`).
pub fn encode_account_public_key(public_key: &[u8]) -> Result<String> {
    check_public_key_len(public_key)?;
    Ok(encode_base58_check(public_key, ACCOUNT_PUBLIC_KEY_VERSION))
}

/// Decode a base58 account public key.
pub fn decode_account_public_key(text: &str) -> Result<Vec<u8>> {
    decode_versioned(text, ACCOUNT_PUBLIC_KEY_VERSION, PUBLIC_KEY_LEN)
}

/// Encode a 33-byte node public key (`n...`).
pub fn encode_node_public_key(public_key: &[u8]) -> Result<String> {
    check_public_key_len(public_key)?;
    Ok(encode_base58_check(public_key, NODE_PUBLIC_KEY_VERSION))
}

/// Decode a base58 node public key.
pub fn decode_node_public_key(text: &str) -> Result<Vec<u8>> {
    decode_versioned(text, NODE_PUBLIC_KEY_VERSION, PUBLIC_KEY_LEN)
}

/// Encode 16 bytes of seed entropy.
pub fn encode_seed(entropy: &[u8; 16], kind: SeedKind) -> String {
    let version = match kind {
        SeedKind::Secp256k1 => FAMILY_SEED_VERSION,
        SeedKind::Ed25519 => ED25519_SEED_VERSION,
    };
    encode_base58_check(entropy, version)
}

/// Decode a seed, detecting its algorithm from the version prefix.
pub fn decode_seed(text: &str) -> Result<([u8; 16], SeedKind)> {
    let (payload, kind) = match decode_versioned(text, ED25519_SEED_VERSION, SEED_LEN) {
        Ok(payload) => (payload, SeedKind::Ed25519),
        Err(CoreError::InvalidVersion(_)) | Err(CoreError::InvalidPayloadLength { .. }) => (
            decode_versioned(text, FAMILY_SEED_VERSION, SEED_LEN)?,
            SeedKind::Secp256k1,
        ),
        Err(e) => return Err(e),
    };
    let mut entropy = [0u8; 16];
    entropy.copy_from_slice(&payload);
    Ok((entropy, kind))
}

fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::digest(Sha256::digest(data));
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

fn check_public_key_len(public_key: &[u8]) -> Result<()> {
    if public_key.len() != PUBLIC_KEY_LEN {
        return Err(CoreError::InvalidPayloadLength {
            expected: PUBLIC_KEY_LEN,
            actual: public_key.len(),
        });
    }
    Ok(())
}

fn map_bs58_error(text: &str, err: bs58::decode::Error) -> CoreError {
    match err {
        bs58::decode::Error::InvalidCharacter { character, index } => {
            CoreError::InvalidAlphabet { character, index }
        }
        bs58::decode::Error::NonAsciiCharacter { index } => CoreError::InvalidAlphabet {
            character: text
                .get(index..)
                .and_then(|rest| rest.chars().next())
                .unwrap_or('\u{fffd}'),
            index,
        },
        other => CoreError::InvalidValue(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_special_addresses() {
        assert_eq!(
            encode_classic_address(&AccountId::ZERO),
            "rrrrrrrrrrrrrrrrrrrrrhoLvTp"
        );
        let mut one = [0u8; 20];
        one[19] = 1;
        assert_eq!(
            encode_classic_address(&AccountId(one)),
            "rrrrrrrrrrrrrrrrrrrrBZbvji"
        );
    }

    #[test]
    fn test_decode_known_address() {
        let account = decode_classic_address("rf56THCDKWb348ks9hvaD4YXq6U1qBJNsJ").unwrap();
        assert_eq!(account.to_hex(), "49B393EA0E0A95A288BBFDAFB08427DF2B885D2F");
    }

    #[test]
    fn test_derive_account_id_from_public_key() {
        let pk = hex::decode("ED79B5562E8FE654F94078B112E8A98BA7901F853AE695BED7E0E3910BAD049664")
            .unwrap();
        let account = derive_account_id(&pk);
        assert_eq!(account.to_hex(), "AE12A8914E1EB294C2D98DD68034FB76B31017B6");
        assert_eq!(account.to_address(), "rG1Qv8ug3DCe3NTGgroUXsbCJBJvrJh4qY");
    }

    #[test]
    fn test_base58_check_roundtrip_with_version() {
        let payload = [0x5a; 20];
        let text = encode_base58_check(&payload, &[0x23]);
        let (version, decoded) = decode_base58_check(&text, 1).unwrap();
        assert_eq!(version, vec![0x23]);
        assert_eq!(decoded, payload.to_vec());
    }

    #[test]
    fn test_corrupted_checksum_is_detected() {
        let text = "rf56THCDKWb348ks9hvaD4YXq6U1qBJNsJ";
        // Swap one character for another alphabet member.
        let corrupted = text.replacen('J', "K", 1);
        assert_eq!(
            decode_classic_address(&corrupted),
            Err(CoreError::ChecksumMismatch)
        );
    }

    #[test]
    fn test_invalid_alphabet_is_rejected() {
        // '0' is not part of the XRPL alphabet.
        let err = decode_classic_address("rf56THCDKWb348ks9hvaD4YXq6U1qBJNs0").unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidAlphabet { character: '0', .. }
        ));
    }

    #[test]
    fn test_wrong_version_is_rejected() {
        let text = encode_base58_check(&[0u8; 20], &[0x23]);
        assert!(matches!(
            decode_classic_address(&text),
            Err(CoreError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_account_public_key_encoding() {
        let pk = hex::decode("03867698C8917C53C16BD7F77ED96A43757DA51EF5BDEE51E7D48353714CFBCC19")
            .unwrap();
        let text = encode_account_public_key(&pk).unwrap();
        assert_eq!(text, "aBQvTixudeehq3pjxW4hvrJbKx2gb2pxTCaAikbfwBx6wWRSak8S");
        assert_eq!(decode_account_public_key(&text).unwrap(), pk);
        assert!(encode_account_public_key(&pk[..32]).is_err());
    }

    #[test]
    fn test_seed_encoding_detects_kind() {
        let entropy: [u8; 16] = core::array::from_fn(|i| i as u8);

        let ed = encode_seed(&entropy, SeedKind::Ed25519);
        assert_eq!(ed, "sEdSJHdnVumf99WfaHTnU8DaQkx5Q4n");
        assert_eq!(decode_seed(&ed).unwrap(), (entropy, SeedKind::Ed25519));

        let secp = encode_seed(&entropy, SeedKind::Secp256k1);
        assert_eq!(secp, "sp6JdwovBCsiwnMhXuvZGZtPUoGVj");
        assert_eq!(decode_seed(&secp).unwrap(), (entropy, SeedKind::Secp256k1));
    }

    #[test]
    fn test_short_input_is_rejected() {
        assert!(matches!(
            decode_base58_check("rr", 1),
            Err(CoreError::InvalidPayloadLength { .. })
        ));
    }
}
