//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the address codec, amount packing, the canonical
//! encoding and the claim signatures so that every implementation produces
//! identical bytes.

use std::fmt;

use serde::{Deserialize, Serialize};

use xrpl_engine_core::address::{encode_account_public_key, encode_seed, SeedKind};
use xrpl_engine_core::{encode, AccountId, Hash256, IssuedValue};
use xrpl_engine_crypto::{sign, KeyType, PrivateKey};

use crate::fixtures::{reference_payment, ED25519_SECRET, SECP256K1_SECRET};

/// A golden test vector.
#[derive(Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Input, usually hex.
    pub input: &'static str,
    /// Expected output.
    pub expected: &'static str,
    /// Computes the output from the input.
    pub compute: fn(&str) -> String,
}

impl fmt::Debug for GoldenVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoldenVector")
            .field("name", &self.name)
            .field("input", &self.input)
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}

impl GoldenVector {
    pub fn run(&self) -> String {
        (self.compute)(self.input)
    }

    pub fn passes(&self) -> bool {
        self.run() == self.expected
    }
}

const CLAIM_CHANNEL: &str = "5DB01B7FFED6B67E6B0414DED11E051D2EE2B7619CE0EAA6286D67A3A4D5BDB3";
const CLAIM_DROPS: u64 = 1_000_000;

fn account_address(input: &str) -> String {
    decode_fixed::<20>(input)
        .map(|bytes| AccountId(bytes).to_address())
        .unwrap_or_else(|e| e)
}

fn public_key_address(input: &str) -> String {
    decode_hex(input)
        .map(|bytes| AccountId::from_public_key(&bytes).to_address())
        .unwrap_or_else(|e| e)
}

fn public_key_base58(input: &str) -> String {
    decode_hex(input)
        .and_then(|bytes| encode_account_public_key(&bytes).map_err(failure))
        .unwrap_or_else(|e| e)
}

fn seed(input: &str, kind: SeedKind) -> String {
    decode_fixed::<16>(input)
        .map(|entropy| encode_seed(&entropy, kind))
        .unwrap_or_else(|e| e)
}

fn issued_bits(input: &str) -> String {
    input
        .parse::<IssuedValue>()
        .map(|v| format!("{:016X}", v.to_bits()))
        .unwrap_or_else(failure)
}

fn reference_encoding(_: &str) -> String {
    encode(&reference_payment())
        .map(|b| b.to_hex())
        .unwrap_or_else(failure)
}

fn claim_signature(secret: [u8; 32], key_type: KeyType) -> String {
    let channel = match Hash256::from_hex(CLAIM_CHANNEL) {
        Ok(channel) => channel,
        Err(e) => return failure(e),
    };
    let data = xrpl_engine_core::claim_signing_data(&channel, CLAIM_DROPS);
    PrivateKey::from_slice(&secret, key_type)
        .and_then(|key| sign(&key, &data))
        .map(|sig| sig.to_hex())
        .unwrap_or_else(failure)
}

/// Failure text that can never equal an expected output.
fn failure(e: impl fmt::Display) -> String {
    format!("error: {}", e)
}

fn decode_hex(input: &str) -> Result<Vec<u8>, String> {
    hex::decode(input).map_err(failure)
}

fn decode_fixed<const N: usize>(input: &str) -> Result<[u8; N], String> {
    let bytes = decode_hex(input)?;
    <[u8; N]>::try_from(bytes.as_slice())
        .map_err(|_| failure(format!("expected {} bytes, got {}", N, bytes.len())))
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "account zero",
            input: "0000000000000000000000000000000000000000",
            expected: "rrrrrrrrrrrrrrrrrrrrrhoLvTp",
            compute: account_address,
        },
        GoldenVector {
            name: "account one",
            input: "0000000000000000000000000000000000000001",
            expected: "rrrrrrrrrrrrrrrrrrrrBZbvji",
            compute: account_address,
        },
        GoldenVector {
            name: "ed25519 public key to address",
            input: "ED79B5562E8FE654F94078B112E8A98BA7901F853AE695BED7E0E3910BAD049664",
            expected: "rG1Qv8ug3DCe3NTGgroUXsbCJBJvrJh4qY",
            compute: public_key_address,
        },
        GoldenVector {
            name: "secp256k1 public key to address",
            input: "03867698C8917C53C16BD7F77ED96A43757DA51EF5BDEE51E7D48353714CFBCC19",
            expected: "r98gzdPU6ikuoLMpnWTwPUv7sCRZoyDDP6",
            compute: public_key_address,
        },
        GoldenVector {
            name: "account public key base58",
            input: "03867698C8917C53C16BD7F77ED96A43757DA51EF5BDEE51E7D48353714CFBCC19",
            expected: "aBQvTixudeehq3pjxW4hvrJbKx2gb2pxTCaAikbfwBx6wWRSak8S",
            compute: public_key_base58,
        },
        GoldenVector {
            name: "ed25519 family seed",
            input: "000102030405060708090A0B0C0D0E0F",
            expected: "sEdSJHdnVumf99WfaHTnU8DaQkx5Q4n",
            compute: |input| seed(input, SeedKind::Ed25519),
        },
        GoldenVector {
            name: "secp256k1 family seed",
            input: "000102030405060708090A0B0C0D0E0F",
            expected: "sp6JdwovBCsiwnMhXuvZGZtPUoGVj",
            compute: |input| seed(input, SeedKind::Secp256k1),
        },
        GoldenVector {
            name: "issued amount one",
            input: "1",
            expected: "D4838D7EA4C68000",
            compute: issued_bits,
        },
        GoldenVector {
            name: "issued amount minus one",
            input: "-1",
            expected: "94838D7EA4C68000",
            compute: issued_bits,
        },
        GoldenVector {
            name: "reference payment encoding",
            input: "",
            expected: "1200002280000000240494534E2E0005AD0161400000000000000168400000000000006481\
                       1449B393EA0E0A95A288BBFDAFB08427DF2B885D2F83148643C4C7F4AB4C98357B38DF4C\
                       562045607AB63F",
            compute: reference_encoding,
        },
        GoldenVector {
            name: "ed25519 claim signature",
            input: CLAIM_CHANNEL,
            expected: "89A2AFC4F0CD238A9CEE16E770C2F0A64FEB69B7EA972142D8D1B39F109C48A8\
                       24EE6B5B09E7ABAAC354930DA62DFB1D7660D2E239EF4E05D5435ADF7CC38003",
            compute: |_| claim_signature(ED25519_SECRET, KeyType::Ed25519),
        },
        GoldenVector {
            name: "secp256k1 claim signature",
            input: CLAIM_CHANNEL,
            expected: "304402204372AB9DC7C2A28871CE6115D4D39F71BEE420B4DE705E8B1BF16C0E948D7D47\
                       0220173E030A6702A8395BCC58FD5A2D43BC419A07DFF80654C78BD05ED78973C84D",
            compute: |_| claim_signature(SECP256K1_SECRET, KeyType::Secp256k1),
        },
    ]
}

/// Run every golden vector.
///
/// Returns `(name, matches, computed)` for each vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let computed = v.run();
            (v.name.to_string(), computed == v.expected, computed)
        })
        .collect()
}

/// A vector's data without its computation, for other implementations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub name: String,
    pub input: String,
    pub expected: String,
}

impl From<&GoldenVector> for VectorRecord {
    fn from(v: &GoldenVector) -> Self {
        Self {
            name: v.name.to_string(),
            input: v.input.to_string(),
            expected: v.expected.to_string(),
        }
    }
}

/// All vectors as pretty-printed JSON.
pub fn export_vectors_json() -> serde_json::Result<String> {
    let records: Vec<VectorRecord> = all_vectors().iter().map(VectorRecord::from).collect();
    serde_json::to_string_pretty(&records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_pass() {
        for (name, matches, computed) in verify_all_vectors() {
            assert!(matches, "Vector '{}' computed {}", name, computed);
        }
    }

    #[test]
    fn test_vectors_are_deterministic() {
        for vector in all_vectors() {
            assert_eq!(
                vector.run(),
                vector.run(),
                "Vector '{}' produced different output on rerun",
                vector.name
            );
        }
    }

    #[test]
    fn test_vector_names_unique() {
        let mut names: Vec<_> = all_vectors().iter().map(|v| v.name).collect();
        names.sort();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn test_bad_inputs_report_errors() {
        let short = account_address("0001");
        assert!(short.starts_with("error: expected 20 bytes"), "{}", short);
        assert!(seed("00", SeedKind::Ed25519).starts_with("error: expected 16 bytes"));
        assert!(public_key_address("zz").starts_with("error:"));
        assert!(public_key_base58("ED00").starts_with("error:"));
        assert!(issued_bits("1e200").starts_with("error:"));

        let vector = GoldenVector {
            name: "truncated account",
            input: "00",
            expected: "rrrrrrrrrrrrrrrrrrrrrhoLvTp",
            compute: account_address,
        };
        assert!(!vector.passes());
    }

    #[test]
    fn test_json_export() {
        let json = export_vectors_json().unwrap();
        let records: Vec<VectorRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(records.len(), all_vectors().len());
        assert_eq!(records[0].expected, "rrrrrrrrrrrrrrrrrrrrrhoLvTp");
    }
}
