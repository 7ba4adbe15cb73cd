//! Golden signing vectors.
//!
//! Every implementation of the engine must produce identical:
//! - unsigned encoding
//! - single-signing hash
//! - signature (ed25519 and RFC 6979 secp256k1 are both deterministic)
//! - signed blob
//! - transaction id
//!
//! The payment below is a fixed 1-drop payment between two fixed accounts.
//! Its signer keys are test keys, never funded on any network.

use std::sync::Once;

use serde::{Deserialize, Serialize};
use xrpl_engine::core::{
    decode, encode, single_signing_hash, AccountId, Amount, FieldValue, TF_FULLY_CANONICAL_SIG,
};
use xrpl_engine::{
    add_signature, Engine, EngineConfig, EngineError, KeyType, MultiSignatureSet, PrivateKey,
    SerializableObject, Signature, SignerList,
};

const ED_SEED: &str = "0102030405060708090A0B0C0D0E0F101112131415161718191A1B1C1D1E1F20";
const EC_SECRET: &str = "1A2B3C4D5E6F708192A3B4C5D6E7F8091A2B3C4D5E6F708192A3B4C5D6E7F809";

const SENDER: &str = "rf56THCDKWb348ks9hvaD4YXq6U1qBJNsJ";
const DESTINATION: &str = "rDNvjMc6LjtpR7BdfiSNvavUBjznhhmpNq";

const UNSIGNED: &str = "1200002280000000240494534E2E0005AD0161400000000000000168400000000000006481\
                        1449B393EA0E0A95A288BBFDAFB08427DF2B885D2F83148643C4C7F4AB4C98357B38DF4C\
                        562045607AB63F";

/// A single-sign golden vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenVector {
    pub name: String,
    pub key_type: KeyType,
    pub secret: String,

    // Derived outputs (upper-case hex)
    pub public_key: String,
    pub signing_hash: String,
    pub signature: String,
    pub signed_blob: String,
    pub tx_hash: String,
    /// Id of the same transaction carrying an empty `TxnSignature`.
    pub empty_signature_hash: String,
}

fn vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "ed25519_payment".into(),
            key_type: KeyType::Ed25519,
            secret: ED_SEED.into(),
            public_key: "ED79B5562E8FE654F94078B112E8A98BA7901F853AE695BED7E0E3910BAD049664".into(),
            signing_hash: "0E7D12B69EF15AE579914C042ABEAA6383B3064D4F34267944D24B369636EC14".into(),
            signature: "1254DBB58D8D59DE15A7BCBC12B019B9FC6AAE19778C99C8D346BACF6D91BF2F\
                        498098FC915969D58AE9482886184F7FF9B4001BC33A435E4230A9E60C3C4803"
                .into(),
            signed_blob: "1200002280000000240494534E2E0005AD01614000000000000001684000000000000064\
                          7321ED79B5562E8FE654F94078B112E8A98BA7901F853AE695BED7E0E3910BAD049664\
                          74401254DBB58D8D59DE15A7BCBC12B019B9FC6AAE19778C99C8D346BACF6D91BF2F\
                          498098FC915969D58AE9482886184F7FF9B4001BC33A435E4230A9E60C3C4803\
                          811449B393EA0E0A95A288BBFDAFB08427DF2B885D2F83148643C4C7F4AB4C98357B38\
                          DF4C562045607AB63F"
                .into(),
            tx_hash: "D9A13432193E805EF28F8A8387B436B6FA576C9A6E88204AE8D7F5210ECA0EE5".into(),
            empty_signature_hash:
                "FD12AE8563407AB81C54BB8F1CE22D65985D0DFC10D4655615645E4FABA23A9F".into(),
        },
        GoldenVector {
            name: "secp256k1_payment".into(),
            key_type: KeyType::Secp256k1,
            secret: EC_SECRET.into(),
            public_key: "03867698C8917C53C16BD7F77ED96A43757DA51EF5BDEE51E7D48353714CFBCC19".into(),
            signing_hash: "904B69F9B24A860EA57D7FFF1E952C9A4B3127D43B7535B7D10E7F7A47EF8DD8".into(),
            signature: "304402200C6D9A3C002EF3B0F082E1C2337CBDC096CF98661578FBC3F2A3BAE3AE61E013\
                        022070CDACE7A3262A51994DB03E6D3621A5E9CB89CC01F420FBAFBD6603AFEDA617"
                .into(),
            signed_blob: "1200002280000000240494534E2E0005AD01614000000000000001684000000000000064\
                          732103867698C8917C53C16BD7F77ED96A43757DA51EF5BDEE51E7D48353714CFBCC19\
                          7446304402200C6D9A3C002EF3B0F082E1C2337CBDC096CF98661578FBC3F2A3BAE3AE\
                          61E013022070CDACE7A3262A51994DB03E6D3621A5E9CB89CC01F420FBAFBD6603AFED\
                          A617811449B393EA0E0A95A288BBFDAFB08427DF2B885D2F83148643C4C7F4AB4C9835\
                          7B38DF4C562045607AB63F"
                .into(),
            tx_hash: "34422DE563B10D2F94CFD0A3B11DB565A95C639E8A83E8BB6FF8A49507CC1460".into(),
            empty_signature_hash:
                "7012BE0532376FCF813210F7810AA93AEDB7A71A774C0A3F67D615596ED3AFC2".into(),
        },
    ]
}

const MULTI_SIGNED: &str = "1200002280000000240494534E2E0005AD01614000000000000001684000000000000064\
    7300811449B393EA0E0A95A288BBFDAFB08427DF2B885D2F83148643C4C7F4AB4C98357B38DF4C562045607AB63F\
    F3E010732103867698C8917C53C16BD7F77ED96A43757DA51EF5BDEE51E7D48353714CFBCC19744630440220\
    65A8D46FADFD5BFF4788F28570EB3F8206269E7E6E916B7720F0CBB774FB46D2022024D6ED0A4575CB4EFC97\
    28DCBE720165AB8AE9019E2CBA9178DBC9962471A75A811460651C08856A2F74BFEC5A9ADA3048EED813B62E\
    E1E0107321ED79B5562E8FE654F94078B112E8A98BA7901F853AE695BED7E0E3910BAD04966474405A4793A2\
    DE0225FAE837D0301C3282C21E5FB630B669A293CB87A383C9F576FAF3322549153ABA8B1A928C0168EEFCDB\
    1265C9B7C63A18BEA007BADCDF1858028114AE12A8914E1EB294C2D98DD68034FB76B31017B6E1F1";
const MULTI_TX_HASH: &str = "E645222384E9A5AA6D824D502DAF2688589DF1B5262DDC5F5043C5C395F853EB";

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn payment() -> SerializableObject {
    SerializableObject::new()
        .with("TransactionType", 0u16)
        .with("Flags", TF_FULLY_CANONICAL_SIG)
        .with("Sequence", 76_829_518u32)
        .with("DestinationTag", 371_969u32)
        .with("Amount", Amount::drops(1))
        .with("Fee", Amount::drops(100))
        .with("Account", AccountId::from_address(SENDER).unwrap())
        .with("Destination", AccountId::from_address(DESTINATION).unwrap())
}

fn key(vector: &GoldenVector) -> PrivateKey {
    PrivateKey::from_hex(&vector.secret, vector.key_type).unwrap()
}

fn ed_key() -> PrivateKey {
    PrivateKey::from_hex(ED_SEED, KeyType::Ed25519).unwrap()
}

fn ec_key() -> PrivateKey {
    PrivateKey::from_hex(EC_SECRET, KeyType::Secp256k1).unwrap()
}

#[test]
fn test_unsigned_encoding() {
    assert_eq!(encode(&payment()).unwrap().to_hex(), UNSIGNED);
}

#[test]
fn test_vectors_verify() {
    init_tracing();
    let engine = Engine::default();

    for vector in vectors() {
        let key = key(&vector);
        assert_eq!(key.public_key().to_hex(), vector.public_key, "{}", vector.name);

        let signed = engine.sign_single(&key, &payment()).unwrap();

        let mut unsigned = payment();
        unsigned.insert("SigningPubKey", key.public_key().as_bytes().to_vec());
        let unsigned_bytes = encode(&unsigned).unwrap();
        assert_eq!(
            single_signing_hash(unsigned_bytes.as_slice()).to_hex(),
            vector.signing_hash,
            "{}",
            vector.name
        );

        assert_eq!(
            hex::encode_upper(signed.signature().unwrap()),
            vector.signature,
            "{}",
            vector.name
        );
        assert_eq!(signed.to_hex(), vector.signed_blob, "{}", vector.name);
        assert_eq!(signed.hash().to_hex(), vector.tx_hash, "{}", vector.name);
        assert!(engine.verify_single(&key.public_key(), &signed).unwrap());
    }
}

#[test]
fn test_vectors_deterministic() {
    let first: Vec<_> = vectors()
        .iter()
        .map(|v| xrpl_engine::sign_single(&key(v), &payment()).unwrap())
        .collect();
    let second: Vec<_> = vectors()
        .iter()
        .map(|v| xrpl_engine::sign_single(&key(v), &payment()).unwrap())
        .collect();
    assert_eq!(first, second);
}

#[test]
fn test_insertion_order_does_not_matter() {
    let key = ed_key();
    let reversed = payment()
        .iter()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .fold(SerializableObject::new(), |obj, (name, value)| {
            obj.with(name, value.clone())
        });
    let a = xrpl_engine::sign_single(&key, &payment()).unwrap();
    let b = xrpl_engine::sign_single(&key, &reversed).unwrap();
    assert_eq!(a.to_hex(), b.to_hex());
    assert_eq!(a.hash(), b.hash());
}

#[test]
fn test_empty_signature_changes_hash() {
    for vector in vectors() {
        let key = key(&vector);
        let empty = Signature::new(Vec::<u8>::new(), vector.key_type);
        let signed = add_signature(&payment(), &key.public_key(), &empty).unwrap();

        assert_eq!(signed.hash().to_hex(), vector.empty_signature_hash, "{}", vector.name);
        assert_ne!(signed.hash().to_hex(), vector.tx_hash);
        assert!(signed.to_hex().contains("7400"));
    }
}

#[test]
fn test_signed_blob_decodes_to_same_fields() {
    let engine = Engine::default();
    for vector in vectors() {
        let blob = hex::decode(&vector.signed_blob).unwrap();
        let loaded = engine.decode_signed(&blob).unwrap();

        assert_eq!(loaded.hash().to_hex(), vector.tx_hash);
        assert!(engine
            .verify_single(&key(&vector).public_key(), &loaded)
            .unwrap());

        let signed = engine.sign_single(&key(&vector), &payment()).unwrap();
        assert_eq!(loaded.object(), signed.object());
    }
}

#[test]
fn test_multi_signed_vector() {
    init_tracing();
    let engine = Engine::default();

    let set: MultiSignatureSet = [ed_key(), ec_key()]
        .iter()
        .map(|k| engine.sign_multi(k, &payment()).unwrap())
        .collect();
    let signed = engine.add_multi_signatures(&payment(), &set).unwrap();

    assert_eq!(signed.to_hex(), MULTI_SIGNED);
    assert_eq!(signed.hash().to_hex(), MULTI_TX_HASH);

    // Signers come out sorted by account id, EC account first.
    let signers = signed.object().get_array("Signers").unwrap();
    let first = signers[0].unwrap_element().unwrap().1;
    assert_eq!(first.get_account("Account"), Some(ec_key().account_id()));
}

#[test]
fn test_multi_signed_blob_verifies() {
    let engine = Engine::default();
    let blob = hex::decode(MULTI_SIGNED).unwrap();
    let loaded = engine.decode_signed(&blob).unwrap();
    let set = MultiSignatureSet::from_transaction(loaded.object()).unwrap();
    assert_eq!(set.len(), 2);

    let list = SignerList::new()
        .with_signer(ed_key().account_id(), 1)
        .with_signer(ec_key().account_id(), 1)
        .with_quorum(2);
    assert!(engine.verify_multi_signed(&loaded, &list).unwrap());
}

#[test]
fn test_multi_signing_ignores_prior_signature() {
    // Single-signing fields present on the input never reach multi-signers.
    let engine = Engine::default();
    let single = engine.sign_single(&ed_key(), &payment()).unwrap();

    let from_single = engine.sign_multi(&ec_key(), &single).unwrap();
    let from_plain = engine.sign_multi(&ec_key(), &payment()).unwrap();
    assert_eq!(from_single.signature, from_plain.signature);
}

#[test]
fn test_weighted_quorum() {
    init_tracing();
    let engine = Engine::default();

    let a = ed_key();
    let b = ec_key();
    let c = PrivateKey::from_slice(&[0x33; 32], KeyType::Ed25519).unwrap();
    let weights = SignerList::new()
        .with_signer(a.account_id(), 2)
        .with_signer(b.account_id(), 1)
        .with_signer(c.account_id(), 1);

    let sig_a = engine.sign_multi(&a, &payment()).unwrap();
    let sig_b = engine.sign_multi(&b, &payment()).unwrap();
    let mut sig_c = engine.sign_multi(&c, &payment()).unwrap();

    let a_and_b = MultiSignatureSet::new().with(sig_a.clone()).with(sig_b);
    assert!(engine.verify_multi(&a_and_b, &payment(), &weights, 3).unwrap());

    let a_alone = MultiSignatureSet::new().with(sig_a.clone());
    assert!(!engine.verify_multi(&a_alone, &payment(), &weights, 3).unwrap());

    // An invalid signature from C contributes nothing.
    let mut bytes = sig_c.signature.clone().into_bytes();
    bytes[0] ^= 0xFF;
    sig_c.signature = Signature::new(bytes, KeyType::Ed25519);
    let a_and_bad_c = MultiSignatureSet::new().with(sig_a).with(sig_c);
    assert!(!engine.verify_multi(&a_and_bad_c, &payment(), &weights, 3).unwrap());

    assert!(matches!(
        engine.verify_multi(&a_and_b, &payment(), &weights, 0),
        Err(EngineError::IllegalArgument(_))
    ));
}

#[test]
fn test_unlisted_signer_contributes_nothing() {
    let engine = Engine::default();
    let outsider = PrivateKey::from_slice(&[0x44; 32], KeyType::Secp256k1).unwrap();
    let set = MultiSignatureSet::new().with(engine.sign_multi(&outsider, &payment()).unwrap());
    let weights = SignerList::new().with_signer(ed_key().account_id(), 1);
    assert!(!engine.verify_multi(&set, &payment(), &weights, 1).unwrap());
}

#[test]
fn test_prefixes_separate_single_and_multi() {
    // A single signature is not a valid multi-signature for the same key.
    let engine = Engine::default();
    let key = ed_key();
    let single = engine.sign_single(&key, &payment()).unwrap();
    let mut forged = engine.sign_multi(&key, &payment()).unwrap();
    forged.signature = Signature::new(single.signature().unwrap(), KeyType::Ed25519);

    let weights = SignerList::new().with_signer(key.account_id(), 1);
    let set = MultiSignatureSet::new().with(forged);
    assert!(!engine.verify_multi(&set, &payment(), &weights, 1).unwrap());
}

#[test]
fn test_lenient_engine_accepts_canonical_signatures() {
    let engine = Engine::new(EngineConfig {
        require_fully_canonical: false,
        verify_after_sign: true,
        ..EngineConfig::default()
    });
    let blob = hex::decode(&vectors()[1].signed_blob).unwrap();
    let loaded = engine.decode_signed(&blob).unwrap();
    assert!(engine.verify_single(&ec_key().public_key(), &loaded).unwrap());
}

#[test]
fn test_decoded_fields_are_typed() {
    let obj = decode(&hex::decode(UNSIGNED).unwrap()).unwrap();
    assert_eq!(obj.get("Sequence"), Some(&FieldValue::UInt32(76_829_518)));
    assert_eq!(obj.get("Amount"), Some(&FieldValue::Amount(Amount::drops(1))));
    assert_eq!(obj, payment());
}
