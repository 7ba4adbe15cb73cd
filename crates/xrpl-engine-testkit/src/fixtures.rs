//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use rand::Rng;

use xrpl_engine::{MultiSignatureSet, SignedTransaction, SignerList, SignerSignature};
use xrpl_engine_core::{AccountId, Amount, SerializableObject, TF_FULLY_CANONICAL_SIG};
use xrpl_engine_crypto::{KeyType, PrivateKey, PublicKey};

/// Secret of the reference ed25519 wallet.
pub const ED25519_SECRET: [u8; 32] = [
    0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10,
    0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x1B, 0x1C, 0x1D, 0x1E, 0x1F, 0x20,
];

/// Secret of the reference secp256k1 wallet.
pub const SECP256K1_SECRET: [u8; 32] = [
    0x1A, 0x2B, 0x3C, 0x4D, 0x5E, 0x6F, 0x70, 0x81, 0x92, 0xA3, 0xB4, 0xC5, 0xD6, 0xE7, 0xF8, 0x09,
    0x1A, 0x2B, 0x3C, 0x4D, 0x5E, 0x6F, 0x70, 0x81, 0x92, 0xA3, 0xB4, 0xC5, 0xD6, 0xE7, 0xF8, 0x09,
];

/// Sender of the reference payment.
pub const REFERENCE_SENDER: &str = "rf56THCDKWb348ks9hvaD4YXq6U1qBJNsJ";
/// Destination of the reference payment.
pub const REFERENCE_DESTINATION: &str = "rDNvjMc6LjtpR7BdfiSNvavUBjznhhmpNq";

/// A test wallet: one private key and the account it controls.
#[derive(Debug, Clone)]
pub struct TestWallet {
    pub key: PrivateKey,
}

impl TestWallet {
    /// Create a wallet with a random key.
    pub fn new(key_type: KeyType) -> Self {
        Self {
            key: PrivateKey::generate(key_type),
        }
    }

    /// Create with a deterministic key from a 32-byte secret.
    ///
    /// Panics if the secret is not a valid secp256k1 scalar.
    pub fn with_seed(seed: [u8; 32], key_type: KeyType) -> Self {
        Self {
            key: PrivateKey::from_slice(&seed, key_type).expect("valid test secret"),
        }
    }

    /// The wallet whose signatures appear in the ed25519 golden vectors.
    pub fn reference_ed25519() -> Self {
        Self::with_seed(ED25519_SECRET, KeyType::Ed25519)
    }

    /// The wallet whose signatures appear in the secp256k1 golden vectors.
    pub fn reference_secp256k1() -> Self {
        Self::with_seed(SECP256K1_SECRET, KeyType::Secp256k1)
    }

    pub fn public_key(&self) -> PublicKey {
        self.key.public_key()
    }

    pub fn account(&self) -> AccountId {
        self.key.account_id()
    }

    pub fn address(&self) -> String {
        self.account().to_address()
    }

    /// An XRP payment from this wallet.
    pub fn payment_to(&self, destination: AccountId, drops: u64, sequence: u32) -> SerializableObject {
        SerializableObject::new()
            .with("TransactionType", 0u16)
            .with("Flags", TF_FULLY_CANONICAL_SIG)
            .with("Sequence", sequence)
            .with("Amount", Amount::drops(drops))
            .with("Fee", Amount::drops(12))
            .with("Account", self.account())
            .with("Destination", destination)
    }

    /// Single-sign with the default engine.
    pub fn sign(&self, tx: &SerializableObject) -> SignedTransaction {
        xrpl_engine::sign_single(&self.key, tx).expect("signing a well-formed fixture")
    }

    /// Produce this wallet's multi-signature.
    pub fn sign_multi(&self, tx: &SerializableObject) -> SignerSignature {
        xrpl_engine::sign_multi(&self.key, tx).expect("signing a well-formed fixture")
    }
}

/// The fixed payment used by the golden vectors.
pub fn reference_payment() -> SerializableObject {
    let account = AccountId::from_address(REFERENCE_SENDER).expect("valid address");
    let destination = AccountId::from_address(REFERENCE_DESTINATION).expect("valid address");
    SerializableObject::new()
        .with("TransactionType", 0u16)
        .with("Flags", TF_FULLY_CANONICAL_SIG)
        .with("Sequence", 76_829_518u32)
        .with("DestinationTag", 371_969u32)
        .with("Amount", Amount::drops(1))
        .with("Fee", Amount::drops(100))
        .with("Account", account)
        .with("Destination", destination)
}

/// A random account id.
pub fn random_account() -> AccountId {
    AccountId(rand::thread_rng().gen())
}

/// Create multiple deterministic wallets for multi-party tests.
///
/// Key types alternate, starting with ed25519.
pub fn multi_party_fixtures(count: usize) -> Vec<TestWallet> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = 0x10;
            seed[31] = i as u8 + 1;
            let key_type = if i % 2 == 0 {
                KeyType::Ed25519
            } else {
                KeyType::Secp256k1
            };
            TestWallet::with_seed(seed, key_type)
        })
        .collect()
}

/// A signer list giving each wallet the matching weight.
pub fn signer_list(wallets: &[TestWallet], weights: &[u16], quorum: u32) -> SignerList {
    wallets
        .iter()
        .zip(weights)
        .fold(SignerList::new(), |list, (wallet, weight)| {
            list.with_signer(wallet.account(), *weight)
        })
        .with_quorum(quorum)
}

/// Every wallet's multi-signature over `tx`.
pub fn collect_signatures(wallets: &[TestWallet], tx: &SerializableObject) -> MultiSignatureSet {
    wallets.iter().map(|w| w.sign_multi(tx)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_wallets() {
        assert_eq!(
            TestWallet::reference_ed25519().address(),
            "rG1Qv8ug3DCe3NTGgroUXsbCJBJvrJh4qY"
        );
        assert_eq!(
            TestWallet::reference_secp256k1().address(),
            "r98gzdPU6ikuoLMpnWTwPUv7sCRZoyDDP6"
        );
    }

    #[test]
    fn test_multi_party_fixtures_are_distinct() {
        let wallets = multi_party_fixtures(4);
        let mut accounts: Vec<_> = wallets.iter().map(TestWallet::account).collect();
        accounts.sort();
        accounts.dedup();
        assert_eq!(accounts.len(), 4);
        assert_eq!(wallets[0].key.key_type(), KeyType::Ed25519);
        assert_eq!(wallets[1].key.key_type(), KeyType::Secp256k1);
    }

    #[test]
    fn test_signed_payment_verifies() {
        let alice = TestWallet::new(KeyType::Ed25519);
        let bob = TestWallet::new(KeyType::Secp256k1);
        let signed = alice.sign(&alice.payment_to(bob.account(), 1_000, 7));
        assert!(xrpl_engine::verify_single(&alice.public_key(), &signed).unwrap());
        assert!(!xrpl_engine::verify_single(&bob.public_key(), &signed).unwrap());
    }

    #[test]
    fn test_three_of_five() {
        let wallets = multi_party_fixtures(5);
        let list = signer_list(&wallets, &[1; 5], 3);
        let tx = wallets[0].payment_to(random_account(), 50, 1);

        let two = collect_signatures(&wallets[..2], &tx);
        let three = collect_signatures(&wallets[..3], &tx);
        let quorum = list.quorum().unwrap();
        assert!(!xrpl_engine::verify_multi(&two, &tx, &list, quorum).unwrap());
        assert!(xrpl_engine::verify_multi(&three, &tx, &list, quorum).unwrap());

        let signed = xrpl_engine::add_multi_signatures(&tx, &three).unwrap();
        let engine = xrpl_engine::Engine::default();
        assert!(engine.verify_multi_signed(&signed, &list).unwrap());
    }
}
