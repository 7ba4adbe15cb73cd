//! Multi-signature collection and signer lists.
//!
//! A multi-signed transaction carries a `Signers` array instead of a single
//! `TxnSignature`. Each entry names the signer's account, its public key and
//! its signature over `SMT\0 || signing encoding || account`. The array must
//! be sorted by account id.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use xrpl_engine_core::{AccountId, FieldValue, SerializableObject};
use xrpl_engine_crypto::{PublicKey, Signature};

use crate::error::{EngineError, Result};

/// One signer's contribution to a multi-signed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerSignature {
    pub account: AccountId,
    pub public_key: PublicKey,
    pub signature: Signature,
}

impl SignerSignature {
    /// The `{Signer: {...}}` array element.
    pub fn to_signer_element(&self) -> SerializableObject {
        let inner = SerializableObject::new()
            .with("Account", self.account)
            .with("SigningPubKey", self.public_key.as_bytes().to_vec())
            .with("TxnSignature", self.signature.as_bytes().to_vec());
        SerializableObject::wrap("Signer", inner)
    }

    fn from_signer_element(element: &SerializableObject) -> Result<Self> {
        let (name, inner) = element
            .unwrap_element()
            .ok_or_else(|| EngineError::IllegalArgument("Signers element is not a wrapper".into()))?;
        if name != "Signer" {
            return Err(EngineError::IllegalArgument(format!(
                "Signers element is {}, expected Signer",
                name
            )));
        }

        let account = inner
            .get_account("Account")
            .ok_or_else(|| EngineError::IllegalArgument("Signer without Account".into()))?;
        let key_bytes = inner
            .get_blob("SigningPubKey")
            .ok_or_else(|| EngineError::IllegalArgument("Signer without SigningPubKey".into()))?;
        let sig_bytes = inner
            .get_blob("TxnSignature")
            .ok_or_else(|| EngineError::IllegalArgument("Signer without TxnSignature".into()))?;

        let public_key = PublicKey::from_slice(key_bytes)?;
        Ok(Self {
            account,
            public_key,
            signature: Signature::new(sig_bytes, public_key.key_type()),
        })
    }
}

/// Signer signatures ordered by account id.
///
/// Adding a second signature for the same account replaces the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSignatureSet {
    signers: BTreeMap<AccountId, SignerSignature>,
}

impl MultiSignatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a signature, returning the one it replaced.
    pub fn insert(&mut self, signer: SignerSignature) -> Option<SignerSignature> {
        self.signers.insert(signer.account, signer)
    }

    /// Add a signature, builder style.
    pub fn with(mut self, signer: SignerSignature) -> Self {
        self.insert(signer);
        self
    }

    pub fn get(&self, account: &AccountId) -> Option<&SignerSignature> {
        self.signers.get(account)
    }

    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    /// Signatures in ascending account order.
    pub fn iter(&self) -> impl Iterator<Item = &SignerSignature> {
        self.signers.values()
    }

    /// The `Signers` array, sorted by account.
    pub fn to_signers_array(&self) -> Vec<SerializableObject> {
        self.iter().map(SignerSignature::to_signer_element).collect()
    }

    /// Collect the signatures carried by a transaction's `Signers` array.
    pub fn from_transaction(tx: &SerializableObject) -> Result<Self> {
        let elements = tx
            .get_array("Signers")
            .ok_or(EngineError::NullArgument("Signers"))?;
        let mut set = Self::new();
        for element in elements {
            set.insert(SignerSignature::from_signer_element(element)?);
        }
        Ok(set)
    }
}

impl FromIterator<SignerSignature> for MultiSignatureSet {
    fn from_iter<I: IntoIterator<Item = SignerSignature>>(iter: I) -> Self {
        let mut set = Self::new();
        for signer in iter {
            set.insert(signer);
        }
        set
    }
}

/// The signer-list lookup used to weigh multi-signatures.
pub trait SignerWeights {
    /// Weight of a listed signer, `None` if the account is not listed.
    fn weight(&self, account: &AccountId) -> Option<u16>;

    /// Whether `public_key` may sign for `account`. Defaults to the
    /// account's master key.
    fn authorizes(&self, account: &AccountId, public_key: &PublicKey) -> bool {
        public_key.account_id() == *account
    }
}

/// An in-memory signer list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignerList {
    weights: BTreeMap<AccountId, u16>,
    regular_keys: HashMap<AccountId, AccountId>,
    quorum: Option<u32>,
}

impl SignerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a signer, builder style.
    pub fn with_signer(mut self, account: AccountId, weight: u16) -> Self {
        self.weights.insert(account, weight);
        self
    }

    /// Let `account` also sign with the key of `regular_key`.
    pub fn with_regular_key(mut self, account: AccountId, regular_key: AccountId) -> Self {
        self.regular_keys.insert(account, regular_key);
        self
    }

    pub fn with_quorum(mut self, quorum: u32) -> Self {
        self.quorum = Some(quorum);
        self
    }

    /// The list's own quorum, if it carries one.
    pub fn quorum(&self) -> Option<u32> {
        self.quorum
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Read `SignerEntries` (and `SignerQuorum`, when present) from a
    /// `SignerListSet` transaction or a `SignerList` ledger entry.
    pub fn from_object(obj: &SerializableObject) -> Result<Self> {
        let entries = obj
            .get_array("SignerEntries")
            .ok_or(EngineError::NullArgument("SignerEntries"))?;

        let mut list = Self::new();
        for element in entries {
            let inner = match element.unwrap_element() {
                Some(("SignerEntry", inner)) => inner,
                _ => {
                    return Err(EngineError::IllegalArgument(
                        "SignerEntries element is not a SignerEntry".into(),
                    ))
                }
            };
            let account = inner.get_account("Account").ok_or_else(|| {
                EngineError::IllegalArgument("SignerEntry without Account".into())
            })?;
            let weight = match inner.get("SignerWeight") {
                Some(FieldValue::UInt16(w)) => *w,
                _ => {
                    return Err(EngineError::IllegalArgument(
                        "SignerEntry without SignerWeight".into(),
                    ))
                }
            };
            list.weights.insert(account, weight);
        }
        list.quorum = obj.get_u32("SignerQuorum");
        Ok(list)
    }
}

impl FromIterator<(AccountId, u16)> for SignerList {
    fn from_iter<I: IntoIterator<Item = (AccountId, u16)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl SignerWeights for SignerList {
    fn weight(&self, account: &AccountId) -> Option<u16> {
        self.weights.get(account).copied()
    }

    fn authorizes(&self, account: &AccountId, public_key: &PublicKey) -> bool {
        let signer = public_key.account_id();
        signer == *account || self.regular_keys.get(account) == Some(&signer)
    }
}

impl SignerWeights for BTreeMap<AccountId, u16> {
    fn weight(&self, account: &AccountId) -> Option<u16> {
        self.get(account).copied()
    }
}
