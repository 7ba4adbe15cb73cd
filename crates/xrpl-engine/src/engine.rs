//! The signing engine: single and multi signing, signature attachment and
//! verification.
//!
//! The engine holds only configuration. It is `Clone`, has no interior
//! mutability and can be shared freely across threads.

use tracing::{debug, trace};

use xrpl_engine_core::{
    claim_signing_data, multi_signing_data, signing_data, CodecOptions, FieldValue, Hash256,
    SerializableObject,
};
use xrpl_engine_crypto::{sign, verify_with, Canonicality, PrivateKey, PublicKey, Signature};

use crate::error::{EngineError, Result};
use crate::multisig::{MultiSignatureSet, SignerList, SignerSignature, SignerWeights};
use crate::signed::{Signable, SignedTransaction};

const SIGNING_PUB_KEY: &str = "SigningPubKey";
const TXN_SIGNATURE: &str = "TxnSignature";
const SIGNERS: &str = "Signers";

/// Configuration for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Codec settings used when loading signed blobs.
    pub codec: CodecOptions,
    /// Re-verify each signature right after producing it.
    pub verify_after_sign: bool,
    /// Treat high-S secp256k1 signatures as invalid.
    pub require_fully_canonical: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            codec: CodecOptions::default(),
            verify_after_sign: false,
            require_fully_canonical: true,
        }
    }
}

/// The signing and verification engine.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn canonicality(&self) -> Canonicality {
        if self.config.require_fully_canonical {
            Canonicality::Strict
        } else {
            Canonicality::Lenient
        }
    }

    fn check_own_signature(
        &self,
        public_key: &PublicKey,
        data: &[u8],
        signature: &Signature,
    ) -> Result<()> {
        if !self.config.verify_after_sign {
            return Ok(());
        }
        if !verify_with(public_key, data, signature, self.canonicality())? {
            return Err(EngineError::SelfVerificationFailed);
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Signing
    // ─────────────────────────────────────────────────────────────────────────

    /// Sign a transaction with a single key.
    ///
    /// Sets `SigningPubKey`, signs the `STX\0` signing data, attaches
    /// `TxnSignature` and computes the transaction id.
    pub fn sign_single(&self, key: &PrivateKey, tx: &impl Signable) -> Result<SignedTransaction> {
        let fields = non_empty(tx)?;
        let public_key = key.public_key();

        let mut object = fields.clone();
        object.insert(SIGNING_PUB_KEY, public_key.as_bytes().to_vec());

        let data = signing_data(&object)?;
        let signature = sign(key, &data)?;
        self.check_own_signature(&public_key, &data, &signature)?;

        object.insert(TXN_SIGNATURE, signature.into_bytes());
        let signed = SignedTransaction::seal(object)?;
        debug!(
            key_type = %public_key.key_type(),
            hash = %signed.hash(),
            "signed transaction"
        );
        Ok(signed)
    }

    /// Produce one signer's multi-signature.
    ///
    /// The signed data uses an empty `SigningPubKey`, as every multi-signed
    /// transaction must carry, and ends with the signer's account id.
    pub fn sign_multi(&self, key: &PrivateKey, tx: &impl Signable) -> Result<SignerSignature> {
        let object = multisig_view(non_empty(tx)?);
        let public_key = key.public_key();
        let account = public_key.account_id();

        let data = multi_signing_data(&object, &account)?;
        let signature = sign(key, &data)?;
        self.check_own_signature(&public_key, &data, &signature)?;

        debug!(signer = %account, key_type = %public_key.key_type(), "produced multi-signature");
        Ok(SignerSignature {
            account,
            public_key,
            signature,
        })
    }

    /// Attach a signature produced elsewhere.
    pub fn add_signature(
        &self,
        tx: &impl Signable,
        public_key: &PublicKey,
        signature: &Signature,
    ) -> Result<SignedTransaction> {
        let mut object = non_empty(tx)?.clone();
        object.insert(SIGNING_PUB_KEY, public_key.as_bytes().to_vec());
        object.insert(TXN_SIGNATURE, signature.as_bytes().to_vec());
        SignedTransaction::seal(object)
    }

    /// Assemble a multi-signed transaction.
    ///
    /// `Signers` is written in ascending account order, `SigningPubKey` is
    /// emptied and any single signature is removed.
    pub fn add_multi_signatures(
        &self,
        tx: &impl Signable,
        signatures: &MultiSignatureSet,
    ) -> Result<SignedTransaction> {
        if signatures.is_empty() {
            return Err(EngineError::IllegalArgument(
                "multi-signature set is empty".into(),
            ));
        }
        let mut object = multisig_view(non_empty(tx)?);
        object.remove(TXN_SIGNATURE);
        object.insert(SIGNERS, signatures.to_signers_array());

        let signed = SignedTransaction::seal(object)?;
        debug!(signers = signatures.len(), hash = %signed.hash(), "assembled multi-signed transaction");
        Ok(signed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────

    /// Verify a transaction's `TxnSignature` against `public_key`.
    pub fn verify_single(&self, public_key: &PublicKey, tx: &impl Signable) -> Result<bool> {
        let fields = non_empty(tx)?;
        let signature_bytes = fields
            .get_blob(TXN_SIGNATURE)
            .ok_or(EngineError::NullArgument("TxnSignature"))?;
        if let Some(attached) = fields.get_blob(SIGNING_PUB_KEY) {
            if attached != &public_key.as_bytes()[..] {
                trace!(key_type = %public_key.key_type(), "signing key differs from verifier");
                return Ok(false);
            }
        }
        let signature = Signature::new(signature_bytes, public_key.key_type());

        let data = signing_data(fields)?;
        let valid = verify_with(public_key, &data, &signature, self.canonicality())?;
        trace!(key_type = %public_key.key_type(), valid, "verified single signature");
        Ok(valid)
    }

    /// Check that the valid signatures in `signatures` reach `quorum`.
    ///
    /// Each signature is verified independently. Signatures that are invalid,
    /// malformed, from unlisted accounts or from keys the account has not
    /// authorized contribute nothing; they never abort the check.
    pub fn verify_multi(
        &self,
        signatures: &MultiSignatureSet,
        tx: &impl Signable,
        weights: &impl SignerWeights,
        quorum: u32,
    ) -> Result<bool> {
        if signatures.is_empty() {
            return Err(EngineError::IllegalArgument(
                "multi-signature set is empty".into(),
            ));
        }
        if quorum == 0 {
            return Err(EngineError::IllegalArgument("quorum must be positive".into()));
        }
        let object = multisig_view(non_empty(tx)?);

        let mut total: u32 = 0;
        for signer in signatures.iter() {
            let Some(weight) = weights.weight(&signer.account) else {
                debug!(signer = %signer.account, "signer not in signer list");
                continue;
            };
            if !weights.authorizes(&signer.account, &signer.public_key) {
                debug!(signer = %signer.account, "key not authorized for signer");
                continue;
            }

            let data = multi_signing_data(&object, &signer.account)?;
            match verify_with(&signer.public_key, &data, &signer.signature, self.canonicality()) {
                Ok(true) => total += u32::from(weight),
                Ok(false) => debug!(signer = %signer.account, "multi-signature does not verify"),
                Err(e) => debug!(signer = %signer.account, error = %e, "malformed multi-signature"),
            }
        }

        trace!(total, quorum, "multi-signature tally");
        Ok(total >= quorum)
    }

    /// Verify a multi-signed transaction against a signer list's own quorum.
    pub fn verify_multi_signed(&self, tx: &impl Signable, signer_list: &SignerList) -> Result<bool> {
        let quorum = signer_list
            .quorum()
            .ok_or(EngineError::NullArgument("SignerQuorum"))?;
        let signatures = MultiSignatureSet::from_transaction(tx.fields())?;
        self.verify_multi(&signatures, tx, signer_list, quorum)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Payment channel claims
    // ─────────────────────────────────────────────────────────────────────────

    /// Authorize `drops` from a payment channel.
    pub fn sign_claim(&self, key: &PrivateKey, channel: &Hash256, drops: u64) -> Result<Signature> {
        let data = claim_signing_data(channel, drops);
        let signature = sign(key, &data)?;
        self.check_own_signature(&key.public_key(), &data, &signature)?;
        Ok(signature)
    }

    /// Check a payment channel claim signature.
    pub fn verify_claim(
        &self,
        public_key: &PublicKey,
        channel: &Hash256,
        drops: u64,
        signature: &Signature,
    ) -> Result<bool> {
        let data = claim_signing_data(channel, drops);
        Ok(verify_with(public_key, &data, signature, self.canonicality())?)
    }

    /// Load a signed blob with this engine's codec settings.
    pub fn decode_signed(&self, blob: &[u8]) -> Result<SignedTransaction> {
        SignedTransaction::from_blob(blob, &self.config.codec)
    }
}

fn non_empty(tx: &impl Signable) -> Result<&SerializableObject> {
    let fields = tx.fields();
    if fields.is_empty() {
        return Err(EngineError::NullArgument("transaction"));
    }
    Ok(fields)
}

/// The object as multi-signers see it: `SigningPubKey` present and empty.
fn multisig_view(fields: &SerializableObject) -> SerializableObject {
    let mut object = fields.clone();
    object.insert(SIGNING_PUB_KEY, FieldValue::Blob(Vec::new()));
    object
}

// Free functions over a default engine.

/// [`Engine::sign_single`] with the default configuration.
pub fn sign_single(key: &PrivateKey, tx: &impl Signable) -> Result<SignedTransaction> {
    Engine::default().sign_single(key, tx)
}

/// [`Engine::sign_multi`] with the default configuration.
pub fn sign_multi(key: &PrivateKey, tx: &impl Signable) -> Result<SignerSignature> {
    Engine::default().sign_multi(key, tx)
}

/// [`Engine::add_signature`] with the default configuration.
pub fn add_signature(
    tx: &impl Signable,
    public_key: &PublicKey,
    signature: &Signature,
) -> Result<SignedTransaction> {
    Engine::default().add_signature(tx, public_key, signature)
}

/// [`Engine::add_multi_signatures`] with the default configuration.
pub fn add_multi_signatures(
    tx: &impl Signable,
    signatures: &MultiSignatureSet,
) -> Result<SignedTransaction> {
    Engine::default().add_multi_signatures(tx, signatures)
}

/// [`Engine::verify_single`] with the default configuration.
pub fn verify_single(public_key: &PublicKey, tx: &impl Signable) -> Result<bool> {
    Engine::default().verify_single(public_key, tx)
}

/// [`Engine::verify_multi`] with the default configuration.
pub fn verify_multi(
    signatures: &MultiSignatureSet,
    tx: &impl Signable,
    weights: &impl SignerWeights,
    quorum: u32,
) -> Result<bool> {
    Engine::default().verify_multi(signatures, tx, weights, quorum)
}

/// [`Engine::sign_claim`] with the default configuration.
pub fn sign_claim(key: &PrivateKey, channel: &Hash256, drops: u64) -> Result<Signature> {
    Engine::default().sign_claim(key, channel, drops)
}

/// [`Engine::verify_claim`] with the default configuration.
pub fn verify_claim(
    public_key: &PublicKey,
    channel: &Hash256,
    drops: u64,
    signature: &Signature,
) -> Result<bool> {
    Engine::default().verify_claim(public_key, channel, drops, signature)
}
