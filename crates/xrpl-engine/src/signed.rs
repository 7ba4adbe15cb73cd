//! Signable inputs and signed outputs.

use xrpl_engine_core::{
    decode_with, encode, transaction_hash, CanonicalBytes, CodecOptions, Hash256,
    SerializableObject,
};

use crate::error::{EngineError, Result};

/// Anything that can present itself as a field mapping.
///
/// Typed transaction records implement this to be signed without the engine
/// knowing their shape.
pub trait Signable {
    fn fields(&self) -> &SerializableObject;
}

impl Signable for SerializableObject {
    fn fields(&self) -> &SerializableObject {
        self
    }
}

/// A transaction with its signature fields populated, its final encoding
/// and its transaction id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    object: SerializableObject,
    bytes: CanonicalBytes,
    hash: Hash256,
}

impl SignedTransaction {
    /// Encode and hash a fully signed object.
    pub(crate) fn seal(object: SerializableObject) -> Result<Self> {
        let bytes = encode(&object)?;
        let hash = transaction_hash(bytes.as_slice());
        Ok(Self { object, bytes, hash })
    }

    /// Load a signed transaction blob.
    pub fn from_blob(blob: &[u8], options: &CodecOptions) -> Result<Self> {
        if blob.is_empty() {
            return Err(EngineError::NullArgument("transaction blob"));
        }
        let object = decode_with(blob, options)?;
        let bytes = CanonicalBytes::from(blob.to_vec());
        let hash = transaction_hash(blob);
        Ok(Self { object, bytes, hash })
    }

    pub fn object(&self) -> &SerializableObject {
        &self.object
    }

    pub fn bytes(&self) -> &CanonicalBytes {
        &self.bytes
    }

    /// The transaction id.
    pub fn hash(&self) -> Hash256 {
        self.hash
    }

    /// The submit-ready hex blob.
    pub fn to_hex(&self) -> String {
        self.bytes.to_hex()
    }

    /// The attached single signature, if any.
    pub fn signature(&self) -> Option<&[u8]> {
        self.object.get_blob("TxnSignature")
    }

    pub fn into_object(self) -> SerializableObject {
        self.object
    }
}

impl Signable for SignedTransaction {
    fn fields(&self) -> &SerializableObject {
        &self.object
    }
}
