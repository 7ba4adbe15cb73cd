//! The generic field-name to value mapping the codec consumes.
//!
//! Transaction and ledger-entry records are not modelled here. Anything that
//! can produce a [`SerializableObject`] can be encoded, hashed and signed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::amount::Amount;
use crate::definitions::TypeCode;
use crate::path::PathSet;
use crate::types::{AccountId, Hash256};

/// A typed field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Hash128([u8; 16]),
    Hash160([u8; 20]),
    Hash256(Hash256),
    Amount(Amount),
    Blob(Vec<u8>),
    AccountId(AccountId),
    Object(SerializableObject),
    /// Each element is a wrapper object holding exactly one object field,
    /// e.g. `{"Signer": {...}}`.
    Array(Vec<SerializableObject>),
    PathSet(PathSet),
    Vector256(Vec<Hash256>),
}

impl FieldValue {
    /// The wire type this value encodes as.
    pub fn type_code(&self) -> TypeCode {
        match self {
            Self::UInt8(_) => TypeCode::UInt8,
            Self::UInt16(_) => TypeCode::UInt16,
            Self::UInt32(_) => TypeCode::UInt32,
            Self::UInt64(_) => TypeCode::UInt64,
            Self::Hash128(_) => TypeCode::Hash128,
            Self::Hash160(_) => TypeCode::Hash160,
            Self::Hash256(_) => TypeCode::Hash256,
            Self::Amount(_) => TypeCode::Amount,
            Self::Blob(_) => TypeCode::Blob,
            Self::AccountId(_) => TypeCode::AccountId,
            Self::Object(_) => TypeCode::Object,
            Self::Array(_) => TypeCode::Array,
            Self::PathSet(_) => TypeCode::PathSet,
            Self::Vector256(_) => TypeCode::Vector256,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_code().name()
    }
}

impl From<u8> for FieldValue {
    fn from(v: u8) -> Self {
        Self::UInt8(v)
    }
}

impl From<u16> for FieldValue {
    fn from(v: u16) -> Self {
        Self::UInt16(v)
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        Self::UInt32(v)
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        Self::UInt64(v)
    }
}

impl From<Hash256> for FieldValue {
    fn from(v: Hash256) -> Self {
        Self::Hash256(v)
    }
}

impl From<Amount> for FieldValue {
    fn from(v: Amount) -> Self {
        Self::Amount(v)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(v: &[u8]) -> Self {
        Self::Blob(v.to_vec())
    }
}

impl From<AccountId> for FieldValue {
    fn from(v: AccountId) -> Self {
        Self::AccountId(v)
    }
}

impl From<SerializableObject> for FieldValue {
    fn from(v: SerializableObject) -> Self {
        Self::Object(v)
    }
}

impl From<Vec<SerializableObject>> for FieldValue {
    fn from(v: Vec<SerializableObject>) -> Self {
        Self::Array(v)
    }
}

impl From<PathSet> for FieldValue {
    fn from(v: PathSet) -> Self {
        Self::PathSet(v)
    }
}

impl From<Vec<Hash256>> for FieldValue {
    fn from(v: Vec<Hash256>) -> Self {
        Self::Vector256(v)
    }
}

/// A decoded field whose code pair has no definition.
///
/// `payload` holds the value bytes exactly as read, including any length
/// prefix or end marker, so re-encoding reproduces the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpaqueField {
    pub type_code: u16,
    pub field_code: u16,
    pub payload: Vec<u8>,
}

/// A mapping from field name to value.
///
/// Insertion order is irrelevant: the codec always emits fields sorted by
/// `(type code, field code)`. A field is absent when it is not in the map;
/// any present field is serialized, zero values included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableObject {
    fields: BTreeMap<String, FieldValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    opaque: Vec<OpaqueField>,
}

impl SerializableObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// A single-field wrapper, the shape of an array element.
    pub fn wrap(name: impl Into<String>, inner: SerializableObject) -> Self {
        Self::new().with(name, inner)
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of named fields (opaque fields excluded).
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when there are no named and no opaque fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.opaque.is_empty()
    }

    /// Named fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn opaque_fields(&self) -> &[OpaqueField] {
        &self.opaque
    }

    pub fn push_opaque(&mut self, field: OpaqueField) {
        self.opaque.push(field);
    }

    pub fn get_u32(&self, name: &str) -> Option<u32> {
        match self.get(name) {
            Some(FieldValue::UInt32(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_u16(&self, name: &str) -> Option<u16> {
        match self.get(name) {
            Some(FieldValue::UInt16(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_blob(&self, name: &str) -> Option<&[u8]> {
        match self.get(name) {
            Some(FieldValue::Blob(v)) => Some(v),
            _ => None,
        }
    }

    pub fn get_account(&self, name: &str) -> Option<AccountId> {
        match self.get(name) {
            Some(FieldValue::AccountId(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_object(&self, name: &str) -> Option<&SerializableObject> {
        match self.get(name) {
            Some(FieldValue::Object(v)) => Some(v),
            _ => None,
        }
    }

    pub fn get_array(&self, name: &str) -> Option<&[SerializableObject]> {
        match self.get(name) {
            Some(FieldValue::Array(v)) => Some(v),
            _ => None,
        }
    }

    /// For a wrapper object, the single inner field name and object.
    pub fn unwrap_element(&self) -> Option<(&str, &SerializableObject)> {
        if self.fields.len() != 1 {
            return None;
        }
        match self.fields.iter().next() {
            Some((name, FieldValue::Object(inner))) => Some((name.as_str(), inner)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_getters() {
        let obj = SerializableObject::new()
            .with("Sequence", 7u32)
            .with("SigningPubKey", vec![0xEDu8, 0x01])
            .with("Account", AccountId::ZERO);

        assert_eq!(obj.len(), 3);
        assert_eq!(obj.get_u32("Sequence"), Some(7));
        assert_eq!(obj.get_blob("SigningPubKey"), Some(&[0xED, 0x01][..]));
        assert_eq!(obj.get_account("Account"), Some(AccountId::ZERO));
        assert_eq!(obj.get_u16("Sequence"), None);
        assert!(obj.get("Fee").is_none());
    }

    #[test]
    fn test_insertion_order_is_irrelevant() {
        let a = SerializableObject::new().with("Fee", Amount::drops(10)).with("Sequence", 1u32);
        let b = SerializableObject::new().with("Sequence", 1u32).with("Fee", Amount::drops(10));
        assert_eq!(a, b);
    }

    #[test]
    fn test_wrapper_elements() {
        let inner = SerializableObject::new().with("SignerWeight", 2u16);
        let element = SerializableObject::wrap("SignerEntry", inner.clone());
        let (name, unwrapped) = element.unwrap_element().unwrap();
        assert_eq!(name, "SignerEntry");
        assert_eq!(unwrapped, &inner);

        let not_wrapper = inner.clone().with("Account", AccountId::ZERO);
        assert!(not_wrapper.unwrap_element().is_none());
    }

    #[test]
    fn test_json_roundtrip() {
        let obj = SerializableObject::new()
            .with("Fee", Amount::drops(12))
            .with("Memos", vec![SerializableObject::wrap(
                "Memo",
                SerializableObject::new().with("MemoData", vec![1u8, 2, 3]),
            )]);
        let json = serde_json::to_string(&obj).unwrap();
        let back: SerializableObject = serde_json::from_str(&json).unwrap();
        assert_eq!(back, obj);
    }

    #[test]
    fn test_value_type_codes() {
        assert_eq!(FieldValue::from(1u8).type_code(), TypeCode::UInt8);
        assert_eq!(FieldValue::from(Amount::drops(1)).type_name(), "Amount");
        assert_eq!(FieldValue::from(Vec::<Hash256>::new()).type_code(), TypeCode::Vector256);
    }
}
