//! Canonical binary encoding.
//!
//! The wire form of an object is its fields sorted by `(type code, field
//! code)`, each written as a field header followed by the value:
//! - fixed-width integers and hashes are big-endian raw bytes
//! - blobs, account ids and hash vectors are length-prefixed
//! - nested objects end with the object end marker `0xE1`
//! - arrays end with the array end marker `0xF1`; each element is a
//!   single-field wrapper object
//!
//! Two equal objects always produce identical bytes, regardless of the
//! order their fields were inserted.

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use tracing::trace;

use crate::amount::Amount;
use crate::binary::{encode_field_header, encode_length, encode_vl, BinaryParser};
use crate::definitions::{self, TypeCode, ARRAY_END_MARKER, OBJECT_END_MARKER};
use crate::error::{CoreError, Result};
use crate::object::{FieldValue, OpaqueField, SerializableObject};
use crate::path::PathSet;
use crate::types::{AccountId, Hash256};

const OBJECT_END: (u16, u16) = (TypeCode::Object.code(), 1);
const ARRAY_END: (u16, u16) = (TypeCode::Array.code(), 1);

/// Deepest nesting of objects and arrays accepted in either direction.
pub const MAX_NESTING_DEPTH: usize = 32;

/// What decode does with a field whose type is known but whose code pair
/// has no definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFieldPolicy {
    /// Keep the raw bytes and re-emit them on encode.
    #[default]
    Preserve,
    /// Fail with `UnknownField`.
    Reject,
}

/// Codec settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodecOptions {
    pub unknown_fields: UnknownFieldPolicy,
}

impl CodecOptions {
    /// Options that reject any undefined field.
    pub fn strict() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::Reject,
        }
    }
}

/// Immutable encoded bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Bytes);

impl CanonicalBytes {
    /// Parse from hex (either case).
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| CoreError::InvalidValue(e.to_string()))?;
        Ok(Self(Bytes::from(bytes)))
    }

    /// Upper-case hex, the form the network's submit API takes.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.0)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for CanonicalBytes {
    fn from(v: Vec<u8>) -> Self {
        Self(Bytes::from(v))
    }
}

impl From<Bytes> for CanonicalBytes {
    fn from(b: Bytes) -> Self {
        Self(b)
    }
}

impl fmt::Debug for CanonicalBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = &self.0[..self.0.len().min(16)];
        write!(f, "CanonicalBytes({} bytes, {}", self.0.len(), hex::encode_upper(shown))?;
        if self.0.len() > 16 {
            f.write_str("...")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for CanonicalBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    AllFields,
    SigningFields,
}

/// Encode every serialized field.
pub fn encode(obj: &SerializableObject) -> Result<CanonicalBytes> {
    encode_scoped(obj, Scope::AllFields)
}

/// Encode only the fields that participate in signing.
///
/// `TxnSignature`, `Signers` and `MasterSignature` are left out at the top
/// level. Nested objects are always encoded whole.
pub fn encode_for_signing(obj: &SerializableObject) -> Result<CanonicalBytes> {
    encode_scoped(obj, Scope::SigningFields)
}

/// The signing encoding followed by the signer's 20-byte account id.
pub fn encode_for_multisigning(
    obj: &SerializableObject,
    signer: &AccountId,
) -> Result<CanonicalBytes> {
    let mut buf = BytesMut::new();
    encode_object(&mut buf, obj, Scope::SigningFields, 0)?;
    buf.put_slice(signer.as_bytes());
    Ok(CanonicalBytes(buf.freeze()))
}

fn encode_scoped(obj: &SerializableObject, scope: Scope) -> Result<CanonicalBytes> {
    let mut buf = BytesMut::new();
    encode_object(&mut buf, obj, scope, 0)?;
    trace!(
        fields = obj.len(),
        bytes = buf.len(),
        signing = scope == Scope::SigningFields,
        "encoded object"
    );
    Ok(CanonicalBytes(buf.freeze()))
}

enum Entry<'a> {
    Known(&'a FieldValue),
    Opaque(&'a OpaqueField),
}

fn encode_object(
    buf: &mut BytesMut,
    obj: &SerializableObject,
    scope: Scope,
    depth: usize,
) -> Result<()> {
    if depth > MAX_NESTING_DEPTH {
        return Err(CoreError::InvalidValue(format!(
            "nesting deeper than {} levels",
            MAX_NESTING_DEPTH
        )));
    }

    let mut entries: Vec<((u16, u16), Entry<'_>)> =
        Vec::with_capacity(obj.len() + obj.opaque_fields().len());

    for (name, value) in obj.iter() {
        let def = definitions::lookup(name)?;
        if def.name == OBJECT_END_MARKER || def.name == ARRAY_END_MARKER {
            return Err(CoreError::InvalidValue(format!("{} cannot be set directly", name)));
        }
        if !def.is_serialized {
            continue;
        }
        if scope == Scope::SigningFields && !def.is_signing_field {
            continue;
        }
        if value.type_code() != def.type_code {
            return Err(CoreError::TypeMismatch {
                field: name.to_string(),
                expected: def.type_code.name(),
                actual: value.type_name(),
            });
        }
        entries.push((def.sort_key(), Entry::Known(value)));
    }

    for field in obj.opaque_fields() {
        if definitions::lookup_by_code(field.type_code, field.field_code).is_some() {
            return Err(CoreError::InvalidValue(format!(
                "opaque field ({}, {}) shadows a defined field",
                field.type_code, field.field_code
            )));
        }
        entries.push(((field.type_code, field.field_code), Entry::Opaque(field)));
    }

    entries.sort_by_key(|(key, _)| *key);
    if let Some(pair) = entries.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        let (type_code, field_code) = pair[0].0;
        return Err(CoreError::InvalidValue(format!(
            "duplicate field ({}, {})",
            type_code, field_code
        )));
    }

    for ((type_code, field_code), entry) in entries {
        encode_field_header(buf, type_code, field_code)?;
        match entry {
            Entry::Known(value) => encode_value(buf, value, depth)?,
            Entry::Opaque(field) => buf.put_slice(&field.payload),
        }
    }
    Ok(())
}

fn encode_value(buf: &mut BytesMut, value: &FieldValue, depth: usize) -> Result<()> {
    match value {
        FieldValue::UInt8(v) => buf.put_u8(*v),
        FieldValue::UInt16(v) => buf.put_u16(*v),
        FieldValue::UInt32(v) => buf.put_u32(*v),
        FieldValue::UInt64(v) => buf.put_u64(*v),
        FieldValue::Hash128(v) => buf.put_slice(v),
        FieldValue::Hash160(v) => buf.put_slice(v),
        FieldValue::Hash256(v) => buf.put_slice(v.as_bytes()),
        FieldValue::Amount(v) => v.encode_to(buf)?,
        FieldValue::Blob(v) => encode_vl(buf, v)?,
        FieldValue::AccountId(v) => encode_vl(buf, v.as_bytes())?,
        FieldValue::Object(inner) => {
            encode_object(buf, inner, Scope::AllFields, depth + 1)?;
            encode_field_header(buf, OBJECT_END.0, OBJECT_END.1)?;
        }
        FieldValue::Array(elements) => {
            for element in elements {
                check_array_element(element)?;
                encode_object(buf, element, Scope::AllFields, depth + 1)?;
            }
            encode_field_header(buf, ARRAY_END.0, ARRAY_END.1)?;
        }
        FieldValue::PathSet(v) => v.encode_to(buf)?,
        FieldValue::Vector256(hashes) => {
            encode_length(buf, hashes.len() * 32)?;
            for hash in hashes {
                buf.put_slice(hash.as_bytes());
            }
        }
    }
    Ok(())
}

/// Array elements must hold exactly one object-typed field.
fn check_array_element(element: &SerializableObject) -> Result<()> {
    let is_wrapper = match (element.len(), element.opaque_fields()) {
        (1, []) => element.unwrap_element().is_some(),
        (0, [field]) => field.type_code == TypeCode::Object.code(),
        _ => false,
    };
    if is_wrapper {
        Ok(())
    } else {
        Err(CoreError::InvalidValue(
            "array element must be a single-field object wrapper".into(),
        ))
    }
}

/// Decode with default options.
pub fn decode(bytes: &[u8]) -> Result<SerializableObject> {
    decode_with(bytes, &CodecOptions::default())
}

/// Decode a complete top-level object.
pub fn decode_with(bytes: &[u8], options: &CodecOptions) -> Result<SerializableObject> {
    let mut parser = BinaryParser::new(bytes);
    let obj = decode_object(&mut parser, options, 0, true)?;
    trace!(
        fields = obj.len(),
        opaque = obj.opaque_fields().len(),
        bytes = bytes.len(),
        "decoded object"
    );
    Ok(obj)
}

fn unknown_field(type_code: u16, field_code: u16) -> CoreError {
    CoreError::UnknownField(format!("type {} field {}", type_code, field_code))
}

fn decode_object(
    parser: &mut BinaryParser<'_>,
    options: &CodecOptions,
    depth: usize,
    top_level: bool,
) -> Result<SerializableObject> {
    if depth > MAX_NESTING_DEPTH {
        return Err(CoreError::InvalidValue(format!(
            "nesting deeper than {} levels",
            MAX_NESTING_DEPTH
        )));
    }

    let mut obj = SerializableObject::new();
    loop {
        if top_level && parser.is_empty() {
            break;
        }
        let header_offset = parser.position();
        let code = parser.read_field_header()?;
        if code == OBJECT_END {
            if top_level {
                return Err(CoreError::TrailingBytes(header_offset));
            }
            break;
        }
        if code == ARRAY_END {
            return Err(CoreError::InvalidValue(format!(
                "array end marker outside an array at offset {}",
                header_offset
            )));
        }

        let (type_code, field_code) = code;
        match definitions::lookup_by_code(type_code, field_code) {
            Some(def) => {
                let value = decode_value(parser, def.type_code, options, depth)?;
                if obj.insert(def.name, value).is_some() {
                    return Err(CoreError::InvalidValue(format!("duplicate field {}", def.name)));
                }
            }
            None => {
                let field = read_opaque(parser, type_code, field_code, options, depth)?;
                obj.push_opaque(field);
            }
        }
    }
    Ok(obj)
}

fn read_opaque(
    parser: &mut BinaryParser<'_>,
    type_code: u16,
    field_code: u16,
    options: &CodecOptions,
    depth: usize,
) -> Result<OpaqueField> {
    let kind = TypeCode::from_code(type_code).ok_or_else(|| unknown_field(type_code, field_code))?;
    if options.unknown_fields == UnknownFieldPolicy::Reject {
        return Err(unknown_field(type_code, field_code));
    }
    let start = parser.position();
    decode_value(parser, kind, options, depth)?;
    let payload = parser.consumed_since(start).to_vec();
    trace!(type_code, field_code, len = payload.len(), "preserved unknown field");
    Ok(OpaqueField {
        type_code,
        field_code,
        payload,
    })
}

fn decode_value(
    parser: &mut BinaryParser<'_>,
    kind: TypeCode,
    options: &CodecOptions,
    depth: usize,
) -> Result<FieldValue> {
    let value = match kind {
        TypeCode::UInt8 => FieldValue::UInt8(parser.read_u8()?),
        TypeCode::UInt16 => FieldValue::UInt16(parser.read_u16()?),
        TypeCode::UInt32 => FieldValue::UInt32(parser.read_u32()?),
        TypeCode::UInt64 => FieldValue::UInt64(parser.read_u64()?),
        TypeCode::Hash128 => FieldValue::Hash128(parser.read_array()?),
        TypeCode::Hash160 => FieldValue::Hash160(parser.read_array()?),
        TypeCode::Hash256 => FieldValue::Hash256(Hash256(parser.read_array()?)),
        TypeCode::Amount => FieldValue::Amount(Amount::decode_from(parser)?),
        TypeCode::Blob => FieldValue::Blob(parser.read_vl()?.to_vec()),
        TypeCode::AccountId => FieldValue::AccountId(AccountId::try_from(parser.read_vl()?)?),
        TypeCode::Object => FieldValue::Object(decode_object(parser, options, depth + 1, false)?),
        TypeCode::Array => FieldValue::Array(decode_array(parser, options, depth + 1)?),
        TypeCode::PathSet => FieldValue::PathSet(PathSet::decode_from(parser)?),
        TypeCode::Vector256 => {
            let raw = parser.read_vl()?;
            if raw.len() % 32 != 0 {
                return Err(CoreError::InvalidValue(format!(
                    "Vector256 length {} is not a multiple of 32",
                    raw.len()
                )));
            }
            let hashes = raw
                .chunks_exact(32)
                .map(|chunk| {
                    let mut hash = [0u8; 32];
                    hash.copy_from_slice(chunk);
                    Hash256(hash)
                })
                .collect();
            FieldValue::Vector256(hashes)
        }
    };
    Ok(value)
}

fn decode_array(
    parser: &mut BinaryParser<'_>,
    options: &CodecOptions,
    depth: usize,
) -> Result<Vec<SerializableObject>> {
    if depth > MAX_NESTING_DEPTH {
        return Err(CoreError::InvalidValue(format!(
            "nesting deeper than {} levels",
            MAX_NESTING_DEPTH
        )));
    }

    let mut elements = Vec::new();
    loop {
        let header_offset = parser.position();
        let code = parser.read_field_header()?;
        if code == ARRAY_END {
            break;
        }
        let (type_code, field_code) = code;
        if type_code != TypeCode::Object.code() || code == OBJECT_END {
            return Err(CoreError::InvalidValue(format!(
                "array element at offset {} is not an object",
                header_offset
            )));
        }

        let element = match definitions::lookup_by_code(type_code, field_code) {
            Some(def) => {
                let inner = decode_object(parser, options, depth + 1, false)?;
                SerializableObject::wrap(def.name, inner)
            }
            None => {
                let mut element = SerializableObject::new();
                element.push_opaque(read_opaque(parser, type_code, field_code, options, depth)?);
                element
            }
        };
        elements.push(element);
    }
    Ok(elements)
}
