//! The field definition table.
//!
//! Every serializable field is identified by a `(type code, field code)`
//! pair. The pair decides the field header bytes and the serialization
//! order: fields are always written ascending by type code, then field
//! code, never in declaration or insertion order.
//!
//! The table is embedded, built once on first use, and read-only after
//! that, so concurrent lookups need no synchronization.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

use crate::error::{CoreError, Result};

/// `tfFullyCanonicalSig`: require a canonical (low-S) signature.
pub const TF_FULLY_CANONICAL_SIG: u32 = 0x8000_0000;

/// Serialized type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum TypeCode {
    UInt16 = 1,
    UInt32 = 2,
    UInt64 = 3,
    Hash128 = 4,
    Hash256 = 5,
    Amount = 6,
    Blob = 7,
    AccountId = 8,
    Object = 14,
    Array = 15,
    UInt8 = 16,
    Hash160 = 17,
    PathSet = 18,
    Vector256 = 19,
}

impl TypeCode {
    /// The numeric code.
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Parse a numeric code.
    pub fn from_code(code: u16) -> Option<Self> {
        Some(match code {
            1 => Self::UInt16,
            2 => Self::UInt32,
            3 => Self::UInt64,
            4 => Self::Hash128,
            5 => Self::Hash256,
            6 => Self::Amount,
            7 => Self::Blob,
            8 => Self::AccountId,
            14 => Self::Object,
            15 => Self::Array,
            16 => Self::UInt8,
            17 => Self::Hash160,
            18 => Self::PathSet,
            19 => Self::Vector256,
            _ => return None,
        })
    }

    /// Whether values of this type carry a length prefix.
    pub const fn is_vl_encoded(self) -> bool {
        matches!(self, Self::Blob | Self::AccountId | Self::Vector256)
    }

    /// The protocol's name for this type.
    pub const fn name(self) -> &'static str {
        match self {
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::Hash128 => "Hash128",
            Self::Hash256 => "Hash256",
            Self::Amount => "Amount",
            Self::Blob => "Blob",
            Self::AccountId => "AccountID",
            Self::Object => "STObject",
            Self::Array => "STArray",
            Self::UInt8 => "UInt8",
            Self::Hash160 => "Hash160",
            Self::PathSet => "PathSet",
            Self::Vector256 => "Vector256",
        }
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of the field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Field name as used in transaction objects.
    pub name: &'static str,
    /// Serialized type.
    pub type_code: TypeCode,
    /// Ordinal within the type.
    pub field_code: u16,
    /// Whether the payload is length-prefixed.
    pub is_vl_encoded: bool,
    /// Whether the field is ever written to the binary form.
    pub is_serialized: bool,
    /// Whether the field participates in signing encodings.
    pub is_signing_field: bool,
}

impl FieldDefinition {
    /// The serialization sort key.
    pub const fn sort_key(&self) -> (u16, u16) {
        (self.type_code.code(), self.field_code)
    }
}

const fn def(name: &'static str, type_code: TypeCode, field_code: u16) -> FieldDefinition {
    FieldDefinition {
        name,
        type_code,
        field_code,
        is_vl_encoded: type_code.is_vl_encoded(),
        is_serialized: true,
        is_signing_field: true,
    }
}

const fn non_signing(name: &'static str, type_code: TypeCode, field_code: u16) -> FieldDefinition {
    FieldDefinition {
        is_signing_field: false,
        ..def(name, type_code, field_code)
    }
}

const fn not_serialized(
    name: &'static str,
    type_code: TypeCode,
    field_code: u16,
) -> FieldDefinition {
    FieldDefinition {
        is_serialized: false,
        is_signing_field: false,
        ..def(name, type_code, field_code)
    }
}

use TypeCode::*;

/// The embedded field list.
static FIELDS: &[FieldDefinition] = &[
    // UInt8
    def("CloseResolution", UInt8, 1),
    def("Method", UInt8, 2),
    def("TransactionResult", UInt8, 3),
    def("TickSize", UInt8, 16),
    // UInt16
    def("LedgerEntryType", UInt16, 1),
    def("TransactionType", UInt16, 2),
    def("SignerWeight", UInt16, 3),
    def("TransferFee", UInt16, 4),
    // UInt32
    def("NetworkID", UInt32, 1),
    def("Flags", UInt32, 2),
    def("SourceTag", UInt32, 3),
    def("Sequence", UInt32, 4),
    def("PreviousTxnLgrSeq", UInt32, 5),
    def("LedgerSequence", UInt32, 6),
    def("CloseTime", UInt32, 7),
    def("ParentCloseTime", UInt32, 8),
    def("SigningTime", UInt32, 9),
    def("Expiration", UInt32, 10),
    def("TransferRate", UInt32, 11),
    def("WalletSize", UInt32, 12),
    def("OwnerCount", UInt32, 13),
    def("DestinationTag", UInt32, 14),
    def("HighQualityIn", UInt32, 16),
    def("HighQualityOut", UInt32, 17),
    def("LowQualityIn", UInt32, 18),
    def("LowQualityOut", UInt32, 19),
    def("QualityIn", UInt32, 20),
    def("QualityOut", UInt32, 21),
    def("StampEscrow", UInt32, 22),
    def("BondAmount", UInt32, 23),
    def("LoadFee", UInt32, 24),
    def("OfferSequence", UInt32, 25),
    def("FirstLedgerSequence", UInt32, 26),
    def("LastLedgerSequence", UInt32, 27),
    def("TransactionIndex", UInt32, 28),
    def("OperationLimit", UInt32, 29),
    def("ReferenceFeeUnits", UInt32, 30),
    def("ReserveBase", UInt32, 31),
    def("ReserveIncrement", UInt32, 32),
    def("SetFlag", UInt32, 33),
    def("ClearFlag", UInt32, 34),
    def("SignerQuorum", UInt32, 35),
    def("CancelAfter", UInt32, 36),
    def("FinishAfter", UInt32, 37),
    def("SignerListID", UInt32, 38),
    def("SettleDelay", UInt32, 39),
    def("TicketCount", UInt32, 40),
    def("TicketSequence", UInt32, 41),
    def("NFTokenTaxon", UInt32, 42),
    def("MintedNFTokens", UInt32, 43),
    def("BurnedNFTokens", UInt32, 44),
    // UInt64
    def("IndexNext", UInt64, 1),
    def("IndexPrevious", UInt64, 2),
    def("BookNode", UInt64, 3),
    def("OwnerNode", UInt64, 4),
    def("BaseFee", UInt64, 5),
    def("ExchangeRate", UInt64, 6),
    def("LowNode", UInt64, 7),
    def("HighNode", UInt64, 8),
    def("DestinationNode", UInt64, 9),
    def("Cookie", UInt64, 10),
    def("ServerVersion", UInt64, 11),
    def("NFTokenOfferNode", UInt64, 12),
    // Hash128
    def("EmailHash", Hash128, 1),
    // Hash160
    def("TakerPaysCurrency", Hash160, 1),
    def("TakerPaysIssuer", Hash160, 2),
    def("TakerGetsCurrency", Hash160, 3),
    def("TakerGetsIssuer", Hash160, 4),
    // Hash256
    def("LedgerHash", Hash256, 1),
    def("ParentHash", Hash256, 2),
    def("TransactionHash", Hash256, 3),
    def("AccountHash", Hash256, 4),
    def("PreviousTxnID", Hash256, 5),
    def("LedgerIndex", Hash256, 6),
    def("WalletLocator", Hash256, 7),
    def("RootIndex", Hash256, 8),
    def("AccountTxnID", Hash256, 9),
    def("NFTokenID", Hash256, 10),
    def("BookDirectory", Hash256, 16),
    def("InvoiceID", Hash256, 17),
    def("Nickname", Hash256, 18),
    def("Amendment", Hash256, 19),
    def("Digest", Hash256, 21),
    def("Channel", Hash256, 22),
    def("ConsensusHash", Hash256, 23),
    def("CheckID", Hash256, 24),
    def("ValidatedHash", Hash256, 25),
    not_serialized("hash", Hash256, 257),
    not_serialized("index", Hash256, 258),
    // Amount
    def("Amount", Amount, 1),
    def("Balance", Amount, 2),
    def("LimitAmount", Amount, 3),
    def("TakerPays", Amount, 4),
    def("TakerGets", Amount, 5),
    def("LowLimit", Amount, 6),
    def("HighLimit", Amount, 7),
    def("Fee", Amount, 8),
    def("SendMax", Amount, 9),
    def("DeliverMin", Amount, 10),
    def("MinimumOffer", Amount, 16),
    def("RippleEscrow", Amount, 17),
    def("DeliveredAmount", Amount, 18),
    def("NFTokenBrokerFee", Amount, 19),
    // Blob
    def("PublicKey", Blob, 1),
    def("MessageKey", Blob, 2),
    def("SigningPubKey", Blob, 3),
    non_signing("TxnSignature", Blob, 4),
    def("URI", Blob, 5),
    def("Signature", Blob, 6),
    def("Domain", Blob, 7),
    def("FundCode", Blob, 8),
    def("RemoveCode", Blob, 9),
    def("ExpireCode", Blob, 10),
    def("CreateCode", Blob, 11),
    def("MemoType", Blob, 12),
    def("MemoData", Blob, 13),
    def("MemoFormat", Blob, 14),
    def("Fulfillment", Blob, 16),
    def("Condition", Blob, 17),
    non_signing("MasterSignature", Blob, 18),
    // AccountID
    def("Account", AccountId, 1),
    def("Owner", AccountId, 2),
    def("Destination", AccountId, 3),
    def("Issuer", AccountId, 4),
    def("Authorize", AccountId, 5),
    def("Unauthorize", AccountId, 6),
    def("RegularKey", AccountId, 8),
    def("NFTokenMinter", AccountId, 9),
    // STObject
    def("ObjectEndMarker", Object, 1),
    def("TransactionMetaData", Object, 2),
    def("CreatedNode", Object, 3),
    def("DeletedNode", Object, 4),
    def("ModifiedNode", Object, 5),
    def("PreviousFields", Object, 6),
    def("FinalFields", Object, 7),
    def("NewFields", Object, 8),
    def("TemplateEntry", Object, 9),
    def("Memo", Object, 10),
    def("SignerEntry", Object, 11),
    def("NFToken", Object, 12),
    def("Signer", Object, 16),
    def("Majority", Object, 18),
    def("DisabledValidator", Object, 19),
    // STArray
    def("ArrayEndMarker", Array, 1),
    non_signing("Signers", Array, 3),
    def("SignerEntries", Array, 4),
    def("Template", Array, 5),
    def("Necessary", Array, 6),
    def("Sufficient", Array, 7),
    def("AffectedNodes", Array, 8),
    def("Memos", Array, 9),
    def("NFTokens", Array, 10),
    def("Majorities", Array, 16),
    def("DisabledValidators", Array, 17),
    // PathSet
    def("Paths", PathSet, 1),
    // Vector256
    def("Indexes", Vector256, 1),
    def("Hashes", Vector256, 2),
    def("Amendments", Vector256, 3),
    def("NFTokenOffers", Vector256, 4),
];

/// Name of the field that terminates a nested object.
pub const OBJECT_END_MARKER: &str = "ObjectEndMarker";

/// Name of the field that terminates an array.
pub const ARRAY_END_MARKER: &str = "ArrayEndMarker";

/// Transaction type names and their `TransactionType` codes.
static TRANSACTION_TYPES: &[(&str, u16)] = &[
    ("Payment", 0),
    ("EscrowCreate", 1),
    ("EscrowFinish", 2),
    ("AccountSet", 3),
    ("EscrowCancel", 4),
    ("SetRegularKey", 5),
    ("NickNameSet", 6),
    ("OfferCreate", 7),
    ("OfferCancel", 8),
    ("TicketCreate", 10),
    ("SignerListSet", 12),
    ("PaymentChannelCreate", 13),
    ("PaymentChannelFund", 14),
    ("PaymentChannelClaim", 15),
    ("CheckCreate", 16),
    ("CheckCash", 17),
    ("CheckCancel", 18),
    ("DepositPreauth", 19),
    ("TrustSet", 20),
    ("AccountDelete", 21),
    ("NFTokenMint", 25),
    ("NFTokenBurn", 26),
    ("NFTokenCreateOffer", 27),
    ("NFTokenCancelOffer", 28),
    ("NFTokenAcceptOffer", 29),
    ("EnableAmendment", 100),
    ("SetFee", 101),
    ("UNLModify", 102),
];

/// Ledger entry type names and their `LedgerEntryType` codes.
static LEDGER_ENTRY_TYPES: &[(&str, u16)] = &[
    ("NFTokenOffer", 0x0037),
    ("Check", 0x0043),
    ("NegativeUNL", 0x004e),
    ("NFTokenPage", 0x0050),
    ("SignerList", 0x0053),
    ("Ticket", 0x0054),
    ("AccountRoot", 0x0061),
    ("DirectoryNode", 0x0064),
    ("Amendments", 0x0066),
    ("LedgerHashes", 0x0068),
    ("Offer", 0x006f),
    ("DepositPreauth", 0x0070),
    ("RippleState", 0x0072),
    ("FeeSettings", 0x0073),
    ("Escrow", 0x0075),
    ("PayChannel", 0x0078),
];

/// The process-wide field table.
pub struct FieldTable {
    by_name: HashMap<&'static str, &'static FieldDefinition>,
    by_code: HashMap<(u16, u16), &'static FieldDefinition>,
}

impl FieldTable {
    fn build() -> Self {
        Self::from_fields(FIELDS)
    }

    /// Index a field list. Panics on a repeated name or code, since either
    /// would make lookups ambiguous.
    fn from_fields(fields: &'static [FieldDefinition]) -> Self {
        let mut by_name = HashMap::with_capacity(fields.len());
        let mut by_code = HashMap::with_capacity(fields.len());
        for field in fields {
            let dup_name = by_name.insert(field.name, field);
            let dup_code = by_code.insert(field.sort_key(), field);
            assert!(dup_name.is_none(), "duplicate field name {}", field.name);
            assert!(dup_code.is_none(), "duplicate field code for {}", field.name);
        }
        Self { by_name, by_code }
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&'static FieldDefinition> {
        self.by_name.get(name).copied()
    }

    /// Look up a field by its `(type code, field code)` pair.
    pub fn get_by_code(&self, type_code: u16, field_code: u16) -> Option<&'static FieldDefinition> {
        self.by_code.get(&(type_code, field_code)).copied()
    }

    /// Number of defined fields.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

static TABLE: Lazy<FieldTable> = Lazy::new(FieldTable::build);

/// The shared field table.
pub fn table() -> &'static FieldTable {
    &TABLE
}

/// Look up a field by name, failing with `UnknownField`.
pub fn lookup(name: &str) -> Result<&'static FieldDefinition> {
    TABLE
        .get(name)
        .ok_or_else(|| CoreError::UnknownField(name.to_string()))
}

/// Look up a field by its code pair.
pub fn lookup_by_code(type_code: u16, field_code: u16) -> Option<&'static FieldDefinition> {
    TABLE.get_by_code(type_code, field_code)
}

/// The serialization sort key of a definition.
pub fn sort_key(definition: &FieldDefinition) -> (u16, u16) {
    definition.sort_key()
}

/// All definitions in declaration order.
pub fn definitions() -> impl Iterator<Item = &'static FieldDefinition> {
    FIELDS.iter()
}

/// The `TransactionType` code for a transaction name.
pub fn transaction_type_code(name: &str) -> Result<u16> {
    TRANSACTION_TYPES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
        .ok_or_else(|| CoreError::InvalidValue(format!("unknown transaction type {}", name)))
}

/// The transaction name for a `TransactionType` code.
pub fn transaction_type_name(code: u16) -> Option<&'static str> {
    TRANSACTION_TYPES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| *name)
}

/// The `LedgerEntryType` code for a ledger entry name.
pub fn ledger_entry_type_code(name: &str) -> Result<u16> {
    LEDGER_ENTRY_TYPES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
        .ok_or_else(|| CoreError::InvalidValue(format!("unknown ledger entry type {}", name)))
}

/// The ledger entry name for a `LedgerEntryType` code.
pub fn ledger_entry_type_name(code: u16) -> Option<&'static str> {
    LEDGER_ENTRY_TYPES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| *name)
}
