//! Proptest generators for property-based testing.

use proptest::prelude::*;

use xrpl_engine_core::{
    AccountId, Amount, Currency, FieldValue, Hash256, IssuedAmount, IssuedValue,
    SerializableObject,
};
use xrpl_engine_crypto::{KeyType, PrivateKey};

/// Generate a random AccountId.
pub fn account_id() -> impl Strategy<Value = AccountId> {
    any::<[u8; 20]>().prop_map(AccountId)
}

/// Generate a random Hash256.
pub fn hash256() -> impl Strategy<Value = Hash256> {
    any::<[u8; 32]>().prop_map(Hash256)
}

/// Generate a key type.
pub fn key_type() -> impl Strategy<Value = KeyType> {
    prop_oneof![Just(KeyType::Ed25519), Just(KeyType::Secp256k1)]
}

/// Generate a random private key.
///
/// Secrets that are not valid secp256k1 scalars (zero, or at least the
/// group order) are vanishingly rare and filtered out.
pub fn private_key() -> impl Strategy<Value = PrivateKey> {
    (any::<[u8; 32]>(), key_type())
        .prop_filter_map("invalid secret", |(seed, kind)| {
            PrivateKey::from_slice(&seed, kind).ok()
        })
}

/// Generate an XRP amount within the protocol's drop limit.
pub fn xrp_amount() -> impl Strategy<Value = Amount> {
    (0u64..=100_000_000_000_000_000u64).prop_map(Amount::Xrp)
}

/// Generate a three-letter currency code.
pub fn currency() -> impl Strategy<Value = Currency> {
    "[A-Z]{3}".prop_filter_map("XRP is not an issued currency", |code| {
        Currency::from_code(&code).ok()
    })
}

/// Generate a normalized issued value.
pub fn issued_value() -> impl Strategy<Value = IssuedValue> {
    (any::<bool>(), 1u64..10_000_000_000_000_000u64, -90i32..=70i32)
        .prop_filter_map("out of range", |(negative, mantissa, exponent)| {
            IssuedValue::new(negative, mantissa, exponent).ok()
        })
}

/// Generate an issued-currency amount.
pub fn issued_amount() -> impl Strategy<Value = Amount> {
    (issued_value(), currency(), account_id()).prop_map(|(value, currency, issuer)| {
        Amount::Issued(IssuedAmount {
            value,
            currency,
            issuer,
        })
    })
}

/// Generate any amount.
pub fn amount() -> impl Strategy<Value = Amount> {
    prop_oneof![xrp_amount(), issued_amount()]
}

/// Generate blob bytes of specified max length.
pub fn blob(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Parameters for a payment-like transaction.
#[derive(Debug, Clone)]
pub struct TransactionParams {
    pub account: AccountId,
    pub destination: AccountId,
    pub amount: Amount,
    pub fee: u64,
    pub sequence: u32,
    pub flags: u32,
    pub destination_tag: Option<u32>,
    pub invoice_id: Option<Hash256>,
    pub memo: Option<Vec<u8>>,
}

impl Arbitrary for TransactionParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            account_id(),
            account_id(),
            amount(),
            1u64..=1_000_000u64, // fee
            any::<u32>(),
            any::<u32>(),
            any::<Option<u32>>(),
            proptest::option::of(hash256()),
            proptest::option::of(blob(300)),
        )
            .prop_map(
                |(account, destination, amount, fee, sequence, flags, tag, invoice, memo)| {
                    TransactionParams {
                        account,
                        destination,
                        amount,
                        fee,
                        sequence,
                        flags,
                        destination_tag: tag,
                        invoice_id: invoice,
                        memo,
                    }
                },
            )
            .boxed()
    }
}

/// Build a Payment object from parameters.
pub fn transaction_from_params(params: &TransactionParams) -> SerializableObject {
    let mut tx = SerializableObject::new()
        .with("TransactionType", 0u16)
        .with("Account", params.account)
        .with("Destination", params.destination)
        .with("Amount", params.amount.clone())
        .with("Fee", Amount::drops(params.fee))
        .with("Sequence", params.sequence)
        .with("Flags", params.flags);

    if let Some(tag) = params.destination_tag {
        tx.insert("DestinationTag", tag);
    }
    if let Some(invoice) = params.invoice_id {
        tx.insert("InvoiceID", invoice);
    }
    if let Some(memo) = &params.memo {
        let memo = SerializableObject::new().with("MemoData", memo.clone());
        tx.insert(
            "Memos",
            FieldValue::Array(vec![SerializableObject::wrap("Memo", memo)]),
        );
    }
    tx
}
