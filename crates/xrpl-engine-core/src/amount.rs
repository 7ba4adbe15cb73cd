//! Amounts: native XRP drops and issued-currency values.
//!
//! Native amounts are 8 bytes: bit 63 clear, bit 62 set for positive, and
//! the drop count in the low 62 bits. Issued amounts are 48 bytes: an
//! 8-byte value, a 20-byte currency code and the 20-byte issuer. The value
//! carries bit 63 set, bit 62 as the sign, an 8-bit exponent biased by 97,
//! and a 54-bit mantissa normalized into `[10^15, 10^16)`.

use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::binary::BinaryParser;
use crate::error::{CoreError, Result};
use crate::types::AccountId;

/// Maximum number of drops: 100 billion XRP.
pub const MAX_DROPS: u64 = 100_000_000_000_000_000;

const NOT_NATIVE_BIT: u64 = 0x8000_0000_0000_0000;
const POSITIVE_BIT: u64 = 0x4000_0000_0000_0000;
const MPT_BIT: u64 = 0x2000_0000_0000_0000;
const MANTISSA_MASK: u64 = (1 << 54) - 1;
const MIN_MANTISSA: u64 = 1_000_000_000_000_000;
const MAX_MANTISSA: u64 = 9_999_999_999_999_999;
const MIN_EXPONENT: i32 = -96;
const MAX_EXPONENT: i32 = 80;
const EXPONENT_BIAS: i32 = 97;
const MAX_PRECISION: usize = 16;

/// A 160-bit currency code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Currency(pub [u8; 20]);

impl Currency {
    /// The all-zero code, reserved for XRP.
    pub const XRP: Self = Self([0u8; 20]);

    /// Parse a 3-character standard code or 40 hex characters.
    pub fn from_code(code: &str) -> Result<Self> {
        if code.len() == 3 {
            if code == "XRP" {
                return Err(CoreError::InvalidValue(
                    "XRP is not a valid issued currency code".into(),
                ));
            }
            if !code.chars().all(is_standard_code_char) {
                return Err(CoreError::InvalidValue(format!(
                    "invalid standard currency code {:?}",
                    code
                )));
            }
            let mut bytes = [0u8; 20];
            bytes[12..15].copy_from_slice(code.as_bytes());
            return Ok(Self(bytes));
        }

        let raw = hex::decode(code)
            .map_err(|_| CoreError::InvalidValue(format!("invalid currency code {:?}", code)))?;
        let bytes: [u8; 20] = raw.as_slice().try_into().map_err(|_| {
            CoreError::InvalidValue(format!("currency code must be 20 bytes, got {}", raw.len()))
        })?;
        Ok(Self(bytes))
    }

    /// Whether this is the XRP code.
    pub fn is_xrp(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// The 3-character form, if this is a standard code.
    pub fn standard_code(&self) -> Option<&str> {
        let b = &self.0;
        let zero_outside =
            b[..12].iter().all(|&x| x == 0) && b[15..].iter().all(|&x| x == 0);
        if !zero_outside || self.is_xrp() {
            return None;
        }
        let code = std::str::from_utf8(&b[12..15]).ok()?;
        if code.chars().all(is_standard_code_char) && code != "XRP" {
            Some(code)
        } else {
            None
        }
    }
}

fn is_standard_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "?!@#$%^&*<>(){}[]|".contains(c)
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.standard_code() {
            Some(code) => f.write_str(code),
            None if self.is_xrp() => f.write_str("XRP"),
            None => f.write_str(&hex::encode_upper(self.0)),
        }
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({})", self)
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_code(s)
    }
}

/// An exact decimal value of an issued currency.
///
/// Always normalized: zero is `(false, 0, 0)`, anything else has a 16-digit
/// mantissa and an exponent in `[-96, 80]`. Two equal values therefore
/// compare equal field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawIssuedValue")]
pub struct IssuedValue {
    negative: bool,
    mantissa: u64,
    exponent: i32,
}

/// Deserialized fields, normalized through [`IssuedValue::new`].
#[derive(Deserialize)]
struct RawIssuedValue {
    negative: bool,
    mantissa: u64,
    exponent: i32,
}

impl TryFrom<RawIssuedValue> for IssuedValue {
    type Error = CoreError;

    fn try_from(raw: RawIssuedValue) -> Result<Self> {
        Self::new(raw.negative, raw.mantissa, raw.exponent)
    }
}

impl IssuedValue {
    /// Zero.
    pub const ZERO: Self = Self {
        negative: false,
        mantissa: 0,
        exponent: 0,
    };

    /// Build from a mantissa and exponent, normalizing.
    pub fn new(negative: bool, mantissa: u64, exponent: i32) -> Result<Self> {
        if mantissa == 0 {
            return Ok(Self::ZERO);
        }
        let out_of_range = || {
            CoreError::InvalidValue(format!(
                "exponent {} outside [{}, {}]",
                exponent, MIN_EXPONENT, MAX_EXPONENT
            ))
        };
        let mut m = mantissa;
        let mut e = exponent;
        while m < MIN_MANTISSA {
            m *= 10;
            e = e.checked_sub(1).ok_or_else(out_of_range)?;
        }
        while m > MAX_MANTISSA {
            if m % 10 != 0 {
                return Err(CoreError::InvalidValue(format!(
                    "mantissa {} exceeds {} significant digits",
                    mantissa, MAX_PRECISION
                )));
            }
            m /= 10;
            e = e.checked_add(1).ok_or_else(out_of_range)?;
        }
        if !(MIN_EXPONENT..=MAX_EXPONENT).contains(&e) {
            return Err(CoreError::InvalidValue(format!(
                "exponent {} outside [{}, {}]",
                e, MIN_EXPONENT, MAX_EXPONENT
            )));
        }
        Ok(Self {
            negative,
            mantissa: m,
            exponent: e,
        })
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn mantissa(&self) -> u64 {
        self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    /// The 64-bit wire form.
    pub fn to_bits(&self) -> u64 {
        if self.is_zero() {
            return NOT_NATIVE_BIT;
        }
        let sign = if self.negative { 0 } else { POSITIVE_BIT };
        let exponent = (self.exponent + EXPONENT_BIAS) as u64;
        NOT_NATIVE_BIT | sign | (exponent << 54) | self.mantissa
    }

    /// Parse the 64-bit wire form.
    pub fn from_bits(bits: u64) -> Result<Self> {
        if bits & NOT_NATIVE_BIT == 0 {
            return Err(CoreError::InvalidValue("not an issued value".into()));
        }
        let mantissa = bits & MANTISSA_MASK;
        if mantissa == 0 {
            return Ok(Self::ZERO);
        }
        if !(MIN_MANTISSA..=MAX_MANTISSA).contains(&mantissa) {
            return Err(CoreError::InvalidValue(format!(
                "non-canonical issued mantissa {}",
                mantissa
            )));
        }
        let exponent = ((bits >> 54) & 0xff) as i32 - EXPONENT_BIAS;
        if !(MIN_EXPONENT..=MAX_EXPONENT).contains(&exponent) {
            return Err(CoreError::InvalidValue(format!(
                "issued exponent {} out of range",
                exponent
            )));
        }
        Ok(Self {
            negative: bits & POSITIVE_BIT == 0,
            mantissa,
            exponent,
        })
    }
}

impl FromStr for IssuedValue {
    type Err = CoreError;

    /// Parse decimal text such as `"1"`, `"-0.25"` or `"1.5e-3"`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidValue(format!("invalid decimal value {:?}", s));

        let (negative, rest) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (number, exp_part) = match rest.find(|c: char| c == 'e' || c == 'E') {
            Some(i) => (&rest[..i], Some(&rest[i + 1..])),
            None => (rest, None),
        };
        let mut exponent: i32 = match exp_part {
            Some(e) => e.parse().map_err(|_| invalid())?,
            None => 0,
        };
        let (int_part, frac_part) = match number.split_once('.') {
            Some((i, f)) => (i, f),
            None => (number, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        exponent = i32::try_from(frac_part.len())
            .ok()
            .and_then(|n| exponent.checked_sub(n))
            .ok_or_else(invalid)?;
        let digits: String = int_part.chars().chain(frac_part.chars()).collect();
        let digits = digits.trim_start_matches('0');
        let trimmed = digits.trim_end_matches('0');
        if trimmed.is_empty() {
            return Ok(Self::ZERO);
        }
        exponent = i32::try_from(digits.len() - trimmed.len())
            .ok()
            .and_then(|n| exponent.checked_add(n))
            .ok_or_else(invalid)?;
        if trimmed.len() > MAX_PRECISION {
            return Err(CoreError::InvalidValue(format!(
                "{:?} exceeds {} significant digits",
                s, MAX_PRECISION
            )));
        }
        let mantissa: u64 = trimmed.parse().map_err(|_| invalid())?;
        Self::new(negative, mantissa, exponent)
    }
}

impl fmt::Display for IssuedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        let mut digits = self.mantissa.to_string();
        let mut exponent = self.exponent;
        while digits.ends_with('0') {
            digits.pop();
            exponent += 1;
        }
        if self.negative {
            f.write_str("-")?;
        }
        if exponent >= 0 {
            write!(f, "{}{}", digits, "0".repeat(exponent as usize))
        } else {
            let point = digits.len() as i32 + exponent;
            if point > 0 {
                let (int, frac) = digits.split_at(point as usize);
                write!(f, "{}.{}", int, frac)
            } else {
                write!(f, "0.{}{}", "0".repeat((-point) as usize), digits)
            }
        }
    }
}

/// An issued-currency amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssuedAmount {
    pub value: IssuedValue,
    pub currency: Currency,
    pub issuer: AccountId,
}

/// Any amount field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Amount {
    /// Native XRP, in drops.
    Xrp(u64),
    /// An issued currency.
    Issued(IssuedAmount),
}

impl Amount {
    /// A native amount in drops.
    pub const fn drops(drops: u64) -> Self {
        Self::Xrp(drops)
    }

    /// An issued amount from decimal text, a currency code and an issuer.
    pub fn issued(value: &str, currency: &str, issuer: AccountId) -> Result<Self> {
        Ok(Self::Issued(IssuedAmount {
            value: value.parse()?,
            currency: Currency::from_code(currency)?,
            issuer,
        }))
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Xrp(_))
    }

    /// Append the wire form.
    pub fn encode_to(&self, buf: &mut BytesMut) -> Result<()> {
        match self {
            Self::Xrp(drops) => {
                if *drops > MAX_DROPS {
                    return Err(CoreError::InvalidValue(format!(
                        "{} drops exceeds the maximum of {}",
                        drops, MAX_DROPS
                    )));
                }
                buf.put_u64(POSITIVE_BIT | drops);
            }
            Self::Issued(issued) => {
                if issued.currency.is_xrp() {
                    return Err(CoreError::InvalidValue(
                        "issued amount cannot use the XRP currency code".into(),
                    ));
                }
                buf.put_u64(issued.value.to_bits());
                buf.put_slice(&issued.currency.0);
                buf.put_slice(issued.issuer.as_bytes());
            }
        }
        Ok(())
    }

    /// Read the wire form.
    pub fn decode_from(parser: &mut BinaryParser<'_>) -> Result<Self> {
        let bits = parser.read_u64()?;
        if bits & NOT_NATIVE_BIT == 0 {
            if bits & MPT_BIT != 0 {
                return Err(CoreError::InvalidValue(
                    "multi-purpose token amounts are not supported".into(),
                ));
            }
            if bits & POSITIVE_BIT == 0 {
                return Err(CoreError::InvalidValue("negative XRP amount".into()));
            }
            let drops = bits & !POSITIVE_BIT;
            if drops > MAX_DROPS {
                return Err(CoreError::InvalidValue(format!(
                    "{} drops exceeds the maximum of {}",
                    drops, MAX_DROPS
                )));
            }
            return Ok(Self::Xrp(drops));
        }

        let value = IssuedValue::from_bits(bits)?;
        let currency = Currency(parser.read_array()?);
        let issuer = AccountId(parser.read_array()?);
        Ok(Self::Issued(IssuedAmount {
            value,
            currency,
            issuer,
        }))
    }
}
