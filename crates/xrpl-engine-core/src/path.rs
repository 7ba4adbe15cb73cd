//! Payment path sets.
//!
//! A path set is a list of paths; a path is a list of steps. On the wire each
//! step starts with a type byte whose bits say which of account, currency and
//! issuer follow. Paths are separated by `0xFF` and the set ends with `0x00`.

use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};

use crate::amount::Currency;
use crate::binary::BinaryParser;
use crate::error::{CoreError, Result};
use crate::types::AccountId;

const STEP_ACCOUNT: u8 = 0x01;
const STEP_CURRENCY: u8 = 0x10;
const STEP_ISSUER: u8 = 0x20;
const PATH_SEPARATOR: u8 = 0xFF;
const PATH_SET_END: u8 = 0x00;

/// One hop of a payment path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PathStep {
    pub account: Option<AccountId>,
    pub currency: Option<Currency>,
    pub issuer: Option<AccountId>,
}

impl PathStep {
    /// A step through an account.
    pub fn account(account: AccountId) -> Self {
        Self {
            account: Some(account),
            ..Self::default()
        }
    }

    /// A step through an order book.
    pub fn book(currency: Currency, issuer: Option<AccountId>) -> Self {
        Self {
            account: None,
            currency: Some(currency),
            issuer,
        }
    }

    fn type_byte(&self) -> u8 {
        let mut t = 0;
        if self.account.is_some() {
            t |= STEP_ACCOUNT;
        }
        if self.currency.is_some() {
            t |= STEP_CURRENCY;
        }
        if self.issuer.is_some() {
            t |= STEP_ISSUER;
        }
        t
    }
}

/// A single path.
pub type Path = Vec<PathStep>;

/// An ordered set of alternative paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PathSet(pub Vec<Path>);

impl PathSet {
    pub fn new(paths: Vec<Path>) -> Self {
        Self(paths)
    }

    pub fn paths(&self) -> &[Path] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append the wire form.
    pub fn encode_to(&self, buf: &mut BytesMut) -> Result<()> {
        for (i, path) in self.0.iter().enumerate() {
            if path.is_empty() {
                return Err(CoreError::InvalidValue(format!("path {} has no steps", i)));
            }
            if i > 0 {
                buf.put_u8(PATH_SEPARATOR);
            }
            for step in path {
                let t = step.type_byte();
                if t == 0 {
                    return Err(CoreError::InvalidValue("empty path step".into()));
                }
                buf.put_u8(t);
                if let Some(account) = &step.account {
                    buf.put_slice(account.as_bytes());
                }
                if let Some(currency) = &step.currency {
                    buf.put_slice(&currency.0);
                }
                if let Some(issuer) = &step.issuer {
                    buf.put_slice(issuer.as_bytes());
                }
            }
        }
        buf.put_u8(PATH_SET_END);
        Ok(())
    }

    /// Read the wire form.
    pub fn decode_from(parser: &mut BinaryParser<'_>) -> Result<Self> {
        let mut paths = Vec::new();
        let mut current: Path = Vec::new();
        loop {
            let t = parser.read_u8()?;
            match t {
                PATH_SET_END => {
                    // A lone end marker is the empty set.
                    if current.is_empty() && paths.is_empty() {
                        break;
                    }
                    if current.is_empty() {
                        return Err(CoreError::InvalidValue("empty path in path set".into()));
                    }
                    paths.push(current);
                    break;
                }
                PATH_SEPARATOR => {
                    if current.is_empty() {
                        return Err(CoreError::InvalidValue("empty path in path set".into()));
                    }
                    paths.push(std::mem::take(&mut current));
                }
                _ => {
                    if t & !(STEP_ACCOUNT | STEP_CURRENCY | STEP_ISSUER) != 0 {
                        return Err(CoreError::InvalidValue(format!(
                            "invalid path step type 0x{:02x}",
                            t
                        )));
                    }
                    let mut step = PathStep::default();
                    if t & STEP_ACCOUNT != 0 {
                        step.account = Some(AccountId(parser.read_array()?));
                    }
                    if t & STEP_CURRENCY != 0 {
                        step.currency = Some(Currency(parser.read_array()?));
                    }
                    if t & STEP_ISSUER != 0 {
                        step.issuer = Some(AccountId(parser.read_array()?));
                    }
                    current.push(step);
                }
            }
        }
        Ok(Self(paths))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(last: u8) -> AccountId {
        let mut bytes = [0u8; 20];
        bytes[19] = last;
        AccountId(bytes)
    }

    #[test]
    fn test_path_set_layout() {
        let usd = Currency::from_code("USD").unwrap();
        let set = PathSet::new(vec![
            vec![PathStep::account(account(1))],
            vec![PathStep::book(usd, Some(account(2)))],
        ]);
        let mut buf = BytesMut::new();
        set.encode_to(&mut buf).unwrap();

        // type + account, separator, type + currency + issuer, end
        assert_eq!(buf.len(), 1 + 20 + 1 + 1 + 20 + 20 + 1);
        assert_eq!(buf[0], STEP_ACCOUNT);
        assert_eq!(buf[21], PATH_SEPARATOR);
        assert_eq!(buf[22], STEP_CURRENCY | STEP_ISSUER);
        assert_eq!(buf[buf.len() - 1], PATH_SET_END);

        let mut parser = BinaryParser::new(&buf);
        assert_eq!(PathSet::decode_from(&mut parser).unwrap(), set);
        assert!(parser.is_empty());
    }

    #[test]
    fn test_empty_path_set() {
        let mut buf = BytesMut::new();
        PathSet::default().encode_to(&mut buf).unwrap();
        assert_eq!(&buf[..], &[0x00]);
        let decoded = PathSet::decode_from(&mut BinaryParser::new(&buf)).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_rejects_empty_path() {
        let one = vec![PathStep::account(account(1))];
        for set in [
            PathSet::new(vec![vec![]]),
            PathSet::new(vec![one.clone(), vec![]]),
            PathSet::new(vec![vec![], one]),
        ] {
            let mut buf = BytesMut::new();
            assert!(matches!(set.encode_to(&mut buf), Err(CoreError::InvalidValue(_))));
        }

        assert!(PathSet::decode_from(&mut BinaryParser::new(&[0xFF, 0x00])).is_err());
        let mut step_then_gap = vec![STEP_ACCOUNT];
        step_then_gap.extend_from_slice(&[0u8; 20]);
        step_then_gap.extend_from_slice(&[PATH_SEPARATOR, PATH_SET_END]);
        assert!(PathSet::decode_from(&mut BinaryParser::new(&step_then_gap)).is_err());
    }

    #[test]
    fn test_rejects_bad_step() {
        let mut buf = BytesMut::new();
        let set = PathSet::new(vec![vec![PathStep::default()]]);
        assert!(set.encode_to(&mut buf).is_err());

        assert!(PathSet::decode_from(&mut BinaryParser::new(&[0x02, 0x00])).is_err());
        assert!(PathSet::decode_from(&mut BinaryParser::new(&[0x01, 0xAA])).is_err());
    }
}
