//! Low-level binary primitives: field headers, length prefixes and a
//! bounds-checked reader.
//!
//! Field header layout:
//!
//! | type | field | bytes                      |
//! |------|-------|----------------------------|
//! | < 16 | < 16  | `type << 4 \| field`       |
//! | < 16 | >= 16 | `type << 4`, `field`       |
//! | >= 16| < 16  | `field`, `type`            |
//! | >= 16| >= 16 | `0x00`, `type`, `field`    |
//!
//! Length prefixes use one byte up to 192, two bytes up to 12480 and three
//! bytes up to 918744.

use bytes::{BufMut, BytesMut};

use crate::error::{CoreError, Result};

/// Largest length a single-byte prefix can carry.
pub const MAX_SINGLE_BYTE_LENGTH: usize = 192;

/// Largest length a two-byte prefix can carry.
pub const MAX_DOUBLE_BYTE_LENGTH: usize = 12480;

/// Largest length a three-byte prefix can carry, and the protocol maximum.
pub const MAX_TRIPLE_BYTE_LENGTH: usize = 918744;

/// Write a field header.
pub fn encode_field_header(buf: &mut BytesMut, type_code: u16, field_code: u16) -> Result<()> {
    if type_code == 0 || field_code == 0 || type_code > 255 || field_code > 255 {
        return Err(CoreError::InvalidValue(format!(
            "field code pair ({}, {}) has no header encoding",
            type_code, field_code
        )));
    }
    let (t, f) = (type_code as u8, field_code as u8);
    match (t < 16, f < 16) {
        (true, true) => buf.put_u8((t << 4) | f),
        (true, false) => {
            buf.put_u8(t << 4);
            buf.put_u8(f);
        }
        (false, true) => {
            buf.put_u8(f);
            buf.put_u8(t);
        }
        (false, false) => {
            buf.put_u8(0);
            buf.put_u8(t);
            buf.put_u8(f);
        }
    }
    Ok(())
}

/// Write a variable-length prefix.
pub fn encode_length(buf: &mut BytesMut, length: usize) -> Result<()> {
    if length <= MAX_SINGLE_BYTE_LENGTH {
        buf.put_u8(length as u8);
    } else if length <= MAX_DOUBLE_BYTE_LENGTH {
        let n = length - (MAX_SINGLE_BYTE_LENGTH + 1);
        buf.put_u8(193 + (n >> 8) as u8);
        buf.put_u8((n & 0xff) as u8);
    } else if length <= MAX_TRIPLE_BYTE_LENGTH {
        let n = length - (MAX_DOUBLE_BYTE_LENGTH + 1);
        buf.put_u8(241 + (n >> 16) as u8);
        buf.put_u8(((n >> 8) & 0xff) as u8);
        buf.put_u8((n & 0xff) as u8);
    } else {
        return Err(CoreError::LengthOverflow(length));
    }
    Ok(())
}

/// Write `length || bytes`.
pub fn encode_vl(buf: &mut BytesMut, bytes: &[u8]) -> Result<()> {
    encode_length(buf, bytes.len())?;
    buf.put_slice(bytes);
    Ok(())
}

/// A bounds-checked cursor over canonical bytes.
#[derive(Debug, Clone)]
pub struct BinaryParser<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryParser<'a> {
    /// Start reading at the beginning of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The bytes consumed since offset `start`.
    pub fn consumed_since(&self, start: usize) -> &'a [u8] {
        self.data.get(start..self.pos).unwrap_or(&[])
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Read `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(CoreError::TruncatedInput {
                offset: self.pos,
                needed: n - self.remaining(),
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Read a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    /// Read a field header, returning `(type code, field code)`.
    pub fn read_field_header(&mut self) -> Result<(u16, u16)> {
        let first = self.read_u8()?;
        let mut type_code = u16::from(first >> 4);
        let mut field_code = u16::from(first & 0x0f);

        if type_code == 0 {
            type_code = u16::from(self.read_u8()?);
            if type_code < 16 {
                return Err(CoreError::InvalidValue(format!(
                    "non-canonical field header: type code {} in extended form",
                    type_code
                )));
            }
        }
        if field_code == 0 {
            field_code = u16::from(self.read_u8()?);
            if field_code < 16 {
                return Err(CoreError::InvalidValue(format!(
                    "non-canonical field header: field code {} in extended form",
                    field_code
                )));
            }
        }
        Ok((type_code, field_code))
    }

    /// Read a variable-length prefix.
    pub fn read_length_prefix(&mut self) -> Result<usize> {
        let b1 = usize::from(self.read_u8()?);
        let length = match b1 {
            0..=192 => b1,
            193..=240 => {
                let b2 = usize::from(self.read_u8()?);
                MAX_SINGLE_BYTE_LENGTH + 1 + (b1 - 193) * 256 + b2
            }
            241..=254 => {
                let b2 = usize::from(self.read_u8()?);
                let b3 = usize::from(self.read_u8()?);
                MAX_DOUBLE_BYTE_LENGTH + 1 + (b1 - 241) * 65536 + b2 * 256 + b3
            }
            _ => {
                return Err(CoreError::InvalidValue(format!(
                    "invalid length prefix byte {:#04x}",
                    b1
                )))
            }
        };
        if length > MAX_TRIPLE_BYTE_LENGTH {
            return Err(CoreError::LengthOverflow(length));
        }
        Ok(length)
    }

    /// Read `length || bytes`.
    pub fn read_vl(&mut self) -> Result<&'a [u8]> {
        let length = self.read_length_prefix()?;
        self.read_bytes(length)
    }
}
