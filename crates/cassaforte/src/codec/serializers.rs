//! Fixed-format value serializers.
//!
//! Each serializer is a stateless two-way conversion between a Rust value and
//! its wire bytes. Malformed input is an error, never a silent default.

use crate::error::{CqlError, CqlResult};
use bytes::{BufMut, Bytes, BytesMut};

/// Two-way conversion between `T` and its serialized bytes.
pub trait Serializer<T> {
    /// Wire type name, used in error messages.
    fn type_name(&self) -> &'static str;

    fn to_bytes(&self, value: &T) -> CqlResult<Bytes>;

    fn from_bytes(&self, bytes: &[u8]) -> CqlResult<T>;

    /// Serialize into an owned `Vec<u8>`.
    fn to_vec(&self, value: &T) -> CqlResult<Vec<u8>> {
        Ok(self.to_bytes(value)?.to_vec())
    }
}

fn fixed<const N: usize>(type_name: &str, bytes: &[u8]) -> CqlResult<[u8; N]> {
    bytes.try_into().map_err(|_| {
        CqlError::codec(
            type_name,
            format!("expected {N} bytes, got {}", bytes.len()),
        )
    })
}

/// 32-bit big-endian signed integer (`int`).
#[derive(Debug, Clone, Copy, Default)]
pub struct IntSerializer;

impl Serializer<i32> for IntSerializer {
    fn type_name(&self) -> &'static str {
        "int"
    }

    fn to_bytes(&self, value: &i32) -> CqlResult<Bytes> {
        Ok(Bytes::copy_from_slice(&value.to_be_bytes()))
    }

    fn from_bytes(&self, bytes: &[u8]) -> CqlResult<i32> {
        fixed::<4>(self.type_name(), bytes).map(i32::from_be_bytes)
    }
}

/// 64-bit big-endian signed integer (`bigint`, `counter`).
///
/// Decoding also accepts a 4-byte `int` and widens it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongSerializer;

impl Serializer<i64> for LongSerializer {
    fn type_name(&self) -> &'static str {
        "bigint"
    }

    fn to_bytes(&self, value: &i64) -> CqlResult<Bytes> {
        Ok(Bytes::copy_from_slice(&value.to_be_bytes()))
    }

    fn from_bytes(&self, bytes: &[u8]) -> CqlResult<i64> {
        match bytes.len() {
            4 => IntSerializer.from_bytes(bytes).map(i64::from),
            _ => fixed::<8>(self.type_name(), bytes).map(i64::from_be_bytes),
        }
    }
}

/// Single byte, `1` for true (`boolean`).
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanSerializer;

impl Serializer<bool> for BooleanSerializer {
    fn type_name(&self) -> &'static str {
        "boolean"
    }

    fn to_bytes(&self, value: &bool) -> CqlResult<Bytes> {
        Ok(Bytes::from_static(if *value { &[1] } else { &[0] }))
    }

    fn from_bytes(&self, bytes: &[u8]) -> CqlResult<bool> {
        match bytes.first() {
            Some(b) => Ok(*b == 1),
            None => Err(CqlError::codec(self.type_name(), "expected 1 byte, got 0")),
        }
    }
}

/// UTF-8 text (`text`, `varchar`).
#[derive(Debug, Clone, Copy, Default)]
pub struct StringSerializer;

impl Serializer<String> for StringSerializer {
    fn type_name(&self) -> &'static str {
        "text"
    }

    fn to_bytes(&self, value: &String) -> CqlResult<Bytes> {
        Ok(Bytes::copy_from_slice(value.as_bytes()))
    }

    fn from_bytes(&self, bytes: &[u8]) -> CqlResult<String> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| CqlError::codec(self.type_name(), e.to_string()))
    }
}

/// US-ASCII text (`ascii`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiSerializer;

impl AsciiSerializer {
    fn check(&self, bytes: &[u8]) -> CqlResult<()> {
        match bytes.iter().position(|b| !b.is_ascii()) {
            Some(pos) => Err(CqlError::codec(
                self.type_name(),
                format!("non-ASCII byte at offset {pos}"),
            )),
            None => Ok(()),
        }
    }
}

impl Serializer<String> for AsciiSerializer {
    fn type_name(&self) -> &'static str {
        "ascii"
    }

    fn to_bytes(&self, value: &String) -> CqlResult<Bytes> {
        self.check(value.as_bytes())?;
        Ok(Bytes::copy_from_slice(value.as_bytes()))
    }

    fn from_bytes(&self, bytes: &[u8]) -> CqlResult<String> {
        self.check(bytes)?;
        // ASCII is valid UTF-8.
        String::from_utf8(bytes.to_vec())
            .map_err(|e| CqlError::codec(self.type_name(), e.to_string()))
    }
}

/// Arbitrary-precision integer in minimal big-endian two's complement (`varint`).
///
/// Values are limited to 128 bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct VarintSerializer;

impl Serializer<i128> for VarintSerializer {
    fn type_name(&self) -> &'static str {
        "varint"
    }

    fn to_bytes(&self, value: &i128) -> CqlResult<Bytes> {
        let full = value.to_be_bytes();
        let negative = *value < 0;
        let pad = if negative { 0xFF } else { 0x00 };

        // Drop redundant sign bytes, keeping one if the next byte's top bit
        // would flip the sign.
        let mut start = 0;
        while start < full.len() - 1
            && full[start] == pad
            && ((full[start + 1] & 0x80 != 0) == negative)
        {
            start += 1;
        }

        let mut out = BytesMut::with_capacity(full.len() - start);
        out.put_slice(&full[start..]);
        Ok(out.freeze())
    }

    fn from_bytes(&self, bytes: &[u8]) -> CqlResult<i128> {
        if bytes.is_empty() {
            return Err(CqlError::codec(self.type_name(), "empty varint"));
        }
        if bytes.len() > 16 {
            return Err(CqlError::codec(
                self.type_name(),
                format!("{} bytes exceeds 128-bit range", bytes.len()),
            ));
        }
        let pad = if bytes[0] & 0x80 != 0 { 0xFF } else { 0x00 };
        let mut full = [pad; 16];
        full[16 - bytes.len()..].copy_from_slice(bytes);
        Ok(i128::from_be_bytes(full))
    }
}
