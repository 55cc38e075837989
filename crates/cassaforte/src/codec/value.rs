//! Native values for the CQL type system.

use crate::error::{CqlError, CqlResult};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::net::IpAddr;
use uuid::Uuid;

/// A decoded CQL value.
///
/// `Text` covers both `text` and `varchar`.
#[derive(Debug, Clone, PartialEq)]
pub enum CqlValue {
    Ascii(String),
    BigInt(i64),
    Blob(Bytes),
    Boolean(bool),
    Counter(i64),
    #[cfg(feature = "rust_decimal")]
    Decimal(rust_decimal::Decimal),
    Double(f64),
    Float(f32),
    Inet(IpAddr),
    Int(i32),
    Text(String),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    TimeUuid(Uuid),
    Varint(i128),
    List(Vec<CqlValue>),
    Set(Vec<CqlValue>),
    Map(Vec<(CqlValue, CqlValue)>),
}

impl CqlValue {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            CqlValue::Ascii(_) => "ascii",
            CqlValue::BigInt(_) => "bigint",
            CqlValue::Blob(_) => "blob",
            CqlValue::Boolean(_) => "boolean",
            CqlValue::Counter(_) => "counter",
            #[cfg(feature = "rust_decimal")]
            CqlValue::Decimal(_) => "decimal",
            CqlValue::Double(_) => "double",
            CqlValue::Float(_) => "float",
            CqlValue::Inet(_) => "inet",
            CqlValue::Int(_) => "int",
            CqlValue::Text(_) => "text",
            CqlValue::Timestamp(_) => "timestamp",
            CqlValue::Uuid(_) => "uuid",
            CqlValue::TimeUuid(_) => "timeuuid",
            CqlValue::Varint(_) => "varint",
            CqlValue::List(_) => "list",
            CqlValue::Set(_) => "set",
            CqlValue::Map(_) => "map",
        }
    }

    /// Build a list from native elements.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CqlValue>,
    {
        CqlValue::List(items.into_iter().map(Into::into).collect())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CqlValue::Text(s) | CqlValue::Ascii(s) => Some(s),
            _ => None,
        }
    }
}

macro_rules! impl_from_native {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for CqlValue {
                fn from(v: $ty) -> Self {
                    CqlValue::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_native!(
    i32 => Int,
    i64 => BigInt,
    bool => Boolean,
    f32 => Float,
    f64 => Double,
    String => Text,
    &str => Text,
    Uuid => Uuid,
    DateTime<Utc> => Timestamp,
    IpAddr => Inet,
    Vec<u8> => Blob,
    Bytes => Blob,
);

fn mismatch(expected: &str, got: &CqlValue) -> CqlError {
    CqlError::codec(expected, format!("cannot convert {} value", got.kind()))
}

macro_rules! impl_try_from_value {
    ($ty:ty, $name:literal, $($pat:pat => $out:expr),+ $(,)?) => {
        impl TryFrom<CqlValue> for $ty {
            type Error = CqlError;

            fn try_from(value: CqlValue) -> CqlResult<Self> {
                match value {
                    $($pat => Ok($out),)+
                    other => Err(mismatch($name, &other)),
                }
            }
        }
    };
}

impl_try_from_value!(i32, "int", CqlValue::Int(v) => v);
impl_try_from_value!(i64, "bigint",
    CqlValue::BigInt(v) | CqlValue::Counter(v) => v,
    CqlValue::Int(v) => i64::from(v),
);
impl_try_from_value!(bool, "boolean", CqlValue::Boolean(v) => v);
impl_try_from_value!(f64, "double",
    CqlValue::Double(v) => v,
    CqlValue::Float(v) => f64::from(v),
);
impl_try_from_value!(String, "text", CqlValue::Text(v) | CqlValue::Ascii(v) => v);
impl_try_from_value!(Uuid, "uuid", CqlValue::Uuid(v) | CqlValue::TimeUuid(v) => v);
impl_try_from_value!(DateTime<Utc>, "timestamp", CqlValue::Timestamp(v) => v);
impl_try_from_value!(IpAddr, "inet", CqlValue::Inet(v) => v);
impl_try_from_value!(Vec<u8>, "blob", CqlValue::Blob(v) => v.to_vec());
