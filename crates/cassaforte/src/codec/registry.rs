//! Resolution of wire types to marshalling strategies.

use super::serializers::{
    AsciiSerializer, BooleanSerializer, IntSerializer, LongSerializer, Serializer,
    StringSerializer, VarintSerializer,
};
use super::types::DataType;
use super::value::CqlValue;
use crate::error::{CqlError, CqlResult};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use chrono::DateTime;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Encodes and decodes values of one wire type.
pub trait Marshal: Send + Sync + std::fmt::Debug {
    fn data_type(&self) -> &DataType;

    fn encode(&self, value: &CqlValue) -> CqlResult<Bytes>;

    fn decode(&self, bytes: &[u8]) -> CqlResult<CqlValue>;
}

/// Resolve the codec for `data_type`.
///
/// Fails for types this build cannot handle (e.g. `decimal` without the
/// `rust_decimal` feature).
pub fn codec_for(data_type: &DataType) -> CqlResult<Arc<dyn Marshal>> {
    let codec: Arc<dyn Marshal> = match data_type {
        DataType::List(element) | DataType::Set(element) => Arc::new(CollectionCodec {
            data_type: data_type.clone(),
            element: codec_for(element)?,
        }),
        DataType::Map(key, value) => Arc::new(MapCodec {
            data_type: data_type.clone(),
            key: codec_for(key)?,
            value: codec_for(value)?,
        }),
        #[cfg(not(feature = "rust_decimal"))]
        DataType::Decimal => {
            return Err(CqlError::codec(
                "decimal",
                "decimal support requires the `rust_decimal` feature",
            ));
        }
        primitive => Arc::new(PrimitiveCodec {
            data_type: primitive.clone(),
        }),
    };
    Ok(codec)
}

/// Caches resolved codecs by type.
#[derive(Debug, Default)]
pub struct CodecRegistry {
    codecs: RwLock<HashMap<DataType, Arc<dyn Marshal>>>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve eagerly so later lookups cannot fail for these types.
    pub fn with_types<'a>(types: impl IntoIterator<Item = &'a DataType>) -> CqlResult<Self> {
        let registry = Self::new();
        for ty in types {
            registry.get(ty)?;
        }
        Ok(registry)
    }

    /// The codec for `data_type`, resolving and caching it on first use.
    pub fn get(&self, data_type: &DataType) -> CqlResult<Arc<dyn Marshal>> {
        if let Some(codec) = self
            .codecs
            .read()
            .map_err(|_| CqlError::Other("codec registry lock poisoned".into()))?
            .get(data_type)
        {
            return Ok(Arc::clone(codec));
        }

        let codec = codec_for(data_type)?;
        let mut codecs = self
            .codecs
            .write()
            .map_err(|_| CqlError::Other("codec registry lock poisoned".into()))?;
        Ok(Arc::clone(
            codecs.entry(data_type.clone()).or_insert(codec),
        ))
    }

    pub fn encode(&self, data_type: &DataType, value: &CqlValue) -> CqlResult<Bytes> {
        self.get(data_type)?.encode(value)
    }

    pub fn decode(&self, data_type: &DataType, bytes: &[u8]) -> CqlResult<CqlValue> {
        self.get(data_type)?.decode(bytes)
    }

    pub fn len(&self) -> usize {
        self.codecs.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
struct PrimitiveCodec {
    data_type: DataType,
}

impl PrimitiveCodec {
    fn mismatch(&self, value: &CqlValue) -> CqlError {
        CqlError::codec(
            self.data_type.name(),
            format!("cannot encode {} value", value.kind()),
        )
    }

    fn err(&self, message: impl Into<String>) -> CqlError {
        CqlError::codec(self.data_type.name(), message)
    }
}

impl Marshal for PrimitiveCodec {
    fn data_type(&self) -> &DataType {
        &self.data_type
    }

    fn encode(&self, value: &CqlValue) -> CqlResult<Bytes> {
        match (&self.data_type, value) {
            (DataType::Ascii, CqlValue::Ascii(s) | CqlValue::Text(s)) => {
                AsciiSerializer.to_bytes(s)
            }
            (DataType::Text | DataType::Varchar, CqlValue::Text(s) | CqlValue::Ascii(s)) => {
                StringSerializer.to_bytes(s)
            }
            (DataType::BigInt, CqlValue::BigInt(v))
            | (DataType::Counter, CqlValue::Counter(v) | CqlValue::BigInt(v)) => {
                LongSerializer.to_bytes(v)
            }
            (DataType::Int, CqlValue::Int(v)) => IntSerializer.to_bytes(v),
            (DataType::Boolean, CqlValue::Boolean(v)) => BooleanSerializer.to_bytes(v),
            (DataType::Varint, CqlValue::Varint(v)) => VarintSerializer.to_bytes(v),
            (DataType::Blob, CqlValue::Blob(b)) => Ok(b.clone()),
            (DataType::Double, CqlValue::Double(v)) => {
                Ok(Bytes::copy_from_slice(&v.to_be_bytes()))
            }
            (DataType::Float, CqlValue::Float(v)) => Ok(Bytes::copy_from_slice(&v.to_be_bytes())),
            (DataType::Timestamp, CqlValue::Timestamp(ts)) => {
                LongSerializer.to_bytes(&ts.timestamp_millis())
            }
            (DataType::Uuid, CqlValue::Uuid(id)) => Ok(Bytes::copy_from_slice(id.as_bytes())),
            (DataType::TimeUuid, CqlValue::TimeUuid(id) | CqlValue::Uuid(id)) => {
                if id.get_version_num() != 1 {
                    return Err(self.err(format!("{id} is not a version 1 UUID")));
                }
                Ok(Bytes::copy_from_slice(id.as_bytes()))
            }
            (DataType::Inet, CqlValue::Inet(addr)) => Ok(match addr {
                IpAddr::V4(v4) => Bytes::copy_from_slice(&v4.octets()),
                IpAddr::V6(v6) => Bytes::copy_from_slice(&v6.octets()),
            }),
            #[cfg(feature = "rust_decimal")]
            (DataType::Decimal, CqlValue::Decimal(d)) => {
                let scale = i32::try_from(d.scale()).map_err(|e| self.err(e.to_string()))?;
                let unscaled = VarintSerializer.to_bytes(&d.mantissa())?;
                let mut out = BytesMut::with_capacity(4 + unscaled.len());
                out.put_i32(scale);
                out.put_slice(&unscaled);
                Ok(out.freeze())
            }
            (_, other) => Err(self.mismatch(other)),
        }
    }

    fn decode(&self, bytes: &[u8]) -> CqlResult<CqlValue> {
        let value = match &self.data_type {
            DataType::Ascii => CqlValue::Ascii(AsciiSerializer.from_bytes(bytes)?),
            DataType::Text | DataType::Varchar => {
                CqlValue::Text(StringSerializer.from_bytes(bytes)?)
            }
            DataType::BigInt => CqlValue::BigInt(LongSerializer.from_bytes(bytes)?),
            DataType::Counter => CqlValue::Counter(LongSerializer.from_bytes(bytes)?),
            DataType::Int => CqlValue::Int(IntSerializer.from_bytes(bytes)?),
            DataType::Boolean => CqlValue::Boolean(BooleanSerializer.from_bytes(bytes)?),
            DataType::Varint => CqlValue::Varint(VarintSerializer.from_bytes(bytes)?),
            DataType::Blob => CqlValue::Blob(Bytes::copy_from_slice(bytes)),
            DataType::Double => {
                let raw: [u8; 8] = bytes
                    .try_into()
                    .map_err(|_| self.err(format!("expected 8 bytes, got {}", bytes.len())))?;
                CqlValue::Double(f64::from_be_bytes(raw))
            }
            DataType::Float => {
                let raw: [u8; 4] = bytes
                    .try_into()
                    .map_err(|_| self.err(format!("expected 4 bytes, got {}", bytes.len())))?;
                CqlValue::Float(f32::from_be_bytes(raw))
            }
            DataType::Timestamp => {
                let millis = LongSerializer.from_bytes(bytes)?;
                let ts = DateTime::from_timestamp_millis(millis)
                    .ok_or_else(|| self.err(format!("timestamp {millis} out of range")))?;
                CqlValue::Timestamp(ts)
            }
            DataType::Uuid | DataType::TimeUuid => {
                let id = Uuid::from_slice(bytes).map_err(|e| self.err(e.to_string()))?;
                if self.data_type == DataType::TimeUuid {
                    CqlValue::TimeUuid(id)
                } else {
                    CqlValue::Uuid(id)
                }
            }
            DataType::Inet => match bytes.len() {
                4 => {
                    let raw: [u8; 4] = bytes.try_into().map_err(|_| self.err("bad inet"))?;
                    CqlValue::Inet(IpAddr::V4(Ipv4Addr::from(raw)))
                }
                16 => {
                    let raw: [u8; 16] = bytes.try_into().map_err(|_| self.err("bad inet"))?;
                    CqlValue::Inet(IpAddr::V6(Ipv6Addr::from(raw)))
                }
                n => return Err(self.err(format!("expected 4 or 16 bytes, got {n}"))),
            },
            #[cfg(feature = "rust_decimal")]
            DataType::Decimal => {
                if bytes.len() < 5 {
                    return Err(self.err(format!("expected at least 5 bytes, got {}", bytes.len())));
                }
                let mut buf = bytes;
                let scale = buf.get_i32();
                let scale = u32::try_from(scale)
                    .map_err(|_| self.err(format!("negative scale {scale} is not supported")))?;
                let unscaled = VarintSerializer.from_bytes(buf)?;
                let d = rust_decimal::Decimal::try_from_i128_with_scale(unscaled, scale)
                    .map_err(|e| self.err(e.to_string()))?;
                CqlValue::Decimal(d)
            }
            other => return Err(self.err(format!("{other} is not a primitive type"))),
        };
        Ok(value)
    }
}

// Collections use the v3+ layout: i32 count, then i32 length + bytes per element.

fn put_element(out: &mut BytesMut, bytes: &[u8], type_name: &str) -> CqlResult<()> {
    let len = i32::try_from(bytes.len())
        .map_err(|_| CqlError::codec(type_name, "element too large"))?;
    out.put_i32(len);
    out.put_slice(bytes);
    Ok(())
}

fn get_count(buf: &mut &[u8], type_name: &str) -> CqlResult<usize> {
    if buf.remaining() < 4 {
        return Err(CqlError::codec(type_name, "truncated collection header"));
    }
    usize::try_from(buf.get_i32())
        .map_err(|_| CqlError::codec(type_name, "negative collection size"))
}

fn get_element<'a>(buf: &mut &'a [u8], type_name: &str) -> CqlResult<&'a [u8]> {
    if buf.remaining() < 4 {
        return Err(CqlError::codec(type_name, "truncated element length"));
    }
    let len = usize::try_from(buf.get_i32())
        .map_err(|_| CqlError::codec(type_name, "null collection element"))?;
    if buf.remaining() < len {
        return Err(CqlError::codec(type_name, "truncated element"));
    }
    let (element, rest) = buf.split_at(len);
    *buf = rest;
    Ok(element)
}

#[derive(Debug)]
struct CollectionCodec {
    data_type: DataType,
    element: Arc<dyn Marshal>,
}

impl CollectionCodec {
    fn items<'v>(&self, value: &'v CqlValue) -> CqlResult<&'v [CqlValue]> {
        match (&self.data_type, value) {
            (DataType::List(_), CqlValue::List(items))
            | (DataType::Set(_), CqlValue::Set(items) | CqlValue::List(items)) => Ok(items),
            (_, other) => Err(CqlError::codec(
                self.data_type.name(),
                format!("cannot encode {} value", other.kind()),
            )),
        }
    }
}

impl Marshal for CollectionCodec {
    fn data_type(&self) -> &DataType {
        &self.data_type
    }

    fn encode(&self, value: &CqlValue) -> CqlResult<Bytes> {
        let name = self.data_type.name();
        let items = self.items(value)?;
        let count =
            i32::try_from(items.len()).map_err(|_| CqlError::codec(name, "too many elements"))?;
        let mut out = BytesMut::new();
        out.put_i32(count);
        for item in items {
            let encoded = self.element.encode(item)?;
            put_element(&mut out, &encoded, name)?;
        }
        Ok(out.freeze())
    }

    fn decode(&self, bytes: &[u8]) -> CqlResult<CqlValue> {
        let name = self.data_type.name();
        let mut buf = bytes;
        let count = get_count(&mut buf, name)?;
        let mut items = Vec::with_capacity(count.min(buf.len() / 4));
        for _ in 0..count {
            let element = get_element(&mut buf, name)?;
            items.push(self.element.decode(element)?);
        }
        if buf.has_remaining() {
            return Err(CqlError::codec(name, "trailing bytes after collection"));
        }
        Ok(match self.data_type {
            DataType::Set(_) => CqlValue::Set(items),
            _ => CqlValue::List(items),
        })
    }
}

#[derive(Debug)]
struct MapCodec {
    data_type: DataType,
    key: Arc<dyn Marshal>,
    value: Arc<dyn Marshal>,
}

impl Marshal for MapCodec {
    fn data_type(&self) -> &DataType {
        &self.data_type
    }

    fn encode(&self, value: &CqlValue) -> CqlResult<Bytes> {
        let CqlValue::Map(entries) = value else {
            return Err(CqlError::codec(
                "map",
                format!("cannot encode {} value", value.kind()),
            ));
        };
        let count =
            i32::try_from(entries.len()).map_err(|_| CqlError::codec("map", "too many entries"))?;
        let mut out = BytesMut::new();
        out.put_i32(count);
        for (k, v) in entries {
            put_element(&mut out, &self.key.encode(k)?, "map")?;
            put_element(&mut out, &self.value.encode(v)?, "map")?;
        }
        Ok(out.freeze())
    }

    fn decode(&self, bytes: &[u8]) -> CqlResult<CqlValue> {
        let mut buf = bytes;
        let count = get_count(&mut buf, "map")?;
        let mut entries = Vec::with_capacity(count.min(buf.len() / 8));
        for _ in 0..count {
            let k = self.key.decode(get_element(&mut buf, "map")?)?;
            let v = self.value.decode(get_element(&mut buf, "map")?)?;
            entries.push((k, v));
        }
        if buf.has_remaining() {
            return Err(CqlError::codec("map", "trailing bytes after collection"));
        }
        Ok(CqlValue::Map(entries))
    }
}
