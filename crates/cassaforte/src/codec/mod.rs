//! Value marshalling for the CQL type system.
//!
//! [`DataType`] names a wire type, [`CqlValue`] holds a native value, and a
//! [`Marshal`] strategy converts between the two and bytes. Strategies are
//! resolved once per type with [`codec_for`] or cached in a [`CodecRegistry`].
//!
//! ```ignore
//! use cassaforte::codec::{CodecRegistry, CqlValue, DataType};
//!
//! let registry = CodecRegistry::new();
//! let ty: DataType = "list<int>".parse()?;
//! let bytes = registry.encode(&ty, &CqlValue::list([1, 2, 3]))?;
//! assert_eq!(registry.decode(&ty, &bytes)?, CqlValue::list([1, 2, 3]));
//! ```

mod registry;
mod serializers;
mod types;
mod value;

pub use registry::{CodecRegistry, Marshal, codec_for};
pub use serializers::{
    AsciiSerializer, BooleanSerializer, IntSerializer, LongSerializer, Serializer,
    StringSerializer, VarintSerializer,
};
pub use types::DataType;
pub use value::CqlValue;
