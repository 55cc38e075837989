//! Wire type tags.

use crate::error::{CqlError, CqlResult};
use std::fmt;

/// A CQL column type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    Ascii,
    BigInt,
    Blob,
    Boolean,
    Counter,
    Decimal,
    Double,
    Float,
    Inet,
    Int,
    Text,
    Timestamp,
    Uuid,
    Varchar,
    Varint,
    TimeUuid,
    List(Box<DataType>),
    Set(Box<DataType>),
    Map(Box<DataType>, Box<DataType>),
}

impl DataType {
    pub fn list(element: DataType) -> Self {
        DataType::List(Box::new(element))
    }

    pub fn set(element: DataType) -> Self {
        DataType::Set(Box::new(element))
    }

    pub fn map(key: DataType, value: DataType) -> Self {
        DataType::Map(Box::new(key), Box::new(value))
    }

    /// Lower-case CQL name of the outermost type (`list`, `int`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Ascii => "ascii",
            DataType::BigInt => "bigint",
            DataType::Blob => "blob",
            DataType::Boolean => "boolean",
            DataType::Counter => "counter",
            DataType::Decimal => "decimal",
            DataType::Double => "double",
            DataType::Float => "float",
            DataType::Inet => "inet",
            DataType::Int => "int",
            DataType::Text => "text",
            DataType::Timestamp => "timestamp",
            DataType::Uuid => "uuid",
            DataType::Varchar => "varchar",
            DataType::Varint => "varint",
            DataType::TimeUuid => "timeuuid",
            DataType::List(_) => "list",
            DataType::Set(_) => "set",
            DataType::Map(_, _) => "map",
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            DataType::List(_) | DataType::Set(_) | DataType::Map(_, _)
        )
    }

    /// Primitive type for a native protocol option id.
    ///
    /// Collection ids carry type arguments and are not resolved here.
    pub fn from_option_id(id: u16) -> Option<Self> {
        let ty = match id {
            0x0001 => DataType::Ascii,
            0x0002 => DataType::BigInt,
            0x0003 => DataType::Blob,
            0x0004 => DataType::Boolean,
            0x0005 => DataType::Counter,
            0x0006 => DataType::Decimal,
            0x0007 => DataType::Double,
            0x0008 => DataType::Float,
            0x0009 => DataType::Int,
            0x000A => DataType::Text,
            0x000B => DataType::Timestamp,
            0x000C => DataType::Uuid,
            0x000D => DataType::Varchar,
            0x000E => DataType::Varint,
            0x000F => DataType::TimeUuid,
            0x0010 => DataType::Inet,
            _ => return None,
        };
        Some(ty)
    }

    /// Parse a CQL type name such as `int` or `map<text, list<bigint>>`.
    pub fn parse(s: &str) -> CqlResult<Self> {
        let mut parser = TypeParser { input: s, pos: 0 };
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if parser.pos != s.len() {
            return Err(parser.error("trailing characters"));
        }
        Ok(ty)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::List(e) => write!(f, "list<{e}>"),
            DataType::Set(e) => write!(f, "set<{e}>"),
            DataType::Map(k, v) => write!(f, "map<{k}, {v}>"),
            other => f.write_str(other.name()),
        }
    }
}

impl std::str::FromStr for DataType {
    type Err = CqlError;

    fn from_str(s: &str) -> CqlResult<Self> {
        DataType::parse(s)
    }
}

struct TypeParser<'a> {
    input: &'a str,
    pos: usize,
}

impl TypeParser<'_> {
    fn error(&self, message: &str) -> CqlError {
        CqlError::codec(
            self.input,
            format!("{message} at offset {} in type name", self.pos),
        )
    }

    fn skip_ws(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn expect(&mut self, ch: char) -> CqlResult<()> {
        self.skip_ws();
        if self.input[self.pos..].starts_with(ch) {
            self.pos += ch.len_utf8();
            Ok(())
        } else {
            Err(self.error(&format!("expected '{ch}'")))
        }
    }

    fn ident(&mut self) -> CqlResult<&str> {
        self.skip_ws();
        let rest = &self.input[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected a type name"));
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.input[start..self.pos])
    }

    fn parse_type(&mut self) -> CqlResult<DataType> {
        let name = self.ident()?.to_ascii_lowercase();
        let ty = match name.as_str() {
            "ascii" => DataType::Ascii,
            "bigint" => DataType::BigInt,
            "blob" => DataType::Blob,
            "boolean" => DataType::Boolean,
            "counter" => DataType::Counter,
            "decimal" => DataType::Decimal,
            "double" => DataType::Double,
            "float" => DataType::Float,
            "inet" => DataType::Inet,
            "int" => DataType::Int,
            "text" => DataType::Text,
            "timestamp" => DataType::Timestamp,
            "uuid" => DataType::Uuid,
            "varchar" => DataType::Varchar,
            "varint" => DataType::Varint,
            "timeuuid" => DataType::TimeUuid,
            "list" | "set" => {
                self.expect('<')?;
                let element = self.parse_type()?;
                self.expect('>')?;
                if name == "list" {
                    DataType::list(element)
                } else {
                    DataType::set(element)
                }
            }
            "map" => {
                self.expect('<')?;
                let key = self.parse_type()?;
                self.expect(',')?;
                let value = self.parse_type()?;
                self.expect('>')?;
                DataType::map(key, value)
            }
            _ => return Err(CqlError::codec(self.input, format!("unknown type '{name}'"))),
        };
        Ok(ty)
    }
}
