//! `WITH` clause composition for keyspace statements.
//!
//! Top-level options render as `key = value` pairs joined by ` AND `. The
//! replication option is a nested map rendered as `{'key': value, ...}`,
//! where text is single-quoted and every other scalar is a bare literal.

use crate::error::{CqlError, CqlResult};
use std::fmt::Write as _;

const REPLICATION: &str = "replication";
const DURABLE_WRITES: &str = "durable_writes";

/// A single option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Text(String),
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Map(OptionMap),
}

impl OptionValue {
    pub(crate) fn write_cql(&self, out: &mut String) {
        match self {
            OptionValue::Text(s) => write_quoted(out, s),
            OptionValue::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
            OptionValue::Integer(n) => {
                let _ = write!(out, "{n}");
            }
            OptionValue::Float(f) => {
                let _ = write!(out, "{f}");
            }
            OptionValue::Map(map) => map.write_cql(out),
        }
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Text(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Text(v)
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Boolean(v)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for OptionValue {
                fn from(v: $ty) -> Self {
                    OptionValue::Integer(i64::from(v))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for OptionValue {
    fn from(v: f32) -> Self {
        OptionValue::Float(f64::from(v))
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<OptionMap> for OptionValue {
    fn from(v: OptionMap) -> Self {
        OptionValue::Map(v)
    }
}

impl TryFrom<serde_json::Value> for OptionValue {
    type Error = CqlError;

    fn try_from(value: serde_json::Value) -> CqlResult<Self> {
        use serde_json::Value;

        match value {
            Value::String(s) => Ok(OptionValue::Text(s)),
            Value::Bool(b) => Ok(OptionValue::Boolean(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(OptionValue::Integer(i)),
                None => n
                    .as_f64()
                    .map(OptionValue::Float)
                    .ok_or_else(|| CqlError::config(format!("Unsupported option number: {n}"))),
            },
            Value::Object(obj) => {
                let mut map = OptionMap::new();
                for (k, v) in obj {
                    map.insert(k, OptionValue::try_from(v)?);
                }
                Ok(OptionValue::Map(map))
            }
            other @ (Value::Null | Value::Array(_)) => Err(CqlError::config(format!(
                "Unsupported option value: {other}"
            ))),
        }
    }
}

/// Insertion-ordered option mapping with last-write-wins keys.
///
/// Overwriting a key keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionMap {
    entries: Vec<(String, OptionValue)>,
}

impl OptionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style [`OptionMap::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render as a braced literal: `{'k': v, ...}`.
    pub fn to_cql(&self) -> String {
        let mut out = String::new();
        self.write_cql(&mut out);
        out
    }

    pub(crate) fn write_cql(&self, out: &mut String) {
        out.push('{');
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write_quoted(out, key);
            out.push_str(": ");
            value.write_cql(out);
        }
        out.push('}');
    }
}

impl<K, V> FromIterator<(K, V)> for OptionMap
where
    K: Into<String>,
    V: Into<OptionValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OptionMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl TryFrom<serde_json::Value> for OptionMap {
    type Error = CqlError;

    fn try_from(value: serde_json::Value) -> CqlResult<Self> {
        match OptionValue::try_from(value)? {
            OptionValue::Map(map) => Ok(map),
            other => Err(CqlError::config(format!(
                "Expected an option object, got {other:?}"
            ))),
        }
    }
}

/// Common replication strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplicationStrategy {
    /// `SimpleStrategy` with a cluster-wide replication factor.
    Simple { replication_factor: u32 },
    /// `NetworkTopologyStrategy` with a factor per datacenter.
    NetworkTopology { datacenters: Vec<(String, u32)> },
}

impl ReplicationStrategy {
    pub fn simple(replication_factor: u32) -> Self {
        Self::Simple { replication_factor }
    }

    pub fn network_topology<I, S>(datacenters: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        Self::NetworkTopology {
            datacenters: datacenters
                .into_iter()
                .map(|(dc, rf)| (dc.into(), rf))
                .collect(),
        }
    }
}

impl From<ReplicationStrategy> for OptionMap {
    fn from(strategy: ReplicationStrategy) -> Self {
        match strategy {
            ReplicationStrategy::Simple { replication_factor } => OptionMap::new()
                .with("class", "SimpleStrategy")
                .with("replication_factor", replication_factor),
            ReplicationStrategy::NetworkTopology { datacenters } => {
                let mut map = OptionMap::new().with("class", "NetworkTopologyStrategy");
                for (dc, rf) in datacenters {
                    map.insert(dc, rf);
                }
                map
            }
        }
    }
}

/// The options attached to a CREATE or ALTER KEYSPACE statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyspaceOptions {
    options: OptionMap,
}

impl KeyspaceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the replication map, e.g. `{'class': 'SimpleStrategy', 'replication_factor': 3}`.
    pub fn replication(mut self, strategy_options: OptionMap) -> Self {
        self.set_replication(strategy_options);
        self
    }

    /// Set replication from a [`ReplicationStrategy`].
    pub fn replication_strategy(self, strategy: ReplicationStrategy) -> Self {
        self.replication(strategy.into())
    }

    /// Set `durable_writes`.
    pub fn durable_writes(mut self, flag: bool) -> Self {
        self.set_durable_writes(flag);
        self
    }

    pub(crate) fn set_replication(&mut self, strategy_options: OptionMap) {
        self.options.insert(REPLICATION, strategy_options);
    }

    pub(crate) fn set_durable_writes(&mut self, flag: bool) {
        self.options.insert(DURABLE_WRITES, flag);
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(key)
    }

    /// Render the clause suffix: `" WITH a = x AND b = y"`, or `""` when nothing is set.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_cql(&mut out);
        out
    }

    pub(crate) fn write_cql(&self, out: &mut String) {
        if self.options.is_empty() {
            return;
        }
        out.push_str(" WITH ");
        for (i, (key, value)) in self.options.iter().enumerate() {
            if i > 0 {
                out.push_str(" AND ");
            }
            out.push_str(key);
            out.push_str(" = ");
            value.write_cql(out);
        }
    }
}
