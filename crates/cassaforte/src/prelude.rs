//! Common imports.
//!
//! ```ignore
//! use cassaforte::prelude::*;
//! ```

pub use crate::schema::{self, KeyspaceOptionsTarget};
pub use crate::{
    ClientConfig, CqlError, CqlResult, CqlSession, CqlValue, DataType, KeyspaceStatement,
    OptionMap, ReplicationStrategy, SchemaStatement,
};
