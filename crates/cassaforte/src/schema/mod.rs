//! Keyspace DDL builders.
//!
//! A small builder DSL for `CREATE`, `ALTER` and `DROP KEYSPACE` statements.
//!
//! # Usage
//!
//! ```ignore
//! use cassaforte::schema::{self, OptionMap};
//!
//! let create = schema::create_keyspace("app")
//!     .if_not_exists()
//!     .with_options()
//!     .replication(
//!         OptionMap::new()
//!             .with("class", "SimpleStrategy")
//!             .with("replication_factor", 3),
//!     )
//!     .build()?;
//! // CREATE KEYSPACE IF NOT EXISTS app WITH replication = {'class': 'SimpleStrategy', 'replication_factor': 3};
//!
//! let alter = schema::alter_keyspace("app")
//!     .with_options()
//!     .durable_writes(false)
//!     .build()?;
//! // ALTER KEYSPACE app WITH durable_writes = false;
//!
//! let drop = schema::drop_keyspace("app").if_exists().build()?;
//! // DROP KEYSPACE IF EXISTS app;
//! ```
//!
//! Names are validated when a statement is built: empty names, names that are
//! not a CQL identifier (see [`validate_identifier`]) and reserved keywords
//! (see [`KeywordSet`]) are rejected. Double-quoted names are rendered as
//! given. A built statement is frozen; setters called afterwards are ignored
//! and make the next `build` fail with [`CqlError::State`](crate::CqlError::State).
//! Opening `with_options()` on a built statement is not a setter.

mod keyspace;
mod keywords;
mod options;
mod statement;
mod validate;

pub use keyspace::{
    AlterKeyspace, CreateKeyspace, DropKeyspace, KeyspaceOptionsTarget, KeyspaceStatement, Options,
};
pub use keywords::KeywordSet;
pub use options::{KeyspaceOptions, OptionMap, OptionValue, ReplicationStrategy};
pub use statement::{SchemaStatement, TERMINATOR};
pub use validate::{
    validate_identifier, validate_keyspace_name, validate_not_empty, validate_not_keyword,
};

/// Create a `CREATE KEYSPACE` builder.
///
/// # Example
/// ```ignore
/// let cql = cassaforte::schema::create_keyspace("app").if_not_exists().build()?;
/// ```
pub fn create_keyspace(name: impl Into<String>) -> CreateKeyspace {
    CreateKeyspace::new(name)
}

/// Create an `ALTER KEYSPACE` builder.
pub fn alter_keyspace(name: impl Into<String>) -> AlterKeyspace {
    AlterKeyspace::new(name)
}

/// Create a `DROP KEYSPACE` builder.
pub fn drop_keyspace(name: impl Into<String>) -> DropKeyspace {
    DropKeyspace::new(name)
}

#[cfg(test)]
mod tests;
