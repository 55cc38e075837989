//! # cassaforte
//!
//! Client-side support for Apache Cassandra.
//!
//! ## Features
//!
//! - **Keyspace DDL**: validated `CREATE` / `ALTER` / `DROP KEYSPACE` builders
//! - **Reserved keywords**: name checks against a configurable keyword set
//! - **Codecs**: wire types, native values and per-type marshalling strategies
//! - **Sessions**: a small trait for whatever actually talks to the cluster
//! - **Monitoring**: hooks, monitors and timeouts around any session
//!
//! ## Schema builder
//!
//! ```ignore
//! use cassaforte::schema;
//! use cassaforte::ReplicationStrategy;
//!
//! schema::create_keyspace("app")
//!     .if_not_exists()
//!     .with_options()
//!     .replication_strategy(ReplicationStrategy::simple(3))
//!     .durable_writes(true)
//!     .execute(&session)
//!     .await?;
//!
//! schema::drop_keyspace("scratch")
//!     .if_exists()
//!     .execute(&session)
//!     .await?;
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod monitor;
pub mod prelude;
pub mod schema;
pub mod session;

pub use codec::{CodecRegistry, CqlValue, DataType, Marshal};
pub use config::ClientConfig;
pub use error::{CqlError, CqlResult, ServerErrorKind, ValidationError};
pub use monitor::{
    CompositeHook, CompositeMonitor, HookAction, InstrumentedSession, LoggingMonitor,
    MonitorConfig, NoopMonitor, StatementContext, StatementHook, StatementMonitor,
    StatementResult, StatementStats, StatementType, StatsMonitor,
};
pub use schema::{
    AlterKeyspace, CreateKeyspace, DropKeyspace, KeyspaceOptions, KeyspaceStatement, KeywordSet,
    OptionMap, OptionValue, ReplicationStrategy, SchemaStatement, alter_keyspace, create_keyspace,
    drop_keyspace,
};
pub use session::CqlSession;

#[cfg(feature = "tracing")]
pub use monitor::TracingCqlHook;
