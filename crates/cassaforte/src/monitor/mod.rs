//! Statement monitoring and hooks around a [`CqlSession`](crate::session::CqlSession).
//!
//! - hooks inspect, rewrite or abort a statement before it is sent
//! - monitors observe completion time and outcome
//! - a timeout wrapper turns slow statements into [`CqlError::Timeout`](crate::CqlError::Timeout)
//!
//! Monitoring is off until enabled through [`MonitorConfig`]; hooks always run.
//!
//! # Example
//!
//! ```rust,ignore
//! use cassaforte::monitor::{InstrumentedSession, LoggingMonitor, MonitorConfig};
//! use std::time::Duration;
//!
//! let config = MonitorConfig::new()
//!     .with_statement_timeout(Duration::from_secs(10))
//!     .with_slow_statement_threshold(Duration::from_secs(1))
//!     .enable_monitoring();
//!
//! let session = InstrumentedSession::new(session)
//!     .with_config(config)
//!     .with_monitor(LoggingMonitor::new());
//! ```

mod config;
mod instrumented;
mod monitors;
mod types;

#[cfg(feature = "tracing")]
mod tracing_hook;

#[cfg(test)]
mod tests;

pub use config::MonitorConfig;
pub use instrumented::InstrumentedSession;
pub use monitors::{
    CompositeHook, CompositeMonitor, LoggingMonitor, NoopMonitor, StatementStats, StatsMonitor,
};
pub use types::{
    HookAction, StatementContext, StatementHook, StatementMonitor, StatementResult, StatementType,
};

#[cfg(feature = "tracing")]
pub use tracing_hook::TracingCqlHook;

/// Cut `cql` to at most `max_bytes` without splitting a UTF-8 character.
pub(crate) fn truncate_cql_bytes(cql: &str, max_bytes: usize) -> &str {
    if cql.len() <= max_bytes {
        return cql;
    }
    let mut end = max_bytes;
    while end > 0 && !cql.is_char_boundary(end) {
        end -= 1;
    }
    &cql[..end]
}
