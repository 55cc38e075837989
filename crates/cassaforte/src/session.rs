//! The database handle consumed by the rest of the crate.
//!
//! Opening connections and speaking the wire protocol are left to the
//! implementor; this crate only needs something that accepts CQL text and
//! reports success or a server error (see [`CqlError::from_server_error`]).

use crate::error::{CqlError, CqlResult};
use crate::schema::{KeywordSet, SchemaStatement, validate_keyspace_name};

/// A session that can execute CQL statements.
pub trait CqlSession: Send + Sync {
    /// Execute a single CQL statement.
    fn execute(&self, cql: &str) -> impl std::future::Future<Output = CqlResult<()>> + Send;

    /// Execute a statement, associating a tag for monitoring/observability.
    ///
    /// The default implementation ignores `tag` and calls [`CqlSession::execute`].
    fn execute_tagged(
        &self,
        tag: &str,
        cql: &str,
    ) -> impl std::future::Future<Output = CqlResult<()>> + Send {
        let _ = tag;
        self.execute(cql)
    }

    /// Switch the session to `keyspace` with `USE <keyspace>;`.
    fn use_keyspace(
        &self,
        keyspace: &str,
    ) -> impl std::future::Future<Output = CqlResult<()>> + Send {
        async move {
            validate_keyspace_name(keyspace, KeywordSet::cql()).map_err(CqlError::from)?;
            let cql = format!("USE {keyspace};");
            self.execute(&cql).await
        }
    }

    /// Build every statement, then execute them in order.
    ///
    /// Nothing is sent if any statement fails validation. Execution stops at
    /// the first server error.
    fn execute_all<S: SchemaStatement>(
        &self,
        statements: &[S],
    ) -> impl std::future::Future<Output = CqlResult<()>> + Send {
        async move {
            let script = statements
                .iter()
                .map(SchemaStatement::build)
                .collect::<CqlResult<Vec<_>>>()?;
            for cql in &script {
                self.execute(cql).await?;
            }
            Ok(())
        }
    }
}

impl<S: CqlSession> CqlSession for &S {
    fn execute(&self, cql: &str) -> impl std::future::Future<Output = CqlResult<()>> + Send {
        (**self).execute(cql)
    }

    fn execute_tagged(
        &self,
        tag: &str,
        cql: &str,
    ) -> impl std::future::Future<Output = CqlResult<()>> + Send {
        (**self).execute_tagged(tag, cql)
    }
}
