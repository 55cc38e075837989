//! CREATE / ALTER / DROP KEYSPACE builders.

use super::keywords::KeywordSet;
use super::options::{KeyspaceOptions, OptionMap, ReplicationStrategy};
use super::statement::{SchemaStatement, StatementDraft, StatementKind};
use crate::error::CqlResult;
use std::fmt;

/// Forward the [`SchemaStatement`] plumbing and the inherent shortcuts to the draft.
macro_rules! impl_keyspace_statement {
    ($ty:ty) => {
        impl $ty {
            /// Validate and build the statement. See [`SchemaStatement::build`].
            pub fn build(&self) -> CqlResult<String> {
                SchemaStatement::build(self)
            }

            /// Debug helper: the statement text, without validation.
            pub fn to_cql(&self) -> String {
                SchemaStatement::to_cql(self)
            }
        }

        impl SchemaStatement for $ty {
            fn keyspace_name(&self) -> &str {
                self.draft.name()
            }

            fn render_body(&self) -> String {
                self.draft.render_body()
            }

            fn build_with(&self, keywords: &KeywordSet) -> CqlResult<String> {
                self.draft.build_with(keywords)
            }

            fn query_string(&self) -> Option<&str> {
                self.draft.query_string()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&SchemaStatement::to_cql(self))
            }
        }
    };
}

/// Statements that accept a `WITH` clause.
pub trait KeyspaceOptionsTarget: SchemaStatement + Sized {
    /// Edit the attached option composer, creating it if needed.
    fn update_options(self, f: impl FnOnce(&mut KeyspaceOptions)) -> Self;

    /// Start configuring options, e.g. `alter_keyspace("app").with_options().durable_writes(false)`.
    ///
    /// Opening the adapter is not a mutation; only its setters are.
    fn with_options(self) -> Options<Self> {
        Options { statement: self }
    }
}

/// `CREATE KEYSPACE [IF NOT EXISTS] <name> [WITH ...];`
#[derive(Debug, Clone)]
pub struct CreateKeyspace {
    draft: StatementDraft,
}

impl CreateKeyspace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            draft: StatementDraft::new(
                StatementKind::Create {
                    if_not_exists: false,
                },
                name,
            ),
        }
    }

    /// Add `IF NOT EXISTS`.
    pub fn if_not_exists(mut self) -> Self {
        self.draft.mutate(|d| {
            d.kind = StatementKind::Create {
                if_not_exists: true,
            }
        });
        self
    }

    /// Replace the option composer.
    pub fn options(mut self, options: KeyspaceOptions) -> Self {
        self.draft.mutate(|d| d.options = Some(options));
        self
    }

    /// Start configuring options.
    pub fn with_options(self) -> Options<Self> {
        KeyspaceOptionsTarget::with_options(self)
    }
}

impl KeyspaceOptionsTarget for CreateKeyspace {
    fn update_options(mut self, f: impl FnOnce(&mut KeyspaceOptions)) -> Self {
        self.draft.mutate(|d| f(d.options_mut()));
        self
    }
}

impl_keyspace_statement!(CreateKeyspace);

/// `ALTER KEYSPACE <name> WITH ...;`
///
/// At least one option is required.
#[derive(Debug, Clone)]
pub struct AlterKeyspace {
    draft: StatementDraft,
}

impl AlterKeyspace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            draft: StatementDraft::new(StatementKind::Alter, name),
        }
    }

    /// Replace the option composer.
    pub fn options(mut self, options: KeyspaceOptions) -> Self {
        self.draft.mutate(|d| d.options = Some(options));
        self
    }

    /// Start configuring options.
    pub fn with_options(self) -> Options<Self> {
        KeyspaceOptionsTarget::with_options(self)
    }
}

impl KeyspaceOptionsTarget for AlterKeyspace {
    fn update_options(mut self, f: impl FnOnce(&mut KeyspaceOptions)) -> Self {
        self.draft.mutate(|d| f(d.options_mut()));
        self
    }
}

impl_keyspace_statement!(AlterKeyspace);

/// `DROP KEYSPACE [IF EXISTS] <name>;`
#[derive(Debug, Clone)]
pub struct DropKeyspace {
    draft: StatementDraft,
}

impl DropKeyspace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            draft: StatementDraft::new(StatementKind::Drop { if_exists: false }, name),
        }
    }

    /// Add `IF EXISTS`.
    pub fn if_exists(mut self) -> Self {
        self.draft
            .mutate(|d| d.kind = StatementKind::Drop { if_exists: true });
        self
    }
}

impl_keyspace_statement!(DropKeyspace);

/// Option setters layered over a CREATE or ALTER statement.
///
/// Setters write into the statement's own composer, so building through the
/// adapter or through [`Options::into_statement`] yields the same text.
#[derive(Debug, Clone)]
pub struct Options<S> {
    statement: S,
}

impl<S: KeyspaceOptionsTarget> Options<S> {
    /// Set the replication map.
    pub fn replication(self, strategy_options: OptionMap) -> Self {
        Self {
            statement: self
                .statement
                .update_options(|o| o.set_replication(strategy_options)),
        }
    }

    /// Set replication from a [`ReplicationStrategy`].
    pub fn replication_strategy(self, strategy: ReplicationStrategy) -> Self {
        self.replication(strategy.into())
    }

    /// Set `durable_writes`.
    pub fn durable_writes(self, flag: bool) -> Self {
        Self {
            statement: self
                .statement
                .update_options(|o| o.set_durable_writes(flag)),
        }
    }

    /// Validate and build the underlying statement.
    pub fn build(&self) -> CqlResult<String> {
        self.statement.build()
    }

    /// Debug helper: the statement text, without validation.
    pub fn to_cql(&self) -> String {
        self.statement.to_cql()
    }

    /// Return to the statement builder.
    pub fn into_statement(self) -> S {
        self.statement
    }
}

impl<S: SchemaStatement> SchemaStatement for Options<S> {
    fn keyspace_name(&self) -> &str {
        self.statement.keyspace_name()
    }

    fn render_body(&self) -> String {
        self.statement.render_body()
    }

    fn build_with(&self, keywords: &KeywordSet) -> CqlResult<String> {
        self.statement.build_with(keywords)
    }

    fn query_string(&self) -> Option<&str> {
        self.statement.query_string()
    }
}

impl<S: SchemaStatement> fmt::Display for Options<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.statement.to_cql())
    }
}

/// Any keyspace statement, for scripts mixing CREATE, ALTER and DROP.
#[derive(Debug, Clone)]
pub enum KeyspaceStatement {
    Create(CreateKeyspace),
    Alter(AlterKeyspace),
    Drop(DropKeyspace),
}

impl KeyspaceStatement {
    fn draft(&self) -> &StatementDraft {
        match self {
            KeyspaceStatement::Create(s) => &s.draft,
            KeyspaceStatement::Alter(s) => &s.draft,
            KeyspaceStatement::Drop(s) => &s.draft,
        }
    }
}

impl SchemaStatement for KeyspaceStatement {
    fn keyspace_name(&self) -> &str {
        self.draft().name()
    }

    fn render_body(&self) -> String {
        self.draft().render_body()
    }

    fn build_with(&self, keywords: &KeywordSet) -> CqlResult<String> {
        self.draft().build_with(keywords)
    }

    fn query_string(&self) -> Option<&str> {
        self.draft().query_string()
    }
}

impl fmt::Display for KeyspaceStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cql())
    }
}

impl From<CreateKeyspace> for KeyspaceStatement {
    fn from(s: CreateKeyspace) -> Self {
        KeyspaceStatement::Create(s)
    }
}

impl From<AlterKeyspace> for KeyspaceStatement {
    fn from(s: AlterKeyspace) -> Self {
        KeyspaceStatement::Alter(s)
    }
}

impl From<DropKeyspace> for KeyspaceStatement {
    fn from(s: DropKeyspace) -> Self {
        KeyspaceStatement::Drop(s)
    }
}

impl<S: Into<KeyspaceStatement>> From<Options<S>> for KeyspaceStatement {
    fn from(o: Options<S>) -> Self {
        o.statement.into()
    }
}
