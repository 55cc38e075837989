//! The shared statement primitive.
//!
//! Every keyspace builder owns a [`StatementDraft`]: the tagged statement
//! kind, the target name, an optional option composer and a write-once cell
//! holding the built text. Rendering is a single routine dispatched on the
//! kind; the terminator is appended by the primitive, never by a variant.

use super::keywords::KeywordSet;
use super::options::KeyspaceOptions;
use super::validate::validate_keyspace_name;
use crate::error::{CqlError, CqlResult, ValidationError};
use crate::session::CqlSession;
use std::sync::OnceLock;

/// Statement terminator.
pub const TERMINATOR: char = ';';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatementKind {
    Create { if_not_exists: bool },
    Alter,
    Drop { if_exists: bool },
}

impl StatementKind {
    fn verb(&self) -> &'static str {
        match self {
            StatementKind::Create { .. } => "CREATE",
            StatementKind::Alter => "ALTER",
            StatementKind::Drop { .. } => "DROP",
        }
    }

    fn guard(&self) -> Option<&'static str> {
        match self {
            StatementKind::Create {
                if_not_exists: true,
            } => Some("IF NOT EXISTS"),
            StatementKind::Drop { if_exists: true } => Some("IF EXISTS"),
            _ => None,
        }
    }
}

/// Mutable builder state plus the memoized result.
#[derive(Debug, Clone)]
pub(crate) struct StatementDraft {
    pub(crate) kind: StatementKind,
    name: String,
    pub(crate) options: Option<KeyspaceOptions>,
    built: OnceLock<String>,
    // Set when a setter runs after `build`; later builds fail.
    stale: bool,
}

impl StatementDraft {
    pub(crate) fn new(kind: StatementKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            options: None,
            built: OnceLock::new(),
            stale: false,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Apply `f` unless the draft has already been built.
    ///
    /// A post-build mutation is dropped and poisons further builds.
    pub(crate) fn mutate(&mut self, f: impl FnOnce(&mut Self)) {
        if self.built.get().is_some() {
            self.stale = true;
            return;
        }
        f(self);
    }

    pub(crate) fn options_mut(&mut self) -> &mut KeyspaceOptions {
        self.options.get_or_insert_with(KeyspaceOptions::new)
    }

    fn validate(&self, keywords: &KeywordSet) -> Result<(), ValidationError> {
        validate_keyspace_name(&self.name, keywords)?;
        if self.kind == StatementKind::Alter
            && self.options.as_ref().is_none_or(KeyspaceOptions::is_empty)
        {
            return Err(ValidationError::MissingOptions {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Statement text without the terminator.
    pub(crate) fn render_body(&self) -> String {
        let mut out = String::with_capacity(32 + self.name.len());
        out.push_str(self.kind.verb());
        out.push_str(" KEYSPACE ");
        if let Some(guard) = self.kind.guard() {
            out.push_str(guard);
            out.push(' ');
        }
        out.push_str(&self.name);
        if let Some(options) = &self.options {
            options.write_cql(&mut out);
        }
        out
    }

    pub(crate) fn query_string(&self) -> Option<&str> {
        self.built.get().map(String::as_str)
    }

    pub(crate) fn build_with(&self, keywords: &KeywordSet) -> CqlResult<String> {
        if self.stale {
            return Err(CqlError::state(format!(
                "statement for keyspace '{}' was modified after it was built",
                self.name
            )));
        }
        if let Some(text) = self.built.get() {
            return Ok(text.clone());
        }

        self.validate(keywords)?;

        let mut text = self.render_body();
        text.push(TERMINATOR);

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "cassaforte.schema", keyspace = %self.name, cql = %text, "built schema statement");

        Ok(self.built.get_or_init(|| text).clone())
    }
}

/// Base trait for schema statements.
///
/// `build` validates the target name, renders the statement once and returns
/// the same text on every later call.
pub trait SchemaStatement: Sync {
    /// Name of the keyspace this statement targets.
    fn keyspace_name(&self) -> &str;

    /// Statement text without the trailing terminator.
    fn render_body(&self) -> String;

    /// Validate against `keywords` and build the final statement.
    fn build_with(&self, keywords: &KeywordSet) -> CqlResult<String>;

    /// The built text, if `build` has succeeded.
    fn query_string(&self) -> Option<&str>;

    /// Validate against the bundled CQL keywords and build the final statement.
    fn build(&self) -> CqlResult<String> {
        self.build_with(KeywordSet::cql())
    }

    /// Debug helper: the statement text, without validation.
    fn to_cql(&self) -> String {
        match self.query_string() {
            Some(text) => text.to_string(),
            None => {
                let mut text = self.render_body();
                text.push(TERMINATOR);
                text
            }
        }
    }

    /// Build and execute the statement.
    fn execute(
        &self,
        session: &impl CqlSession,
    ) -> impl std::future::Future<Output = CqlResult<()>> + Send {
        async move {
            let cql = self.build()?;
            session.execute(&cql).await
        }
    }

    /// Build and execute the statement, associating a tag for monitoring.
    fn execute_tagged(
        &self,
        tag: &str,
        session: &impl CqlSession,
    ) -> impl std::future::Future<Output = CqlResult<()>> + Send {
        async move {
            let cql = self.build()?;
            session.execute_tagged(tag, &cql).await
        }
    }
}
