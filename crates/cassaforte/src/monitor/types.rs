use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// The kind of CQL statement being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementType {
    Create,
    Alter,
    Drop,
    Use,
    /// Anything else (DML, grants, ...)
    Other,
}

impl StatementType {
    /// Detect the statement type from its leading keyword.
    pub fn from_cql(cql: &str) -> Self {
        let keyword = cql
            .trim_start()
            .split(|c: char| !c.is_ascii_alphabetic())
            .next()
            .unwrap_or("");
        if keyword.eq_ignore_ascii_case("CREATE") {
            StatementType::Create
        } else if keyword.eq_ignore_ascii_case("ALTER") {
            StatementType::Alter
        } else if keyword.eq_ignore_ascii_case("DROP") {
            StatementType::Drop
        } else if keyword.eq_ignore_ascii_case("USE") {
            StatementType::Use
        } else {
            StatementType::Other
        }
    }

    pub fn is_schema_change(&self) -> bool {
        matches!(
            self,
            StatementType::Create | StatementType::Alter | StatementType::Drop
        )
    }
}

/// What hooks and monitors know about a statement.
#[derive(Debug, Clone)]
pub struct StatementContext {
    /// CQL as handed to the session by the caller.
    pub original_cql: String,
    /// CQL actually sent (may be rewritten by a hook).
    pub cql: String,
    pub statement_type: StatementType,
    /// Optional tag for identification.
    pub tag: Option<String>,
    /// Low-cardinality structured fields.
    pub fields: BTreeMap<String, String>,
}

impl StatementContext {
    pub fn new(cql: &str) -> Self {
        Self {
            original_cql: cql.to_string(),
            cql: cql.to_string(),
            statement_type: StatementType::from_cql(cql),
            tag: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn is_rewritten(&self) -> bool {
        self.cql != self.original_cql
    }
}

const MAX_ERROR_LEN: usize = 512;

/// Outcome of a statement, as reported to monitors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementResult {
    Applied,
    /// Error message, truncated to 512 bytes.
    Error(String),
}

impl StatementResult {
    pub fn error(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        if msg.len() > MAX_ERROR_LEN {
            Self::Error(format!(
                "{}...",
                super::truncate_cql_bytes(&msg, MAX_ERROR_LEN)
            ))
        } else {
            Self::Error(msg)
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for StatementResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementResult::Applied => f.write_str("applied"),
            StatementResult::Error(e) => write!(f, "error: {e}"),
        }
    }
}

/// Observes statement execution.
pub trait StatementMonitor: Send + Sync {
    fn on_statement_start(&self, _ctx: &StatementContext) {}

    /// Called after every statement, successful or not.
    fn on_statement_complete(
        &self,
        ctx: &StatementContext,
        duration: Duration,
        result: &StatementResult,
    );

    /// Called when a statement exceeds the configured slow threshold.
    fn on_slow_statement(&self, _ctx: &StatementContext, _duration: Duration) {}
}

/// What to do with a statement after a hook has seen it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookAction {
    Continue,
    /// Send this CQL instead.
    ModifyCql(String),
    /// Do not send the statement.
    Abort(String),
}

/// Inspects, rewrites or aborts statements before they are sent.
pub trait StatementHook: Send + Sync {
    fn before_statement(&self, ctx: &StatementContext) -> HookAction {
        let _ = ctx;
        HookAction::Continue
    }

    /// Called before monitors receive the completion event.
    fn after_statement(
        &self,
        _ctx: &StatementContext,
        _duration: Duration,
        _result: &StatementResult,
    ) {
    }
}
