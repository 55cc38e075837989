use super::truncate_cql_bytes;
use super::types::{HookAction, StatementContext, StatementHook};
use tracing::Level;

/// Emits every statement as a `tracing` event on target `cassaforte.cql`.
///
/// Runs from [`StatementHook::before_statement`], so statements are logged even
/// when monitoring is disabled.
#[derive(Debug, Clone)]
pub struct TracingCqlHook {
    pub level: Level,
    /// Truncate long statements (in bytes). `None` disables truncation.
    pub max_cql_length: Option<usize>,
}

impl Default for TracingCqlHook {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_cql_length: Some(200),
        }
    }
}

impl TracingCqlHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn max_cql_length(mut self, len: usize) -> Self {
        self.max_cql_length = Some(len);
        self
    }

    pub fn no_truncate(mut self) -> Self {
        self.max_cql_length = None;
        self
    }

    fn truncate_cql(&self, cql: &str) -> String {
        match self.max_cql_length {
            Some(max) if cql.len() > max => format!("{}...", truncate_cql_bytes(cql, max)),
            _ => cql.to_string(),
        }
    }
}

impl StatementHook for TracingCqlHook {
    fn before_statement(&self, ctx: &StatementContext) -> HookAction {
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN => tracing::warn!($($field)*),
                    Level::INFO => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let cql = self.truncate_cql(&ctx.cql);
        let tag = ctx.tag.as_deref().unwrap_or("-");
        emit_at_level!(
            self.level,
            target: "cassaforte.cql",
            statement_type = ?ctx.statement_type,
            tag,
            cql = %cql,
            fields = ?ctx.fields,
        );
        HookAction::Continue
    }
}
