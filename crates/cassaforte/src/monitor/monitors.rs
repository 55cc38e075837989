use super::truncate_cql_bytes;
use super::types::{
    HookAction, StatementContext, StatementHook, StatementMonitor, StatementResult, StatementType,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// A monitor that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMonitor;

impl StatementMonitor for NoopMonitor {
    fn on_statement_complete(&self, _: &StatementContext, _: Duration, _: &StatementResult) {}
}

/// Prints statements to stderr.
#[derive(Debug, Clone)]
pub struct LoggingMonitor {
    /// Skip statements faster than this.
    pub min_duration: Option<Duration>,
    pub max_cql_length: Option<usize>,
    pub prefix: String,
}

impl Default for LoggingMonitor {
    fn default() -> Self {
        Self {
            min_duration: None,
            max_cql_length: Some(200),
            prefix: "[cassaforte]".to_string(),
        }
    }
}

impl LoggingMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_duration(mut self, duration: Duration) -> Self {
        self.min_duration = Some(duration);
        self
    }

    pub fn max_cql_length(mut self, len: usize) -> Self {
        self.max_cql_length = Some(len);
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub(crate) fn truncate_cql(&self, cql: &str) -> String {
        match self.max_cql_length {
            Some(max) if cql.len() > max => format!("{}...", truncate_cql_bytes(cql, max)),
            _ => cql.to_string(),
        }
    }

    fn describe(&self, ctx: &StatementContext) -> String {
        if ctx.is_rewritten() {
            format!(
                "original: {} | sent: {}",
                self.truncate_cql(&ctx.original_cql),
                self.truncate_cql(&ctx.cql)
            )
        } else {
            self.truncate_cql(&ctx.cql)
        }
    }
}

impl StatementMonitor for LoggingMonitor {
    fn on_statement_complete(
        &self,
        ctx: &StatementContext,
        duration: Duration,
        result: &StatementResult,
    ) {
        if self.min_duration.is_some_and(|min| duration < min) {
            return;
        }
        let tag = ctx.tag.as_deref().unwrap_or("-");
        eprintln!(
            "{} [{:?}] [{}] {:?} | {} | {}",
            self.prefix,
            ctx.statement_type,
            tag,
            duration,
            result,
            self.describe(ctx)
        );
    }

    fn on_slow_statement(&self, ctx: &StatementContext, duration: Duration) {
        eprintln!(
            "{} SLOW STATEMENT [{:?}]: {:?} | {}",
            self.prefix,
            ctx.statement_type,
            duration,
            self.describe(ctx)
        );
    }
}

/// Counts statements by type and tracks the slowest one.
#[derive(Debug, Default)]
pub struct StatsMonitor {
    total: AtomicU64,
    failed: AtomicU64,
    total_duration_nanos: AtomicU64,
    create_count: AtomicU64,
    alter_count: AtomicU64,
    drop_count: AtomicU64,
    use_count: AtomicU64,
    other_count: AtomicU64,
    max_duration_nanos: AtomicU64,
    slowest_statement: Mutex<Option<String>>,
}

/// Snapshot of [`StatsMonitor`] counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementStats {
    pub total_statements: u64,
    pub failed_statements: u64,
    pub total_duration: Duration,
    pub create_count: u64,
    pub alter_count: u64,
    pub drop_count: u64,
    pub use_count: u64,
    pub other_count: u64,
    pub max_duration: Duration,
    pub slowest_statement: Option<String>,
}

impl StatsMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> StatementStats {
        StatementStats {
            total_statements: self.total.load(Ordering::Relaxed),
            failed_statements: self.failed.load(Ordering::Relaxed),
            total_duration: Duration::from_nanos(self.total_duration_nanos.load(Ordering::Relaxed)),
            create_count: self.create_count.load(Ordering::Relaxed),
            alter_count: self.alter_count.load(Ordering::Relaxed),
            drop_count: self.drop_count.load(Ordering::Relaxed),
            use_count: self.use_count.load(Ordering::Relaxed),
            other_count: self.other_count.load(Ordering::Relaxed),
            max_duration: Duration::from_nanos(self.max_duration_nanos.load(Ordering::Relaxed)),
            slowest_statement: self
                .slowest_statement
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.total,
            &self.failed,
            &self.total_duration_nanos,
            &self.create_count,
            &self.alter_count,
            &self.drop_count,
            &self.use_count,
            &self.other_count,
            &self.max_duration_nanos,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        *self
            .slowest_statement
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn counter(&self, statement_type: StatementType) -> &AtomicU64 {
        match statement_type {
            StatementType::Create => &self.create_count,
            StatementType::Alter => &self.alter_count,
            StatementType::Drop => &self.drop_count,
            StatementType::Use => &self.use_count,
            StatementType::Other => &self.other_count,
        }
    }
}

impl StatementMonitor for StatsMonitor {
    fn on_statement_complete(
        &self,
        ctx: &StatementContext,
        duration: Duration,
        result: &StatementResult,
    ) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);

        self.total.fetch_add(1, Ordering::Relaxed);
        let prev = self.total_duration_nanos.fetch_add(nanos, Ordering::Relaxed);
        if prev.checked_add(nanos).is_none() {
            // Saturate rather than wrap.
            self.total_duration_nanos.store(u64::MAX, Ordering::Relaxed);
        }
        self.counter(ctx.statement_type)
            .fetch_add(1, Ordering::Relaxed);
        if result.is_error() {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }

        let mut current_max = self.max_duration_nanos.load(Ordering::Relaxed);
        while nanos > current_max {
            match self.max_duration_nanos.compare_exchange_weak(
                current_max,
                nanos,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    *self
                        .slowest_statement
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner) = Some(ctx.cql.clone());
                    break;
                }
                Err(updated) => current_max = updated,
            }
        }
    }
}

/// Fans events out to several monitors.
#[derive(Default)]
pub struct CompositeMonitor {
    monitors: Vec<Arc<dyn StatementMonitor>>,
}

impl CompositeMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add<M: StatementMonitor + 'static>(mut self, monitor: M) -> Self {
        self.monitors.push(Arc::new(monitor));
        self
    }

    pub fn add_arc(mut self, monitor: Arc<dyn StatementMonitor>) -> Self {
        self.monitors.push(monitor);
        self
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl StatementMonitor for CompositeMonitor {
    fn on_statement_start(&self, ctx: &StatementContext) {
        for monitor in &self.monitors {
            monitor.on_statement_start(ctx);
        }
    }

    fn on_statement_complete(
        &self,
        ctx: &StatementContext,
        duration: Duration,
        result: &StatementResult,
    ) {
        for monitor in &self.monitors {
            monitor.on_statement_complete(ctx, duration, result);
        }
    }

    fn on_slow_statement(&self, ctx: &StatementContext, duration: Duration) {
        for monitor in &self.monitors {
            monitor.on_slow_statement(ctx, duration);
        }
    }
}

/// Runs hooks in order; each sees the CQL produced by the previous one.
#[derive(Default)]
pub struct CompositeHook {
    hooks: Vec<Arc<dyn StatementHook>>,
}

impl CompositeHook {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add<H: StatementHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    pub fn add_arc(mut self, hook: Arc<dyn StatementHook>) -> Self {
        self.hooks.push(hook);
        self
    }
}

impl StatementHook for CompositeHook {
    fn before_statement(&self, ctx: &StatementContext) -> HookAction {
        let mut current = ctx.clone();
        for hook in &self.hooks {
            match hook.before_statement(&current) {
                HookAction::Continue => {}
                HookAction::ModifyCql(cql) => {
                    current.statement_type = StatementType::from_cql(&cql);
                    current.cql = cql;
                }
                action @ HookAction::Abort(_) => return action,
            }
        }
        if current.cql != ctx.cql {
            HookAction::ModifyCql(current.cql)
        } else {
            HookAction::Continue
        }
    }

    fn after_statement(
        &self,
        ctx: &StatementContext,
        duration: Duration,
        result: &StatementResult,
    ) {
        for hook in &self.hooks {
            hook.after_statement(ctx, duration, result);
        }
    }
}
