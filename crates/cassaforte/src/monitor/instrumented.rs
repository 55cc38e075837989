use super::config::MonitorConfig;
use super::monitors::{CompositeHook, NoopMonitor};
use super::types::{
    HookAction, StatementContext, StatementHook, StatementMonitor, StatementResult, StatementType,
};
use crate::error::{CqlError, CqlResult};
use crate::session::CqlSession;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Wraps a [`CqlSession`] with hooks, monitors and a statement timeout.
///
/// Monitors only receive events once `MonitorConfig::enable_monitoring()` is set.
pub struct InstrumentedSession<S> {
    session: S,
    monitor: Arc<dyn StatementMonitor>,
    hook: Option<Arc<dyn StatementHook>>,
    config: MonitorConfig,
}

impl<S: CqlSession> InstrumentedSession<S> {
    pub fn new(session: S) -> Self {
        Self {
            session,
            monitor: Arc::new(NoopMonitor),
            hook: None,
            config: MonitorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_monitor<M: StatementMonitor + 'static>(mut self, monitor: M) -> Self {
        self.monitor = Arc::new(monitor);
        self
    }

    pub fn with_monitor_arc(mut self, monitor: Arc<dyn StatementMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    /// Replace any existing hook.
    pub fn with_hook<H: StatementHook + 'static>(mut self, hook: H) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Add a hook after any existing one.
    pub fn add_hook<H: StatementHook + 'static>(self, hook: H) -> Self {
        self.add_hook_arc(Arc::new(hook))
    }

    pub fn add_hook_arc(mut self, hook: Arc<dyn StatementHook>) -> Self {
        self.hook = Some(match self.hook.take() {
            None => hook,
            Some(existing) => Arc::new(CompositeHook::new().add_arc(existing).add_arc(hook)),
        });
        self
    }

    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.config.statement_timeout = Some(timeout);
        self
    }

    pub fn enable_monitoring(mut self) -> Self {
        self.config.monitoring_enabled = true;
        self
    }

    pub fn is_monitoring_enabled(&self) -> bool {
        self.config.monitoring_enabled
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn inner(&self) -> &S {
        &self.session
    }

    pub fn into_inner(self) -> S {
        self.session
    }

    fn apply_hook(&self, ctx: &mut StatementContext) -> CqlResult<()> {
        let Some(hook) = &self.hook else {
            return Ok(());
        };
        match hook.before_statement(ctx) {
            HookAction::Continue => Ok(()),
            HookAction::ModifyCql(cql) => {
                ctx.statement_type = StatementType::from_cql(&cql);
                ctx.cql = cql;
                Ok(())
            }
            HookAction::Abort(reason) => Err(CqlError::Other(format!(
                "Statement aborted by hook: {reason}"
            ))),
        }
    }

    fn report(&self, ctx: &StatementContext, duration: Duration, result: &StatementResult) {
        if !self.config.monitoring_enabled {
            return;
        }
        if let Some(hook) = &self.hook {
            hook.after_statement(ctx, duration, result);
        }
        self.monitor.on_statement_complete(ctx, duration, result);
        if self
            .config
            .slow_statement_threshold
            .is_some_and(|threshold| duration > threshold)
        {
            self.monitor.on_slow_statement(ctx, duration);
        }
    }

    async fn with_timeout<F>(&self, future: F) -> CqlResult<()>
    where
        F: std::future::Future<Output = CqlResult<()>> + Send,
    {
        match self.config.statement_timeout {
            Some(timeout) => {
                tokio::pin!(future);
                tokio::select! {
                    result = &mut future => result,
                    _ = tokio::time::sleep(timeout) => Err(CqlError::Timeout(timeout)),
                }
            }
            None => future.await,
        }
    }

    async fn execute_inner(&self, cql: &str, tag: Option<&str>) -> CqlResult<()> {
        let mut ctx = StatementContext::new(cql);
        ctx.tag = tag.map(str::to_string);

        self.apply_hook(&mut ctx)?;

        if self.config.monitoring_enabled {
            self.monitor.on_statement_start(&ctx);
        }

        let start = Instant::now();
        let result = match tag {
            Some(tag) => {
                self.with_timeout(self.session.execute_tagged(tag, &ctx.cql))
                    .await
            }
            None => self.with_timeout(self.session.execute(&ctx.cql)).await,
        };
        let duration = start.elapsed();

        let outcome = match &result {
            Ok(()) => StatementResult::Applied,
            Err(CqlError::Timeout(d)) => StatementResult::error(format!("timeout after {d:?}")),
            Err(e) => StatementResult::error(e.to_string()),
        };
        self.report(&ctx, duration, &outcome);

        #[cfg(feature = "tracing")]
        if let Err(e) = &result {
            tracing::warn!(
                target: "cassaforte.cql",
                statement_type = ?ctx.statement_type,
                error = %e,
                "statement failed"
            );
        }

        result
    }
}

impl<S: CqlSession> CqlSession for InstrumentedSession<S> {
    async fn execute(&self, cql: &str) -> CqlResult<()> {
        self.execute_inner(cql, None).await
    }

    async fn execute_tagged(&self, tag: &str, cql: &str) -> CqlResult<()> {
        self.execute_inner(cql, Some(tag)).await
    }
}
