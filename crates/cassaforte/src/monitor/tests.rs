use super::*;
use crate::error::{CqlError, CqlResult};
use crate::schema::{SchemaStatement, create_keyspace};
use crate::session::testing::RecordingSession;
use crate::session::CqlSession;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct Capture {
    contexts: Mutex<Vec<StatementContext>>,
    results: Mutex<Vec<StatementResult>>,
    slow: Mutex<bool>,
}

impl StatementMonitor for Capture {
    fn on_statement_complete(
        &self,
        ctx: &StatementContext,
        _: Duration,
        result: &StatementResult,
    ) {
        self.contexts.lock().unwrap().push(ctx.clone());
        self.results.lock().unwrap().push(result.clone());
    }

    fn on_slow_statement(&self, _: &StatementContext, _: Duration) {
        *self.slow.lock().unwrap() = true;
    }
}

struct SlowSession(Duration);

impl CqlSession for SlowSession {
    async fn execute(&self, _: &str) -> CqlResult<()> {
        tokio::time::sleep(self.0).await;
        Ok(())
    }
}

#[test]
fn statement_type_detection() {
    assert_eq!(
        StatementType::from_cql("CREATE KEYSPACE app;"),
        StatementType::Create
    );
    assert_eq!(
        StatementType::from_cql("  alter keyspace app WITH durable_writes = true;"),
        StatementType::Alter
    );
    assert_eq!(StatementType::from_cql("DROP KEYSPACE app;"), StatementType::Drop);
    assert_eq!(StatementType::from_cql("USE app;"), StatementType::Use);
    assert_eq!(
        StatementType::from_cql("SELECT * FROM t;"),
        StatementType::Other
    );
    assert_eq!(StatementType::from_cql("CREATED"), StatementType::Other);
    assert!(StatementType::Drop.is_schema_change());
    assert!(!StatementType::Use.is_schema_change());
}

#[test]
fn logging_monitor_truncation() {
    let monitor = LoggingMonitor::new().max_cql_length(10);
    assert_eq!(monitor.truncate_cql("CREATE KEYSPACE app;"), "CREATE KEY...");
    assert_eq!(monitor.truncate_cql("USE app;"), "USE app;");
}

#[test]
fn truncation_respects_char_boundaries() {
    assert_eq!(truncate_cql_bytes("aé", 2), "a");
    assert_eq!(truncate_cql_bytes("abc", 10), "abc");
}

#[test]
fn long_errors_are_truncated() {
    let result = StatementResult::error("x".repeat(600));
    match result {
        StatementResult::Error(msg) => assert_eq!(msg.len(), 515),
        StatementResult::Applied => panic!("expected error"),
    }
    assert_eq!(StatementResult::Applied.to_string(), "applied");
}

#[test]
fn stats_monitor_counts_by_type() {
    let monitor = StatsMonitor::new();
    monitor.on_statement_complete(
        &StatementContext::new("CREATE KEYSPACE a;"),
        Duration::from_millis(10),
        &StatementResult::Applied,
    );
    monitor.on_statement_complete(
        &StatementContext::new("DROP KEYSPACE a;"),
        Duration::from_millis(30),
        &StatementResult::error("boom"),
    );
    monitor.on_statement_complete(
        &StatementContext::new("USE b;"),
        Duration::from_millis(5),
        &StatementResult::Applied,
    );

    let stats = monitor.stats();
    assert_eq!(stats.total_statements, 3);
    assert_eq!(stats.failed_statements, 1);
    assert_eq!(stats.create_count, 1);
    assert_eq!(stats.drop_count, 1);
    assert_eq!(stats.use_count, 1);
    assert_eq!(stats.alter_count, 0);
    assert_eq!(stats.total_duration, Duration::from_millis(45));
    assert_eq!(stats.max_duration, Duration::from_millis(30));
    assert_eq!(stats.slowest_statement.as_deref(), Some("DROP KEYSPACE a;"));

    monitor.reset();
    assert_eq!(monitor.stats(), StatementStats::default());
}

#[test]
fn composite_hook_chains_rewrites() {
    struct Upper;
    impl StatementHook for Upper {
        fn before_statement(&self, ctx: &StatementContext) -> HookAction {
            HookAction::ModifyCql(ctx.cql.to_uppercase())
        }
    }
    struct Comment;
    impl StatementHook for Comment {
        fn before_statement(&self, ctx: &StatementContext) -> HookAction {
            HookAction::ModifyCql(format!("{} -- migrated", ctx.cql))
        }
    }

    let hook = CompositeHook::new().add(Upper).add(Comment);
    let action = hook.before_statement(&StatementContext::new("use app;"));
    assert_eq!(action, HookAction::ModifyCql("USE APP; -- migrated".into()));
}

#[test]
fn composite_hook_abort_short_circuits() {
    struct BlockDrops;
    impl StatementHook for BlockDrops {
        fn before_statement(&self, ctx: &StatementContext) -> HookAction {
            if ctx.statement_type == StatementType::Drop {
                HookAction::Abort("drops are disabled".into())
            } else {
                HookAction::Continue
            }
        }
    }

    let hook = CompositeHook::new().add(BlockDrops);
    assert_eq!(
        hook.before_statement(&StatementContext::new("DROP KEYSPACE app;")),
        HookAction::Abort("drops are disabled".into())
    );
    assert_eq!(
        hook.before_statement(&StatementContext::new("USE app;")),
        HookAction::Continue
    );
}

#[test]
fn composite_monitor_fans_out() {
    let a = Arc::new(StatsMonitor::new());
    let b = Arc::new(StatsMonitor::new());
    let composite = CompositeMonitor::new().add_arc(a.clone()).add_arc(b.clone());
    assert_eq!(composite.len(), 2);

    composite.on_statement_complete(
        &StatementContext::new("USE app;"),
        Duration::from_millis(1),
        &StatementResult::Applied,
    );
    assert_eq!(a.stats().total_statements, 1);
    assert_eq!(b.stats().total_statements, 1);
}

#[tokio::test]
async fn instrumented_session_reports_to_monitor() {
    let capture = Arc::new(Capture::default());
    let session = InstrumentedSession::new(RecordingSession::default())
        .with_config(MonitorConfig::new().enable_monitoring())
        .with_monitor_arc(capture.clone());

    create_keyspace("app").execute(&session).await.unwrap();
    session.execute_tagged("switch", "USE app;").await.unwrap();

    let contexts = capture.contexts.lock().unwrap();
    assert_eq!(contexts.len(), 2);
    assert_eq!(contexts[0].statement_type, StatementType::Create);
    assert_eq!(contexts[1].tag.as_deref(), Some("switch"));
    assert_eq!(
        session.inner().executed(),
        vec!["CREATE KEYSPACE app;", "USE app;"]
    );
}

#[tokio::test]
async fn monitoring_disabled_skips_monitor() {
    struct FailMonitor;
    impl StatementMonitor for FailMonitor {
        fn on_statement_complete(&self, _: &StatementContext, _: Duration, _: &StatementResult) {
            panic!("monitor called while monitoring is disabled");
        }
    }

    let session = InstrumentedSession::new(RecordingSession::default()).with_monitor(FailMonitor);
    assert!(!session.is_monitoring_enabled());
    session.execute("USE app;").await.unwrap();
}

#[tokio::test]
async fn hook_abort_prevents_execution() {
    struct AlwaysAbort;
    impl StatementHook for AlwaysAbort {
        fn before_statement(&self, _: &StatementContext) -> HookAction {
            HookAction::Abort("read-only session".into())
        }
    }

    let session = InstrumentedSession::new(RecordingSession::default()).with_hook(AlwaysAbort);
    let err = session.execute("DROP KEYSPACE app;").await.unwrap_err();
    assert!(matches!(err, CqlError::Other(ref msg) if msg.contains("read-only session")));
    assert!(session.inner().executed().is_empty());
}

#[tokio::test]
async fn added_hooks_compose_in_order() {
    struct Suffix(&'static str);
    impl StatementHook for Suffix {
        fn before_statement(&self, ctx: &StatementContext) -> HookAction {
            HookAction::ModifyCql(format!("{}{}", ctx.cql, self.0))
        }
    }

    let capture = Arc::new(Capture::default());
    let session = InstrumentedSession::new(RecordingSession::default())
        .add_hook(Suffix(" -- a"))
        .add_hook(Suffix(" -- b"))
        .enable_monitoring()
        .with_monitor_arc(capture.clone());

    session.execute("USE app;").await.unwrap();
    assert_eq!(session.inner().executed(), vec!["USE app; -- a -- b"]);

    let contexts = capture.contexts.lock().unwrap();
    assert!(contexts[0].is_rewritten());
    assert_eq!(contexts[0].original_cql, "USE app;");
}

#[tokio::test]
async fn server_errors_are_reported() {
    let capture = Arc::new(Capture::default());
    let session = InstrumentedSession::new(RecordingSession::failing_on("CREATE"))
        .enable_monitoring()
        .with_monitor_arc(capture.clone());

    let err = create_keyspace("app").execute(&session).await.unwrap_err();
    assert!(err.is_already_exists());
    assert!(capture.results.lock().unwrap()[0].is_error());
}

#[tokio::test]
async fn timeout_returns_error() {
    let capture = Arc::new(Capture::default());
    let session = InstrumentedSession::new(SlowSession(Duration::from_secs(60)))
        .with_config(
            MonitorConfig::new()
                .with_statement_timeout(Duration::from_millis(10))
                .enable_monitoring(),
        )
        .with_monitor_arc(capture.clone());

    let err = session.execute("CREATE KEYSPACE app;").await.unwrap_err();
    assert!(matches!(err, CqlError::Timeout(_)));
    assert!(err.is_timeout());
    assert_eq!(
        capture.results.lock().unwrap()[0],
        StatementResult::Error("timeout after 10ms".into())
    );
}

#[tokio::test]
async fn slow_statement_threshold() {
    let capture = Arc::new(Capture::default());
    let session = InstrumentedSession::new(SlowSession(Duration::from_millis(30)))
        .with_config(
            MonitorConfig::new()
                .with_slow_statement_threshold(Duration::from_millis(5))
                .enable_monitoring(),
        )
        .with_monitor_arc(capture.clone());

    session.execute("USE app;").await.unwrap();
    assert!(*capture.slow.lock().unwrap());
}

#[cfg(feature = "tracing")]
#[test]
fn tracing_hook_never_alters_statements() {
    let hook = TracingCqlHook::new()
        .level(tracing::Level::INFO)
        .max_cql_length(4);
    let ctx = StatementContext::new("CREATE KEYSPACE app;").with_field("migration", "001");
    assert_eq!(hook.before_statement(&ctx), HookAction::Continue);
}

#[test]
fn built_statements_feed_contexts() {
    let cql = create_keyspace("app").if_not_exists().build().unwrap();
    let ctx = StatementContext::new(&cql).with_tag("bootstrap");
    assert_eq!(ctx.statement_type, StatementType::Create);
    assert!(!ctx.is_rewritten());
}
