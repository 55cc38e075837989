use cassaforte::prelude::*;
use cassaforte::{KeywordSet, StatsMonitor};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MemorySession {
    log: Mutex<Vec<String>>,
}

impl CqlSession for MemorySession {
    async fn execute(&self, cql: &str) -> CqlResult<()> {
        if cql == "CREATE KEYSPACE exists_already;" {
            return Err(CqlError::from_server_error(
                0x2400,
                "Keyspace exists_already already exists",
            ));
        }
        self.log.lock().unwrap().push(cql.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn bootstrap_script_runs_in_order() {
    let stats = Arc::new(StatsMonitor::new());
    let session = ClientConfig::new()
        .logging_enabled(true)
        .instrument(MemorySession::default())
        .with_monitor_arc(stats.clone());

    let script: Vec<KeyspaceStatement> = vec![
        schema::drop_keyspace("analytics").if_exists().into(),
        schema::create_keyspace("analytics")
            .with_options()
            .replication_strategy(ReplicationStrategy::simple(1))
            .into(),
        schema::alter_keyspace("analytics")
            .with_options()
            .durable_writes(false)
            .into(),
    ];
    session.execute_all(&script).await.unwrap();
    session.use_keyspace("analytics").await.unwrap();

    assert_eq!(
        *session.inner().log.lock().unwrap(),
        vec![
            "DROP KEYSPACE IF EXISTS analytics;",
            "CREATE KEYSPACE analytics WITH replication = {'class': 'SimpleStrategy', 'replication_factor': 1};",
            "ALTER KEYSPACE analytics WITH durable_writes = false;",
            "USE analytics;",
        ]
    );

    let stats = stats.stats();
    assert_eq!(stats.total_statements, 4);
    assert_eq!(stats.create_count, 1);
    assert_eq!(stats.use_count, 1);
}

#[tokio::test]
async fn already_exists_is_distinguishable() {
    let session = MemorySession::default();
    let err = schema::create_keyspace("exists_already")
        .execute(&session)
        .await
        .unwrap_err();
    assert!(err.is_already_exists());

    schema::create_keyspace("exists_already")
        .if_not_exists()
        .execute(&session)
        .await
        .unwrap();
    assert_eq!(
        *session.log.lock().unwrap(),
        vec!["CREATE KEYSPACE IF NOT EXISTS exists_already;"]
    );
}

#[test]
fn extended_keyword_sets_come_from_toml() {
    let keywords = KeywordSet::from_toml_str(
        r#"
        keywords = ["analytics"]
        "#,
    )
    .unwrap();
    assert!(keywords.contains("SELECT"));

    let err = schema::create_keyspace("Analytics")
        .build_with(&keywords)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation error: The keyspace name 'Analytics' is not allowed because it is a reserved keyword"
    );
    assert!(schema::create_keyspace("analytics").build().is_ok());
}

#[test]
fn statements_render_through_display() {
    let stmt = schema::drop_keyspace("old");
    assert_eq!(stmt.to_string(), "DROP KEYSPACE old;");
}
