//! Keyspace DDL walkthrough.
//!
//! Run with: cargo run --example keyspace_ddl -p cassaforte
//!
//! Optionally set CASSANDRA_URL in .env or the environment, e.g.
//! CASSANDRA_URL=cassandra://localhost:9042/app?logging=true

use cassaforte::prelude::*;
use cassaforte::{CompositeMonitor, LoggingMonitor, StatsMonitor};
use std::sync::Arc;

/// Prints statements instead of sending them to a cluster.
struct PrintSession;

impl CqlSession for PrintSession {
    async fn execute(&self, cql: &str) -> CqlResult<()> {
        println!("-> {cql}");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> CqlResult<()> {
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env().unwrap_or_else(|_| ClientConfig::new().keyspace("demo"));
    println!("contact point: {}", config.contact_point());

    let stats = Arc::new(StatsMonitor::new());
    let session = cassaforte::InstrumentedSession::new(PrintSession)
        .with_config(config.monitor_config().enable_monitoring())
        .with_monitor(
            CompositeMonitor::new()
                .add(LoggingMonitor::new())
                .add_arc(stats.clone()),
        );

    let keyspace = config.keyspace.clone().unwrap_or_else(|| "demo".to_string());

    let script: Vec<KeyspaceStatement> = vec![
        schema::drop_keyspace(keyspace.as_str()).if_exists().into(),
        schema::create_keyspace(keyspace.as_str())
            .if_not_exists()
            .with_options()
            .replication_strategy(ReplicationStrategy::network_topology([("dc1", 3), ("dc2", 2)]))
            .into(),
        schema::alter_keyspace(keyspace.as_str())
            .with_options()
            .durable_writes(false)
            .into(),
    ];
    session.execute_all(&script).await?;
    session.use_keyspace(&keyspace).await?;

    match schema::create_keyspace("select").build() {
        Ok(cql) => println!("unexpected: {cql}"),
        Err(e) => println!("rejected: {e}"),
    }

    let stats = stats.stats();
    println!(
        "{} statements, {} failed",
        stats.total_statements, stats.failed_statements
    );
    Ok(())
}
