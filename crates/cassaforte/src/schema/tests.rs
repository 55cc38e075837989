//! Integration tests for the schema module.

use crate::error::{CqlError, ValidationError};
use crate::schema::{
    KeyspaceOptions, KeyspaceStatement, KeywordSet, OptionMap, ReplicationStrategy,
    SchemaStatement, alter_keyspace, create_keyspace, drop_keyspace,
};

fn simple_strategy(rf: i32) -> OptionMap {
    OptionMap::new()
        .with("class", "SimpleStrategy")
        .with("replication_factor", rf)
}

#[test]
fn test_create_basic() {
    let cql = create_keyspace("app").build().unwrap();
    assert_eq!(cql, "CREATE KEYSPACE app;");
}

#[test]
fn test_create_prefix_and_suffix() {
    for name in ["app", "analytics_v2", "Users"] {
        let cql = create_keyspace(name).build().unwrap();
        assert!(cql.starts_with("CREATE KEYSPACE "));
        assert!(cql.ends_with(&format!("{name};")));
    }
}

#[test]
fn test_create_if_not_exists() {
    let cql = create_keyspace("app").if_not_exists().build().unwrap();
    assert!(cql.contains("IF NOT EXISTS app"));
    assert_eq!(cql, "CREATE KEYSPACE IF NOT EXISTS app;");
}

#[test]
fn test_create_with_replication() {
    let cql = create_keyspace("app")
        .if_not_exists()
        .with_options()
        .replication(simple_strategy(3))
        .build()
        .unwrap();
    assert_eq!(
        cql,
        "CREATE KEYSPACE IF NOT EXISTS app WITH replication = {'class': 'SimpleStrategy', 'replication_factor': 3};"
    );
}

#[test]
fn test_create_with_both_options() {
    let cql = create_keyspace("app")
        .with_options()
        .durable_writes(true)
        .replication(simple_strategy(3))
        .build()
        .unwrap();
    assert_eq!(
        cql,
        "CREATE KEYSPACE app WITH durable_writes = true AND replication = {'class': 'SimpleStrategy', 'replication_factor': 3};"
    );
}

#[test]
fn test_options_last_write_wins() {
    let cql = create_keyspace("app")
        .with_options()
        .durable_writes(true)
        .replication(simple_strategy(3))
        .durable_writes(false)
        .replication(simple_strategy(1))
        .build()
        .unwrap();
    assert_eq!(cql.matches("durable_writes").count(), 1);
    assert_eq!(cql.matches("replication =").count(), 1);
    assert!(cql.contains("durable_writes = false"));
    assert!(cql.contains("'replication_factor': 1"));
}

#[test]
fn test_create_with_empty_options_omits_with() {
    let cql = create_keyspace("app").with_options().build().unwrap();
    assert_eq!(cql, "CREATE KEYSPACE app;");
    assert!(!cql.contains("WITH"));
}

#[test]
fn test_create_with_precomposed_options() {
    let options = KeyspaceOptions::new()
        .replication_strategy(ReplicationStrategy::network_topology([("dc1", 3)]))
        .durable_writes(true);
    let cql = create_keyspace("app").options(options).build().unwrap();
    assert_eq!(
        cql,
        "CREATE KEYSPACE app WITH replication = {'class': 'NetworkTopologyStrategy', 'dc1': 3} AND durable_writes = true;"
    );
}

#[test]
fn test_alter_durable_writes() {
    let cql = alter_keyspace("app")
        .with_options()
        .durable_writes(false)
        .build()
        .unwrap();
    assert_eq!(cql, "ALTER KEYSPACE app WITH durable_writes = false;");
}

#[test]
fn test_alter_requires_options() {
    let err = alter_keyspace("app").build().unwrap_err();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::MissingOptions { name: "app".into() })
    );

    let err = alter_keyspace("app").with_options().build().unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_drop_basic() {
    assert_eq!(drop_keyspace("n").build().unwrap(), "DROP KEYSPACE n;");
    assert_eq!(
        drop_keyspace("n").if_exists().build().unwrap(),
        "DROP KEYSPACE IF EXISTS n;"
    );
}

#[test]
fn test_build_is_idempotent() {
    let stmt = create_keyspace("app")
        .with_options()
        .replication(simple_strategy(3));
    let first = stmt.build().unwrap();
    let second = stmt.build().unwrap();
    assert_eq!(first, second);
    assert_eq!(stmt.query_string(), Some(first.as_str()));
}

#[test]
fn test_query_string_empty_before_build() {
    let stmt = drop_keyspace("app");
    assert_eq!(stmt.query_string(), None);
    stmt.build().unwrap();
    assert_eq!(stmt.query_string(), Some("DROP KEYSPACE app;"));
}

#[test]
fn test_reserved_keyword_rejected() {
    for name in ["select", "SELECT", "Keyspace", "with"] {
        let err = create_keyspace(name).build().unwrap_err();
        assert_eq!(
            err.as_validation(),
            Some(&ValidationError::ReservedKeyword {
                keyword: name.to_string()
            })
        );
    }
}

#[test]
fn test_empty_name_rejected() {
    let err = drop_keyspace("").build().unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::EmptyName));

    let err = create_keyspace("   ").build().unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::EmptyName));
}

#[test]
fn test_malformed_name_rejected() {
    let err = create_keyspace("app; DROP KEYSPACE prod").build().unwrap_err();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::InvalidName {
            name: "app; DROP KEYSPACE prod".to_string()
        })
    );
    assert_eq!(
        create_keyspace("app; DROP KEYSPACE prod").query_string(),
        None
    );

    let err = drop_keyspace("my app").if_exists().build().unwrap_err();
    assert!(matches!(
        err.as_validation(),
        Some(ValidationError::InvalidName { .. })
    ));

    let err = create_keyspace("  app ").build().unwrap_err();
    assert!(matches!(
        err.as_validation(),
        Some(ValidationError::InvalidName { .. })
    ));
}

#[test]
fn test_quoted_name_is_rendered_verbatim() {
    assert_eq!(
        create_keyspace(r#""My App""#).build().unwrap(),
        r#"CREATE KEYSPACE "My App";"#
    );
    assert_eq!(
        drop_keyspace(r#""select""#).build().unwrap(),
        r#"DROP KEYSPACE "select";"#
    );
}

#[test]
fn test_failed_build_leaves_no_text() {
    let stmt = create_keyspace("select");
    assert!(stmt.build().is_err());
    assert_eq!(stmt.query_string(), None);

    // Still configurable after a failed build.
    let stmt = stmt.if_not_exists();
    assert!(stmt.build_with(&KeywordSet::new()).is_ok());
}

#[test]
fn test_custom_keyword_set() {
    let keywords = KeywordSet::new().with_keyword("graph");
    let err = create_keyspace("graph").build_with(&keywords).unwrap_err();
    assert!(err.is_validation());

    let cql = create_keyspace("select").build_with(&keywords).unwrap();
    assert_eq!(cql, "CREATE KEYSPACE select;");
}

#[test]
fn test_mutation_after_build_is_state_error() {
    let stmt = create_keyspace("app");
    assert_eq!(stmt.build().unwrap(), "CREATE KEYSPACE app;");

    let stmt = stmt.if_not_exists();
    let err = stmt.build().unwrap_err();
    assert!(matches!(err, CqlError::State(_)));
    // The ignored setter did not change the memoized text.
    assert_eq!(stmt.query_string(), Some("CREATE KEYSPACE app;"));
}

#[test]
fn test_options_after_build_is_state_error() {
    let stmt = alter_keyspace("app").with_options().durable_writes(true);
    stmt.build().unwrap();
    let stmt = stmt.durable_writes(false);
    assert!(stmt.build().unwrap_err().is_state());
    assert_eq!(
        stmt.to_cql(),
        "ALTER KEYSPACE app WITH durable_writes = true;"
    );
}

#[test]
fn test_opening_options_after_build_keeps_memo() {
    let stmt = create_keyspace("app").if_not_exists();
    let cql = stmt.build().unwrap();
    let opts = stmt.with_options();
    assert_eq!(opts.build().unwrap(), cql);
    assert_eq!(opts.query_string(), Some(cql.as_str()));
}

#[test]
fn test_into_statement_keeps_options() {
    let stmt = create_keyspace("app")
        .with_options()
        .durable_writes(false)
        .into_statement()
        .if_not_exists();
    assert_eq!(
        stmt.build().unwrap(),
        "CREATE KEYSPACE IF NOT EXISTS app WITH durable_writes = false;"
    );
}

#[test]
fn test_to_cql_skips_validation() {
    assert_eq!(create_keyspace("select").to_cql(), "CREATE KEYSPACE select;");
    assert_eq!(drop_keyspace("app").if_exists().to_string(), "DROP KEYSPACE IF EXISTS app;");
}

#[test]
fn test_keyspace_statement_script() {
    let script: Vec<KeyspaceStatement> = vec![
        create_keyspace("app").if_not_exists().into(),
        alter_keyspace("app")
            .with_options()
            .replication_strategy(ReplicationStrategy::simple(2))
            .into(),
        drop_keyspace("old").if_exists().into(),
    ];

    let built: Vec<String> = script.iter().map(|s| s.build().unwrap()).collect();
    assert_eq!(
        built,
        vec![
            "CREATE KEYSPACE IF NOT EXISTS app;",
            "ALTER KEYSPACE app WITH replication = {'class': 'SimpleStrategy', 'replication_factor': 2};",
            "DROP KEYSPACE IF EXISTS old;",
        ]
    );
    assert_eq!(script[2].keyspace_name(), "old");
}
