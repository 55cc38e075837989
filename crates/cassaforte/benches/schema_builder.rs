use cassaforte::codec::{CodecRegistry, CqlValue, DataType};
use cassaforte::schema::{self, KeywordSet, OptionMap};
use cassaforte::{ReplicationStrategy, SchemaStatement};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn datacenters(n: usize) -> ReplicationStrategy {
    ReplicationStrategy::network_topology((0..n).map(|i| (format!("dc{i}"), 3)))
}

fn bench_build_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_builder/create_keyspace");

    for n in [1, 4, 16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let cql = schema::create_keyspace(black_box("app"))
                    .if_not_exists()
                    .with_options()
                    .replication_strategy(datacenters(n))
                    .durable_writes(true)
                    .build();
                black_box(cql)
            });
        });
    }

    group.finish();
}

fn bench_memoized_build(c: &mut Criterion) {
    let stmt = schema::alter_keyspace("app")
        .with_options()
        .replication(
            OptionMap::new()
                .with("class", "SimpleStrategy")
                .with("replication_factor", 3),
        )
        .into_statement();
    let _ = stmt.build();

    c.bench_function("schema_builder/memoized_build", |b| {
        b.iter(|| black_box(stmt.build()));
    });
}

fn bench_keyword_check(c: &mut Criterion) {
    let keywords = KeywordSet::cql();
    c.bench_function("schema_builder/keyword_check", |b| {
        b.iter(|| {
            black_box(keywords.contains(black_box("select")));
            black_box(keywords.contains(black_box("analytics")));
        });
    });
}

fn bench_list_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/list_int");
    let registry = CodecRegistry::new();
    let ty = DataType::list(DataType::Int);

    for n in [10, 100, 1000] {
        let value = CqlValue::list(0..n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &value, |b, value| {
            b.iter(|| black_box(registry.encode(&ty, value)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_build_create,
    bench_memoized_build,
    bench_keyword_check,
    bench_list_codec
);
criterion_main!(benches);
