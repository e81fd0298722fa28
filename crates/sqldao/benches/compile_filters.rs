use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqldao::{ColumnSchema, ColumnType, Dao, DaoOptions, Dialect, Filter, OrderBy};

/// A DAO over `t(id, col0, col1, ...)` with `n` text columns.
fn build_dao(n: usize) -> Dao {
    let mut schema = ColumnSchema::new().column("id", ColumnType::Integer);
    for i in 0..n {
        schema = schema.column(format!("col{i}"), ColumnType::Text);
    }
    Dao::new("t", schema, DaoOptions::new("id"), Dialect::Ansi).expect("valid config")
}

/// `col0 = ? AND col1 = ? ...`
fn build_filters(n: usize) -> Vec<Filter> {
    (0..n)
        .map(|i| Filter::eq(format!("col{i}"), format!("v{i}")))
        .collect()
}

fn bench_compile_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_filters");

    for n in [1, 5, 10, 50, 100] {
        let dao = build_dao(n);
        let filters = build_filters(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &filters, |b, filters| {
            b.iter(|| black_box(dao.compile_filters(Some(filters.as_slice()))));
        });
    }

    group.finish();
}

fn bench_list_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_query");

    for n in [1, 10, 100] {
        let dao = build_dao(n);
        let filters = build_filters(n);
        let order: Vec<OrderBy> = (0..n).map(|i| OrderBy::desc(format!("col{i}"))).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                black_box(dao.list_query(Some(filters.as_slice()), Some(order.as_slice())))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile_filters, bench_list_query);
criterion_main!(benches);
