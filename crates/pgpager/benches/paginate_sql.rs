use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgpager::{Paginate, PaginateOptions, SelectQb, SqlQb, qb};

/// SELECT * FROM t WHERE col0 = $1 AND col1 = $2 ... ORDER BY id
fn build_filtered_select(n: usize) -> SelectQb {
    let mut q = qb::select("t");
    for i in 0..n {
        q = q.eq(&format!("col{i}"), i as i64);
    }
    q.order_by("id")
}

fn bench_paginate(c: &mut Criterion) {
    let mut group = c.benchmark_group("paginate/prepare");

    for n in [1, 5, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let paginated = build_filtered_select(n)
                    .paginate(PaginateOptions::new().per_page(25).current_page(1))
                    .unwrap();
                black_box(paginated.page_query().build());
                black_box(paginated.count_query().map(|c| c.build()));
            });
        });
    }

    group.finish();
}

fn bench_count_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("paginate/count_sql");

    for n in [1, 5, 10, 50] {
        let paginated = build_filtered_select(n)
            .group_by("col0")
            .paginate(PaginateOptions::new().per_page(25).length_aware(true))
            .unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &paginated, |b, p| {
            b.iter(|| black_box(p.count_query().map(|c| c.to_sql())));
        });
    }

    group.finish();
}

fn bench_parse_options(c: &mut Criterion) {
    let input = serde_json::json!({
        "perPage": "25",
        "currentPage": 3,
        "isLengthAware": true,
    });
    c.bench_function("paginate/parse_options", |b| {
        b.iter(|| black_box(PaginateOptions::try_from(&input).unwrap().slice()));
    });
}

criterion_group!(benches, bench_paginate, bench_count_sql, bench_parse_options);
criterion_main!(benches);
