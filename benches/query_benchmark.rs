// Query pipeline benchmarks
// Author: Gabriel Demetrios Lafis

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use csv_query_api::data::introspect;
use csv_query_api::query::run_query;

fn build_csv(rows: usize) -> Vec<u8> {
    let mut out = String::from("id,value,label\n");

    for i in 0..rows {
        out.push_str(&format!("{},{}.5,row{}\n", i, (i * 37) % 1000, i % 10));
    }

    out.into_bytes()
}

fn bench_query(c: &mut Criterion) {
    let bytes = build_csv(10_000);

    c.bench_function("introspect_10k", |b| {
        b.iter(|| introspect(black_box(&bytes)).unwrap())
    });

    c.bench_function("filter_and_sort_10k", |b| {
        b.iter(|| {
            run_query(
                black_box(&bytes),
                Some("value__gt__250.0"),
                Some("value:false,id:true"),
            )
            .unwrap()
        })
    });

    c.bench_function("passthrough_10k", |b| {
        b.iter(|| run_query(black_box(&bytes), None, None).unwrap())
    });
}

criterion_group!(benches, bench_query);
criterion_main!(benches);
