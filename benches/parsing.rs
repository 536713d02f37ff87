//! Criterion benchmarks for record parsing and canonicalization.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use agent_aid::{AidRecord, KeyStyle, canonicalize_raw, parse};

const CASES: [(&str, &str); 4] = [
    ("minimal", "v=aid1;u=https://api.example.com/mcp;p=mcp"),
    (
        "full_names",
        "v=aid1;uri=https://api.example.com/mcp;proto=mcp;auth=pat;desc=Example agent",
    ),
    (
        "with_key",
        "v=aid1;u=https://api.example.com/mcp;p=mcp;k=z4wBqpZM9xaSheZzJSMawUKKwhdpChKbZ5eu5ky4Vigw;i=g1",
    ),
    (
        "everything",
        "v=aid1;u=https://api.example.com/mcp;p=mcp;a=oauth2_code;s=Example agent;d=https://docs.example.com/agent;e=2030-01-01T00:00:00Z;k=z4wBqpZM9xaSheZzJSMawUKKwhdpChKbZ5eu5ky4Vigw;i=g1",
    ),
];

/// Benchmark: parse with increasing field counts
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for (name, txt) in CASES {
        group.throughput(Throughput::Bytes(txt.len() as u64));
        group.bench_with_input(BenchmarkId::new("txt", name), &txt, |b, txt| {
            b.iter(|| parse(black_box(txt)));
        });
    }

    group.finish();
}

/// Benchmark: canonical and alias serialization of parsed records
fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");

    for (name, txt) in CASES {
        let record = AidRecord::parse(txt).expect("valid test record");
        group.bench_with_input(BenchmarkId::new("canonical", name), &record, |b, record| {
            b.iter(|| black_box(record).canonical());
        });
        group.bench_with_input(BenchmarkId::new("alias", name), &record, |b, record| {
            b.iter(|| black_box(record).to_txt(KeyStyle::Alias));
        });
    }

    group.finish();
}

/// Benchmark: string-to-string canonicalization
fn bench_canonicalize_raw(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonicalize_raw");

    for (name, txt) in CASES {
        group.bench_with_input(BenchmarkId::new("txt", name), &txt, |b, txt| {
            b.iter(|| canonicalize_raw(black_box(txt)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_serialize,
    bench_canonicalize_raw
);
criterion_main!(benches);
