//! Criterion benchmarks for the INI line codec and the hash-indexed store.
//!
//! Measures per-line classification latency and document get/set throughput,
//! the two hot paths of a load.
//!
//! Run with:
//! ```bash
//! cargo bench --package inifile --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use inifile::{classify, needs_quotes, Document};

// ── Line fixtures ─────────────────────────────────────────────────────────────

const LINES: &[(&str, &str)] = &[
    ("blank", ""),
    ("comment", "; a comment explaining the next block"),
    ("header", "[database]"),
    ("pair_short", "port=5432"),
    ("pair_spaced", "  host  =  db.internal.example.com  "),
    ("pair_quoted", "motd=\"welcome to the server\""),
];

/// Benchmarks `classify` for every line shape.
fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    for (name, line) in LINES {
        group.bench_with_input(BenchmarkId::new("line", name), line, |b, line| {
            b.iter(|| classify(black_box(line), black_box(1)).expect("line must classify"))
        });
    }

    // Worst case: a maximal legal line.
    let long = format!("key={}", "v".repeat(8000));
    group.bench_with_input(BenchmarkId::new("line", "pair_8k"), &long, |b, line| {
        b.iter(|| classify(black_box(line), black_box(1)).expect("line must classify"))
    });
    group.finish();
}

/// Benchmarks the quoting decision made once per written pair.
fn bench_needs_quotes(c: &mut Criterion) {
    let mut group = c.benchmark_group("needs_quotes");
    for (name, value) in &[("plain", "localhost"), ("spaced", "two words")] {
        group.bench_with_input(BenchmarkId::new("value", *name), value, |b, value| {
            b.iter(|| needs_quotes(black_box(value)))
        });
    }
    group.finish();
}

/// Benchmarks document get/set, which cost one lock plus two table probes.
fn bench_document_access(c: &mut Criterion) {
    let doc = Document::new();
    for s in 0..10 {
        for k in 0..50 {
            doc.set(&format!("section{s}"), &format!("key{k}"), "value")
                .expect("set must succeed");
        }
    }

    let mut group = c.benchmark_group("document");
    group.bench_function("get_hit", |b| {
        b.iter(|| {
            doc.get(black_box("section5"), black_box("key25"))
                .expect("pair is present")
        })
    });
    group.bench_function("set_overwrite", |b| {
        b.iter(|| {
            doc.set(black_box("section5"), black_box("key25"), black_box("value"))
                .expect("set must succeed")
        })
    });
    group.bench_function("get_int", |b| {
        doc.set("section0", "port", "8080").unwrap();
        b.iter(|| {
            doc.get_int(black_box("section0"), black_box("port"))
                .expect("value parses")
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_classify,
    bench_needs_quotes,
    bench_document_access
);
criterion_main!(benches);
