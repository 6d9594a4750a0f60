//! Criterion benchmarks for path navigation.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use indexmap::IndexMap;
use serde_json::json;
use spelunk::{LazySeq, OpCall, Segment, Value, navigate, path_from_json};

/// A record nested `depth` levels deep, plus the path to its leaf.
fn nested_doc(depth: usize) -> (Value, Vec<Segment>) {
    let mut doc = Value::from(json!({"leaf": 1}));
    let mut path = Vec::with_capacity(depth + 1);
    for level in (0..depth).rev() {
        let mut wrap = IndexMap::new();
        wrap.insert(format!("level{}", level), doc);
        doc = Value::Map(wrap);
    }
    for level in 0..depth {
        path.push(Segment::from(format!("level{}", level)));
    }
    path.push(Segment::from("leaf"));
    (doc, path)
}

/// A flat sequence of `width` small records.
fn wide_doc(width: usize) -> Value {
    (0..width)
        .map(|i| Value::from(json!({"id": i, "score": i % 7})))
        .collect()
}

fn bench_unit_navigation(c: &mut Criterion) {
    let mut group = c.benchmark_group("unit_navigation");

    for depth in [8usize, 64] {
        let (doc, path) = nested_doc(depth);
        group.bench_with_input(BenchmarkId::new("depth", depth), &(doc, path), |b, (doc, path)| {
            b.iter(|| navigate(black_box(doc.clone()), black_box(path)))
        });
    }
    group.finish();
}

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out");

    for width in [1_000usize, 10_000] {
        let doc = wide_doc(width);
        let path = vec![Segment::Iterate, Segment::from("id")];
        group.bench_with_input(BenchmarkId::new("width", width), &doc, |b, doc| {
            b.iter(|| navigate(black_box(doc.clone()), black_box(&path)))
        });
    }
    group.finish();
}

fn bench_op_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("op_pipeline");

    for width in [1_000usize, 10_000] {
        let doc = wide_doc(width);
        let path = vec![
            Segment::Iterate,
            Segment::from("score"),
            Segment::Invoke(OpCall::stream("select").with("even")),
        ];
        group.bench_with_input(BenchmarkId::new("width", width), &doc, |b, doc| {
            b.iter(|| navigate(black_box(doc.clone()), black_box(&path)))
        });
    }
    group.finish();
}

/// Prefix access on an unbounded stream: cost tracks the forced prefix, not
/// any underlying size.
fn bench_lazy_prefix(c: &mut Criterion) {
    let mut group = c.benchmark_group("lazy_prefix");

    for position in [100i64, 10_000] {
        let path = vec![Segment::Iterate, Segment::from("v"), Segment::Rebox, Segment::from(position)];
        group.bench_with_input(BenchmarkId::new("position", position), &path, |b, path| {
            b.iter(|| {
                let stream = LazySeq::new(|| (0i64..).map(|i| Value::from(json!({"v": i}))));
                navigate(black_box(stream), black_box(path))
            })
        });
    }
    group.finish();
}

fn bench_descriptor_parse(c: &mut Criterion) {
    let descriptor = json!([
        "store",
        "books",
        {"start": 0, "end": 512, "exclusive": true},
        [],
        "title",
        [{"op": "length"}],
        {"op": "sort"},
        [[]],
        0,
    ]);

    c.bench_function("descriptor_parse", |b| {
        b.iter(|| path_from_json(black_box(&descriptor)))
    });
}

criterion_group!(
    benches,
    bench_unit_navigation,
    bench_fan_out,
    bench_op_pipeline,
    bench_lazy_prefix,
    bench_descriptor_parse
);
criterion_main!(benches);
