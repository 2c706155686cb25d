//! Benchmarks for toolbar resolution.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use inkmount::capability::BUTTON_DEPENDENCIES;
use inkmount::toolbar::resolve;

fn bench_resolve_small(c: &mut Criterion) {
    let toolbar = ["bold", "italic", "link"];
    c.bench_function("resolve_small", |b| {
        b.iter(|| resolve(Some(black_box(&toolbar[..]))));
    });
}

fn bench_resolve_full(c: &mut Criterion) {
    let toolbar: Vec<&str> = BUTTON_DEPENDENCIES
        .iter()
        .flat_map(|row| row.buttons.iter().copied())
        .collect();
    c.bench_function("resolve_full", |b| {
        b.iter(|| resolve(Some(black_box(toolbar.as_slice()))));
    });
}

criterion_group!(benches, bench_resolve_small, bench_resolve_full);
criterion_main!(benches);
