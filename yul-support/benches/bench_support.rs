use criterion::{black_box, criterion_group, criterion_main, Criterion};
use yul_support::{FastHashMap, StringInterner};

fn bench_intern(c: &mut Criterion) {
    let interner = StringInterner::new();
    c.bench_function("intern_hello", |b| {
        b.iter(|| {
            let s = interner.intern(black_box("hello"));
            black_box(s);
        })
    });
}

fn bench_intern_fresh_names(c: &mut Criterion) {
    let interner = StringInterner::new();
    let mut counter = 0usize;
    c.bench_function("intern_fresh_names", |b| {
        b.iter(|| {
            counter += 1;
            let s = interner.intern(&format!("f_{}", black_box(counter)));
            black_box(s);
        })
    });
}

fn bench_reference_counts(c: &mut Criterion) {
    let interner = StringInterner::new();
    let names: Vec<&'static str> = (0..256).map(|i| interner.intern(&format!("x_{}", i))).collect();
    c.bench_function("count_references", |b| {
        b.iter(|| {
            let mut counts: FastHashMap<&'static str, usize> = FastHashMap::default();
            for name in &names {
                *counts.entry(black_box(*name)).or_default() += 1;
            }
            black_box(counts);
        })
    });
}

criterion_group!(benches, bench_intern, bench_intern_fresh_names, bench_reference_counts);
criterion_main!(benches);
