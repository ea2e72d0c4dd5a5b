use cbits::ChunkedBitmap;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_bitmap(c: &mut Criterion) {
    let mut group = c.benchmark_group("bitmap");
    let a: ChunkedBitmap = (0..1_000_000u32).step_by(3).collect();
    let b: ChunkedBitmap = (0..1_000_000u32).step_by(5).collect();

    group.bench_function("contains", |bench| {
        bench.iter(|| {
            for v in (0..1_000_000).step_by(97) {
                black_box(a.contains(v));
            }
        })
    });

    group.bench_function("and", |bench| bench.iter(|| black_box(&a & &b)));

    group.bench_function("or", |bench| bench.iter(|| black_box(&a | &b)));

    group.bench_function("rank", |bench| {
        bench.iter(|| {
            for v in (0..1_000_000).step_by(997) {
                black_box(a.rank(v));
            }
        })
    });

    group.bench_function("serialize", |bench| bench.iter(|| black_box(a.to_bytes())));
}

criterion_group!(benches, bench_bitmap);
criterion_main!(benches);
