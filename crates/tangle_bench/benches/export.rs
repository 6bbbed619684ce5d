//! Export pipeline benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io;
use tangle_bench::populated_tangle;
use tangle_core::StoreConfig;
use tangle_export::{ExportPipeline, Sink};

/// Benchmark a full export into a discarding sink.
fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    group.sample_size(20);

    for count in [100u64, 1000].iter() {
        let mut fixture = populated_tangle(*count);
        group.throughput(Throughput::Elements(*count));

        for verify in [true, false] {
            let tangle = fixture.open_with(&StoreConfig::new().verify_checksums(verify));
            let id = if verify { "verified" } else { "unverified" };
            group.bench_with_input(BenchmarkId::new(id, count), &tangle, |b, tangle| {
                b.iter(|| {
                    let mut pipeline = ExportPipeline::new(tangle, Sink::new(io::sink()));
                    black_box(pipeline.run().unwrap());
                });
            });
        }
    }
    group.finish();
}

/// Benchmark traversal of the metadata index alone.
fn bench_index_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_traversal");

    let mut fixture = populated_tangle(1000);
    let tangle = fixture.open();
    group.throughput(Throughput::Elements(1000));
    group.bench_function("1000", |b| {
        b.iter(|| {
            let count = tangle.metadata_hashes().filter(Result::is_ok).count();
            black_box(count);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_export, bench_index_traversal);
criterion_main!(benches);
