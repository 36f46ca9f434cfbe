//! Benchmarks comparing the engine variants
//!
//! Run with: cargo bench

use std::sync::Arc;
use std::thread;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use livestats::pipeline::SingleWriterStats;
use livestats::{ConcurrentStats, Statistics};

fn engines() -> Vec<(&'static str, Box<dyn Statistics>)> {
    vec![
        ("locked", Box::new(ConcurrentStats::locked())),
        ("batched", Box::new(ConcurrentStats::batched())),
        ("lock_free", Box::new(ConcurrentStats::lock_free())),
        ("single_writer", Box::new(SingleWriterStats::new())),
    ]
}

// ============================================================================
// Uncontended ingest: the per-event cost of each write path
// ============================================================================

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");
    group.throughput(Throughput::Elements(1));

    for (name, stats) in engines() {
        group.bench_function(name, |b| {
            let mut i = 0i32;
            b.iter(|| {
                stats.event(black_box(i));
                i = i.wrapping_add(1);
            });
        });
    }

    group.finish();
}

// ============================================================================
// Contended ingest: the same burst from several producer threads
// ============================================================================

fn bench_contended_ingest(c: &mut Criterion) {
    let producers = 4;
    let events_per_producer = 10_000;

    let mut group = c.benchmark_group("contended_ingest");
    group.throughput(Throughput::Elements((producers * events_per_producer) as u64));
    group.sample_size(10);

    for (name, stats) in engines() {
        let stats: Arc<dyn Statistics> = Arc::from(stats);
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut handles = Vec::new();
                for t in 0..producers {
                    let stats = Arc::clone(&stats);
                    handles.push(thread::spawn(move || {
                        for j in 0..events_per_producer {
                            stats.event(t * events_per_producer + j);
                        }
                    }));
                }
                for handle in handles {
                    handle.join().unwrap();
                }
            });
        });
    }

    group.finish();
}

// ============================================================================
// Read path: variance with pending per-thread state to flush
// ============================================================================

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");

    for (name, stats) in engines() {
        for i in 0..100_000 {
            stats.event(i % 1000);
        }
        // Let the pipeline catch up so reads measure the read path, not
        // consumer lag
        while stats.count() < 100_000 {
            thread::yield_now();
        }

        group.bench_function(name, |b| {
            b.iter(|| black_box(stats.variance()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ingest, bench_contended_ingest, bench_read);
criterion_main!(benches);
