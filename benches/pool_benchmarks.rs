use bounded_pool::{Config, ThreadPoolInner};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

// Submission overhead plus drain time for batches of trivial tasks.
fn bench_submit_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_throughput");

    for size in [100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("block", size), &size, |b, &size| {
            let pool = ThreadPoolInner::with_config(Config::fixed(num_cpus::get(), size));
            b.iter(|| {
                let completed = Arc::new(AtomicUsize::new(0));
                for i in 0..size {
                    let completed = completed.clone();
                    pool.submit(move || {
                        black_box(i);
                        completed.fetch_add(1, Ordering::Relaxed);
                    })
                    .unwrap();
                }
                while completed.load(Ordering::Relaxed) < size {
                    thread::yield_now();
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("caller_runs", size), &size, |b, &size| {
            let pool = ThreadPoolInner::with_config(Config::caller_runs(num_cpus::get()));
            b.iter(|| {
                let completed = Arc::new(AtomicUsize::new(0));
                for i in 0..size {
                    let completed = completed.clone();
                    pool.submit(move || {
                        black_box(i);
                        completed.fetch_add(1, Ordering::Relaxed);
                    })
                    .unwrap();
                }
                while completed.load(Ordering::Relaxed) < size {
                    thread::yield_now();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_submit_throughput);
criterion_main!(benches);
