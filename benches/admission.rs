use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use registry_throttle::infrastructure::mocks::document::sample_document;
use registry_throttle::{DocumentSink, DocumentSubmitter, PolicyKind, RateLimiter, WriteError};
use std::sync::Arc;
use std::time::Duration;

const POLICIES: [(&str, PolicyKind); 3] = [
    ("restarting_window", PolicyKind::RestartingWindow),
    ("fixed_window", PolicyKind::FixedWindow),
    ("sliding_window", PolicyKind::SlidingWindow),
];

/// Sink that drops every payload.
#[derive(Debug)]
struct NullSink;

impl DocumentSink for NullSink {
    fn write(&self, _destination: &str, payload: &str) -> Result<(), WriteError> {
        black_box(payload);
        Ok(())
    }
}

fn limiter(policy: PolicyKind, max_requests: usize) -> RateLimiter {
    RateLimiter::builder()
        .with_window(Duration::from_secs(1))
        .with_max_requests(max_requests)
        .with_policy(policy)
        .build()
        .unwrap()
}

/// Benchmark single-threaded admission decisions
fn bench_single_threaded(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_threaded");
    group.throughput(Throughput::Elements(1000));

    for (name, policy) in POLICIES {
        group.bench_with_input(
            BenchmarkId::new("try_acquire", name),
            &policy,
            |b, &policy| {
                let limiter = limiter(policy, 100);
                b.iter(|| {
                    for _ in 0..1000 {
                        black_box(limiter.try_acquire());
                    }
                })
            },
        );
    }

    group.finish();
}

/// Benchmark contended admission decisions on one shared limiter
fn bench_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");

    for num_threads in [2, 4, 8].iter() {
        group.throughput(Throughput::Elements((*num_threads as u64) * 1000));

        group.bench_with_input(
            BenchmarkId::new("threads", num_threads),
            num_threads,
            |b, &num_threads| {
                b.iter(|| {
                    let limiter = Arc::new(limiter(PolicyKind::RestartingWindow, 100));

                    let handles: Vec<_> = (0..num_threads)
                        .map(|_| {
                            let limiter = Arc::clone(&limiter);
                            std::thread::spawn(move || {
                                for _ in 0..1000 {
                                    black_box(limiter.try_acquire());
                                }
                            })
                        })
                        .collect();

                    for handle in handles {
                        handle.join().unwrap();
                    }
                })
            },
        );
    }

    group.finish();
}

/// Benchmark the full submit path: eligibility, admission, serialization
fn bench_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit");
    let document = sample_document("RF");

    group.bench_function("admitted", |b| {
        let submitter = DocumentSubmitter::new(
            Arc::new(limiter(PolicyKind::RestartingWindow, usize::MAX)),
            NullSink,
        );
        b.iter(|| black_box(submitter.submit(black_box(&document), "doc.json")))
    });

    group.bench_function("rate_limited", |b| {
        let submitter = DocumentSubmitter::new(
            Arc::new(limiter(PolicyKind::RestartingWindow, 1)),
            NullSink,
        );
        submitter.submit(&document, "doc.json");
        b.iter(|| black_box(submitter.submit(black_box(&document), "doc.json")))
    });

    group.bench_function("ineligible", |b| {
        let foreign = sample_document("XX");
        let submitter = DocumentSubmitter::new(
            Arc::new(limiter(PolicyKind::RestartingWindow, 1)),
            NullSink,
        );
        b.iter(|| black_box(submitter.submit(black_box(&foreign), "doc.json")))
    });

    group.finish();
}

criterion_group!(benches, bench_single_threaded, bench_concurrent, bench_submit);
criterion_main!(benches);
