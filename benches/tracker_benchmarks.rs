use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use snap_analog::TopKTracker;
use snap_analog::analysis::ExactCounter;

fn zipf_like_stream(len: usize, distinct: usize) -> Vec<String> {
    // Item i appears roughly distinct/(i+1) times per cycle.
    let mut items = Vec::with_capacity(len);
    let mut i = 0usize;
    while items.len() < len {
        let rank = i % distinct;
        for _ in 0..(distinct / (rank + 1)).max(1) {
            items.push(format!("10.0.{}.{}", rank / 256, rank % 256));
        }
        i += 1;
    }
    items.truncate(len);
    items
}

fn benchmark_add(c: &mut Criterion) {
    let stream = zipf_like_stream(50_000, 2_000);
    let mut group = c.benchmark_group("tracker_add");
    group.throughput(Throughput::Elements(stream.len() as u64));

    for k in [10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("top_k", k), &k, |b, &k| {
            b.iter(|| {
                let mut tracker = TopKTracker::new(k, "bench");
                for item in &stream {
                    tracker.add(item);
                }
                std::hint::black_box(tracker.get_top_k(10))
            });
        });
    }

    group.bench_function("exact", |b| {
        b.iter(|| {
            let mut counter = ExactCounter::new();
            for item in &stream {
                counter.add(item);
            }
            std::hint::black_box(counter.most_common(10))
        });
    });

    group.finish();
}

fn benchmark_prune(c: &mut Criterion) {
    let stream = zipf_like_stream(50_000, 5_000);
    let mut tracker = TopKTracker::new(100, "bench");
    for item in &stream {
        tracker.add(item);
    }

    c.bench_function("prune_20_percent", |b| {
        b.iter_batched(
            || tracker.clone(),
            |mut t| t.prune(20),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, benchmark_add, benchmark_prune);
criterion_main!(benches);
