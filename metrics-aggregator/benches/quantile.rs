use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use metrics_aggregator::{parse_invariants, Estimator, Registry, Summary, DEFAULT_INVARIANTS, Opts};

fn estimator() -> Estimator {
    Estimator::new(parse_invariants(&DEFAULT_INVARIANTS).unwrap())
}

fn quantile_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantile");

    group.bench_function("observe", |b| {
        let mut estimator = estimator();
        let mut value = 0u64;
        b.iter(|| {
            value = (value + 7919) % 100_000;
            estimator.observe(value as f64);
        })
    });

    group.bench_function("query after 100k observations", |b| {
        b.iter_batched_ref(
            || {
                let mut estimator = estimator();
                for i in 0..100_000u64 {
                    estimator.observe(((i * 7919) % 100_000) as f64);
                }
                estimator.flush();
                estimator
            },
            |estimator| estimator.query(0.99),
            BatchSize::LargeInput,
        )
    });

    group.bench_function("summary observe (labels)", |b| {
        let registry = Registry::new();
        let opts = Opts::new("latency_seconds", "").registry(&registry);
        let summary = Summary::with_opts(opts, &DEFAULT_INVARIANTS).unwrap();
        b.iter(|| summary.observe([("route", "/"), ("method", "GET")], 0.25).unwrap())
    });

    group.finish();
}

criterion_group!(benches, quantile_benchmark);
criterion_main!(benches);
