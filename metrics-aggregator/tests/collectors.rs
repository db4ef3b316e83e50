use std::sync::Once;

use approx::assert_relative_eq;
use metrics_aggregator::{
    key_of, Collector, Counter, Error, Gauge, Histogram, IntoLabels, LabelKey, MetricKind,
    MetricValue, Opts, Registry, Summary, DEFAULT_INVARIANTS, NO_LABELS,
};
use proptest::prelude::*;

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

fn opts(registry: &Registry, name: &str) -> Opts {
    Opts::new(name, format!("{} doc", name)).registry(registry)
}

#[test]
fn label_order_does_not_matter() {
    init_tracing();
    let registry = Registry::new();
    let gauge = Gauge::with_opts(opts(&registry, "ordered")).unwrap();

    gauge.set([("a", "1"), ("b", "2")], 7.0).unwrap();
    assert_eq!(gauge.get([("b", "2"), ("a", "1")]).unwrap(), 7.0);
    assert_eq!(gauge.values().len(), 1);

    let stored = gauge.values().remove(0).0;
    assert_eq!(key_of(&stored), LabelKey::parse(r#"{"b":"2","a":"1"}"#).unwrap());
}

#[test]
fn counter_rejects_decrease() {
    init_tracing();
    let registry = Registry::new();
    let counter = Counter::with_opts(opts(&registry, "monotonic_total")).unwrap();

    counter.add(NO_LABELS, 3.0).unwrap();
    assert_eq!(counter.add(NO_LABELS, -1.0), Err(Error::NegativeIncrement { value: -1.0 }));
    assert_eq!(counter.get(NO_LABELS).unwrap(), 3.0);
}

#[test]
fn gauge_inc_dec_cancel() {
    init_tracing();
    let registry = Registry::new();
    let gauge = Gauge::with_opts(opts(&registry, "balance")).unwrap();
    let labels = [("account", "x")];

    gauge.set(labels, -12.5).unwrap();
    gauge.inc(labels).unwrap();
    gauge.dec(labels).unwrap();
    assert_eq!(gauge.get(labels).unwrap(), -12.5);
}

#[test]
fn histogram_literal_buckets() {
    init_tracing();
    let registry = Registry::new();
    let histogram = Histogram::with_opts(opts(&registry, "h"), &[5.0, 10.0, 15.0]).unwrap();

    for value in [3.0, 5.2, 13.0, 4.0] {
        histogram.observe([("data", 1)], value).unwrap();
    }

    let value = histogram.get([("data", "1")]).unwrap();
    assert_eq!(value.buckets, vec![(5.0, 2), (10.0, 3), (15.0, 4), (f64::INFINITY, 4)]);
    assert_eq!(value.count, 4);
    assert_relative_eq!(value.sum, 25.2);
}

#[test]
fn summary_sum_and_count_are_exact() {
    init_tracing();
    let registry = Registry::new();
    let summary = Summary::with_opts(opts(&registry, "s"), &DEFAULT_INVARIANTS).unwrap();

    for value in [3.0, 5.2, 13.0, 4.0] {
        summary.observe([("data", 1)], value).unwrap();
    }

    let value = summary.get([("data", 1)]).unwrap();
    assert_eq!(value.count, 4);
    assert_relative_eq!(value.sum, 25.2);
}

#[test]
fn registration_is_unique_until_deregistered() {
    init_tracing();
    let registry = Registry::new();

    Counter::with_opts(opts(&registry, "shared_name")).unwrap();
    let duplicate = Histogram::with_opts(opts(&registry, "shared_name"), &[1.0]);
    assert!(matches!(duplicate, Err(Error::DuplicateName { .. })));

    registry.deregister("shared_name").unwrap();
    assert!(matches!(registry.deregister("shared_name"), Err(Error::NotFound { .. })));

    let histogram = Histogram::with_opts(opts(&registry, "shared_name"), &[1.0]).unwrap();
    assert_eq!(histogram.kind(), MetricKind::Histogram);
    assert_eq!(registry.get("shared_name").unwrap().kind(), MetricKind::Histogram);
}

#[test]
fn reserved_labels_are_rejected() {
    init_tracing();
    let registry = Registry::new();

    let counter = Counter::with_opts(opts(&registry, "c")).unwrap();
    let gauge = Gauge::with_opts(opts(&registry, "g")).unwrap();
    let summary = Summary::with_opts(opts(&registry, "s"), &DEFAULT_INVARIANTS).unwrap();
    let histogram = Histogram::with_opts(opts(&registry, "h"), &[1.0]).unwrap();

    let job = [("job", "x")];
    assert!(matches!(counter.set_value(job, 1.0), Err(Error::InvalidLabel { .. })));
    assert!(matches!(gauge.set_value(job, 1.0), Err(Error::InvalidLabel { .. })));
    assert!(matches!(summary.add(job, 1.0), Err(Error::InvalidLabel { .. })));
    assert!(matches!(histogram.add(job, 1.0), Err(Error::InvalidLabel { .. })));

    let le = [("le", 1)];
    assert!(counter.set_value(le, 1.0).is_ok());
    assert!(gauge.set_value(le, 1.0).is_ok());
    assert!(summary.add(le, 1.0).is_ok());
    assert!(matches!(histogram.add(le, 1.0), Err(Error::InvalidLabel { .. })));
}

#[test]
fn get_all_reports_every_series() {
    init_tracing();
    let registry = Registry::new();
    let histogram = Histogram::with_opts(opts(&registry, "latency"), &[1.0, 2.0]).unwrap();

    histogram.observe(NO_LABELS, 0.5).unwrap();
    histogram.observe([("route", "/")], 1.5).unwrap();

    let all = registry.get("latency").unwrap().get_all();
    assert_eq!(all.len(), 2);
    for (labels, value) in all {
        let MetricValue::Histogram(value) = value else { panic!("expected a histogram value") };
        assert_eq!(value.count, 1);
        assert!(labels.is_empty() || labels == [("route", "/")].into_labels());
    }
}

proptest! {
    #[test]
    fn counter_equals_sum_of_increments(
        increments in proptest::collection::vec(0.0f64..1.0e6, 1..64)
    ) {
        let registry = Registry::new();
        let counter = Counter::with_opts(opts(&registry, "sum_total")).unwrap();

        for increment in &increments {
            counter.add([("k", "v")], *increment).unwrap();
        }

        let expected = increments.iter().sum::<f64>();
        let actual = counter.get([("k", "v")]).unwrap();
        prop_assert!((actual - expected).abs() <= expected * 1e-12);
    }

    #[test]
    fn histogram_buckets_are_cumulative(
        values in proptest::collection::vec(-1.0e3f64..1.0e3, 1..128)
    ) {
        let registry = Registry::new();
        let bounds = [-10.0, 0.0, 10.0, 100.0];
        let histogram = Histogram::with_opts(opts(&registry, "h"), &bounds).unwrap();

        for value in &values {
            histogram.observe(NO_LABELS, *value).unwrap();
        }

        let value = histogram.get(NO_LABELS).unwrap();
        prop_assert_eq!(value.bucket(f64::INFINITY), Some(values.len() as u64));
        prop_assert_eq!(value.count, values.len() as u64);
        for pair in value.buckets.windows(2) {
            prop_assert!(pair[0].1 <= pair[1].1);
        }
    }
}
