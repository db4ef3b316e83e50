use std::sync::Once;

use metrics_aggregator::{
    register_platform_info, Counter, Gauge, Histogram, Opts, Registry, Summary,
    DEFAULT_INVARIANTS, NO_LABELS,
};
use metrics_exposition::{render, Formatter, TextFormatter, TEXT_CONTENT_TYPE};

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

fn render_text(registry: &Registry) -> String {
    let (content, headers) = render(registry, &["text/plain; version=0.0.4"]).unwrap();
    assert_eq!(headers["Content-Type"], TEXT_CONTENT_TYPE);
    String::from_utf8(content).unwrap()
}

#[test]
fn counter_with_const_labels() {
    init_tracing();
    let registry = Registry::new();
    let opts = Opts::new("test_counter", "Test Counter.")
        .const_labels([("test", "test_counter")])
        .registry(&registry);
    let counter = Counter::with_opts(opts).unwrap();

    counter.set_value([("data", 1)], 100.0).unwrap();
    counter.set_value([("data", "2")], 200.0).unwrap();
    counter.set_value([("data", 3)], 300.0).unwrap();
    counter.set_value([("data", 1)], 400.0).unwrap();

    let expected = "\
# HELP test_counter Test Counter.
# TYPE test_counter counter
test_counter{data=\"1\",test=\"test_counter\"} 400
test_counter{data=\"2\",test=\"test_counter\"} 200
test_counter{data=\"3\",test=\"test_counter\"} 300
";
    assert_eq!(render_text(&registry), expected);
}

#[test]
fn series_labels_override_const_labels() {
    init_tracing();
    let registry = Registry::new();
    let opts =
        Opts::new("overridden", "Overridden.").const_label("env", "prod").registry(&registry);
    let gauge = Gauge::with_opts(opts).unwrap();

    gauge.set([("env", "canary")], 1.0).unwrap();
    gauge.set(NO_LABELS, 2.0).unwrap();

    let expected = "\
# HELP overridden Overridden.
# TYPE overridden gauge
overridden{env=\"prod\"} 2
overridden{env=\"canary\"} 1
";
    assert_eq!(render_text(&registry), expected);
}

#[test]
fn whole_registry() {
    init_tracing();
    let registry = Registry::new();

    let opts = Opts::new("requests_total", "Requests.").registry(&registry);
    let counter = Counter::with_opts(opts).unwrap();
    let opts = Opts::new("payload_bytes", "Payloads.").registry(&registry);
    let summary = Summary::with_opts(opts, &DEFAULT_INVARIANTS).unwrap();
    let opts = Opts::new("latency_seconds", "Latency.").registry(&registry);
    let histogram = Histogram::with_opts(opts, &[0.5, 1.0]).unwrap();

    counter.add([("route", "/b")], 2.0).unwrap();
    counter.inc([("route", "/a")]).unwrap();
    summary.observe(NO_LABELS, 10.0).unwrap();
    histogram.observe([("route", "/a")], 0.75).unwrap();
    histogram.observe([("route", "/a")], 3.0).unwrap();

    let expected = "\
# HELP latency_seconds Latency.
# TYPE latency_seconds histogram
latency_seconds_bucket{le=\"0.5\",route=\"/a\"} 0
latency_seconds_bucket{le=\"1.0\",route=\"/a\"} 1
latency_seconds_bucket{le=\"+Inf\",route=\"/a\"} 2
latency_seconds_sum{route=\"/a\"} 3.75
latency_seconds_count{route=\"/a\"} 2
# HELP payload_bytes Payloads.
# TYPE payload_bytes summary
payload_bytes{quantile=\"0.5\"} 10
payload_bytes{quantile=\"0.9\"} 10
payload_bytes{quantile=\"0.99\"} 10
payload_bytes_sum 10
payload_bytes_count 1
# HELP requests_total Requests.
# TYPE requests_total counter
requests_total{route=\"/a\"} 1
requests_total{route=\"/b\"} 2
";
    assert_eq!(render_text(&registry), expected);

    // The push path reuses the formatter directly.
    let pushed = TextFormatter::new().marshall(&registry).unwrap();
    assert_eq!(String::from_utf8(pushed).unwrap(), expected);
}

#[test]
fn escaped_text() {
    init_tracing();
    let registry = Registry::new();
    let opts = Opts::new("escaped", "Line one\nline \"two\".").registry(&registry);
    let gauge = Gauge::with_opts(opts).unwrap();
    gauge.set([("path", "C:\\temp\n\"x\"")], 1.0).unwrap();

    let expected = "\
# HELP escaped Line one\\nline \"two\".
# TYPE escaped gauge
escaped{path=\"C:\\\\temp\\n\\\"x\\\"\"} 1
";
    assert_eq!(render_text(&registry), expected);
}

#[test]
fn platform_info() {
    init_tracing();
    let registry = Registry::new();
    register_platform_info(&registry).unwrap();

    let text = render_text(&registry);
    let expected = format!(
        "# HELP platform_info Platform information\n# TYPE platform_info gauge\n\
         platform_info{{arch=\"{}\",family=\"{}\",os=\"{}\"}} 1\n",
        std::env::consts::ARCH,
        std::env::consts::FAMILY,
        std::env::consts::OS,
    );
    assert_eq!(text, expected);
}

#[test]
fn global_registry() {
    init_tracing();
    let name = "text_format_global_total";
    let counter = Counter::new(name, "Global.").unwrap();
    counter.inc(NO_LABELS).unwrap();

    let text = render_text(Registry::global());
    assert!(text.contains("# TYPE text_format_global_total counter\ntext_format_global_total 1\n"));
    Registry::global().deregister(name).unwrap();
}
