use std::fmt;

/// Metric kind.
///
/// Defines the kind, or type, of a metric.  Follows the metric types of the Prometheus exposition
/// format:
/// - counters
/// - gauges
/// - summaries
/// - histograms
///
/// `Untyped` exists for custom [`Collector`][crate::Collector] implementations that don't fit any
/// of the above; such collectors can't be registered or rendered.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum MetricKind {
    /// Counter type.
    Counter,
    /// Gauge type.
    Gauge,
    /// Summary type.
    Summary,
    /// Histogram type.
    Histogram,
    /// No particular type.
    Untyped,
}

impl MetricKind {
    /// Gets the name of this kind as used on `# TYPE` lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Summary => "summary",
            MetricKind::Histogram => "histogram",
            MetricKind::Untyped => "untyped",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
