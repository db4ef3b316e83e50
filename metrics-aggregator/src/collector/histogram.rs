use std::any::Any;
use std::sync::Arc;

use super::{Collector, Metric, MetricValue, Opts};
use crate::error::Error;
use crate::histogram::{Histogram as BucketedHistogram, DEFAULT_BUCKETS};
use crate::kind::MetricKind;
use crate::labels::{IntoLabels, LabelSet};

/// Snapshot of a single histogram series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramValue {
    /// `(upper bound, cumulative count)` pairs in ascending bound order, ending with `+Inf`.
    pub buckets: Vec<(f64, u64)>,
    /// Sum of all observations.
    pub sum: f64,
    /// Number of observations.
    pub count: u64,
}

impl HistogramValue {
    /// Gets the cumulative count of the bucket with upper bound `bound`.
    pub fn bucket(&self, bound: f64) -> Option<u64> {
        self.buckets.iter().find(|(b, _)| *b == bound).map(|(_, count)| *count)
    }
}

/// Counts observations into configurable cumulative buckets.
#[derive(Clone)]
pub struct Histogram {
    inner: Arc<Metric<BucketedHistogram>>,
    // Empty histogram holding the normalized bounds, cloned for every new series.
    prototype: Arc<BucketedHistogram>,
}

impl Histogram {
    /// Creates a histogram with [`DEFAULT_BUCKETS`] and registers it into the global registry.
    ///
    /// # Errors
    ///
    /// See [`Histogram::with_opts`].
    pub fn new<N, D>(name: N, doc: D) -> Result<Histogram, Error>
    where
        N: Into<String>,
        D: Into<String>,
    {
        Histogram::with_opts(Opts::new(name, doc), &DEFAULT_BUCKETS)
    }

    /// Creates a histogram with the given bucket upper bounds and registers it.
    ///
    /// A `+Inf` bound is appended if `buckets` doesn't end with one.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnsortedBuckets`] or [`Error::InsufficientBuckets`] for unusable bounds,
    /// with [`Error::InvalidLabel`] if the constant labels use `le`, and otherwise for the same
    /// reasons as [`Counter::with_opts`][super::Counter::with_opts].
    pub fn with_opts(opts: Opts, buckets: &[f64]) -> Result<Histogram, Error> {
        let prototype = BucketedHistogram::new(buckets)?;
        let histogram = Histogram {
            inner: Arc::new(Metric::new(&opts, MetricKind::Histogram)?),
            prototype: Arc::new(prototype),
        };
        opts.register(histogram.clone())?;
        Ok(histogram)
    }

    /// Gets the bucket upper bounds, including the trailing `+Inf`.
    pub fn bounds(&self) -> &[f64] {
        self.prototype.bounds()
    }

    /// Observes `value`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidObservation`] if `value` is NaN.
    pub fn add<L: IntoLabels>(&self, labels: L, value: f64) -> Result<(), Error> {
        if value.is_nan() {
            return Err(Error::InvalidObservation { value });
        }

        let prototype = &self.prototype;
        self.inner.update(
            labels.into_labels(),
            || BucketedHistogram::clone(prototype),
            |histogram| histogram.record(value),
        )
    }

    /// Alias for [`Histogram::add`].
    pub fn observe<L: IntoLabels>(&self, labels: L, value: f64) -> Result<(), Error> {
        self.add(labels, value)
    }

    /// Gets the buckets, sum and count of the series matching `labels`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::SeriesNotFound`] if nothing has been observed for `labels`.
    pub fn get<L: IntoLabels>(&self, labels: L) -> Result<HistogramValue, Error> {
        self.inner.read(&labels.into_labels(), snapshot)
    }

    /// Alias for [`Histogram::get`].
    pub fn get_value<L: IntoLabels>(&self, labels: L) -> Result<HistogramValue, Error> {
        self.get(labels)
    }

    /// Gets a snapshot of every series.
    pub fn values(&self) -> Vec<(LabelSet, HistogramValue)> {
        self.inner.collect(|histogram| snapshot(histogram))
    }
}

fn snapshot(histogram: &BucketedHistogram) -> HistogramValue {
    HistogramValue { buckets: histogram.buckets(), sum: histogram.sum(), count: histogram.count() }
}

impl Collector for Histogram {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn doc(&self) -> &str {
        self.inner.doc()
    }

    fn const_labels(&self) -> &LabelSet {
        self.inner.const_labels()
    }

    fn kind(&self) -> MetricKind {
        self.inner.kind()
    }

    fn get_all(&self) -> Vec<(LabelSet, MetricValue)> {
        self.inner.collect(|histogram| MetricValue::Histogram(snapshot(histogram)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
