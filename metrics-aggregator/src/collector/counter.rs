use std::any::Any;
use std::sync::Arc;

use super::{Collector, Metric, MetricValue, Opts};
use crate::error::Error;
use crate::kind::MetricKind;
use crate::labels::{IntoLabels, LabelSet};

/// A cumulative value that only ever goes up.
///
/// Counters are typically used to count requests served, tasks completed, or errors that occurred.
/// For values that can also go down, such as the number of in-flight requests, use a
/// [`Gauge`][super::Gauge] instead.
///
/// `Counter` is a cheap handle: clones share the same underlying series.
#[derive(Clone)]
pub struct Counter {
    inner: Arc<Metric<f64>>,
}

impl Counter {
    /// Creates a counter and registers it into the global registry.
    ///
    /// # Errors
    ///
    /// See [`Counter::with_opts`].
    pub fn new<N, D>(name: N, doc: D) -> Result<Counter, Error>
    where
        N: Into<String>,
        D: Into<String>,
    {
        Counter::with_opts(Opts::new(name, doc))
    }

    /// Creates a counter from the given options and registers it.
    ///
    /// # Errors
    ///
    /// Fails if the name or the constant labels are invalid, or if the name is already registered.
    pub fn with_opts(opts: Opts) -> Result<Counter, Error> {
        let counter = Counter { inner: Arc::new(Metric::new(&opts, MetricKind::Counter)?) };
        opts.register(counter.clone())?;
        Ok(counter)
    }

    /// Increments the counter by 1.
    pub fn inc<L: IntoLabels>(&self, labels: L) -> Result<(), Error> {
        self.add(labels, 1.0)
    }

    /// Adds `value` to the counter.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NegativeIncrement`] if `value` is negative, as counters can't decrease,
    /// and with [`Error::InvalidObservation`] if `value` is NaN.
    pub fn add<L: IntoLabels>(&self, labels: L, value: f64) -> Result<(), Error> {
        if value.is_nan() {
            return Err(Error::InvalidObservation { value });
        }
        if value < 0.0 {
            return Err(Error::NegativeIncrement { value });
        }

        self.inner.update(labels.into_labels(), || 0.0, |current| *current += value)
    }

    /// Sets the counter to an arbitrary value.
    ///
    /// Meant for mirroring totals computed elsewhere, so monotonicity is not enforced.
    pub fn set<L: IntoLabels>(&self, labels: L, value: f64) -> Result<(), Error> {
        self.inner.set_value(labels.into_labels(), value)
    }

    /// Alias for [`Counter::set`].
    pub fn set_value<L: IntoLabels>(&self, labels: L, value: f64) -> Result<(), Error> {
        self.set(labels, value)
    }

    /// Gets the value of the series matching `labels`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::SeriesNotFound`] if the series has never been updated.
    pub fn get<L: IntoLabels>(&self, labels: L) -> Result<f64, Error> {
        self.inner.read(&labels.into_labels(), |value| *value)
    }

    /// Alias for [`Counter::get`].
    pub fn get_value<L: IntoLabels>(&self, labels: L) -> Result<f64, Error> {
        self.get(labels)
    }

    /// Gets the value of every series.
    pub fn values(&self) -> Vec<(LabelSet, f64)> {
        self.inner.collect(|value| *value)
    }
}

impl Collector for Counter {
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
        self.inner.collect(|value| MetricValue::Scalar(*value))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
