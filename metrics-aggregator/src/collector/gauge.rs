use std::any::Any;
use std::sync::Arc;

use super::{Collector, Metric, MetricValue, Opts};
use crate::error::Error;
use crate::kind::MetricKind;
use crate::labels::{IntoLabels, LabelSet};

/// A value that can go up and down.
///
/// Gauges are typically used for measured values like temperatures or current memory usage, but
/// also for "counts" that can go up and down, like the number of in-flight requests.
#[derive(Clone)]
pub struct Gauge {
    inner: Arc<Metric<f64>>,
}

impl Gauge {
    /// Creates a gauge and registers it into the global registry.
    ///
    /// # Errors
    ///
    /// See [`Gauge::with_opts`].
    pub fn new<N, D>(name: N, doc: D) -> Result<Gauge, Error>
    where
        N: Into<String>,
        D: Into<String>,
    {
        Gauge::with_opts(Opts::new(name, doc))
    }

    /// Creates a gauge from the given options and registers it.
    ///
    /// # Errors
    ///
    /// Fails if the name or the constant labels are invalid, or if the name is already registered.
    pub fn with_opts(opts: Opts) -> Result<Gauge, Error> {
        let gauge = Gauge { inner: Arc::new(Metric::new(&opts, MetricKind::Gauge)?) };
        opts.register(gauge.clone())?;
        Ok(gauge)
    }

    /// Sets the gauge to `value`.
    pub fn set<L: IntoLabels>(&self, labels: L, value: f64) -> Result<(), Error> {
        self.inner.set_value(labels.into_labels(), value)
    }

    /// Alias for [`Gauge::set`].
    pub fn set_value<L: IntoLabels>(&self, labels: L, value: f64) -> Result<(), Error> {
        self.set(labels, value)
    }

    /// Increments the gauge by 1.
    pub fn inc<L: IntoLabels>(&self, labels: L) -> Result<(), Error> {
        self.add(labels, 1.0)
    }

    /// Decrements the gauge by 1.
    pub fn dec<L: IntoLabels>(&self, labels: L) -> Result<(), Error> {
        self.add(labels, -1.0)
    }

    /// Adds `value` to the gauge.  A missing series starts at zero.
    pub fn add<L: IntoLabels>(&self, labels: L, value: f64) -> Result<(), Error> {
        self.inner.update(labels.into_labels(), || 0.0, |current| *current += value)
    }

    /// Subtracts `value` from the gauge.
    pub fn sub<L: IntoLabels>(&self, labels: L, value: f64) -> Result<(), Error> {
        self.add(labels, -value)
    }

    /// Gets the value of the series matching `labels`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::SeriesNotFound`] if the series has never been updated.
    pub fn get<L: IntoLabels>(&self, labels: L) -> Result<f64, Error> {
        self.inner.read(&labels.into_labels(), |value| *value)
    }

    /// Alias for [`Gauge::get`].
    pub fn get_value<L: IntoLabels>(&self, labels: L) -> Result<f64, Error> {
        self.get(labels)
    }

    /// Gets the value of every series.
    pub fn values(&self) -> Vec<(LabelSet, f64)> {
        self.inner.collect(|value| *value)
    }
}

impl Collector for Gauge {
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
