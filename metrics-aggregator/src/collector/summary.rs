use std::any::Any;
use std::sync::Arc;

use super::{Collector, Metric, MetricValue, Opts};
use crate::error::Error;
use crate::kind::MetricKind;
use crate::labels::{IntoLabels, LabelSet};
use crate::quantile::{parse_invariants, Estimator, Invariant};

/// Default `(quantile, epsilon)` invariants of a summary.
pub const DEFAULT_INVARIANTS: [(f64, f64); 3] = [(0.50, 0.05), (0.90, 0.01), (0.99, 0.001)];

/// Snapshot of a single summary series.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryValue {
    /// `(quantile, estimate)` pairs, in the order the invariants were configured.
    pub quantiles: Vec<(f64, f64)>,
    /// Exact sum of all observations.
    pub sum: f64,
    /// Exact number of observations.
    pub count: u64,
}

impl SummaryValue {
    /// Gets the estimate for quantile `q`, if `q` is one of the configured quantiles.
    pub fn quantile(&self, q: f64) -> Option<f64> {
        self.quantiles.iter().find(|(quantile, _)| *quantile == q).map(|(_, value)| *value)
    }
}

/// Streaming quantiles of observed values, along with their exact sum and count.
///
/// Each series holds its own [`Estimator`], so memory stays bounded no matter how many values are
/// observed.
#[derive(Clone)]
pub struct Summary {
    inner: Arc<Metric<Estimator>>,
    invariants: Arc<[Invariant]>,
}

impl Summary {
    /// Creates a summary with the default invariants and registers it into the global registry.
    ///
    /// # Errors
    ///
    /// See [`Summary::with_opts`].
    pub fn new<N, D>(name: N, doc: D) -> Result<Summary, Error>
    where
        N: Into<String>,
        D: Into<String>,
    {
        Summary::with_opts(Opts::new(name, doc), &DEFAULT_INVARIANTS)
    }

    /// Creates a summary tracking the given `(quantile, epsilon)` invariants and registers it.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidInvariant`] if any invariant is out of range, and otherwise for
    /// the same reasons as [`Counter::with_opts`][super::Counter::with_opts].
    pub fn with_opts(opts: Opts, invariants: &[(f64, f64)]) -> Result<Summary, Error> {
        let invariants = parse_invariants(invariants)?;
        let summary = Summary {
            inner: Arc::new(Metric::new(&opts, MetricKind::Summary)?),
            invariants: invariants.into(),
        };
        opts.register(summary.clone())?;
        Ok(summary)
    }

    /// Gets the configured invariants.
    pub fn invariants(&self) -> &[Invariant] {
        &self.invariants
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

        let invariants = &self.invariants;
        self.inner.update(
            labels.into_labels(),
            || Estimator::new(invariants.to_vec()),
            |estimator| estimator.observe(value),
        )
    }

    /// Alias for [`Summary::add`].
    pub fn observe<L: IntoLabels>(&self, labels: L, value: f64) -> Result<(), Error> {
        self.add(labels, value)
    }

    /// Gets the quantile estimates, sum and count of the series matching `labels`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::SeriesNotFound`] if nothing has been observed for `labels`.
    pub fn get<L: IntoLabels>(&self, labels: L) -> Result<SummaryValue, Error> {
        self.inner.read_mut(&labels.into_labels(), snapshot)
    }

    /// Alias for [`Summary::get`].
    pub fn get_value<L: IntoLabels>(&self, labels: L) -> Result<SummaryValue, Error> {
        self.get(labels)
    }

    /// Gets a snapshot of every series.
    pub fn values(&self) -> Vec<(LabelSet, SummaryValue)> {
        self.inner.collect(snapshot)
    }
}

fn snapshot(estimator: &mut Estimator) -> SummaryValue {
    let targets = estimator.invariants().iter().map(Invariant::quantile).collect::<Vec<_>>();
    // Series only exist once something was observed, so the estimator is never empty here.
    let quantiles =
        targets.into_iter().map(|q| (q, estimator.query(q).unwrap_or(0.0))).collect();

    SummaryValue { quantiles, sum: estimator.sum(), count: estimator.count() }
}

impl Collector for Summary {
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
        self.inner.collect(|estimator| MetricValue::Summary(snapshot(estimator)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
