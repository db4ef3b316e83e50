//! Label-keyed metric collectors.
//!
//! Every collector owns a map from [`LabelKey`] to per-series state.  Series are created lazily the
//! first time a label combination is updated, and live as long as the collector itself.
use std::any::Any;

use hashbrown::HashMap;
use parking_lot::RwLock;
use tracing::trace;

use crate::error::Error;
use crate::key::LabelKey;
use crate::kind::MetricKind;
use crate::labels::{check_labels, is_valid_metric_name, IntoLabels, LabelSet};
use crate::registry::Registry;

mod counter;
pub use self::counter::Counter;

mod gauge;
pub use self::gauge::Gauge;

mod histogram;
pub use self::histogram::{Histogram, HistogramValue};

mod summary;
pub use self::summary::{Summary, SummaryValue, DEFAULT_INVARIANTS};

/// A named set of series that can be rendered.
///
/// The four built-in collectors implement this trait; it is also the seam for custom collectors.
pub trait Collector: Send + Sync + 'static {
    /// Name of the metric.
    fn name(&self) -> &str;

    /// Human-readable description of the metric.
    fn doc(&self) -> &str;

    /// Labels applied to every series of this collector when rendered.
    fn const_labels(&self) -> &LabelSet;

    /// Kind of the metric.
    fn kind(&self) -> MetricKind;

    /// Gets every series currently stored, in no particular order.
    fn get_all(&self) -> Vec<(LabelSet, MetricValue)>;

    /// Gets this collector as [`Any`], for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;
}

/// Current value of a single series.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// Value of a counter or gauge series.
    Scalar(f64),
    /// Value of a summary series.
    Summary(SummaryValue),
    /// Value of a histogram series.
    Histogram(HistogramValue),
}

/// Options shared by all collectors.
///
/// Collectors register themselves into [`Registry::global`] unless a registry is given here.
#[derive(Clone)]
pub struct Opts {
    name: String,
    doc: String,
    const_labels: LabelSet,
    registry: Option<Registry>,
}

impl Opts {
    /// Creates a new [`Opts`] with the given metric name and description.
    pub fn new<N, D>(name: N, doc: D) -> Opts
    where
        N: Into<String>,
        D: Into<String>,
    {
        Opts { name: name.into(), doc: doc.into(), const_labels: LabelSet::new(), registry: None }
    }

    /// Adds a constant label.
    ///
    /// Constant labels are applied to every series when rendered.  Labels of the series itself have
    /// precedence over constant labels with the same name.
    #[must_use]
    pub fn const_label<K, V>(mut self, key: K, value: V) -> Opts
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.const_labels.insert(key.into(), value.into());
        self
    }

    /// Adds several constant labels at once.
    #[must_use]
    pub fn const_labels<L: IntoLabels>(mut self, labels: L) -> Opts {
        self.const_labels.extend(labels.into_labels());
        self
    }

    /// Sets the registry the collector is registered into.
    #[must_use]
    pub fn registry(mut self, registry: &Registry) -> Opts {
        self.registry = Some(registry.clone());
        self
    }

    pub(crate) fn register<C: Collector>(&self, collector: C) -> Result<(), Error> {
        match &self.registry {
            Some(registry) => registry.register(collector),
            None => Registry::global().register(collector),
        }
    }
}

/// Label-keyed series storage shared by all collector kinds.
pub(crate) struct Metric<T> {
    name: String,
    doc: String,
    const_labels: LabelSet,
    kind: MetricKind,
    series: RwLock<HashMap<LabelKey, T>>,
}

impl<T> Metric<T> {
    pub fn new(opts: &Opts, kind: MetricKind) -> Result<Metric<T>, Error> {
        if !is_valid_metric_name(&opts.name) {
            return Err(Error::InvalidName { name: opts.name.clone() });
        }
        check_labels(&opts.const_labels, kind)?;

        Ok(Metric {
            name: opts.name.clone(),
            doc: opts.doc.clone(),
            const_labels: opts.const_labels.clone(),
            kind,
            series: RwLock::new(HashMap::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    pub fn const_labels(&self) -> &LabelSet {
        &self.const_labels
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    /// Stores `value` for `labels`, replacing any previous value.
    pub fn set_value(&self, labels: LabelSet, value: T) -> Result<(), Error> {
        check_labels(&labels, self.kind)?;
        let key = LabelKey::of(&labels);
        self.series.write().insert(key, value);
        Ok(())
    }

    /// Runs `f` against the series for `labels`, creating it with `init` first if needed.
    ///
    /// The write lock is held for the whole read-modify-write.
    pub fn update<I, F, R>(&self, labels: LabelSet, init: I, f: F) -> Result<R, Error>
    where
        I: FnOnce() -> T,
        F: FnOnce(&mut T) -> R,
    {
        check_labels(&labels, self.kind)?;
        let key = LabelKey::of(&labels);

        let mut series = self.series.write();
        let value = series.entry(key).or_insert_with_key(|key| {
            trace!(metric = %self.name, key = %key, "creating series");
            init()
        });
        Ok(f(value))
    }

    /// Runs `f` against the series for `labels`.
    pub fn read<F, R>(&self, labels: &LabelSet, f: F) -> Result<R, Error>
    where
        F: FnOnce(&T) -> R,
    {
        let key = LabelKey::of(labels);
        let series = self.series.read();
        series.get(&key).map(f).ok_or_else(|| Error::SeriesNotFound { key: key.to_string() })
    }

    /// Runs `f` against the series for `labels`, with mutable access.
    pub fn read_mut<F, R>(&self, labels: &LabelSet, f: F) -> Result<R, Error>
    where
        F: FnOnce(&mut T) -> R,
    {
        let key = LabelKey::of(labels);
        let mut series = self.series.write();
        series.get_mut(&key).map(f).ok_or_else(|| Error::SeriesNotFound { key: key.to_string() })
    }

    /// Maps every stored series through `f`, decoding each key back into its label set.
    pub fn collect<F, R>(&self, mut f: F) -> Vec<(LabelSet, R)>
    where
        F: FnMut(&mut T) -> R,
    {
        let mut series = self.series.write();
        series.iter_mut().map(|(key, value)| (key.labels(), f(value))).collect()
    }
}
