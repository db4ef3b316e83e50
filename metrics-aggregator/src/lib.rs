//! Label-keyed metric collectors, aggregated in memory for Prometheus-style exposition.
//!
//! A collector ([`Counter`], [`Gauge`], [`Summary`] or [`Histogram`]) holds one series per
//! distinct set of labels.  Series are created the first time a label combination is updated:
//!
//! ```
//! use metrics_aggregator::{Counter, Opts, Registry};
//!
//! let registry = Registry::new();
//! let opts = Opts::new("requests_total", "Requests served.").const_label("app", "api");
//! let requests = Counter::with_opts(opts.registry(&registry))?;
//!
//! requests.inc([("route", "/"), ("code", "200")])?;
//! requests.add([("code", "200"), ("route", "/")], 2.0)?;
//! assert_eq!(requests.get([("route", "/"), ("code", "200")])?, 3.0);
//! # Ok::<(), metrics_aggregator::Error>(())
//! ```
//!
//! Collectors register themselves into a [`Registry`] on creation: the one given through
//! [`Opts`], or [`Registry::global`] otherwise.  Label sets are identified by their [`LabelKey`],
//! so the order in which labels are given never matters.
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg), deny(broken_intra_doc_links))]
mod error;
pub use self::error::Error;

mod key;
pub use self::key::{key_of, LabelKey};

mod kind;
pub use self::kind::MetricKind;

mod labels;
pub use self::labels::{
    check_labels, is_valid_label_name, is_valid_metric_name, IntoLabels, LabelSet, NO_LABELS,
};

pub mod histogram;
pub use self::histogram::{exponential_buckets, linear_buckets, DEFAULT_BUCKETS};

pub mod quantile;
pub use self::quantile::{parse_invariants, Estimator, Invariant};

mod collector;
pub use self::collector::{
    Collector, Counter, Gauge, Histogram, HistogramValue, MetricValue, Opts, Summary, SummaryValue,
    DEFAULT_INVARIANTS,
};

mod registry;
pub use self::registry::Registry;

mod platform;
pub use self::platform::{platform_labels, register_platform_info, PLATFORM_INFO};
