use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use metrics_aggregator::{key_of, Collector, LabelSet, MetricKind, MetricValue, Registry};
use tracing::trace;

use crate::error::RenderError;
use crate::formatting::{write_help_line, write_metric_line, write_type_line, Bound, Value};

/// Content type of the Prometheus text exposition format.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// HTTP headers to send along with a rendered payload.
pub type Headers = BTreeMap<&'static str, &'static str>;

/// Serializes a whole registry into a wire format.
pub trait Formatter {
    /// Gets the HTTP headers describing the payload produced by [`marshall`][Formatter::marshall].
    fn headers(&self) -> Headers;

    /// Serializes every collector of `registry`.
    ///
    /// # Errors
    ///
    /// Fails if any collector can't be represented; nothing is returned for the other collectors in
    /// that case.
    fn marshall(&self, registry: &Registry) -> Result<Vec<u8>, RenderError>;
}

/// Formatter for the Prometheus [text exposition format], version 0.0.4.
///
/// Each collector renders as one block: its `# HELP` and `# TYPE` lines, followed by its series in
/// ascending [`LabelKey`][metrics_aggregator::LabelKey] order.  Blocks are sorted as whole strings,
/// so the output is stable for a given registry state.
///
/// [text exposition format]: https://github.com/prometheus/docs/blob/main/content/docs/instrumenting/exposition_formats.md#text-format-details
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter {
    timestamp: bool,
}

impl TextFormatter {
    /// Creates a new [`TextFormatter`] that doesn't write timestamps.
    pub fn new() -> TextFormatter {
        TextFormatter::default()
    }

    /// Sets whether every sample line ends with the current time, in milliseconds since the Unix
    /// epoch.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: bool) -> TextFormatter {
        self.timestamp = timestamp;
        self
    }

    /// Renders a single collector as a block of newline-terminated lines.
    ///
    /// # Errors
    ///
    /// Fails with [`RenderError::UnsupportedCollectorType`] for untyped collectors, and with
    /// [`RenderError::MismatchedValue`] if a series value doesn't match the collector kind.
    pub fn marshall_collector(&self, collector: &dyn Collector) -> Result<String, RenderError> {
        self.write_block(collector, self.now())
    }

    /// Renders a single collector as a list of lines, without line terminators.
    ///
    /// # Errors
    ///
    /// See [`TextFormatter::marshall_collector`].
    pub fn marshall_lines(&self, collector: &dyn Collector) -> Result<Vec<String>, RenderError> {
        let block = self.marshall_collector(collector)?;
        Ok(block.lines().map(str::to_string).collect())
    }

    fn now(&self) -> Option<u64> {
        if !self.timestamp {
            return None;
        }

        SystemTime::now().duration_since(UNIX_EPOCH).ok().map(|d| d.as_millis() as u64)
    }

    fn write_block(
        &self,
        collector: &dyn Collector,
        timestamp: Option<u64>,
    ) -> Result<String, RenderError> {
        let name = collector.name();
        let kind = collector.kind();
        if kind == MetricKind::Untyped {
            return Err(RenderError::UnsupportedCollectorType { name: name.to_string(), kind });
        }

        let mut buffer = String::new();
        write_help_line(&mut buffer, name, collector.doc());
        write_type_line(&mut buffer, name, kind.as_str());

        let mut series = collector.get_all();
        series.sort_by_cached_key(|(labels, _)| key_of(labels));

        for (labels, value) in series {
            let merged = merge_labels(collector.const_labels(), &labels);
            let plain = merged.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>();

            match (kind, value) {
                (MetricKind::Counter | MetricKind::Gauge, MetricValue::Scalar(value)) => {
                    write_metric_line(&mut buffer, name, None, &plain, Value(value), timestamp);
                }
                (MetricKind::Summary, MetricValue::Summary(summary)) => {
                    let mut quantiles = summary.quantiles;
                    quantiles.sort_by(|a, b| a.0.total_cmp(&b.0));
                    for (quantile, estimate) in quantiles {
                        let quantile = Bound(quantile).to_string();
                        let labels = with_label(&merged, "quantile", &quantile);
                        write_metric_line(
                            &mut buffer,
                            name,
                            None,
                            &labels,
                            Value(estimate),
                            timestamp,
                        );
                    }
                    write_totals(&mut buffer, name, &plain, summary.sum, summary.count, timestamp);
                }
                (MetricKind::Histogram, MetricValue::Histogram(histogram)) => {
                    for (le, count) in histogram.buckets {
                        let le = Bound(le).to_string();
                        let labels = with_label(&merged, "le", &le);
                        write_metric_line(
                            &mut buffer,
                            name,
                            Some("bucket"),
                            &labels,
                            count,
                            timestamp,
                        );
                    }
                    let (sum, count) = (histogram.sum, histogram.count);
                    write_totals(&mut buffer, name, &plain, sum, count, timestamp);
                }
                _ => return Err(RenderError::MismatchedValue { name: name.to_string(), kind }),
            }
        }

        Ok(buffer)
    }
}

impl Formatter for TextFormatter {
    fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type", TEXT_CONTENT_TYPE);
        headers
    }

    fn marshall(&self, registry: &Registry) -> Result<Vec<u8>, RenderError> {
        let timestamp = self.now();
        let mut blocks = registry
            .get_all()
            .iter()
            .map(|collector| self.write_block(collector.as_ref(), timestamp))
            .collect::<Result<Vec<_>, _>>()?;
        blocks.sort();

        trace!(collectors = blocks.len(), "marshalled registry");
        Ok(blocks.concat().into_bytes())
    }
}

/// Merges constant labels with the labels of a series, sorted by name.
///
/// Series labels win over constant labels of the same name.
fn merge_labels<'a>(
    const_labels: &'a LabelSet,
    labels: &'a LabelSet,
) -> BTreeMap<&'a str, &'a str> {
    const_labels.iter().chain(labels.iter()).map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

/// Sorts `name` into `labels`, replacing any series label of the same name.
fn with_label<'a>(
    labels: &BTreeMap<&'a str, &'a str>,
    name: &'a str,
    value: &'a str,
) -> Vec<(&'a str, &'a str)> {
    let mut labels = labels.clone();
    labels.insert(name, value);
    labels.into_iter().collect()
}

fn write_totals(
    buffer: &mut String,
    name: &str,
    labels: &[(&str, &str)],
    sum: f64,
    count: u64,
    timestamp: Option<u64>,
) {
    write_metric_line(buffer, name, Some("sum"), labels, Value(sum), timestamp);
    write_metric_line(buffer, name, Some("count"), labels, count, timestamp);
}
