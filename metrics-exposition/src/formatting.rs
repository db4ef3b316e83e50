//! Helpers for rendering metrics in the Prometheus exposition format.
use std::fmt;

/// A sample value, rendered the way the Prometheus text format expects.
///
/// Finite values use their shortest round-trip representation (`400`, `25.2`), while infinities and
/// NaN are written as `+Inf`, `-Inf` and `NaN`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Value(pub f64);

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.is_nan() {
            f.write_str("NaN")
        } else if value == f64::INFINITY {
            f.write_str("+Inf")
        } else if value == f64::NEG_INFINITY {
            f.write_str("-Inf")
        } else {
            write!(f, "{}", value)
        }
    }
}

/// A bucket bound or quantile, rendered as a label value.
///
/// Whole numbers keep a trailing `.0` (`le="5.0"`), other finite values use their shortest
/// round-trip representation, and infinities are written as `+Inf` and `-Inf`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound(pub f64);

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = self.0;
        if bound.is_finite() && bound.fract() == 0.0 && bound.abs() < 1e16 {
            write!(f, "{}.0", bound)
        } else {
            fmt::Display::fmt(&Value(bound), f)
        }
    }
}

/// Writes a help (description) line in the Prometheus [exposition format].
///
/// [exposition format]: https://github.com/prometheus/docs/blob/main/content/docs/instrumenting/exposition_formats.md#text-format-details
pub fn write_help_line(buffer: &mut String, name: &str, desc: &str) {
    buffer.push_str("# HELP ");
    buffer.push_str(name);
    buffer.push(' ');
    let desc = sanitize_description(desc);
    buffer.push_str(&desc);
    buffer.push('\n');
}

/// Writes a metric type line in the Prometheus [exposition format].
///
/// [exposition format]: https://github.com/prometheus/docs/blob/main/content/docs/instrumenting/exposition_formats.md#text-format-details
pub fn write_type_line(buffer: &mut String, name: &str, metric_type: &str) {
    buffer.push_str("# TYPE ");
    buffer.push_str(name);
    buffer.push(' ');
    buffer.push_str(metric_type);
    buffer.push('\n');
}

/// Writes a metric in the Prometheus [exposition format].
///
/// When `suffix` is specified, it is appended to the `name`, which is useful for writing summary
/// statistics, such as the sum or count of a histogram or summary.
///
/// `labels` are written in the order given, so data type-specific labels such as `le` or
/// `quantile` have to be placed by the caller.  When `timestamp` is given, it is appended as a
/// millisecond Unix timestamp.
///
/// [exposition format]: https://github.com/prometheus/docs/blob/main/content/docs/instrumenting/exposition_formats.md#text-format-details
pub fn write_metric_line<T>(
    buffer: &mut String,
    name: &str,
    suffix: Option<&'static str>,
    labels: &[(&str, &str)],
    value: T,
    timestamp: Option<u64>,
) where
    T: fmt::Display,
{
    buffer.push_str(name);
    if let Some(suffix) = suffix {
        buffer.push('_');
        buffer.push_str(suffix);
    }

    if !labels.is_empty() {
        buffer.push('{');

        let mut first = true;
        for (key, value) in labels {
            if first {
                first = false;
            } else {
                buffer.push(',');
            }
            push_label(buffer, key, value);
        }

        buffer.push('}');
    }

    buffer.push(' ');
    buffer.push_str(value.to_string().as_str());
    if let Some(timestamp) = timestamp {
        buffer.push(' ');
        buffer.push_str(&timestamp.to_string());
    }
    buffer.push('\n');
}

fn push_label(buffer: &mut String, key: &str, value: &str) {
    buffer.push_str(key);
    buffer.push_str("=\"");
    buffer.push_str(&sanitize_label_value(value));
    buffer.push('"');
}

/// Sanitizes a label value to be valid under the Prometheus [data model].
///
/// [data model]: https://prometheus.io/docs/concepts/data_model/#metric-names-and-labels
pub fn sanitize_label_value(value: &str) -> String {
    sanitize_label_value_or_description(value, false)
}

/// Sanitizes a metric description to be valid under the Prometheus [exposition format].
///
/// [exposition format]: https://github.com/prometheus/docs/blob/main/content/docs/instrumenting/exposition_formats.md#text-format-details
pub fn sanitize_description(value: &str) -> String {
    sanitize_label_value_or_description(value, true)
}

fn sanitize_label_value_or_description(value: &str, is_desc: bool) -> String {
    // All Unicode characters are valid, but backslashes, double quotes, and line feeds must be
    // escaped.
    let mut sanitized = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            '\n' => sanitized.push_str("\\n"),
            '\\' => sanitized.push_str("\\\\"),
            // Double quotes only need escaping inside label values.
            '"' if !is_desc => sanitized.push_str("\\\""),
            c => sanitized.push(c),
        }
    }

    sanitized
}
