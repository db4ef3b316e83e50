//! Label sets and the rules label names must follow.
use std::collections::{BTreeMap, HashMap};

use crate::error::Error;
use crate::MetricKind;

/// An unordered mapping of label name to label value.
///
/// Two label sets describe the same series when they hold the same name/value pairs, regardless of
/// the order in which the pairs were inserted.
pub type LabelSet = HashMap<String, String>;

/// An empty label list, for updating the unlabeled series of a collector.
pub const NO_LABELS: [(&str, &str); 0] = [];

const RESERVED_LABEL_NAMES: [&str; 1] = ["job"];
const RESERVED_LABEL_PREFIXES: [&str; 1] = ["__"];
const HISTOGRAM_BUCKET_LABEL: &str = "le";

/// A value that can be converted to a [`LabelSet`].
///
/// Label values only need to implement [`ToString`], so numeric values can be used directly:
/// `[("code", 200)]` and `[("code", "200")]` address the same series.
pub trait IntoLabels {
    /// Consumes this value, turning it into a [`LabelSet`].
    fn into_labels(self) -> LabelSet;
}

impl IntoLabels for LabelSet {
    fn into_labels(self) -> LabelSet {
        self
    }
}

impl IntoLabels for &LabelSet {
    fn into_labels(self) -> LabelSet {
        self.clone()
    }
}

impl IntoLabels for &BTreeMap<String, String> {
    fn into_labels(self) -> LabelSet {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<K, V> IntoLabels for &[(K, V)]
where
    K: AsRef<str>,
    V: ToString,
{
    fn into_labels(self) -> LabelSet {
        self.iter().map(|(k, v)| (k.as_ref().to_string(), v.to_string())).collect()
    }
}

impl<K, V, const N: usize> IntoLabels for [(K, V); N]
where
    K: AsRef<str>,
    V: ToString,
{
    fn into_labels(self) -> LabelSet {
        self.as_slice().into_labels()
    }
}

impl<K, V> IntoLabels for Vec<(K, V)>
where
    K: AsRef<str>,
    V: ToString,
{
    fn into_labels(self) -> LabelSet {
        self.as_slice().into_labels()
    }
}

/// Checks whether `name` is a valid metric name.
pub fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if valid_metric_name_start_character(c) => chars.all(valid_metric_name_character),
        _ => false,
    }
}

/// Checks whether `name` is a valid label name, without considering reserved names.
pub fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if valid_label_key_start_character(c) => chars.all(valid_label_key_character),
        _ => false,
    }
}

/// Validates the names of `labels` for use on a collector of the given kind.
///
/// Rejects names outside the label grammar, the reserved name `job`, anything starting with `__`
/// and, for histograms, `le`.
pub fn check_labels(labels: &LabelSet, kind: MetricKind) -> Result<(), Error> {
    for name in labels.keys() {
        let reserved = RESERVED_LABEL_NAMES.contains(&name.as_str())
            || RESERVED_LABEL_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
            || (kind == MetricKind::Histogram && name == HISTOGRAM_BUCKET_LABEL);

        if reserved || !is_valid_label_name(name) {
            return Err(Error::InvalidLabel { label: name.clone() });
        }
    }

    Ok(())
}

#[inline]
fn valid_metric_name_start_character(c: char) -> bool {
    // Essentially, needs to match the regex pattern of [a-zA-Z_:].
    c.is_ascii_alphabetic() || c == '_' || c == ':'
}

#[inline]
fn valid_metric_name_character(c: char) -> bool {
    // Essentially, needs to match the regex pattern of [a-zA-Z0-9_:].
    c.is_ascii_alphanumeric() || c == '_' || c == ':'
}

#[inline]
fn valid_label_key_start_character(c: char) -> bool {
    // Essentially, needs to match the regex pattern of [a-zA-Z_].
    c.is_ascii_alphabetic() || c == '_'
}

#[inline]
fn valid_label_key_character(c: char) -> bool {
    // Essentially, needs to match the regex pattern of [a-zA-Z0-9_].
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        let cases = &[
            ("foo_bar", true),
            ("foo1:bar2", true),
            (":foo", true),
            ("_", true),
            ("", false),
            ("1foobar", false),
            ("foo bar", false),
            ("foo-bar", false),
            ("lars.andersen", false),
        ];

        for (input, expected) in cases {
            assert_eq!(is_valid_metric_name(input), *expected, "name: {:?}", input);
        }
    }

    #[test]
    fn test_label_names() {
        assert!(is_valid_label_name("handler"));
        assert!(is_valid_label_name("_x1"));
        assert!(!is_valid_label_name("a:b"));
        assert!(!is_valid_label_name("1a"));
        assert!(!is_valid_label_name(""));
    }

    #[test]
    fn test_reserved_labels() {
        let kinds =
            [MetricKind::Counter, MetricKind::Gauge, MetricKind::Summary, MetricKind::Histogram];
        for kind in kinds {
            let job = [("job", "x")].into_labels();
            assert_eq!(check_labels(&job, kind), Err(Error::InvalidLabel { label: "job".into() }));

            let internal = [("__name__", "x")].into_labels();
            assert!(check_labels(&internal, kind).is_err());

            let ok = [("handler", "/")].into_labels();
            assert!(check_labels(&ok, kind).is_ok());
        }

        let le = [("le", 1)].into_labels();
        assert!(check_labels(&le, MetricKind::Counter).is_ok());
        assert!(check_labels(&le, MetricKind::Gauge).is_ok());
        assert!(check_labels(&le, MetricKind::Summary).is_ok());
        assert!(check_labels(&le, MetricKind::Histogram).is_err());
    }

    #[test]
    fn test_into_labels() {
        let numeric = [("data", 1)].into_labels();
        let text = vec![("data", "1")].into_labels();
        assert_eq!(numeric, text);

        let empty = NO_LABELS.into_labels();
        assert!(empty.is_empty());

        let mut ordered = BTreeMap::new();
        ordered.insert("a".to_string(), "1".to_string());
        assert_eq!((&ordered).into_labels(), [("a", "1")].into_labels());
    }
}
