use thiserror::Error as ThisError;

/// Errors that can occur while creating, updating, reading or registering collectors.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum Error {
    /// The metric name does not match `[a-zA-Z_:][a-zA-Z0-9_:]*`.
    #[error("invalid metric name: {name:?}")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// A label name is reserved, uses a reserved prefix, or is not a valid label name.
    #[error("invalid label name: {label:?}")]
    InvalidLabel {
        /// The rejected label name.
        label: String,
    },

    /// A string used as a label key was not a canonical label key.
    #[error("invalid label key: {key:?}")]
    InvalidKeyType {
        /// The rejected key.
        key: String,
    },

    /// The observed value cannot be aggregated.
    #[error("invalid observation: {value}")]
    InvalidObservation {
        /// The rejected value.
        value: f64,
    },

    /// A counter was asked to go down.
    #[error("counters can't decrease (attempted to add {value})")]
    NegativeIncrement {
        /// The rejected increment.
        value: f64,
    },

    /// Histogram bucket bounds were not strictly ascending.
    #[error("histogram buckets are not in strictly ascending order")]
    UnsortedBuckets,

    /// Histogram did not end up with at least one finite bound plus `+Inf`.
    #[error("histogram must have at least one finite bucket bound")]
    InsufficientBuckets,

    /// A bucket layout helper was given parameters it cannot work with.
    #[error("invalid bucket layout: {reason}")]
    InvalidBucketLayout {
        /// Why the layout was rejected.
        reason: &'static str,
    },

    /// A summary invariant was outside of the accepted range.
    #[error("invalid quantile invariant ({quantile}, {epsilon})")]
    InvalidInvariant {
        /// The target quantile.
        quantile: f64,
        /// The allowed rank error.
        epsilon: f64,
    },

    /// No series has been recorded for the given label combination.
    #[error("no series recorded for labels {key}")]
    SeriesNotFound {
        /// The label key that was looked up.
        key: String,
    },

    /// No collector is registered under the given name.
    #[error("no collector registered as {name:?}")]
    NotFound {
        /// The name that was looked up.
        name: String,
    },

    /// A collector is already registered under the given name.
    #[error("a collector for {name:?} is already registered")]
    DuplicateName {
        /// The conflicting name.
        name: String,
    },

    /// The collector does not report one of the supported metric kinds.
    #[error("invalid collector type for {name:?}")]
    InvalidCollector {
        /// Name reported by the rejected collector.
        name: String,
    },
}
