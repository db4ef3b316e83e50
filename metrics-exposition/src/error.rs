use metrics_aggregator::MetricKind;
use thiserror::Error as ThisError;

/// Errors that could occur while rendering a registry.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum RenderError {
    /// The collector reports a kind that has no representation in the output format.
    #[error("collector {name:?} has unsupported type {kind}")]
    UnsupportedCollectorType {
        /// Name of the offending collector.
        name: String,
        /// Kind reported by the collector.
        kind: MetricKind,
    },

    /// A series value does not match the kind its collector reports.
    #[error("collector {name:?} of type {kind} produced a mismatched series value")]
    MismatchedValue {
        /// Name of the offending collector.
        name: String,
        /// Kind reported by the collector.
        kind: MetricKind,
    },
}
