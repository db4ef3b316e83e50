//! Selection of an output format from HTTP `Accept` headers.
use std::collections::BTreeSet;

use tracing::debug;

use crate::formatter::{Formatter, TextFormatter};

/// An output format a registry can be rendered in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Format {
    /// The Prometheus text exposition format.
    Text,
}

impl Format {
    /// Creates a formatter for this format, using its default settings.
    pub fn formatter(self) -> Box<dyn Formatter> {
        match self {
            Format::Text => Box::new(TextFormatter::new()),
        }
    }
}

/// Collects the individual items of every `Accept` header value.
///
/// Values are split on `;` and each item is trimmed, so `text/plain; version=0.0.4` yields both
/// `text/plain` and `version=0.0.4`.
pub fn parse_accepts<S: AsRef<str>>(accept_headers: &[S]) -> BTreeSet<String> {
    accept_headers
        .iter()
        .flat_map(|header| header.as_ref().split(';'))
        .map(|item| item.trim().to_string())
        .collect()
}

/// Picks the output format for a request with the given `Accept` header values.
///
/// The text format is the only format Prometheus still scrapes, so it is always chosen; headers are
/// only parsed to log what the client asked for.
pub fn negotiate<S: AsRef<str>>(accept_headers: &[S]) -> Format {
    let accepts = parse_accepts(accept_headers);
    let format = Format::Text;

    debug!(?accepts, ?format, "negotiated exposition format");
    format
}
