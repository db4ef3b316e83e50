use metrics_aggregator::Registry;

use crate::error::RenderError;
use crate::formatter::Headers;
use crate::negotiate::negotiate;

/// Renders `registry` in the format negotiated from `accept_headers`.
///
/// Returns the payload along with the HTTP headers that describe it, including `Content-Type`.
///
/// # Errors
///
/// Fails if any registered collector can't be represented in the negotiated format.
pub fn render<S: AsRef<str>>(
    registry: &Registry,
    accept_headers: &[S],
) -> Result<(Vec<u8>, Headers), RenderError> {
    let formatter = negotiate(accept_headers).formatter();
    let content = formatter.marshall(registry)?;
    Ok((content, formatter.headers()))
}
