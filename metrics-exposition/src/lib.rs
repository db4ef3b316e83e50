//! Renders [`metrics_aggregator`] registries in the Prometheus exposition format.
//!
//! [`render`] is the entrypoint for scrape handlers: it picks a format from the request's `Accept`
//! headers and returns the payload along with the response headers.
//!
//! ```
//! use metrics_aggregator::{Counter, Opts, Registry};
//!
//! let registry = Registry::new();
//! let counter = Counter::with_opts(Opts::new("jobs_total", "Jobs run.").registry(&registry))?;
//! counter.inc([("queue", "default")])?;
//!
//! let (body, headers) = metrics_exposition::render(&registry, &["text/plain"])?;
//! assert_eq!(headers["Content-Type"], metrics_exposition::TEXT_CONTENT_TYPE);
//! assert_eq!(
//!     String::from_utf8(body)?,
//!     "# HELP jobs_total Jobs run.\n# TYPE jobs_total counter\njobs_total{queue=\"default\"} 1\n",
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg), deny(broken_intra_doc_links))]
mod error;
pub use self::error::RenderError;

pub mod formatting;

mod formatter;
pub use self::formatter::{Formatter, Headers, TextFormatter, TEXT_CONTENT_TYPE};

mod negotiate;
pub use self::negotiate::{negotiate, parse_accepts, Format};

mod render;
pub use self::render::render;
