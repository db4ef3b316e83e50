//! A gauge describing the platform the process runs on.
//!
//! Rendered as:
//!
//! ```text
//! # HELP platform_info Platform information
//! # TYPE platform_info gauge
//! platform_info{arch="x86_64",family="unix",os="linux"} 1
//! ```
use std::env::consts::{ARCH, FAMILY, OS};

use crate::collector::{Gauge, Opts};
use crate::error::Error;
use crate::labels::{IntoLabels, LabelSet};
use crate::registry::Registry;

/// Name of the platform information gauge.
pub const PLATFORM_INFO: &str = "platform_info";

/// Gets the labels describing the target this crate was compiled for.
pub fn platform_labels() -> LabelSet {
    [("os", OS), ("arch", ARCH), ("family", FAMILY)].into_labels()
}

/// Registers the `platform_info` gauge into `registry` and sets its single series to 1.
///
/// # Errors
///
/// Fails with [`Error::DuplicateName`] if `platform_info` is already registered.
pub fn register_platform_info(registry: &Registry) -> Result<Gauge, Error> {
    let opts = Opts::new(PLATFORM_INFO, "Platform information").registry(registry);
    let gauge = Gauge::with_opts(opts)?;
    gauge.set(platform_labels(), 1.0)?;
    Ok(gauge)
}
