//! Helper functions and types related to histogram data.
use crate::error::Error;

/// Default upper bounds for histogram buckets.
pub const DEFAULT_BUCKETS: [f64; 12] =
    [0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, f64::INFINITY];

/// A bucketed histogram.
///
/// This histogram tracks the number of samples that fall into pre-defined buckets, rather than
/// exposing any sort of quantiles.  Buckets are cumulative: each bucket counts every sample less
/// than or equal to its upper bound, and the final bound is always `+Inf`.
///
/// This type is most useful with systems that prefer bucketed data, such as Prometheus'
/// histogram type, as opposed to its summary type, which deals with quantiles.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    count: u64,
    bounds: Vec<f64>,
    buckets: Vec<u64>,
    sum: f64,
}

impl Histogram {
    /// Creates a new `Histogram`.
    ///
    /// If the largest bound is not `+Inf`, a `+Inf` bound is appended.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnsortedBuckets`] if `bounds` is not strictly ascending, and with
    /// [`Error::InsufficientBuckets`] if there is no finite bound.
    pub fn new(bounds: &[f64]) -> Result<Histogram, Error> {
        let bounds = normalize_bounds(bounds)?;
        let buckets = vec![0u64; bounds.len()];

        Ok(Histogram { count: 0, bounds, buckets, sum: 0.0 })
    }

    /// Gets the sum of all samples.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Gets the sample count.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Gets the upper bounds of the buckets, in ascending order.
    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    /// Gets the buckets.
    ///
    /// Buckets are tuples, where the first element is the bucket limit itself, and the second
    /// element is the cumulative count of samples in that bucket.
    pub fn buckets(&self) -> Vec<(f64, u64)> {
        self.bounds.iter().cloned().zip(self.buckets.iter().cloned()).collect()
    }

    /// Records a single sample.
    pub fn record(&mut self, sample: f64) {
        self.sum += sample;
        self.count += 1;

        // Add the sample to every bucket where the value is less than the bound.
        for (idx, bucket) in self.bounds.iter().enumerate() {
            if sample <= *bucket {
                self.buckets[idx] += 1;
            }
        }
    }
}

fn normalize_bounds(bounds: &[f64]) -> Result<Vec<f64>, Error> {
    // A lone NaN has no neighbor to fail the comparison against.
    let ascending = bounds.windows(2).all(|pair| pair[0] < pair[1]);
    if !ascending || bounds.iter().any(|b| b.is_nan()) {
        return Err(Error::UnsortedBuckets);
    }

    if !bounds.iter().any(|b| b.is_finite()) {
        return Err(Error::InsufficientBuckets);
    }

    let mut normalized = bounds.to_vec();
    if normalized.last() != Some(&f64::INFINITY) {
        normalized.push(f64::INFINITY);
    }

    Ok(normalized)
}

/// Returns `count` buckets, each `width` wide, where the lowest bucket has an upper bound of
/// `start`.
///
/// No `+Inf` bucket is included in the returned list.
///
/// # Errors
///
/// Fails with [`Error::InvalidBucketLayout`] if `count` is zero.
pub fn linear_buckets(start: f64, width: f64, count: usize) -> Result<Vec<f64>, Error> {
    if count < 1 {
        return Err(Error::InvalidBucketLayout { reason: "count must be a positive number" });
    }

    Ok((0..count).map(|i| start + i as f64 * width).collect())
}

/// Returns `count` buckets, where the lowest bucket has an upper bound of `start` and each
/// following bucket's upper bound is `factor` times the previous one.
///
/// No `+Inf` bucket is included in the returned list.
///
/// # Errors
///
/// Fails with [`Error::InvalidBucketLayout`] if `count` is zero, `start` is not positive, or
/// `factor` is less than one.
pub fn exponential_buckets(start: f64, factor: f64, count: usize) -> Result<Vec<f64>, Error> {
    if count < 1 {
        return Err(Error::InvalidBucketLayout { reason: "count must be a positive number" });
    }
    if start <= 0.0 {
        return Err(Error::InvalidBucketLayout { reason: "start must be positive" });
    }
    if factor < 1.0 {
        return Err(Error::InvalidBucketLayout { reason: "factor must be greater than one" });
    }

    Ok((0..count).map(|i| start * factor.powi(i as i32)).collect())
}
