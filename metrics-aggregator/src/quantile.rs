//! Streaming quantile estimation over an unbounded sequence of observations.
//!
//! The estimator implements the biased/targeted quantile algorithm from "Effective Computation of
//! Biased Quantiles over Data Streams" by Cormode, Korn, Muthukrishnan and Srivastava.  It keeps
//! a sorted list of samples, each one annotated with the width of the rank range it stands for
//! (`width`) and the uncertainty of its maximum rank (`delta`).  Samples whose rank ranges can be
//! folded into a neighbor without breaking any of the configured [`Invariant`]s are merged away
//! during compression, which bounds memory use.
use crate::error::Error;

/// Number of observations buffered before they are merged into the sketch.
const BUFFER_SIZE: usize = 500;

/// A target quantile and the rank error allowed when estimating it.
///
/// An invariant of `(0.9, 0.01)` means the reported 0.9-quantile has a true rank somewhere
/// between the 0.89 and 0.91 fraction of all observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Invariant {
    quantile: f64,
    epsilon: f64,
}

impl Invariant {
    /// Creates a new [`Invariant`].
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidInvariant`] unless `quantile` lies strictly between 0 and 1 and
    /// `epsilon` is finite and non-negative.
    pub fn new(quantile: f64, epsilon: f64) -> Result<Invariant, Error> {
        let valid_quantile = quantile > 0.0 && quantile < 1.0;
        let valid_epsilon = epsilon.is_finite() && epsilon >= 0.0;
        if !valid_quantile || !valid_epsilon {
            return Err(Error::InvalidInvariant { quantile, epsilon });
        }

        Ok(Invariant { quantile, epsilon })
    }

    /// Gets the target quantile.
    pub fn quantile(&self) -> f64 {
        self.quantile
    }

    /// Gets the allowed rank error.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Allowed rank-range width of a sample at `rank` out of `n` observations.
    fn allowed_width(&self, rank: f64, n: f64) -> f64 {
        if self.quantile * n <= rank {
            2.0 * self.epsilon * rank / self.quantile
        } else {
            2.0 * self.epsilon * (n - rank) / (1.0 - self.quantile)
        }
    }

    /// Smallest allowed width over the ranks `lower..=upper`.
    ///
    /// The allowed width falls towards the target rank and rises past it, so the minimum is found
    /// at the point of the range nearest the target.
    fn tightest_width(&self, lower: f64, upper: f64, n: f64) -> f64 {
        let rank = (self.quantile * n).max(lower).min(upper);
        self.allowed_width(rank, n)
    }
}

/// Parses `(quantile, epsilon)` pairs into a vector of [`Invariant`]s.
///
/// # Errors
///
/// Fails on the first pair that is not a valid [`Invariant`].
pub fn parse_invariants(pairs: &[(f64, f64)]) -> Result<Vec<Invariant>, Error> {
    pairs.iter().map(|&(q, e)| Invariant::new(q, e)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    value: f64,
    width: f64,
    delta: f64,
}

/// A streaming quantile sketch with an exact running sum and count.
#[derive(Debug, Clone)]
pub struct Estimator {
    invariants: Vec<Invariant>,
    samples: Vec<Sample>,
    buffer: Vec<f64>,
    // Observations already merged into `samples`.
    merged: u64,
    count: u64,
    sum: f64,
}

impl Estimator {
    /// Creates an empty [`Estimator`] tracking the given invariants.
    pub fn new(invariants: Vec<Invariant>) -> Estimator {
        Estimator {
            invariants,
            samples: Vec::new(),
            buffer: Vec::with_capacity(BUFFER_SIZE),
            merged: 0,
            count: 0,
            sum: 0.0,
        }
    }

    /// Gets the invariants this estimator was created with.
    pub fn invariants(&self) -> &[Invariant] {
        &self.invariants
    }

    /// Adds an observation.
    ///
    /// The observation is buffered; once enough observations are pending, they are
    /// merged into the sketch and the sketch is compressed.
    pub fn observe(&mut self, value: f64) {
        self.buffer.push(value);
        self.count += 1;
        self.sum += value;

        if self.buffer.len() >= BUFFER_SIZE {
            self.flush();
        }
    }

    /// Gets the number of observations.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Gets the sum of all observations.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Number of samples currently retained by the sketch, excluding buffered observations.
    pub fn retained(&self) -> usize {
        self.samples.len()
    }

    /// Estimates the value at quantile `q`.
    ///
    /// The estimate is the retained sample whose rank range lies closest to rank `floor(q * n)`.
    /// For a configured invariant, its rank is within `epsilon * n` of that target.
    ///
    /// Returns `None` if nothing has been observed yet.
    pub fn query(&mut self, q: f64) -> Option<f64> {
        self.flush();

        let first = self.samples.first()?;
        let target = (q * self.merged as f64).floor();

        let mut best = first.value;
        let mut best_error = f64::INFINITY;
        let mut rank = 0.0;
        for sample in &self.samples {
            rank += sample.width;
            if rank - target >= best_error {
                break;
            }

            let error = (target - rank).max(rank + sample.delta - target);
            if error < best_error {
                best = sample.value;
                best_error = error;
            }
        }

        Some(best)
    }

    /// Merges all buffered observations into the sketch, then compresses it.
    pub fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let mut pending = std::mem::take(&mut self.buffer);
        pending.sort_by(f64::total_cmp);
        self.merge(&pending);
        self.compress();

        // Hand the allocation back for the next batch.
        pending.clear();
        self.buffer = pending;
    }

    fn merge(&mut self, sorted: &[f64]) {
        let mut idx = 0;
        let mut after_retained = false;

        for &value in sorted {
            while idx < self.samples.len() && self.samples[idx].value <= value {
                after_retained = true;
                idx += 1;
            }

            // Below every retained sample or above all of them, the rank is exact.  Otherwise it
            // is only known to fall within the rank range of the next retained sample.
            let delta = match self.samples.get(idx) {
                Some(next) if after_retained => (next.width + next.delta - 1.0).max(0.0),
                _ => 0.0,
            };

            self.samples.insert(idx, Sample { value, width: 1.0, delta });
            idx += 1;
        }

        self.merged += sorted.len() as u64;
    }

    fn compress(&mut self) {
        if self.samples.len() < 2 {
            return;
        }

        let n = self.merged as f64;
        let mut xi = self.samples.len() - 1;
        // Minimum rank of `samples[i]` as the pass walks backwards.
        let mut rank = n - self.samples[xi].width;

        for i in (0..self.samples.len() - 1).rev() {
            let c = self.samples[i];
            let x = self.samples[xi];

            // The merged sample spans every rank from just above `c`'s predecessor to the maximum
            // rank of `x`, and has to fit the invariants anywhere in that span.
            let width = c.width + x.width + x.delta;
            let lower = rank - c.width;
            let upper = rank + x.width + x.delta;
            if width <= self.tightest_width(lower, upper, n) {
                self.samples[xi].width += c.width;
                self.samples.remove(i);
                xi -= 1;
            } else {
                xi = i;
            }
            rank -= c.width;
        }
    }

    fn tightest_width(&self, lower: f64, upper: f64, n: f64) -> f64 {
        self.invariants
            .iter()
            .map(|invariant| invariant.tightest_width(lower, upper, n))
            .fold(n + 1.0, f64::min)
    }
}
