//! Univariate sample accumulator.
//!
//! Collects repeated measurements of one quantity and reduces them to a
//! robust scalar. The accumulator itself is deliberately dumb storage;
//! robustness comes from picking the right reduction (`median` vs a trimmed
//! or winsorized `mean`) for the available sample count.

use crate::percentile::sorted_percentile;

/// How to treat the extreme samples when deriving a trimmed accumulator.
///
/// `lower`/`upper` are sample counts per tail, not percentages. With
/// `winsorize` set, the trimmed samples are clamped to the surviving boundary
/// values instead of being dropped, so the sample count is preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimPolicy {
    /// Samples affected at the low end.
    pub lower: usize,
    /// Samples affected at the high end.
    pub upper: usize,
    /// Clamp instead of drop.
    pub winsorize: bool,
}

/// Accumulator for repeated samples of a single quantity.
#[derive(Debug, Clone, Default)]
pub struct Univariate {
    samples: Vec<f64>,
}

impl Univariate {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sample.
    pub fn add(&mut self, sample: f64) {
        self.samples.push(sample);
    }

    /// Number of samples accumulated so far.
    pub fn count(&self) -> usize {
        self.samples.len()
    }

    /// Arithmetic mean, or 0.0 when empty.
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Median via linear interpolation between central ranks.
    pub fn median(&self) -> f64 {
        self.percentile(50.0)
    }

    /// Arbitrary percentile (0..=100) of the accumulated samples.
    pub fn percentile(&self, pct: f64) -> f64 {
        let mut sorted = self.samples.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        sorted_percentile(&sorted, pct)
    }

    /// Derive a new accumulator with both tails trimmed per `policy`.
    ///
    /// When the requested trim would consume the whole sample, both tail
    /// counts are reduced to `(count - 1) / 2` so at least one value always
    /// survives; at that point the winsorized mean degenerates toward the
    /// median, which is the right limit for a robust estimator.
    pub fn clone_trimmed(&self, policy: TrimPolicy) -> Univariate {
        let mut sorted = self.samples.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let len = sorted.len();
        if len == 0 {
            return Univariate::new();
        }

        let cap = (len - 1) / 2;
        let lower = policy.lower.min(cap);
        let upper = policy.upper.min(cap);

        let samples = if policy.winsorize {
            let low = sorted[lower];
            let high = sorted[len - 1 - upper];
            sorted
                .iter()
                .map(|&x| x.clamp(low, high.max(low)))
                .collect()
        } else {
            sorted[lower..len - upper].to_vec()
        };

        Univariate { samples }
    }
}
