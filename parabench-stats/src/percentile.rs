//! Percentile computation over raw samples.
//!
//! Uses linear interpolation between nearest ranks, so the median of an even
//! sample count is the midpoint of the two central values.

/// Compute a single percentile (0..=100) from unsorted samples.
pub fn percentile(samples: &[f64], pct: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    if samples.len() == 1 {
        return samples[0];
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    sorted_percentile(&sorted, pct)
}

/// Same as [`percentile`], but the input must already be sorted ascending.
pub(crate) fn sorted_percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let n = sorted.len();
    let p = (pct / 100.0).clamp(0.0, 1.0);

    // Linear interpolation between nearest ranks
    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
}
