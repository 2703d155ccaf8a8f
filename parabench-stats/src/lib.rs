#![warn(missing_docs)]
//! ParaBench Statistical Accumulator
//!
//! Provides the robust reduction primitives used by the flattening stage:
//! - `Univariate`: a sample accumulator with percentile-based median
//! - Symmetric trimming / winsorizing for outlier-resistant means
//!
//! Benchmark timings are noisy in a specific way: most samples cluster around
//! the true cost, with a tail of large outliers caused by scheduler
//! preemption, GC pauses in the code under test, or clock granularity. The
//! reduction policy here follows that shape — median for small sample counts,
//! winsorized mean once there is enough data to trim.

mod percentile;
mod univariate;

pub use percentile::percentile;
pub use univariate::{TrimPolicy, Univariate};

/// Sample count below which the median is preferred over a trimmed mean.
///
/// With fewer samples than this, trimming both tails would leave too little
/// data to average meaningfully.
pub const TRIM_SAMPLE_THRESHOLD: usize = 14;

/// Number of samples trimmed/winsorized from each tail by the default policy.
pub const TRIM_PER_TAIL: usize = 7;
