#![warn(missing_docs)]
//! # ParaBench
//!
//! Asynchronous parametric benchmarking: execute candidate implementations
//! of an algorithm with different parameter values and plot execution time
//! against the parameter.
//!
//! Instead of endlessly repeating the same measurement, ParaBench sweeps a
//! geometric progression of input sizes, which surfaces the interesting
//! occasions — cache pollution, allocator cliffs, and the crossover between
//! a fast-but-naive implementation and a slower but asymptotically better
//! one. CPU time (user + system) is measured alongside wall-clock time when
//! the platform supports it.
//!
//! - **Probe engine**: one timed trial per `(variant, n)` with setup and
//!   teardown isolated from the measured interval and bounded by per-phase
//!   deadlines
//! - **Sweep scheduler**: per-variant time budgets, early termination,
//!   cooperative yielding, progress snapshots
//! - **Flattener**: outlier-resistant reduction (median / winsorized mean)
//!   into aligned, plot-ready series
//!
//! ## Quick start
//!
//! ```ignore
//! use parabench::prelude::*;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), BenchError> {
//!     let bench = ParaBench::with_setup(|n| (0..n).rev().collect::<Vec<u64>>())
//!         .teardown(|info| (!info.output.is_sorted()).then(|| "not sorted".to_string()))
//!         .add("std_sort", |mut v| {
//!             v.sort();
//!             v
//!         });
//!
//!     // Screen for hangs and broken outputs with a 100 ms deadline first.
//!     assert!(bench.check(std::time::Duration::from_millis(100), 4).await.is_none());
//!
//!     let raw = bench
//!         .compare(&CompareOptions {
//!             max_arg: Some(100_000),
//!             max_time: Some(1.0),
//!             ..Default::default()
//!         })
//!         .await?;
//!
//!     let flat = flatten_data(&raw, &FlattenOptions::default());
//!     println!("{:?} {:?}", flat.n, flat.times);
//!     Ok(())
//! }
//! ```
//!
//! ## Suspending solutions
//!
//! Future-returning solutions take ownership of their input and resolve
//! exactly once:
//!
//! ```ignore
//! bench.add_async("deferred", |input| async move { work(input).await });
//! ```

// Re-export the measurement engine
pub use parabench_core::{
    ArgProgression, BenchError, Clock, CompareOptions, CpuStat, CpuTimeSource, CpuTimes,
    DEFAULT_MIN_TIME, DEFAULT_RESOLUTION_ATTEMPTS, FlatData, FlattenOptions, NoCpuTime, ParaBench,
    Phase, ProbeOptions, ProcessCpu, Progress, Solution, StatField, SystemClock, TeardownFailure,
    TeardownInfo, bounded, flatten_data, time_resolution,
};

// Re-export the statistical accumulator the flattener is built on
pub use parabench_stats::{TrimPolicy, Univariate};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        BenchError, CompareOptions, CpuStat, FlatData, FlattenOptions, ParaBench, ProbeOptions,
        Solution, StatField, flatten_data,
    };
}
