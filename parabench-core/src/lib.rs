#![warn(missing_docs)]
//! ParaBench Core - Measurement Engine
//!
//! This crate provides the measurement-and-aggregation engine:
//! - Probe engine: one timed trial of one solution at one argument value,
//!   with setup/teardown isolated from the measured interval
//! - Bounded operation runner: per-phase deadlines that turn "never
//!   completes" into a reportable failure
//! - Sweep scheduler: probes across a geometric argument progression with
//!   per-variant time budgets and progress reporting
//! - Flattener: robust reduction of noisy repeated samples into aligned,
//!   plot-ready series
//!
//! Wall-clock and CPU-time access are injected capabilities, so the engine
//! is deterministic under fake providers. Everything runs in a single
//! cooperative execution context: no threads, no `Send` bounds, suspension
//! only at phase boundaries and the explicit yield between scheduled probes.

mod bench;
mod bounded;
mod error;
mod flatten;
mod progression;
mod solution;
mod stat;
mod sweep;
mod time;

pub use bench::{ParaBench, ProbeOptions, TeardownInfo};
pub use bounded::bounded;
pub use error::{BenchError, Phase};
pub use flatten::{DEFAULT_MIN_TIME, FlatData, FlattenOptions, StatField, flatten_data};
pub use progression::ArgProgression;
pub use solution::Solution;
pub use stat::{CpuStat, Progress, TeardownFailure};
pub use sweep::CompareOptions;
pub use time::{
    Clock, CpuTimeSource, CpuTimes, DEFAULT_RESOLUTION_ATTEMPTS, NoCpuTime, ProcessCpu,
    SystemClock, time_resolution,
};
