//! Error taxonomy for the measurement engine.
//!
//! `InvalidArgument` and `Configuration` are precondition violations and are
//! returned before any asynchronous work starts. `Timeout` carries the phase
//! that hung so a stuck setup is distinguishable from a stuck solution.
//! Teardown problems are never errors; they travel as the `err` field of a
//! [`CpuStat`](crate::CpuStat).

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// The three bounded phases of a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Input construction from `n`.
    Setup,
    /// The measured invocation of the solution.
    Execution,
    /// Result validation and resource release.
    Teardown,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Setup => "setup",
            Phase::Execution => "execution",
            Phase::Teardown => "teardown",
        };
        f.write_str(label)
    }
}

/// Errors produced by probes and sweeps.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BenchError {
    /// A phase did not complete before its deadline. The work future is
    /// dropped, so a late completion is never observed.
    #[error("{phase} timed out after {} ms", timeout.as_millis())]
    Timeout {
        /// Which phase hung.
        phase: Phase,
        /// The deadline that elapsed.
        timeout: Duration,
    },

    /// `probe` was given a non-positive argument.
    #[error("probe requires a positive integer argument, got {0}")]
    InvalidArgument(u64),

    /// A sweep was requested with no termination condition.
    #[error("unbounded sweep refused: {0}")]
    Configuration(&'static str),
}
