//! Value records produced by probes and sweeps.

use serde::Serialize;

/// The measurement record produced by one probe.
///
/// All times are in seconds. Wall-clock time covers exactly the solution
/// invocation; setup, teardown, and harness bookkeeping are excluded.
/// Invariants: `iter == time / n`; `cpu == user + system` when the CPU-time
/// provider is available; `err` is present exactly when teardown reported a
/// problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuStat {
    /// The integer argument the input was generated from.
    pub n: u64,
    /// Wall-clock time of the measured invocation.
    pub time: f64,
    /// Time per operation, `time / n`.
    pub iter: f64,
    /// Userspace CPU time delta, when the provider supports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<f64>,
    /// Kernel CPU time delta, when the provider supports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<f64>,
    /// Combined CPU time, `user + system`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,
    /// Teardown's description of what was wrong with the output, if anything.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
}

/// Snapshot handed to the progress hook after every completed probe.
#[derive(Debug, Clone)]
pub struct Progress {
    /// Variant that was probed.
    pub name: String,
    /// Argument it was probed at.
    pub n: u64,
    /// The measurement just taken.
    pub result: CpuStat,
    /// Probes completed so far in this sweep.
    pub count: u64,
    /// Measured time accumulated by this variant so far.
    pub cumulative_time: f64,
    /// Per-variant time budget, if one was set.
    pub max_time: Option<f64>,
    /// Measured time accumulated across all variants.
    pub total_time: f64,
    /// `max_time` times the number of variants (0 when unset).
    pub total_max_time: f64,
}

/// Notification delivered to the teardown-failure hook.
#[derive(Debug, Clone)]
pub struct TeardownFailure {
    /// Argument of the failing probe.
    pub n: u64,
    /// Variant name, when the probe was named.
    pub name: Option<String>,
    /// Teardown's problem description.
    pub err: String,
}
