//! Aggregation/flattening of raw sweep output into plot-ready series.
//!
//! Repeated probes of the same `(variant, n)` pair are noisy: scheduler
//! preemption, frequency scaling, and clock granularity all leave outliers.
//! This stage reduces each group to one robust scalar — median when there is
//! too little data to trim, winsorized mean otherwise — drops measurements
//! too short to be informative, and aligns every variant onto one shared
//! x-axis.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use parabench_stats::{TRIM_PER_TAIL, TRIM_SAMPLE_THRESHOLD, TrimPolicy, Univariate};

use crate::stat::CpuStat;

/// Reduced values below this many seconds are dominated by clock-resolution
/// noise and discarded as non-informative.
pub const DEFAULT_MIN_TIME: f64 = 0.004;

/// Which scalar field of a [`CpuStat`] to aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatField {
    /// Wall-clock time.
    #[default]
    Time,
    /// Combined CPU time; samples without a CPU reading are skipped.
    Cpu,
}

impl StatField {
    fn extract(self, stat: &CpuStat) -> Option<f64> {
        match self {
            StatField::Time => Some(stat.time),
            StatField::Cpu => stat.cpu,
        }
    }
}

/// Options for [`flatten_data`].
#[derive(Debug, Clone)]
pub struct FlattenOptions {
    /// Significance threshold in seconds; see [`DEFAULT_MIN_TIME`].
    pub min_time: f64,
    /// Which measurement to aggregate.
    pub use_stat: StatField,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            min_time: DEFAULT_MIN_TIME,
            use_stat: StatField::Time,
        }
    }
}

/// Aligned per-argument series, ready for plotting.
///
/// `n` is the shared ascending x-axis. Every variant of the input comparison
/// has an entry in `times` and `ops`: an empty series when none of its points
/// survived the significance threshold, otherwise one value per axis entry
/// with `f64::NAN` where that variant has no surviving value. `ops[name][i]`
/// is `n[i] / times[name][i]`, operations per second.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FlatData {
    /// Shared x-axis: argument values that survived for at least one variant.
    pub n: Vec<u64>,
    /// Per-variant reduced time (or CPU time) per axis entry.
    pub times: BTreeMap<String, Vec<f64>>,
    /// Per-variant operations per second per axis entry.
    pub ops: BTreeMap<String, Vec<f64>>,
}

/// Reduce raw comparison output into aligned per-argument series.
///
/// For each variant, samples sharing an `n` feed one fresh accumulator. The
/// accumulator reduces to its median when it holds fewer than
/// [`TRIM_SAMPLE_THRESHOLD`] samples, otherwise to the mean after
/// winsorizing [`TRIM_PER_TAIL`] samples from each tail. Reductions below
/// `min_time` are dropped; an `n` only enters the shared axis if it survived
/// for at least one variant.
pub fn flatten_data(
    comparison: &BTreeMap<String, Vec<CpuStat>>,
    options: &FlattenOptions,
) -> FlatData {
    let mut reduced: BTreeMap<&str, BTreeMap<u64, f64>> = BTreeMap::new();

    for (name, series) in comparison {
        let mut by_arg: BTreeMap<u64, Univariate> = BTreeMap::new();
        for stat in series {
            if let Some(value) = options.use_stat.extract(stat) {
                by_arg.entry(stat.n).or_default().add(value);
            }
        }

        let mut kept = BTreeMap::new();
        for (n, acc) in by_arg {
            let value = if acc.count() < TRIM_SAMPLE_THRESHOLD {
                acc.median()
            } else {
                acc.clone_trimmed(TrimPolicy {
                    lower: TRIM_PER_TAIL,
                    upper: TRIM_PER_TAIL,
                    winsorize: true,
                })
                .mean()
            };
            if value >= options.min_time {
                kept.insert(n, value);
            }
        }
        reduced.insert(name.as_str(), kept);
    }

    let axis: Vec<u64> = reduced
        .values()
        .flat_map(|kept| kept.keys().copied())
        .collect::<BTreeSet<u64>>()
        .into_iter()
        .collect();

    let mut out = FlatData {
        n: axis.clone(),
        ..FlatData::default()
    };

    for (name, kept) in &reduced {
        if kept.is_empty() {
            out.times.insert((*name).to_string(), Vec::new());
            out.ops.insert((*name).to_string(), Vec::new());
            continue;
        }

        let times: Vec<f64> = axis
            .iter()
            .map(|n| kept.get(n).copied().unwrap_or(f64::NAN))
            .collect();
        let ops: Vec<f64> = axis
            .iter()
            .zip(&times)
            .map(|(&n, &t)| n as f64 / t)
            .collect();

        out.times.insert((*name).to_string(), times);
        out.ops.insert((*name).to_string(), ops);
    }

    out
}
