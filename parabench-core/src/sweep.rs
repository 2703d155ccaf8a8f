//! Sweep scheduler: drive probes across an argument progression and the
//! registered variants, under per-variant time budgets.
//!
//! Scheduling is an outer loop over arguments in ascending progression order
//! and an inner loop over still-pending variants in registry (lexicographic)
//! order. Probes run one at a time, with a cooperative yield between them so
//! a slow sweep does not starve other tasks on the runtime. Samples land in
//! each variant's output sequence in execution order, so downstream
//! statistics may assume chronological ordering.

use std::collections::{BTreeMap, BTreeSet};

use crate::bench::{ParaBench, ProbeOptions};
use crate::error::BenchError;
use crate::progression::ArgProgression;
use crate::stat::{CpuStat, Progress};

/// Options for one [`ParaBench::compare`] sweep.
///
/// Exactly which arguments get probed comes from `arg_list` when given,
/// otherwise from the geometric progression over `min_arg..=max_arg`. At
/// least one of `arg_list`, `max_arg`, or `max_time` must be present; an
/// unbounded, unterminating sweep is refused outright.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Explicit ordered list of arguments to probe at.
    pub arg_list: Option<Vec<u64>>,
    /// First argument of the generated progression.
    pub min_arg: u64,
    /// Inclusive cap on the generated progression.
    pub max_arg: Option<u64>,
    /// Per-variant budget in seconds of accumulated measured time. A variant
    /// is scheduled no further once it exceeds this.
    pub max_time: Option<f64>,
    /// Consecutive trials per `(variant, argument)` pair.
    pub repeat: u32,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            arg_list: None,
            min_arg: 1,
            max_arg: None,
            max_time: None,
            repeat: 1,
        }
    }
}

impl CompareOptions {
    fn validate(&self) -> Result<(), BenchError> {
        if self.arg_list.is_none() && self.max_arg.is_none() && self.max_time.is_none() {
            return Err(BenchError::Configuration(
                "one of arg_list, max_arg, or max_time must be set",
            ));
        }
        Ok(())
    }

    fn arguments(&self) -> Box<dyn Iterator<Item = u64>> {
        match &self.arg_list {
            Some(list) => Box::new(list.clone().into_iter()),
            None => Box::new(ArgProgression::new(self.min_arg, self.max_arg)),
        }
    }
}

impl<I, O> ParaBench<I, O>
where
    I: Clone + 'static,
    O: 'static,
{
    /// Compare every registered solution across the argument progression,
    /// returning each solution's measurements in execution order.
    ///
    /// A solution leaves the pending set the first time its accumulated
    /// measured time exceeds `max_time`; once no solution is pending the
    /// sweep terminates early regardless of remaining arguments. The
    /// progress hook fires after every completed probe.
    ///
    /// Any probe failure (a timeout, in particular) aborts the whole sweep;
    /// run [`ParaBench::check`] first to screen out variants that hang.
    pub async fn compare(
        &self,
        options: &CompareOptions,
    ) -> Result<BTreeMap<String, Vec<CpuStat>>, BenchError> {
        options.validate()?;
        let repeat = options.repeat.max(1);

        let mut out: BTreeMap<String, Vec<CpuStat>> = self
            .solutions
            .keys()
            .map(|name| (name.clone(), Vec::new()))
            .collect();
        let mut spent: BTreeMap<&str, f64> = BTreeMap::new();
        let mut pending: BTreeSet<&str> = self.solutions.keys().map(String::as_str).collect();

        // progress accounting only
        let mut count: u64 = 0;
        let mut total_time = 0.0;
        let total_max_time = options.max_time.unwrap_or(0.0) * self.solutions.len() as f64;

        for n in options.arguments() {
            if pending.is_empty() {
                break;
            }

            for (name, solution) in &self.solutions {
                // Budget exhaustion is checked at pair entry; a pair already
                // started finishes all its repeats.
                if !pending.contains(name.as_str()) {
                    continue;
                }

                for _ in 0..repeat {
                    let probe_options = ProbeOptions {
                        arg: n,
                        name: Some(name.clone()),
                        timeout: None,
                    };
                    let stat = self.probe(&probe_options, solution).await?;

                    let cumulative = {
                        let entry = spent.entry(name.as_str()).or_insert(0.0);
                        *entry += stat.time;
                        *entry
                    };
                    if let Some(limit) = options.max_time {
                        if cumulative > limit {
                            pending.remove(name.as_str()); // had enough
                        }
                    }

                    if let Some(series) = out.get_mut(name) {
                        series.push(stat.clone());
                    }
                    count += 1;
                    total_time += stat.time;
                    (self.progress)(&Progress {
                        name: name.clone(),
                        n,
                        result: stat,
                        count,
                        cumulative_time: cumulative,
                        max_time: options.max_time,
                        total_time,
                        total_max_time,
                    });

                    // One probe at a time; hand control back to the runtime
                    // between measurements.
                    tokio::task::yield_now().await;
                }
            }
        }

        Ok(out)
    }
}
