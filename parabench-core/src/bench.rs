//! The benchmarking harness: hooks, variant registry, and the probe engine.
//!
//! A probe is one timed trial of one solution at one argument value, run as
//! three independently bounded phases: setup, measured execution, teardown.
//! The measured interval encloses exactly the solution invocation — nothing
//! else may happen between the clock reads and the call, since any stray
//! allocation or logging inside that boundary corrupts the benchmark.

use std::collections::BTreeMap;
use std::time::Duration;

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::bounded::bounded;
use crate::error::{BenchError, Phase};
use crate::solution::Solution;
use crate::stat::{CpuStat, Progress, TeardownFailure};
use crate::time::{
    Clock, CpuTimeSource, DEFAULT_RESOLUTION_ATTEMPTS, ProcessCpu, SystemClock, time_resolution,
};

/// Everything teardown needs to validate one probe: the original argument,
/// the input the solution received, and what the solution returned.
#[derive(Debug)]
pub struct TeardownInfo<I, O> {
    /// Argument the input was generated from.
    pub n: u64,
    /// Copy of the setup output, cloned before the measured interval.
    pub input: I,
    /// The solution's result.
    pub output: O,
}

/// Per-probe options.
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// Positive integer parameter to generate input from.
    pub arg: u64,
    /// Identifier of the solution being probed, carried into teardown-failure
    /// notifications.
    pub name: Option<String>,
    /// Deadline applied to each phase independently. `None` = unbounded.
    pub timeout: Option<Duration>,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            arg: 1,
            name: None,
            timeout: None,
        }
    }
}

impl ProbeOptions {
    /// Options probing at `arg` with no name and no deadline.
    pub fn at(arg: u64) -> Self {
        Self {
            arg,
            ..Self::default()
        }
    }
}

pub(crate) type SetupFn<I> = Box<dyn Fn(u64) -> LocalBoxFuture<'static, I>>;
pub(crate) type TeardownFn<I, O> =
    Box<dyn Fn(TeardownInfo<I, O>) -> LocalBoxFuture<'static, Option<String>>>;
pub(crate) type TeardownFailFn = Box<dyn Fn(&TeardownFailure)>;
pub(crate) type ProgressFn = Box<dyn Fn(&Progress)>;

/// Parametric benchmarking harness.
///
/// A snippet of code is executed with different parameter values, where the
/// parameter affects (or at least is expected to affect) execution time.
/// Instead of repeating one measurement endlessly, the harness plots time
/// against the parameter, surfacing cache effects and crossovers between a
/// fast-but-naive implementation and an asymptotically better one.
///
/// `I` is the input type produced by setup; `O` is the solution output type.
/// Hooks are single-slot state replaced wholesale by the chaining builder
/// methods.
///
/// ```ignore
/// let bench = ParaBench::new()
///     .setup(|n| (0..n).rev().collect::<Vec<u64>>())
///     .teardown(|info| (!info.output.is_sorted()).then(|| "output not sorted".to_string()))
///     .add("std_sort", |mut v| {
///         v.sort();
///         v
///     });
/// let data = bench.compare(&CompareOptions { max_time: Some(1.0), ..Default::default() }).await?;
/// ```
pub struct ParaBench<I = u64, O = u64> {
    pub(crate) solutions: BTreeMap<String, Solution<I, O>>,
    pub(crate) setup: SetupFn<I>,
    pub(crate) teardown: TeardownFn<I, O>,
    pub(crate) on_teardown_fail: TeardownFailFn,
    pub(crate) progress: ProgressFn,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) cpu: Box<dyn CpuTimeSource>,
}

impl<I, O> ParaBench<I, O>
where
    I: From<u64> + 'static,
    O: 'static,
{
    /// Harness whose default setup forwards `n` as the input.
    pub fn new() -> Self {
        Self::with_setup(I::from)
    }
}

impl<I, O> Default for ParaBench<I, O>
where
    I: From<u64> + 'static,
    O: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I, O> ParaBench<I, O>
where
    I: 'static,
    O: 'static,
{
    /// Harness with an initial synchronous setup hook; the entry point when
    /// the input type cannot be derived from `n` directly.
    pub fn with_setup<F>(f: F) -> Self
    where
        F: Fn(u64) -> I + 'static,
    {
        Self {
            solutions: BTreeMap::new(),
            setup: Box::new(move |n| std::future::ready(f(n)).boxed_local()),
            teardown: Box::new(|_| std::future::ready(None).boxed_local()),
            on_teardown_fail: Box::new(|_| {}),
            progress: Box::new(|_| {}),
            clock: Box::new(SystemClock::default()),
            cpu: Box::new(ProcessCpu),
        }
    }

    // ─── Hook replacement (each replaces the prior hook wholesale) ───────

    /// Replace the setup hook with a synchronous one.
    pub fn setup<F>(mut self, f: F) -> Self
    where
        F: Fn(u64) -> I + 'static,
    {
        self.setup = Box::new(move |n| std::future::ready(f(n)).boxed_local());
        self
    }

    /// Replace the setup hook with a suspending one.
    pub fn setup_async<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(u64) -> Fut + 'static,
        Fut: Future<Output = I> + 'static,
    {
        self.setup = Box::new(move |n| f(n).boxed_local());
        self
    }

    /// Replace the teardown hook with a synchronous one.
    ///
    /// Teardown checks the validity of the result and releases whatever
    /// resources the probe used. It returns `None` when no problem was found,
    /// or a description of what is wrong.
    pub fn teardown<F>(mut self, f: F) -> Self
    where
        F: Fn(TeardownInfo<I, O>) -> Option<String> + 'static,
    {
        self.teardown = Box::new(move |info| std::future::ready(f(info)).boxed_local());
        self
    }

    /// Replace the teardown hook with a suspending one.
    pub fn teardown_async<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(TeardownInfo<I, O>) -> Fut + 'static,
        Fut: Future<Output = Option<String>> + 'static,
    {
        self.teardown = Box::new(move |info| f(info).boxed_local());
        self
    }

    /// Fire-and-forget side effect whenever teardown reports a problem.
    pub fn on_teardown_fail<F>(mut self, f: F) -> Self
    where
        F: Fn(&TeardownFailure) + 'static,
    {
        self.on_teardown_fail = Box::new(f);
        self
    }

    /// Observe a snapshot after every completed probe of a sweep.
    pub fn progress<F>(mut self, f: F) -> Self
    where
        F: Fn(&Progress) + 'static,
    {
        self.progress = Box::new(f);
        self
    }

    // ─── Injected providers ──────────────────────────────────────────────

    /// Replace the monotonic wall-clock source.
    pub fn clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    /// Replace the process CPU-time source.
    pub fn cpu_source<C>(mut self, source: C) -> Self
    where
        C: CpuTimeSource + 'static,
    {
        self.cpu = Box::new(source);
        self
    }

    // ─── Variant registry ────────────────────────────────────────────────

    /// Register a direct-return solution under `name`, overwriting any prior
    /// entry of that name. The solution consumes its input.
    pub fn add<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(I) -> O + 'static,
    {
        self.solutions.insert(name.into(), Solution::sync(f));
        self
    }

    /// Register a suspending solution under `name`, overwriting any prior
    /// entry of that name:
    ///
    /// ```ignore
    /// bench.add_async("lookup", |input| async move { resolve(input).await })
    /// ```
    pub fn add_async<F, Fut>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(I) -> Fut + 'static,
        Fut: Future<Output = O> + 'static,
    {
        self.solutions.insert(name.into(), Solution::asynchronous(f));
        self
    }

    /// Remove the solution registered under `name`, if any.
    pub fn remove(mut self, name: &str) -> Self {
        self.solutions.remove(name);
        self
    }

    /// Registered solution names, lexicographically sorted.
    pub fn list(&self) -> Vec<&str> {
        self.solutions.keys().map(String::as_str).collect()
    }

    /// Look up a registered solution.
    pub fn solution(&self, name: &str) -> Option<&Solution<I, O>> {
        self.solutions.get(name)
    }

    // ─── Probe engine ────────────────────────────────────────────────────

    /// Run one timed trial of `solution` at `options.arg`.
    ///
    /// Phases run sequentially, each bounded by `options.timeout`
    /// independently: setup produces the input (not measured), the solution
    /// is invoked inside the measured interval, then teardown validates the
    /// output. A teardown problem is data, not an error: it becomes the
    /// `err` field of the returned [`CpuStat`] plus one notification to the
    /// teardown-failure hook.
    ///
    /// The solution consumes the input; the copy teardown receives is cloned
    /// from it before the measured interval starts, so the clone never
    /// pollutes the measurement.
    ///
    /// Fails with [`BenchError::InvalidArgument`] for `arg == 0` before any
    /// phase runs, or with [`BenchError::Timeout`] naming the phase that
    /// hung.
    pub async fn probe(
        &self,
        options: &ProbeOptions,
        solution: &Solution<I, O>,
    ) -> Result<CpuStat, BenchError>
    where
        I: Clone,
    {
        let n = options.arg;
        if n == 0 {
            return Err(BenchError::InvalidArgument(n));
        }

        let input = bounded(Phase::Setup, options.timeout, (self.setup)(n)).await?;
        let retained = input.clone();

        let (output, wall, cpu) = bounded(Phase::Execution, options.timeout, async {
            /* begin critical section */
            let t1 = self.clock.now();
            let c1 = self.cpu.cpu_time();
            let output = solution.invoke(input).await;
            let c2 = self.cpu.cpu_time();
            let t2 = self.clock.now();
            /* end critical section */
            (output, t2.saturating_sub(t1), c1.zip(c2))
        })
        .await?;

        let err = bounded(
            Phase::Teardown,
            options.timeout,
            (self.teardown)(TeardownInfo {
                n,
                input: retained,
                output,
            }),
        )
        .await?;

        let time = wall.as_secs_f64();
        let mut stat = CpuStat {
            n,
            time,
            iter: time / n as f64,
            user: None,
            system: None,
            cpu: None,
            err: None,
        };

        if let Some((before, after)) = cpu {
            // Deltas are informational only; no guard against the provider
            // wrapping or resetting between readings.
            let user = after.user - before.user;
            let system = after.system - before.system;
            stat.user = Some(user);
            stat.system = Some(system);
            stat.cpu = Some(user + system);
        }

        if let Some(err) = err {
            (self.on_teardown_fail)(&TeardownFailure {
                n,
                name: options.name.clone(),
                err: err.clone(),
            });
            stat.err = Some(err);
        }

        Ok(stat)
    }

    // ─── Correctness checker ─────────────────────────────────────────────

    /// Screen every registered solution with one short-deadline probe at a
    /// small argument, catching hangs and broken outputs before committing
    /// to a full sweep.
    ///
    /// Solutions are checked sequentially so one hang cannot distort
    /// another's timing. Returns `None` when everything passes — an explicit
    /// no-failure sentinel, distinct from an empty map — otherwise a map from
    /// solution name to failure reason covering every solution that errored,
    /// timed out, or whose teardown reported a problem.
    pub async fn check(&self, timeout: Duration, n: u64) -> Option<BTreeMap<String, String>>
    where
        I: Clone,
    {
        let mut bad = BTreeMap::new();

        for (name, solution) in &self.solutions {
            let options = ProbeOptions {
                arg: n,
                name: Some(name.clone()),
                timeout: Some(timeout),
            };
            match self.probe(&options, solution).await {
                Ok(stat) => {
                    if let Some(err) = stat.err {
                        bad.insert(name.clone(), err);
                    }
                }
                Err(err) => {
                    bad.insert(name.clone(), err.to_string());
                }
            }
        }

        (!bad.is_empty()).then_some(bad)
    }

    // ─── Diagnostics ─────────────────────────────────────────────────────

    /// Average tick size of the injected clock in seconds, observed over
    /// [`DEFAULT_RESOLUTION_ATTEMPTS`] value changes.
    pub fn time_res(&self) -> f64 {
        self.time_res_with(DEFAULT_RESOLUTION_ATTEMPTS)
    }

    /// Average tick size of the injected clock over `attempts` value changes.
    pub fn time_res_with(&self, attempts: u32) -> f64 {
        time_resolution(self.clock.as_ref(), attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{CpuTimes, NoCpuTime};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Clock advancing a fixed step on every reading.
    pub(crate) struct SteppingClock {
        tick: Cell<u32>,
        step: Duration,
    }

    impl SteppingClock {
        pub(crate) fn new(step: Duration) -> Self {
            Self {
                tick: Cell::new(0),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> Duration {
            let tick = self.tick.get();
            self.tick.set(tick + 1);
            self.step * tick
        }
    }

    /// CPU source advancing user time by 3 ms and system time by 1 ms per
    /// reading.
    struct SteppingCpu {
        reads: Cell<u32>,
    }

    impl SteppingCpu {
        fn new() -> Self {
            Self {
                reads: Cell::new(0),
            }
        }
    }

    impl CpuTimeSource for SteppingCpu {
        fn cpu_time(&self) -> Option<CpuTimes> {
            let reads = self.reads.get();
            self.reads.set(reads + 1);
            Some(CpuTimes {
                user: reads as f64 * 0.003,
                system: reads as f64 * 0.001,
            })
        }
    }

    fn deterministic_bench() -> ParaBench<u64, u64> {
        ParaBench::new()
            .clock(SteppingClock::new(Duration::from_millis(10)))
            .cpu_source(SteppingCpu::new())
    }

    #[tokio::test]
    async fn test_probe_invariants_hold() {
        let bench = deterministic_bench();
        let double = Solution::sync(|n: u64| n * 2);

        let stat = bench.probe(&ProbeOptions::at(4), &double).await.unwrap();

        assert_eq!(stat.n, 4);
        // One clock step between t1 and t2.
        assert!((stat.time - 0.01).abs() < 1e-12);
        assert!((stat.iter - stat.time / 4.0).abs() < f64::EPSILON);
        // One CPU reading between c1 and c2.
        let (user, system, cpu) = (
            stat.user.unwrap(),
            stat.system.unwrap(),
            stat.cpu.unwrap(),
        );
        assert!((user - 0.003).abs() < 1e-12);
        assert!((system - 0.001).abs() < 1e-12);
        assert!((cpu - (user + system)).abs() < f64::EPSILON);
        assert!(stat.err.is_none());
    }

    #[tokio::test]
    async fn test_probe_without_cpu_source_omits_cpu_fields() {
        let bench = ParaBench::<u64, u64>::new().cpu_source(NoCpuTime);
        let identity = Solution::sync(|n: u64| n);

        let stat = bench.probe(&ProbeOptions::at(1), &identity).await.unwrap();
        assert!(stat.user.is_none());
        assert!(stat.system.is_none());
        assert!(stat.cpu.is_none());
    }

    #[tokio::test]
    async fn test_zero_arg_rejected_before_setup() {
        let setup_ran = Rc::new(Cell::new(false));
        let flag = setup_ran.clone();

        let bench = ParaBench::<u64, u64>::new().setup(move |n| {
            flag.set(true);
            n
        });
        let identity = Solution::sync(|n: u64| n);

        let err = bench
            .probe(&ProbeOptions::at(0), &identity)
            .await
            .unwrap_err();

        assert_eq!(err, BenchError::InvalidArgument(0));
        assert!(!setup_ran.get(), "setup ran despite invalid argument");
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_solution_times_out_in_execution_phase() {
        let bench = ParaBench::<u64, u64>::new();
        let stuck = Solution::asynchronous(|_: u64| std::future::pending::<u64>());

        let options = ProbeOptions {
            timeout: Some(Duration::from_millis(20)),
            ..ProbeOptions::at(1)
        };
        let err = bench.probe(&options, &stuck).await.unwrap_err();

        assert_eq!(
            err,
            BenchError::Timeout {
                phase: Phase::Execution,
                timeout: Duration::from_millis(20),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_setup_times_out_in_setup_phase() {
        let bench =
            ParaBench::<u64, u64>::new().setup_async(|_| std::future::pending::<u64>());
        let identity = Solution::sync(|n: u64| n);

        let options = ProbeOptions {
            timeout: Some(Duration::from_millis(5)),
            ..ProbeOptions::at(1)
        };
        let err = bench.probe(&options, &identity).await.unwrap_err();

        assert!(matches!(
            err,
            BenchError::Timeout {
                phase: Phase::Setup,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_teardown_times_out_in_teardown_phase() {
        let bench = ParaBench::<u64, u64>::new()
            .teardown_async(|_| std::future::pending::<Option<String>>());
        let identity = Solution::sync(|n: u64| n);

        let options = ProbeOptions {
            timeout: Some(Duration::from_millis(5)),
            ..ProbeOptions::at(1)
        };
        let err = bench.probe(&options, &identity).await.unwrap_err();

        assert!(matches!(
            err,
            BenchError::Timeout {
                phase: Phase::Teardown,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_teardown_failure_is_data_plus_one_notification() {
        let notified = Rc::new(RefCell::new(Vec::new()));
        let sink = notified.clone();

        let bench = ParaBench::<u64, u64>::new()
            .teardown(|info| {
                (info.output != info.input * 2).then(|| format!("expected {}", info.input * 2))
            })
            .on_teardown_fail(move |failure| {
                sink.borrow_mut()
                    .push((failure.n, failure.name.clone(), failure.err.clone()));
            });

        let broken = Solution::sync(|n: u64| n + 1);
        let options = ProbeOptions {
            name: Some("broken".into()),
            ..ProbeOptions::at(3)
        };

        let stat = bench.probe(&options, &broken).await.unwrap();

        assert_eq!(stat.err.as_deref(), Some("expected 6"));
        let calls = notified.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], (3, Some("broken".into()), "expected 6".into()));
    }

    #[tokio::test]
    async fn test_teardown_sees_input_and_output() {
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();

        let bench = ParaBench::with_setup(|n| vec![n; n as usize])
            .teardown(move |info: TeardownInfo<Vec<u64>, u64>| {
                *sink.borrow_mut() = Some((info.n, info.input.clone(), info.output));
                None
            });
        let sum = Solution::sync(|v: Vec<u64>| v.iter().sum());

        let stat = bench.probe(&ProbeOptions::at(3), &sum).await.unwrap();

        assert!(stat.err.is_none());
        assert_eq!(*seen.borrow(), Some((3, vec![3, 3, 3], 9)));
    }

    #[tokio::test]
    async fn test_registry_add_remove_list() {
        let bench = ParaBench::<u64, u64>::new()
            .add("zebra", |n| n)
            .add("alpha", |n| n)
            .add_async("mid", |n| std::future::ready(n))
            .add("alpha", |n| n + 1); // overwrite

        assert_eq!(bench.list(), vec!["alpha", "mid", "zebra"]);

        let bench = bench.remove("mid");
        assert_eq!(bench.list(), vec!["alpha", "zebra"]);
        assert!(bench.solution("mid").is_none());
    }

    #[tokio::test]
    async fn test_check_passes_cleanly() {
        let bench = ParaBench::<u64, u64>::new()
            .add("ok", |n| n)
            .add_async("ok_async", |n| std::future::ready(n));

        let verdict = bench.check(Duration::from_millis(100), 1).await;
        assert!(verdict.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_names_exactly_the_broken_variants() {
        let bench = ParaBench::<u64, u64>::new()
            .teardown(|info| (info.output == 0).then(|| "got zero".to_string()))
            .add("ok", |n| n)
            .add("wrong", |_| 0)
            .add_async("missing", |_| std::future::pending::<u64>());

        let bad = bench
            .check(Duration::from_millis(1), 1)
            .await
            .expect("expected failures");

        assert_eq!(
            bad.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["missing", "wrong"]
        );
        assert!(bad["missing"].contains("timed out"), "{:?}", bad["missing"]);
        assert_eq!(bad["wrong"], "got zero");
    }

    #[test]
    fn test_time_res_reports_clock_step() {
        let bench =
            ParaBench::<u64, u64>::new().clock(SteppingClock::new(Duration::from_millis(4)));
        let res = bench.time_res();
        assert!((res - 0.004).abs() < 1e-9, "unexpected resolution {res}");
    }
}
