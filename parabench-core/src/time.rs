//! Clock and CPU-time capabilities.
//!
//! Both are injected into the harness rather than read from the environment,
//! so the engine stays deterministic under fake providers in tests. The
//! defaults use `std::time::Instant` for wall-clock and `getrusage` for
//! process CPU time on unix; platforms without a CPU-time source report an
//! explicit "unsupported" value instead of guessing.

use std::time::Duration;

/// Monotonic wall-clock reader. The epoch is arbitrary; only differences
/// between readings are meaningful.
pub trait Clock {
    /// Current reading. Must be monotonically non-decreasing.
    fn now(&self) -> Duration;
}

/// Default wall clock, anchored on a `std::time::Instant` at construction.
#[derive(Debug)]
pub struct SystemClock {
    origin: std::time::Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// One reading of process CPU time, split by privilege level. Seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuTimes {
    /// Time spent in userspace.
    pub user: f64,
    /// Time spent in the kernel.
    pub system: f64,
}

/// Process-level CPU-time reader. `None` means the hosting environment has
/// no usable source, and probes will omit the CPU fields entirely.
pub trait CpuTimeSource {
    /// Current cumulative CPU time of this process.
    fn cpu_time(&self) -> Option<CpuTimes>;
}

/// Default CPU-time source: `getrusage(RUSAGE_SELF)` on unix, unsupported
/// elsewhere.
#[derive(Debug, Default)]
pub struct ProcessCpu;

impl CpuTimeSource for ProcessCpu {
    fn cpu_time(&self) -> Option<CpuTimes> {
        read_rusage()
    }
}

/// Explicitly unsupported CPU-time source, for hosts without one and for
/// deterministic tests.
#[derive(Debug, Default)]
pub struct NoCpuTime;

impl CpuTimeSource for NoCpuTime {
    fn cpu_time(&self) -> Option<CpuTimes> {
        None
    }
}

#[cfg(unix)]
fn read_rusage() -> Option<CpuTimes> {
    use std::mem::MaybeUninit;

    let mut usage = MaybeUninit::<libc::rusage>::zeroed();
    // SAFETY: getrusage fills a plain-data struct; RUSAGE_SELF is always a
    // valid target for the current process.
    let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) };
    if rc != 0 {
        return None;
    }
    // SAFETY: a zero return code guarantees the struct was written.
    let usage = unsafe { usage.assume_init() };

    Some(CpuTimes {
        user: timeval_secs(usage.ru_utime),
        system: timeval_secs(usage.ru_stime),
    })
}

#[cfg(not(unix))]
fn read_rusage() -> Option<CpuTimes> {
    None
}

#[cfg(unix)]
fn timeval_secs(tv: libc::timeval) -> f64 {
    tv.tv_sec as f64 + tv.tv_usec as f64 / 1e6
}

/// Default number of observed tick changes for [`time_resolution`].
pub const DEFAULT_RESOLUTION_ATTEMPTS: u32 = 15;

/// Busy-poll `clock` until `attempts` distinct value changes are observed and
/// return the average tick size in seconds.
///
/// Diagnostic utility for checking that the clock can resolve the smallest
/// measurements being taken; not part of the measurement hot path.
pub fn time_resolution(clock: &dyn Clock, attempts: u32) -> f64 {
    if attempts == 0 {
        return 0.0;
    }

    let first = clock.now();
    let mut last = first;
    let mut remaining = attempts;
    while remaining > 0 {
        let now = clock.now();
        if now == last {
            continue;
        }
        last = now;
        remaining -= 1;
    }

    (last - first).as_secs_f64() / attempts as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Clock that advances a fixed step on every reading.
    struct SteppingClock {
        tick: Cell<u64>,
        step: Duration,
    }

    impl SteppingClock {
        fn new(step: Duration) -> Self {
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
            self.step * tick as u32
        }
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::default();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_process_cpu_reports_something_on_unix() {
        // Burn a little CPU so the counters are non-zero.
        let mut acc = 0u64;
        for i in 0..100_000u64 {
            acc = acc.wrapping_add(i * i);
        }
        std::hint::black_box(acc);

        if cfg!(unix) {
            let times = ProcessCpu.cpu_time().expect("getrusage failed");
            assert!(times.user >= 0.0);
            assert!(times.system >= 0.0);
        } else {
            assert!(ProcessCpu.cpu_time().is_none());
        }
    }

    #[test]
    fn test_no_cpu_time_is_explicitly_unsupported() {
        assert!(NoCpuTime.cpu_time().is_none());
    }

    #[test]
    fn test_time_resolution_averages_ticks() {
        let clock = SteppingClock::new(Duration::from_millis(2));
        let res = time_resolution(&clock, 10);
        assert!((res - 0.002).abs() < 1e-9, "unexpected resolution {res}");
    }

    #[test]
    fn test_time_resolution_zero_attempts() {
        let clock = SteppingClock::new(Duration::from_millis(1));
        assert_eq!(time_resolution(&clock, 0), 0.0);
    }
}
