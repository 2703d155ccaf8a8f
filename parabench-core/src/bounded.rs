//! Bounded operation runner.
//!
//! Wraps one unit of suspending work with a deadline, turning "never
//! completes" into a reportable failure. This guards against setup, teardown,
//! or solution code that never produces its result — the dominant real-world
//! failure mode a benchmarking harness has to survive.

use std::future::Future;
use std::time::Duration;

use crate::error::{BenchError, Phase};

/// Run `work` to completion, or fail with [`BenchError::Timeout`] carrying
/// `phase` once `limit` elapses first.
///
/// `None` or a zero limit means unbounded. Exactly one of {result, timeout}
/// is ever observed: on timeout the work future is dropped, so a completion
/// racing the deadline is discarded rather than double-resolved.
pub async fn bounded<T>(
    phase: Phase,
    limit: Option<Duration>,
    work: impl Future<Output = T>,
) -> Result<T, BenchError> {
    match limit {
        Some(limit) if !limit.is_zero() => tokio::time::timeout(limit, work)
            .await
            .map_err(|_| BenchError::Timeout {
                phase,
                timeout: limit,
            }),
        _ => Ok(work.await),
    }
}
