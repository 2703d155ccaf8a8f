//! Candidate implementations under comparison.
//!
//! The two calling conventions — direct-return and future-returning — are a
//! tagged union with a single capability: produce a result eventually. The
//! probe engine's measurement boundary is written once against `invoke`
//! instead of being duplicated per style.

use std::fmt;

use futures::FutureExt;
use futures::future::LocalBoxFuture;

/// A named candidate implementation of the algorithm under test.
///
/// Solutions consume their input; the harness clones the input before the
/// measured interval so teardown can still inspect it. Futures are local
/// (no `Send` bound): the whole harness runs in a single cooperative
/// execution context.
pub enum Solution<I, O> {
    /// Direct-return style: the result is available when the call returns.
    Sync(Box<dyn Fn(I) -> O>),
    /// Suspending style: the call yields a future that resolves to the
    /// result exactly once. The callback-style hazard of signalling
    /// completion twice cannot be expressed here.
    Async(Box<dyn Fn(I) -> LocalBoxFuture<'static, O>>),
}

impl<I, O> Solution<I, O> {
    /// Wrap a direct-return closure.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(I) -> O + 'static,
    {
        Solution::Sync(Box::new(f))
    }

    /// Wrap a future-returning closure.
    pub fn asynchronous<F, Fut>(f: F) -> Self
    where
        F: Fn(I) -> Fut + 'static,
        Fut: Future<Output = O> + 'static,
    {
        Solution::Async(Box::new(move |input| f(input).boxed_local()))
    }

    /// Whether this solution suspends.
    pub fn is_async(&self) -> bool {
        matches!(self, Solution::Async(_))
    }

    /// Produce the result, suspending if the solution does.
    pub async fn invoke(&self, input: I) -> O {
        match self {
            Solution::Sync(f) => f(input),
            Solution::Async(f) => f(input).await,
        }
    }
}

impl<I, O> fmt::Debug for Solution<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Solution::Sync(_) => f.write_str("Solution::Sync"),
            Solution::Async(_) => f.write_str("Solution::Async"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sync_invoke() {
        let double = Solution::sync(|n: u64| n * 2);
        assert!(!double.is_async());
        assert_eq!(double.invoke(21).await, 42);
    }

    #[tokio::test]
    async fn test_async_invoke_owns_input() {
        let sum = Solution::asynchronous(|v: Vec<u64>| async move {
            tokio::task::yield_now().await;
            v.iter().sum::<u64>()
        });
        assert!(sum.is_async());
        assert_eq!(sum.invoke(vec![1, 2, 3]).await, 6);
    }
}
