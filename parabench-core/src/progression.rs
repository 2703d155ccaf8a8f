//! Geometric argument progression.
//!
//! Sweeps probe at arguments growing by a factor of 4/3, rounded up. Dense
//! coverage at small `n` where interesting crossovers happen, fast growth at
//! large `n` where each probe is expensive. A fresh progression is built per
//! sweep; it is never shared across `compare` calls.

/// Lazy, strictly increasing sequence of probe arguments.
///
/// Bounded by `max_arg` when present, otherwise unbounded and terminated
/// externally (the sweep stops once no variant is still pending).
#[derive(Debug, Clone)]
pub struct ArgProgression {
    next: u64,
    max_arg: Option<u64>,
}

impl ArgProgression {
    /// Start at `min_arg` (clamped to at least 1), optionally capped at
    /// `max_arg` inclusive.
    pub fn new(min_arg: u64, max_arg: Option<u64>) -> Self {
        Self {
            next: min_arg.max(1),
            max_arg,
        }
    }
}

impl Iterator for ArgProgression {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let current = self.next;
        if let Some(max) = self.max_arg {
            if current > max {
                return None;
            }
        }

        // ceil(current * 4 / 3), forced strictly increasing
        let grown = current.saturating_mul(4).saturating_add(2) / 3;
        self.next = grown.max(current.saturating_add(1));

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_min_arg() {
        let first = ArgProgression::new(10, None).next();
        assert_eq!(first, Some(10));
    }

    #[test]
    fn test_strictly_increasing_geometric_growth() {
        let args: Vec<u64> = ArgProgression::new(1, None).take(20).collect();
        for pair in args.windows(2) {
            let expected = (pair[0] * 4).div_ceil(3);
            assert!(pair[1] > pair[0], "not increasing: {args:?}");
            assert!(pair[1] >= expected, "grew slower than 4/3: {args:?}");
        }
    }

    #[test]
    fn test_bounded_by_max_arg_inclusive() {
        let args: Vec<u64> = ArgProgression::new(1, Some(8)).collect();
        assert_eq!(args, vec![1, 2, 3, 4, 6, 8]);
    }

    #[test]
    fn test_zero_min_arg_clamps_to_one() {
        let first = ArgProgression::new(0, None).next();
        assert_eq!(first, Some(1));
    }

    #[test]
    fn test_restartable() {
        let a: Vec<u64> = ArgProgression::new(1, Some(100)).collect();
        let b: Vec<u64> = ArgProgression::new(1, Some(100)).collect();
        assert_eq!(a, b);
    }
}
