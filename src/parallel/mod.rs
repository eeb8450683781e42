//! Worker pool configuration and batch splitting for parallel candidate
//! evaluation.

use rayon::ThreadPoolBuilder;

/// How many worker threads candidate evaluation may use. Zero means the
/// global rayon pool (all cores).
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    pub workers: usize,
}

impl WorkerPool {
    /// All available cores.
    pub fn default_workers() -> Self {
        Self::default()
    }

    pub fn with_workers(workers: usize) -> Self {
        Self { workers }
    }

    /// Run `f` under this pool's thread budget. A dedicated pool is built
    /// only when a fixed worker count was requested.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return f();
        }
        match ThreadPoolBuilder::new().num_threads(self.workers).build() {
            Ok(pool) => pool.install(f),
            // Pool construction only fails under resource exhaustion;
            // falling back to the caller's thread keeps results identical.
            Err(_) => f(),
        }
    }
}

/// Split `total` items into up to `num_batches` contiguous `[start, end)`
/// ranges of near-equal size. Used for progress reporting between batches.
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut ranges = Vec::with_capacity(num_batches);
    let mut start = 0;
    for i in 0..num_batches {
        let end = start + base + usize::from(i < remainder);
        ranges.push((start, end));
        start = end;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_cover_total_without_gaps() {
        let ranges = batch_ranges(103, 8);
        assert_eq!(ranges.first().unwrap().0, 0);
        assert_eq!(ranges.last().unwrap().1, 103);
        for window in ranges.windows(2) {
            assert_eq!(window[0].1, window[1].0);
        }
    }

    #[test]
    fn more_batches_than_items_degrades_to_singletons() {
        let ranges = batch_ranges(3, 10);
        assert_eq!(ranges, vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn zero_inputs_yield_no_ranges() {
        assert!(batch_ranges(0, 4).is_empty());
        assert!(batch_ranges(4, 0).is_empty());
    }

    #[test]
    fn pool_runs_closure_and_returns_value() {
        let pool = WorkerPool::with_workers(2);
        let result = pool.install(|| 40 + 2);
        assert_eq!(result, 42);
    }
}
