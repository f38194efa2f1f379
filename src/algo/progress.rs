//! Progress reporting for long-running algorithms.
//!
//! Algorithms with a `*_with_progress` variant call back into a [`Progress`]
//! as they move through their phases.
//!
//! # Example
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use quadmesh::algo::Progress;
//!
//! let calls = Arc::new(AtomicUsize::new(0));
//! let seen = Arc::clone(&calls);
//! let progress = Progress::new(move |current, total, message| {
//!     seen.fetch_add(1, Ordering::Relaxed);
//!     assert!(current <= total, "{message}");
//! });
//!
//! progress.report(1, 3, "Pairing triangles");
//! assert_eq!(calls.load(Ordering::Relaxed), 1);
//! ```

/// Fixed-point resolution of one phase in [`Progress::report_sub`].
const SLOT: usize = 1000;

/// Callback invoked as `(current, total, message)` while an algorithm runs.
///
/// `current` never exceeds `total`. Phases are reported in order, so a
/// caller that only ever moves forward sees a monotonic bar.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Wrap a callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report that step `current` of `total` is starting.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Report progress within a sub-range.
    ///
    /// Maps `[0, sub_total]` onto the slice `[range_current, range_current + 1]`
    /// of a `range_total`-step operation, so a phase with many inner steps
    /// can report without overrunning its slot.
    ///
    /// ```ignore
    /// // Phase 2 of 3 is the collapse loop
    /// progress.report_sub(collapses, wanted, 1, 3, "Collapsing diagonals");
    /// ```
    #[inline]
    pub fn report_sub(
        &self,
        sub_current: usize,
        sub_total: usize,
        range_current: usize,
        range_total: usize,
        message: &str,
    ) {
        if sub_total == 0 || range_total == 0 {
            return;
        }
        let fraction = (sub_current.min(sub_total) * SLOT) / sub_total;
        (self.callback)(range_current * SLOT + fraction, range_total * SLOT, message);
    }

    /// A reporter that ignores every update.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_report_sub_scales_into_slot() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |c, t, _| sink.lock().unwrap().push((c, t)));

        progress.report_sub(5, 10, 1, 3, "phase");
        progress.report_sub(20, 10, 1, 3, "overrun");
        progress.report_sub(1, 0, 1, 3, "ignored");

        assert_eq!(*seen.lock().unwrap(), vec![(1500, 3000), (2000, 3000)]);
    }
}
