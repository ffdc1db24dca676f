//! Scan statistics with atomic counters.
//!
//! This module provides [`ScanStats`] for tracking scan progress and
//! [`StatsSnapshot`] for point-in-time statistics views.
//!
//! # Thread Safety
//!
//! All counters use [`AtomicU64`] with [`Relaxed`](std::sync::atomic::Ordering::Relaxed)
//! ordering. The numbers are informational; the join barrier at the end of a
//! scan is what makes the final snapshot complete.
//!
//! # Examples
//!
//! ```
//! use apic_scanner::ScanStats;
//!
//! let stats = ScanStats::new();
//! stats.add_planned(2);
//! stats.increment_scanned();
//! stats.increment_skipped();
//!
//! let snapshot = stats.snapshot();
//! assert_eq!(snapshot.planned, 2);
//! assert!(snapshot.is_degraded());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Atomic counters for one scan.
#[derive(Debug, Default)]
pub struct ScanStats {
    /// Work units planned.
    planned: AtomicU64,
    /// Work units whose fetches succeeded and were cross-checked.
    scanned: AtomicU64,
    /// Work units skipped because a fetch failed.
    skipped: AtomicU64,
    /// Action objects that carried a refcont `oDn` and were checked.
    checked: AtomicU64,
    /// Mismatches recorded.
    mismatches: AtomicU64,
}

impl ScanStats {
    /// Creates a new [`ScanStats`] with all counters at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds to the planned-units counter.
    #[inline]
    pub fn add_planned(&self, count: u64) {
        self.planned.fetch_add(count, Ordering::Relaxed);
    }

    /// Increments the scanned-units counter.
    #[inline]
    pub fn increment_scanned(&self) {
        self.scanned.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the skipped-units counter.
    #[inline]
    pub fn increment_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds to the checked-objects counter.
    #[inline]
    pub fn add_checked(&self, count: u64) {
        self.checked.fetch_add(count, Ordering::Relaxed);
    }

    /// Adds to the mismatch counter.
    #[inline]
    pub fn add_mismatches(&self, count: u64) {
        self.mismatches.fetch_add(count, Ordering::Relaxed);
    }

    /// Returns a point-in-time snapshot of all statistics.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            planned: self.planned.load(Ordering::Relaxed),
            scanned: self.scanned.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            checked: self.checked.load(Ordering::Relaxed),
            mismatches: self.mismatches.load(Ordering::Relaxed),
        }
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.planned.store(0, Ordering::Relaxed);
        self.scanned.store(0, Ordering::Relaxed);
        self.skipped.store(0, Ordering::Relaxed);
        self.checked.store(0, Ordering::Relaxed);
        self.mismatches.store(0, Ordering::Relaxed);
    }
}

/// A point-in-time snapshot of scan statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Work units planned.
    pub planned: u64,
    /// Work units cross-checked.
    pub scanned: u64,
    /// Work units skipped after a fetch failure.
    pub skipped: u64,
    /// Action objects checked against the reference set.
    pub checked: u64,
    /// Mismatches recorded.
    pub mismatches: u64,
}

impl StatsSnapshot {
    /// Units that have finished, whether scanned or skipped.
    #[inline]
    #[must_use]
    pub const fn completed(&self) -> u64 {
        self.scanned + self.skipped
    }

    /// Returns `true` if at least one unit could not be scanned.
    ///
    /// A degraded run may under-report mismatches.
    #[inline]
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.skipped > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_counters() {
        let stats = ScanStats::new();
        stats.add_planned(386);
        stats.increment_scanned();
        stats.increment_scanned();
        stats.increment_skipped();
        stats.add_checked(10);
        stats.add_mismatches(3);

        let snap = stats.snapshot();
        assert_eq!(snap.planned, 386);
        assert_eq!(snap.scanned, 2);
        assert_eq!(snap.skipped, 1);
        assert_eq!(snap.completed(), 3);
        assert_eq!(snap.checked, 10);
        assert_eq!(snap.mismatches, 3);
        assert!(snap.is_degraded());
    }

    #[test]
    fn test_stats_reset() {
        let stats = ScanStats::new();
        stats.add_planned(5);
        stats.increment_skipped();
        stats.reset();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
        assert!(!stats.snapshot().is_degraded());
    }

    #[test]
    fn test_stats_concurrent_increments() {
        use std::sync::Arc;
        use std::thread;

        let stats = Arc::new(ScanStats::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for _ in 0..100 {
                        stats.increment_scanned();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(stats.snapshot().scanned, 800);
    }
}
