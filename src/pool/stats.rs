//! Pool counters.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Snapshot of a pool's counters.
///
/// For a [`ChunkPool`](crate::ChunkPool) the unit is chunks; for a
/// [`BufferPool`](crate::BufferPool) it is buffers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Instances created over the pool's lifetime.
    pub allocated: usize,
    /// Instances currently handed out.
    pub live: usize,
    /// Instances waiting in the idle set.
    pub idle: usize,
    /// Acquisitions served from the idle set.
    pub hits: u64,
    /// Acquisitions that had to create a new instance.
    pub misses: u64,
}

#[derive(Debug, Default)]
pub(crate) struct PoolMetrics {
    allocated: AtomicUsize,
    live: AtomicUsize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PoolMetrics {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        self.allocated.fetch_add(1, Ordering::Relaxed);
    }

    /// Claims a live slot, failing if `limit` slots are already taken.
    pub(crate) fn try_claim(&self, limit: Option<usize>) -> bool {
        match limit {
            None => {
                self.live.fetch_add(1, Ordering::AcqRel);
                true
            }
            Some(limit) => self
                .live
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
                    (live < limit).then_some(live + 1)
                })
                .is_ok(),
        }
    }

    pub(crate) fn unclaim(&self) {
        saturating_sub(&self.live, 1);
    }

    pub(crate) fn forget(&self, count: usize) {
        saturating_sub(&self.allocated, count);
    }

    pub(crate) fn snapshot(&self, idle: usize) -> PoolStats {
        PoolStats {
            allocated: self.allocated.load(Ordering::Relaxed),
            live: self.live.load(Ordering::Acquire),
            idle,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

fn saturating_sub(target: &AtomicUsize, value: usize) {
    let _ = target.fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
        Some(current.saturating_sub(value))
    });
}
