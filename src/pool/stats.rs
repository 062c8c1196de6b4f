// src/pool/stats.rs
//! Statistics tracking for block pools.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Snapshot of a pool's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Number of blocks currently idle in the freelist
    pub available: usize,
    /// Number of blocks allocated because the freelist was empty
    pub allocated: usize,
    /// Total number of acquire() calls
    pub acquired: usize,
    /// Total number of release() calls
    pub released: usize,
    /// Released blocks that were dropped instead of kept (freelist full, views still alive, or wrong size)
    pub discarded: usize,
    /// Capacity of each block in bytes
    pub block_size: usize,
    /// Maximum number of blocks the pool retains
    pub capacity: usize,
}

impl PoolStats {
    /// Returns the number of blocks currently checked out (acquired but not released).
    ///
    /// # Examples
    ///
    /// ```
    /// use zerobuf::prelude::*;
    ///
    /// let mut pool = BufferPool::new(PoolConfig::default());
    /// let _block = pool.acquire();
    ///
    /// let stats = pool.stats();
    /// assert_eq!(stats.in_use(), 1);
    /// ```
    pub fn in_use(&self) -> usize {
        self.acquired.saturating_sub(self.released)
    }

    /// Returns the pool hit rate as a percentage (0.0-100.0).
    ///
    /// A higher hit rate indicates better block reuse and fewer allocations.
    ///
    /// # Examples
    ///
    /// ```
    /// use zerobuf::prelude::*;
    ///
    /// let mut pool = BufferPool::new(PoolConfig::default());
    /// for _ in 0..10 {
    ///     let block = pool.acquire();
    ///     pool.release(block);
    /// }
    ///
    /// assert_eq!(pool.stats().hit_rate(), 100.0);
    /// ```
    pub fn hit_rate(&self) -> f64 {
        if self.acquired == 0 {
            return 0.0;
        }
        let reused = self.acquired.saturating_sub(self.allocated);
        (reused as f64 / self.acquired as f64) * 100.0
    }
}

/// Live counters shared by a pool and its guards.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub(crate) allocated: AtomicUsize,
    pub(crate) acquired: AtomicUsize,
    pub(crate) released: AtomicUsize,
    pub(crate) discarded: AtomicUsize,
}

impl Counters {
    #[inline]
    pub(crate) fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, available: usize, block_size: usize, capacity: usize) -> PoolStats {
        PoolStats {
            available,
            allocated: self.allocated.load(Ordering::Relaxed),
            acquired: self.acquired.load(Ordering::Relaxed),
            released: self.released.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            block_size,
            capacity,
        }
    }
}
