// src/pool/shared.rs
//! Lock-free block pool that can be shared across threads.
//!
//! # Architecture
//!
//! The freelist is a bounded `crossbeam::queue::ArrayQueue` sized to the
//! pool's capacity, so the retention bound is enforced by the queue itself:
//! a release that finds the queue full drops the block. Acquisition pops the
//! queue and falls back to a fresh allocation. A zero-capacity pool has no
//! queue at all and drops every released block.
//!
//! Blocks are handed out inside a [`PooledBlock`] guard that releases the
//! block when dropped. Recycling follows the same rules as
//! [`BufferPool`](crate::BufferPool): blocks still referenced by views are
//! never put back.

use super::config::PoolConfig;
use super::standard::reclaim;
use super::stats::{Counters, PoolStats};
use crate::block::RawBlock;
use crossbeam::queue::ArrayQueue;
use std::fmt;
use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tracing::{debug, trace};

struct Shared {
    blocks: Option<ArrayQueue<RawBlock>>,
    config: PoolConfig,
    counters: Counters,
}

impl Shared {
    fn release(&self, mut block: RawBlock) {
        Counters::bump(&self.counters.released);

        if let Err(reason) = reclaim(&mut block, &self.config) {
            Counters::bump(&self.counters.discarded);
            trace!(reason, "discarding released block");
            return;
        }
        let retained = match &self.blocks {
            Some(blocks) => blocks.push(block).is_ok(),
            None => false,
        };
        if !retained {
            Counters::bump(&self.counters.discarded);
            trace!(reason = "freelist full", "discarding released block");
        }
    }

    fn num_free(&self) -> usize {
        self.blocks.as_ref().map_or(0, ArrayQueue::len)
    }
}

/// Thread-safe block pool backed by a lock-free bounded queue.
///
/// Cloning the pool is cheap and yields another handle to the same freelist.
///
/// # Example
///
/// ```rust
/// use zerobuf::prelude::*;
/// use std::thread;
///
/// let pool = SharedBufferPool::new(PoolConfig::default());
///
/// let handles: Vec<_> = (0..4u8).map(|i| {
///     let pool = pool.clone();
///     thread::spawn(move || {
///         let mut block = pool.acquire();
///         block.append_bytes(&[i; 16]).unwrap();
///         block.view_all().len()
///     })
/// }).collect();
/// for h in handles {
///     assert_eq!(h.join().unwrap(), 16);
/// }
///
/// assert!(pool.num_free() <= pool.capacity());
/// ```
#[derive(Clone)]
pub struct SharedBufferPool {
    shared: Arc<Shared>,
}

impl Default for SharedBufferPool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl SharedBufferPool {
    /// Creates a pool and pre-allocates `config.capacity` blocks.
    ///
    /// With a capacity of zero the pool retains nothing: every acquire
    /// allocates and every release drops the block.
    pub fn new(config: PoolConfig) -> Self {
        let blocks = (config.capacity > 0).then(|| {
            let queue = ArrayQueue::new(config.capacity);
            for _ in 0..config.capacity {
                // cannot fail: the queue was sized for exactly these blocks
                let _ = queue.push(RawBlock::new(config.block_size));
            }
            queue
        });
        Self {
            shared: Arc::new(Shared {
                blocks,
                config,
                counters: Counters::default(),
            }),
        }
    }

    /// Takes a free block, allocating a fresh one if the freelist is empty.
    ///
    /// The returned guard releases the block back to this pool when dropped.
    pub fn acquire(&self) -> PooledBlock {
        let shared = &self.shared;
        Counters::bump(&shared.counters.acquired);

        let block = shared.blocks.as_ref().and_then(ArrayQueue::pop).unwrap_or_else(|| {
            Counters::bump(&shared.counters.allocated);
            debug!(block_size = shared.config.block_size, "freelist empty, allocating block");
            RawBlock::new(shared.config.block_size)
        });
        PooledBlock {
            block: ManuallyDrop::new(block),
            pool: Arc::clone(&self.shared),
        }
    }

    /// Returns an unguarded block to the pool, or drops it.
    pub fn release(&self, block: RawBlock) {
        self.shared.release(block);
    }

    /// Number of blocks idle in the freelist.
    #[inline]
    pub fn num_free(&self) -> usize {
        self.shared.num_free()
    }

    /// Maximum number of blocks the pool retains.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.shared.config.capacity
    }

    /// Capacity of each block handed out.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.shared.config.block_size
    }

    /// Returns a snapshot of pool statistics.
    ///
    /// Counters use `Relaxed` ordering; values are eventually consistent.
    pub fn stats(&self) -> PoolStats {
        let shared = &self.shared;
        shared
            .counters
            .snapshot(shared.num_free(), shared.config.block_size, shared.config.capacity)
    }
}

impl fmt::Debug for SharedBufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBufferPool")
            .field("config", &self.shared.config)
            .field("num_free", &self.num_free())
            .finish()
    }
}

/// A block borrowed from a [`SharedBufferPool`].
///
/// Dereferences to [`RawBlock`]. On drop the block goes back to the pool,
/// subject to the pool's recycling rules. Use [`into_inner`](Self::into_inner)
/// to keep the block instead.
pub struct PooledBlock {
    block: ManuallyDrop<RawBlock>,
    pool: Arc<Shared>,
}

impl PooledBlock {
    /// Detaches the block from the pool; it will not be released on drop.
    pub fn into_inner(self) -> RawBlock {
        let mut this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so the block is taken exactly once
        // and the pool handle is dropped in place below.
        unsafe {
            let block = ManuallyDrop::take(&mut this.block);
            std::ptr::drop_in_place(&mut this.pool);
            block
        }
    }
}

impl Deref for PooledBlock {
    type Target = RawBlock;

    fn deref(&self) -> &RawBlock {
        &self.block
    }
}

impl DerefMut for PooledBlock {
    fn deref_mut(&mut self) -> &mut RawBlock {
        &mut self.block
    }
}

impl Drop for PooledBlock {
    fn drop(&mut self) {
        // SAFETY: the block is taken exactly once, here, and never touched again.
        let block = unsafe { ManuallyDrop::take(&mut self.block) };
        self.pool.release(block);
    }
}

impl fmt::Debug for PooledBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PooledBlock").field(&*self.block).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn pool(capacity: usize) -> SharedBufferPool {
        SharedBufferPool::new(PoolConfig {
            block_size: 32,
            capacity,
            zero_on_release: false,
        })
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let pool = pool(2);
        {
            let mut block = pool.acquire();
            block.append_bytes(b"abc").unwrap();
            assert_eq!(pool.num_free(), 1);
        }
        assert_eq!(pool.num_free(), 2);
        assert_eq!(pool.acquire().writepos(), 0);
    }

    #[test]
    fn test_retention_bound() {
        let pool = pool(2);
        let guards: Vec<_> = (0..5).map(|_| pool.acquire()).collect();
        drop(guards);
        assert_eq!(pool.num_free(), 2);

        let stats = pool.stats();
        assert_eq!(stats.acquired, 5);
        assert_eq!(stats.allocated, 3);
        assert_eq!(stats.released, 5);
        assert_eq!(stats.discarded, 3);
    }

    #[test]
    fn test_into_inner_skips_release() {
        let pool = pool(1);
        let block = pool.acquire().into_inner();
        assert_eq!(pool.num_free(), 0);
        assert_eq!(pool.stats().released, 0);

        pool.release(block);
        assert_eq!(pool.num_free(), 1);
    }

    #[test]
    fn test_live_view_blocks_recycling() {
        let pool = pool(1);
        let view = {
            let mut block = pool.acquire();
            block.append_bytes(b"still here").unwrap();
            block.view_all()
        };
        assert_eq!(pool.num_free(), 0);
        assert_eq!(view, b"still here");
    }

    #[test]
    fn test_zero_capacity_retains_nothing() {
        let pool = pool(0);
        assert_eq!(pool.capacity(), 0);
        assert_eq!(pool.num_free(), 0);

        drop(pool.acquire());
        pool.release(RawBlock::new(32));
        assert_eq!(pool.num_free(), 0);

        let stats = pool.stats();
        assert_eq!(stats.allocated, 1);
        assert_eq!(stats.released, 2);
        assert_eq!(stats.discarded, 2);
    }

    #[test]
    fn test_concurrent_use() {
        let pool = pool(4);
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let pool = pool.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        let mut block = pool.acquire();
                        block.append_bytes(&[i as u8; 8]).unwrap();
                        assert_eq!(block.view_all(), [i as u8; 8]);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let stats = pool.stats();
        assert_eq!(stats.acquired, 800);
        assert_eq!(stats.released, 800);
        assert!(pool.num_free() <= 4);
    }
}
