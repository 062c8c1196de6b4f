// src/pool/standard.rs
//! Single-threaded block pool backed by a bounded freelist.
//!
//! # Pool Size Limits
//!
//! The pool pre-allocates `capacity` blocks and never retains more than that.
//! When the freelist is empty, [`BufferPool::acquire`] allocates a fresh block
//! instead of failing, so the number of blocks in circulation may exceed
//! `capacity`; the surplus is dropped as it comes back.
//!
//! # Recycling
//!
//! A released block re-enters the freelist only if:
//! - the freelist is below `capacity`,
//! - the block has the pool's block size, and
//! - no view still references its memory.
//!
//! Otherwise the pool discards it silently. A discarded block that still has
//! views stays alive until the last of them is dropped. Recycled blocks come
//! back with `writepos == 0`, and are securely zeroed first when
//! `zero_on_release` is set.

use super::config::PoolConfig;
use super::stats::{Counters, PoolStats};
use crate::block::RawBlock;
use tracing::{debug, trace};

/// Prepares `block` for reuse, returning why it cannot be reused otherwise.
pub(crate) fn reclaim(block: &mut RawBlock, config: &PoolConfig) -> Result<(), &'static str> {
    if block.capacity() != config.block_size {
        return Err("foreign block size");
    }
    let cleared = if config.zero_on_release {
        block.burn()
    } else {
        block.reset()
    };
    if cleared { Ok(()) } else { Err("views still alive") }
}

/// Bounded freelist of fixed-size blocks.
///
/// Not thread-safe; use one pool per worker, or
/// [`SharedBufferPool`](crate::SharedBufferPool) when blocks must cross threads.
///
/// # Example
///
/// ```rust
/// use zerobuf::prelude::*;
///
/// let mut pool = BufferPool::new(PoolConfig {
///     block_size: 4096,
///     capacity: 2,
///     zero_on_release: false,
/// });
/// assert_eq!(pool.num_free(), 2);
///
/// let mut block = pool.acquire();
/// block.append_bytes(b"payload")?;
/// assert_eq!(pool.num_free(), 1);
///
/// pool.release(block);
/// assert_eq!(pool.num_free(), 2);
/// # Ok::<(), zerobuf::BufferError>(())
/// ```
#[derive(Debug)]
pub struct BufferPool {
    blocks: Vec<RawBlock>,
    config: PoolConfig,
    counters: Counters,
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl BufferPool {
    /// Creates a pool and pre-allocates `config.capacity` blocks of `config.block_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `config.block_size` exceeds [`BLOCK_MAX_SIZE`](crate::BLOCK_MAX_SIZE).
    pub fn new(config: PoolConfig) -> Self {
        let blocks = (0..config.capacity)
            .map(|_| RawBlock::new(config.block_size))
            .collect();
        Self {
            blocks,
            config,
            counters: Counters::default(),
        }
    }

    /// Shorthand for a pool of `capacity` blocks of `block_size` bytes.
    pub fn with_capacity(capacity: usize, block_size: usize) -> Self {
        Self::new(PoolConfig {
            block_size,
            capacity,
            ..PoolConfig::default()
        })
    }

    /// Takes a free block, allocating a fresh one if the freelist is empty.
    ///
    /// The block is the caller's until it is handed back with [`release`](Self::release).
    pub fn acquire(&mut self) -> RawBlock {
        Counters::bump(&self.counters.acquired);
        self.blocks.pop().unwrap_or_else(|| {
            Counters::bump(&self.counters.allocated);
            debug!(block_size = self.config.block_size, "freelist empty, allocating block");
            RawBlock::new(self.config.block_size)
        })
    }

    /// Returns `block` to the freelist, or drops it (see the module docs).
    pub fn release(&mut self, mut block: RawBlock) {
        Counters::bump(&self.counters.released);

        let outcome = if self.blocks.len() >= self.config.capacity {
            Err("freelist full")
        } else {
            reclaim(&mut block, &self.config)
        };
        match outcome {
            Ok(()) => self.blocks.push(block),
            Err(reason) => {
                Counters::bump(&self.counters.discarded);
                trace!(reason, "discarding released block");
            }
        }
    }

    /// Number of blocks idle in the freelist.
    #[inline]
    pub fn num_free(&self) -> usize {
        self.blocks.len()
    }

    /// Maximum number of blocks the pool retains.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Capacity of each block handed out.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    /// The configuration the pool was built with.
    #[inline]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Returns a snapshot of pool statistics.
    pub fn stats(&self) -> PoolStats {
        self.counters
            .snapshot(self.blocks.len(), self.config.block_size, self.config.capacity)
    }

    /// Drops every idle block.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }
}
