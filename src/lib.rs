// src/lib.rs
//! # Zero-Copy Byte Buffer Library
//!
//! Pooled fixed-size memory blocks, and cheap immutable views into them that
//! can be sliced, compared, searched, split and concatenated without copying.
//!
//! Features:
//! - Fixed-capacity [`RawBlock`]s filled by single reads or explicit appends
//! - Bounded block recycling with [`BufferPool`] (single-threaded) and
//!   [`SharedBufferPool`] (lock-free, RAII guards)
//! - Reference-counted [`View`]s that keep their block's memory alive
//! - Boyer–Moore–Horspool substring search with a Bloom-mask skip ([`search`])
//! - [`ViewGroup`]s presenting non-contiguous views as one sequence
//! - A [`Collator`] that merges adjacent views and copies only when it must
//! - Optional secure zeroing of recycled blocks via the `zeroize` crate
//!
//! # Example
//!
//! ```
//! use zerobuf::prelude::*;
//! # use zerobuf::BufferError;
//!
//! let mut pool = BufferPool::with_capacity(4, 16);
//! let mut block = pool.acquire();
//! block.append_bytes(b"hello world!!!")?;
//!
//! let view = block.view_all();
//! assert_eq!(view.find(b"world"), Some(6));
//! assert_eq!(view.split(b" ")?.collect::<Vec<_>>(), [&b"hello"[..], b"world!!!"]);
//! assert_eq!(view.slice(6..11)?, b"world");
//! assert_eq!(view.strip_set(b"!"), b"hello world");
//!
//! drop(view);
//! pool.release(block);
//! # Ok::<(), BufferError>(())
//! ```
//!
//! # Sharing model
//!
//! A block only ever writes past its write position, and views only cover
//! bytes before it, so views taken earlier stay valid while the block keeps
//! filling. Resetting a block for reuse requires that no view is left; pools
//! drop blocks that are still viewed instead of recycling them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod block;
pub mod collator;
pub mod error;
pub mod group;
pub mod pool;
pub mod search;
pub mod sequence;
pub mod view;

// Re-export main types
pub use block::{BLOCK_MAX_SIZE, RawBlock};
pub use collator::Collator;
pub use error::{BufferError, Result, ResultExt};
pub use group::ViewGroup;
pub use pool::{BufferPool, PoolConfig, PoolStats, PooledBlock, SharedBufferPool};
pub use sequence::{ByteSeq, ByteSequence};
pub use view::View;

/// Commonly used imports.
pub mod prelude {
    pub use crate::block::RawBlock;
    pub use crate::collator::Collator;
    pub use crate::error::{BufferError, Result};
    pub use crate::group::ViewGroup;
    pub use crate::pool::{BufferPool, PoolConfig, PoolStats, PooledBlock, SharedBufferPool};
    pub use crate::sequence::{ByteSeq, ByteSequence};
    pub use crate::view::View;
}
