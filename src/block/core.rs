// src/block/core.rs
//! Core block structure and basic operations
//!
//! This module provides the fundamental [`RawBlock`] type: a fixed-capacity
//! byte array with a write cursor, handed out by a
//! [`BufferPool`](crate::BufferPool) or allocated directly.

use super::storage::BlockStorage;
use crate::error::Result;
use crate::view::View;
use std::fmt;
use std::ops::RangeBounds;
use std::sync::Arc;
use zeroize::Zeroize;

/// Maximum block size (1GB)
pub const BLOCK_MAX_SIZE: usize = 1_000_000_000;

/// A fixed-capacity byte array with a write cursor.
///
/// Bytes in `[0, writepos)` are filled and can be exposed as [`View`]s;
/// bytes in `[writepos, capacity)` are free and only reachable through the
/// append-style writers ([`read_from`](Self::read_from) and
/// [`append_bytes`](Self::append_bytes)).
///
/// Views share ownership of the block's memory, so the memory outlives the
/// block itself if views are still around when it is dropped or released.
///
/// # Examples
///
/// ```
/// use zerobuf::RawBlock;
/// # use zerobuf::BufferError;
///
/// let mut block = RawBlock::new(16);
/// block.append_bytes(b"hello world!!!")?;
/// let view = block.view(..)?;
/// assert_eq!(view.find(b"world"), Some(6));
/// # Ok::<(), BufferError>(())
/// ```
pub struct RawBlock {
    pub(crate) storage: Arc<BlockStorage>,
    pub(crate) writepos: usize,
}

impl RawBlock {
    /// Creates a new, empty block with zeroed memory.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds [`BLOCK_MAX_SIZE`] (1GB).
    ///
    /// # Examples
    ///
    /// ```
    /// use zerobuf::RawBlock;
    ///
    /// let block = RawBlock::new(8192);
    /// assert_eq!(block.capacity(), 8192);
    /// assert_eq!(block.writepos(), 0);
    /// ```
    #[inline]
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity <= BLOCK_MAX_SIZE,
            "Block size {} exceeds maximum {}",
            capacity,
            BLOCK_MAX_SIZE
        );
        Self {
            storage: Arc::new(BlockStorage::zeroed(capacity)),
            writepos: 0,
        }
    }

    /// Creates a completely filled block that takes ownership of `data`.
    ///
    /// # Examples
    ///
    /// ```
    /// use zerobuf::RawBlock;
    ///
    /// let block = RawBlock::from_vec(vec![1, 2, 3]);
    /// assert_eq!(block.writepos(), 3);
    /// assert_eq!(block.free(), 0);
    /// ```
    pub fn from_vec(data: Vec<u8>) -> Self {
        let writepos = data.len();
        Self {
            storage: Arc::new(BlockStorage::from_vec(data)),
            writepos,
        }
    }

    /// Creates a completely filled block holding a copy of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::from_vec(data.to_vec())
    }

    /// Returns the total capacity of the block.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Returns the number of filled bytes.
    #[inline(always)]
    pub fn writepos(&self) -> usize {
        self.writepos
    }

    /// Returns the number of bytes still available for writing.
    ///
    /// # Examples
    ///
    /// ```
    /// use zerobuf::RawBlock;
    /// # use zerobuf::BufferError;
    ///
    /// let mut block = RawBlock::new(16);
    /// block.append_bytes(b"abc")?;
    /// assert_eq!(block.free(), 13);
    /// # Ok::<(), BufferError>(())
    /// ```
    #[inline(always)]
    pub fn free(&self) -> usize {
        self.capacity() - self.writepos
    }

    /// Returns `true` if no byte has been written yet.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.writepos == 0
    }

    /// Returns `true` if there is no free space left.
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.free() == 0
    }

    /// Returns `true` if at least one view still references this block's memory.
    #[inline]
    pub fn is_shared(&self) -> bool {
        Arc::strong_count(&self.storage) > 1
    }

    /// Returns the filled bytes.
    #[inline]
    pub fn filled(&self) -> &[u8] {
        // SAFETY: `[0, writepos)` is never written again while `self` is borrowed.
        unsafe { self.storage.slice(0, self.writepos) }
    }

    /// Returns a view over `range` of the filled region.
    ///
    /// The view shares this block's memory; no bytes are copied.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Range`](crate::BufferError::Range) if the range
    /// is reversed or extends past the write position.
    ///
    /// # Examples
    ///
    /// ```
    /// use zerobuf::{BufferError, RawBlock};
    ///
    /// let mut block = RawBlock::new(16);
    /// block.append_bytes(b"abc123")?;
    /// assert_eq!(block.view(3..)?, b"123");
    /// assert!(matches!(block.view(3..2), Err(BufferError::Range { .. })));
    /// assert!(block.view(0..11).is_err());
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn view(&self, range: impl RangeBounds<usize>) -> Result<View> {
        let (start, stop) = crate::sequence::resolve_range(&range, self.writepos)?;
        Ok(View::new(Arc::clone(&self.storage), start, stop - start))
    }

    /// Returns a view over the whole filled region.
    #[inline]
    pub fn view_all(&self) -> View {
        View::new(Arc::clone(&self.storage), 0, self.writepos)
    }

    /// Resets the write position to zero so the block can be refilled.
    ///
    /// Only succeeds while no view references the block; returns `false`
    /// (leaving the block untouched) otherwise, because refilling would
    /// overwrite bytes those views observe.
    pub fn reset(&mut self) -> bool {
        if Arc::get_mut(&mut self.storage).is_none() {
            return false;
        }
        self.writepos = 0;
        true
    }

    /// Securely zeros the block's memory and resets the write position.
    ///
    /// Uses compiler-resistant zeroing via the [`zeroize`] crate. Like
    /// [`reset`](Self::reset), this returns `false` and does nothing while
    /// views are outstanding.
    pub fn burn(&mut self) -> bool {
        match Arc::get_mut(&mut self.storage) {
            Some(storage) => {
                storage.as_mut_slice().zeroize();
                self.writepos = 0;
                true
            }
            None => false,
        }
    }
}

impl AsRef<[u8]> for RawBlock {
    fn as_ref(&self) -> &[u8] {
        self.filled()
    }
}

impl fmt::Debug for RawBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBlock")
            .field("data", &self.filled())
            .field("capacity", &self.capacity())
            .field("free", &self.free())
            .finish()
    }
}
