// src/view/core.rs
//! Core view structure: construction, access, equality and hashing.
//!
//! A [`View`] is an immutable window `[offset, offset + len)` over the filled
//! region of a block. It holds a reference-counted handle to the block's
//! memory, so the bytes it observes stay alive (and unchanged) for as long as
//! the view exists, even after the block itself is dropped or recycled.

use crate::block::RawBlock;
use crate::block::storage::BlockStorage;
use crate::sequence::{ByteSequence, impl_eq_bytes};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;
use std::sync::Arc;

/// An immutable, zero-copy window over a block's filled bytes.
///
/// Cloning a view and slicing it are O(1) and never copy bytes.
///
/// # Examples
///
/// ```
/// use zerobuf::prelude::*;
/// # use zerobuf::BufferError;
///
/// let mut block = RawBlock::new(16);
/// block.append_bytes(b"hello world!!!")?;
///
/// let view = block.view_all();
/// assert_eq!(view.slice(6..11)?, b"world");
/// assert_eq!(view.get(-1)?, b'!');
/// assert_eq!(view.strip_set("!"), b"hello world");
/// # Ok::<(), BufferError>(())
/// ```
#[derive(Clone)]
pub struct View {
    pub(crate) storage: Arc<BlockStorage>,
    pub(crate) offset: usize,
    pub(crate) len: usize,
}

impl View {
    /// Creates a view over `[offset, offset + len)` of `storage`.
    ///
    /// Callers must only pass bytes below the owning block's write position.
    #[inline]
    pub(crate) fn new(storage: Arc<BlockStorage>, offset: usize, len: usize) -> Self {
        debug_assert!(offset + len <= storage.capacity());
        Self { storage, offset, len }
    }

    /// A view over zero bytes.
    pub fn empty() -> Self {
        Self::new(Arc::new(BlockStorage::zeroed(0)), 0, 0)
    }

    /// A view over a private copy of `data`.
    ///
    /// # Examples
    ///
    /// ```
    /// use zerobuf::View;
    ///
    /// let view = View::from_bytes(b"abc");
    /// assert_eq!(view.len(), 3);
    /// assert_eq!(view, b"abc");
    /// ```
    pub fn from_bytes(data: &[u8]) -> Self {
        RawBlock::from_bytes(data).view_all()
    }

    /// Returns the viewed bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: the range lies below the block's write position when the view
        // was created, and filled bytes are never written again while shared.
        unsafe { self.storage.slice(self.offset, self.len) }
    }

    /// Number of bytes in the view.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the view covers no bytes.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over the bytes by value.
    #[inline]
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, u8>> {
        self.as_slice().iter().copied()
    }

    /// Returns `true` if `next` starts exactly where `self` ends, in the same block.
    ///
    /// # Examples
    ///
    /// ```
    /// use zerobuf::RawBlock;
    /// # use zerobuf::BufferError;
    ///
    /// let block = RawBlock::from_vec(b"abcdef".to_vec());
    /// let (left, right) = (block.view(..3)?, block.view(3..)?);
    /// assert!(left.is_adjacent(&right));
    /// assert!(!right.is_adjacent(&left));
    /// # Ok::<(), BufferError>(())
    /// ```
    #[inline]
    pub fn is_adjacent(&self, next: &View) -> bool {
        Arc::ptr_eq(&self.storage, &next.storage) && self.offset + self.len == next.offset
    }

    /// Returns `true` if both views share one block's memory.
    #[inline]
    pub fn same_block(&self, other: &View) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }
}

impl ByteSequence for View {
    type Slice = View;

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn chunk_count(&self) -> usize {
        1
    }

    #[inline]
    fn chunk(&self, index: usize) -> &[u8] {
        assert!(index == 0, "chunk index {} out of range for a view", index);
        self.as_slice()
    }

    fn subsequence(&self, start: usize, stop: usize) -> View {
        assert!(
            start <= stop && stop <= self.len,
            "slice {}..{} out of range for view of length {}",
            start,
            stop,
            self.len
        );
        View::new(Arc::clone(&self.storage), self.offset + start, stop - start)
    }

    #[inline]
    fn as_contiguous(&self) -> Option<&[u8]> {
        Some(self.as_slice())
    }

    #[inline]
    fn byte_at(&self, index: usize) -> Option<u8> {
        self.as_slice().get(index).copied()
    }

    fn to_vec(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }
}

impl Default for View {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<u8>> for View {
    fn from(data: Vec<u8>) -> Self {
        RawBlock::from_vec(data).view_all()
    }
}

impl From<&[u8]> for View {
    fn from(data: &[u8]) -> Self {
        Self::from_bytes(data)
    }
}

impl AsRef<[u8]> for View {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl Index<usize> for View {
    type Output = u8;

    /// Panics if `index >= len()`; see [`ByteSequence::get`] for a checked,
    /// wrapping alternative.
    #[inline]
    fn index(&self, index: usize) -> &u8 {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a View {
    type Item = u8;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for View {
    #[inline]
    fn eq(&self, other: &View) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for View {}

impl_eq_bytes!(View);

impl Hash for View {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View").field("data", &self.as_slice()).finish()
    }
}
