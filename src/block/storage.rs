// src/block/storage.rs
//! Raw, reference-counted backing memory for blocks.
//!
//! A [`BlockStorage`] is a fixed-size heap allocation shared (through `Arc`)
//! between the [`RawBlock`](super::RawBlock) that fills it and every
//! [`View`](crate::View) that reads it.
//!
//! # Aliasing discipline
//!
//! The storage itself never tracks which bytes are filled. Its owner enforces:
//!
//! - Views only ever cover bytes below the block's write position at the time
//!   the view was created.
//! - The block only writes at or beyond its write position, and the write
//!   position never moves backwards while the storage is shared.
//! - Whole-storage mutable access ([`BlockStorage::as_mut_slice`]) requires
//!   `&mut self`, which `Arc::get_mut` only hands out when no view is alive.
//!
//! Shared reads and the tail writes therefore never overlap.

use std::fmt;
use std::ptr::NonNull;

pub(crate) struct BlockStorage {
    ptr: NonNull<u8>,
    capacity: usize,
}

// SAFETY: the storage is a plain heap allocation of bytes. Reads through `&self`
// are restricted to filled regions and writes to the unfilled tail, which is
// only reachable through the single owning `RawBlock` (see module docs).
unsafe impl Send for BlockStorage {}
unsafe impl Sync for BlockStorage {}

impl BlockStorage {
    /// Allocates zero-filled storage of `capacity` bytes.
    pub(crate) fn zeroed(capacity: usize) -> Self {
        Self::from_vec(vec![0; capacity])
    }

    /// Takes ownership of `data` as block storage without copying.
    pub(crate) fn from_vec(data: Vec<u8>) -> Self {
        let boxed = data.into_boxed_slice();
        let capacity = boxed.len();
        let ptr = NonNull::from(Box::leak(boxed)).cast::<u8>();
        Self { ptr, capacity }
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `len` bytes starting at `offset`.
    ///
    /// # Safety
    ///
    /// `offset + len <= capacity`, and the range must not be written for the
    /// lifetime of the returned slice.
    #[inline]
    pub(crate) unsafe fn slice(&self, offset: usize, len: usize) -> &[u8] {
        debug_assert!(offset + len <= self.capacity);
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr().add(offset), len) }
    }

    /// Returns the tail `[offset, capacity)` for writing.
    ///
    /// # Safety
    ///
    /// `offset <= capacity`, the caller is the single writer, and no shared
    /// slice of the tail is alive for the lifetime of the returned slice.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn tail_mut(&self, offset: usize) -> &mut [u8] {
        debug_assert!(offset <= self.capacity);
        unsafe {
            std::slice::from_raw_parts_mut(self.ptr.as_ptr().add(offset), self.capacity - offset)
        }
    }

    /// Whole-storage mutable access; exclusive by construction.
    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: `&mut self` guarantees no other reference to the storage exists.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.capacity) }
    }
}

impl Drop for BlockStorage {
    fn drop(&mut self) {
        // SAFETY: `ptr`/`capacity` came from `Box::leak` of a `Box<[u8]>` in `from_vec`.
        unsafe {
            drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr(),
                self.capacity,
            )));
        }
    }
}

impl fmt::Debug for BlockStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockStorage")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}
