// src/sequence/mod.rs
//! The byte-sequence interface shared by views, view groups and [`ByteSeq`].
//!
//! A [`ByteSequence`] exposes itself as an ordered list of contiguous chunks.
//! A [`View`](crate::View) is one chunk; a [`ViewGroup`](crate::ViewGroup) is
//! one chunk per member. Everything built on top of that (cursors, strip,
//! split, splitlines, classification) works the same for both.

pub mod byte_seq;
pub mod cursor;
pub mod split;

pub use byte_seq::ByteSeq;
pub use cursor::{Backward, Forward};
pub use split::{Split, SplitLines};

use crate::error::{BufferError, Result};
use std::ops::{Bound, RangeBounds};

/// ASCII whitespace as understood by [`ByteSequence::is_space`]: space or `\t \n \x0b \x0c \r`.
#[inline(always)]
pub fn is_space_byte(byte: u8) -> bool {
    byte == b' ' || (9..=13).contains(&byte)
}

/// Resolves `range` against `len`, rejecting reversed or out-of-range bounds.
pub(crate) fn resolve_range(range: &impl RangeBounds<usize>, len: usize) -> Result<(usize, usize)> {
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let stop = match range.end_bound() {
        Bound::Included(&e) => e.saturating_add(1),
        Bound::Excluded(&e) => e,
        Bound::Unbounded => len,
    };
    if start > stop || stop > len {
        return Err(BufferError::Range { start, stop, len });
    }
    Ok((start, stop))
}

/// Resolves search bounds the lenient way: `stop` is clamped to `len`, and
/// `None` is returned when the clamped range is reversed.
pub(crate) fn clamp_range(range: &impl RangeBounds<usize>, len: usize) -> Option<(usize, usize)> {
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let stop = match range.end_bound() {
        Bound::Included(&e) => e.saturating_add(1),
        Bound::Excluded(&e) => e,
        Bound::Unbounded => len,
    }
    .min(len);
    (start <= stop).then_some((start, stop))
}

/// Wraps a possibly negative index into `[0, len)`.
pub(crate) fn normalize_index(index: isize, len: usize) -> Result<usize> {
    let wrapped = if index < 0 {
        len.checked_sub(index.unsigned_abs())
    } else {
        Some(index.unsigned_abs())
    };
    match wrapped {
        Some(i) if i < len => Ok(i),
        _ => Err(BufferError::Index { index, len }),
    }
}

/// Byte-wise equality of a chunked sequence with a contiguous slice.
pub(crate) fn eq_bytes<S: ByteSequence + ?Sized>(seq: &S, bytes: &[u8]) -> bool {
    if seq.len() != bytes.len() {
        return false;
    }
    let mut rest = bytes;
    for i in 0..seq.chunk_count() {
        let chunk = seq.chunk(i);
        let (head, tail) = rest.split_at(chunk.len());
        if head != chunk {
            return false;
        }
        rest = tail;
    }
    true
}

/// Byte-wise equality of two chunked sequences.
pub(crate) fn eq_seq<A, B>(a: &A, b: &B) -> bool
where
    A: ByteSequence + ?Sized,
    B: ByteSequence + ?Sized,
{
    match b.as_contiguous() {
        Some(bytes) => eq_bytes(a, bytes),
        None => a.len() == b.len() && Iterator::eq(Forward::new(a), Forward::new(b)),
    }
}

/// Implements equality against byte slices, arrays and vectors for a
/// [`ByteSequence`] type.
macro_rules! impl_eq_bytes {
    ($ty:ty) => {
        impl PartialEq<[u8]> for $ty {
            fn eq(&self, other: &[u8]) -> bool {
                $crate::sequence::eq_bytes(self, other)
            }
        }

        impl PartialEq<&[u8]> for $ty {
            fn eq(&self, other: &&[u8]) -> bool {
                $crate::sequence::eq_bytes(self, other)
            }
        }

        impl<const N: usize> PartialEq<[u8; N]> for $ty {
            fn eq(&self, other: &[u8; N]) -> bool {
                $crate::sequence::eq_bytes(self, other)
            }
        }

        impl<const N: usize> PartialEq<&[u8; N]> for $ty {
            fn eq(&self, other: &&[u8; N]) -> bool {
                $crate::sequence::eq_bytes(self, *other)
            }
        }

        impl PartialEq<Vec<u8>> for $ty {
            fn eq(&self, other: &Vec<u8>) -> bool {
                $crate::sequence::eq_bytes(self, other)
            }
        }

        impl PartialEq<$ty> for [u8] {
            fn eq(&self, other: &$ty) -> bool {
                $crate::sequence::eq_bytes(other, self)
            }
        }

        impl PartialEq<$ty> for &[u8] {
            fn eq(&self, other: &$ty) -> bool {
                $crate::sequence::eq_bytes(other, self)
            }
        }

        impl PartialEq<$ty> for Vec<u8> {
            fn eq(&self, other: &$ty) -> bool {
                $crate::sequence::eq_bytes(other, self)
            }
        }
    };
}

pub(crate) use impl_eq_bytes;

/// A logical byte sequence made of one or more contiguous chunks.
///
/// Implementors only provide the chunk layout and a way to cut a
/// sub-sequence; slicing, cursors, classification, strip, split and
/// splitlines come for free.
///
/// # Examples
///
/// ```
/// use zerobuf::prelude::*;
/// # use zerobuf::BufferError;
///
/// let mut left = RawBlock::new(8);
/// left.append_bytes(b"  ab")?;
/// let mut right = RawBlock::new(8);
/// right.append_bytes(b"cd  ")?;
///
/// let group = left.view_all() + right.view_all();
/// assert_eq!(group.strip(), b"abcd");
/// assert_eq!(group.slice(3..5)?, b"bc");
/// # Ok::<(), BufferError>(())
/// ```
pub trait ByteSequence {
    /// The type produced by slicing this sequence.
    type Slice;

    /// Total number of bytes.
    fn len(&self) -> usize;

    /// Number of contiguous chunks.
    fn chunk_count(&self) -> usize;

    /// The bytes of chunk `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.chunk_count()`.
    fn chunk(&self, index: usize) -> &[u8];

    /// The bytes in `[start, stop)`, without copying.
    ///
    /// # Panics
    ///
    /// Panics unless `start <= stop <= self.len()`; use [`slice`](Self::slice)
    /// for checked slicing.
    fn subsequence(&self, start: usize, stop: usize) -> Self::Slice;

    /// Returns `true` if the sequence holds no bytes.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The whole sequence as one slice, when it is laid out contiguously.
    fn as_contiguous(&self) -> Option<&[u8]> {
        match self.chunk_count() {
            0 => Some(&[]),
            1 => Some(self.chunk(0)),
            _ => None,
        }
    }

    /// The bytes in `range`, without copying.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Range`] if the range is reversed or extends past the end.
    fn slice(&self, range: impl RangeBounds<usize>) -> Result<Self::Slice>
    where
        Self: Sized,
    {
        let (start, stop) = resolve_range(&range, self.len())?;
        Ok(self.subsequence(start, stop))
    }

    /// The byte at `index`, if any.
    fn byte_at(&self, index: usize) -> Option<u8> {
        let mut index = index;
        for i in 0..self.chunk_count() {
            let chunk = self.chunk(i);
            if index < chunk.len() {
                return Some(chunk[index]);
            }
            index -= chunk.len();
        }
        None
    }

    /// The byte at `index`; negative indices count from the end.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Index`] if the index is out of range after wrapping.
    fn get(&self, index: isize) -> Result<u8> {
        let len = self.len();
        let i = normalize_index(index, len)?;
        self.byte_at(i).ok_or(BufferError::Index { index, len })
    }

    /// Absolute offset of the first `byte` at or after `from`.
    fn find_byte_from(&self, byte: u8, from: usize) -> Option<usize> {
        let mut base = 0;
        for i in 0..self.chunk_count() {
            let chunk = self.chunk(i);
            let end = base + chunk.len();
            if from < end {
                let local = from.saturating_sub(base);
                if let Some(hit) = memchr::memchr(byte, &chunk[local..]) {
                    return Some(base + local + hit);
                }
            }
            base = end;
        }
        None
    }

    /// Absolute offset of the first byte at or after `from` that is `a` or `b`.
    fn find_either_from(&self, a: u8, b: u8, from: usize) -> Option<usize> {
        let mut base = 0;
        for i in 0..self.chunk_count() {
            let chunk = self.chunk(i);
            let end = base + chunk.len();
            if from < end {
                let local = from.saturating_sub(base);
                if let Some(hit) = memchr::memchr2(a, b, &chunk[local..]) {
                    return Some(base + local + hit);
                }
            }
            base = end;
        }
        None
    }

    /// Absolute offset of the last `byte` strictly before `stop`.
    fn rfind_byte_before(&self, byte: u8, stop: usize) -> Option<usize> {
        let mut end = self.len();
        for i in (0..self.chunk_count()).rev() {
            let chunk = self.chunk(i);
            let base = end - chunk.len();
            if stop > base {
                let local = (stop - base).min(chunk.len());
                if let Some(hit) = memchr::memrchr(byte, &chunk[..local]) {
                    return Some(base + hit);
                }
            }
            end = base;
        }
        None
    }

    /// `false` for an empty sequence; otherwise whether every byte satisfies `pred`.
    fn all_bytes(&self, pred: impl Fn(u8) -> bool) -> bool
    where
        Self: Sized,
    {
        !self.is_empty() && (0..self.chunk_count()).all(|i| self.chunk(i).iter().all(|&b| pred(b)))
    }

    /// Every byte is ASCII whitespace (space, or 9 through 13).
    fn is_space(&self) -> bool
    where
        Self: Sized,
    {
        self.all_bytes(is_space_byte)
    }

    /// Every byte is an ASCII digit.
    fn is_digit(&self) -> bool
    where
        Self: Sized,
    {
        self.all_bytes(|b| b.is_ascii_digit())
    }

    /// Every byte is an ASCII letter.
    fn is_alpha(&self) -> bool
    where
        Self: Sized,
    {
        self.all_bytes(|b| b.is_ascii_alphabetic())
    }

    /// Copies the sequence into a new `Vec`.
    fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        for i in 0..self.chunk_count() {
            out.extend_from_slice(self.chunk(i));
        }
        out
    }

    /// A cursor walking the sequence front to back.
    fn cursor(&self) -> Forward<'_, Self>
    where
        Self: Sized,
    {
        Forward::new(self)
    }

    /// A cursor walking the sequence back to front.
    fn cursor_back(&self) -> Backward<'_, Self>
    where
        Self: Sized,
    {
        Backward::new(self)
    }

    /// Trims ASCII whitespace from both ends.
    fn strip(&self) -> Self::Slice
    where
        Self: Sized,
    {
        let (start, stop) = cursor::strip_bounds(self, is_space_byte, true, true);
        self.subsequence(start, stop)
    }

    /// Trims leading ASCII whitespace.
    fn lstrip(&self) -> Self::Slice
    where
        Self: Sized,
    {
        let (start, stop) = cursor::strip_bounds(self, is_space_byte, true, false);
        self.subsequence(start, stop)
    }

    /// Trims trailing ASCII whitespace.
    fn rstrip(&self) -> Self::Slice
    where
        Self: Sized,
    {
        let (start, stop) = cursor::strip_bounds(self, is_space_byte, false, true);
        self.subsequence(start, stop)
    }

    /// Trims bytes that are members of `set` from both ends.
    fn strip_set(&self, set: impl AsRef<[u8]>) -> Self::Slice
    where
        Self: Sized,
    {
        let set = set.as_ref();
        let (start, stop) = cursor::strip_bounds(self, |b| set.contains(&b), true, true);
        self.subsequence(start, stop)
    }

    /// Trims leading bytes that are members of `set`.
    fn lstrip_set(&self, set: impl AsRef<[u8]>) -> Self::Slice
    where
        Self: Sized,
    {
        let set = set.as_ref();
        let (start, stop) = cursor::strip_bounds(self, |b| set.contains(&b), true, false);
        self.subsequence(start, stop)
    }

    /// Trims trailing bytes that are members of `set`.
    fn rstrip_set(&self, set: impl AsRef<[u8]>) -> Self::Slice
    where
        Self: Sized,
    {
        let set = set.as_ref();
        let (start, stop) = cursor::strip_bounds(self, |b| set.contains(&b), false, true);
        self.subsequence(start, stop)
    }

    /// Lazily splits on every occurrence of `separator`.
    ///
    /// # Errors
    ///
    /// - [`BufferError::EmptySeparator`] if `separator` is empty.
    /// - [`BufferError::Unsupported`] for a multi-byte separator over a
    ///   non-contiguous sequence.
    fn split<'s>(&self, separator: &'s [u8]) -> Result<Split<'s, Self>>
    where
        Self: Sized + Clone,
    {
        Split::new(self.clone(), separator, None)
    }

    /// Like [`split`](Self::split), but stops after `max_splits` splits and
    /// yields the rest, separators included, as the final piece.
    fn split_n<'s>(&self, separator: &'s [u8], max_splits: usize) -> Result<Split<'s, Self>>
    where
        Self: Sized + Clone,
    {
        Split::new(self.clone(), separator, Some(max_splits))
    }

    /// Lazily splits into lines ending in `\n`, `\r` or `\r\n`.
    fn splitlines(&self, keep_ends: bool) -> SplitLines<Self>
    where
        Self: Sized + Clone,
    {
        SplitLines::new(self.clone(), keep_ends)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_space_byte() {
        for b in [b' ', b'\t', b'\n', 0x0b, 0x0c, b'\r'] {
            assert!(is_space_byte(b));
        }
        assert!(!is_space_byte(b'a'));
        assert!(!is_space_byte(0));
    }

    #[test]
    fn test_resolve_range() {
        assert_eq!(resolve_range(&(..), 6).unwrap(), (0, 6));
        assert_eq!(resolve_range(&(2..=3), 6).unwrap(), (2, 4));
        assert_eq!(resolve_range(&(6..), 6).unwrap(), (6, 6));
        assert!(resolve_range(&(3..2), 6).is_err());
        assert!(resolve_range(&(0..7), 6).is_err());
        assert!(resolve_range(&(7..), 6).is_err());
    }

    #[test]
    fn test_clamp_range() {
        assert_eq!(clamp_range(&(0..20), 13), Some((0, 13)));
        assert_eq!(clamp_range(&(3..2), 13), None);
        assert_eq!(clamp_range(&(10..), 3), None);
        assert_eq!(clamp_range(&(3..), 3), Some((3, 3)));
    }

    #[test]
    fn test_normalize_index() {
        assert_eq!(normalize_index(0, 6).unwrap(), 0);
        assert_eq!(normalize_index(-1, 6).unwrap(), 5);
        assert_eq!(normalize_index(-6, 6).unwrap(), 0);
        assert!(normalize_index(6, 6).is_err());
        assert!(normalize_index(-7, 6).is_err());
        assert!(normalize_index(0, 0).is_err());
    }
}
