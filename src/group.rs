// src/group.rs
//! Ordered composition of views presented as one logical byte sequence.

use crate::collator::Collator;
use crate::error::{BufferError, Result};
use crate::search;
use crate::sequence::{ByteSeq, ByteSequence, clamp_range, eq_seq, impl_eq_bytes};
use crate::view::View;
use std::io::{IoSlice, Write};
use std::ops::{Add, RangeBounds};

/// A non-empty, ordered list of views behaving as one byte sequence.
///
/// Absolute offsets map onto (member, local offset) pairs by a linear prefix
/// scan over the members. Empty members are kept as given.
///
/// # Examples
///
/// ```
/// use zerobuf::prelude::*;
/// # use zerobuf::BufferError;
///
/// let group = ViewGroup::new(vec![View::from_bytes(b"hello "), View::from_bytes(b"world")])?;
/// assert_eq!(group.len(), 11);
/// assert_eq!(group.get(6)?, b'w');
/// assert_eq!(group.slice(4..8)?, b"o wo");
/// assert_eq!(group.find(b"w")?, Some(6));
/// # Ok::<(), BufferError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ViewGroup {
    views: Vec<View>,
    len: usize,
}

impl ViewGroup {
    /// Groups `views` in order.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::EmptyGroup`] if `views` is empty.
    pub fn new(views: Vec<View>) -> Result<Self> {
        if views.is_empty() {
            return Err(BufferError::EmptyGroup);
        }
        let len = views.iter().map(View::len).sum();
        Ok(Self { views, len })
    }

    pub(crate) fn pair(first: View, second: View) -> Self {
        let len = first.len() + second.len();
        Self {
            views: vec![first, second],
            len,
        }
    }

    /// The member views, in order.
    #[inline]
    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Consumes the group, returning its members.
    pub fn into_views(self) -> Vec<View> {
        self.views
    }

    /// Total number of bytes across all members.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if every member is empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over all bytes, member by member.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.views.iter().flat_map(View::iter)
    }

    /// Offset of the first occurrence of `needle`.
    ///
    /// Single-byte needles are found across member boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Unsupported`] for a multi-byte needle when the
    /// group has more than one member; [`collate`](Self::collate) first to
    /// search across boundaries.
    pub fn find(&self, needle: &[u8]) -> Result<Option<usize>> {
        match needle {
            [] => Ok(Some(0)),
            &[byte] => Ok(self.find_byte_from(byte, 0)),
            _ => match self.as_contiguous() {
                Some(bytes) => Ok(search::find(bytes, needle)),
                None => Err(BufferError::Unsupported("multi-byte search across view group members")),
            },
        }
    }

    /// Offset of the last occurrence of `needle`; see [`find`](Self::find).
    pub fn rfind(&self, needle: &[u8]) -> Result<Option<usize>> {
        match needle {
            [] => Ok(Some(0)),
            &[byte] => Ok(self.rfind_byte_before(byte, self.len)),
            _ => match self.as_contiguous() {
                Some(bytes) => Ok(search::rfind(bytes, needle)),
                None => Err(BufferError::Unsupported("multi-byte search across view group members")),
            },
        }
    }

    /// Like [`find`](Self::find), restricted to `range`.
    ///
    /// Bounds behave as in [`View::find_in`]: the end is clamped to the
    /// group's length, a reversed range finds nothing, and offsets are
    /// relative to the whole group. A multi-byte needle is searchable when
    /// the range lies within one member.
    ///
    /// # Examples
    ///
    /// ```
    /// use zerobuf::prelude::*;
    /// # use zerobuf::BufferError;
    ///
    /// let group = ViewGroup::new(vec![View::from_bytes(b"abcab"), View::from_bytes(b"cabc")])?;
    /// assert_eq!(group.find_in(b"c", 3..)?, Some(5));
    /// assert_eq!(group.find_in(b"ab", 1..5)?, Some(3));
    /// assert!(group.find_in(b"ab", 1..).is_err());
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn find_in(&self, needle: &[u8], range: impl RangeBounds<usize>) -> Result<Option<usize>> {
        match clamp_range(&range, self.len) {
            Some((start, stop)) => Ok(self.subsequence(start, stop).find(needle)?.map(|at| start + at)),
            None => Ok(None),
        }
    }

    /// Like [`rfind`](Self::rfind), restricted to `range`; bounds behave as in
    /// [`find_in`](Self::find_in).
    pub fn rfind_in(&self, needle: &[u8], range: impl RangeBounds<usize>) -> Result<Option<usize>> {
        match clamp_range(&range, self.len) {
            Some((start, stop)) => Ok(self.subsequence(start, stop).rfind(needle)?.map(|at| start + at)),
            None => Ok(None),
        }
    }

    /// Like [`find`](Self::find), but a missing needle is an error.
    ///
    /// # Errors
    ///
    /// [`BufferError::NotFound`] if `needle` does not occur, or the errors of [`find`](Self::find).
    pub fn index(&self, needle: &[u8]) -> Result<usize> {
        self.find(needle)?.ok_or(BufferError::NotFound)
    }

    /// Like [`rfind`](Self::rfind), but a missing needle is an error.
    ///
    /// # Errors
    ///
    /// [`BufferError::NotFound`] if `needle` does not occur, or the errors of [`rfind`](Self::rfind).
    pub fn rindex(&self, needle: &[u8]) -> Result<usize> {
        self.rfind(needle)?.ok_or(BufferError::NotFound)
    }

    /// Copies the members into one contiguous view.
    ///
    /// Runs of byte-adjacent members are merged first, so a group whose
    /// members are all adjacent collates without copying.
    pub fn collate(&self) -> View {
        let mut collator = Collator::new();
        collator.extend(self.views.iter().cloned());
        collator.collapse()
    }

    /// Writes every member to `sink` with one vectored write.
    ///
    /// Returns the number of bytes the sink accepted; a short write is not
    /// an error and nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Io`] carrying the platform error code if the write fails.
    pub fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> Result<usize> {
        let slices: Vec<IoSlice<'_>> = self.views.iter().map(|v| IoSlice::new(v.as_slice())).collect();
        Ok(sink.write_vectored(&slices)?)
    }

    fn subgroup(&self, start: usize, stop: usize) -> ByteSeq {
        let mut base = 0;
        let mut first = None;
        for (i, view) in self.views.iter().enumerate() {
            let end = base + view.len();
            if first.is_none() && start < end {
                first = Some((i, base));
            }
            match first {
                Some((head, _)) if head == i && stop <= end => {
                    return ByteSeq::Simple(view.subsequence(start - base, stop - base));
                }
                Some((head, head_base)) if stop <= end => {
                    let mut views = Vec::with_capacity(i - head + 1);
                    views.push(self.views[head].subsequence(start - head_base, self.views[head].len()));
                    views.extend(self.views[head + 1..i].iter().cloned());
                    views.push(view.subsequence(0, stop - base));
                    return ByteSeq::Composed(ViewGroup {
                        views,
                        len: stop - start,
                    });
                }
                _ => {}
            }
            base = end;
        }
        unreachable!("bounds checked by subsequence")
    }
}

impl ByteSequence for ViewGroup {
    type Slice = ByteSeq;

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn chunk_count(&self) -> usize {
        self.views.len()
    }

    #[inline]
    fn chunk(&self, index: usize) -> &[u8] {
        self.views[index].as_slice()
    }

    /// Contiguous when at most one member holds any bytes.
    fn as_contiguous(&self) -> Option<&[u8]> {
        let mut filled = self.views.iter().filter(|v| !v.is_empty());
        match (filled.next(), filled.next()) {
            (None, _) => Some(&[]),
            (Some(only), None) => Some(only.as_slice()),
            _ => None,
        }
    }

    /// Slices within one member come back as that member's sub-view; slices
    /// spanning members come back as a group whose end members are trimmed
    /// and whose interior members are shared unchanged.
    fn subsequence(&self, start: usize, stop: usize) -> ByteSeq {
        assert!(
            start <= stop && stop <= self.len,
            "slice {}..{} out of range for group of length {}",
            start,
            stop,
            self.len
        );
        if start == stop {
            let mut base = 0;
            for view in &self.views {
                if start <= base + view.len() {
                    return ByteSeq::Simple(view.subsequence(start - base, start - base));
                }
                base += view.len();
            }
        }
        self.subgroup(start, stop)
    }
}

impl Add for ViewGroup {
    type Output = ViewGroup;

    /// Appends the members of `other`.
    fn add(mut self, other: ViewGroup) -> ViewGroup {
        self.views.extend(other.views);
        self.len += other.len;
        self
    }
}

impl PartialEq for ViewGroup {
    fn eq(&self, other: &ViewGroup) -> bool {
        eq_seq(self, other)
    }
}

impl Eq for ViewGroup {}

impl PartialEq<View> for ViewGroup {
    fn eq(&self, other: &View) -> bool {
        eq_seq(self, other)
    }
}

impl PartialEq<ViewGroup> for View {
    fn eq(&self, other: &ViewGroup) -> bool {
        eq_seq(other, self)
    }
}

impl_eq_bytes!(ViewGroup);
