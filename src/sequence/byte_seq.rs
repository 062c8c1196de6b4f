// src/sequence/byte_seq.rs
//! A byte sequence that is either one view or a group of views.

use super::{ByteSequence, eq_seq, impl_eq_bytes};
use crate::error::{BufferError, Result};
use crate::group::ViewGroup;
use crate::view::View;
use std::io::Write;

/// Either a single contiguous [`View`] or a [`ViewGroup`].
///
/// This is what slicing a group, concatenating views and most group
/// operations return: the simple form whenever the bytes are contiguous,
/// the composed form otherwise.
///
/// # Examples
///
/// ```
/// use zerobuf::prelude::*;
/// # use zerobuf::BufferError;
///
/// let seq = View::from_bytes(b"key") + View::from_bytes(b"=value");
/// assert!(!seq.is_simple());
/// assert_eq!(seq.find(b"=")?, Some(3));
/// assert_eq!(seq.slice(..3)?, b"key");
/// assert_eq!(seq.to_view(), b"key=value");
/// # Ok::<(), BufferError>(())
/// ```
#[derive(Debug, Clone)]
pub enum ByteSeq {
    /// One contiguous view.
    Simple(View),
    /// Several views in order.
    Composed(ViewGroup),
}

impl ByteSeq {
    /// Returns `true` for the [`Simple`](Self::Simple) form.
    #[inline]
    pub fn is_simple(&self) -> bool {
        matches!(self, Self::Simple(_))
    }

    /// The contained view, if this is the simple form.
    #[inline]
    pub fn as_view(&self) -> Option<&View> {
        match self {
            Self::Simple(view) => Some(view),
            Self::Composed(_) => None,
        }
    }

    /// A contiguous view of the bytes, collating the composed form.
    pub fn to_view(&self) -> View {
        match self {
            Self::Simple(view) => view.clone(),
            Self::Composed(group) => group.collate(),
        }
    }

    /// Concatenates two sequences of the same form.
    ///
    /// Two simple sequences follow [`View::concat`]; two composed ones join
    /// their member lists.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Unsupported`] when mixing a simple and a composed sequence.
    pub fn concat(self, other: ByteSeq) -> Result<ByteSeq> {
        match (self, other) {
            (Self::Simple(a), Self::Simple(b)) => Ok(a.concat(b)),
            (Self::Composed(a), Self::Composed(b)) => Ok(Self::Composed(a + b)),
            _ => Err(BufferError::Unsupported("concatenation of a view with a view group")),
        }
    }

    /// Offset of the first occurrence of `needle`; see [`ViewGroup::find`].
    pub fn find(&self, needle: &[u8]) -> Result<Option<usize>> {
        match self {
            Self::Simple(view) => Ok(view.find(needle)),
            Self::Composed(group) => group.find(needle),
        }
    }

    /// Offset of the last occurrence of `needle`; see [`ViewGroup::rfind`].
    pub fn rfind(&self, needle: &[u8]) -> Result<Option<usize>> {
        match self {
            Self::Simple(view) => Ok(view.rfind(needle)),
            Self::Composed(group) => group.rfind(needle),
        }
    }

    /// Writes the bytes with a single `write` or vectored write.
    pub fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> Result<usize> {
        match self {
            Self::Simple(view) => view.write_to(sink),
            Self::Composed(group) => group.write_to(sink),
        }
    }
}

impl ByteSequence for ByteSeq {
    type Slice = ByteSeq;

    fn len(&self) -> usize {
        match self {
            Self::Simple(view) => view.len(),
            Self::Composed(group) => group.len(),
        }
    }

    fn chunk_count(&self) -> usize {
        match self {
            Self::Simple(_) => 1,
            Self::Composed(group) => group.chunk_count(),
        }
    }

    fn chunk(&self, index: usize) -> &[u8] {
        match self {
            Self::Simple(view) => view.chunk(index),
            Self::Composed(group) => group.chunk(index),
        }
    }

    fn as_contiguous(&self) -> Option<&[u8]> {
        match self {
            Self::Simple(view) => Some(view.as_slice()),
            Self::Composed(group) => group.as_contiguous(),
        }
    }

    fn subsequence(&self, start: usize, stop: usize) -> ByteSeq {
        match self {
            Self::Simple(view) => Self::Simple(view.subsequence(start, stop)),
            Self::Composed(group) => group.subsequence(start, stop),
        }
    }
}

impl From<View> for ByteSeq {
    fn from(view: View) -> Self {
        Self::Simple(view)
    }
}

impl From<ViewGroup> for ByteSeq {
    fn from(group: ViewGroup) -> Self {
        Self::Composed(group)
    }
}

impl PartialEq for ByteSeq {
    fn eq(&self, other: &ByteSeq) -> bool {
        eq_seq(self, other)
    }
}

impl Eq for ByteSeq {}

impl PartialEq<View> for ByteSeq {
    fn eq(&self, other: &View) -> bool {
        eq_seq(self, other)
    }
}

impl PartialEq<ByteSeq> for View {
    fn eq(&self, other: &ByteSeq) -> bool {
        eq_seq(other, self)
    }
}

impl PartialEq<ViewGroup> for ByteSeq {
    fn eq(&self, other: &ViewGroup) -> bool {
        eq_seq(self, other)
    }
}

impl PartialEq<ByteSeq> for ViewGroup {
    fn eq(&self, other: &ByteSeq) -> bool {
        eq_seq(other, self)
    }
}

impl_eq_bytes!(ByteSeq);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::RawBlock;

    fn composed() -> ByteSeq {
        View::from_bytes(b"ab") + View::from_bytes(b"cd")
    }

    #[test]
    fn test_forms() {
        let block = RawBlock::from_bytes(b"abcd");
        let simple = block.view(..2).unwrap() + block.view(2..).unwrap();
        assert!(simple.is_simple());
        assert!(simple.as_view().is_some());
        assert!(!composed().is_simple());
        assert!(composed().as_view().is_none());
        assert_eq!(simple, composed());
    }

    #[test]
    fn test_concat() {
        let joined = composed().concat(composed()).unwrap();
        assert_eq!(joined, b"abcdabcd");
        assert_eq!(joined.chunk_count(), 4);

        let views = ByteSeq::from(View::from_bytes(b"x")).concat(View::from_bytes(b"y").into()).unwrap();
        assert_eq!(views, b"xy");

        let mixed = ByteSeq::from(View::from_bytes(b"x")).concat(composed());
        assert!(matches!(mixed, Err(BufferError::Unsupported(_))));
    }

    #[test]
    fn test_search() {
        let seq = composed();
        assert_eq!(seq.find(b"c").unwrap(), Some(2));
        assert_eq!(seq.rfind(b"a").unwrap(), Some(0));
        assert!(seq.find(b"bc").is_err());
        assert_eq!(ByteSeq::from(View::from_bytes(b"abab")).rfind(b"ab").unwrap(), Some(2));
    }

    #[test]
    fn test_contiguous_composed() {
        let padded = ByteSeq::from(ViewGroup::new(vec![View::empty(), View::from_bytes(b"abab")]).unwrap());
        assert_eq!(padded.as_contiguous(), Some(&b"abab"[..]));
        assert_eq!(padded.rfind(b"ab").unwrap(), Some(2));
        assert!(composed().as_contiguous().is_none());
    }

    #[test]
    fn test_to_view() {
        assert_eq!(composed().to_view(), b"abcd");
        let view = View::from_bytes(b"abcd");
        assert!(ByteSeq::from(view.clone()).to_view().same_block(&view));
    }

    #[test]
    fn test_cross_type_equality() {
        let seq = composed();
        let group = ViewGroup::new(vec![View::from_bytes(b"abcd")]).unwrap();
        assert_eq!(seq, group);
        assert_eq!(group, seq);
        assert_eq!(seq, View::from_bytes(b"abcd"));
        assert_eq!(View::from_bytes(b"abcd"), seq);
        assert_ne!(seq, View::from_bytes(b"abc"));
    }
}
