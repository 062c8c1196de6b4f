// src/view/ops.rs
//! Searching, concatenation and output for views.

use super::core::View;
use crate::error::{BufferError, Result};
use crate::group::ViewGroup;
use crate::search::{Finder, RevFinder};
use crate::sequence::{ByteSeq, clamp_range};
use std::io::Write;
use std::ops::{Add, RangeBounds};

impl View {
    /// Offset of the first occurrence of `needle`.
    ///
    /// # Examples
    ///
    /// ```
    /// use zerobuf::View;
    ///
    /// let view = View::from_bytes(b"abc123aabbcc");
    /// assert_eq!(view.find(b"abb"), Some(7));
    /// assert_eq!(view.find(b"cc1"), None);
    /// assert_eq!(view.find(b""), Some(0));
    /// ```
    #[inline]
    pub fn find(&self, needle: &[u8]) -> Option<usize> {
        Finder::new(needle).find_in(self.as_slice())
    }

    /// Offset of the last occurrence of `needle`.
    #[inline]
    pub fn rfind(&self, needle: &[u8]) -> Option<usize> {
        RevFinder::new(needle).rfind_in(self.as_slice())
    }

    /// Like [`find`](Self::find), restricted to `range`.
    ///
    /// The end of the range is clamped to the view's length; a range that is
    /// reversed after clamping finds nothing. The returned offset is relative
    /// to the whole view, and an empty needle matches at the range start.
    ///
    /// # Examples
    ///
    /// ```
    /// use zerobuf::View;
    ///
    /// let view = View::from_bytes(b"abcabc");
    /// assert_eq!(view.find_in(b"abc", 1..), Some(3));
    /// assert_eq!(view.find_in(b"abc", 1..5), None);
    /// assert_eq!(view.find_in(b"", 4..100), Some(4));
    /// ```
    pub fn find_in(&self, needle: &[u8], range: impl RangeBounds<usize>) -> Option<usize> {
        let (start, stop) = clamp_range(&range, self.len())?;
        Finder::new(needle)
            .find_in(&self.as_slice()[start..stop])
            .map(|at| start + at)
    }

    /// Like [`rfind`](Self::rfind), restricted to `range`; bounds behave as in
    /// [`find_in`](Self::find_in).
    pub fn rfind_in(&self, needle: &[u8], range: impl RangeBounds<usize>) -> Option<usize> {
        let (start, stop) = clamp_range(&range, self.len())?;
        RevFinder::new(needle)
            .rfind_in(&self.as_slice()[start..stop])
            .map(|at| start + at)
    }

    /// Like [`find`](Self::find), but a missing needle is an error.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::NotFound`] if `needle` does not occur.
    pub fn index(&self, needle: &[u8]) -> Result<usize> {
        self.find(needle).ok_or(BufferError::NotFound)
    }

    /// Like [`rfind`](Self::rfind), but a missing needle is an error.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::NotFound`] if `needle` does not occur.
    pub fn rindex(&self, needle: &[u8]) -> Result<usize> {
        self.rfind(needle).ok_or(BufferError::NotFound)
    }

    /// Returns `true` if `needle` occurs in the view.
    #[inline]
    pub fn contains(&self, needle: &[u8]) -> bool {
        self.find(needle).is_some()
    }

    /// Writes the view to `sink` with exactly one `write` call.
    ///
    /// Returns the number of bytes the sink accepted, which may be fewer than
    /// `len()`; nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Io`] carrying the platform error code if the write fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use zerobuf::View;
    /// # use zerobuf::BufferError;
    ///
    /// let mut sink = Vec::new();
    /// assert_eq!(View::from_bytes(b"abc").write_to(&mut sink)?, 3);
    /// assert_eq!(sink, b"abc");
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> Result<usize> {
        Ok(sink.write(self.as_slice())?)
    }

    /// Concatenates two views.
    ///
    /// Byte-adjacent views of the same block merge into one view without
    /// copying; anything else becomes a two-member [`ViewGroup`].
    ///
    /// # Examples
    ///
    /// ```
    /// use zerobuf::{ByteSeq, RawBlock, View};
    /// # use zerobuf::BufferError;
    ///
    /// let block = RawBlock::from_vec(b"abcdef".to_vec());
    /// let merged = block.view(..2)?.concat(block.view(2..4)?);
    /// assert!(matches!(merged, ByteSeq::Simple(_)));
    /// assert_eq!(merged, b"abcd");
    ///
    /// let grouped = block.view(..2)?.concat(View::from_bytes(b"xy"));
    /// assert!(matches!(grouped, ByteSeq::Composed(_)));
    /// assert_eq!(grouped, b"abxy");
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn concat(self, other: View) -> ByteSeq {
        if self.is_adjacent(&other) {
            ByteSeq::Simple(View::new(self.storage, self.offset, self.len + other.len))
        } else {
            ByteSeq::Composed(ViewGroup::pair(self, other))
        }
    }
}

impl Add for View {
    type Output = ByteSeq;

    fn add(self, other: View) -> ByteSeq {
        self.concat(other)
    }
}

impl Add<&View> for &View {
    type Output = ByteSeq;

    fn add(self, other: &View) -> ByteSeq {
        self.clone().concat(other.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::RawBlock;
    use crate::sequence::ByteSequence;
    use std::io;

    struct ClosedSink;

    impl Write for ClosedSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from_raw_os_error(32))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct ShortSink(Vec<u8>);

    impl Write for ShortSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(2);
            self.0.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_find() {
        let view = View::from_bytes(b"abc123aabbcc");
        assert_eq!(view.find(b"cc"), Some(10));
        assert_eq!(view.find(b"ab"), Some(0));
        assert_eq!(view.find(b"c1"), Some(2));
        assert_eq!(view.find(b"aa"), Some(6));
        assert_eq!(view.find(b"abb"), Some(7));
        assert_eq!(view.find(b"zz"), None);
    }

    #[test]
    fn test_find_in_sub_view() {
        let block = RawBlock::from_vec(b"xxabcxx".to_vec());
        let view = block.view(2..5).unwrap();
        assert_eq!(view.find(b"abc"), Some(0));
        assert_eq!(view.find(b"xa"), None);
        assert_eq!(view.rfind(b"x"), None);
    }

    #[test]
    fn test_rfind() {
        let view = View::from_bytes(b"123abc123");
        assert_eq!(view.rfind(b"cc"), None);
        assert_eq!(view.rfind(b"23"), Some(7));
        assert_eq!(view.rfind(b"12"), Some(6));
        assert_eq!(view.rfind(b"124"), None);
        assert_eq!(view.rfind(b"3"), Some(8));
    }

    #[test]
    fn test_bounded_search() {
        let view = View::from_bytes(b"abc123abc");
        assert_eq!(view.find_in(b"abc", 1..), Some(6));
        assert_eq!(view.find_in(b"abc", ..8), Some(0));
        assert_eq!(view.rfind_in(b"abc", ..8), Some(0));
        assert_eq!(view.rfind_in(b"abc", 1..100), Some(6));
        assert_eq!(view.find_in(b"abc", 7..3), None);
        assert_eq!(view.rfind_in(b"", 2..5), Some(2));
    }

    #[test]
    fn test_index() {
        let view = View::from_bytes(b"hello");
        assert_eq!(view.index(b"l").unwrap(), 2);
        assert_eq!(view.rindex(b"l").unwrap(), 3);
        assert_eq!(view.index(b"z").unwrap_err(), BufferError::NotFound);
        assert!(view.contains(b"ell"));
        assert!(!view.contains(b"elo"));
    }

    #[test]
    fn test_concat_adjacent() {
        let block = RawBlock::from_vec(b"hello world".to_vec());
        let joined = block.view(..5).unwrap() + block.view(5..).unwrap();
        match joined {
            ByteSeq::Simple(view) => {
                assert_eq!(view.len(), 11);
                assert_eq!(view, b"hello world");
            }
            ByteSeq::Composed(_) => panic!("adjacent views must merge"),
        }
    }

    #[test]
    fn test_concat_disjoint() {
        let block = RawBlock::from_vec(b"hello world".to_vec());
        let (a, b) = (block.view(6..).unwrap(), block.view(..5).unwrap());
        let joined = &a + &b;
        match &joined {
            ByteSeq::Composed(group) => assert_eq!(group.views().len(), 2),
            ByteSeq::Simple(_) => panic!("reversed views must not merge"),
        }
        assert_eq!(joined, b"worldhello");
        assert_eq!(joined.len(), 10);
    }

    #[test]
    fn test_write_to() {
        let view = View::from_bytes(b"abcdef");
        let mut short = ShortSink(Vec::new());
        assert_eq!(view.write_to(&mut short).unwrap(), 2);
        assert_eq!(short.0, b"ab");

        let err = view.write_to(&mut ClosedSink).unwrap_err();
        assert_eq!(err.os_code(), Some(32));
    }
}
