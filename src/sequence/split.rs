// src/sequence/split.rs
//! Lazy splitting iterators.

use super::ByteSequence;
use crate::error::{BufferError, Result};
use crate::search::Finder;
use std::fmt;
use std::iter::FusedIterator;

/// Iterator over the pieces of a sequence between occurrences of a separator.
///
/// Created by [`ByteSequence::split`] and [`ByteSequence::split_n`]. Pieces
/// are zero-copy slices of the sequence being split; the final remainder is
/// always yielded, even when empty.
///
/// # Examples
///
/// ```
/// use zerobuf::prelude::*;
/// # use zerobuf::BufferError;
///
/// let view = View::from_bytes(b"a,b,,c");
/// let pieces: Vec<View> = view.split(b",")?.collect();
/// assert_eq!(pieces, [&b"a"[..], b"b", b"", b"c"]);
///
/// let first: Vec<View> = view.split_n(b",", 1)?.collect();
/// assert_eq!(first, [&b"a"[..], b"b,,c"]);
/// # Ok::<(), BufferError>(())
/// ```
pub struct Split<'s, S: ByteSequence> {
    seq: S,
    finder: Finder<'s>,
    pos: usize,
    remaining: Option<usize>,
    finished: bool,
}

impl<'s, S: ByteSequence> Split<'s, S> {
    pub(crate) fn new(seq: S, separator: &'s [u8], max_splits: Option<usize>) -> Result<Self> {
        if separator.is_empty() {
            return Err(BufferError::EmptySeparator);
        }
        if separator.len() > 1 && seq.as_contiguous().is_none() {
            return Err(BufferError::Unsupported(
                "multi-byte separator over a multi-view sequence",
            ));
        }
        Ok(Self {
            seq,
            finder: Finder::new(separator),
            pos: 0,
            remaining: max_splits,
            finished: false,
        })
    }

    fn next_separator(&self) -> Option<usize> {
        if self.remaining == Some(0) {
            return None;
        }
        match self.seq.as_contiguous() {
            Some(bytes) => self.finder.find_in(&bytes[self.pos..]).map(|at| self.pos + at),
            None => self.seq.find_byte_from(self.finder.needle()[0], self.pos),
        }
    }
}

impl<S: ByteSequence> Iterator for Split<'_, S> {
    type Item = S::Slice;

    fn next(&mut self) -> Option<S::Slice> {
        if self.finished {
            return None;
        }
        match self.next_separator() {
            Some(at) => {
                let piece = self.seq.subsequence(self.pos, at);
                self.pos = at + self.finder.needle().len();
                if let Some(left) = self.remaining.as_mut() {
                    *left -= 1;
                }
                Some(piece)
            }
            None => {
                self.finished = true;
                Some(self.seq.subsequence(self.pos, self.seq.len()))
            }
        }
    }
}

impl<S: ByteSequence> FusedIterator for Split<'_, S> {}

impl<S: ByteSequence> fmt::Debug for Split<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Split")
            .field("separator", &self.finder.needle())
            .field("pos", &self.pos)
            .field("remaining", &self.remaining)
            .field("finished", &self.finished)
            .finish()
    }
}

/// Iterator over the lines of a sequence.
///
/// Lines end at `\n`, `\r`, or `\r\n` (one terminator). With `keep_ends` the
/// terminator stays attached to its line. An empty sequence has no lines,
/// and a trailing terminator does not start an extra empty line.
///
/// # Examples
///
/// ```
/// use zerobuf::prelude::*;
///
/// let view = View::from_bytes(b"one\r\ntwo\n\nthree");
/// let lines: Vec<View> = view.splitlines(false).collect();
/// assert_eq!(lines, [&b"one"[..], b"two", b"", b"three"]);
///
/// let kept: Vec<View> = view.splitlines(true).collect();
/// assert_eq!(kept, [&b"one\r\n"[..], b"two\n", b"\n", b"three"]);
/// ```
pub struct SplitLines<S: ByteSequence> {
    seq: S,
    pos: usize,
    keep_ends: bool,
}

impl<S: ByteSequence> SplitLines<S> {
    pub(crate) fn new(seq: S, keep_ends: bool) -> Self {
        Self {
            seq,
            pos: 0,
            keep_ends,
        }
    }

    #[inline]
    fn next_break(&self) -> Option<usize> {
        self.seq.find_either_from(b'\n', b'\r', self.pos)
    }
}

impl<S: ByteSequence> Iterator for SplitLines<S> {
    type Item = S::Slice;

    fn next(&mut self) -> Option<S::Slice> {
        let len = self.seq.len();
        if self.pos >= len {
            return None;
        }

        let (eol, next) = match self.next_break() {
            Some(at) => {
                let crlf = self.seq.byte_at(at) == Some(b'\r') && self.seq.byte_at(at + 1) == Some(b'\n');
                (at, if crlf { at + 2 } else { at + 1 })
            }
            None => (len, len),
        };
        let stop = if self.keep_ends { next } else { eol };
        let line = self.seq.subsequence(self.pos, stop);
        self.pos = next;
        Some(line)
    }
}

impl<S: ByteSequence> FusedIterator for SplitLines<S> {}

impl<S: ByteSequence> fmt::Debug for SplitLines<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitLines")
            .field("pos", &self.pos)
            .field("keep_ends", &self.keep_ends)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::{BufferError, ByteSeq};

    fn pieces<S>(iter: impl Iterator<Item = S>) -> Vec<Vec<u8>>
    where
        S: ByteSequence,
    {
        iter.map(|p| p.to_vec()).collect()
    }

    fn two_members(a: &[u8], b: &[u8]) -> ByteSeq {
        RawBlock::from_bytes(a).view_all() + RawBlock::from_bytes(b).view_all()
    }

    #[test]
    fn test_split_basic() {
        let view = View::from_bytes(b"hello world!!!");
        assert_eq!(
            pieces(view.split(b" ").unwrap()),
            vec![b"hello".to_vec(), b"world!!!".to_vec()]
        );
    }

    #[test]
    fn test_split_multibyte() {
        let view = View::from_bytes(b"a::b::::c");
        assert_eq!(
            pieces(view.split(b"::").unwrap()),
            vec![b"a".to_vec(), b"b".to_vec(), vec![], b"c".to_vec()]
        );
    }

    #[test]
    fn test_split_edges() {
        let view = View::from_bytes(b",a,");
        assert_eq!(pieces(view.split(b",").unwrap()), vec![vec![], b"a".to_vec(), vec![]]);

        let empty = View::empty();
        assert_eq!(pieces(empty.split(b",").unwrap()), vec![Vec::<u8>::new()]);

        let none = View::from_bytes(b"abc");
        assert_eq!(pieces(none.split(b",").unwrap()), vec![b"abc".to_vec()]);
    }

    #[test]
    fn test_split_n() {
        let view = View::from_bytes(b"a b c d");
        assert_eq!(pieces(view.split_n(b" ", 0).unwrap()), vec![b"a b c d".to_vec()]);
        assert_eq!(
            pieces(view.split_n(b" ", 2).unwrap()),
            vec![b"a".to_vec(), b"b".to_vec(), b"c d".to_vec()]
        );
        assert_eq!(pieces(view.split_n(b" ", 10).unwrap()).len(), 4);
    }

    #[test]
    fn test_split_errors() {
        let view = View::from_bytes(b"abc");
        assert_eq!(view.split(b"").unwrap_err(), BufferError::EmptySeparator);

        let seq = two_members(b"a:", b":b");
        assert!(matches!(seq.split(b"::"), Err(BufferError::Unsupported(_))));
    }

    #[test]
    fn test_split_across_members() {
        let seq = two_members(b"ab,c", b"d,ef");
        assert_eq!(
            pieces(seq.split(b",").unwrap()),
            vec![b"ab".to_vec(), b"cd".to_vec(), b"ef".to_vec()]
        );
    }

    #[test]
    fn test_split_is_fused() {
        let view = View::from_bytes(b"a");
        let mut iter = view.split(b",").unwrap();
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_splitlines() {
        let view = View::from_bytes(b"a\nb\r\nc\rd\n");
        assert_eq!(
            pieces(view.splitlines(false)),
            vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec(), b"d".to_vec()]
        );
        assert_eq!(
            pieces(view.splitlines(true)),
            vec![b"a\n".to_vec(), b"b\r\n".to_vec(), b"c\r".to_vec(), b"d\n".to_vec()]
        );
    }

    #[test]
    fn test_splitlines_empty_lines() {
        let view = View::from_bytes(b"\n\r\n\r");
        assert_eq!(pieces(view.splitlines(false)), vec![vec![], vec![], vec![]]);
        assert_eq!(pieces(View::empty().splitlines(true)).len(), 0);
    }

    #[test]
    fn test_splitlines_across_members() {
        let seq = two_members(b"ab\r", b"\ncd");
        assert_eq!(pieces(seq.splitlines(false)), vec![b"ab".to_vec(), b"cd".to_vec()]);
        assert_eq!(pieces(seq.splitlines(true)), vec![b"ab\r\n".to_vec(), b"cd".to_vec()]);
    }

    #[test]
    fn test_splitlines_long_cr_run_across_members() {
        let half = vec![b'\r'; 100_000];
        let seq = two_members(&half, &half);
        let mut count = 0;
        for line in seq.splitlines(false) {
            assert!(line.is_empty());
            count += 1;
        }
        assert_eq!(count, 200_000);
    }

    #[test]
    fn test_split_multibyte_with_empty_members() {
        let group = ViewGroup::new(vec![View::empty(), View::from_bytes(b"a::b"), View::empty()]).unwrap();
        assert_eq!(
            pieces(group.split(b"::").unwrap()),
            vec![b"a".to_vec(), b"b".to_vec()]
        );
    }
}
