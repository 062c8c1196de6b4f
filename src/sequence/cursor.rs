// src/sequence/cursor.rs
//! Bidirectional cursors over a [`ByteSequence`].
//!
//! A [`Forward`] cursor yields bytes front to back, a [`Backward`] cursor
//! back to front. Both can step back one byte and report their absolute
//! position, and a forward cursor compares against a backward one by
//! position, so the two can walk toward each other from opposite ends.

use super::ByteSequence;
use std::cmp::Ordering;
use std::iter::FusedIterator;

/// Front-to-back cursor. `position()` is the offset of the next byte to yield.
///
/// # Examples
///
/// ```
/// use zerobuf::prelude::*;
///
/// let view = View::from_bytes(b"ab");
/// let mut cursor = view.cursor();
/// assert_eq!(cursor.next(), Some(b'a'));
/// cursor.step_back();
/// assert_eq!(cursor.position(), 0);
/// assert_eq!(cursor.collect::<Vec<_>>(), b"ab");
/// ```
pub struct Forward<'a, S: ?Sized> {
    seq: &'a S,
    chunk: usize,
    offset: usize,
    pos: usize,
}

impl<'a, S: ByteSequence + ?Sized> Forward<'a, S> {
    /// A cursor positioned before the first byte of `seq`.
    pub fn new(seq: &'a S) -> Self {
        Self {
            seq,
            chunk: 0,
            offset: 0,
            pos: 0,
        }
    }

    /// Absolute offset of the next byte to yield.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The next byte, without advancing.
    pub fn peek(&self) -> Option<u8> {
        let (mut chunk, mut offset) = (self.chunk, self.offset);
        while chunk < self.seq.chunk_count() {
            let bytes = self.seq.chunk(chunk);
            if offset < bytes.len() {
                return Some(bytes[offset]);
            }
            chunk += 1;
            offset = 0;
        }
        None
    }

    /// Moves back one byte, so the last yielded byte is yielded again.
    /// Does nothing at the start.
    pub fn step_back(&mut self) {
        if self.pos == 0 {
            return;
        }
        while self.offset == 0 {
            self.chunk -= 1;
            self.offset = self.seq.chunk(self.chunk).len();
        }
        self.offset -= 1;
        self.pos -= 1;
    }
}

impl<S: ByteSequence + ?Sized> Iterator for Forward<'_, S> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        while self.chunk < self.seq.chunk_count() {
            let bytes = self.seq.chunk(self.chunk);
            if self.offset < bytes.len() {
                let byte = bytes[self.offset];
                self.offset += 1;
                self.pos += 1;
                return Some(byte);
            }
            self.chunk += 1;
            self.offset = 0;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.seq.len() - self.pos;
        (left, Some(left))
    }
}

impl<S: ByteSequence + ?Sized> ExactSizeIterator for Forward<'_, S> {}
impl<S: ByteSequence + ?Sized> FusedIterator for Forward<'_, S> {}

/// Back-to-front cursor. `position()` is one past the offset of the next
/// byte to yield, so it starts at `len()` and ends at zero.
pub struct Backward<'a, S: ?Sized> {
    seq: &'a S,
    chunk: usize,
    offset: usize,
    pos: usize,
}

impl<'a, S: ByteSequence + ?Sized> Backward<'a, S> {
    /// A cursor positioned after the last byte of `seq`.
    pub fn new(seq: &'a S) -> Self {
        let (chunk, offset) = match seq.chunk_count() {
            0 => (0, 0),
            n => (n - 1, seq.chunk(n - 1).len()),
        };
        Self {
            seq,
            chunk,
            offset,
            pos: seq.len(),
        }
    }

    /// One past the absolute offset of the next byte to yield.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The next byte, without advancing.
    pub fn peek(&self) -> Option<u8> {
        let (mut chunk, mut offset) = (self.chunk, self.offset);
        loop {
            if offset > 0 {
                return Some(self.seq.chunk(chunk)[offset - 1]);
            }
            if chunk == 0 {
                return None;
            }
            chunk -= 1;
            offset = self.seq.chunk(chunk).len();
        }
    }

    /// Moves one byte toward the end, so the last yielded byte is yielded
    /// again. Does nothing at the end.
    pub fn step_back(&mut self) {
        if self.pos == self.seq.len() {
            return;
        }
        while self.offset == self.seq.chunk(self.chunk).len() {
            self.chunk += 1;
            self.offset = 0;
        }
        self.offset += 1;
        self.pos += 1;
    }
}

impl<S: ByteSequence + ?Sized> Iterator for Backward<'_, S> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        loop {
            if self.offset > 0 {
                self.offset -= 1;
                self.pos -= 1;
                return Some(self.seq.chunk(self.chunk)[self.offset]);
            }
            if self.chunk == 0 {
                return None;
            }
            self.chunk -= 1;
            self.offset = self.seq.chunk(self.chunk).len();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.pos, Some(self.pos))
    }
}

impl<S: ByteSequence + ?Sized> ExactSizeIterator for Backward<'_, S> {}
impl<S: ByteSequence + ?Sized> FusedIterator for Backward<'_, S> {}

impl<S: ByteSequence + ?Sized> PartialEq<Backward<'_, S>> for Forward<'_, S> {
    fn eq(&self, other: &Backward<'_, S>) -> bool {
        debug_assert!(std::ptr::eq(self.seq, other.seq), "cursors over different sequences");
        self.pos == other.pos
    }
}

impl<S: ByteSequence + ?Sized> PartialOrd<Backward<'_, S>> for Forward<'_, S> {
    fn partial_cmp(&self, other: &Backward<'_, S>) -> Option<Ordering> {
        debug_assert!(std::ptr::eq(self.seq, other.seq), "cursors over different sequences");
        Some(self.pos.cmp(&other.pos))
    }
}

impl<S: ByteSequence + ?Sized> PartialEq<Forward<'_, S>> for Backward<'_, S> {
    fn eq(&self, other: &Forward<'_, S>) -> bool {
        other == self
    }
}

impl<S: ByteSequence + ?Sized> PartialOrd<Forward<'_, S>> for Backward<'_, S> {
    fn partial_cmp(&self, other: &Forward<'_, S>) -> Option<Ordering> {
        other.partial_cmp(self).map(Ordering::reverse)
    }
}

/// Computes `[start, stop)` after trimming bytes matching `strip` from the
/// requested ends.
pub(crate) fn strip_bounds<S: ByteSequence + ?Sized>(
    seq: &S,
    strip: impl Fn(u8) -> bool,
    left: bool,
    right: bool,
) -> (usize, usize) {
    let mut front = Forward::new(seq);
    let mut back = Backward::new(seq);

    if left {
        while front < back {
            match front.next() {
                Some(b) if strip(b) => {}
                Some(_) => {
                    front.step_back();
                    break;
                }
                None => break,
            }
        }
    }
    if right {
        while back > front {
            match back.next() {
                Some(b) if strip(b) => {}
                Some(_) => {
                    back.step_back();
                    break;
                }
                None => break,
            }
        }
    }
    (front.position(), back.position())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RawBlock, View, ViewGroup};

    fn group(parts: &[&[u8]]) -> ViewGroup {
        let views = parts.iter().map(|p| RawBlock::from_bytes(p).view_all()).collect();
        ViewGroup::new(views).unwrap()
    }

    #[test]
    fn test_forward_walks_members() {
        let g = group(&[b"ab", b"", b"c"]);
        let mut cursor = g.cursor();
        assert_eq!(cursor.len(), 3);
        assert_eq!(cursor.next(), Some(b'a'));
        assert_eq!(cursor.next(), Some(b'b'));
        assert_eq!(cursor.peek(), Some(b'c'));
        assert_eq!(cursor.next(), Some(b'c'));
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_forward_step_back_across_members() {
        let g = group(&[b"ab", b"", b"c"]);
        let mut cursor = g.cursor();
        cursor.by_ref().take(3).for_each(drop);
        cursor.step_back();
        cursor.step_back();
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.next(), Some(b'b'));
        assert_eq!(cursor.next(), Some(b'c'));
    }

    #[test]
    fn test_backward_walks_members() {
        let g = group(&[b"ab", b"", b"c"]);
        assert_eq!(g.cursor_back().collect::<Vec<_>>(), b"cba");

        let mut cursor = g.cursor_back();
        assert_eq!(cursor.next(), Some(b'c'));
        assert_eq!(cursor.next(), Some(b'b'));
        cursor.step_back();
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.peek(), Some(b'b'));
        cursor.step_back();
        assert_eq!(cursor.position(), 3);
        cursor.step_back();
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_empty_sequence() {
        let view = View::empty();
        assert_eq!(view.cursor().next(), None);
        assert_eq!(view.cursor_back().next(), None);
        assert_eq!(view.cursor_back().peek(), None);
    }

    #[test]
    fn test_cursor_ordering() {
        let view = View::from_bytes(b"xy");
        let mut front = view.cursor();
        let mut back = view.cursor_back();
        assert!(front < back);
        front.next();
        back.next();
        assert!(front == back);
        assert!(back == front);
        back.next();
        assert!(front > back);
        assert!(back < front);
    }

    #[test]
    fn test_strip_bounds() {
        let view = View::from_bytes(b"  ab  ");
        let space = |b: u8| b == b' ';
        assert_eq!(strip_bounds(&view, space, true, true), (2, 4));
        assert_eq!(strip_bounds(&view, space, true, false), (2, 6));
        assert_eq!(strip_bounds(&view, space, false, true), (0, 4));

        let blank = View::from_bytes(b"    ");
        assert_eq!(strip_bounds(&blank, space, true, true), (4, 4));
        assert_eq!(strip_bounds(&blank, space, false, true), (0, 0));
    }
}
