// src/search.rs
//! Substring search over raw bytes.
//!
//! Both directions use Boyer–Moore–Horspool restricted to a single anchor
//! byte, accelerated by a word-sized Bloom mask of the needle's bytes:
//!
//! - The **anchor** is the last needle byte for forward search and the first
//!   byte for backward search. Only windows whose anchor position matches
//!   are verified byte by byte.
//! - When the byte just outside the current window (after it going forward,
//!   before it going backward) is definitely not in the needle, no window
//!   overlapping that byte can match, so the scan jumps past it entirely.
//! - After an anchor hit that fails verification, the scan shifts so the
//!   nearest other occurrence of the anchor byte lines up with the window's
//!   anchor position.
//!
//! The skip rules only affect speed. Worst case is `O(n * m)`.
//!
//! Empty needles match at offset zero. Single-byte needles go straight to
//! `memchr`/`memrchr`.

/// Number of distinct buckets in a [`BloomMask`].
pub const BLOOM_WIDTH: u32 = u64::BITS;

/// A word-sized approximate set of bytes.
///
/// `may_contain` never returns `false` for an inserted byte; it may return
/// `true` for bytes that were never inserted (they share a bucket).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BloomMask(u64);

impl BloomMask {
    /// An empty mask.
    #[inline]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Builds a mask containing every byte of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut mask = Self::new();
        bytes.iter().for_each(|&b| mask.insert(b));
        mask
    }

    #[inline(always)]
    fn bit(byte: u8) -> u64 {
        1 << (u32::from(byte) & (BLOOM_WIDTH - 1))
    }

    /// Adds `byte` to the set.
    #[inline(always)]
    pub fn insert(&mut self, byte: u8) {
        self.0 |= Self::bit(byte);
    }

    /// `false` means `byte` was definitely never inserted.
    #[inline(always)]
    pub fn may_contain(self, byte: u8) -> bool {
        self.0 & Self::bit(byte) != 0
    }
}

/// Precomputed forward search for one needle.
///
/// Building a `Finder` once and reusing it (as [`split`] does) avoids
/// recomputing the mask and skip for every search.
///
/// [`split`]: crate::ByteSequence::split
///
/// # Examples
///
/// ```
/// use zerobuf::search::Finder;
///
/// let finder = Finder::new(b"::");
/// assert_eq!(finder.find_in(b"a::b::c"), Some(1));
/// assert_eq!(finder.find_in(b"abc"), None);
/// ```
#[derive(Debug, Clone)]
pub struct Finder<'n> {
    needle: &'n [u8],
    mask: BloomMask,
    shift: usize,
}

impl<'n> Finder<'n> {
    /// Precomputes the Bloom mask and anchor shift for `needle`.
    pub fn new(needle: &'n [u8]) -> Self {
        let mut shift = needle.len().saturating_sub(1).max(1);
        if let Some((&anchor, head)) = needle.split_last() {
            // rightmost earlier occurrence of the anchor wins
            for (i, &b) in head.iter().enumerate() {
                if b == anchor {
                    shift = head.len() - i;
                }
            }
        }
        Self {
            needle,
            mask: BloomMask::from_bytes(needle),
            shift,
        }
    }

    /// The needle this finder searches for.
    #[inline]
    pub fn needle(&self) -> &'n [u8] {
        self.needle
    }

    /// Returns the offset of the first occurrence of the needle in `haystack`.
    pub fn find_in(&self, haystack: &[u8]) -> Option<usize> {
        match self.needle.len() {
            0 => Some(0),
            1 => memchr::memchr(self.needle[0], haystack),
            n if n > haystack.len() => None,
            _ => self.scan(haystack),
        }
    }

    fn scan(&self, haystack: &[u8]) -> Option<usize> {
        let n = self.needle.len();
        let last = n - 1;
        let (anchor, head) = (self.needle[last], &self.needle[..last]);
        let final_start = haystack.len() - n;

        let mut i = 0;
        while i <= final_start {
            let anchor_hit = haystack[i + last] == anchor;
            if anchor_hit && &haystack[i..i + last] == head {
                return Some(i);
            }
            i += match haystack.get(i + n) {
                Some(&next) if !self.mask.may_contain(next) => n + 1,
                _ if anchor_hit => self.shift,
                _ => 1,
            };
        }
        None
    }
}

/// Precomputed backward search for one needle; the mirror image of [`Finder`].
#[derive(Debug, Clone)]
pub struct RevFinder<'n> {
    needle: &'n [u8],
    mask: BloomMask,
    shift: usize,
}

impl<'n> RevFinder<'n> {
    /// Precomputes the Bloom mask and anchor shift for `needle`.
    pub fn new(needle: &'n [u8]) -> Self {
        let mut shift = needle.len().saturating_sub(1).max(1);
        if let Some((&anchor, tail)) = needle.split_first() {
            // leftmost later occurrence of the anchor wins
            for (i, &b) in tail.iter().enumerate().rev() {
                if b == anchor {
                    shift = i + 1;
                }
            }
        }
        Self {
            needle,
            mask: BloomMask::from_bytes(needle),
            shift,
        }
    }

    /// The needle this finder searches for.
    #[inline]
    pub fn needle(&self) -> &'n [u8] {
        self.needle
    }

    /// Returns the offset of the last occurrence of the needle in `haystack`.
    ///
    /// An empty needle matches at offset zero, like the forward search.
    pub fn rfind_in(&self, haystack: &[u8]) -> Option<usize> {
        match self.needle.len() {
            0 => Some(0),
            1 => memchr::memrchr(self.needle[0], haystack),
            n if n > haystack.len() => None,
            _ => self.scan(haystack),
        }
    }

    fn scan(&self, haystack: &[u8]) -> Option<usize> {
        let n = self.needle.len();
        let (anchor, tail) = (self.needle[0], &self.needle[1..]);

        let mut i = haystack.len() - n;
        loop {
            let anchor_hit = haystack[i] == anchor;
            if anchor_hit && &haystack[i + 1..i + n] == tail {
                return Some(i);
            }
            let step = match i.checked_sub(1).map(|p| haystack[p]) {
                Some(prev) if !self.mask.may_contain(prev) => n + 1,
                _ if anchor_hit => self.shift,
                _ => 1,
            };
            i = i.checked_sub(step)?;
        }
    }
}

/// Returns the offset of the first occurrence of `needle` in `haystack`.
///
/// # Examples
///
/// ```
/// assert_eq!(zerobuf::search::find(b"hello world!!!", b"world"), Some(6));
/// assert_eq!(zerobuf::search::find(b"abc", b""), Some(0));
/// ```
#[inline]
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    Finder::new(needle).find_in(haystack)
}

/// Returns the offset of the last occurrence of `needle` in `haystack`.
///
/// # Examples
///
/// ```
/// assert_eq!(zerobuf::search::rfind(b"123abc123", b"23"), Some(7));
/// assert_eq!(zerobuf::search::rfind(b"123abc123", b"124"), None);
/// ```
#[inline]
pub fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    RevFinder::new(needle).rfind_in(haystack)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_find(h: &[u8], n: &[u8]) -> Option<usize> {
        if n.is_empty() {
            return Some(0);
        }
        h.windows(n.len()).position(|w| w == n)
    }

    fn naive_rfind(h: &[u8], n: &[u8]) -> Option<usize> {
        if n.is_empty() {
            return Some(0);
        }
        h.windows(n.len()).rposition(|w| w == n)
    }

    #[test]
    fn test_bloom_mask() {
        let mask = BloomMask::from_bytes(b"ab");
        assert!(mask.may_contain(b'a'));
        assert!(mask.may_contain(b'b'));
        assert!(!mask.may_contain(b'c'));
        // 'a' + 64 lands in the same bucket as 'a'
        assert!(mask.may_contain(b'a' + 64));
    }

    #[test]
    fn test_forward_shift() {
        assert_eq!(Finder::new(b"abcd").shift, 3);
        assert_eq!(Finder::new(b"abab").shift, 2);
        assert_eq!(Finder::new(b"aaaa").shift, 1);
        assert_eq!(Finder::new(b"ab").shift, 1);
    }

    #[test]
    fn test_backward_shift() {
        assert_eq!(RevFinder::new(b"abcd").shift, 3);
        assert_eq!(RevFinder::new(b"abab").shift, 2);
        assert_eq!(RevFinder::new(b"aaaa").shift, 1);
    }

    #[test]
    fn test_find_bytes() {
        assert_eq!(find(b"abc123", b"cc"), None);
        assert_eq!(find(b"abc123", b"ab"), Some(0));
        assert_eq!(find(b"abc123", b"c1"), Some(2));
        assert_eq!(find(b"abc123aabbcc", b"aa"), Some(6));
        assert_eq!(find(b"abc123aabbcc", b"abb"), Some(7));
        assert_eq!(find(b"abc", b"abcd"), None);
    }

    #[test]
    fn test_rfind_bytes() {
        assert_eq!(rfind(b"123abc123", b"cc"), None);
        assert_eq!(rfind(b"123abc123", b"23"), Some(7));
        assert_eq!(rfind(b"123abc123", b"12"), Some(6));
        assert_eq!(rfind(b"123abc123", b"124"), None);
        assert_eq!(rfind(b"abc", b"abc"), Some(0));
    }

    #[test]
    fn test_single_byte() {
        assert_eq!(find(b"abc", b"c"), Some(2));
        assert_eq!(find(b"abc", b"d"), None);
        assert_eq!(rfind(b"abcabc", b"a"), Some(3));
        assert_eq!(rfind(b"", b"a"), None);
    }

    #[test]
    fn test_bucket_collisions_do_not_hide_matches() {
        // 'A' (65) and 0x81 (129) share bucket 1; '\x01' too.
        let haystack = [b'x', 0x81, b'A', 0x01, b'A', b'A', b'x'];
        for needle in [&[b'A', b'A'][..], &[0x01, b'A'], &[0x81, b'A', 0x01]] {
            assert_eq!(find(&haystack, needle), naive_find(&haystack, needle));
            assert_eq!(rfind(&haystack, needle), naive_rfind(&haystack, needle));
        }
    }

    #[test]
    fn test_matches_naive_on_every_substring() {
        let haystack = b"abracadabra-abacabadabacaba--mississippi";
        for start in 0..haystack.len() {
            for stop in start + 1..=haystack.len().min(start + 8) {
                let needle = &haystack[start..stop];
                assert_eq!(find(haystack, needle), naive_find(haystack, needle), "{:?}", needle);
                assert_eq!(rfind(haystack, needle), naive_rfind(haystack, needle), "{:?}", needle);
            }
        }
    }

    #[test]
    fn test_absent_needles() {
        let haystack = b"aaaaaaaaabaaaaaaaaab";
        for needle in [&b"aab_"[..], b"bb", b"ba_", b"zzz", b"aaaaaaaaaaa"] {
            assert_eq!(find(haystack, needle), None);
            assert_eq!(rfind(haystack, needle), None);
        }
    }
}
