// src/collator.rs
//! Accumulates views and materializes them as one contiguous view.

use crate::block::RawBlock;
use crate::view::View;
use std::mem;
use tracing::trace;

/// Collects views in order, merging byte-adjacent ones as they arrive, and
/// hands back a single contiguous view on [`collapse`](Self::collapse).
///
/// # Examples
///
/// ```
/// use zerobuf::prelude::*;
/// # use zerobuf::BufferError;
///
/// let block = RawBlock::from_bytes(b"GET /index");
/// let mut collator = Collator::new();
/// collator.append(block.view(..4)?);
/// collator.append(block.view(4..)?);
/// assert_eq!(collator.view_count(), 1);
///
/// collator.append(View::from_bytes(b".html"));
/// assert_eq!(collator.len(), 15);
///
/// let request = collator.collapse();
/// assert_eq!(request, b"GET /index.html");
/// assert!(collator.is_empty());
/// # Ok::<(), BufferError>(())
/// ```
#[derive(Debug, Default)]
pub struct Collator {
    views: Vec<View>,
    len: usize,
}

impl Collator {
    /// An empty collator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `view` after everything appended so far.
    ///
    /// A view that starts exactly where the last stored view ends, in the
    /// same block, extends that view instead of being stored separately.
    pub fn append(&mut self, view: View) {
        self.len += view.len();
        if let Some(last) = self.views.last_mut() {
            if last.is_adjacent(&view) {
                last.len += view.len();
                return;
            }
        }
        self.views.push(view);
    }

    /// Total bytes appended since the last collapse.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no bytes have been appended since the last collapse.
    /// Appending only empty views leaves the collator empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of separately stored views.
    #[inline]
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Returns everything appended as one view and empties the collator.
    ///
    /// A single stored view is returned as-is. Otherwise the bytes are copied,
    /// in order, into one freshly allocated block; with nothing stored, the
    /// result is an empty view.
    pub fn collapse(&mut self) -> View {
        let len = mem::take(&mut self.len);
        let views = mem::take(&mut self.views);

        match <[View; 1]>::try_from(views) {
            Ok([only]) => only,
            Err(views) => {
                if views.len() > 1 {
                    trace!(views = views.len(), bytes = len, "collating views into a fresh block");
                }
                let mut data = Vec::with_capacity(len);
                for view in &views {
                    data.extend_from_slice(view.as_slice());
                }
                RawBlock::from_vec(data).view_all()
            }
        }
    }
}

impl Extend<View> for Collator {
    fn extend<I: IntoIterator<Item = View>>(&mut self, iter: I) {
        for view in iter {
            self.append(view);
        }
    }
}

impl FromIterator<View> for Collator {
    fn from_iter<I: IntoIterator<Item = View>>(iter: I) -> Self {
        let mut collator = Self::new();
        collator.extend(iter);
        collator
    }
}
