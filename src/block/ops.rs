// src/block/ops.rs
//! Append-style writers: filling a block from an I/O source or a byte slice.

use super::core::RawBlock;
use crate::error::{BufferError, Result};
use std::io::Read;
use tracing::trace;

impl RawBlock {
    /// The writable tail `[writepos, capacity)`.
    #[inline]
    fn tail_mut(&mut self) -> &mut [u8] {
        // SAFETY: `&mut self` makes this block the single writer, and no view
        // covers bytes at or beyond `writepos`.
        unsafe { self.storage.tail_mut(self.writepos) }
    }

    /// Issues exactly one read from `source` into the free space.
    ///
    /// Returns the number of bytes read and advances the write position by it.
    /// Fewer bytes than the free space is not an error.
    ///
    /// # Errors
    ///
    /// - [`BufferError::BufferFull`] if there is no free space.
    /// - [`BufferError::EndOfStream`] if the source reports zero bytes.
    /// - [`BufferError::Io`] with the platform error code if the read fails.
    ///   Interrupted reads are reported too; nothing is retried.
    ///
    /// # Examples
    ///
    /// ```
    /// use zerobuf::{BufferError, RawBlock};
    ///
    /// let mut block = RawBlock::new(16);
    /// let mut source: &[u8] = b"abc123";
    /// assert_eq!(block.read_from(&mut source)?, 6);
    /// assert_eq!(block.writepos(), 6);
    /// assert_eq!(block.read_from(&mut source), Err(BufferError::EndOfStream));
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn read_from<R: Read + ?Sized>(&mut self, source: &mut R) -> Result<usize> {
        let free = self.free();
        if free == 0 {
            return Err(BufferError::BufferFull);
        }

        let read = source.read(self.tail_mut())?;
        if read == 0 {
            trace!(free, "source reported end of stream");
            return Err(BufferError::EndOfStream);
        }
        if read > free {
            return Err(BufferError::Io {
                code: None,
                message: format!("reader reported {} bytes for a {} byte buffer", read, free),
            });
        }

        self.writepos += read;
        if read < free {
            trace!(read, free, "short read");
        }
        Ok(read)
    }

    /// Copies as much of `data` as fits into the free space.
    ///
    /// Returns the number of bytes copied, `min(data.len(), free)`. A partial
    /// copy is not an error; callers must check the returned count.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::BufferFull`] only when there is no free space on entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use zerobuf::RawBlock;
    /// # use zerobuf::BufferError;
    ///
    /// let mut block = RawBlock::new(16);
    /// assert_eq!(block.append_bytes(&[b'a'; 20])?, 16);
    /// assert!(block.append_bytes(b"abc").is_err());
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn append_bytes(&mut self, data: &[u8]) -> Result<usize> {
        let free = self.free();
        if free == 0 {
            return Err(BufferError::BufferFull);
        }

        let written = data.len().min(free);
        self.tail_mut()[..written].copy_from_slice(&data[..written]);
        self.writepos += written;
        Ok(written)
    }
}
