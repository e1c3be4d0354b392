//! Borrowing streaming reader.

use std::io::{self, IoSlice};

use bytes::Buf;
use tracing::trace;

use crate::chunk::Chunk;

/// A sequential cursor over a [`ChunkedBuffer`](crate::ChunkedBuffer).
///
/// The reader walks the buffer's chunks in place: [`read`](Self::read)
/// copies only into the caller's destination, while [`BufRead::fill_buf`]
/// and [`Buf::chunk`] hand out the current chunk without copying at all.
///
/// The reader holds a shared borrow of the buffer. The buffer is therefore
/// frozen for the reader's lifetime, and the reader always sees exactly the
/// bytes present when it was opened.
///
/// # Example
///
/// ```
/// use chunkbuf::{ChunkPool, ChunkedBuffer, PoolConfig};
///
/// let mut buffer = ChunkedBuffer::new(ChunkPool::new(PoolConfig::new(4)?)?);
/// buffer.write(b"ABCDEFG")?;
///
/// let mut reader = buffer.open_reader();
/// let mut dst = [0u8; 10];
/// assert_eq!(reader.read(&mut dst), 7);
/// assert_eq!(&dst[..7], b"ABCDEFG");
/// assert_eq!(reader.read(&mut dst), 0);
/// reader.close();
/// # Ok::<(), chunkbuf::BufferError>(())
/// ```
#[derive(Debug, Clone)]
pub struct StreamingReader<'a> {
    chunks: &'a [Chunk],
    index: usize,
    offset: usize,
    position: usize,
    len: usize,
}

impl<'a> StreamingReader<'a> {
    pub(crate) fn new(chunks: &'a [Chunk], len: usize) -> Self {
        let mut reader = Self {
            chunks,
            index: 0,
            offset: 0,
            position: 0,
            len,
        };
        reader.settle();
        reader
    }

    /// Copies up to `dst.len()` bytes into `dst` and advances.
    ///
    /// A single call may cross any number of chunk boundaries. Returns 0 once
    /// the reader is exhausted.
    pub fn read(&mut self, dst: &mut [u8]) -> usize {
        let mut copied = 0;
        while copied < dst.len() {
            let src = self.current_chunk();
            if src.is_empty() {
                break;
            }
            let n = src.len().min(dst.len() - copied);
            dst[copied..copied + n].copy_from_slice(&src[..n]);
            copied += n;
            self.step(n);
        }
        copied
    }

    /// Consumes the reader. The buffer keeps ownership of its chunks.
    pub fn close(self) {
        trace!(position = self.position, len = self.len, "reader closed");
    }

    /// Returns the unread part of the current chunk, empty when exhausted.
    pub fn current_chunk(&self) -> &'a [u8] {
        match self.chunks.get(self.index) {
            Some(chunk) => &chunk.as_slice()[self.offset..],
            None => &[],
        }
    }

    /// Returns the number of bytes not yet read.
    pub fn remaining(&self) -> usize {
        self.len - self.position
    }

    /// Returns the number of bytes read so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns true once every chunk has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.index >= self.chunks.len()
    }

    /// Skips up to `n` bytes and returns how many were skipped.
    pub fn skip(&mut self, mut n: usize) -> usize {
        let mut skipped = 0;
        while n > 0 {
            let available = self.current_chunk().len();
            if available == 0 {
                break;
            }
            let step = available.min(n);
            self.step(step);
            skipped += step;
            n -= step;
        }
        skipped
    }

    /// Advances within the current chunk; `n` must not exceed its remainder.
    fn step(&mut self, n: usize) {
        self.offset += n;
        self.position += n;
        self.settle();
    }

    /// Moves past fully consumed chunks so `offset` always points at data.
    fn settle(&mut self) {
        while let Some(chunk) = self.chunks.get(self.index) {
            if self.offset < chunk.len() {
                break;
            }
            self.index += 1;
            self.offset = 0;
        }
    }
}

impl io::Read for StreamingReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(StreamingReader::read(self, buf))
    }
}

impl io::BufRead for StreamingReader<'_> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(self.current_chunk())
    }

    fn consume(&mut self, amt: usize) {
        self.skip(amt);
    }
}

impl Buf for StreamingReader<'_> {
    fn remaining(&self) -> usize {
        self.len - self.position
    }

    fn chunk(&self) -> &[u8] {
        self.current_chunk()
    }

    fn chunks_vectored<'b>(&'b self, dst: &mut [IoSlice<'b>]) -> usize {
        let first = self.current_chunk();
        if dst.is_empty() || first.is_empty() {
            return 0;
        }
        dst[0] = IoSlice::new(first);

        let rest = self.chunks[self.index + 1..].iter().map(Chunk::as_slice);
        let mut filled = 1;
        for (slot, chunk) in dst[1..].iter_mut().zip(rest) {
            *slot = IoSlice::new(chunk);
            filled += 1;
        }
        filled
    }

    fn advance(&mut self, cnt: usize) {
        let skipped = self.skip(cnt);
        assert_eq!(skipped, cnt, "cannot advance past the end of the stream");
    }
}
