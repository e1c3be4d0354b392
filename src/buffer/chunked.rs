//! The ChunkedBuffer type.
//!
//! # Example
//!
//! ```
//! use std::io::Read;
//! use chunkbuf::{ChunkPool, ChunkedBuffer, PoolConfig};
//!
//! let pool = ChunkPool::new(PoolConfig::new(4)?)?;
//! let mut buffer = ChunkedBuffer::new(pool);
//!
//! buffer.write(b"AB")?;
//! buffer.write(b"CDEF")?;
//! buffer.write(b"G")?;
//! assert_eq!(buffer.chunk_count(), 2);
//!
//! let mut out = String::new();
//! buffer.open_reader().read_to_string(&mut out)?;
//! assert_eq!(out, "ABCDEFG");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::io;

use bytes::Bytes;
use tracing::debug;

use crate::chunk::Chunk;
use crate::error::BufferError;
use crate::pool::{BufferLease, ChunkPool};
use crate::reader::StreamingReader;

#[cfg(feature = "hash-blake3")]
use crate::chunk::ContentHash;
#[cfg(feature = "hash-blake3")]
use crate::hash::Blake3Hasher;

/// An append-only byte stream stored in pooled fixed-size chunks.
///
/// Every chunk except the last is full after each write; the last chunk may
/// be partially used. Chunks come from the buffer's [`ChunkPool`] and go back
/// to it on [`reset`](ChunkedBuffer::reset) or drop.
///
/// A buffer has exactly one owner. Readers borrow it immutably, so the
/// buffer cannot be written to or reset while any reader is alive.
pub struct ChunkedBuffer {
    chunks: Vec<Chunk>,
    len: usize,
    pool: ChunkPool,
    lease: Option<BufferLease>,
}

impl ChunkedBuffer {
    /// Creates an empty buffer drawing chunks from `pool`.
    pub fn new(pool: ChunkPool) -> Self {
        Self {
            chunks: Vec::new(),
            len: 0,
            pool,
            lease: None,
        }
    }

    /// Appends `src` to the stream and returns the number of bytes written.
    ///
    /// The spare capacity of the last chunk is filled first; new chunks are
    /// acquired from the pool until the input is consumed. An empty `src`
    /// acquires nothing.
    ///
    /// # Errors
    ///
    /// Propagates [`BufferError::PoolExhausted`] and
    /// [`BufferError::AllocationFailed`] from the pool. Bytes copied before
    /// the failure remain in the buffer and are counted by [`len`](Self::len).
    pub fn write(&mut self, mut src: &[u8]) -> Result<usize, BufferError> {
        let total = src.len();

        if let Some(last) = self.chunks.last_mut() {
            let n = last.fill(src);
            self.len += n;
            src = &src[n..];
        }

        while !src.is_empty() {
            self.chunks
                .try_reserve(1)
                .map_err(|_| BufferError::AllocationFailed {
                    requested: std::mem::size_of::<Chunk>(),
                })?;
            let mut chunk = self.pool.acquire()?;
            let n = chunk.fill(src);
            self.len += n;
            src = &src[n..];
            self.chunks.push(chunk);
        }

        Ok(total)
    }

    /// Returns the total number of bytes written.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if nothing has been written since creation or reset.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of chunks currently owned.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Returns the capacity of each chunk.
    pub fn chunk_size(&self) -> usize {
        self.pool.chunk_size()
    }

    /// Returns the pool this buffer draws chunks from.
    pub fn pool(&self) -> &ChunkPool {
        &self.pool
    }

    pub(crate) fn set_lease(&mut self, lease: BufferLease) {
        self.lease = Some(lease);
    }

    pub(crate) fn take_lease(&mut self) -> Option<BufferLease> {
        self.lease.take()
    }

    /// Opens a reader positioned at the start of the stream.
    ///
    /// The reader sees exactly the bytes present when it was opened. It
    /// borrows the buffer, so writes while a reader is alive do not compile:
    ///
    /// ```compile_fail
    /// use chunkbuf::{ChunkPool, ChunkedBuffer};
    ///
    /// let mut buffer = ChunkedBuffer::new(ChunkPool::default());
    /// buffer.write(b"AB").unwrap();
    /// let reader = buffer.open_reader();
    /// buffer.write(b"CD").unwrap();
    /// drop(reader);
    /// ```
    ///
    /// Neither does resetting the buffer under an open reader:
    ///
    /// ```compile_fail
    /// use chunkbuf::{ChunkPool, ChunkedBuffer};
    ///
    /// let mut buffer = ChunkedBuffer::new(ChunkPool::default());
    /// buffer.write(b"AB").unwrap();
    /// let mut reader = buffer.open_reader();
    /// buffer.reset();
    /// reader.read(&mut [0u8; 2]);
    /// ```
    pub fn open_reader(&self) -> StreamingReader<'_> {
        StreamingReader::new(&self.chunks, self.len)
    }

    /// Returns every chunk to the pool and empties the buffer.
    ///
    /// Calling `reset` on an empty buffer does nothing.
    pub fn reset(&mut self) {
        if self.chunks.is_empty() {
            return;
        }
        let chunks = self.chunks.len();
        let len = self.len;
        self.pool.release_many(self.chunks.drain(..));
        self.len = 0;
        debug!(chunks, len, "buffer reset");
    }

    /// Writes the whole stream to `sink`, chunk by chunk.
    ///
    /// Returns the number of bytes written.
    pub fn copy_to<W: io::Write>(&self, mut sink: W) -> io::Result<u64> {
        for chunk in &self.chunks {
            sink.write_all(chunk.as_slice())?;
        }
        Ok(self.len as u64)
    }

    /// Returns an iterator over the valid bytes of each chunk, in order.
    pub fn chunks(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.chunks.iter().map(Chunk::as_slice)
    }

    /// Copies the stream into one contiguous vector.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len);
        for chunk in self.chunks() {
            out.extend_from_slice(chunk);
        }
        out
    }

    /// Copies the stream into one contiguous [`Bytes`].
    pub fn to_bytes(&self) -> Bytes {
        match self.chunks.as_slice() {
            [] => Bytes::new(),
            [only] => Bytes::copy_from_slice(only.as_slice()),
            _ => Bytes::from(self.to_vec()),
        }
    }

    /// Computes the BLAKE3 hash of the stream without flattening it.
    #[cfg(feature = "hash-blake3")]
    pub fn content_hash(&self) -> ContentHash {
        let mut hasher = Blake3Hasher::new();
        for chunk in self.chunks() {
            hasher.update(chunk);
        }
        hasher.finalize()
    }
}

impl Default for ChunkedBuffer {
    fn default() -> Self {
        Self::new(ChunkPool::default())
    }
}

impl Drop for ChunkedBuffer {
    fn drop(&mut self) {
        self.reset();
    }
}

impl io::Write for ChunkedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let before = self.len;
        match ChunkedBuffer::write(self, buf) {
            Ok(n) => Ok(n),
            // Report the partial write; the error surfaces on the next call.
            Err(_) if self.len > before => Ok(self.len - before),
            Err(err) => Err(err.into()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for ChunkedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkedBuffer")
            .field("len", &self.len)
            .field("chunks", &self.chunks.len())
            .field("chunk_size", &self.chunk_size())
            .finish()
    }
}
