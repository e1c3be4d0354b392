//! The Chunk type - one fixed-capacity region of a chunked buffer.

use std::fmt;

use crate::error::BufferError;
use crate::pool::ChunkPool;

/// A fixed-capacity byte region plus a used-length cursor.
///
/// Only `[0, len)` holds data; the spare tail is never exposed. Chunks are
/// handed out by [`ChunkPool`] and are move-only, so a chunk belongs to
/// exactly one buffer or to the pool at any instant.
///
/// Every chunk remembers the pool it came from. Dropping a chunk returns its
/// region to that pool, exactly as [`ChunkPool::release`] does, so the pool's
/// outstanding count never drifts.
///
/// # Example
///
/// ```
/// use chunkbuf::{ChunkPool, PoolConfig};
///
/// let pool = ChunkPool::new(PoolConfig::new(4)?)?;
/// let mut chunk = pool.acquire()?;
///
/// assert_eq!(chunk.fill(b"hello"), 4);
/// assert_eq!(chunk.as_slice(), b"hell");
/// assert!(chunk.is_full());
///
/// pool.release(chunk);
/// assert_eq!(pool.stats().live, 0);
/// # Ok::<(), chunkbuf::BufferError>(())
/// ```
pub struct Chunk {
    data: Box<[u8]>,
    used: usize,
    home: ChunkPool,
}

/// Allocates a zeroed region, surfacing allocator failure as an error.
pub(crate) fn alloc_region(capacity: usize) -> Result<Box<[u8]>, BufferError> {
    let mut data = Vec::<u8>::new();
    data.try_reserve_exact(capacity)
        .map_err(|_| BufferError::AllocationFailed {
            requested: capacity,
        })?;
    data.resize(capacity, 0);
    Ok(data.into_boxed_slice())
}

impl Chunk {
    /// Wraps a pooled region as an empty chunk owned by `home`.
    pub(crate) fn new(data: Box<[u8]>, home: ChunkPool) -> Self {
        Self {
            data,
            used: 0,
            home,
        }
    }

    /// Returns the fixed capacity of the chunk.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of valid bytes.
    pub fn len(&self) -> usize {
        self.used
    }

    /// Returns true if the chunk holds no data.
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Returns true if no more bytes fit.
    pub fn is_full(&self) -> bool {
        self.used == self.data.len()
    }

    /// Returns the spare capacity in bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.used
    }

    /// Returns the valid bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.used]
    }

    /// Copies as much of `src` as fits and returns the number of bytes taken.
    pub fn fill(&mut self, src: &[u8]) -> usize {
        let n = src.len().min(self.remaining());
        self.data[self.used..self.used + n].copy_from_slice(&src[..n]);
        self.used += n;
        n
    }

    /// Returns the pool this chunk goes back to.
    pub fn pool(&self) -> &ChunkPool {
        &self.home
    }

    /// Takes the region out so the pool can stash it without a second lock.
    pub(crate) fn into_region(mut self) -> Box<[u8]> {
        std::mem::take(&mut self.data)
    }
}

impl Drop for Chunk {
    fn drop(&mut self) {
        // Empty once `into_region` has handed the region over.
        if self.data.is_empty() {
            return;
        }
        let data = std::mem::take(&mut self.data);
        self.home.reclaim(data);
    }
}

impl AsRef<[u8]> for Chunk {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("used", &self.used)
            .field("capacity", &self.data.len())
            .finish()
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk({}/{} bytes)", self.used, self.data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;

    fn pool(capacity: usize) -> ChunkPool {
        ChunkPool::new(PoolConfig::new(capacity).unwrap()).unwrap()
    }

    #[test]
    fn test_new_is_empty() {
        let chunk = pool(8).acquire().unwrap();
        assert_eq!(chunk.capacity(), 8);
        assert_eq!(chunk.len(), 0);
        assert!(chunk.is_empty());
        assert!(!chunk.is_full());
        assert_eq!(chunk.remaining(), 8);
    }

    #[test]
    fn test_fill_partial() {
        let mut chunk = pool(8).acquire().unwrap();
        assert_eq!(chunk.fill(b"abc"), 3);
        assert_eq!(chunk.as_slice(), b"abc");
        assert_eq!(chunk.remaining(), 5);
    }

    #[test]
    fn test_fill_overflow_is_truncated() {
        let mut chunk = pool(4).acquire().unwrap();
        assert_eq!(chunk.fill(b"ab"), 2);
        assert_eq!(chunk.fill(b"cdef"), 2);
        assert!(chunk.is_full());
        assert_eq!(chunk.fill(b"g"), 0);
        assert_eq!(chunk.as_slice(), b"abcd");
    }

    #[test]
    fn test_reused_region_hides_old_bytes() {
        let pool = pool(4);
        let mut chunk = pool.acquire().unwrap();
        chunk.fill(b"wxyz");
        drop(chunk);

        let mut chunk = pool.acquire().unwrap();
        assert!(chunk.as_slice().is_empty());
        chunk.fill(b"a");
        assert_eq!(chunk.as_slice(), b"a");
    }

    #[test]
    fn test_drop_returns_region_to_home_pool() {
        let pool = pool(4);
        let chunk = pool.acquire().unwrap();
        assert!(chunk.pool().same_pool(&pool));
        assert_eq!(pool.stats().live, 1);

        drop(chunk);
        let stats = pool.stats();
        assert_eq!(stats.live, 0);
        assert_eq!(stats.idle, 1);
    }

    #[test]
    fn test_chunk_outlives_pool_handle() {
        let mut chunk = pool(4).acquire().unwrap();
        chunk.fill(b"ab");
        assert_eq!(chunk.pool().stats().live, 1);
        drop(chunk);
    }

    #[test]
    fn test_display() {
        let mut chunk = pool(16).acquire().unwrap();
        chunk.fill(b"hello");
        let s = format!("{}", chunk);
        assert!(s.contains("5/16 bytes"));
    }

    #[test]
    fn test_huge_allocation_fails_cleanly() {
        let err = alloc_region(usize::MAX).unwrap_err();
        assert!(matches!(err, BufferError::AllocationFailed { .. }));
    }
}
