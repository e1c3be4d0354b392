//! Thread-safe pool of fixed-size chunks.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use super::stats::{PoolMetrics, PoolStats};
use crate::chunk::{Chunk, alloc_region};
use crate::config::PoolConfig;
use crate::error::BufferError;

/// A shared pool of fixed-capacity [`Chunk`]s.
///
/// Cloning the pool yields another handle to the same idle set, so one pool
/// can feed any number of buffers across threads. `acquire` moves a chunk
/// out; `release` takes it back by value, which makes double release and
/// use after release compile errors. A chunk that is simply dropped goes
/// back to the pool that handed it out, so the live count stays exact.
///
/// # Example
///
/// ```
/// use chunkbuf::{ChunkPool, PoolConfig};
///
/// let pool = ChunkPool::new(PoolConfig::new(1024)?)?;
///
/// let chunk = pool.acquire()?;
/// assert_eq!(chunk.capacity(), 1024);
/// pool.release(chunk);
///
/// // The second acquire reuses the released chunk.
/// let _chunk = pool.acquire()?;
/// assert_eq!(pool.stats().allocated, 1);
/// # Ok::<(), chunkbuf::BufferError>(())
/// ```
#[derive(Clone)]
pub struct ChunkPool {
    inner: Arc<ChunkPoolInner>,
}

struct ChunkPoolInner {
    config: PoolConfig,
    idle: Mutex<Vec<Box<[u8]>>>,
    metrics: PoolMetrics,
}

impl ChunkPool {
    /// Creates an empty pool.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: PoolConfig) -> Result<Self, BufferError> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(ChunkPoolInner {
                config,
                idle: Mutex::new(Vec::new()),
                metrics: PoolMetrics::default(),
            }),
        })
    }

    /// Returns an empty chunk, reusing an idle one when available.
    ///
    /// # Errors
    ///
    /// - [`BufferError::PoolExhausted`] if `max_live_chunks` chunks are already out
    /// - [`BufferError::AllocationFailed`] if the allocator refuses a new chunk
    pub fn acquire(&self) -> Result<Chunk, BufferError> {
        let inner = &*self.inner;

        if !inner.metrics.try_claim(inner.config.max_live_chunks()) {
            let limit = inner.config.max_live_chunks().unwrap_or_default();
            warn!(limit, "chunk pool exhausted");
            return Err(BufferError::PoolExhausted { limit });
        }

        let reused = inner.idle.lock().pop();
        if let Some(region) = reused {
            inner.metrics.record_hit();
            trace!("chunk pool hit");
            return Ok(Chunk::new(region, self.clone()));
        }

        match alloc_region(inner.config.chunk_size()) {
            Ok(region) => {
                inner.metrics.record_miss();
                trace!(chunk_size = inner.config.chunk_size(), "chunk pool miss");
                Ok(Chunk::new(region, self.clone()))
            }
            Err(err) => {
                inner.metrics.unclaim();
                warn!(error = %err, "chunk allocation failed");
                Err(err)
            }
        }
    }

    /// Returns a chunk to the pool it was acquired from.
    ///
    /// The chunk is emptied first. If the idle set is already at
    /// `max_idle_chunks`, the chunk is freed instead. A chunk acquired from a
    /// different pool is sent back to that pool and leaves this one untouched.
    pub fn release(&self, chunk: Chunk) {
        if !chunk.pool().same_pool(self) {
            trace!("chunk released to a foreign pool, returning it home");
        }
        drop(chunk);
    }

    /// Returns several chunks under a single lock acquisition.
    pub(crate) fn release_many(&self, chunks: impl IntoIterator<Item = Chunk>) {
        let inner = &*self.inner;
        let max_idle = inner.config.max_idle_chunks();
        let mut foreign = Vec::new();
        let mut freed = 0usize;

        {
            let mut idle = inner.idle.lock();
            for chunk in chunks {
                if !chunk.pool().same_pool(self) {
                    foreign.push(chunk);
                    continue;
                }
                let region = chunk.into_region();
                inner.metrics.unclaim();
                if idle.len() < max_idle {
                    idle.push(region);
                } else {
                    freed += 1;
                }
            }
        }

        if freed > 0 {
            inner.metrics.forget(freed);
            trace!(freed, "chunks freed on release");
        }
        // Dropped outside our lock; each goes back to its own pool.
        drop(foreign);
    }

    /// Takes back the region of a dropped chunk.
    pub(crate) fn reclaim(&self, region: Box<[u8]>) {
        let inner = &*self.inner;
        inner.metrics.unclaim();

        let mut idle = inner.idle.lock();
        if idle.len() < inner.config.max_idle_chunks() {
            idle.push(region);
        } else {
            drop(idle);
            inner.metrics.forget(1);
            trace!("chunk pool full, freeing chunk");
        }
    }

    /// Frees every idle chunk and returns the number of bytes released.
    pub fn shrink(&self) -> usize {
        let drained: Vec<Box<[u8]>> = std::mem::take(&mut *self.inner.idle.lock());
        let count = drained.len();
        let bytes = drained.iter().map(|region| region.len()).sum();
        self.inner.metrics.forget(count);
        debug!(count, bytes, "chunk pool shrunk");
        bytes
    }

    /// Returns the capacity of every chunk this pool hands out.
    pub fn chunk_size(&self) -> usize {
        self.inner.config.chunk_size()
    }

    /// Returns the pool configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.inner.config
    }

    /// Returns a snapshot of the pool counters.
    pub fn stats(&self) -> PoolStats {
        let idle = self.inner.idle.lock().len();
        self.inner.metrics.snapshot(idle)
    }

    /// Returns true if both handles refer to the same pool.
    pub fn same_pool(&self, other: &ChunkPool) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for ChunkPool {
    fn default() -> Self {
        Self {
            inner: Arc::new(ChunkPoolInner {
                config: PoolConfig::default(),
                idle: Mutex::new(Vec::new()),
                metrics: PoolMetrics::default(),
            }),
        }
    }
}

impl fmt::Debug for ChunkPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkPool")
            .field("chunk_size", &self.chunk_size())
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_pool() -> ChunkPool {
        ChunkPool::new(PoolConfig::new(4).unwrap()).unwrap()
    }

    #[test]
    fn test_acquire_returns_empty_chunk() {
        let pool = small_pool();
        let chunk = pool.acquire().unwrap();
        assert_eq!(chunk.capacity(), 4);
        assert!(chunk.is_empty());
    }

    #[test]
    fn test_release_resets_used() {
        let pool = small_pool();
        let mut chunk = pool.acquire().unwrap();
        chunk.fill(b"abcd");
        pool.release(chunk);

        let chunk = pool.acquire().unwrap();
        assert!(chunk.is_empty());
        assert_eq!(pool.stats().hits, 1);
    }

    #[test]
    fn test_conservation_over_cycles() {
        let pool = small_pool();
        for _ in 0..100 {
            let chunk = pool.acquire().unwrap();
            pool.release(chunk);
        }
        let stats = pool.stats();
        assert_eq!(stats.allocated, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 99);
        assert_eq!(stats.live, 0);
        assert_eq!(stats.idle, 1);
    }

    #[test]
    fn test_live_limit() {
        let config = PoolConfig::new(4).unwrap().with_max_live_chunks(Some(2));
        let pool = ChunkPool::new(config).unwrap();

        let a = pool.acquire().unwrap();
        let _b = pool.acquire().unwrap();
        assert!(matches!(
            pool.acquire(),
            Err(BufferError::PoolExhausted { limit: 2 })
        ));

        pool.release(a);
        assert!(pool.acquire().is_ok());
    }

    #[test]
    fn test_idle_cap_frees_extras() {
        let config = PoolConfig::new(4).unwrap().with_max_idle_chunks(1);
        let pool = ChunkPool::new(config).unwrap();

        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        pool.release(a);
        pool.release(b);

        let stats = pool.stats();
        assert_eq!(stats.idle, 1);
        assert_eq!(stats.allocated, 1);
    }

    #[test]
    fn test_shrink() {
        let pool = small_pool();
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        pool.release_many([a, b]);

        assert_eq!(pool.shrink(), 8);
        assert_eq!(pool.stats().idle, 0);
        assert_eq!(pool.shrink(), 0);
    }

    #[test]
    fn test_clone_shares_state() {
        let pool = small_pool();
        let other = pool.clone();
        let chunk = pool.acquire().unwrap();
        other.release(chunk);

        assert!(pool.same_pool(&other));
        assert_eq!(pool.stats().idle, 1);
        assert!(!pool.same_pool(&small_pool()));
    }

    #[test]
    fn test_dropped_chunk_frees_live_slot() {
        let config = PoolConfig::new(4).unwrap().with_max_live_chunks(Some(1));
        let pool = ChunkPool::new(config).unwrap();

        let chunk = pool.acquire().unwrap();
        drop(chunk);
        assert_eq!(pool.stats().live, 0);

        let chunk = pool.acquire().unwrap();
        assert!(chunk.is_empty());
        assert_eq!(pool.stats().hits, 1);
    }

    #[test]
    fn test_chunk_released_to_other_pool_goes_home() {
        let limited = || {
            let config = PoolConfig::new(4).unwrap().with_max_live_chunks(Some(1));
            ChunkPool::new(config).unwrap()
        };
        let a = limited();
        let b = limited();

        let from_a = a.acquire().unwrap();
        let held_b = b.acquire().unwrap();
        b.release(from_a);

        assert_eq!(a.stats().live, 0);
        assert_eq!(a.stats().idle, 1);
        assert_eq!(b.stats().live, 1);
        assert_eq!(b.stats().idle, 0);
        assert!(matches!(
            b.acquire(),
            Err(BufferError::PoolExhausted { limit: 1 })
        ));
        assert!(a.acquire().is_ok());
        drop(held_b);
    }

    #[test]
    fn test_release_many_routes_foreign_chunks() {
        let pool = small_pool();
        let other = small_pool();
        let own = pool.acquire().unwrap();
        let stray = other.acquire().unwrap();

        pool.release_many([own, stray]);
        assert_eq!(pool.stats().idle, 1);
        assert_eq!(pool.stats().live, 0);
        assert_eq!(other.stats().idle, 1);
        assert_eq!(other.stats().live, 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PoolConfig::default().with_chunk_size(0);
        assert!(ChunkPool::new(config).is_err());
    }
}
