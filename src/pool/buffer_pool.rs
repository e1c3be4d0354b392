//! Thread-safe pool of whole chunked buffers.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::chunk_pool::ChunkPool;
use super::stats::{PoolMetrics, PoolStats};
use crate::buffer::ChunkedBuffer;
use crate::config::PoolConfig;
use crate::error::BufferError;

/// A shared pool of reusable [`ChunkedBuffer`]s.
///
/// Every buffer handed out draws its chunks from the pool's [`ChunkPool`].
/// Pooling buffers keeps their chunk lists allocated between uses, so a
/// recycled buffer can grow again without reallocating its bookkeeping.
///
/// # Release policy
///
/// [`release`](BufferPool::release) resets the buffer itself: callers never
/// need to call [`ChunkedBuffer::reset`] before handing a buffer back.
/// Buffers that were not acquired from this pool are reset and dropped
/// rather than pooled. A buffer dropped without being released is removed
/// from the pool's live count.
///
/// # Example
///
/// ```
/// use chunkbuf::{BufferPool, PoolConfig};
///
/// let pool = BufferPool::new(PoolConfig::new(4)?)?;
///
/// let mut buffer = pool.acquire();
/// buffer.write(b"hello")?;
/// pool.release(buffer);
///
/// let buffer = pool.acquire();
/// assert!(buffer.is_empty());
/// assert_eq!(pool.stats().hits, 1);
/// # Ok::<(), chunkbuf::BufferError>(())
/// ```
#[derive(Clone)]
pub struct BufferPool {
    inner: Arc<BufferPoolInner>,
}

struct BufferPoolInner {
    chunks: ChunkPool,
    max_idle: usize,
    idle: Mutex<Vec<ChunkedBuffer>>,
    metrics: PoolMetrics,
}

/// Ties an acquired buffer to the counters of the pool that handed it out.
///
/// Dropping an armed lease strikes the buffer from its pool's live and
/// allocated counts.
pub(crate) struct BufferLease {
    pool: Weak<BufferPoolInner>,
}

impl BufferLease {
    fn is_from(&self, inner: &Arc<BufferPoolInner>) -> bool {
        std::ptr::eq(self.pool.as_ptr(), Arc::as_ptr(inner))
    }

    /// Ends the lease without touching any counter.
    fn settle(mut self) {
        self.pool = Weak::new();
    }
}

impl Drop for BufferLease {
    fn drop(&mut self) {
        if let Some(inner) = self.pool.upgrade() {
            inner.metrics.unclaim();
            inner.metrics.forget(1);
            trace!("pooled buffer dropped without release");
        }
    }
}

impl BufferPool {
    /// Creates a buffer pool with its own chunk pool.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: PoolConfig) -> Result<Self, BufferError> {
        let chunks = ChunkPool::new(config)?;
        Ok(Self::with_chunk_pool(chunks))
    }

    /// Creates a buffer pool on top of an existing chunk pool.
    ///
    /// The idle buffer limit is taken from the chunk pool's configuration.
    pub fn with_chunk_pool(chunks: ChunkPool) -> Self {
        let max_idle = chunks.config().max_idle_buffers();
        Self {
            inner: Arc::new(BufferPoolInner {
                chunks,
                max_idle,
                idle: Mutex::new(Vec::new()),
                metrics: PoolMetrics::default(),
            }),
        }
    }

    /// Returns an empty buffer, reusing an idle one when available.
    pub fn acquire(&self) -> ChunkedBuffer {
        let inner = &*self.inner;
        inner.metrics.try_claim(None);

        let reused = inner.idle.lock().pop();
        let mut buffer = match reused {
            Some(buffer) => {
                inner.metrics.record_hit();
                trace!("buffer pool hit");
                buffer
            }
            None => {
                inner.metrics.record_miss();
                trace!("buffer pool miss");
                ChunkedBuffer::new(inner.chunks.clone())
            }
        };
        buffer.set_lease(BufferLease {
            pool: Arc::downgrade(&self.inner),
        });
        buffer
    }

    /// Resets `buffer` and returns it to the idle set.
    ///
    /// The buffer's chunks go back to its chunk pool immediately. If the idle
    /// set is full, or the buffer was not acquired from this pool, it is
    /// freed.
    pub fn release(&self, mut buffer: ChunkedBuffer) {
        let inner = &*self.inner;
        buffer.reset();

        match buffer.take_lease() {
            Some(lease) if lease.is_from(&self.inner) => lease.settle(),
            _ => {
                debug!("dropping buffer not acquired from this pool");
                return;
            }
        }
        inner.metrics.unclaim();

        let mut idle = inner.idle.lock();
        if idle.len() < inner.max_idle {
            idle.push(buffer);
        } else {
            drop(idle);
            inner.metrics.forget(1);
            trace!("buffer pool full, freeing buffer");
        }
    }

    /// Frees every idle buffer and returns how many were freed.
    pub fn shrink(&self) -> usize {
        let drained: Vec<ChunkedBuffer> = std::mem::take(&mut *self.inner.idle.lock());
        let count = drained.len();
        self.inner.metrics.forget(count);
        debug!(count, "buffer pool shrunk");
        count
    }

    /// Returns the chunk pool backing every buffer from this pool.
    pub fn chunk_pool(&self) -> &ChunkPool {
        &self.inner.chunks
    }

    /// Returns a snapshot of the buffer counters.
    ///
    /// Chunk counters are available from [`chunk_pool`](Self::chunk_pool).
    pub fn stats(&self) -> PoolStats {
        let idle = self.inner.idle.lock().len();
        self.inner.metrics.snapshot(idle)
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::with_chunk_pool(ChunkPool::default())
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("chunks", &self.inner.chunks)
            .field("stats", &self.stats())
            .finish()
    }
}
