//! Shared pools for chunks and whole buffers.
//!
//! - [`ChunkPool`] - Recycles fixed-size [`Chunk`](crate::Chunk)s
//! - [`BufferPool`] - Recycles reset [`ChunkedBuffer`](crate::ChunkedBuffer)s
//! - [`PoolStats`] - Point-in-time counters for either pool
//!
//! Both pools are cheap-to-clone handles over shared state and are safe to
//! use from many threads at once. Acquired values are moved out of the pool
//! and moved back on release, so a value can never be held by the pool and
//! a caller at the same time. Values dropped instead of released are still
//! accounted for: a chunk returns to its pool, and a buffer is struck from
//! its pool's live count.

mod buffer_pool;
mod chunk_pool;
mod stats;

pub use buffer_pool::BufferPool;
pub(crate) use buffer_pool::BufferLease;
pub use chunk_pool::ChunkPool;
pub use stats::PoolStats;
