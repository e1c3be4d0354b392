//! chunkbuf
//!
//! Pooled, chunked byte buffers for Rust.
//!
//! `chunkbuf` builds byte streams out of fixed-size chunks drawn from a shared
//! pool instead of one contiguous, repeatedly doubled allocation. It is
//! designed as a small primitive for:
//!
//! - serializers and protocol encoders
//! - staging data before a vectored write
//! - request/response bodies with unknown length
//!
//! The crate intentionally:
//! - does NOT allow mutation of bytes already written
//! - does NOT compress or persist data
//! - does NOT support several writers on one buffer
//!
//! Ownership is enforced by the type system: pools move chunks and buffers
//! out and take them back by value, and a [`StreamingReader`] borrows its
//! buffer, so a buffer cannot be written to or reset while it is being read.
//!
//! # Sync
//!
//! ```
//! use std::io::Read;
//! use chunkbuf::{BufferPool, BufferError, PoolConfig};
//!
//! fn main() -> Result<(), BufferError> {
//!     let pool = BufferPool::new(PoolConfig::default())?;
//!
//!     let mut buffer = pool.acquire();
//!     buffer.write(b"hello ")?;
//!     buffer.write(b"world")?;
//!
//!     let mut text = String::new();
//!     buffer.open_reader().read_to_string(&mut text)?;
//!     assert_eq!(text, "hello world");
//!
//!     pool.release(buffer);
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use futures_util::AsyncReadExt;
//! use chunkbuf::ChunkedBuffer;
//!
//! async fn drain(buffer: &ChunkedBuffer) -> std::io::Result<Vec<u8>> {
//!     let mut out = Vec::new();
//!     buffer.open_reader().read_to_end(&mut out).await?;
//!     Ok(out)
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod chunk;
mod config;
mod error;
mod pool;
mod reader;

mod hash; // internal blake3 impl

//
// Public surface
//

pub use buffer::ChunkedBuffer;
pub use chunk::{Chunk, ContentHash};
pub use config::{
    DEFAULT_CHUNK_SIZE, DEFAULT_MAX_IDLE_BUFFERS, DEFAULT_MAX_IDLE_CHUNKS, PoolConfig,
};
pub use error::BufferError;
pub use pool::{BufferPool, ChunkPool, PoolStats};
pub use reader::StreamingReader;
