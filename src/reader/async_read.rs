//! Runtime-agnostic async adapters for [`StreamingReader`].
//!
//! Reading from memory never blocks, so every poll completes immediately.
//! This lets a reader feed `futures-io` consumers directly, or tokio ones via
//! `tokio_util::compat`.
//!
//! # Example
//!
//! ```ignore
//! use futures_util::AsyncReadExt;
//! use chunkbuf::ChunkedBuffer;
//!
//! async fn demo(buffer: &ChunkedBuffer) -> std::io::Result<Vec<u8>> {
//!     let mut out = Vec::new();
//!     buffer.open_reader().read_to_end(&mut out).await?;
//!     Ok(out)
//! }
//! ```

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_io::{AsyncBufRead, AsyncRead};

use super::StreamingReader;

impl AsyncRead for StreamingReader<'_> {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(Ok(self.get_mut().read(buf)))
    }
}

impl AsyncBufRead for StreamingReader<'_> {
    fn poll_fill_buf(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<&[u8]>> {
        Poll::Ready(Ok(self.get_mut().current_chunk()))
    }

    fn consume(self: Pin<&mut Self>, amt: usize) {
        self.get_mut().skip(amt);
    }
}

#[cfg(test)]
mod tests {
    use futures_util::{AsyncBufReadExt, AsyncReadExt};

    use crate::{ChunkPool, ChunkedBuffer, PoolConfig};

    fn sample() -> ChunkedBuffer {
        let pool = ChunkPool::new(PoolConfig::new(4).unwrap()).unwrap();
        let mut buffer = ChunkedBuffer::new(pool);
        buffer.write(b"alpha\nbeta\ngamma").unwrap();
        buffer
    }

    #[tokio::test]
    async fn test_async_read_to_end() {
        let buffer = sample();
        let mut out = Vec::new();
        buffer.open_reader().read_to_end(&mut out).await.unwrap();
        assert_eq!(out, b"alpha\nbeta\ngamma");
    }

    #[tokio::test]
    async fn test_async_read_line() {
        let buffer = sample();
        let mut reader = buffer.open_reader();
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        assert_eq!(line, "alpha\n");
        assert_eq!(reader.position(), 6);
    }

    #[tokio::test]
    async fn test_tokio_compat_copy() {
        use tokio_util::compat::FuturesAsyncReadCompatExt;

        let buffer = sample();
        let mut sink = Vec::new();
        let mut reader = buffer.open_reader().compat();
        let n = tokio::io::copy(&mut reader, &mut sink).await.unwrap();
        assert_eq!(n, 16);
        assert_eq!(sink, b"alpha\nbeta\ngamma");
    }
}
