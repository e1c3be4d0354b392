//! Draining a chunked buffer through tokio.
//!
//! The reader implements `futures_io::AsyncRead`; `tokio_util::compat`
//! adapts it to tokio's I/O traits.
//!
//! Run with:
//!     cargo run --example async_tokio --features async-io

use chunkbuf::{BufferPool, PoolConfig};
use tokio_util::compat::FuturesAsyncReadCompatExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let pool = BufferPool::new(PoolConfig::new(1024)?)?;
    let mut buffer = pool.acquire();

    for i in 0..200 {
        buffer.write(format!("line {}\n", i).as_bytes())?;
    }

    let mut reader = buffer.open_reader().compat();
    let mut sink = Vec::new();
    let copied = tokio::io::copy(&mut reader, &mut sink).await?;

    println!(
        "Copied {} bytes from {} chunks into a tokio sink",
        copied,
        buffer.chunk_count()
    );

    drop(reader);
    pool.release(buffer);
    Ok(())
}
