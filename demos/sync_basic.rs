//! Basic synchronous example: write, inspect, stream, release.
//!
//! Run with:
//!     cargo run --example sync_basic

use std::io::{BufRead, Write};

use chunkbuf::{BufferPool, PoolConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Small chunks so the layout is easy to see
    let pool = BufferPool::new(PoolConfig::new(16)?)?;
    let mut buffer = pool.acquire();

    for i in 0..5 {
        writeln!(buffer, "record {} of 5", i + 1)?;
    }

    println!(
        "Buffered {} bytes in {} chunks of {} bytes\n",
        buffer.len(),
        buffer.chunk_count(),
        buffer.chunk_size()
    );

    for (i, chunk) in buffer.chunks().enumerate() {
        println!("Chunk {}: {:?}", i, String::from_utf8_lossy(chunk));
    }

    println!();
    let reader = buffer.open_reader();
    for line in reader.lines() {
        println!("Line: {}", line?);
    }

    #[cfg(feature = "hash-blake3")]
    println!("\nContent hash: {}", &buffer.content_hash().to_hex()[..16]);

    pool.release(buffer);

    let stats = pool.chunk_pool().stats();
    println!(
        "\nChunk pool: {} allocated, {} idle, {} live",
        stats.allocated, stats.idle, stats.live
    );

    Ok(())
}
