//! Sharing one buffer pool across worker threads.
//!
//! Run with:
//!     cargo run --example pool_threads

use std::thread;

use chunkbuf::{BufferPool, PoolConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let pool = BufferPool::new(PoolConfig::default().with_max_idle_buffers(8))?;

    println!("Encoding on 4 workers...\n");

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let pool = pool.clone();
            thread::spawn(move || -> Result<(usize, usize), chunkbuf::BufferError> {
                let mut total = 0;
                for message in 0..1000 {
                    let mut buffer = pool.acquire();
                    let payload = vec![worker as u8; 100 + message % 9000];
                    buffer.write(&payload)?;
                    total += buffer.len();
                    pool.release(buffer);
                }
                Ok((worker, total))
            })
        })
        .collect();

    for handle in handles {
        let (worker, total) = handle.join().map_err(|_| "worker panicked")??;
        println!("Worker {}: {} bytes", worker, total);
    }

    let buffers = pool.stats();
    let chunks = pool.chunk_pool().stats();
    println!(
        "\nBuffers: {} allocated, {} hits, {} misses",
        buffers.allocated, buffers.hits, buffers.misses
    );
    println!(
        "Chunks: {} allocated, {} hits, {} misses",
        chunks.allocated, chunks.hits, chunks.misses
    );

    Ok(())
}
