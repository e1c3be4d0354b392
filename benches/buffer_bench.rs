//! Benchmarks for chunkbuf.
//!
//! Run with:
//!     cargo bench

use std::io::Read;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use chunkbuf::{BufferPool, ChunkPool, ChunkedBuffer, PoolConfig};

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");

    for size in [64 * 1024, 1024 * 1024, 10 * 1024 * 1024] {
        // Deterministic pseudo-random data
        let data: Vec<u8> = (0..size).map(|i| (i * 7 + 13) as u8).collect();
        group.throughput(Throughput::Bytes(size as u64));

        let pool = BufferPool::default();
        group.bench_with_input(
            format!("pooled_{}kb", size / 1024),
            &data,
            |b, data| {
                b.iter(|| {
                    let mut buffer = pool.acquire();
                    for piece in data.chunks(1500) {
                        buffer.write(black_box(piece)).unwrap();
                    }
                    let len = buffer.len();
                    pool.release(buffer);
                    black_box(len)
                });
            },
        );

        // Baseline: one contiguous, doubling vector
        group.bench_with_input(format!("vec_{}kb", size / 1024), &data, |b, data| {
            b.iter(|| {
                let mut out = Vec::new();
                for piece in data.chunks(1500) {
                    out.extend_from_slice(black_box(piece));
                }
                black_box(out.len())
            });
        });
    }

    group.finish();
}

fn bench_chunk_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk_sizes");
    let size = 1024 * 1024; // 1 MB
    let data: Vec<u8> = (0..size).map(|i| (i * 7 + 13) as u8).collect();
    group.throughput(Throughput::Bytes(size as u64));

    for chunk_size in [1024, 4096, 64 * 1024] {
        let pool = ChunkPool::new(PoolConfig::new(chunk_size).unwrap()).unwrap();
        group.bench_function(format!("chunk_{}", chunk_size), |b| {
            b.iter(|| {
                let mut buffer = ChunkedBuffer::new(pool.clone());
                buffer.write(black_box(&data)).unwrap();
                black_box(buffer.chunk_count())
            });
        });
    }

    group.finish();
}

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");
    let size = 1024 * 1024; // 1 MB
    let data: Vec<u8> = (0..size).map(|i| (i * 7 + 13) as u8).collect();
    group.throughput(Throughput::Bytes(size as u64));

    let mut buffer = ChunkedBuffer::default();
    buffer.write(&data).unwrap();

    group.bench_function("streaming_reader", |b| {
        b.iter(|| {
            let mut reader = buffer.open_reader();
            let mut dst = vec![0u8; 64 * 1024];
            let mut total = 0usize;
            loop {
                let n = reader.read(&mut dst);
                if n == 0 {
                    break;
                }
                total += n;
            }
            black_box(total)
        });
    });

    group.bench_function("copy_to", |b| {
        b.iter(|| {
            let mut sink = Vec::with_capacity(size);
            buffer.copy_to(&mut sink).unwrap();
            black_box(sink.len())
        });
    });

    group.bench_function("cursor_baseline", |b| {
        b.iter(|| {
            let mut cursor = std::io::Cursor::new(black_box(&data));
            let mut dst = vec![0u8; 64 * 1024];
            let mut total = 0usize;
            loop {
                let n = cursor.read(&mut dst).unwrap();
                if n == 0 {
                    break;
                }
                total += n;
            }
            black_box(total)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_write, bench_chunk_sizes, bench_read);
criterion_main!(benches);
