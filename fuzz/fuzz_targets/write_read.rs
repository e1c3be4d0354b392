#![no_main]

use libfuzzer_sys::fuzz_target;
use bytes::Buf;
use chunkbuf::{ChunkPool, ChunkedBuffer, PoolConfig};

fuzz_target!(|input: (u8, Vec<Vec<u8>>)| {
    let (size, writes) = input;
    let chunk_size = usize::from(size % 64) + 1;
    let pool = ChunkPool::new(PoolConfig::new(chunk_size).unwrap()).unwrap();
    let mut buffer = ChunkedBuffer::new(pool.clone());

    let mut expected = Vec::new();
    for write in &writes {
        assert_eq!(buffer.write(write).unwrap(), write.len());
        expected.extend_from_slice(write);
    }

    // Verify: length and fill invariants
    assert_eq!(buffer.len(), expected.len());
    let lens: Vec<usize> = buffer.chunks().map(<[u8]>::len).collect();
    if let Some((_, full)) = lens.split_last() {
        assert!(full.iter().all(|&l| l == chunk_size));
    }

    // Verify: reader yields exactly the written bytes
    let mut reader = buffer.open_reader();
    let mut out = Vec::new();
    let mut dst = vec![0u8; chunk_size * 2 + 1];
    loop {
        let n = reader.read(&mut dst);
        if n == 0 {
            break;
        }
        out.extend_from_slice(&dst[..n]);
    }
    assert_eq!(out, expected);

    // Verify: zero-copy Buf view agrees
    let mut reader = buffer.open_reader();
    let bytes = reader.copy_to_bytes(Buf::remaining(&reader));
    assert_eq!(&bytes[..], &expected[..]);

    // Verify: hash is independent of layout
    let mut flat = ChunkedBuffer::new(ChunkPool::default());
    flat.write(&expected).unwrap();
    assert_eq!(flat.content_hash(), buffer.content_hash());

    buffer.reset();
    assert_eq!(buffer.chunk_count(), 0);
    assert_eq!(pool.stats().live, 0);
});
