#![no_main]

use libfuzzer_sys::fuzz_target;
use chunkbuf::{BufferPool, PoolConfig};

// Each byte is an operation against a small set of buffer slots.
fuzz_target!(|ops: Vec<u8>| {
    let config = PoolConfig::new(8)
        .unwrap()
        .with_max_idle_buffers(2)
        .with_max_idle_chunks(4)
        .with_max_live_chunks(Some(32));
    let pool = BufferPool::new(config).unwrap();
    let mut slots: Vec<Option<(chunkbuf::ChunkedBuffer, Vec<u8>)>> = (0..4).map(|_| None).collect();

    for op in ops {
        let slot = &mut slots[usize::from(op & 3)];
        match (op >> 2) & 3 {
            0 => {
                if slot.is_none() {
                    *slot = Some((pool.acquire(), Vec::new()));
                }
            }
            1 => {
                if let Some((buffer, model)) = slot.as_mut() {
                    let data = vec![op; usize::from(op >> 4) + 1];
                    let before = buffer.len();
                    match buffer.write(&data) {
                        Ok(_) => model.extend_from_slice(&data),
                        Err(err) => {
                            assert!(err.is_exhaustion());
                            model.extend_from_slice(&data[..buffer.len() - before]);
                        }
                    }
                    assert_eq!(&buffer.to_vec(), model);
                }
            }
            2 => {
                if let Some((buffer, model)) = slot.as_mut() {
                    buffer.reset();
                    model.clear();
                    assert!(buffer.is_empty());
                }
            }
            _ => {
                if let Some((buffer, _)) = slot.take() {
                    pool.release(buffer);
                }
            }
        }
    }

    drop(slots);
    assert_eq!(pool.chunk_pool().stats().live, 0);
    assert_eq!(pool.stats().live, 0);
});
