//! Append-only chunked byte buffers.
//!
//! A [`ChunkedBuffer`] stores one logical byte stream as an ordered list of
//! fixed-size chunks drawn from a [`ChunkPool`](crate::ChunkPool). Growth
//! never copies already written bytes.

mod chunked;

pub use chunked::ChunkedBuffer;
