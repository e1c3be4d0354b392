//! Content hashing for whole buffers.
//!
//! Only BLAKE3 is supported, behind the `hash-blake3` feature.

#[cfg(feature = "hash-blake3")]
mod blake3;

#[cfg(feature = "hash-blake3")]
pub(crate) use blake3::Blake3Hasher;
