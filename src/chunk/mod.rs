//! Chunk types.
//!
//! - [`Chunk`] - Fixed-capacity byte region with a used-length cursor
//! - [`ContentHash`] - 32-byte content hash of a whole buffer

mod data;
mod hash;

pub use data::Chunk;
pub(crate) use data::alloc_region;
pub use hash::ContentHash;
