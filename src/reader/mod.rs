//! Sequential readers over chunked buffers.
//!
//! - [`StreamingReader`] - Borrowing cursor implementing `Read`, `BufRead` and `bytes::Buf`
//!
//! With the `async-io` feature the reader also implements
//! `futures_io::AsyncRead` and `futures_io::AsyncBufRead`.

mod streaming;

#[cfg(feature = "async-io")]
mod async_read;

pub use streaming::StreamingReader;
