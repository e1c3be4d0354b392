//! Error types for chunkbuf.

use std::fmt;
use std::io;

/// Errors that can occur while building or draining chunked buffers.
#[derive(Debug)]
pub enum BufferError {
    /// An I/O error occurred while draining a buffer into a sink.
    Io(io::Error),

    /// The allocator could not provide memory for a new chunk.
    AllocationFailed {
        /// Number of bytes that were requested.
        requested: usize,
    },

    /// The chunk pool reached its configured limit of outstanding chunks.
    PoolExhausted {
        /// The configured maximum number of live chunks.
        limit: usize,
    },

    /// Invalid configuration parameter.
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl BufferError {
    /// Returns true if the error means no more memory could be obtained.
    pub fn is_exhaustion(&self) -> bool {
        matches!(
            self,
            BufferError::AllocationFailed { .. } | BufferError::PoolExhausted { .. }
        )
    }
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::Io(e) => write!(f, "io error: {}", e),
            BufferError::AllocationFailed { requested } => {
                write!(f, "allocation failed: could not reserve {} bytes", requested)
            }
            BufferError::PoolExhausted { limit } => {
                write!(f, "chunk pool exhausted: {} chunks already live", limit)
            }
            BufferError::InvalidConfig { message } => {
                write!(f, "invalid config: {}", message)
            }
        }
    }
}

impl std::error::Error for BufferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BufferError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for BufferError {
    fn from(e: io::Error) -> Self {
        BufferError::Io(e)
    }
}

impl From<BufferError> for io::Error {
    fn from(e: BufferError) -> Self {
        match e {
            BufferError::Io(inner) => inner,
            other if other.is_exhaustion() => io::Error::new(io::ErrorKind::OutOfMemory, other),
            other => io::Error::new(io::ErrorKind::InvalidInput, other),
        }
    }
}
