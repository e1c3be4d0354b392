//! Configuration for chunk and buffer pools.
//!
//! - [`PoolConfig`] - Chunk size and pool retention limits
//!
//! # Example
//!
//! ```
//! use chunkbuf::PoolConfig;
//!
//! // Smaller chunks, bounded memory
//! let config = PoolConfig::new(1024)?
//!     .with_max_idle_chunks(256)
//!     .with_max_live_chunks(Some(4096));
//! config.validate()?;
//!
//! # Ok::<(), chunkbuf::BufferError>(())
//! ```

use crate::error::BufferError;

/// Default chunk capacity (4 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 4 * 1024;

/// Default number of idle chunks a chunk pool keeps for reuse.
pub const DEFAULT_MAX_IDLE_CHUNKS: usize = 1024;

/// Default number of idle buffers a buffer pool keeps for reuse.
pub const DEFAULT_MAX_IDLE_BUFFERS: usize = 64;

/// Configuration for chunk and buffer pooling.
///
/// The chunk size trades fragmentation against per-chunk overhead: larger
/// chunks mean fewer pool round trips per byte written, but a partially
/// filled final chunk may waste up to `chunk_size - 1` bytes.
///
/// # Example
///
/// ```
/// use chunkbuf::PoolConfig;
///
/// let config = PoolConfig::default();
/// assert_eq!(config.chunk_size(), 4096);
///
/// let config = PoolConfig::default()
///     .with_chunk_size(16 * 1024)
///     .with_max_idle_buffers(8);
/// assert_eq!(config.max_idle_buffers(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolConfig {
    /// Capacity of every chunk in bytes.
    chunk_size: usize,

    /// Idle chunks kept by the chunk pool; extras are freed on release.
    max_idle_chunks: usize,

    /// Hard cap on chunks outstanding from the chunk pool.
    max_live_chunks: Option<usize>,

    /// Idle buffers kept by the buffer pool.
    max_idle_buffers: usize,
}

impl PoolConfig {
    /// Creates a new configuration with the given chunk size.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidConfig`] if `chunk_size` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use chunkbuf::PoolConfig;
    ///
    /// let config = PoolConfig::new(4)?;
    /// assert_eq!(config.chunk_size(), 4);
    /// assert!(PoolConfig::new(0).is_err());
    /// # Ok::<(), chunkbuf::BufferError>(())
    /// ```
    pub fn new(chunk_size: usize) -> Result<Self, BufferError> {
        let config = Self {
            chunk_size,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the chunk size.
    ///
    /// Note: This does not validate the configuration. Use [`PoolConfig::validate`]
    /// to check if the configuration is valid.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Sets how many idle chunks the chunk pool retains.
    pub fn with_max_idle_chunks(mut self, count: usize) -> Self {
        self.max_idle_chunks = count;
        self
    }

    /// Sets the maximum number of chunks that may be live at once.
    ///
    /// `None` (the default) means unbounded.
    pub fn with_max_live_chunks(mut self, limit: Option<usize>) -> Self {
        self.max_live_chunks = limit;
        self
    }

    /// Sets how many idle buffers the buffer pool retains.
    pub fn with_max_idle_buffers(mut self, count: usize) -> Self {
        self.max_idle_buffers = count;
        self
    }

    /// Returns the chunk size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the idle chunk retention limit.
    pub fn max_idle_chunks(&self) -> usize {
        self.max_idle_chunks
    }

    /// Returns the live chunk limit, if any.
    pub fn max_live_chunks(&self) -> Option<usize> {
        self.max_live_chunks
    }

    /// Returns the idle buffer retention limit.
    pub fn max_idle_buffers(&self) -> usize {
        self.max_idle_buffers
    }

    /// Validates the current configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use chunkbuf::PoolConfig;
    ///
    /// let config = PoolConfig::default().with_chunk_size(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), BufferError> {
        if self.chunk_size == 0 {
            return Err(BufferError::InvalidConfig {
                message: "chunk size must be non-zero",
            });
        }

        if self.max_live_chunks == Some(0) {
            return Err(BufferError::InvalidConfig {
                message: "max_live_chunks must be non-zero when set",
            });
        }

        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_idle_chunks: DEFAULT_MAX_IDLE_CHUNKS,
            max_live_chunks: None,
            max_idle_buffers: DEFAULT_MAX_IDLE_BUFFERS,
        }
    }
}
