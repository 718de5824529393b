//! Buffer configuration parameters.

use crate::error::MemError;

/// Configuration for a [`FixedBuffer`](crate::FixedBuffer).
///
/// The capacity is fixed for the lifetime of the buffer built from it;
/// there is no resize operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferConfig {
    /// Total number of addressable bytes.
    ///
    /// Default: 4096 (`0x1000`). Must be non-zero.
    pub capacity: usize,
}

impl BufferConfig {
    /// Default buffer capacity in bytes.
    pub const DEFAULT_CAPACITY: usize = 0x1000;

    /// Create a config for a buffer of the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Check that the configuration describes a buffer that can exist.
    pub fn validate(&self) -> Result<(), MemError> {
        if self.capacity == 0 {
            return Err(MemError::invalid("buffer capacity must be non-zero"));
        }
        Ok(())
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
