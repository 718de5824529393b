//! The fixed-capacity byte store.
//!
//! A [`FixedBuffer`] is a zero-initialised `Box<[u8]>` allocated once and
//! never resized. Every positional access goes through a checked range, so
//! an out-of-bounds copy is an `Err`, not a panic or a stray write.

use std::fmt;
use std::ops::Range;

use crate::config::BufferConfig;
use crate::control::ControlCommand;
use crate::error::MemError;
use crate::handle::Handle;

/// A single shared byte buffer of constant capacity.
///
/// All sessions opened against a buffer see the same bytes. The buffer
/// does not track its sessions; a [`Handle`] is only a cursor.
pub struct FixedBuffer {
    /// Backing storage. Length equals capacity for the buffer's lifetime.
    storage: Box<[u8]>,
}

impl FixedBuffer {
    /// Allocate a zeroed buffer sized by `config`.
    pub fn new(config: &BufferConfig) -> Result<Self, MemError> {
        Self::with_capacity(config.capacity)
    }

    /// Allocate a zeroed buffer of exactly `capacity` bytes.
    ///
    /// Returns `MemError::OutOfMemory` if the allocator refuses the
    /// request and `MemError::InvalidArgument` for a zero capacity. Nothing
    /// is retained on failure.
    pub fn with_capacity(capacity: usize) -> Result<Self, MemError> {
        BufferConfig::new(capacity).validate()?;
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| MemError::OutOfMemory {
                requested: capacity,
            })?;
        storage.resize(capacity, 0);
        Ok(Self {
            storage: storage.into_boxed_slice(),
        })
    }

    /// Total number of addressable bytes.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Open a new session positioned at offset 0.
    pub fn open(&self) -> Handle {
        Handle::new()
    }

    /// Zero every byte, regardless of any session's offset.
    ///
    /// Offsets are not touched; a session positioned mid-buffer keeps its
    /// position and will read zeros from there on.
    pub fn clear(&mut self) {
        self.storage.fill(0);
    }

    /// Run a control command against the whole buffer.
    pub fn apply(&mut self, command: ControlCommand) {
        match command {
            ControlCommand::Clear => self.clear(),
        }
    }

    /// The full contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage
    }

    /// Bytes remaining after `offset`, or `OutOfRange` if `offset` lies
    /// past the end.
    pub(crate) fn remaining(&self, offset: usize) -> Result<usize, MemError> {
        self.capacity()
            .checked_sub(offset)
            .ok_or(MemError::OutOfRange {
                offset,
                capacity: self.capacity(),
            })
    }

    /// Shared view of `range`.
    pub(crate) fn window(&self, range: Range<usize>) -> Result<&[u8], MemError> {
        let capacity = self.capacity();
        let start = range.start;
        self.storage
            .get(range)
            .ok_or(MemError::OutOfRange {
                offset: start,
                capacity,
            })
    }

    /// Mutable view of `range`.
    pub(crate) fn window_mut(&mut self, range: Range<usize>) -> Result<&mut [u8], MemError> {
        let capacity = self.capacity();
        let start = range.start;
        self.storage
            .get_mut(range)
            .ok_or(MemError::OutOfRange {
                offset: start,
                capacity,
            })
    }
}

impl fmt::Debug for FixedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedBuffer")
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}
