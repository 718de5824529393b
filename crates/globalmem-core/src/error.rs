//! Error types for buffer and handle operations.

use std::error::Error;
use std::fmt;

use crate::transfer::TransferFault;

/// Errors that can occur while creating or accessing a [`FixedBuffer`].
///
/// No variant leaves partial state behind: a failed operation mutates
/// neither storage nor the handle's offset.
///
/// [`FixedBuffer`]: crate::FixedBuffer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemError {
    /// Storage allocation could not be satisfied at creation time.
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
    },
    /// A transfer started from an offset past the end of the buffer.
    ///
    /// Seeking on the same buffer can never produce this; it arises when a
    /// handle is presented to a buffer smaller than the one it was
    /// positioned against.
    OutOfRange {
        /// The handle's offset at the start of the transfer.
        offset: usize,
        /// Capacity of the buffer the transfer was attempted against.
        capacity: usize,
    },
    /// A seek target, seek mode, or construction parameter was rejected.
    InvalidArgument {
        /// Human-readable description of the rejected argument.
        reason: String,
    },
    /// The caller-side memory could not be read from or written to.
    TransferFault,
}

impl MemError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested } => {
                write!(f, "out of memory: could not allocate {requested} bytes")
            }
            Self::OutOfRange { offset, capacity } => {
                write!(f, "offset {offset} is past the end of a {capacity}-byte buffer")
            }
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::TransferFault => write!(f, "caller buffer could not be accessed"),
        }
    }
}

impl Error for MemError {}

impl From<TransferFault> for MemError {
    fn from(_: TransferFault) -> Self {
        Self::TransferFault
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offsets() {
        let e = MemError::OutOfRange {
            offset: 20,
            capacity: 16,
        };
        assert_eq!(e.to_string(), "offset 20 is past the end of a 16-byte buffer");
    }

    #[test]
    fn transfer_fault_converts() {
        assert_eq!(MemError::from(TransferFault), MemError::TransferFault);
    }
}
