//! Device-level error types.

use std::error::Error;
use std::fmt;
use std::io;

use globalmem_core::MemError;

use crate::config::ConfigError;
use crate::session::SessionId;

/// Errors returned by [`Device`](crate::Device) operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeviceError {
    /// The buffer rejected the operation.
    Mem(MemError),
    /// The configuration failed validation.
    Config(ConfigError),
    /// The session id was never issued or has been released.
    InvalidHandle {
        /// The unrecognised id.
        session: SessionId,
    },
    /// Teardown was requested while sessions were still open.
    Busy {
        /// Number of sessions still open.
        open_sessions: usize,
    },
    /// A lock was poisoned by a caller that panicked mid-operation.
    Poisoned,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mem(e) => write!(f, "buffer error: {e}"),
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::InvalidHandle { session } => write!(f, "no open session {session}"),
            Self::Busy { open_sessions } => {
                write!(f, "device busy: {open_sessions} session(s) still open")
            }
            Self::Poisoned => write!(f, "device lock poisoned"),
        }
    }
}

impl Error for DeviceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Mem(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MemError> for DeviceError {
    fn from(e: MemError) -> Self {
        Self::Mem(e)
    }
}

impl From<ConfigError> for DeviceError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<DeviceError> for io::Error {
    fn from(e: DeviceError) -> Self {
        let kind = match &e {
            DeviceError::Mem(MemError::OutOfMemory { .. }) => io::ErrorKind::OutOfMemory,
            DeviceError::Mem(MemError::OutOfRange { .. })
            | DeviceError::Mem(MemError::InvalidArgument { .. })
            | DeviceError::Config(_) => io::ErrorKind::InvalidInput,
            DeviceError::Mem(MemError::TransferFault) => io::ErrorKind::InvalidData,
            DeviceError::InvalidHandle { .. } => io::ErrorKind::NotFound,
            DeviceError::Busy { .. } => io::ErrorKind::ResourceBusy,
            DeviceError::Poisoned => io::ErrorKind::Other,
        };
        io::Error::new(kind, e)
    }
}
