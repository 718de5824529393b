//! C-compatible status codes.
//!
//! Values follow the negative-errno convention of a character driver so a
//! host shim can hand them straight back to the kernel or libc caller.

use globalmem_core::MemError;
use globalmem_device::{ConfigError, DeviceError};

/// Status code returned by every FFI function.
///
/// `Ok` = 0, every error is negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlobalmemStatus {
    /// Success.
    Ok = 0,
    /// Device lock poisoned by an earlier panic (`-EIO`).
    Poisoned = -5,
    /// Device or session handle is unknown or already released (`-EBADF`).
    InvalidHandle = -9,
    /// Buffer allocation failed, or the position lies past the end of the
    /// buffer (`-ENOMEM`).
    OutOfMemory = -12,
    /// A caller-side buffer could not be copied (`-EFAULT`).
    TransferFault = -14,
    /// Device still has open sessions (`-EBUSY`).
    Busy = -16,
    /// Bad seek target, whence, configuration, or null out-pointer
    /// (`-EINVAL`).
    InvalidArgument = -22,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&MemError> for GlobalmemStatus {
    fn from(e: &MemError) -> Self {
        match e {
            MemError::OutOfMemory { .. } | MemError::OutOfRange { .. } => Self::OutOfMemory,
            MemError::InvalidArgument { .. } => Self::InvalidArgument,
            MemError::TransferFault => Self::TransferFault,
        }
    }
}

impl From<&ConfigError> for GlobalmemStatus {
    fn from(_e: &ConfigError) -> Self {
        Self::InvalidArgument
    }
}

impl From<&DeviceError> for GlobalmemStatus {
    fn from(e: &DeviceError) -> Self {
        match e {
            DeviceError::Mem(e) => Self::from(e),
            DeviceError::Config(e) => Self::from(e),
            DeviceError::InvalidHandle { .. } => Self::InvalidHandle,
            DeviceError::Busy { .. } => Self::Busy,
            DeviceError::Poisoned => Self::Poisoned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use globalmem_device::SessionId;

    #[test]
    fn status_code_values_are_stable() {
        assert_eq!(GlobalmemStatus::Ok as i32, 0);
        assert_eq!(GlobalmemStatus::Poisoned as i32, -5);
        assert_eq!(GlobalmemStatus::InvalidHandle as i32, -9);
        assert_eq!(GlobalmemStatus::OutOfMemory as i32, -12);
        assert_eq!(GlobalmemStatus::TransferFault as i32, -14);
        assert_eq!(GlobalmemStatus::Busy as i32, -16);
        assert_eq!(GlobalmemStatus::InvalidArgument as i32, -22);
        assert_eq!(GlobalmemStatus::Panicked as i32, -128);
    }

    #[test]
    fn mem_error_to_status() {
        assert_eq!(
            GlobalmemStatus::from(&MemError::OutOfMemory { requested: 1 }),
            GlobalmemStatus::OutOfMemory
        );
        assert_eq!(
            GlobalmemStatus::from(&MemError::OutOfRange {
                offset: 9,
                capacity: 8
            }),
            GlobalmemStatus::OutOfMemory
        );
        assert_eq!(
            GlobalmemStatus::from(&MemError::InvalidArgument {
                reason: "x".into()
            }),
            GlobalmemStatus::InvalidArgument
        );
        assert_eq!(
            GlobalmemStatus::from(&MemError::TransferFault),
            GlobalmemStatus::TransferFault
        );
    }

    #[test]
    fn device_error_to_status() {
        assert_eq!(
            GlobalmemStatus::from(&DeviceError::Config(ConfigError::ZeroCapacity)),
            GlobalmemStatus::InvalidArgument
        );
        assert_eq!(
            GlobalmemStatus::from(&DeviceError::InvalidHandle {
                session: SessionId(0)
            }),
            GlobalmemStatus::InvalidHandle
        );
        assert_eq!(
            GlobalmemStatus::from(&DeviceError::Busy { open_sessions: 2 }),
            GlobalmemStatus::Busy
        );
        assert_eq!(
            GlobalmemStatus::from(&DeviceError::Poisoned),
            GlobalmemStatus::Poisoned
        );
        assert_eq!(
            GlobalmemStatus::from(&DeviceError::Mem(MemError::TransferFault)),
            GlobalmemStatus::TransferFault
        );
    }
}
