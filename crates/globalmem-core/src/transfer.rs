//! Caller-side endpoints of a read or write.
//!
//! A transfer moves bytes between the buffer and memory the core does not
//! own. That memory may be unreachable (a null pointer from the C ABI, a
//! destination too short for what it asked for), so both directions go
//! through a fallible trait instead of a bare slice copy.
//!
//! Implementations must be all-or-nothing: on `Err(TransferFault)` no
//! byte of the destination may have been changed.

use std::error::Error;
use std::fmt;

/// The caller-side memory of a transfer could not be accessed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransferFault;

impl fmt::Display for TransferFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transfer fault")
    }
}

impl Error for TransferFault {}

/// Destination of a read.
pub trait TransferSink {
    /// Copy all of `bytes` into the destination, or nothing at all.
    fn accept(&mut self, bytes: &[u8]) -> Result<(), TransferFault>;
}

/// Source of a write.
pub trait TransferSource {
    /// Number of bytes the caller offers.
    fn offered(&self) -> usize;

    /// Copy the first `dst.len()` offered bytes into `dst`.
    ///
    /// `dst.len()` never exceeds [`offered`](TransferSource::offered).
    fn copy_into(&self, dst: &mut [u8]) -> Result<(), TransferFault>;
}

/// Writes into the front of the slice. Faults if the slice is shorter
/// than the data handed to it.
impl TransferSink for [u8] {
    fn accept(&mut self, bytes: &[u8]) -> Result<(), TransferFault> {
        let dst = self.get_mut(..bytes.len()).ok_or(TransferFault)?;
        dst.copy_from_slice(bytes);
        Ok(())
    }
}

/// Appends; never faults.
impl TransferSink for Vec<u8> {
    fn accept(&mut self, bytes: &[u8]) -> Result<(), TransferFault> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl TransferSource for [u8] {
    fn offered(&self) -> usize {
        self.len()
    }

    fn copy_into(&self, dst: &mut [u8]) -> Result<(), TransferFault> {
        let src = self.get(..dst.len()).ok_or(TransferFault)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

impl TransferSource for Vec<u8> {
    fn offered(&self) -> usize {
        self.len()
    }

    fn copy_into(&self, dst: &mut [u8]) -> Result<(), TransferFault> {
        self.as_slice().copy_into(dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_sink_copies_into_prefix() {
        let mut dst = [9u8; 4];
        dst[..].accept(&[1, 2]).unwrap();
        assert_eq!(dst, [1, 2, 9, 9]);
    }

    #[test]
    fn short_slice_sink_faults_without_writing() {
        let mut dst = [9u8; 2];
        assert_eq!(dst[..].accept(&[1, 2, 3]), Err(TransferFault));
        assert_eq!(dst, [9, 9]);
    }

    #[test]
    fn vec_sink_appends() {
        let mut dst = vec![7u8];
        dst.accept(&[1, 2]).unwrap();
        assert_eq!(dst, vec![7, 1, 2]);
    }

    #[test]
    fn slice_source_fills_prefix() {
        let src = [1u8, 2, 3];
        let mut dst = [0u8; 2];
        src[..].copy_into(&mut dst).unwrap();
        assert_eq!(dst, [1, 2]);
    }

    #[test]
    fn short_slice_source_faults() {
        let src = [1u8];
        let mut dst = [0u8; 2];
        assert_eq!(src[..].copy_into(&mut dst), Err(TransferFault));
        assert_eq!(dst, [0, 0]);
    }

    #[test]
    fn vec_source_reports_offered_len() {
        let src = vec![1u8, 2, 3];
        assert_eq!(src.offered(), 3);
    }
}
