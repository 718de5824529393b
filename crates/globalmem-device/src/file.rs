//! `std::io` view of a session.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use globalmem_core::{ControlCommand, SeekMode};

use crate::device::Device;
use crate::error::DeviceError;
use crate::session::SessionId;

/// An open session that behaves like a file.
///
/// Reads and writes stop short at the end of the buffer (`Ok(0)`), so
/// `write_all` past the end fails with `WriteZero`. `SeekFrom::End` is
/// rejected. The session is released when the file is dropped.
#[derive(Debug)]
pub struct DeviceFile {
    device: Arc<Device>,
    session: SessionId,
}

impl DeviceFile {
    pub(crate) fn new(device: Arc<Device>, session: SessionId) -> Self {
        Self { device, session }
    }

    /// The underlying session id.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// The device this file was opened on.
    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    /// Zero the whole device buffer (the `GLOBALMEM_CLEAR` ioctl).
    pub fn clear(&self) -> Result<(), DeviceError> {
        self.device.control(self.session, ControlCommand::Clear)
    }
}

impl Read for DeviceFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let requested = buf.len();
        Ok(self.device.read(self.session, requested, buf)?)
    }
}

impl Write for DeviceFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.device.write(self.session, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for DeviceFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (delta, mode) = match pos {
            SeekFrom::Start(n) => {
                let n = i64::try_from(n).map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidInput, "seek offset overflows i64")
                })?;
                (n, SeekMode::Absolute)
            }
            SeekFrom::Current(d) => (d, SeekMode::Relative),
            SeekFrom::End(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "end-relative seek is not supported",
                ))
            }
        };
        let offset = self.device.seek(self.session, delta, mode)?;
        Ok(offset as u64)
    }
}

impl Drop for DeviceFile {
    fn drop(&mut self) {
        // Fails only if the lock is poisoned; nothing useful to do then.
        let _ = self.device.release(self.session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceConfig;

    fn file(capacity: usize) -> DeviceFile {
        let dev = Arc::new(Device::new(DeviceConfig::with_capacity(capacity)).unwrap());
        dev.open_file().unwrap()
    }

    #[test]
    fn io_round_trip() {
        let mut f = file(16);
        f.write_all(b"hello").unwrap();
        f.seek(SeekFrom::Start(0)).unwrap();
        let mut out = [0u8; 5];
        f.read_exact(&mut out).unwrap();
        assert_eq!(&out, b"hello");
    }

    #[test]
    fn write_all_past_end_is_write_zero() {
        let mut f = file(4);
        let err = f.write_all(b"too long").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
        assert_eq!(f.stream_position().unwrap(), 4);
    }

    #[test]
    fn read_to_end_stops_at_capacity() {
        let mut f = file(8);
        let mut out = Vec::new();
        assert_eq!(f.read_to_end(&mut out).unwrap(), 8);
        assert_eq!(out, vec![0u8; 8]);
    }

    #[test]
    fn seek_from_end_is_rejected() {
        let mut f = file(8);
        let err = f.seek(SeekFrom::End(0)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn seek_out_of_bounds_is_invalid_input() {
        let mut f = file(8);
        assert_eq!(
            f.seek(SeekFrom::Start(9)).unwrap_err().kind(),
            io::ErrorKind::InvalidInput
        );
        assert_eq!(
            f.seek(SeekFrom::Current(-1)).unwrap_err().kind(),
            io::ErrorKind::InvalidInput
        );
        assert_eq!(f.seek(SeekFrom::Start(8)).unwrap(), 8);
    }

    #[test]
    fn drop_releases_session() {
        let dev = Arc::new(Device::new(DeviceConfig::with_capacity(8)).unwrap());
        let f = dev.open_file().unwrap();
        assert_eq!(dev.open_sessions().unwrap(), 1);
        drop(f);
        assert_eq!(dev.open_sessions().unwrap(), 0);
    }

    #[test]
    fn clear_through_file() {
        let mut f = file(4);
        f.write_all(&[1, 2, 3, 4]).unwrap();
        f.clear().unwrap();
        f.rewind().unwrap();
        let mut out = [9u8; 4];
        f.read_exact(&mut out).unwrap();
        assert_eq!(out, [0; 4]);
    }
}
