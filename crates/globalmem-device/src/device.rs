//! The device: one buffer, many sessions.
//!
//! [`Device`] is what a host registers. It serialises every buffer access
//! through a single `Mutex<FixedBuffer>` and keeps each session's
//! [`Handle`] in a `Mutex<SlotTable>`. Locks are always taken in the
//! order sessions → buffer.

use std::sync::{Arc, Mutex, MutexGuard};

use globalmem_core::{ControlCommand, FixedBuffer, Handle, SeekMode, TransferSink, TransferSource};
use tracing::{debug, info, warn};

use crate::config::{DeviceConfig, DeviceNumber};
use crate::control;
use crate::error::DeviceError;
use crate::file::DeviceFile;
use crate::session::{next_tag, SessionId, SlotTable};

/// A shared byte buffer exposed through open/read/write/seek/ioctl.
///
/// Every method takes `&self`; the device is `Sync` and is usually held in
/// an `Arc` by whatever registered it.
pub struct Device {
    config: DeviceConfig,
    buffer: Mutex<FixedBuffer>,
    sessions: Mutex<SlotTable<Handle>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, DeviceError> {
    mutex.lock().map_err(|_| DeviceError::Poisoned)
}

impl Device {
    /// Validate `config` and allocate the buffer.
    ///
    /// Fails with [`DeviceError::Config`] or, if the buffer cannot be
    /// allocated, [`DeviceError::Mem`] carrying `OutOfMemory`. Nothing is
    /// kept on failure.
    pub fn new(config: DeviceConfig) -> Result<Self, DeviceError> {
        config.validate()?;
        let buffer = FixedBuffer::new(&config.buffer).inspect_err(|e| {
            warn!(device = %config.name, error = %e, "buffer allocation failed");
        })?;
        info!(
            device = %config.name,
            number = %config.number,
            capacity = buffer.capacity(),
            "device initialised"
        );
        Ok(Self {
            config,
            buffer: Mutex::new(buffer),
            sessions: Mutex::new(SlotTable::with_tag(next_tag())),
        })
    }

    /// Node name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Device number.
    pub fn number(&self) -> DeviceNumber {
        self.config.number
    }

    /// Buffer capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.config.buffer.capacity
    }

    /// Number of sessions currently open.
    pub fn open_sessions(&self) -> Result<usize, DeviceError> {
        Ok(lock(&self.sessions)?.len())
    }

    /// Open a session positioned at offset 0.
    pub fn open(&self) -> Result<SessionId, DeviceError> {
        let mut sessions = lock(&self.sessions)?;
        let handle = lock(&self.buffer)?.open();
        let session = SessionId(sessions.insert(handle));
        debug!(device = %self.config.name, %session, "open");
        Ok(session)
    }

    /// Open a session wrapped in a `std::io` adapter.
    pub fn open_file(self: &Arc<Self>) -> Result<DeviceFile, DeviceError> {
        let session = self.open()?;
        Ok(DeviceFile::new(Arc::clone(self), session))
    }

    /// End a session. Releasing an id twice is `InvalidHandle`.
    pub fn release(&self, session: SessionId) -> Result<(), DeviceError> {
        let handle = lock(&self.sessions)?
            .remove(session.0)
            .ok_or(DeviceError::InvalidHandle { session })?;
        handle.release();
        debug!(device = %self.config.name, %session, "release");
        Ok(())
    }

    /// Read up to `requested` bytes at the session's offset into `dst`.
    ///
    /// Returns the number of bytes transferred; 0 once the session is at
    /// the end of the buffer.
    pub fn read<S>(
        &self,
        session: SessionId,
        requested: usize,
        dst: &mut S,
    ) -> Result<usize, DeviceError>
    where
        S: TransferSink + ?Sized,
    {
        let mut sessions = lock(&self.sessions)?;
        let handle = sessions
            .get_mut(session.0)
            .ok_or(DeviceError::InvalidHandle { session })?;
        let buffer = lock(&self.buffer)?;
        let offset = handle.offset();
        let count = handle
            .read(&buffer, requested, dst)
            .inspect_err(|e| {
                warn!(device = %self.config.name, %session, error = %e, "read rejected");
            })?;
        info!(device = %self.config.name, "read {count} byte(s) from {offset}");
        Ok(count)
    }

    /// Read up to `requested` bytes into a new `Vec`.
    pub fn read_vec(&self, session: SessionId, requested: usize) -> Result<Vec<u8>, DeviceError> {
        let mut out = Vec::with_capacity(requested.min(self.capacity()));
        self.read(session, requested, &mut out)?;
        Ok(out)
    }

    /// Write as much of `src` as fits at the session's offset.
    ///
    /// Returns the number of bytes stored; 0 once the session is at the
    /// end of the buffer.
    pub fn write<S>(&self, session: SessionId, src: &S) -> Result<usize, DeviceError>
    where
        S: TransferSource + ?Sized,
    {
        let mut sessions = lock(&self.sessions)?;
        let handle = sessions
            .get_mut(session.0)
            .ok_or(DeviceError::InvalidHandle { session })?;
        let mut buffer = lock(&self.buffer)?;
        let offset = handle.offset();
        let count = handle
            .write(&mut buffer, src)
            .inspect_err(|e| {
                warn!(device = %self.config.name, %session, error = %e, "write rejected");
            })?;
        info!(device = %self.config.name, "written {count} byte(s) from {offset}");
        Ok(count)
    }

    /// Reposition a session and return its new offset.
    pub fn seek(
        &self,
        session: SessionId,
        delta: i64,
        mode: SeekMode,
    ) -> Result<usize, DeviceError> {
        let mut sessions = lock(&self.sessions)?;
        let handle = sessions
            .get_mut(session.0)
            .ok_or(DeviceError::InvalidHandle { session })?;
        let buffer = lock(&self.buffer)?;
        let offset = handle.seek(&buffer, delta, mode).inspect_err(|e| {
            warn!(device = %self.config.name, %session, error = %e, "seek rejected");
        })?;
        debug!(device = %self.config.name, %session, offset, "seek");
        Ok(offset)
    }

    /// [`seek`](Self::seek) with a raw whence code (`0` absolute, `1`
    /// relative).
    pub fn llseek(
        &self,
        session: SessionId,
        delta: i64,
        whence: i32,
    ) -> Result<usize, DeviceError> {
        match SeekMode::from_whence(whence) {
            Ok(mode) => self.seek(session, delta, mode),
            Err(e) => {
                if lock(&self.sessions)?.get(session.0).is_none() {
                    return Err(DeviceError::InvalidHandle { session });
                }
                warn!(device = %self.config.name, %session, error = %e, "seek rejected");
                Err(e.into())
            }
        }
    }

    /// Run a control command on behalf of a session.
    pub fn control(
        &self,
        session: SessionId,
        command: ControlCommand,
    ) -> Result<(), DeviceError> {
        let sessions = lock(&self.sessions)?;
        if sessions.get(session.0).is_none() {
            return Err(DeviceError::InvalidHandle { session });
        }
        lock(&self.buffer)?.apply(command);
        debug!(device = %self.config.name, %session, %command, "control");
        Ok(())
    }

    /// Dispatch a raw ioctl command number.
    ///
    /// Unrecognised commands are ignored and report success once the
    /// session is known to be open. `arg` is
    /// accepted for signature compatibility; no current command reads it.
    pub fn ioctl(&self, session: SessionId, cmd: u32, arg: u64) -> Result<(), DeviceError> {
        match control::decode(cmd) {
            Some(command) => self.control(session, command),
            None => {
                if lock(&self.sessions)?.get(session.0).is_none() {
                    return Err(DeviceError::InvalidHandle { session });
                }
                debug!(
                    device = %self.config.name,
                    %session,
                    arg,
                    "ignoring unknown ioctl {cmd:#x}"
                );
                Ok(())
            }
        }
    }

    /// Zero the buffer without going through a session.
    pub fn clear(&self) -> Result<(), DeviceError> {
        lock(&self.buffer)?.clear();
        debug!(device = %self.config.name, "clear");
        Ok(())
    }

    /// Tear the device down, releasing the buffer.
    ///
    /// Refused with [`DeviceError::Busy`] while any session is open; the
    /// device is handed back unchanged in that case.
    pub fn shutdown(self) -> Result<(), (Self, DeviceError)> {
        match self.open_sessions() {
            Ok(0) => {
                info!(
                    device = %self.config.name,
                    number = %self.config.number,
                    "device removed"
                );
                Ok(())
            }
            Ok(open_sessions) => {
                warn!(device = %self.config.name, open_sessions, "shutdown refused");
                Err((self, DeviceError::Busy { open_sessions }))
            }
            Err(e) => Err((self, e)),
        }
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("name", &self.config.name)
            .field("number", &self.config.number)
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}
