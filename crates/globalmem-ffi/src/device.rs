//! Device lifecycle and file operations.
//!
//! Devices live in a process-wide slot+generation table and are handed out
//! as `Arc`s, so the table lock is held only for the lookup. Each device
//! serialises its own buffer access. Session handles are the device's own
//! session ids and are only meaningful together with the device they were
//! opened on.

use std::sync::{Arc, Mutex};

use globalmem_device::{Device, DeviceConfig, SessionId, SlotTable};
use tracing::debug;

use crate::status::GlobalmemStatus;

static DEVICES: Mutex<SlotTable<Arc<Device>>> = Mutex::new(SlotTable::new());

/// Clone the `Arc` behind a device handle.
fn get_device(handle: u64) -> Result<Arc<Device>, GlobalmemStatus> {
    let table = DEVICES.lock().map_err(|_| GlobalmemStatus::Poisoned)?;
    table
        .get(handle)
        .cloned()
        .ok_or(GlobalmemStatus::InvalidHandle)
}

macro_rules! device_or_return {
    ($handle:expr) => {
        match get_device($handle) {
            Ok(device) => device,
            Err(status) => return status as i32,
        }
    };
}

/// Create a device with a `capacity`-byte zeroed buffer.
///
/// On success writes the device handle to `device_out`. A zero capacity is
/// `InvalidArgument`; a failed allocation is `OutOfMemory`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn globalmem_create(capacity: usize, device_out: *mut u64) -> i32 {
    ffi_guard!({
        if device_out.is_null() {
            return GlobalmemStatus::InvalidArgument as i32;
        }
        let device = match Device::new(DeviceConfig::with_capacity(capacity)) {
            Ok(d) => d,
            Err(e) => return GlobalmemStatus::from(&e) as i32,
        };
        let handle = ffi_lock!(DEVICES).insert(Arc::new(device));
        // SAFETY: device_out is non-null and valid per caller contract.
        unsafe { *device_out = handle };
        GlobalmemStatus::Ok as i32
    })
}

/// Destroy a device and free its buffer.
///
/// Refused with `Busy` while any session on it is still open or another
/// call is still using it.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn globalmem_destroy(device: u64) -> i32 {
    ffi_guard!({
        let mut table = ffi_lock!(DEVICES);
        let Some(entry) = table.get(device) else {
            return GlobalmemStatus::InvalidHandle as i32;
        };
        // Clones are only taken under the table lock, so a count of one
        // means no call is in flight and none can start before removal.
        if Arc::strong_count(entry) > 1 {
            debug!("destroy refused while a call is in flight");
            return GlobalmemStatus::Busy as i32;
        }
        match entry.open_sessions() {
            Ok(0) => {}
            Ok(_) => return GlobalmemStatus::Busy as i32,
            Err(e) => return GlobalmemStatus::from(&e) as i32,
        }
        let Some(entry) = table.remove(device) else {
            return GlobalmemStatus::InvalidHandle as i32;
        };
        drop(table);

        // Sole owner with no sessions: shutdown cannot be refused.
        if let Ok(device) = Arc::try_unwrap(entry) {
            if let Err((_, e)) = device.shutdown() {
                debug!(error = %e, "shutdown after removal reported an error");
            }
        }
        GlobalmemStatus::Ok as i32
    })
}

/// Open a session at offset 0 and write its handle to `file_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn globalmem_open(device: u64, file_out: *mut u64) -> i32 {
    ffi_guard!({
        if file_out.is_null() {
            return GlobalmemStatus::InvalidArgument as i32;
        }
        let device = device_or_return!(device);
        match device.open() {
            Ok(session) => {
                // SAFETY: file_out is non-null and valid per caller contract.
                unsafe { *file_out = session.0 };
                GlobalmemStatus::Ok as i32
            }
            Err(e) => GlobalmemStatus::from(&e) as i32,
        }
    })
}

/// Close a session.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn globalmem_release(device: u64, file: u64) -> i32 {
    ffi_guard!({
        let device = device_or_return!(device);
        match device.release(SessionId(file)) {
            Ok(()) => GlobalmemStatus::Ok as i32,
            Err(e) => GlobalmemStatus::from(&e) as i32,
        }
    })
}

/// Read up to `len` bytes at the session's offset into `buf`.
///
/// The number of bytes copied is written to `count_out`; 0 means the
/// session is at the end of the buffer. `buf` may be null only when `len`
/// is 0.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn globalmem_read(
    device: u64,
    file: u64,
    buf: *mut u8,
    len: usize,
    count_out: *mut usize,
) -> i32 {
    ffi_guard!({
        if count_out.is_null() {
            return GlobalmemStatus::InvalidArgument as i32;
        }
        let device = device_or_return!(device);
        if buf.is_null() && len > 0 {
            return GlobalmemStatus::TransferFault as i32;
        }
        let dst: &mut [u8] = if len == 0 {
            &mut []
        } else {
            // SAFETY: buf is non-null and points to `len` writable bytes per
            // caller contract.
            unsafe { std::slice::from_raw_parts_mut(buf, len) }
        };
        match device.read(SessionId(file), len, dst) {
            Ok(count) => {
                // SAFETY: count_out is non-null and valid per caller contract.
                unsafe { *count_out = count };
                GlobalmemStatus::Ok as i32
            }
            Err(e) => GlobalmemStatus::from(&e) as i32,
        }
    })
}

/// Write up to `len` bytes from `buf` at the session's offset.
///
/// The number of bytes stored is written to `count_out`; 0 means the
/// session is at the end of the buffer. `buf` may be null only when `len`
/// is 0.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn globalmem_write(
    device: u64,
    file: u64,
    buf: *const u8,
    len: usize,
    count_out: *mut usize,
) -> i32 {
    ffi_guard!({
        if count_out.is_null() {
            return GlobalmemStatus::InvalidArgument as i32;
        }
        let device = device_or_return!(device);
        if buf.is_null() && len > 0 {
            return GlobalmemStatus::TransferFault as i32;
        }
        let src: &[u8] = if len == 0 {
            &[]
        } else {
            // SAFETY: buf is non-null and points to `len` readable bytes per
            // caller contract.
            unsafe { std::slice::from_raw_parts(buf, len) }
        };
        match device.write(SessionId(file), src) {
            Ok(count) => {
                // SAFETY: count_out is non-null and valid per caller contract.
                unsafe { *count_out = count };
                GlobalmemStatus::Ok as i32
            }
            Err(e) => GlobalmemStatus::from(&e) as i32,
        }
    })
}

/// Reposition a session. `whence` is 0 (absolute) or 1 (relative to the
/// current offset); the new offset is written to `offset_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn globalmem_llseek(
    device: u64,
    file: u64,
    offset: i64,
    whence: i32,
    offset_out: *mut i64,
) -> i32 {
    ffi_guard!({
        if offset_out.is_null() {
            return GlobalmemStatus::InvalidArgument as i32;
        }
        let device = device_or_return!(device);
        match device.llseek(SessionId(file), offset, whence) {
            Ok(pos) => {
                // SAFETY: offset_out is non-null and valid per caller contract.
                unsafe { *offset_out = pos as i64 };
                GlobalmemStatus::Ok as i32
            }
            Err(e) => GlobalmemStatus::from(&e) as i32,
        }
    })
}

/// Issue a control command. Unknown command numbers are ignored.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn globalmem_ioctl(device: u64, file: u64, cmd: u32, arg: u64) -> i32 {
    ffi_guard!({
        let device = device_or_return!(device);
        match device.ioctl(SessionId(file), cmd, arg) {
            Ok(()) => GlobalmemStatus::Ok as i32,
            Err(e) => GlobalmemStatus::from(&e) as i32,
        }
    })
}

/// Buffer capacity in bytes. Returns 0 for invalid handles.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn globalmem_capacity(device: u64) -> usize {
    get_device(device).map_or(0, |d| d.capacity())
}
