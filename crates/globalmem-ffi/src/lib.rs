//! C ABI for globalmem devices.
//!
//! Devices and sessions cross the boundary as opaque `u64` handles. Every
//! entry point returns a [`GlobalmemStatus`] code as `i32` and writes its
//! results through caller-supplied out-pointers. This is the only crate in
//! the workspace that contains `unsafe` code.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::cell::RefCell;
use std::ffi::c_char;

thread_local! {
    static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Remember the payload of a caught panic for [`globalmem_last_panic_message`].
pub(crate) fn record_panic(payload: &(dyn std::any::Any + Send)) {
    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    };
    tracing::error!(panic = %msg, "panic caught at FFI boundary");
    LAST_PANIC.with(|cell| *cell.borrow_mut() = msg);
}

/// Run an FFI body, turning a panic into `GlobalmemStatus::Panicked`.
macro_rules! ffi_guard {
    ($body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| -> i32 { $body })) {
            Ok(code) => code,
            Err(payload) => {
                $crate::record_panic(payload.as_ref());
                $crate::status::GlobalmemStatus::Panicked as i32
            }
        }
    };
}

/// Lock a mutex inside [`ffi_guard!`], returning `Poisoned` on failure.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::GlobalmemStatus::Poisoned as i32,
        }
    };
}

pub mod device;
pub mod status;

pub use device::{
    globalmem_capacity, globalmem_create, globalmem_destroy, globalmem_ioctl, globalmem_llseek,
    globalmem_open, globalmem_read, globalmem_release, globalmem_write,
};
pub use status::GlobalmemStatus;

/// Copy the last panic message caught on this thread into `buf`.
///
/// Returns the full message length in bytes, excluding the terminator. The
/// copy is truncated to `cap - 1` bytes and NUL-terminated. Pass a null
/// `buf` to query the length. Returns 0 if no panic has been recorded.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn globalmem_last_panic_message(buf: *mut c_char, cap: usize) -> i64 {
    LAST_PANIC.with(|cell| {
        let msg = cell.borrow();
        if !buf.is_null() && cap > 0 {
            let n = msg.len().min(cap - 1);
            // SAFETY: buf points to at least `cap` writable bytes per caller
            // contract, and n < cap.
            unsafe {
                std::ptr::copy_nonoverlapping(msg.as_ptr(), buf.cast::<u8>(), n);
                *buf.add(n) = 0;
            }
        }
        msg.len() as i64
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_passes_status_through() {
        let status = ffi_guard!({ GlobalmemStatus::Busy as i32 });
        assert_eq!(status, -16);
    }

    #[test]
    fn guard_catches_panic_and_stores_message() {
        LAST_PANIC.with(|cell| cell.borrow_mut().clear());
        let status = ffi_guard!({
            panic!("deliberate panic in guard test");
        });
        assert_eq!(status, GlobalmemStatus::Panicked as i32);

        let len = globalmem_last_panic_message(std::ptr::null_mut(), 0);
        assert!(len > 0);
        let mut buf = vec![0u8; len as usize + 1];
        let again = globalmem_last_panic_message(buf.as_mut_ptr().cast(), buf.len());
        assert_eq!(len, again);
        let msg = std::str::from_utf8(&buf[..len as usize]).unwrap();
        assert!(msg.contains("deliberate panic in guard test"));
        assert_eq!(buf[len as usize], 0);
    }

    #[test]
    fn panic_message_is_truncated_to_buffer() {
        LAST_PANIC.with(|cell| *cell.borrow_mut() = "abcdef".to_owned());
        let mut buf = [0xFFu8; 4];
        assert_eq!(globalmem_last_panic_message(buf.as_mut_ptr().cast(), 4), 6);
        assert_eq!(&buf, b"abc\0");
    }

    #[test]
    fn no_panic_recorded_is_zero() {
        LAST_PANIC.with(|cell| cell.borrow_mut().clear());
        assert_eq!(globalmem_last_panic_message(std::ptr::null_mut(), 0), 0);
    }
}
