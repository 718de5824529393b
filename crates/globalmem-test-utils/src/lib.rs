//! Test utilities and fixtures for globalmem development.
//!
//! Provides fault-injecting `TransferSource` / `TransferSink`
//! implementations (see [`fixtures`]) and small helpers for building
//! buffers and recognisable byte patterns.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use globalmem_core::FixedBuffer;

pub use fixtures::{CountingSink, FaultingSink, FaultingSource};

/// Capacity used by the worked scenarios in the test suites.
pub const SMALL_CAPACITY: usize = 16;

/// A zeroed buffer of [`SMALL_CAPACITY`] bytes.
pub fn small_buffer() -> FixedBuffer {
    buffer(SMALL_CAPACITY)
}

/// A zeroed buffer of `capacity` bytes.
///
/// # Panics
///
/// Panics if the buffer cannot be allocated.
pub fn buffer(capacity: usize) -> FixedBuffer {
    FixedBuffer::with_capacity(capacity).expect("test buffer allocation failed")
}

/// `len` non-zero bytes that differ from their neighbours, starting at
/// `seed`. Zero is skipped so a pattern is never mistaken for cleared
/// storage.
pub fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| match seed.wrapping_add(i as u8) {
            0 => 0xA5,
            b => b,
        })
        .collect()
}

/// Read the whole buffer from offset 0 through a fresh session.
pub fn snapshot(buffer: &FixedBuffer) -> Vec<u8> {
    let mut handle = buffer.open();
    let mut out = Vec::with_capacity(buffer.capacity());
    handle
        .read(buffer, buffer.capacity(), &mut out)
        .expect("full-buffer read failed");
    handle.release();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_has_no_zero_bytes() {
        let p = pattern(600, 0);
        assert_eq!(p.len(), 600);
        assert!(p.iter().all(|&b| b != 0));
    }

    #[test]
    fn snapshot_of_fresh_buffer_is_zero() {
        let buf = small_buffer();
        assert_eq!(snapshot(&buf), vec![0u8; SMALL_CAPACITY]);
    }
}
