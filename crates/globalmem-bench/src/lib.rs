//! Benchmark fixtures for globalmem.
//!
//! - [`page_buffer`]: a default-capacity (one page) buffer
//! - [`page_device`]: a default-configured device behind an `Arc`
//! - [`payload`]: deterministic transfer data

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use globalmem_core::{BufferConfig, FixedBuffer};
use globalmem_device::{Device, DeviceConfig};

/// Capacity used by every benchmark fixture.
pub const BENCH_CAPACITY: usize = BufferConfig::DEFAULT_CAPACITY;

/// A zeroed buffer of [`BENCH_CAPACITY`] bytes.
pub fn page_buffer() -> FixedBuffer {
    FixedBuffer::new(&BufferConfig::default()).unwrap()
}

/// A default-configured device of [`BENCH_CAPACITY`] bytes.
pub fn page_device() -> Arc<Device> {
    Arc::new(Device::new(DeviceConfig::default()).unwrap())
}

/// `len` bytes of a repeating ramp starting at `seed`.
pub fn payload(len: usize, seed: u8) -> Vec<u8> {
    (0..len).map(|i| seed.wrapping_add(i as u8)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_have_bench_capacity() {
        assert_eq!(page_buffer().capacity(), BENCH_CAPACITY);
        assert_eq!(page_device().capacity(), BENCH_CAPACITY);
    }

    #[test]
    fn payload_is_deterministic() {
        assert_eq!(payload(4, 254), vec![254, 255, 0, 1]);
        assert_eq!(payload(300, 7), payload(300, 7));
    }
}
