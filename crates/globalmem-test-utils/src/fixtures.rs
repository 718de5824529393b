//! Transfer endpoints with scripted failures.
//!
//! - [`FaultingSource`]: offers bytes but faults after N successful copies.
//! - [`FaultingSink`]: accepts bytes but faults after N successful copies.
//! - [`CountingSink`]: never faults; records how many times it was called.

use std::cell::Cell;

use globalmem_core::{TransferFault, TransferSink, TransferSource};

/// A write source that offers `len` bytes of `fill` and faults once it has
/// been copied from `succeed_count` times.
///
/// Models a caller buffer that becomes unmapped mid-session. Uses a `Cell`
/// counter because `TransferSource::copy_into` takes `&self`.
pub struct FaultingSource {
    pub len: usize,
    pub fill: u8,
    pub succeed_count: usize,
    calls: Cell<usize>,
}

impl FaultingSource {
    /// A source that succeeds `succeed_count` times, then faults.
    pub fn new(len: usize, fill: u8, succeed_count: usize) -> Self {
        Self {
            len,
            fill,
            succeed_count,
            calls: Cell::new(0),
        }
    }

    /// A source that faults on the first copy.
    pub fn always(len: usize) -> Self {
        Self::new(len, 0xEE, 0)
    }

    /// How many times `copy_into()` has been called.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl TransferSource for FaultingSource {
    fn offered(&self) -> usize {
        self.len
    }

    fn copy_into(&self, dst: &mut [u8]) -> Result<(), TransferFault> {
        let n = self.calls.get();
        self.calls.set(n + 1);
        if n >= self.succeed_count {
            // Scribble first: the core must not let a partial copy leak
            // into storage.
            dst.iter_mut().take(1).for_each(|b| *b = self.fill);
            return Err(TransferFault);
        }
        dst.fill(self.fill);
        Ok(())
    }
}

/// A read destination that collects bytes and faults once it has accepted
/// `succeed_count` copies.
pub struct FaultingSink {
    pub succeed_count: usize,
    received: Vec<u8>,
    calls: usize,
}

impl FaultingSink {
    /// A sink that succeeds `succeed_count` times, then faults.
    pub fn new(succeed_count: usize) -> Self {
        Self {
            succeed_count,
            received: Vec::new(),
            calls: 0,
        }
    }

    /// A sink that faults on the first copy.
    pub fn always() -> Self {
        Self::new(0)
    }

    /// Bytes accepted so far.
    pub fn received(&self) -> &[u8] {
        &self.received
    }

    /// How many times `accept()` has been called.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl TransferSink for FaultingSink {
    fn accept(&mut self, bytes: &[u8]) -> Result<(), TransferFault> {
        let n = self.calls;
        self.calls += 1;
        if n >= self.succeed_count {
            return Err(TransferFault);
        }
        self.received.extend_from_slice(bytes);
        Ok(())
    }
}

/// A read destination that records each chunk it is handed.
#[derive(Default)]
pub struct CountingSink {
    chunks: Vec<Vec<u8>>,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `accept()` calls so far, including empty ones.
    pub fn calls(&self) -> usize {
        self.chunks.len()
    }

    /// All accepted bytes, concatenated.
    pub fn bytes(&self) -> Vec<u8> {
        self.chunks.concat()
    }

    /// Length of each accepted chunk, in call order.
    pub fn chunk_lens(&self) -> Vec<usize> {
        self.chunks.iter().map(Vec::len).collect()
    }
}

impl TransferSink for CountingSink {
    fn accept(&mut self, bytes: &[u8]) -> Result<(), TransferFault> {
        self.chunks.push(bytes.to_vec());
        Ok(())
    }
}
