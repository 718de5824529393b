//! Fixed-capacity shared byte buffer with cursor-based positional I/O.
//!
//! This is the leaf crate of the globalmem workspace. It owns the storage
//! and the bounds arithmetic; everything that addresses an instance from
//! the outside world (session tables, control codes, errno mapping, the C
//! ABI) lives in `globalmem-device` and `globalmem-ffi`.
//!
//! # Architecture
//!
//! ```text
//! FixedBuffer (one per device, zero-initialised Box<[u8]>)
//! ├── clear() / apply(ControlCommand)   whole-buffer control operations
//! └── Handle × N (one per open session, offset only)
//!     ├── read(&FixedBuffer, len, &mut impl TransferSink)
//!     ├── write(&mut FixedBuffer, &impl TransferSource)
//!     └── seek(&FixedBuffer, delta, SeekMode)
//! ```
//!
//! # Access model
//!
//! The core never locks. Operations that mutate storage take
//! `&mut FixedBuffer`, so whoever embeds the buffer must serialise
//! writers; `globalmem-device` does this with one `Mutex` per device.
//! Handles carry no reference to the buffer, only a cursor, so the
//! borrow checker never ties a session's lifetime to a lock guard.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod control;
pub mod error;
pub mod handle;
pub mod transfer;

// Public re-exports for the primary API surface.
pub use buffer::FixedBuffer;
pub use config::BufferConfig;
pub use control::ControlCommand;
pub use error::MemError;
pub use handle::{Handle, SeekMode};
pub use transfer::{TransferFault, TransferSink, TransferSource};
