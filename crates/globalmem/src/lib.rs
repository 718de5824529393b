//! globalmem: a fixed-capacity byte buffer shared by every session that
//! opens it, with per-session offsets, clipped transfers and a single
//! "clear" control command.
//!
//! This is the facade crate that re-exports the public API of the
//! globalmem sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use std::io::{Read, Seek, SeekFrom, Write};
//! use std::sync::Arc;
//! use globalmem::prelude::*;
//!
//! let dev = Arc::new(Device::new(DeviceConfig::default()).unwrap());
//! let mut file = dev.open_file().unwrap();
//! file.write_all(b"hello").unwrap();
//! file.seek(SeekFrom::Start(0)).unwrap();
//!
//! let mut out = [0u8; 5];
//! file.read_exact(&mut out).unwrap();
//! assert_eq!(&out, b"hello");
//!
//! file.clear().unwrap();
//! file.rewind().unwrap();
//! file.read_exact(&mut out).unwrap();
//! assert_eq!(out, [0; 5]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`buffer`] | `globalmem-core` | `FixedBuffer`, `Handle`, transfer traits |
//! | [`device`] | `globalmem-device` | `Device`, sessions, ioctl codes, `DeviceFile` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// The buffer and its cursors (`globalmem-core`).
///
/// Use this directly to embed a [`buffer::FixedBuffer`] in your own
/// synchronisation scheme.
pub use globalmem_core as buffer;

/// The character-device front end (`globalmem-device`).
pub use globalmem_device as device;

/// Common imports.
///
/// ```rust
/// use globalmem::prelude::*;
/// ```
pub mod prelude {
    pub use globalmem_core::{
        BufferConfig, ControlCommand, FixedBuffer, Handle, MemError, SeekMode, TransferSink,
        TransferSource,
    };
    pub use globalmem_device::{
        Device, DeviceConfig, DeviceError, DeviceFile, DeviceNumber, SessionId, GLOBALMEM_CLEAR,
    };
}
