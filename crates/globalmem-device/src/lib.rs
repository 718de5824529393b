//! Character-device style front end for a globalmem buffer.
//!
//! [`Device`] is the composition root that embeds one
//! [`FixedBuffer`](globalmem_core::FixedBuffer): it owns the buffer behind
//! a `Mutex`, tracks open sessions in a slot+generation table, decodes
//! ioctl-style control codes and reports transfers through `tracing`.
//! [`DeviceFile`] wraps a session in `std::io::{Read, Write, Seek}`.
//!
//! Nothing here is global. A host that wants a single well-known instance
//! constructs one `Device` and keeps it for as long as it is registered.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod control;
pub mod device;
pub mod error;
pub mod file;
pub mod session;

pub use config::{ConfigError, DeviceConfig, DeviceNumber};
pub use control::GLOBALMEM_CLEAR;
pub use device::Device;
pub use error::DeviceError;
pub use file::DeviceFile;
pub use session::{SessionId, SlotTable};
