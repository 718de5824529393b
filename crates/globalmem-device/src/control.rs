//! ioctl-style control codes.
//!
//! Command numbers use the Linux `_IOC` layout so a host can forward raw
//! `ioctl(2)` requests unchanged:
//!
//! ```text
//!  31  30 29          16 15        8 7         0
//! ┌──────┬──────────────┬───────────┬───────────┐
//! │ dir  │     size     │   type    │    nr     │
//! └──────┴──────────────┴───────────┴───────────┘
//! ```

use globalmem_core::ControlCommand;

const NR_SHIFT: u32 = 0;
const TYPE_SHIFT: u32 = 8;
const SIZE_SHIFT: u32 = 16;
const DIR_SHIFT: u32 = 30;

/// Transfer direction: no argument payload.
pub const IOC_NONE: u32 = 0;
/// Transfer direction: userspace writes an argument.
pub const IOC_WRITE: u32 = 1;
/// Transfer direction: userspace reads an argument.
pub const IOC_READ: u32 = 2;

/// Type byte shared by every globalmem command.
pub const GLOBALMEM_MAGIC: u8 = b'g';

/// Zero the whole buffer (`_IO('g', 0)`).
pub const GLOBALMEM_CLEAR: u32 = io(GLOBALMEM_MAGIC, 0);

/// Encode a command number (`_IOC`).
pub const fn ioc(dir: u32, ty: u8, nr: u8, size: u32) -> u32 {
    (dir << DIR_SHIFT)
        | ((size & 0x3FFF) << SIZE_SHIFT)
        | ((ty as u32) << TYPE_SHIFT)
        | ((nr as u32) << NR_SHIFT)
}

/// Encode a command that carries no argument (`_IO`).
pub const fn io(ty: u8, nr: u8) -> u32 {
    ioc(IOC_NONE, ty, nr, 0)
}

/// Type byte of an encoded command.
pub const fn ioc_type(cmd: u32) -> u8 {
    (cmd >> TYPE_SHIFT) as u8
}

/// Sequence number of an encoded command.
pub const fn ioc_nr(cmd: u32) -> u8 {
    (cmd >> NR_SHIFT) as u8
}

/// Map a raw command number to a buffer control command.
///
/// Returns `None` for anything this device does not implement, including
/// commands that belong to other drivers.
pub fn decode(cmd: u32) -> Option<ControlCommand> {
    match cmd {
        GLOBALMEM_CLEAR => Some(ControlCommand::Clear),
        _ => None,
    }
}

/// The raw command number for a control command.
pub fn encode(command: ControlCommand) -> u32 {
    match command {
        ControlCommand::Clear => GLOBALMEM_CLEAR,
    }
}
