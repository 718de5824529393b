//! Whole-buffer control commands.

use std::fmt;

/// A control operation that acts on the entire buffer rather than at a
/// session's offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlCommand {
    /// Overwrite every byte with zero.
    Clear,
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clear => write!(f, "clear"),
        }
    }
}
