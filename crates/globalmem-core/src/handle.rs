//! Per-session cursors and positional transfers.
//!
//! A [`Handle`] is the state of one open session: a single offset in
//! `0..=capacity`. It holds no reference to the buffer, so each operation
//! takes the buffer explicitly and the caller decides how access to it is
//! serialised.

use std::fmt;

use smallvec::SmallVec;

use crate::buffer::FixedBuffer;
use crate::error::MemError;
use crate::transfer::{TransferSink, TransferSource};

/// Writes up to this many bytes are staged on the stack.
const INLINE_STAGING: usize = 256;

/// How a seek delta is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SeekMode {
    /// The delta is the new offset.
    Absolute,
    /// The delta is added to the current offset.
    Relative,
}

impl SeekMode {
    /// Raw whence code for [`SeekMode::Absolute`].
    pub const WHENCE_SET: i32 = 0;
    /// Raw whence code for [`SeekMode::Relative`].
    pub const WHENCE_CUR: i32 = 1;

    /// Decode a raw whence code.
    ///
    /// Only `0` (absolute) and `1` (relative) are accepted; end-relative
    /// seeking is not supported.
    pub fn from_whence(whence: i32) -> Result<Self, MemError> {
        match whence {
            Self::WHENCE_SET => Ok(Self::Absolute),
            Self::WHENCE_CUR => Ok(Self::Relative),
            other => Err(MemError::invalid(format!("unsupported seek mode {other}"))),
        }
    }

    /// The raw whence code for this mode.
    pub fn whence(self) -> i32 {
        match self {
            Self::Absolute => Self::WHENCE_SET,
            Self::Relative => Self::WHENCE_CUR,
        }
    }
}

impl TryFrom<i32> for SeekMode {
    type Error = MemError;

    fn try_from(whence: i32) -> Result<Self, Self::Error> {
        Self::from_whence(whence)
    }
}

/// Cursor of one open session.
///
/// Created at offset 0 by [`FixedBuffer::open`] and discarded by
/// [`Handle::release`]. Releasing consumes the handle, so a released
/// session cannot be used again.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct Handle {
    offset: usize,
}

impl Handle {
    pub(crate) fn new() -> Self {
        Self { offset: 0 }
    }

    /// Current offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Copy up to `requested` bytes starting at the current offset into
    /// `dst` and advance past them.
    ///
    /// The count is clipped to what remains before the end of the buffer,
    /// so a read at the end returns `Ok(0)`. On error neither `dst` nor the
    /// offset changes.
    pub fn read<S>(
        &mut self,
        buffer: &FixedBuffer,
        requested: usize,
        dst: &mut S,
    ) -> Result<usize, MemError>
    where
        S: TransferSink + ?Sized,
    {
        let count = requested.min(buffer.remaining(self.offset)?);
        let src = buffer.window(self.offset..self.offset + count)?;
        dst.accept(src)?;
        self.offset += count;
        Ok(count)
    }

    /// Copy as much of `src` as fits before the end of the buffer into
    /// storage at the current offset and advance past it.
    ///
    /// The source is staged in full before storage is touched, so a
    /// faulting source leaves both storage and the offset unchanged.
    pub fn write<S>(&mut self, buffer: &mut FixedBuffer, src: &S) -> Result<usize, MemError>
    where
        S: TransferSource + ?Sized,
    {
        let count = src.offered().min(buffer.remaining(self.offset)?);
        let mut staged: SmallVec<[u8; INLINE_STAGING]> = SmallVec::from_elem(0, count);
        src.copy_into(&mut staged)?;
        buffer
            .window_mut(self.offset..self.offset + count)?
            .copy_from_slice(&staged);
        self.offset += count;
        Ok(count)
    }

    /// Move the cursor and return the new offset.
    ///
    /// The target must land in `0..=capacity`; anything else is
    /// `InvalidArgument` and leaves the offset where it was.
    pub fn seek(
        &mut self,
        buffer: &FixedBuffer,
        delta: i64,
        mode: SeekMode,
    ) -> Result<usize, MemError> {
        let capacity = buffer.capacity();
        let target = match mode {
            SeekMode::Absolute => Some(delta),
            SeekMode::Relative => i64::try_from(self.offset)
                .ok()
                .and_then(|offset| offset.checked_add(delta)),
        };
        let offset = target
            .and_then(|t| usize::try_from(t).ok())
            .filter(|&t| t <= capacity)
            .ok_or_else(|| {
                MemError::invalid(format!(
                    "seek {mode:?} {delta} from {} leaves 0..={capacity}",
                    self.offset
                ))
            })?;
        self.offset = offset;
        Ok(offset)
    }

    /// Zero the whole buffer on behalf of this session.
    ///
    /// Equivalent to [`FixedBuffer::clear`]; the session's offset is kept.
    pub fn reset(&self, buffer: &mut FixedBuffer) {
        buffer.clear();
    }

    /// End the session. Storage and other sessions are unaffected.
    pub fn release(self) {}
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle(off={})", self.offset)
    }
}
