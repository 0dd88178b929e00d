//! The two-call sizing protocol.
//!
//! Services that fill a caller buffer take its size in bytes by pointer. If the buffer is
//! too small they return `BUFFER_TOO_SMALL` and overwrite the size with the number of bytes
//! required; the caller grows the buffer and calls again. Nothing here retries.

use log::trace;
use thiserror::Error;

use crate::EfiStatus;

/// Failure of a service that fills a caller-provided buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    /// The buffer was too small. Call again with at least `required` bytes.
    #[error("buffer too small, {required} bytes required")]
    TooSmall {
        /// Bytes the firmware asked for.
        required: usize,
    },
    /// Any other failure, passed through unchanged.
    #[error("{0}")]
    Status(EfiStatus),
    /// Firmware reported success but claims to have written more than the buffer holds.
    #[error("firmware reported {written} bytes written into a {capacity}-byte buffer")]
    Overrun {
        /// Bytes the firmware reported.
        written: usize,
        /// Size of the buffer that was passed in.
        capacity: usize,
    },
    /// Firmware reported success but returned a null allocation.
    #[error("firmware returned a null allocation")]
    NullAllocation,
}

impl BufferError {
    /// The failure status firmware returned, or `None` when firmware reported success
    /// and the result was inconsistent.
    #[must_use]
    pub fn status(&self) -> Option<EfiStatus> {
        match self {
            Self::TooSmall { .. } => Some(EfiStatus::BUFFER_TOO_SMALL),
            Self::Status(status) => Some(*status),
            Self::Overrun { .. } | Self::NullAllocation => None,
        }
    }
}

/// Interprets the status and size reported by a sizing call.
pub(crate) fn finish(service: &str, status: EfiStatus, reported: usize) -> Result<usize, BufferError> {
    if status == EfiStatus::BUFFER_TOO_SMALL {
        trace!("{service}: buffer too small, {reported} bytes required");
        return Err(BufferError::TooSmall { required: reported });
    }
    status.to_result().map_err(BufferError::Status)?;
    trace!("{service}: {reported} bytes returned");
    Ok(reported)
}
