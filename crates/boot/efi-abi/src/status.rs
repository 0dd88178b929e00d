//! UEFI Status codes.
//!
//! This module defines [`Status`], a transparent wrapper around the native unsigned word that
//! represents `EFI_STATUS`. Status codes are categorized into three groups:
//!
//! - **Success** (`0`): The operation completed successfully.
//! - **Warnings** (`1..ERROR_BIT`): The operation completed with a non-fatal condition.
//! - **Errors** (`ERROR_BIT..`): The operation failed.
//!
//! `ERROR_BIT` is the top bit of the *native* word: bit 31 for [`Word32`], bit 63 for
//! [`Word64`]. [`EfiStatus`] is the status type of the build target; the explicitly sized
//! forms exist so both encodings can be used and checked from any host.

use core::fmt;
use core::hash::{Hash, Hasher};

use crate::word::{Native, NativeWord, Word32, Word64};

/// A UEFI status code for a native word of width `W`.
///
/// Use [`is_success`](Status::is_success), [`is_warning`](Status::is_warning), and
/// [`is_error`](Status::is_error) to classify the status, or
/// [`to_result`](Status::to_result) for ergonomic error handling.
#[repr(transparent)]
pub struct Status<W: NativeWord = Native>(pub W::Uint);

/// The status type of the build target (`EFI_STATUS`).
pub type EfiStatus = Status<Native>;

/// The class a status code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// The value `0`.
    Success,
    /// Non-zero with the error bit clear.
    Warning,
    /// The error bit is set.
    Error,
}

impl<W: NativeWord> Status<W> {
    /// Builds an error code: the class bit of the native word combined with `ordinal`.
    ///
    /// Bits of `ordinal` that overlap the class bit are discarded.
    #[must_use]
    pub fn error_code(ordinal: u32) -> Self {
        Self(W::ERROR_BIT | (W::Uint::from(ordinal) & !W::ERROR_BIT))
    }

    /// Builds a warning code from `ordinal`.
    ///
    /// Bits of `ordinal` that overlap the class bit are discarded, so the result never
    /// classifies as an error.
    #[must_use]
    pub fn warning_code(ordinal: u32) -> Self {
        Self(W::Uint::from(ordinal) & !W::ERROR_BIT)
    }

    /// Returns `true` if this status code indicates success.
    #[inline]
    #[must_use]
    pub fn is_success(self) -> bool {
        self.0 == W::ZERO
    }

    /// Returns `true` if this status code indicates an error (class bit set).
    #[inline]
    #[must_use]
    pub fn is_error(self) -> bool {
        self.0 & W::ERROR_BIT != W::ZERO
    }

    /// Returns `true` if this status code indicates a warning (non-zero, class bit clear).
    #[inline]
    #[must_use]
    pub fn is_warning(self) -> bool {
        !self.is_success() && !self.is_error()
    }

    /// Returns the class of this status code.
    #[must_use]
    pub fn class(self) -> StatusClass {
        if self.is_success() {
            StatusClass::Success
        } else if self.is_error() {
            StatusClass::Error
        } else {
            StatusClass::Warning
        }
    }

    /// Returns the code with the class bit stripped.
    #[must_use]
    pub fn ordinal(self) -> u64 {
        (self.0 & !W::ERROR_BIT).into()
    }

    /// Converts this status code to a `Result`.
    ///
    /// Returns `Ok(())` if the status is success or a warning, `Err(self)` if it is an error.
    ///
    /// # Errors
    ///
    /// Returns `Err(self)` if the status code indicates an error.
    #[inline]
    pub fn to_result(self) -> Result<(), Self> {
        if self.is_error() { Err(self) } else { Ok(()) }
    }

    /// Returns the specification name of the status code, if it is one UEFI defines.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        code_name(self.class(), self.ordinal())
    }
}

/// Defines the named status constants once and stamps them onto every word width.
macro_rules! status_codes {
    (
        warnings { $($(#[$wdoc:meta])* $wname:ident = $wn:literal => $wtext:literal,)* }
        errors { $($(#[$edoc:meta])* $ename:ident = $en:literal => $etext:literal,)* }
    ) => {
        status_codes!(@width Word32, u32;
            warnings { $($(#[$wdoc])* $wname = $wn,)* }
            errors { $($(#[$edoc])* $ename = $en,)* });
        status_codes!(@width Word64, u64;
            warnings { $($(#[$wdoc])* $wname = $wn,)* }
            errors { $($(#[$edoc])* $ename = $en,)* });

        fn code_name(class: StatusClass, ordinal: u64) -> Option<&'static str> {
            match (class, ordinal) {
                (StatusClass::Success, 0) => Some("EFI_SUCCESS"),
                $((StatusClass::Warning, $wn) => Some($wtext),)*
                $((StatusClass::Error, $en) => Some($etext),)*
                _ => None,
            }
        }
    };
    (@width $word:ident, $uint:ty;
        warnings { $($(#[$wdoc:meta])* $wname:ident = $wn:literal,)* }
        errors { $($(#[$edoc:meta])* $ename:ident = $en:literal,)* }
    ) => {
        impl Status<$word> {
            /// The operation completed successfully.
            pub const SUCCESS: Self = Self(0);

            $($(#[$wdoc])* pub const $wname: Self = Self($wn);)*

            $($(#[$edoc])* pub const $ename: Self = Self(<$word as NativeWord>::ERROR_BIT | $en);)*
        }
    };
}

status_codes! {
    warnings {
        /// The string contained characters that could not be rendered and were skipped.
        WARN_UNKNOWN_GLYPH = 1 => "EFI_WARN_UNKNOWN_GLYPH",
        /// The handle was closed, but the file was not deleted.
        WARN_DELETE_FAILURE = 2 => "EFI_WARN_DELETE_FAILURE",
        /// The handle was closed, but the data to the file was not flushed properly.
        WARN_WRITE_FAILURE = 3 => "EFI_WARN_WRITE_FAILURE",
        /// The resulting buffer was too small, and the data was truncated.
        WARN_BUFFER_TOO_SMALL = 4 => "EFI_WARN_BUFFER_TOO_SMALL",
        /// The data has not been updated within the timeframe set by local policy.
        WARN_STALE_DATA = 5 => "EFI_WARN_STALE_DATA",
        /// The resulting buffer contains a UEFI-compliant file system.
        WARN_FILE_SYSTEM = 6 => "EFI_WARN_FILE_SYSTEM",
        /// The operation will be processed across a system reset.
        WARN_RESET_REQUIRED = 7 => "EFI_WARN_RESET_REQUIRED",
    }
    errors {
        /// The image failed to load.
        LOAD_ERROR = 1 => "EFI_LOAD_ERROR",
        /// A parameter was incorrect.
        INVALID_PARAMETER = 2 => "EFI_INVALID_PARAMETER",
        /// The operation is not supported.
        UNSUPPORTED = 3 => "EFI_UNSUPPORTED",
        /// The buffer was not the proper size for the request.
        BAD_BUFFER_SIZE = 4 => "EFI_BAD_BUFFER_SIZE",
        /// The buffer is not large enough to hold the requested data.
        BUFFER_TOO_SMALL = 5 => "EFI_BUFFER_TOO_SMALL",
        /// There is no data pending upon return.
        NOT_READY = 6 => "EFI_NOT_READY",
        /// The physical device reported an error while attempting the operation.
        DEVICE_ERROR = 7 => "EFI_DEVICE_ERROR",
        /// The device cannot be written to.
        WRITE_PROTECTED = 8 => "EFI_WRITE_PROTECTED",
        /// A resource has run out.
        OUT_OF_RESOURCES = 9 => "EFI_OUT_OF_RESOURCES",
        /// An inconsistency was detected on the file system.
        VOLUME_CORRUPTED = 10 => "EFI_VOLUME_CORRUPTED",
        /// There is no more space on the file system.
        VOLUME_FULL = 11 => "EFI_VOLUME_FULL",
        /// The device does not contain any medium to perform the operation.
        NO_MEDIA = 12 => "EFI_NO_MEDIA",
        /// The medium in the device has changed since the last access.
        MEDIA_CHANGED = 13 => "EFI_MEDIA_CHANGED",
        /// The item was not found.
        NOT_FOUND = 14 => "EFI_NOT_FOUND",
        /// Access was denied.
        ACCESS_DENIED = 15 => "EFI_ACCESS_DENIED",
        /// The server was not found or did not respond to the request.
        NO_RESPONSE = 16 => "EFI_NO_RESPONSE",
        /// A mapping to a device does not exist.
        NO_MAPPING = 17 => "EFI_NO_MAPPING",
        /// The timeout time expired.
        TIMEOUT = 18 => "EFI_TIMEOUT",
        /// The protocol has not been started.
        NOT_STARTED = 19 => "EFI_NOT_STARTED",
        /// The protocol has already been started.
        ALREADY_STARTED = 20 => "EFI_ALREADY_STARTED",
        /// The operation was aborted.
        ABORTED = 21 => "EFI_ABORTED",
        /// An ICMP error occurred during the network operation.
        ICMP_ERROR = 22 => "EFI_ICMP_ERROR",
        /// A TFTP error occurred during the network operation.
        TFTP_ERROR = 23 => "EFI_TFTP_ERROR",
        /// A protocol error occurred during the network operation.
        PROTOCOL_ERROR = 24 => "EFI_PROTOCOL_ERROR",
        /// The function encountered an internal version that was incompatible.
        INCOMPATIBLE_VERSION = 25 => "EFI_INCOMPATIBLE_VERSION",
        /// The function was not performed due to a security violation.
        SECURITY_VIOLATION = 26 => "EFI_SECURITY_VIOLATION",
        /// A CRC error was detected.
        CRC_ERROR = 27 => "EFI_CRC_ERROR",
        /// Beginning or end of media was reached.
        END_OF_MEDIA = 28 => "EFI_END_OF_MEDIA",
        /// The end of the file was reached.
        END_OF_FILE = 31 => "EFI_END_OF_FILE",
        /// The language specified was invalid.
        INVALID_LANGUAGE = 32 => "EFI_INVALID_LANGUAGE",
        /// The security status of the data is unknown or compromised.
        COMPROMISED_DATA = 33 => "EFI_COMPROMISED_DATA",
        /// There is an address conflict during the IP address configuration.
        IP_ADDRESS_CONFLICT = 34 => "EFI_IP_ADDRESS_CONFLICT",
        /// An HTTP error occurred during the network operation.
        HTTP_ERROR = 35 => "EFI_HTTP_ERROR",
    }
}

impl<W: NativeWord> Clone for Status<W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W: NativeWord> Copy for Status<W> {}

impl<W: NativeWord> PartialEq for Status<W> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<W: NativeWord> Eq for Status<W> {}

impl<W: NativeWord> Hash for Status<W> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<W: NativeWord> fmt::Debug for Status<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Status({name})"),
            None => write!(f, "Status({:#x})", self.0),
        }
    }
}

impl<W: NativeWord> fmt::Display for Status<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self.class()) {
            (Some(name), _) => f.write_str(name),
            (None, StatusClass::Error) => write!(f, "unknown error ({:#x})", self.ordinal()),
            (None, _) => write!(f, "unknown warning ({})", self.ordinal()),
        }
    }
}

impl<W: NativeWord> core::error::Error for Status<W> {}

// ── Compile-time layout assertions ──────────────────────────────────

const _: () = {
    assert!(core::mem::size_of::<Status<Word32>>() == 4);
    assert!(core::mem::size_of::<Status<Word64>>() == 8);
    assert!(core::mem::size_of::<EfiStatus>() == core::mem::size_of::<usize>());
    assert!(Status::<Word32>::NOT_READY.0 == 0x8000_0006);
    assert!(Status::<Word64>::NOT_READY.0 == 0x8000_0000_0000_0006);
};
