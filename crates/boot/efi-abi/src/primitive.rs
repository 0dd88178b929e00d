//! UEFI primitive data types.
//!
//! Fixed-width aliases keep the names used by the UEFI specification's "Common UEFI Data
//! Types" table so that signatures here can be compared against the specification line by
//! line. `Intn`/`Uintn` follow the build target's native word; [`WordInt`] and [`WordUint`]
//! name the native integers of an explicit [`NativeWord`](crate::word::NativeWord) width.

use core::fmt;

use crate::word::{Native, NativeWord, Word32, Word64};

/// Logical boolean. One byte; `0` is false and `1` is true.
///
/// Compliant firmware only ever produces `0` or `1`, which matches Rust's `bool` validity
/// invariant, so `bool` is used directly in FFI signatures.
pub type Boolean = bool;

/// 1-byte signed value.
pub type Int8 = i8;
/// 2-byte signed value.
pub type Int16 = i16;
/// 4-byte signed value.
pub type Int32 = i32;
/// 8-byte signed value.
pub type Int64 = i64;

/// 1-byte unsigned value.
pub type Uint8 = u8;
/// 2-byte unsigned value.
pub type Uint16 = u16;
/// 4-byte unsigned value.
pub type Uint32 = u32;
/// 8-byte unsigned value.
pub type Uint64 = u64;

/// Signed value of native width for the build target.
pub type Intn = isize;
/// Unsigned value of native width for the build target.
pub type Uintn = usize;

/// The signed native integer of width `W`.
pub type WordInt<W> = <W as NativeWord>::Int;
/// The unsigned native integer of width `W`.
pub type WordUint<W> = <W as NativeWord>::Uint;

/// 1-byte character (ASCII / Latin-1).
pub type Char8 = u8;
/// 2-byte character (UCS-2).
pub type Char16 = u16;

/// A borrowed, NUL-free UCS-2 string.
///
/// Firmware strings (the vendor name, exit data) are NUL-terminated arrays of [`Char16`].
/// This view covers the characters before the terminator.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ucs2Str<'a> {
    units: &'a [Char16],
}

impl<'a> Ucs2Str<'a> {
    /// Creates a view over `units`, stopping at the first NUL if there is one.
    #[must_use]
    pub fn from_units(units: &'a [Char16]) -> Self {
        let len = units.iter().position(|&c| c == 0).unwrap_or(units.len());
        Self {
            units: &units[..len],
        }
    }

    /// Creates a view over a NUL-terminated string in firmware memory.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null, aligned, and point to a NUL-terminated [`Char16`] array that
    /// stays valid and unmodified for `'a`.
    #[must_use]
    pub unsafe fn from_ptr(ptr: *const Char16) -> Self {
        let mut len = 0;
        // SAFETY: The caller guarantees a terminator exists within the allocation.
        while unsafe { *ptr.add(len) } != 0 {
            len += 1;
        }
        // SAFETY: `len` units were just read from `ptr`.
        let units = unsafe { core::slice::from_raw_parts(ptr, len) };
        Self { units }
    }

    /// The UCS-2 code units, without the terminator.
    #[must_use]
    pub fn as_units(&self) -> &'a [Char16] {
        self.units
    }

    /// Number of code units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns `true` if the string has no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Decodes the string, replacing unpaired surrogates with U+FFFD.
    pub fn chars(&self) -> impl Iterator<Item = char> + 'a {
        char::decode_utf16(self.units.iter().copied())
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
    }
}

impl fmt::Display for Ucs2Str<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for c in self.chars() {
            f.write_char(c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Ucs2Str<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

// ── Compile-time layout assertions ──────────────────────────────────

const _: () = {
    use core::mem::size_of;

    assert!(size_of::<Boolean>() == 1);
    assert!(size_of::<Char8>() == 1);
    assert!(size_of::<Char16>() == 2);

    assert!(size_of::<Int8>() == 1 && size_of::<Uint8>() == 1);
    assert!(size_of::<Int16>() == 2 && size_of::<Uint16>() == 2);
    assert!(size_of::<Int32>() == 4 && size_of::<Uint32>() == 4);
    assert!(size_of::<Int64>() == 8 && size_of::<Uint64>() == 8);

    assert!(size_of::<WordInt<Word32>>() == 4 && size_of::<WordUint<Word32>>() == 4);
    assert!(size_of::<WordInt<Word64>>() == 8 && size_of::<WordUint<Word64>>() == 8);

    assert!(size_of::<Intn>() == Native::BYTES);
    assert!(size_of::<Uintn>() == Native::BYTES);
    assert!(size_of::<Uintn>() == size_of::<WordUint<Native>>());
};
