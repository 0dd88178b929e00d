//! The common table header and its validator.
//!
//! Every firmware table begins with a 24-byte [`TableHeader`]. Before a program trusts any
//! other field of a table it must check the header: the signature identifies the table kind,
//! the revision names the specification version the table follows, and the CRC32 covers the
//! whole table (computed with the CRC field itself set to zero).
//!
//! [`validate`] performs those checks over a byte region and [`validate_raw`] over firmware
//! memory. Both report the first failing check as a [`TableError`]; neither panics.

use core::ffi::c_void;
use core::fmt;
use core::ops::Range;

use log::{debug, warn};
use thiserror::Error;

/// Signature of the system table (`"IBI SYST"`).
pub const SYSTEM_TABLE_SIGNATURE: u64 = 0x5453_5953_2049_4249;

/// Signature of the boot-services table (`"BOOTSERV"`).
pub const BOOT_SERVICES_SIGNATURE: u64 = 0x5652_4553_544f_4f42;

/// Signature of the runtime-services table (`"RUNTSERV"`).
pub const RUNTIME_SERVICES_SIGNATURE: u64 = 0x5652_4553_544e_5552;

/// The specification version these definitions follow.
pub const SPECIFICATION_VERSION: Revision = Revision::EFI_2_80;

/// Revision expected in the system table header.
pub const SYSTEM_TABLE_REVISION: Revision = SPECIFICATION_VERSION;

/// Revision expected in the boot-services table header.
pub const BOOT_SERVICES_REVISION: Revision = SPECIFICATION_VERSION;

/// Revision expected in the runtime-services table header.
pub const RUNTIME_SERVICES_REVISION: Revision = SPECIFICATION_VERSION;

/// Largest `header_size` accepted before the table body is read.
///
/// Every table this crate validates is a few hundred bytes; a larger size is treated as
/// corruption rather than trusted as a read length.
pub const MAX_HEADER_SIZE: u32 = 0x1_0000;

/// Byte range of the CRC32 field within a header.
const CRC_FIELD: Range<usize> = 16..20;

// ── Revision ─────────────────────────────────────────────────────────

/// A specification revision as encoded in table headers.
///
/// The upper 16 bits hold the major version and the lower 16 bits hold
/// `minor * 10 + patch`, so 2.3.1 is `0x0002_001f` and 2.10 is `0x0002_0064`.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Revision(pub u32);

impl Revision {
    /// EFI 1.02.
    pub const EFI_1_02: Self = Self::new(1, 0, 2);
    /// EFI 1.10.
    pub const EFI_1_10: Self = Self::new(1, 1, 0);
    /// UEFI 2.0.
    pub const EFI_2_00: Self = Self::new(2, 0, 0);
    /// UEFI 2.1.
    pub const EFI_2_10: Self = Self::new(2, 1, 0);
    /// UEFI 2.2.
    pub const EFI_2_20: Self = Self::new(2, 2, 0);
    /// UEFI 2.3.
    pub const EFI_2_30: Self = Self::new(2, 3, 0);
    /// UEFI 2.3.1.
    pub const EFI_2_31: Self = Self::new(2, 3, 1);
    /// UEFI 2.4.
    pub const EFI_2_40: Self = Self::new(2, 4, 0);
    /// UEFI 2.5.
    pub const EFI_2_50: Self = Self::new(2, 5, 0);
    /// UEFI 2.6.
    pub const EFI_2_60: Self = Self::new(2, 6, 0);
    /// UEFI 2.7.
    pub const EFI_2_70: Self = Self::new(2, 7, 0);
    /// UEFI 2.8.
    pub const EFI_2_80: Self = Self::new(2, 8, 0);
    /// UEFI 2.9.
    pub const EFI_2_90: Self = Self::new(2, 9, 0);
    /// UEFI 2.10.
    pub const EFI_2_100: Self = Self::new(2, 10, 0);

    /// Encodes `major.minor.patch`.
    ///
    /// `major` and `minor * 10 + patch` must each fit in 16 bits, and `patch` must be a
    /// single digit. Debug builds assert this. Release builds keep each half to its own 16
    /// bits, so an oversized minor number never changes the major number.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        debug_assert!(major <= 0xffff, "major revision does not fit in 16 bits");
        debug_assert!(patch < 10, "patch revision is not a single digit");
        debug_assert!(
            minor <= (0xffff - patch) / 10,
            "minor revision does not fit in 16 bits"
        );
        let low = minor.wrapping_mul(10).wrapping_add(patch) & 0xffff;
        Self(((major & 0xffff) << 16) | low)
    }

    /// The major version.
    #[must_use]
    pub const fn major(self) -> u32 {
        self.0 >> 16
    }

    /// The minor version.
    #[must_use]
    pub const fn minor(self) -> u32 {
        (self.0 & 0xffff) / 10
    }

    /// The patch version.
    #[must_use]
    pub const fn patch(self) -> u32 {
        (self.0 & 0xffff) % 10
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())?;
        if self.patch() != 0 {
            write!(f, ".{}", self.patch())?;
        }
        Ok(())
    }
}

// ── Table Header ─────────────────────────────────────────────────────

/// Common header for all firmware tables.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableHeader {
    /// Identifies the kind of table that follows.
    pub signature: u64,
    /// The specification revision the table conforms to.
    pub revision: Revision,
    /// Size in bytes of the entire table, header included.
    pub header_size: u32,
    /// CRC32 of the entire table, computed with this field set to zero.
    pub crc32: u32,
    /// Must be zero.
    pub reserved: u32,
}

impl TableHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 24;

    /// Creates a header with a zero CRC; [`seal`] fills the CRC in once the table is complete.
    #[must_use]
    pub const fn new(signature: u64, revision: Revision, header_size: u32) -> Self {
        Self {
            signature,
            revision,
            header_size,
            crc32: 0,
            reserved: 0,
        }
    }

    /// Decodes a header from the first [`SIZE`](Self::SIZE) bytes of `bytes`.
    ///
    /// Returns `None` if `bytes` is shorter than a header.
    #[must_use]
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let raw: &[u8; Self::SIZE] = bytes.get(..Self::SIZE)?.try_into().ok()?;
        let u32_at = |at: usize| u32::from_le_bytes([raw[at], raw[at + 1], raw[at + 2], raw[at + 3]]);
        let mut signature = [0u8; 8];
        signature.copy_from_slice(&raw[..8]);
        Some(Self {
            signature: u64::from_le_bytes(signature),
            revision: Revision(u32_at(8)),
            header_size: u32_at(12),
            crc32: u32_at(16),
            reserved: u32_at(20),
        })
    }

    /// Encodes the header in its in-memory byte order.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[..8].copy_from_slice(&self.signature.to_le_bytes());
        out[8..12].copy_from_slice(&self.revision.0.to_le_bytes());
        out[12..16].copy_from_slice(&self.header_size.to_le_bytes());
        out[16..20].copy_from_slice(&self.crc32.to_le_bytes());
        out[20..24].copy_from_slice(&self.reserved.to_le_bytes());
        out
    }
}

/// `size_of::<T>()` as a header size.
#[expect(clippy::cast_possible_truncation, reason = "tables are far smaller than 4 GiB")]
pub(crate) const fn table_size<T>() -> u32 {
    core::mem::size_of::<T>() as u32
}

// ── Expectations ─────────────────────────────────────────────────────

/// A firmware table type that starts with a [`TableHeader`].
///
/// # Safety
///
/// Implementors must be `#[repr(C)]` structs whose first field is a [`TableHeader`], and
/// `MIN_SIZE` must not exceed `size_of::<Self>()`.
pub unsafe trait FirmwareTable {
    /// Human-readable table name used in diagnostics.
    const NAME: &'static str;
    /// The table's signature constant.
    const SIGNATURE: u64;
    /// The revision these definitions were written against.
    const REVISION: Revision;
    /// Smallest `header_size` that covers every field this crate reads.
    const MIN_SIZE: u32;
}

/// How a table's revision is compared against the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionMatch {
    /// The revision must equal the given value.
    Exact(Revision),
    /// The revision must be the given value or newer.
    AtLeast(Revision),
}

impl RevisionMatch {
    /// Returns `true` if `found` satisfies this policy.
    #[must_use]
    pub fn accepts(self, found: Revision) -> bool {
        match self {
            Self::Exact(rev) => found == rev,
            Self::AtLeast(rev) => found >= rev,
        }
    }
}

impl fmt::Display for RevisionMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(rev) => write!(f, "= {rev}"),
            Self::AtLeast(rev) => write!(f, ">= {rev}"),
        }
    }
}

/// What a table header must look like to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableExpectation {
    /// Name used in log messages.
    pub name: &'static str,
    /// The required signature.
    pub signature: u64,
    /// The revision policy.
    pub revision: RevisionMatch,
    /// The smallest acceptable `header_size`. Never below [`TableHeader::SIZE`] in effect.
    pub min_size: u32,
}

impl TableExpectation {
    /// The strict expectation for table type `T`: its signature, exactly its revision, and
    /// its minimum size.
    #[must_use]
    pub const fn of<T: FirmwareTable>() -> Self {
        Self {
            name: T::NAME,
            signature: T::SIGNATURE,
            revision: RevisionMatch::Exact(T::REVISION),
            min_size: T::MIN_SIZE,
        }
    }

    /// Replaces the revision policy.
    #[must_use]
    pub const fn with_revision(mut self, revision: RevisionMatch) -> Self {
        self.revision = revision;
        self
    }

    fn size_floor(&self) -> u32 {
        self.min_size.max(table_size::<TableHeader>())
    }
}

// ── Validation ───────────────────────────────────────────────────────

/// Reasons a table header is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    /// The table pointer was null.
    #[error("table pointer is null")]
    NullPointer,
    /// The region is shorter than the header requires.
    #[error("table needs {needed} bytes but only {available} are available")]
    Truncated {
        /// Bytes the header asks for.
        needed: usize,
        /// Bytes the caller provided.
        available: usize,
    },
    /// `header_size` is smaller than the fields this crate reads.
    #[error("header size {header_size} is below the minimum of {min_size}")]
    HeaderTooSmall {
        /// The size recorded in the header.
        header_size: u32,
        /// The smallest acceptable size.
        min_size: u32,
    },
    /// `header_size` exceeds [`MAX_HEADER_SIZE`].
    #[error("header size {header_size} exceeds the maximum of {max_size}")]
    HeaderTooLarge {
        /// The size recorded in the header.
        header_size: u32,
        /// The largest acceptable size.
        max_size: u32,
    },
    /// The signature names a different table kind.
    #[error("signature {found:#018x} does not match {expected:#018x}")]
    SignatureMismatch {
        /// The expected signature.
        expected: u64,
        /// The signature found in the header.
        found: u64,
    },
    /// The revision does not satisfy the revision policy.
    #[error("revision {found} does not satisfy {expected}")]
    RevisionMismatch {
        /// The policy that was applied.
        expected: RevisionMatch,
        /// The revision found in the header.
        found: Revision,
    },
    /// The reserved field is not zero.
    #[error("reserved field is {0:#x}, must be zero")]
    NonZeroReserved(u32),
    /// The stored CRC32 does not match the table contents.
    #[error("stored crc32 {stored:#010x} does not match computed {computed:#010x}")]
    ChecksumMismatch {
        /// The CRC recorded in the header.
        stored: u32,
        /// The CRC computed over the table.
        computed: u32,
    },
}

/// Computes the CRC32 of a table, treating the header's CRC field as zero.
///
/// Regions too short to contain the CRC field are hashed as they are.
#[must_use]
pub fn compute_crc32(table: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    if table.len() < CRC_FIELD.end {
        hasher.update(table);
    } else {
        hasher.update(&table[..CRC_FIELD.start]);
        hasher.update(&[0; 4]);
        hasher.update(&table[CRC_FIELD.end..]);
    }
    hasher.finalize()
}

/// Computes the CRC32 over the first `header_size` bytes of `table` and stores it in the
/// header. Returns the stored value.
///
/// # Errors
///
/// Returns [`TableError::Truncated`] if `table` is shorter than a header or than the size
/// the header records.
pub fn seal(table: &mut [u8]) -> Result<u32, TableError> {
    let header = TableHeader::parse(table).ok_or(TableError::Truncated {
        needed: TableHeader::SIZE,
        available: table.len(),
    })?;
    let len = (header.header_size as usize).max(TableHeader::SIZE);
    let available = table.len();
    let region = table
        .get_mut(..len)
        .ok_or(TableError::Truncated { needed: len, available })?;
    let crc = compute_crc32(region);
    region[CRC_FIELD].copy_from_slice(&crc.to_le_bytes());
    Ok(crc)
}

/// Validates the table header at the start of `table`.
///
/// Checks, in order: the region holds a header, `header_size` is at least the expected
/// minimum and at most [`MAX_HEADER_SIZE`], the region holds `header_size` bytes, the
/// signature, the revision, the reserved field, and finally the CRC32 over `header_size`
/// bytes.
///
/// # Errors
///
/// Returns the first failing check as a [`TableError`].
pub fn validate(table: &[u8], expected: &TableExpectation) -> Result<TableHeader, TableError> {
    let result = check(table, expected);
    match &result {
        Ok(header) => debug!(
            "{}: header valid (revision {}, {} bytes)",
            expected.name, header.revision, header.header_size
        ),
        Err(err) => warn!("{}: header rejected: {err}", expected.name),
    }
    result
}

/// Returns `true` if [`validate`] accepts `table`.
#[must_use]
pub fn is_valid(table: &[u8], expected: &TableExpectation) -> bool {
    check(table, expected).is_ok()
}

/// Validates a table header in firmware memory.
///
/// The header is read first; the rest of the table is only read once `header_size` has been
/// checked against the expected minimum and [`MAX_HEADER_SIZE`].
///
/// # Errors
///
/// Returns [`TableError::NullPointer`] for a null `table`, otherwise as [`validate`].
///
/// # Safety
///
/// If non-null, `table` must be readable for [`TableHeader::SIZE`] bytes, and for
/// `header_size` bytes whenever that size is at least `expected.min_size` and at most
/// [`MAX_HEADER_SIZE`].
pub unsafe fn validate_raw(
    table: *const c_void,
    expected: &TableExpectation,
) -> Result<TableHeader, TableError> {
    if table.is_null() {
        warn!("{}: table pointer is null", expected.name);
        return Err(TableError::NullPointer);
    }
    let base = table.cast::<u8>();
    // SAFETY: The caller guarantees a full header is readable.
    let head = unsafe { core::slice::from_raw_parts(base, TableHeader::SIZE) };
    let header_size = TableHeader::parse(head).map_or(0, |h| h.header_size);
    if header_size < expected.size_floor() || header_size > MAX_HEADER_SIZE {
        return validate(head, expected);
    }
    // SAFETY: `header_size` is within bounds, so the caller guarantees it is readable.
    let whole = unsafe { core::slice::from_raw_parts(base, header_size as usize) };
    validate(whole, expected)
}

fn check(table: &[u8], expected: &TableExpectation) -> Result<TableHeader, TableError> {
    let header = TableHeader::parse(table).ok_or(TableError::Truncated {
        needed: TableHeader::SIZE,
        available: table.len(),
    })?;

    let min_size = expected.size_floor();
    if header.header_size < min_size {
        return Err(TableError::HeaderTooSmall {
            header_size: header.header_size,
            min_size,
        });
    }
    if header.header_size > MAX_HEADER_SIZE {
        return Err(TableError::HeaderTooLarge {
            header_size: header.header_size,
            max_size: MAX_HEADER_SIZE,
        });
    }

    let len = header.header_size as usize;
    let region = table.get(..len).ok_or(TableError::Truncated {
        needed: len,
        available: table.len(),
    })?;

    if header.signature != expected.signature {
        return Err(TableError::SignatureMismatch {
            expected: expected.signature,
            found: header.signature,
        });
    }
    if !expected.revision.accepts(header.revision) {
        return Err(TableError::RevisionMismatch {
            expected: expected.revision,
            found: header.revision,
        });
    }
    if header.reserved != 0 {
        return Err(TableError::NonZeroReserved(header.reserved));
    }

    let computed = compute_crc32(region);
    if computed != header.crc32 {
        return Err(TableError::ChecksumMismatch {
            stored: header.crc32,
            computed,
        });
    }
    Ok(header)
}

// ── Compile-time layout assertions ──────────────────────────────────

const _: () = {
    assert!(core::mem::size_of::<TableHeader>() == TableHeader::SIZE);
    assert!(core::mem::offset_of!(TableHeader, revision) == 8);
    assert!(core::mem::offset_of!(TableHeader, header_size) == 12);
    assert!(core::mem::offset_of!(TableHeader, crc32) == CRC_FIELD.start);
    assert!(core::mem::offset_of!(TableHeader, reserved) == 20);
    assert!(SPECIFICATION_VERSION.0 == 0x0002_0050);
};
