//! Safe, lifetime-bounded views of the firmware tables.
//!
//! [`SystemTable`] is parameterised by boot phase. A `SystemTable<Boot>` is created once from
//! the entry-point arguments after both its header and the boot-services header have been
//! validated. Calling [`exit_boot_services`](SystemTable::exit_boot_services) consumes it:
//! success yields a `SystemTable<Runtime>`, which has no boot-time accessors, and failure hands
//! the `Boot` table back so the caller can fetch a fresh memory map and try again.
//!
//! Every view borrows from the table it came from, so nothing obtained during boot can be
//! used after the transition.

use core::ffi::c_void;
use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ptr::NonNull;

use log::{info, warn};
use thiserror::Error;

use crate::primitive::Ucs2Str;
use crate::protocol::{SimpleTextInputProtocol, SimpleTextOutputProtocol};
use crate::table::{self, ConfigurationTable, RevisionMatch, TableError, TableExpectation, header};
use crate::{EfiGuid, EfiHandle, EfiStatus};

/// Boot services wrapper.
pub mod boot;
/// Memory map iterator.
pub mod memory;
/// Two-call buffer sizing.
pub mod sizing;

pub use boot::{BootServices, ImageExit, PoolSlice, SearchType, TplGuard};
pub use memory::{MemoryMap, MemoryMapIter, MemoryMapSize};
pub use sizing::BufferError;

// ---------------------------------------------------------------------------
// Type-state markers
// ---------------------------------------------------------------------------

/// Marker type for the phase in which boot services are available.
pub enum Boot {}

/// Marker type for the phase after `ExitBootServices` has succeeded.
pub enum Runtime {}

mod sealed {
    pub trait Phase {}
    impl Phase for super::Boot {}
    impl Phase for super::Runtime {}
}

// ---------------------------------------------------------------------------
// SystemTable
// ---------------------------------------------------------------------------

/// Borrowed view of the firmware system table in phase `P`.
///
/// `'fw` is the lifetime of the firmware tables themselves.
pub struct SystemTable<'fw, P: sealed::Phase> {
    image: EfiHandle,
    raw: NonNull<table::SystemTable>,
    _phase: PhantomData<(P, &'fw table::SystemTable)>,
}

impl<'fw> SystemTable<'fw, Boot> {
    /// Creates the boot-phase view from the entry-point arguments, requiring the exact
    /// revisions these definitions follow.
    ///
    /// # Errors
    ///
    /// Returns the first [`TableError`] found in the system table header or in the
    /// boot-services table header.
    ///
    /// # Safety
    ///
    /// - `raw` must be null or point to firmware memory readable for `'fw` that starts with a
    ///   table header, and whose boot-services pointer satisfies the same.
    /// - Boot services must not have been exited.
    pub unsafe fn from_raw(
        image: EfiHandle,
        raw: *mut table::SystemTable,
    ) -> Result<Self, TableError> {
        let revision = TableExpectation::of::<table::SystemTable>().revision;
        unsafe { Self::from_raw_with(image, raw, revision) }
    }

    /// As [`from_raw`](Self::from_raw), with the revision policy chosen by the caller. The
    /// policy applies to both tables.
    ///
    /// # Errors
    ///
    /// As [`from_raw`](Self::from_raw).
    ///
    /// # Safety
    ///
    /// As [`from_raw`](Self::from_raw).
    pub unsafe fn from_raw_with(
        image: EfiHandle,
        raw: *mut table::SystemTable,
        revision: RevisionMatch,
    ) -> Result<Self, TableError> {
        let system = TableExpectation::of::<table::SystemTable>().with_revision(revision);
        unsafe { header::validate_raw(raw.cast_const().cast(), &system) }?;
        let raw = NonNull::new(raw).ok_or(TableError::NullPointer)?;

        let boot_services = unsafe { raw.as_ref() }.boot_services;
        let boot = TableExpectation::of::<table::BootServices>().with_revision(revision);
        unsafe { header::validate_raw(boot_services.cast_const().cast(), &boot) }?;

        Ok(Self {
            image,
            raw,
            _phase: PhantomData,
        })
    }

    /// Borrows the boot services.
    #[must_use]
    pub fn boot_services(&self) -> BootServices<'_> {
        // SAFETY: Validated in `from_raw_with` and live until `exit_boot_services`, which
        // consumes `self`.
        let raw = unsafe { &*self.table().boot_services };
        BootServices::new(raw, self.image)
    }

    /// The console input device.
    #[must_use]
    pub fn console_in(&self) -> Console<'_, SimpleTextInputProtocol> {
        let st = self.table();
        Console::new(st.console_in_handle, st.console_in)
    }

    /// The console output device.
    #[must_use]
    pub fn console_out(&self) -> Console<'_, SimpleTextOutputProtocol> {
        let st = self.table();
        Console::new(st.console_out_handle, st.console_out)
    }

    /// The standard error device.
    #[must_use]
    pub fn standard_error(&self) -> Console<'_, SimpleTextOutputProtocol> {
        let st = self.table();
        Console::new(st.standard_error_handle, st.standard_error)
    }

    /// Ends boot services.
    ///
    /// `map_key` must come from the most recent memory map. This makes exactly one attempt.
    ///
    /// # Errors
    ///
    /// If firmware rejects the key (typically with `INVALID_PARAMETER` because the memory
    /// map changed), the error carries this table back unchanged, still in the boot phase.
    pub fn exit_boot_services(
        self,
        map_key: usize,
    ) -> Result<SystemTable<'fw, Runtime>, ExitBootServicesError<'fw>> {
        // SAFETY: See `boot_services`.
        let boot = unsafe { &*self.table().boot_services };
        let status = unsafe { (boot.exit_boot_services)(self.image, map_key) };
        match status.to_result() {
            Ok(()) => {
                info!("boot services exited (map key {map_key:#x})");
                Ok(SystemTable {
                    image: self.image,
                    raw: self.raw,
                    _phase: PhantomData,
                })
            }
            Err(status) => {
                warn!("exit boot services rejected map key {map_key:#x}: {status}");
                Err(ExitBootServicesError {
                    status,
                    table: self,
                })
            }
        }
    }
}

impl<'fw, P: sealed::Phase> SystemTable<'fw, P> {
    fn table(&self) -> &table::SystemTable {
        // SAFETY: Validated on construction and firmware-owned for `'fw`.
        unsafe { self.raw.as_ref() }
    }

    /// The raw system table pointer.
    #[must_use]
    pub fn as_ptr(&self) -> *mut table::SystemTable {
        self.raw.as_ptr()
    }

    /// The handle of the running image.
    #[must_use]
    pub fn image_handle(&self) -> EfiHandle {
        self.image
    }

    /// The validated system table header.
    #[must_use]
    pub fn header(&self) -> table::TableHeader {
        self.table().header
    }

    /// The firmware vendor string; empty if firmware provides none.
    #[must_use]
    pub fn firmware_vendor(&self) -> Ucs2Str<'_> {
        let vendor = self.table().firmware_vendor;
        if vendor.is_null() {
            return Ucs2Str::from_units(&[]);
        }
        // SAFETY: Firmware provides a NUL-terminated string that lives as long as the table.
        unsafe { Ucs2Str::from_ptr(vendor) }
    }

    /// The vendor-specific firmware revision.
    #[must_use]
    pub fn firmware_revision(&self) -> u32 {
        self.table().firmware_revision
    }

    /// The runtime-services table. Its layout beyond the header is not described here.
    #[must_use]
    pub fn runtime_services(&self) -> *mut table::RuntimeServices {
        self.table().runtime_services
    }

    /// Iterates the configuration table, reading the pointer and count afresh.
    #[must_use]
    pub fn configuration_tables(&self) -> ConfigurationTables<'_> {
        let st = self.table();
        ConfigurationTables::new(st.configuration_table, st.number_of_table_entries)
    }

    /// Returns the vendor table published under `guid`.
    #[must_use]
    pub fn find_configuration_table(&self, guid: &EfiGuid) -> Option<*mut c_void> {
        self.configuration_tables()
            .find(|entry| entry.vendor_guid == *guid)
            .map(|entry| entry.vendor_table)
    }
}

impl<P: sealed::Phase> fmt::Debug for SystemTable<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemTable")
            .field("image", &self.image)
            .field("raw", &self.raw)
            .field("revision", &self.header().revision)
            .finish()
    }
}

/// `ExitBootServices` was rejected.
#[derive(Debug, Error)]
#[error("exit boot services failed: {status}")]
pub struct ExitBootServicesError<'fw> {
    status: EfiStatus,
    table: SystemTable<'fw, Boot>,
}

impl<'fw> ExitBootServicesError<'fw> {
    /// The status firmware returned.
    #[must_use]
    pub fn status(&self) -> EfiStatus {
        self.status
    }

    /// Recovers the boot-phase table for another attempt.
    #[must_use]
    pub fn into_table(self) -> SystemTable<'fw, Boot> {
        self.table
    }
}

// ---------------------------------------------------------------------------
// Console and configuration tables
// ---------------------------------------------------------------------------

/// A console device: its handle and the protocol interface installed on it.
pub struct Console<'st, T> {
    handle: EfiHandle,
    protocol: *mut T,
    _lifetime: PhantomData<&'st T>,
}

impl<T> Console<'_, T> {
    fn new(handle: EfiHandle, protocol: *mut T) -> Self {
        Self {
            handle,
            protocol,
            _lifetime: PhantomData,
        }
    }

    /// The device handle.
    #[must_use]
    pub fn handle(&self) -> EfiHandle {
        self.handle
    }

    /// The protocol interface; null if firmware has no such console.
    #[must_use]
    pub fn protocol(&self) -> *mut T {
        self.protocol
    }
}

/// Iterator over the configuration table array.
///
/// Finite and fused. Not `Clone`: call
/// [`SystemTable::configuration_tables`] again to start over.
pub struct ConfigurationTables<'st> {
    next: *const ConfigurationTable,
    remaining: usize,
    _lifetime: PhantomData<&'st ConfigurationTable>,
}

impl ConfigurationTables<'_> {
    fn new(base: *const ConfigurationTable, count: usize) -> Self {
        Self {
            next: base,
            remaining: if base.is_null() { 0 } else { count },
            _lifetime: PhantomData,
        }
    }
}

impl<'st> Iterator for ConfigurationTables<'st> {
    type Item = &'st ConfigurationTable;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: `next` points into the firmware array, which has `remaining` more entries.
        let entry = unsafe { &*self.next };
        self.remaining -= 1;
        if self.remaining > 0 {
            self.next = unsafe { self.next.add(1) };
        }
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ConfigurationTables<'_> {}

impl FusedIterator for ConfigurationTables<'_> {}
