//! Raw firmware tables.
//!
//! This module mirrors the in-memory layout of the tables firmware hands to a loaded image:
//! the [`SystemTable`], the [`BootServices`] dispatch table, and the header of the
//! [`RuntimeServices`] table. Every table starts with a [`TableHeader`], which must be
//! checked with [`header::validate_raw`] before anything else in the table is trusted.
//!
//! The types here are plain `#[repr(C)]` data. Safe, lifetime-bounded access lives in
//! [`crate::api`].

use core::ffi::c_void;

use bitflags::bitflags;

use crate::{EfiEvent, EfiGuid, EfiHandle, EfiStatus};

pub mod boot;
pub mod header;
pub mod system;

pub use boot::BootServices;
pub use header::{
    BOOT_SERVICES_SIGNATURE, FirmwareTable, RUNTIME_SERVICES_SIGNATURE, Revision, RevisionMatch,
    SYSTEM_TABLE_SIGNATURE, TableError, TableExpectation, TableHeader,
};
pub use system::{RuntimeServices, SystemTable};

/// Entry point of a loaded image.
///
/// Firmware calls it with the image's own handle and the system table.
pub type EfiImageEntryPoint =
    unsafe extern "efiapi" fn(image_handle: EfiHandle, system_table: *mut SystemTable) -> EfiStatus;

/// Notification function attached to an event.
pub type EfiEventNotify = unsafe extern "efiapi" fn(event: EfiEvent, context: *mut c_void);

// ── Configuration Table ──────────────────────────────────────────────

/// An entry in the configuration table array published through the system table.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ConfigurationTable {
    /// Identifies the kind of vendor table.
    pub vendor_guid: EfiGuid,
    /// Address of the vendor table.
    pub vendor_table: *mut c_void,
}

// ── Supporting Enums ─────────────────────────────────────────────────

/// Timer kind for `SetTimer`.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerDelay {
    /// Cancel the event's timer.
    Cancel = 0,
    /// Signal the event every `trigger_time` units of 100ns.
    Periodic = 1,
    /// Signal the event once, `trigger_time` units of 100ns from now.
    Relative = 2,
}

/// Interface kind for `InstallProtocolInterface`. UEFI defines only native interfaces.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceType {
    /// A native interface.
    NativeInterface = 0,
}

/// Which handles `LocateHandle` and `LocateHandleBuffer` return.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateSearchType {
    /// Every handle in the handle database.
    AllHandles = 0,
    /// The next handle newly registered against a notification key.
    ByRegisterNotify = 1,
    /// Every handle supporting the given protocol.
    ByProtocol = 2,
}

bitflags! {
    /// Event type bits for `CreateEvent` and `CreateEventEx`.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventType: u32 {
        /// The event is a timer event.
        const TIMER = 0x8000_0000;
        /// The event is allocated from runtime memory.
        const RUNTIME = 0x4000_0000;
        /// The notification function runs when the event is waited on or checked.
        const NOTIFY_WAIT = 0x0000_0100;
        /// The notification function runs when the event is signalled.
        const NOTIFY_SIGNAL = 0x0000_0200;
        /// Signalled when `ExitBootServices` is invoked.
        const SIGNAL_EXIT_BOOT_SERVICES = 0x0000_0201;
        /// Signalled when `SetVirtualAddressMap` is invoked.
        const SIGNAL_VIRTUAL_ADDRESS_CHANGE = 0x6000_0202;
    }
}

bitflags! {
    /// Attributes for `OpenProtocol`.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpenProtocolAttributes: u32 {
        /// Used by the `HandleProtocol` compatibility path.
        const BY_HANDLE_PROTOCOL = 0x01;
        /// Used to retrieve an interface without taking an open reference.
        const GET_PROTOCOL = 0x02;
        /// Used to test for the presence of an interface.
        const TEST_PROTOCOL = 0x04;
        /// Used by bus drivers to show that a child controller consumes the interface.
        const BY_CHILD_CONTROLLER = 0x08;
        /// Used by a driver to gain access to the interface.
        const BY_DRIVER = 0x10;
        /// Used to gain exclusive access to the interface.
        const EXCLUSIVE = 0x20;
    }
}

// ── Supporting Structs ───────────────────────────────────────────────

/// One agent that has a protocol interface open, as reported by `OpenProtocolInformation`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct OpenProtocolInformationEntry {
    /// The agent that opened the interface.
    pub agent_handle: EfiHandle,
    /// The controller the interface was opened for.
    pub controller_handle: EfiHandle,
    /// The `OpenProtocol` attributes used.
    pub attributes: OpenProtocolAttributes,
    /// How many times the agent has the interface open.
    pub open_count: u32,
}

// ── Compile-time layout assertions ──────────────────────────────────

#[cfg(target_pointer_width = "64")]
const _: () = {
    assert!(core::mem::size_of::<ConfigurationTable>() == 24);
    assert!(core::mem::size_of::<OpenProtocolInformationEntry>() == 24);
};

#[cfg(target_pointer_width = "32")]
const _: () = {
    assert!(core::mem::size_of::<ConfigurationTable>() == 20);
    assert!(core::mem::size_of::<OpenProtocolInformationEntry>() == 16);
};

const _: () = {
    assert!(core::mem::size_of::<TimerDelay>() == 4);
    assert!(core::mem::size_of::<LocateSearchType>() == 4);
    assert!(core::mem::size_of::<EventType>() == 4);
};
