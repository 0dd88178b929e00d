//! A width-parameterised mirror of the UEFI boot-time ABI.
//!
//! This crate describes the binary interface a bootloader or other pre-OS program uses to
//! talk to UEFI firmware before the operating system takes over: the primitive data types,
//! the status-code encoding, GUIDs, the table header and its CRC32 check, the system table,
//! and the boot-services dispatch table. It implements none of the services itself; firmware
//! provides them through function-pointer slots.
//!
//! # Architecture
//!
//! The crate is layered, each layer depending only on the ones listed before it:
//! - [`word`] and [`primitive`]: native word selection and the scalar aliases
//! - [`guid`], [`address`], and [`status`]: identifiers and the status encoding
//! - [`table::header`]: the table header, revisions, signatures, and the validator
//! - [`table`], [`memory`], and [`protocol`]: the dispatch tables and the types they use
//! - [`api`]: validated, lifetime-bounded views with `Result`-returning wrappers
//!
//! # Word width
//!
//! `UINTN`, `INTN`, and `EFI_STATUS` follow the processor's native word. The width-dependent
//! definitions are written once, generic over [`NativeWord`], and [`Native`] picks the build
//! target's width. The other width stays usable, so for example
//! `Status::<Word32>::NOT_READY` and `Status::<Word64>::NOT_READY` can both be inspected on
//! any host.
//!
//! # Calling convention
//!
//! Every function pointer is declared `extern "efiapi"`, which selects the UEFI calling
//! convention of the target (Microsoft x64 on x86-64, AAPCS on ARM).
//!
//! # Safety
//!
//! Tables are firmware-owned. The raw types in [`table`] make no promises about the memory
//! they point to; [`api::SystemTable::from_raw`] validates both table headers before handing
//! out any view, and the views' lifetimes end when boot services are exited.

#![cfg_attr(not(test), no_std)]

pub mod address;
pub mod api;
pub mod guid;
pub mod memory;
pub mod primitive;
pub mod protocol;
pub mod status;
pub mod table;
pub mod word;

use core::ffi::c_void;

pub use address::{EfiIpAddress, EfiIpv4Address, EfiIpv6Address, EfiMacAddress};
pub use guid::EfiGuid;
pub use primitive::{
    Boolean, Char8, Char16, Int8, Int16, Int32, Int64, Intn, Uint8, Uint16, Uint32, Uint64,
    Uintn, Ucs2Str, WordInt, WordUint,
};
pub use status::{EfiStatus, Status, StatusClass};
pub use word::{Native, NativeWord, Word32, Word64};

/// An opaque handle to a group of protocol interfaces.
pub type EfiHandle = *mut c_void;

/// An opaque handle to an event.
pub type EfiEvent = *mut c_void;

/// A logical block address.
pub type EfiLba = u64;

/// A physical memory address.
pub type EfiPhysicalAddress = u64;

/// A virtual memory address.
pub type EfiVirtualAddress = u64;

/// A task priority level.
pub type EfiTpl = Uintn;

/// Task priority levels.
pub mod tpl {
    use super::EfiTpl;

    /// Normal application execution.
    pub const APPLICATION: EfiTpl = 4;
    /// Most notification callbacks.
    pub const CALLBACK: EfiTpl = 8;
    /// Short, non-blocking notifications.
    pub const NOTIFY: EfiTpl = 16;
    /// Interrupts masked.
    pub const HIGH_LEVEL: EfiTpl = 31;
}
