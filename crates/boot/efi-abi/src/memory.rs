//! Memory allocation types and memory-map descriptors.
//!
//! `GetMemoryMap` fills a buffer with descriptors whose stride is the firmware-reported
//! `descriptor_size`, which may be larger than [`EfiMemoryDescriptor`]. Never index a memory
//! map as a `[EfiMemoryDescriptor]`; use [`crate::api::MemoryMap`].

use bitflags::bitflags;

use crate::{EfiPhysicalAddress, EfiVirtualAddress};

/// Size of the pages `AllocatePages` hands out and descriptors count in.
pub const PAGE_SIZE: u64 = 4096;

/// How `AllocatePages` chooses an address.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EfiAllocateType {
    /// Anywhere.
    AllocateAnyPages = 0,
    /// Anywhere at or below the address passed in.
    AllocateMaxAddress = 1,
    /// Exactly at the address passed in.
    AllocateAddress = 2,
}

/// The kind of a memory region.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EfiMemoryType {
    /// Not usable.
    ReservedMemoryType = 0,
    /// Code of a loaded application.
    LoaderCode = 1,
    /// Data of a loaded application, and the default pool type for applications.
    LoaderData = 2,
    /// Code of a boot-services driver.
    BootServicesCode = 3,
    /// Data of a boot-services driver.
    BootServicesData = 4,
    /// Code of a runtime-services driver.
    RuntimeServicesCode = 5,
    /// Data of a runtime-services driver.
    RuntimeServicesData = 6,
    /// Free memory.
    ConventionalMemory = 7,
    /// Memory with detected errors.
    UnusableMemory = 8,
    /// ACPI tables; reclaimable once they are parsed.
    AcpiReclaimMemory = 9,
    /// Reserved for firmware ACPI use.
    AcpiMemoryNvs = 10,
    /// Memory-mapped I/O.
    MemoryMappedIO = 11,
    /// Memory-mapped I/O port space.
    MemoryMappedIOPortSpace = 12,
    /// Processor firmware code.
    PalCode = 13,
    /// Byte-addressable non-volatile memory.
    PersistentMemory = 14,
    /// Memory that must be accepted before use.
    UnacceptedMemoryType = 15,
}

impl TryFrom<u32> for EfiMemoryType {
    type Error = u32;

    fn try_from(raw: u32) -> Result<Self, u32> {
        Ok(match raw {
            0 => Self::ReservedMemoryType,
            1 => Self::LoaderCode,
            2 => Self::LoaderData,
            3 => Self::BootServicesCode,
            4 => Self::BootServicesData,
            5 => Self::RuntimeServicesCode,
            6 => Self::RuntimeServicesData,
            7 => Self::ConventionalMemory,
            8 => Self::UnusableMemory,
            9 => Self::AcpiReclaimMemory,
            10 => Self::AcpiMemoryNvs,
            11 => Self::MemoryMappedIO,
            12 => Self::MemoryMappedIOPortSpace,
            13 => Self::PalCode,
            14 => Self::PersistentMemory,
            15 => Self::UnacceptedMemoryType,
            other => return Err(other),
        })
    }
}

/// One region of the memory map.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EfiMemoryDescriptor {
    /// Raw region kind; OEM and OS-loader ranges fall outside [`EfiMemoryType`].
    pub memory_type: u32,
    /// First physical address of the region.
    pub physical_start: EfiPhysicalAddress,
    /// First virtual address of the region, once a virtual map is installed.
    pub virtual_start: EfiVirtualAddress,
    /// Length of the region in [`PAGE_SIZE`] pages.
    pub number_of_pages: u64,
    /// Capability bits of the region.
    pub attribute: u64,
}

impl EfiMemoryDescriptor {
    /// The region kind, or `None` for values outside the standard range.
    #[must_use]
    pub fn kind(&self) -> Option<EfiMemoryType> {
        EfiMemoryType::try_from(self.memory_type).ok()
    }

    /// The capability bits, keeping bits this crate does not name.
    #[must_use]
    pub fn attributes(&self) -> EfiMemoryAttributes {
        EfiMemoryAttributes::from_bits_retain(self.attribute)
    }

    /// Length of the region in bytes.
    #[must_use]
    pub fn size_in_bytes(&self) -> u64 {
        self.number_of_pages.saturating_mul(PAGE_SIZE)
    }
}

bitflags! {
    /// Capability bits of a memory region.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EfiMemoryAttributes: u64 {
        /// Uncacheable.
        const UC = 0x0000_0000_0000_0001;
        /// Write-combining.
        const WC = 0x0000_0000_0000_0002;
        /// Write-through.
        const WT = 0x0000_0000_0000_0004;
        /// Write-back.
        const WB = 0x0000_0000_0000_0008;
        /// Uncacheable, exported, with fetch-and-add semaphore support.
        const UCE = 0x0000_0000_0000_0010;
        /// Write-protectable.
        const WP = 0x0000_0000_0000_1000;
        /// Read-protectable.
        const RP = 0x0000_0000_0000_2000;
        /// Execute-protectable.
        const XP = 0x0000_0000_0000_4000;
        /// Non-volatile.
        const NV = 0x0000_0000_0000_8000;
        /// Higher reliability than other memory in the system.
        const MORE_RELIABLE = 0x0000_0000_0001_0000;
        /// Read-only protectable.
        const RO = 0x0000_0000_0002_0000;
        /// Specific-purpose memory.
        const SP = 0x0000_0000_0004_0000;
        /// Protectable with CPU cryptographic features.
        const CPU_CRYPTO = 0x0000_0000_0008_0000;
        /// Needs a virtual mapping when `SetVirtualAddressMap` is called.
        const RUNTIME = 0x8000_0000_0000_0000;
    }
}

// ── Compile-time layout assertions ──────────────────────────────────

const _: () = {
    use core::mem::{offset_of, size_of};

    assert!(size_of::<EfiMemoryDescriptor>() == 40);
    assert!(offset_of!(EfiMemoryDescriptor, physical_start) == 8);
    assert!(offset_of!(EfiMemoryDescriptor, virtual_start) == 16);
    assert!(offset_of!(EfiMemoryDescriptor, number_of_pages) == 24);
    assert!(offset_of!(EfiMemoryDescriptor, attribute) == 32);
};
