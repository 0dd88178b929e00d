//! The system table and the runtime-services header.

use crate::protocol::{SimpleTextInputProtocol, SimpleTextOutputProtocol};
use crate::{Char16, EfiHandle, Uintn};

use super::header::{
    FirmwareTable, RUNTIME_SERVICES_REVISION, RUNTIME_SERVICES_SIGNATURE, Revision,
    SYSTEM_TABLE_REVISION, SYSTEM_TABLE_SIGNATURE, TableHeader, table_size,
};
use super::{BootServices, ConfigurationTable};

/// The system table passed to an image's entry point.
///
/// Owned by firmware. The boot-services and console fields stop being meaningful once
/// `ExitBootServices` succeeds.
#[repr(C)]
pub struct SystemTable {
    /// The table header (`SYSTEM_TABLE_SIGNATURE`).
    pub header: TableHeader,
    /// NUL-terminated UCS-2 name of the firmware vendor.
    pub firmware_vendor: *const Char16,
    /// Vendor-specific firmware revision.
    pub firmware_revision: u32,
    /// Handle of the active console input device.
    pub console_in_handle: EfiHandle,
    /// Text input protocol installed on `console_in_handle`.
    pub console_in: *mut SimpleTextInputProtocol,
    /// Handle of the active console output device.
    pub console_out_handle: EfiHandle,
    /// Text output protocol installed on `console_out_handle`.
    pub console_out: *mut SimpleTextOutputProtocol,
    /// Handle of the active standard error device.
    pub standard_error_handle: EfiHandle,
    /// Text output protocol installed on `standard_error_handle`.
    pub standard_error: *mut SimpleTextOutputProtocol,
    /// The runtime-services table.
    pub runtime_services: *mut RuntimeServices,
    /// The boot-services table.
    pub boot_services: *mut BootServices,
    /// Number of entries in `configuration_table`.
    pub number_of_table_entries: Uintn,
    /// The configuration table array.
    pub configuration_table: *mut ConfigurationTable,
}

// SAFETY: `#[repr(C)]` and the header is the first field.
unsafe impl FirmwareTable for SystemTable {
    const NAME: &'static str = "system table";
    const SIGNATURE: u64 = SYSTEM_TABLE_SIGNATURE;
    const REVISION: Revision = SYSTEM_TABLE_REVISION;
    const MIN_SIZE: u32 = table_size::<Self>();
}

/// The runtime-services table.
///
/// Only the header is described; the service slots that follow it are not part of this
/// crate.
#[repr(C)]
pub struct RuntimeServices {
    /// The table header (`RUNTIME_SERVICES_SIGNATURE`).
    pub header: TableHeader,
}

// SAFETY: `#[repr(C)]` and the header is the first field.
unsafe impl FirmwareTable for RuntimeServices {
    const NAME: &'static str = "runtime services";
    const SIGNATURE: u64 = RUNTIME_SERVICES_SIGNATURE;
    const REVISION: Revision = RUNTIME_SERVICES_REVISION;
    const MIN_SIZE: u32 = table_size::<TableHeader>();
}

// ── Compile-time layout assertions ──────────────────────────────────

#[cfg(target_pointer_width = "64")]
const _: () = {
    use core::mem::{offset_of, size_of};

    // 4 bytes of padding follow `firmware_revision`.
    assert!(size_of::<SystemTable>() == 120);
    assert!(offset_of!(SystemTable, header) == 0);
    assert!(offset_of!(SystemTable, firmware_vendor) == 24);
    assert!(offset_of!(SystemTable, firmware_revision) == 32);
    assert!(offset_of!(SystemTable, console_in_handle) == 40);
    assert!(offset_of!(SystemTable, console_in) == 48);
    assert!(offset_of!(SystemTable, console_out_handle) == 56);
    assert!(offset_of!(SystemTable, console_out) == 64);
    assert!(offset_of!(SystemTable, standard_error_handle) == 72);
    assert!(offset_of!(SystemTable, standard_error) == 80);
    assert!(offset_of!(SystemTable, runtime_services) == 88);
    assert!(offset_of!(SystemTable, boot_services) == 96);
    assert!(offset_of!(SystemTable, number_of_table_entries) == 104);
    assert!(offset_of!(SystemTable, configuration_table) == 112);
};

#[cfg(target_pointer_width = "32")]
const _: () = {
    use core::mem::{offset_of, size_of};

    assert!(size_of::<SystemTable>() == 72);
    assert!(offset_of!(SystemTable, firmware_vendor) == 24);
    assert!(offset_of!(SystemTable, firmware_revision) == 28);
    assert!(offset_of!(SystemTable, console_in_handle) == 32);
    assert!(offset_of!(SystemTable, runtime_services) == 56);
    assert!(offset_of!(SystemTable, boot_services) == 60);
    assert!(offset_of!(SystemTable, number_of_table_entries) == 64);
    assert!(offset_of!(SystemTable, configuration_table) == 68);
};

const _: () = assert!(core::mem::size_of::<RuntimeServices>() == TableHeader::SIZE);
