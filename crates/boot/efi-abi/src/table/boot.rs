//! The boot-services dispatch table.
//!
//! [`BootServices`] is a header followed by 44 pointer-sized slots in a fixed order. Each
//! slot except `reserved` is a bare `unsafe extern "efiapi" fn` pointer, so the struct has
//! exactly the firmware layout and a slot can never be null in a validated table.
//!
//! `InstallMultipleProtocolInterfaces` and `UninstallMultipleProtocolInterfaces` take a
//! NULL-terminated variadic list of GUID/interface pairs. Variadic `efiapi` function
//! pointers are not expressible on stable Rust, so those two slots are typed as untyped
//! `extern "efiapi" fn()` and must be transmuted to a concrete arity before calling.
//!
//! Nothing in this table may be called after `ExitBootServices` has succeeded.

use core::ffi::c_void;

use crate::memory::{EfiAllocateType, EfiMemoryDescriptor, EfiMemoryType};
use crate::protocol::DevicePathProtocol;
use crate::{
    Boolean, Char16, EfiEvent, EfiGuid, EfiHandle, EfiPhysicalAddress, EfiStatus, EfiTpl, Uintn,
};

use super::header::{
    BOOT_SERVICES_REVISION, BOOT_SERVICES_SIGNATURE, FirmwareTable, Revision, TableHeader,
    table_size,
};
use super::{
    EfiEventNotify, EventType, InterfaceType, LocateSearchType, OpenProtocolAttributes,
    OpenProtocolInformationEntry, TimerDelay,
};

/// The boot-services table.
#[repr(C)]
pub struct BootServices {
    /// The table header (`BOOT_SERVICES_SIGNATURE`).
    pub header: TableHeader,

    // ── Task priority ────────────────────────────────────────────
    /// Raises the task priority level, returning the previous one.
    pub raise_tpl: unsafe extern "efiapi" fn(new_tpl: EfiTpl) -> EfiTpl,
    /// Lowers the task priority level back to a value returned by `raise_tpl`.
    pub restore_tpl: unsafe extern "efiapi" fn(old_tpl: EfiTpl),

    // ── Memory ───────────────────────────────────────────────────
    /// Allocates 4 KiB pages.
    pub allocate_pages: unsafe extern "efiapi" fn(
        alloc_type: EfiAllocateType,
        memory_type: EfiMemoryType,
        pages: Uintn,
        memory: *mut EfiPhysicalAddress,
    ) -> EfiStatus,
    /// Frees pages obtained from `allocate_pages`.
    pub free_pages: unsafe extern "efiapi" fn(memory: EfiPhysicalAddress, pages: Uintn) -> EfiStatus,
    /// Copies the memory map into a caller buffer. Two-call sizing: on
    /// `BUFFER_TOO_SMALL`, `memory_map_size` holds the required size.
    pub get_memory_map: unsafe extern "efiapi" fn(
        memory_map_size: *mut Uintn,
        memory_map: *mut EfiMemoryDescriptor,
        map_key: *mut Uintn,
        descriptor_size: *mut Uintn,
        descriptor_version: *mut u32,
    ) -> EfiStatus,
    /// Allocates pool memory.
    pub allocate_pool: unsafe extern "efiapi" fn(
        pool_type: EfiMemoryType,
        size: Uintn,
        buffer: *mut *mut c_void,
    ) -> EfiStatus,
    /// Frees pool memory.
    pub free_pool: unsafe extern "efiapi" fn(buffer: *mut c_void) -> EfiStatus,

    // ── Events and timers ────────────────────────────────────────
    /// Creates an event.
    pub create_event: unsafe extern "efiapi" fn(
        event_type: EventType,
        notify_tpl: EfiTpl,
        notify_function: Option<EfiEventNotify>,
        notify_context: *mut c_void,
        event: *mut EfiEvent,
    ) -> EfiStatus,
    /// Arms, re-arms, or cancels an event's timer.
    pub set_timer: unsafe extern "efiapi" fn(
        event: EfiEvent,
        timer_type: TimerDelay,
        trigger_time: u64,
    ) -> EfiStatus,
    /// Blocks until one of the events is signalled and reports which one.
    pub wait_for_event: unsafe extern "efiapi" fn(
        number_of_events: Uintn,
        event: *mut EfiEvent,
        index: *mut Uintn,
    ) -> EfiStatus,
    /// Signals an event.
    pub signal_event: unsafe extern "efiapi" fn(event: EfiEvent) -> EfiStatus,
    /// Closes an event.
    pub close_event: unsafe extern "efiapi" fn(event: EfiEvent) -> EfiStatus,
    /// Polls an event: `SUCCESS` if signalled, `NOT_READY` if not.
    pub check_event: unsafe extern "efiapi" fn(event: EfiEvent) -> EfiStatus,

    // ── Protocol handlers ────────────────────────────────────────
    /// Installs a protocol interface, creating the handle if `*handle` is null.
    pub install_protocol_interface: unsafe extern "efiapi" fn(
        handle: *mut EfiHandle,
        protocol: *const EfiGuid,
        interface_type: InterfaceType,
        interface: *mut c_void,
    ) -> EfiStatus,
    /// Replaces one protocol interface with another.
    pub reinstall_protocol_interface: unsafe extern "efiapi" fn(
        handle: EfiHandle,
        protocol: *const EfiGuid,
        old_interface: *mut c_void,
        new_interface: *mut c_void,
    ) -> EfiStatus,
    /// Removes a protocol interface from a handle.
    pub uninstall_protocol_interface: unsafe extern "efiapi" fn(
        handle: EfiHandle,
        protocol: *const EfiGuid,
        interface: *mut c_void,
    ) -> EfiStatus,
    /// Looks up a protocol interface on a handle.
    pub handle_protocol: unsafe extern "efiapi" fn(
        handle: EfiHandle,
        protocol: *const EfiGuid,
        interface: *mut *mut c_void,
    ) -> EfiStatus,
    /// Reserved. Null.
    pub reserved: *mut c_void,
    /// Registers an event signalled whenever the protocol is installed.
    pub register_protocol_notify: unsafe extern "efiapi" fn(
        protocol: *const EfiGuid,
        event: EfiEvent,
        registration: *mut *mut c_void,
    ) -> EfiStatus,
    /// Copies matching handles into a caller buffer, with two-call sizing on `buffer_size`.
    pub locate_handle: unsafe extern "efiapi" fn(
        search_type: LocateSearchType,
        protocol: *const EfiGuid,
        search_key: *mut c_void,
        buffer_size: *mut Uintn,
        buffer: *mut EfiHandle,
    ) -> EfiStatus,
    /// Finds the handle closest to a device path that supports the protocol.
    pub locate_device_path: unsafe extern "efiapi" fn(
        protocol: *const EfiGuid,
        device_path: *mut *mut DevicePathProtocol,
        device: *mut EfiHandle,
    ) -> EfiStatus,
    /// Adds, replaces, or (with a null table) removes a configuration table entry.
    pub install_configuration_table:
        unsafe extern "efiapi" fn(guid: *const EfiGuid, table: *mut c_void) -> EfiStatus,

    // ── Images ───────────────────────────────────────────────────
    /// Loads an image from a device path or from memory.
    pub load_image: unsafe extern "efiapi" fn(
        boot_policy: Boolean,
        parent_image_handle: EfiHandle,
        device_path: *mut DevicePathProtocol,
        source_buffer: *mut c_void,
        source_size: Uintn,
        image_handle: *mut EfiHandle,
    ) -> EfiStatus,
    /// Runs a loaded image's entry point.
    pub start_image: unsafe extern "efiapi" fn(
        image_handle: EfiHandle,
        exit_data_size: *mut Uintn,
        exit_data: *mut *mut Char16,
    ) -> EfiStatus,
    /// Terminates the calling image.
    pub exit: unsafe extern "efiapi" fn(
        image_handle: EfiHandle,
        exit_status: EfiStatus,
        exit_data_size: Uintn,
        exit_data: *mut Char16,
    ) -> EfiStatus,
    /// Unloads an image.
    pub unload_image: unsafe extern "efiapi" fn(image_handle: EfiHandle) -> EfiStatus,
    /// Ends boot services. `map_key` must come from the latest `get_memory_map`.
    pub exit_boot_services:
        unsafe extern "efiapi" fn(image_handle: EfiHandle, map_key: Uintn) -> EfiStatus,

    // ── Miscellaneous ────────────────────────────────────────────
    /// Reads the platform's monotonic counter.
    pub get_next_monotonic_count: unsafe extern "efiapi" fn(count: *mut u64) -> EfiStatus,
    /// Busy-waits for at least the given number of microseconds.
    pub stall: unsafe extern "efiapi" fn(microseconds: Uintn) -> EfiStatus,
    /// Arms or (with a zero timeout) disables the watchdog timer.
    pub set_watchdog_timer: unsafe extern "efiapi" fn(
        timeout: Uintn,
        watchdog_code: u64,
        data_size: Uintn,
        watchdog_data: *mut Char16,
    ) -> EfiStatus,

    // ── Driver support ───────────────────────────────────────────
    /// Connects drivers to a controller.
    pub connect_controller: unsafe extern "efiapi" fn(
        controller_handle: EfiHandle,
        driver_image_handle: *mut EfiHandle,
        remaining_device_path: *mut DevicePathProtocol,
        recursive: Boolean,
    ) -> EfiStatus,
    /// Disconnects drivers from a controller.
    pub disconnect_controller: unsafe extern "efiapi" fn(
        controller_handle: EfiHandle,
        driver_image_handle: EfiHandle,
        child_handle: EfiHandle,
    ) -> EfiStatus,

    // ── Open and close protocol ──────────────────────────────────
    /// Opens a protocol interface on behalf of an agent.
    pub open_protocol: unsafe extern "efiapi" fn(
        handle: EfiHandle,
        protocol: *const EfiGuid,
        interface: *mut *mut c_void,
        agent_handle: EfiHandle,
        controller_handle: EfiHandle,
        attributes: OpenProtocolAttributes,
    ) -> EfiStatus,
    /// Closes a protocol opened with `open_protocol`.
    pub close_protocol: unsafe extern "efiapi" fn(
        handle: EfiHandle,
        protocol: *const EfiGuid,
        agent_handle: EfiHandle,
        controller_handle: EfiHandle,
    ) -> EfiStatus,
    /// Lists the agents that have a protocol open. The array is pool memory.
    pub open_protocol_information: unsafe extern "efiapi" fn(
        handle: EfiHandle,
        protocol: *const EfiGuid,
        entry_buffer: *mut *mut OpenProtocolInformationEntry,
        entry_count: *mut Uintn,
    ) -> EfiStatus,

    // ── Library ──────────────────────────────────────────────────
    /// Lists the protocol GUIDs installed on a handle. The array is pool memory.
    pub protocols_per_handle: unsafe extern "efiapi" fn(
        handle: EfiHandle,
        protocol_buffer: *mut *mut *mut EfiGuid,
        protocol_buffer_count: *mut Uintn,
    ) -> EfiStatus,
    /// Lists matching handles. The array is pool memory.
    pub locate_handle_buffer: unsafe extern "efiapi" fn(
        search_type: LocateSearchType,
        protocol: *const EfiGuid,
        search_key: *mut c_void,
        no_handles: *mut Uintn,
        buffer: *mut *mut EfiHandle,
    ) -> EfiStatus,
    /// Finds the first interface of a protocol.
    pub locate_protocol: unsafe extern "efiapi" fn(
        protocol: *const EfiGuid,
        registration: *mut c_void,
        interface: *mut *mut c_void,
    ) -> EfiStatus,
    /// Variadic: `(handle: *mut EfiHandle, [guid, interface]..., null) -> EfiStatus`.
    pub install_multiple_protocol_interfaces: unsafe extern "efiapi" fn(),
    /// Variadic: `(handle: EfiHandle, [guid, interface]..., null) -> EfiStatus`.
    pub uninstall_multiple_protocol_interfaces: unsafe extern "efiapi" fn(),

    // ── CRC ──────────────────────────────────────────────────────
    /// Computes the CRC32 of a buffer.
    pub calculate_crc32: unsafe extern "efiapi" fn(
        data: *mut c_void,
        data_size: Uintn,
        crc32: *mut u32,
    ) -> EfiStatus,

    // ── Memory utilities ─────────────────────────────────────────
    /// Copies `length` bytes; the buffers may overlap.
    pub copy_mem:
        unsafe extern "efiapi" fn(destination: *mut c_void, source: *mut c_void, length: Uintn),
    /// Fills `size` bytes with `value`.
    pub set_mem: unsafe extern "efiapi" fn(buffer: *mut c_void, size: Uintn, value: u8),

    // ── Event groups ─────────────────────────────────────────────
    /// Creates an event, optionally in an event group.
    pub create_event_ex: unsafe extern "efiapi" fn(
        event_type: EventType,
        notify_tpl: EfiTpl,
        notify_function: Option<EfiEventNotify>,
        notify_context: *const c_void,
        event_group: *const EfiGuid,
        event: *mut EfiEvent,
    ) -> EfiStatus,
}

// SAFETY: `#[repr(C)]` and the header is the first field.
unsafe impl FirmwareTable for BootServices {
    const NAME: &'static str = "boot services";
    const SIGNATURE: u64 = BOOT_SERVICES_SIGNATURE;
    const REVISION: Revision = BOOT_SERVICES_REVISION;
    const MIN_SIZE: u32 = table_size::<Self>();
}

/// Number of slots following the header.
pub const SLOT_COUNT: usize = 44;

// ── Compile-time layout assertions ──────────────────────────────────

const _: () = {
    use core::mem::{offset_of, size_of};

    let slot = size_of::<usize>();
    assert!(size_of::<BootServices>() == TableHeader::SIZE + SLOT_COUNT * slot);
    assert!(offset_of!(BootServices, raise_tpl) == TableHeader::SIZE);
    assert!(offset_of!(BootServices, reserved) == TableHeader::SIZE + 17 * slot);
    assert!(offset_of!(BootServices, exit_boot_services) == TableHeader::SIZE + 26 * slot);
    assert!(offset_of!(BootServices, calculate_crc32) == TableHeader::SIZE + 40 * slot);
    assert!(offset_of!(BootServices, create_event_ex) == TableHeader::SIZE + 43 * slot);
};

#[cfg(target_pointer_width = "64")]
const _: () = assert!(core::mem::size_of::<BootServices>() == 376);

#[cfg(target_pointer_width = "32")]
const _: () = assert!(core::mem::size_of::<BootServices>() == 200);
