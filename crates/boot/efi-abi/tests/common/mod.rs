//! A fake firmware for host tests.
//!
//! Builds sealed system, boot-services, and runtime-services tables whose slots are
//! `extern "efiapi"` stubs backed by thread-local state. Each test constructs its own
//! [`FakeFirmware`], which resets that state.

#![allow(dead_code, clippy::missing_safety_doc)]

use std::alloc::{Layout, alloc_zeroed, dealloc};
use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::c_void;
use std::mem::size_of;
use std::ptr;

use efi_abi::memory::{EfiAllocateType, EfiMemoryDescriptor, EfiMemoryType};
use efi_abi::protocol::{DevicePathProtocol, SimpleTextInputProtocol, SimpleTextOutputProtocol};
use efi_abi::table::header::{self, BOOT_SERVICES_SIGNATURE, RUNTIME_SERVICES_SIGNATURE};
use efi_abi::table::{
    BootServices, ConfigurationTable, EfiEventNotify, EventType, InterfaceType, LocateSearchType,
    OpenProtocolAttributes, OpenProtocolInformationEntry, Revision, RuntimeServices,
    SYSTEM_TABLE_SIGNATURE, SystemTable, TableHeader, TimerDelay,
};
use efi_abi::{
    Boolean, Char16, EfiEvent, EfiGuid, EfiHandle, EfiPhysicalAddress, EfiStatus, EfiTpl, tpl,
};

pub const VENDOR: &str = "Fake EDK II";
pub const FIRMWARE_REVISION: u32 = 0x0001_0000;
pub const DESCRIPTOR_SIZE: usize = 48;
pub const IMAGE: usize = 0x1000;
pub const EVENT: usize = 0x2000;
pub const CONSOLE_IN: usize = 0x3000;
pub const CONSOLE_OUT: usize = 0x3100;
pub const STANDARD_ERROR: usize = 0x3200;
pub const ACPI_TABLE: usize = 0xe_0000;
pub const EXIT_DATA: &str = "done";

pub fn fake_ptr<T>(addr: usize) -> *mut T {
    ptr::without_provenance_mut(addr)
}

pub fn image() -> EfiHandle {
    fake_ptr(IMAGE)
}

// ── State ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct State {
    pub tpl: EfiTpl,
    pub tpl_log: Vec<(&'static str, EfiTpl)>,
    pub memory_map: Vec<EfiMemoryDescriptor>,
    pub map_key: usize,
    pub exit_attempts: Vec<usize>,
    pub exited: bool,
    pub pools: HashMap<usize, Layout>,
    pub handles: Vec<EfiHandle>,
    pub signalled: bool,
    pub stalls: Vec<usize>,
    pub monotonic: u64,
    pub start_status: Option<EfiStatus>,
    pub calls: Vec<Call>,
    pub forced: HashMap<&'static str, EfiStatus>,
    /// Extra bytes `GetMemoryMap` claims to have written on success.
    pub overreport: usize,
    /// `AllocatePool` reports success without writing a pointer.
    pub null_pool: bool,
}

/// A call recorded by a relaying slot: service name, protocol GUID, remaining arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub service: &'static str,
    pub guid: Option<EfiGuid>,
    pub args: Vec<usize>,
}

thread_local! {
    static STATE: RefCell<State> = RefCell::new(State::default());
}

pub fn with_state<R>(f: impl FnOnce(&mut State) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

fn descriptor(memory_type: EfiMemoryType, start: u64, pages: u64) -> EfiMemoryDescriptor {
    EfiMemoryDescriptor {
        memory_type: memory_type as u32,
        physical_start: start,
        virtual_start: 0,
        number_of_pages: pages,
        attribute: 0x8,
    }
}

fn reset_state() {
    with_state(|s| {
        *s = State {
            tpl: tpl::APPLICATION,
            memory_map: vec![
                descriptor(EfiMemoryType::LoaderCode, 0x10_0000, 16),
                descriptor(EfiMemoryType::ConventionalMemory, 0x20_0000, 256),
                descriptor(EfiMemoryType::BootServicesData, 0x30_0000, 32),
            ],
            map_key: 0x77,
            handles: vec![fake_ptr(0x4000), fake_ptr(0x4100), fake_ptr(0x4200)],
            ..State::default()
        };
    });
}

/// Allocates zeroed pool memory. Every allocation changes the memory map key.
fn pool_alloc(size: usize) -> *mut u8 {
    let Ok(layout) = Layout::from_size_align(size.max(1), 8) else {
        return ptr::null_mut();
    };
    let ptr = unsafe { alloc_zeroed(layout) };
    with_state(|s| {
        s.pools.insert(ptr as usize, layout);
        s.map_key += 1;
    });
    ptr
}

/// Records a call and returns the status forced for `service`, or `SUCCESS`.
fn relay(service: &'static str, protocol: *const EfiGuid, args: &[usize]) -> EfiStatus {
    let guid = unsafe { protocol.as_ref() }.copied();
    with_state(|s| {
        s.calls.push(Call {
            service,
            guid,
            args: args.to_vec(),
        });
        s.forced.get(service).copied().unwrap_or(EfiStatus::SUCCESS)
    })
}

/// Makes every later call to a relaying `service` return `status`.
pub fn fail(service: &'static str, status: EfiStatus) {
    with_state(|s| {
        s.forced.insert(service, status);
    });
}

/// The most recent relayed call.
pub fn last_call() -> Option<Call> {
    with_state(|s| s.calls.last().cloned())
}

/// Number of pool allocations not yet freed.
pub fn live_pools() -> usize {
    with_state(|s| s.pools.len())
}

// ── Tables ───────────────────────────────────────────────────────────

pub struct FakeFirmware {
    pub system: *mut SystemTable,
    pub boot: *mut BootServices,
    pub runtime: *mut RuntimeServices,
}

impl FakeFirmware {
    pub fn new() -> Self {
        Self::with_revision(Revision::EFI_2_80)
    }

    /// Tables whose headers all carry `revision`.
    pub fn with_revision(revision: Revision) -> Self {
        reset_state();

        let vendor: Vec<u16> = VENDOR.encode_utf16().chain([0]).collect();
        let vendor = Box::leak(vendor.into_boxed_slice());
        let config = Box::leak(
            vec![
                ConfigurationTable {
                    vendor_guid: EfiGuid::ACPI_20_TABLE,
                    vendor_table: fake_ptr(ACPI_TABLE),
                },
                ConfigurationTable {
                    vendor_guid: EfiGuid::SMBIOS3_TABLE,
                    vendor_table: fake_ptr(0xf_0000),
                },
                ConfigurationTable {
                    vendor_guid: EfiGuid::DEVICE_TREE_TABLE,
                    vendor_table: fake_ptr(0x8_0000),
                },
            ]
            .into_boxed_slice(),
        );

        let runtime = Box::into_raw(Box::new(RuntimeServices {
            header: TableHeader::new(
                RUNTIME_SERVICES_SIGNATURE,
                revision,
                size_of::<RuntimeServices>() as u32,
            ),
        }));
        let boot = Box::into_raw(Box::new(boot_services(revision)));

        // Every field of the system table is valid when zeroed, padding included.
        let mut system = unsafe { Box::<SystemTable>::new_zeroed().assume_init() };
        system.header =
            TableHeader::new(SYSTEM_TABLE_SIGNATURE, revision, size_of::<SystemTable>() as u32);
        system.firmware_vendor = vendor.as_ptr();
        system.firmware_revision = FIRMWARE_REVISION;
        system.console_in_handle = fake_ptr(0x5000);
        system.console_in = fake_ptr::<SimpleTextInputProtocol>(CONSOLE_IN);
        system.console_out_handle = fake_ptr(0x5100);
        system.console_out = fake_ptr::<SimpleTextOutputProtocol>(CONSOLE_OUT);
        system.standard_error_handle = fake_ptr(0x5200);
        system.standard_error = fake_ptr::<SimpleTextOutputProtocol>(STANDARD_ERROR);
        system.runtime_services = runtime;
        system.boot_services = boot;
        system.number_of_table_entries = config.len();
        system.configuration_table = config.as_mut_ptr();

        let fw = Self {
            system: Box::into_raw(system),
            boot,
            runtime,
        };
        fw.reseal();
        fw
    }

    /// Recomputes every table CRC, for tests that edit a table and want it to stay valid.
    pub fn reseal(&self) {
        seal(self.boot);
        seal(self.runtime);
        seal(self.system);
    }
}

fn seal<T>(table: *mut T) {
    let bytes = unsafe { std::slice::from_raw_parts_mut(table.cast::<u8>(), size_of::<T>()) };
    header::seal(bytes).expect("fake tables are never truncated");
}

fn boot_services(revision: Revision) -> BootServices {
    BootServices {
        header: TableHeader::new(
            BOOT_SERVICES_SIGNATURE,
            revision,
            size_of::<BootServices>() as u32,
        ),
        raise_tpl,
        restore_tpl,
        allocate_pages,
        free_pages,
        get_memory_map,
        allocate_pool,
        free_pool,
        create_event,
        set_timer,
        wait_for_event,
        signal_event,
        close_event,
        check_event,
        install_protocol_interface,
        reinstall_protocol_interface,
        uninstall_protocol_interface,
        handle_protocol,
        reserved: ptr::null_mut(),
        register_protocol_notify,
        locate_handle,
        locate_device_path,
        install_configuration_table,
        load_image,
        start_image,
        exit,
        unload_image,
        exit_boot_services,
        get_next_monotonic_count,
        stall,
        set_watchdog_timer,
        connect_controller,
        disconnect_controller,
        open_protocol,
        close_protocol,
        open_protocol_information,
        protocols_per_handle,
        locate_handle_buffer,
        locate_protocol,
        install_multiple_protocol_interfaces: unsupported_variadic,
        uninstall_multiple_protocol_interfaces: unsupported_variadic,
        calculate_crc32,
        copy_mem,
        set_mem,
        create_event_ex,
    }
}

// ── Slots ────────────────────────────────────────────────────────────

unsafe extern "efiapi" fn raise_tpl(new_tpl: EfiTpl) -> EfiTpl {
    with_state(|s| {
        s.tpl_log.push(("raise", new_tpl));
        std::mem::replace(&mut s.tpl, new_tpl)
    })
}

unsafe extern "efiapi" fn restore_tpl(old_tpl: EfiTpl) {
    with_state(|s| {
        s.tpl_log.push(("restore", old_tpl));
        s.tpl = old_tpl;
    });
}

unsafe extern "efiapi" fn allocate_pages(
    alloc_type: EfiAllocateType,
    _memory_type: EfiMemoryType,
    pages: usize,
    memory: *mut EfiPhysicalAddress,
) -> EfiStatus {
    if pages == 0 {
        return EfiStatus::INVALID_PARAMETER;
    }
    if alloc_type == EfiAllocateType::AllocateAnyPages {
        unsafe { *memory = 0x20_0000 };
    }
    EfiStatus::SUCCESS
}

unsafe extern "efiapi" fn free_pages(_memory: EfiPhysicalAddress, _pages: usize) -> EfiStatus {
    EfiStatus::SUCCESS
}

unsafe extern "efiapi" fn get_memory_map(
    memory_map_size: *mut usize,
    memory_map: *mut EfiMemoryDescriptor,
    map_key: *mut usize,
    descriptor_size: *mut usize,
    descriptor_version: *mut u32,
) -> EfiStatus {
    with_state(|s| {
        let required = s.memory_map.len() * DESCRIPTOR_SIZE;
        unsafe {
            *descriptor_size = DESCRIPTOR_SIZE;
            *descriptor_version = 1;
            if *memory_map_size < required || memory_map.is_null() {
                *memory_map_size = required;
                return EfiStatus::BUFFER_TOO_SMALL;
            }
            let base = memory_map.cast::<u8>();
            for (i, desc) in s.memory_map.iter().enumerate() {
                base.add(i * DESCRIPTOR_SIZE)
                    .cast::<EfiMemoryDescriptor>()
                    .write_unaligned(*desc);
            }
            *memory_map_size = required + s.overreport;
            *map_key = s.map_key;
        }
        EfiStatus::SUCCESS
    })
}

unsafe extern "efiapi" fn allocate_pool(
    _pool_type: EfiMemoryType,
    size: usize,
    buffer: *mut *mut c_void,
) -> EfiStatus {
    if with_state(|s| s.null_pool) {
        return EfiStatus::SUCCESS;
    }
    let ptr = pool_alloc(size);
    if ptr.is_null() {
        return EfiStatus::OUT_OF_RESOURCES;
    }
    unsafe { *buffer = ptr.cast() };
    EfiStatus::SUCCESS
}

unsafe extern "efiapi" fn free_pool(buffer: *mut c_void) -> EfiStatus {
    let Some(layout) = with_state(|s| s.pools.remove(&(buffer as usize))) else {
        return EfiStatus::INVALID_PARAMETER;
    };
    unsafe { dealloc(buffer.cast(), layout) };
    EfiStatus::SUCCESS
}

unsafe extern "efiapi" fn create_event(
    _event_type: EventType,
    _notify_tpl: EfiTpl,
    _notify_function: Option<EfiEventNotify>,
    _notify_context: *mut c_void,
    event: *mut EfiEvent,
) -> EfiStatus {
    unsafe { *event = fake_ptr(EVENT) };
    EfiStatus::SUCCESS
}

unsafe extern "efiapi" fn set_timer(
    event: EfiEvent,
    _timer_type: TimerDelay,
    _trigger_time: u64,
) -> EfiStatus {
    if event.is_null() {
        EfiStatus::INVALID_PARAMETER
    } else {
        EfiStatus::SUCCESS
    }
}

unsafe extern "efiapi" fn wait_for_event(
    number_of_events: usize,
    _event: *mut EfiEvent,
    index: *mut usize,
) -> EfiStatus {
    if number_of_events == 0 {
        return EfiStatus::INVALID_PARAMETER;
    }
    unsafe { *index = number_of_events - 1 };
    EfiStatus::SUCCESS
}

unsafe extern "efiapi" fn signal_event(_event: EfiEvent) -> EfiStatus {
    with_state(|s| s.signalled = true);
    EfiStatus::SUCCESS
}

unsafe extern "efiapi" fn close_event(_event: EfiEvent) -> EfiStatus {
    EfiStatus::SUCCESS
}

unsafe extern "efiapi" fn check_event(event: EfiEvent) -> EfiStatus {
    if event.is_null() {
        return EfiStatus::INVALID_PARAMETER;
    }
    if with_state(|s| std::mem::take(&mut s.signalled)) {
        EfiStatus::SUCCESS
    } else {
        EfiStatus::NOT_READY
    }
}

unsafe extern "efiapi" fn install_protocol_interface(
    _handle: *mut EfiHandle,
    _protocol: *const EfiGuid,
    _interface_type: InterfaceType,
    _interface: *mut c_void,
) -> EfiStatus {
    EfiStatus::UNSUPPORTED
}

unsafe extern "efiapi" fn reinstall_protocol_interface(
    handle: EfiHandle,
    protocol: *const EfiGuid,
    old_interface: *mut c_void,
    new_interface: *mut c_void,
) -> EfiStatus {
    relay(
        "ReinstallProtocolInterface",
        protocol,
        &[handle as usize, old_interface as usize, new_interface as usize],
    )
}

unsafe extern "efiapi" fn uninstall_protocol_interface(
    handle: EfiHandle,
    protocol: *const EfiGuid,
    interface: *mut c_void,
) -> EfiStatus {
    relay("UninstallProtocolInterface", protocol, &[handle as usize, interface as usize])
}

unsafe extern "efiapi" fn handle_protocol(
    _handle: EfiHandle,
    protocol: *const EfiGuid,
    interface: *mut *mut c_void,
) -> EfiStatus {
    if unsafe { *protocol } == EfiGuid::SIMPLE_TEXT_OUTPUT_PROTOCOL {
        unsafe { *interface = fake_ptr(CONSOLE_OUT) };
        EfiStatus::SUCCESS
    } else {
        EfiStatus::UNSUPPORTED
    }
}

unsafe extern "efiapi" fn register_protocol_notify(
    _protocol: *const EfiGuid,
    _event: EfiEvent,
    _registration: *mut *mut c_void,
) -> EfiStatus {
    EfiStatus::UNSUPPORTED
}

/// Handles matching a search; `None` when nothing matches.
fn matching_handles(
    search_type: LocateSearchType,
    protocol: *const EfiGuid,
) -> Option<Vec<EfiHandle>> {
    let handles = with_state(|s| s.handles.clone());
    let matched = match search_type {
        LocateSearchType::AllHandles => Some(handles),
        LocateSearchType::ByProtocol
            if unsafe { *protocol } == EfiGuid::SIMPLE_TEXT_OUTPUT_PROTOCOL =>
        {
            Some(handles)
        }
        _ => None,
    };
    matched.filter(|handles| !handles.is_empty())
}

unsafe extern "efiapi" fn locate_handle(
    search_type: LocateSearchType,
    protocol: *const EfiGuid,
    _search_key: *mut c_void,
    buffer_size: *mut usize,
    buffer: *mut EfiHandle,
) -> EfiStatus {
    let Some(handles) = matching_handles(search_type, protocol) else {
        return EfiStatus::NOT_FOUND;
    };
    let required = handles.len() * size_of::<EfiHandle>();
    unsafe {
        if *buffer_size < required {
            *buffer_size = required;
            return EfiStatus::BUFFER_TOO_SMALL;
        }
        ptr::copy_nonoverlapping(handles.as_ptr(), buffer, handles.len());
        *buffer_size = required;
    }
    EfiStatus::SUCCESS
}

/// Matches the first node of the path and advances `*device_path` past it.
unsafe extern "efiapi" fn locate_device_path(
    protocol: *const EfiGuid,
    device_path: *mut *mut DevicePathProtocol,
    device: *mut EfiHandle,
) -> EfiStatus {
    let path = unsafe { *device_path };
    let status = relay("LocateDevicePath", protocol, &[path as usize]);
    if status.is_error() {
        return status;
    }
    unsafe {
        let first = usize::from((*path).node_length());
        *device_path = path.byte_add(first);
        *device = fake_ptr(0x4000);
    }
    status
}

unsafe extern "efiapi" fn install_configuration_table(
    guid: *const EfiGuid,
    table: *mut c_void,
) -> EfiStatus {
    relay("InstallConfigurationTable", guid, &[table as usize])
}

unsafe extern "efiapi" fn load_image(
    _boot_policy: Boolean,
    _parent_image_handle: EfiHandle,
    _device_path: *mut DevicePathProtocol,
    source_buffer: *mut c_void,
    _source_size: usize,
    image_handle: *mut EfiHandle,
) -> EfiStatus {
    if source_buffer.is_null() {
        return EfiStatus::NOT_FOUND;
    }
    unsafe { *image_handle = fake_ptr(0x6000) };
    EfiStatus::SUCCESS
}

unsafe extern "efiapi" fn start_image(
    _image_handle: EfiHandle,
    exit_data_size: *mut usize,
    exit_data: *mut *mut Char16,
) -> EfiStatus {
    let text: Vec<u16> = EXIT_DATA.encode_utf16().chain([0]).collect();
    let bytes = text.len() * size_of::<Char16>();
    let data = pool_alloc(bytes).cast::<Char16>();
    unsafe {
        ptr::copy_nonoverlapping(text.as_ptr(), data, text.len());
        *exit_data_size = bytes;
        *exit_data = data;
    }
    with_state(|s| s.start_status.unwrap_or(EfiStatus::SUCCESS))
}

unsafe extern "efiapi" fn exit(
    image_handle: EfiHandle,
    exit_status: EfiStatus,
    exit_data_size: usize,
    exit_data: *mut Char16,
) -> EfiStatus {
    relay(
        "Exit",
        ptr::null(),
        &[
            image_handle as usize,
            exit_status.0 as usize,
            exit_data_size,
            exit_data as usize,
        ],
    )
}

unsafe extern "efiapi" fn unload_image(image_handle: EfiHandle) -> EfiStatus {
    relay("UnloadImage", ptr::null(), &[image_handle as usize])
}

unsafe extern "efiapi" fn exit_boot_services(_image_handle: EfiHandle, map_key: usize) -> EfiStatus {
    with_state(|s| {
        s.exit_attempts.push(map_key);
        if !s.exited && map_key == s.map_key {
            s.exited = true;
            EfiStatus::SUCCESS
        } else {
            EfiStatus::INVALID_PARAMETER
        }
    })
}

unsafe extern "efiapi" fn get_next_monotonic_count(count: *mut u64) -> EfiStatus {
    let next = with_state(|s| {
        s.monotonic += 1;
        s.monotonic
    });
    unsafe { *count = next };
    EfiStatus::SUCCESS
}

unsafe extern "efiapi" fn stall(microseconds: usize) -> EfiStatus {
    with_state(|s| s.stalls.push(microseconds));
    EfiStatus::SUCCESS
}

unsafe extern "efiapi" fn set_watchdog_timer(
    _timeout: usize,
    _watchdog_code: u64,
    data_size: usize,
    watchdog_data: *mut Char16,
) -> EfiStatus {
    if data_size != 0 && watchdog_data.is_null() {
        return EfiStatus::INVALID_PARAMETER;
    }
    EfiStatus::SUCCESS
}

unsafe extern "efiapi" fn connect_controller(
    _controller_handle: EfiHandle,
    _driver_image_handle: *mut EfiHandle,
    _remaining_device_path: *mut DevicePathProtocol,
    _recursive: Boolean,
) -> EfiStatus {
    EfiStatus::NOT_FOUND
}

unsafe extern "efiapi" fn disconnect_controller(
    controller_handle: EfiHandle,
    driver_image_handle: EfiHandle,
    child_handle: EfiHandle,
) -> EfiStatus {
    relay(
        "DisconnectController",
        ptr::null(),
        &[
            controller_handle as usize,
            driver_image_handle as usize,
            child_handle as usize,
        ],
    )
}

unsafe extern "efiapi" fn open_protocol(
    _handle: EfiHandle,
    _protocol: *const EfiGuid,
    interface: *mut *mut c_void,
    _agent_handle: EfiHandle,
    _controller_handle: EfiHandle,
    attributes: OpenProtocolAttributes,
) -> EfiStatus {
    if !attributes.contains(OpenProtocolAttributes::TEST_PROTOCOL) {
        unsafe { *interface = fake_ptr(CONSOLE_OUT) };
    }
    EfiStatus::SUCCESS
}

unsafe extern "efiapi" fn close_protocol(
    handle: EfiHandle,
    protocol: *const EfiGuid,
    agent_handle: EfiHandle,
    controller_handle: EfiHandle,
) -> EfiStatus {
    relay(
        "CloseProtocol",
        protocol,
        &[handle as usize, agent_handle as usize, controller_handle as usize],
    )
}

unsafe extern "efiapi" fn open_protocol_information(
    _handle: EfiHandle,
    _protocol: *const EfiGuid,
    entry_buffer: *mut *mut OpenProtocolInformationEntry,
    entry_count: *mut usize,
) -> EfiStatus {
    let entries = pool_alloc(size_of::<OpenProtocolInformationEntry>())
        .cast::<OpenProtocolInformationEntry>();
    unsafe {
        entries.write(OpenProtocolInformationEntry {
            agent_handle: image(),
            controller_handle: ptr::null_mut(),
            attributes: OpenProtocolAttributes::BY_DRIVER | OpenProtocolAttributes::EXCLUSIVE,
            open_count: 1,
        });
        *entry_buffer = entries;
        *entry_count = 1;
    }
    EfiStatus::SUCCESS
}

static INSTALLED: [EfiGuid; 2] = [
    EfiGuid::SIMPLE_TEXT_OUTPUT_PROTOCOL,
    EfiGuid::DEVICE_PATH_PROTOCOL,
];

unsafe extern "efiapi" fn protocols_per_handle(
    _handle: EfiHandle,
    protocol_buffer: *mut *mut *mut EfiGuid,
    protocol_buffer_count: *mut usize,
) -> EfiStatus {
    let array = pool_alloc(INSTALLED.len() * size_of::<*mut EfiGuid>()).cast::<*mut EfiGuid>();
    unsafe {
        for (i, guid) in INSTALLED.iter().enumerate() {
            array.add(i).write(ptr::from_ref(guid).cast_mut());
        }
        *protocol_buffer = array;
        *protocol_buffer_count = INSTALLED.len();
    }
    EfiStatus::SUCCESS
}

unsafe extern "efiapi" fn locate_handle_buffer(
    search_type: LocateSearchType,
    protocol: *const EfiGuid,
    _search_key: *mut c_void,
    no_handles: *mut usize,
    buffer: *mut *mut EfiHandle,
) -> EfiStatus {
    let Some(handles) = matching_handles(search_type, protocol) else {
        return EfiStatus::NOT_FOUND;
    };
    let array = pool_alloc(handles.len() * size_of::<EfiHandle>()).cast::<EfiHandle>();
    unsafe {
        ptr::copy_nonoverlapping(handles.as_ptr(), array, handles.len());
        *no_handles = handles.len();
        *buffer = array;
    }
    EfiStatus::SUCCESS
}

unsafe extern "efiapi" fn locate_protocol(
    protocol: *const EfiGuid,
    _registration: *mut c_void,
    interface: *mut *mut c_void,
) -> EfiStatus {
    unsafe { handle_protocol(ptr::null_mut(), protocol, interface) }
}

unsafe extern "efiapi" fn unsupported_variadic() {}

unsafe extern "efiapi" fn calculate_crc32(
    data: *mut c_void,
    data_size: usize,
    crc32: *mut u32,
) -> EfiStatus {
    if data.is_null() || data_size == 0 {
        return EfiStatus::INVALID_PARAMETER;
    }
    let bytes = unsafe { std::slice::from_raw_parts(data.cast::<u8>(), data_size) };
    unsafe { *crc32 = crc32fast::hash(bytes) };
    EfiStatus::SUCCESS
}

unsafe extern "efiapi" fn copy_mem(destination: *mut c_void, source: *mut c_void, length: usize) {
    unsafe { ptr::copy(source.cast::<u8>(), destination.cast::<u8>(), length) };
}

unsafe extern "efiapi" fn set_mem(buffer: *mut c_void, size: usize, value: u8) {
    unsafe { ptr::write_bytes(buffer.cast::<u8>(), value, size) };
}

unsafe extern "efiapi" fn create_event_ex(
    event_type: EventType,
    notify_tpl: EfiTpl,
    notify_function: Option<EfiEventNotify>,
    notify_context: *const c_void,
    _event_group: *const EfiGuid,
    event: *mut EfiEvent,
) -> EfiStatus {
    unsafe {
        create_event(
            event_type,
            notify_tpl,
            notify_function,
            notify_context.cast_mut(),
            event,
        )
    }
}
