use core::ffi::c_void;
use core::mem::{size_of, size_of_val};
use core::ops::Deref;
use core::ptr::{self, NonNull};

use log::{trace, warn};

use crate::memory::{EfiAllocateType, EfiMemoryType};
use crate::protocol::{DevicePathProtocol, Protocol};
use crate::table::{
    self, EfiEventNotify, EventType, InterfaceType, LocateSearchType, OpenProtocolAttributes,
    OpenProtocolInformationEntry, TimerDelay,
};
use crate::{Char16, EfiEvent, EfiGuid, EfiHandle, EfiPhysicalAddress, EfiStatus, EfiTpl};

use super::memory::{MemoryMap, MemoryMapSize};
use super::sizing::{self, BufferError};

/// Which handles a handle search returns.
#[derive(Debug, Clone, Copy)]
pub enum SearchType<'a> {
    /// Every handle in the handle database.
    AllHandles,
    /// Handles newly registered against a key from `register_protocol_notify`.
    ByRegisterNotify(*mut c_void),
    /// Every handle supporting the protocol.
    ByProtocol(&'a EfiGuid),
}

impl SearchType<'_> {
    fn raw(self) -> (LocateSearchType, *const EfiGuid, *mut c_void) {
        match self {
            Self::AllHandles => (LocateSearchType::AllHandles, ptr::null(), ptr::null_mut()),
            Self::ByRegisterNotify(key) => (LocateSearchType::ByRegisterNotify, ptr::null(), key),
            Self::ByProtocol(guid) => (LocateSearchType::ByProtocol, ptr::from_ref(guid), ptr::null_mut()),
        }
    }
}

/// Safe wrapper around the boot-services table.
///
/// Borrowed from a [`SystemTable<Boot>`](super::SystemTable), so it cannot be used once boot
/// services have been exited.
pub struct BootServices<'st> {
    raw: &'st table::BootServices,
    image_handle: EfiHandle,
}

impl<'st> BootServices<'st> {
    pub(crate) fn new(raw: &'st table::BootServices, image_handle: EfiHandle) -> Self {
        Self { raw, image_handle }
    }

    /// The raw table, for the variadic multi-protocol slots.
    #[must_use]
    pub fn raw(&self) -> &'st table::BootServices {
        self.raw
    }

    /// Returns the image handle.
    #[must_use]
    pub fn image_handle(&self) -> EfiHandle {
        self.image_handle
    }

    // ── Task priority ────────────────────────────────────────────

    /// Raises the task priority level. The previous level is restored when the guard drops.
    #[must_use = "dropping the guard restores the previous level immediately"]
    pub fn raise_tpl(&self, tpl: EfiTpl) -> TplGuard<'st> {
        let previous = unsafe { (self.raw.raise_tpl)(tpl) };
        TplGuard {
            raw: self.raw,
            previous,
        }
    }

    /// Restores a task priority level by hand.
    ///
    /// # Safety
    ///
    /// `old` must be a level returned by a `RaiseTPL` call that has not been restored yet.
    pub unsafe fn restore_tpl(&self, old: EfiTpl) {
        unsafe { (self.raw.restore_tpl)(old) };
    }

    // ── Memory ───────────────────────────────────────────────────

    /// Allocates `pages` pages. `address` is the placement or upper bound for
    /// [`AllocateAddress`](EfiAllocateType::AllocateAddress) and
    /// [`AllocateMaxAddress`](EfiAllocateType::AllocateMaxAddress), and ignored otherwise.
    pub fn allocate_pages(
        &self,
        alloc_type: EfiAllocateType,
        memory_type: EfiMemoryType,
        pages: usize,
        address: EfiPhysicalAddress,
    ) -> Result<EfiPhysicalAddress, EfiStatus> {
        let mut address = address;
        let status =
            unsafe { (self.raw.allocate_pages)(alloc_type, memory_type, pages, &raw mut address) };
        status.to_result().map(|()| address)
    }

    /// Frees pages.
    ///
    /// # Safety
    ///
    /// The range must come from `allocate_pages` and must no longer be in use.
    pub unsafe fn free_pages(
        &self,
        address: EfiPhysicalAddress,
        pages: usize,
    ) -> Result<(), EfiStatus> {
        unsafe { (self.raw.free_pages)(address, pages) }.to_result()
    }

    /// First half of the two-call protocol: asks for the current memory map size.
    pub fn memory_map_size(&self) -> Result<MemoryMapSize, EfiStatus> {
        let mut map_size = 0;
        let mut map_key = 0;
        let mut descriptor_size = 0;
        let mut descriptor_version = 0;
        let status = unsafe {
            (self.raw.get_memory_map)(
                &raw mut map_size,
                ptr::null_mut(),
                &raw mut map_key,
                &raw mut descriptor_size,
                &raw mut descriptor_version,
            )
        };
        match sizing::finish("GetMemoryMap", status, map_size) {
            Ok(map_size) | Err(BufferError::TooSmall { required: map_size }) => Ok(MemoryMapSize {
                map_size,
                descriptor_size,
            }),
            Err(BufferError::Status(status)) => Err(status),
        }
    }

    /// Copies the memory map into `buf`.
    ///
    /// # Errors
    ///
    /// [`BufferError::TooSmall`] if `buf` cannot hold the map; call again with at least the
    /// required size. [`BufferError::Overrun`] if firmware reports success with a size larger
    /// than `buf`. Any other failure is [`BufferError::Status`].
    pub fn memory_map<'buf>(&self, buf: &'buf mut [u8]) -> Result<MemoryMap<'buf>, BufferError> {
        let capacity = buf.len();
        let mut map_size = capacity;
        let mut map_key = 0;
        let mut descriptor_size = 0;
        let mut descriptor_version = 0;
        let status = unsafe {
            (self.raw.get_memory_map)(
                &raw mut map_size,
                buf.as_mut_ptr().cast(),
                &raw mut map_key,
                &raw mut descriptor_size,
                &raw mut descriptor_version,
            )
        };
        let written = sizing::finish("GetMemoryMap", status, map_size)?;
        let filled = buf
            .get(..written)
            .ok_or(BufferError::Overrun { written, capacity })?;
        Ok(MemoryMap::new(filled, map_key, descriptor_size, descriptor_version))
    }

    /// Allocates `size` bytes of pool memory.
    ///
    /// # Errors
    ///
    /// A firmware failure is [`BufferError::Status`]. A success that returns a null pointer
    /// is [`BufferError::NullAllocation`].
    pub fn allocate_pool(
        &self,
        pool_type: EfiMemoryType,
        size: usize,
    ) -> Result<NonNull<u8>, BufferError> {
        let mut buffer: *mut c_void = ptr::null_mut();
        unsafe { (self.raw.allocate_pool)(pool_type, size, &raw mut buffer) }
            .to_result()
            .map_err(BufferError::Status)?;
        NonNull::new(buffer.cast()).ok_or(BufferError::NullAllocation)
    }

    /// Frees pool memory.
    ///
    /// # Safety
    ///
    /// `buffer` must come from `allocate_pool` and must no longer be in use.
    pub unsafe fn free_pool(&self, buffer: NonNull<u8>) -> Result<(), EfiStatus> {
        unsafe { (self.raw.free_pool)(buffer.as_ptr().cast()) }.to_result()
    }

    // ── Events and timers ────────────────────────────────────────

    /// Creates an event.
    ///
    /// # Safety
    ///
    /// `notify` must be safe to call at `notify_tpl` with `context` for as long as the event
    /// exists.
    pub unsafe fn create_event(
        &self,
        event_type: EventType,
        notify_tpl: EfiTpl,
        notify: Option<EfiEventNotify>,
        context: *mut c_void,
    ) -> Result<EfiEvent, EfiStatus> {
        let mut event: EfiEvent = ptr::null_mut();
        let status = unsafe {
            (self.raw.create_event)(event_type, notify_tpl, notify, context, &raw mut event)
        };
        status.to_result().map(|()| event)
    }

    /// Creates an event in `group`, or an ungrouped event for `None`.
    ///
    /// # Safety
    ///
    /// As [`create_event`](Self::create_event).
    pub unsafe fn create_event_ex(
        &self,
        event_type: EventType,
        notify_tpl: EfiTpl,
        notify: Option<EfiEventNotify>,
        context: *const c_void,
        group: Option<&EfiGuid>,
    ) -> Result<EfiEvent, EfiStatus> {
        let mut event: EfiEvent = ptr::null_mut();
        let group = group.map_or(ptr::null(), ptr::from_ref);
        let status = unsafe {
            (self.raw.create_event_ex)(event_type, notify_tpl, notify, context, group, &raw mut event)
        };
        status.to_result().map(|()| event)
    }

    /// Arms or cancels the timer of `event`. `trigger_time` is in units of 100ns.
    pub fn set_timer(
        &self,
        event: EfiEvent,
        delay: TimerDelay,
        trigger_time: u64,
    ) -> Result<(), EfiStatus> {
        unsafe { (self.raw.set_timer)(event, delay, trigger_time) }.to_result()
    }

    /// Waits for any of `events` and returns the index of the one that was signalled.
    pub fn wait_for_event(&self, events: &mut [EfiEvent]) -> Result<usize, EfiStatus> {
        let mut index = 0;
        let status =
            unsafe { (self.raw.wait_for_event)(events.len(), events.as_mut_ptr(), &raw mut index) };
        status.to_result().map(|()| index)
    }

    /// Signals an event.
    pub fn signal_event(&self, event: EfiEvent) -> Result<(), EfiStatus> {
        unsafe { (self.raw.signal_event)(event) }.to_result()
    }

    /// Closes an event.
    pub fn close_event(&self, event: EfiEvent) -> Result<(), EfiStatus> {
        unsafe { (self.raw.close_event)(event) }.to_result()
    }

    /// Checks whether an event is signalled. `NOT_READY` is reported as `Ok(false)`.
    pub fn check_event(&self, event: EfiEvent) -> Result<bool, EfiStatus> {
        let status = unsafe { (self.raw.check_event)(event) };
        if status == EfiStatus::NOT_READY {
            return Ok(false);
        }
        status.to_result().map(|()| true)
    }

    // ── Protocol handlers ────────────────────────────────────────

    /// Installs an interface for `protocol` on `handle`, or on a new handle for `None`.
    /// Returns the handle the interface was installed on.
    ///
    /// # Safety
    ///
    /// `interface` must match the protocol's layout and outlive the installation.
    pub unsafe fn install_protocol_interface(
        &self,
        handle: Option<EfiHandle>,
        protocol: &EfiGuid,
        interface: *mut c_void,
    ) -> Result<EfiHandle, EfiStatus> {
        let mut handle = handle.unwrap_or(ptr::null_mut());
        let status = unsafe {
            (self.raw.install_protocol_interface)(
                &raw mut handle,
                protocol,
                InterfaceType::NativeInterface,
                interface,
            )
        };
        status.to_result().map(|()| handle)
    }

    /// Replaces an installed interface.
    ///
    /// # Safety
    ///
    /// `new` must match the protocol's layout and outlive the installation.
    pub unsafe fn reinstall_protocol_interface(
        &self,
        handle: EfiHandle,
        protocol: &EfiGuid,
        old: *mut c_void,
        new: *mut c_void,
    ) -> Result<(), EfiStatus> {
        unsafe { (self.raw.reinstall_protocol_interface)(handle, protocol, old, new) }.to_result()
    }

    /// Removes an interface from a handle.
    ///
    /// # Safety
    ///
    /// No agent may still be using `interface` through this handle.
    pub unsafe fn uninstall_protocol_interface(
        &self,
        handle: EfiHandle,
        protocol: &EfiGuid,
        interface: *mut c_void,
    ) -> Result<(), EfiStatus> {
        unsafe { (self.raw.uninstall_protocol_interface)(handle, protocol, interface) }.to_result()
    }

    /// Looks up protocol `P` on `handle`.
    ///
    /// A success with a null interface is reported as `NOT_FOUND`.
    pub fn handle_protocol<P: Protocol>(
        &self,
        handle: EfiHandle,
    ) -> Result<NonNull<P::Raw>, EfiStatus> {
        let mut interface: *mut c_void = ptr::null_mut();
        unsafe { (self.raw.handle_protocol)(handle, &P::GUID, &raw mut interface) }.to_result()?;
        NonNull::new(interface.cast()).ok_or(EfiStatus::NOT_FOUND)
    }

    /// Registers `event` to be signalled whenever `protocol` is installed. Returns the
    /// registration key for [`SearchType::ByRegisterNotify`].
    pub fn register_protocol_notify(
        &self,
        protocol: &EfiGuid,
        event: EfiEvent,
    ) -> Result<*mut c_void, EfiStatus> {
        let mut registration: *mut c_void = ptr::null_mut();
        let status =
            unsafe { (self.raw.register_protocol_notify)(protocol, event, &raw mut registration) };
        status.to_result().map(|()| registration)
    }

    /// Copies the matching handles into `buf` and returns how many were written.
    ///
    /// # Errors
    ///
    /// [`BufferError::TooSmall`] carries the required size in bytes.
    pub fn locate_handle(
        &self,
        search: SearchType<'_>,
        buf: &mut [EfiHandle],
    ) -> Result<usize, BufferError> {
        let (search_type, protocol, key) = search.raw();
        let mut size = size_of_val(buf);
        let status = unsafe {
            (self.raw.locate_handle)(search_type, protocol, key, &raw mut size, buf.as_mut_ptr())
        };
        let written = sizing::finish("LocateHandle", status, size)?;
        Ok(written / size_of::<EfiHandle>())
    }

    /// Finds the handle nearest to `*device_path` that supports `protocol`, advancing
    /// `*device_path` past the matched part.
    ///
    /// # Safety
    ///
    /// `*device_path` must point to a well-formed device path.
    pub unsafe fn locate_device_path(
        &self,
        protocol: &EfiGuid,
        device_path: &mut *mut DevicePathProtocol,
    ) -> Result<EfiHandle, EfiStatus> {
        let mut device: EfiHandle = ptr::null_mut();
        let status =
            unsafe { (self.raw.locate_device_path)(protocol, device_path, &raw mut device) };
        status.to_result().map(|()| device)
    }

    /// Adds or replaces the configuration table for `guid`, or removes it for a null `table`.
    ///
    /// # Safety
    ///
    /// `table` must stay valid for as long as it is published.
    pub unsafe fn install_configuration_table(
        &self,
        guid: &EfiGuid,
        table: *mut c_void,
    ) -> Result<(), EfiStatus> {
        unsafe { (self.raw.install_configuration_table)(guid, table) }.to_result()
    }

    // ── Images ───────────────────────────────────────────────────

    /// Loads an image from `source`, or from `device_path` when `source` is `None`.
    ///
    /// # Safety
    ///
    /// `device_path` must be null or point to a well-formed device path.
    pub unsafe fn load_image(
        &self,
        boot_policy: bool,
        device_path: *mut DevicePathProtocol,
        source: Option<&[u8]>,
    ) -> Result<EfiHandle, EfiStatus> {
        let (buffer, size) =
            source.map_or((ptr::null_mut(), 0), |s| (s.as_ptr().cast_mut().cast(), s.len()));
        let mut image: EfiHandle = ptr::null_mut();
        let status = unsafe {
            (self.raw.load_image)(
                boot_policy,
                self.image_handle,
                device_path,
                buffer,
                size,
                &raw mut image,
            )
        };
        status.to_result().map(|()| image)
    }

    /// Runs a loaded image and returns its exit status and exit data.
    ///
    /// # Safety
    ///
    /// `image` must come from `load_image` and must not have been started before.
    pub unsafe fn start_image(&self, image: EfiHandle) -> ImageExit<'st> {
        let mut size = 0;
        let mut data: *mut Char16 = ptr::null_mut();
        let status = unsafe { (self.raw.start_image)(image, &raw mut size, &raw mut data) };
        let exit_data = (!data.is_null())
            .then(|| PoolSlice::from_raw(self.raw, data, size / size_of::<Char16>()));
        ImageExit { status, exit_data }
    }

    /// Terminates the image `image`.
    ///
    /// # Safety
    ///
    /// `exit_data` must be null or pool memory holding `exit_data_size` bytes of a
    /// NUL-terminated string. When `image` is the running image this does not return on
    /// success.
    pub unsafe fn exit(
        &self,
        image: EfiHandle,
        status: EfiStatus,
        exit_data_size: usize,
        exit_data: *mut Char16,
    ) -> Result<(), EfiStatus> {
        unsafe { (self.raw.exit)(image, status, exit_data_size, exit_data) }.to_result()
    }

    /// Unloads an image.
    ///
    /// # Safety
    ///
    /// Nothing may still reference code or data of `image`.
    pub unsafe fn unload_image(&self, image: EfiHandle) -> Result<(), EfiStatus> {
        unsafe { (self.raw.unload_image)(image) }.to_result()
    }

    // ── Miscellaneous ────────────────────────────────────────────

    /// Reads the monotonic counter.
    pub fn next_monotonic_count(&self) -> Result<u64, EfiStatus> {
        let mut count = 0;
        unsafe { (self.raw.get_next_monotonic_count)(&raw mut count) }
            .to_result()
            .map(|()| count)
    }

    /// Busy-waits for at least `microseconds`.
    pub fn stall(&self, microseconds: usize) -> Result<(), EfiStatus> {
        unsafe { (self.raw.stall)(microseconds) }.to_result()
    }

    /// Arms the watchdog for `timeout` seconds, or disables it for `0`.
    pub fn set_watchdog_timer(
        &self,
        timeout: usize,
        watchdog_code: u64,
        data: Option<&[Char16]>,
    ) -> Result<(), EfiStatus> {
        let (size, data) =
            data.map_or((0, ptr::null_mut()), |d| (size_of_val(d), d.as_ptr().cast_mut()));
        unsafe { (self.raw.set_watchdog_timer)(timeout, watchdog_code, size, data) }.to_result()
    }

    // ── Driver support ───────────────────────────────────────────

    /// Connects drivers to `controller`.
    ///
    /// # Safety
    ///
    /// `drivers` must be null or a null-terminated handle array, and `remaining` null or a
    /// well-formed device path.
    pub unsafe fn connect_controller(
        &self,
        controller: EfiHandle,
        drivers: *mut EfiHandle,
        remaining: *mut DevicePathProtocol,
        recursive: bool,
    ) -> Result<(), EfiStatus> {
        unsafe { (self.raw.connect_controller)(controller, drivers, remaining, recursive) }
            .to_result()
    }

    /// Disconnects `driver` (or every driver) from `controller`, for `child` (or every
    /// child).
    ///
    /// # Safety
    ///
    /// Interfaces produced by the disconnected drivers must no longer be in use.
    pub unsafe fn disconnect_controller(
        &self,
        controller: EfiHandle,
        driver: Option<EfiHandle>,
        child: Option<EfiHandle>,
    ) -> Result<(), EfiStatus> {
        let driver = driver.unwrap_or(ptr::null_mut());
        let child = child.unwrap_or(ptr::null_mut());
        unsafe { (self.raw.disconnect_controller)(controller, driver, child) }.to_result()
    }

    // ── Open and close protocol ──────────────────────────────────

    /// Opens protocol `P` on `handle` for `agent`.
    ///
    /// # Safety
    ///
    /// The returned interface is only valid until it is closed or uninstalled.
    pub unsafe fn open_protocol<P: Protocol>(
        &self,
        handle: EfiHandle,
        agent: EfiHandle,
        controller: EfiHandle,
        attributes: OpenProtocolAttributes,
    ) -> Result<*mut P::Raw, EfiStatus> {
        let mut interface: *mut c_void = ptr::null_mut();
        let status = unsafe {
            (self.raw.open_protocol)(
                handle,
                &P::GUID,
                &raw mut interface,
                agent,
                controller,
                attributes,
            )
        };
        status.to_result().map(|()| interface.cast())
    }

    /// Closes protocol `P` opened by `agent`.
    ///
    /// # Safety
    ///
    /// The agent must no longer use the interface.
    pub unsafe fn close_protocol<P: Protocol>(
        &self,
        handle: EfiHandle,
        agent: EfiHandle,
        controller: EfiHandle,
    ) -> Result<(), EfiStatus> {
        unsafe { (self.raw.close_protocol)(handle, &P::GUID, agent, controller) }.to_result()
    }

    /// Lists the agents that have `protocol` open on `handle`.
    pub fn open_protocol_information(
        &self,
        handle: EfiHandle,
        protocol: &EfiGuid,
    ) -> Result<PoolSlice<'st, OpenProtocolInformationEntry>, EfiStatus> {
        let mut entries: *mut OpenProtocolInformationEntry = ptr::null_mut();
        let mut count = 0;
        let status = unsafe {
            (self.raw.open_protocol_information)(handle, protocol, &raw mut entries, &raw mut count)
        };
        status.to_result()?;
        Ok(PoolSlice::from_raw(self.raw, entries, count))
    }

    // ── Library ──────────────────────────────────────────────────

    /// Lists the protocol GUIDs installed on `handle`.
    pub fn protocols_per_handle(
        &self,
        handle: EfiHandle,
    ) -> Result<PoolSlice<'st, *mut EfiGuid>, EfiStatus> {
        let mut guids: *mut *mut EfiGuid = ptr::null_mut();
        let mut count = 0;
        let status =
            unsafe { (self.raw.protocols_per_handle)(handle, &raw mut guids, &raw mut count) };
        status.to_result()?;
        Ok(PoolSlice::from_raw(self.raw, guids, count))
    }

    /// Lists the matching handles in a firmware-allocated buffer.
    pub fn locate_handle_buffer(
        &self,
        search: SearchType<'_>,
    ) -> Result<PoolSlice<'st, EfiHandle>, EfiStatus> {
        let (search_type, protocol, key) = search.raw();
        let mut handles: *mut EfiHandle = ptr::null_mut();
        let mut count = 0;
        let status = unsafe {
            (self.raw.locate_handle_buffer)(
                search_type,
                protocol,
                key,
                &raw mut count,
                &raw mut handles,
            )
        };
        status.to_result()?;
        Ok(PoolSlice::from_raw(self.raw, handles, count))
    }

    /// Finds the first interface of protocol `P`.
    ///
    /// A success with a null interface is reported as `NOT_FOUND`.
    pub fn locate_protocol<P: Protocol>(&self) -> Result<NonNull<P::Raw>, EfiStatus> {
        let mut interface: *mut c_void = ptr::null_mut();
        let status =
            unsafe { (self.raw.locate_protocol)(&P::GUID, ptr::null_mut(), &raw mut interface) };
        status.to_result()?;
        NonNull::new(interface.cast()).ok_or(EfiStatus::NOT_FOUND)
    }

    // ── CRC and memory utilities ─────────────────────────────────

    /// Computes the CRC32 of `data` with the firmware's implementation.
    pub fn calculate_crc32(&self, data: &[u8]) -> Result<u32, EfiStatus> {
        let mut crc = 0;
        let status = unsafe {
            (self.raw.calculate_crc32)(data.as_ptr().cast_mut().cast(), data.len(), &raw mut crc)
        };
        status.to_result().map(|()| crc)
    }

    /// Copies `min(dst.len(), src.len())` bytes from `src` to the start of `dst` and
    /// returns that count.
    ///
    /// Unlike [`slice::copy_from_slice`], mismatched lengths do not panic: the longer
    /// buffer is truncated to the shorter one. Bytes of `dst` past the count are untouched.
    pub fn copy_mem(&self, dst: &mut [u8], src: &[u8]) -> usize {
        let len = dst.len().min(src.len());
        unsafe { (self.raw.copy_mem)(dst.as_mut_ptr().cast(), src.as_ptr().cast_mut().cast(), len) };
        len
    }

    /// Fills `buf` with `value`.
    pub fn set_mem(&self, buf: &mut [u8], value: u8) {
        unsafe { (self.raw.set_mem)(buf.as_mut_ptr().cast(), buf.len(), value) };
    }
}

/// Restores the task priority level that was current before [`BootServices::raise_tpl`].
pub struct TplGuard<'st> {
    raw: &'st table::BootServices,
    previous: EfiTpl,
}

impl TplGuard<'_> {
    /// The level that will be restored.
    #[must_use]
    pub fn previous(&self) -> EfiTpl {
        self.previous
    }
}

impl Drop for TplGuard<'_> {
    fn drop(&mut self) {
        unsafe { (self.raw.restore_tpl)(self.previous) };
    }
}

/// A firmware pool allocation holding `len` values of `T`. Freed with `FreePool` on drop.
pub struct PoolSlice<'st, T> {
    raw: &'st table::BootServices,
    data: Option<NonNull<T>>,
    len: usize,
}

impl<'st, T> PoolSlice<'st, T> {
    /// A null `data` is an empty slice that frees nothing.
    fn from_raw(raw: &'st table::BootServices, data: *mut T, len: usize) -> Self {
        let data = NonNull::new(data);
        let len = if data.is_some() { len } else { 0 };
        Self { raw, data, len }
    }
}

impl<T> Deref for PoolSlice<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        match self.data {
            // SAFETY: Firmware returned `len` initialised values at `data`.
            Some(data) => unsafe { core::slice::from_raw_parts(data.as_ptr(), self.len) },
            None => &[],
        }
    }
}

impl<T> Drop for PoolSlice<'_, T> {
    fn drop(&mut self) {
        let Some(data) = self.data else {
            return;
        };
        let status = unsafe { (self.raw.free_pool)(data.as_ptr().cast()) };
        if status.is_error() {
            warn!("FreePool failed: {status}");
        } else {
            trace!("FreePool: released {} entries", self.len);
        }
    }
}

/// What `StartImage` reported once the started image exited.
pub struct ImageExit<'st> {
    /// The image's exit status.
    pub status: EfiStatus,
    /// The image's exit data: a NUL-terminated string, optionally followed by binary data.
    pub exit_data: Option<PoolSlice<'st, Char16>>,
}

impl ImageExit<'_> {
    /// The exit status as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the status if the image exited with an error.
    pub fn to_result(&self) -> Result<(), EfiStatus> {
        self.status.to_result()
    }
}
