//! Display connection, event queues, registry and callbacks

use std::ffi::{CStr, CString};
use std::marker::PhantomData;
use std::os::unix::io::RawFd;
use std::ptr;

use crate::config::DisplaySettings;
use crate::error::{Error, Result};
use crate::file::FilePtr;
use crate::handle::{Handle, HandleTraits};
use crate::handle_ptr::HandlePtr;
use crate::wl::{check_count, clear_errno, create, ffi, proxy_kind, Connected};

const DISPLAY_SYNC: u32 = 0;
const DISPLAY_GET_REGISTRY: u32 = 1;
const REGISTRY_BIND: u32 = 0;

/// Policy for display connections: release is `wl_display_disconnect`
pub struct DisplayTraits;

impl HandleTraits for DisplayTraits {
    type Raw = *mut ffi::wl_display;

    fn invalid() -> Self::Raw {
        ptr::null_mut()
    }

    fn destroy(display: Self::Raw) {
        log::debug!("Disconnecting display {:p}", display);
        // SAFETY: the handle owned this connection
        unsafe { ffi::wl_display_disconnect(display) };
    }
}

/// Owned connection to a compositor
///
/// Every object created through the connection borrows it, so the display
/// outlives its registry, queues and proxies:
///
/// ```compile_fail
/// use unique_handle::wl::Display;
///
/// let mut display = Display::new();
/// display.connect(None).unwrap();
/// let registry = display.get_registry().unwrap();
/// drop(display);
/// let _ = registry.id();
/// ```
pub type Display = Handle<DisplayTraits>;

/// Pointer-style [`Display`]
pub type DisplayPtr = HandlePtr<DisplayTraits>;

/// Policy for event queues: release is `wl_event_queue_destroy`
pub struct EventQueueTraits<'d>(PhantomData<&'d Display>);

impl HandleTraits for EventQueueTraits<'_> {
    type Raw = *mut ffi::wl_event_queue;

    fn invalid() -> Self::Raw {
        ptr::null_mut()
    }

    fn destroy(queue: Self::Raw) {
        // SAFETY: the handle owned this queue
        unsafe { ffi::wl_event_queue_destroy(queue) };
    }
}

/// Owned event queue; objects are routed to it with `set_queue`
pub type EventQueue<'d> = Handle<EventQueueTraits<'d>>;

/// Pointer-style [`EventQueue`]
pub type EventQueuePtr<'d> = HandlePtr<EventQueueTraits<'d>>;

impl Handle<EventQueueTraits<'_>> {
    /// Destroy the queue, leaving the handle empty
    ///
    /// Panics on an empty handle.
    pub fn destroy(&mut self) {
        self.expect_valid();
        self.dispose();
    }
}

proxy_kind! {
    /// Owned `wl_callback`, fired once by `done`
    Callback, CallbackPtr, CallbackTraits, wl_callback, wl_callback_interface,
    destroy: local, listener: wl_callback_listener,
}

proxy_kind! {
    /// Owned `wl_registry` announcing the compositor's globals
    Registry, RegistryPtr, RegistryTraits, wl_registry, wl_registry_interface,
    destroy: local, listener: wl_registry_listener,
}

/// Fatal protocol error reported on a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolErrorInfo {
    /// Interface-specific error code
    pub code: u32,
    /// Interface of the object that caused the error, when known
    pub interface: Option<String>,
    /// Id of the object that caused the error
    pub id: u32,
}

impl Handle<DisplayTraits> {
    /// Connect to the display named `name`, or to `$WAYLAND_DISPLAY` when `None`
    ///
    /// On failure the handle stays empty. Panics if already connected.
    pub fn connect(&mut self, name: Option<&str>) -> Result<()> {
        self.expect_empty();
        let name = name
            .map(CString::new)
            .transpose()
            .map_err(|_| Error::protocol("wl_display_connect"))?;

        clear_errno();
        // SAFETY: name is null or a valid C string for the duration of the call
        let display = unsafe { ffi::wl_display_connect(name.as_deref().map_or(ptr::null(), CStr::as_ptr)) };
        if display.is_null() {
            return Err(Error::protocol_system("wl_display_connect"));
        }
        log::debug!("Connected to display {:p}", display);
        self.acquire(display);
        Ok(())
    }

    /// Connect using the display named in `settings`
    pub fn connect_with(&mut self, settings: &DisplaySettings) -> Result<()> {
        self.connect(settings.name.as_deref())
    }

    /// Connect over an already-open socket, handing its ownership to the library
    ///
    /// The library closes the descriptor on failure as well; the handle stays
    /// empty in that case.
    pub fn connect_to_fd(&mut self, mut fd: FilePtr) -> Result<()> {
        self.expect_empty();
        let raw = fd.release();

        clear_errno();
        // SAFETY: raw is an open socket; the library takes it whatever the outcome
        let display = unsafe { ffi::wl_display_connect_to_fd(raw) };
        if display.is_null() {
            return Err(Error::protocol_system("wl_display_connect_to_fd"));
        }
        log::debug!("Connected to display {:p} on fd {}", display, raw);
        self.acquire(display);
        Ok(())
    }

    /// Close the connection, leaving the handle empty
    ///
    /// Panics on an empty handle.
    pub fn disconnect(&mut self) {
        self.expect_valid();
        self.dispose();
    }

    /// Connection socket, owned by the display
    pub fn get_fd(&self) -> RawFd {
        // SAFETY: live display
        unsafe { ffi::wl_display_get_fd(self.expect_valid()) }
    }

    /// Block until events arrive on the default queue and dispatch them
    pub fn dispatch(&self) -> Result<usize> {
        let display = self.expect_valid();
        clear_errno();
        // SAFETY: live display
        check_count("wl_display_dispatch", unsafe { ffi::wl_display_dispatch(display) })
    }

    /// Dispatch already-read events on the default queue without blocking
    pub fn dispatch_pending(&self) -> Result<usize> {
        let display = self.expect_valid();
        clear_errno();
        // SAFETY: live display
        check_count("wl_display_dispatch_pending", unsafe { ffi::wl_display_dispatch_pending(display) })
    }

    /// Block until events arrive on `queue` and dispatch them
    pub fn dispatch_queue(&self, queue: &EventQueue<'_>) -> Result<usize> {
        let display = self.expect_valid();
        let queue = queue.expect_valid();
        clear_errno();
        // SAFETY: live display and queue
        check_count("wl_display_dispatch_queue", unsafe { ffi::wl_display_dispatch_queue(display, queue) })
    }

    /// Dispatch already-read events on `queue` without blocking
    pub fn dispatch_queue_pending(&self, queue: &EventQueue<'_>) -> Result<usize> {
        let display = self.expect_valid();
        let queue = queue.expect_valid();
        clear_errno();
        // SAFETY: live display and queue
        check_count("wl_display_dispatch_queue_pending", unsafe {
            ffi::wl_display_dispatch_queue_pending(display, queue)
        })
    }

    /// Errno of the fatal error on this connection, or 0
    pub fn get_error(&self) -> i32 {
        // SAFETY: live display
        unsafe { ffi::wl_display_get_error(self.expect_valid()) }
    }

    /// Details of a fatal protocol error, if one occurred
    pub fn get_protocol_error(&self) -> Option<ProtocolErrorInfo> {
        let display = self.expect_valid();
        let mut interface: *const ffi::wl_interface = ptr::null();
        let mut id = 0u32;
        // SAFETY: live display; out-pointers are valid locals
        let code = unsafe { ffi::wl_display_get_protocol_error(display, &mut interface, &mut id) };
        if code == 0 && interface.is_null() {
            return None;
        }
        // SAFETY: a non-null interface points at a static description with a C string name
        let interface = (!interface.is_null())
            .then(|| unsafe { CStr::from_ptr((*interface).name) }.to_string_lossy().into_owned());
        Some(ProtocolErrorInfo { code, interface, id })
    }

    /// Send buffered requests
    ///
    /// Returns the number of bytes sent, or `None` when the socket buffer is
    /// full and the caller should wait for it to become writable.
    pub fn flush(&self) -> Result<Option<usize>> {
        let display = self.expect_valid();
        clear_errno();
        // SAFETY: live display
        let ret = unsafe { ffi::wl_display_flush(display) };
        if ret == -1 && errno::errno().0 == libc::EAGAIN {
            return Ok(None);
        }
        check_count("wl_display_flush", ret).map(Some)
    }

    /// Block until the server has processed every request sent so far
    pub fn roundtrip(&self) -> Result<usize> {
        let display = self.expect_valid();
        clear_errno();
        // SAFETY: live display
        check_count("wl_display_roundtrip", unsafe { ffi::wl_display_roundtrip(display) })
    }

    /// Like [`Handle::roundtrip`], dispatching only `queue`
    pub fn roundtrip_queue(&self, queue: &EventQueue<'_>) -> Result<usize> {
        let display = self.expect_valid();
        let queue = queue.expect_valid();
        clear_errno();
        // SAFETY: live display and queue
        check_count("wl_display_roundtrip_queue", unsafe { ffi::wl_display_roundtrip_queue(display, queue) })
    }

    /// Create a new event queue on this connection
    pub fn create_queue(&self) -> Result<EventQueuePtr<'_>> {
        let display = self.expect_valid();
        clear_errno();
        // SAFETY: live display
        let queue = unsafe { ffi::wl_display_create_queue(display) };
        if queue.is_null() {
            return Err(Error::protocol_system("wl_display_create_queue"));
        }
        // SAFETY: a fresh queue has no other owner
        Ok(unsafe { EventQueuePtr::from_raw(queue) })
    }

    /// Announce the intent to read events; `false` means pending events must be dispatched first
    pub fn prepare_read(&self) -> bool {
        // SAFETY: live display
        unsafe { ffi::wl_display_prepare_read(self.expect_valid()) == 0 }
    }

    /// Like [`Handle::prepare_read`], for `queue`
    pub fn prepare_read_queue(&self, queue: &EventQueue<'_>) -> bool {
        let display = self.expect_valid();
        // SAFETY: live display and queue
        unsafe { ffi::wl_display_prepare_read_queue(display, queue.expect_valid()) == 0 }
    }

    /// Give up a read announced with `prepare_read`
    pub fn cancel_read(&self) {
        // SAFETY: live display
        unsafe { ffi::wl_display_cancel_read(self.expect_valid()) };
    }

    /// Read events from the socket after a successful `prepare_read`
    pub fn read_events(&self) -> Result<()> {
        let display = self.expect_valid();
        clear_errno();
        // SAFETY: live display
        check_count("wl_display_read_events", unsafe { ffi::wl_display_read_events(display) })?;
        Ok(())
    }

    /// Ask the server for a callback fired once prior requests are handled
    pub fn sync(&self) -> Result<CallbackPtr<'_>> {
        create!("wl_display_sync", CallbackTraits, self.expect_valid().cast(), DISPLAY_SYNC)
    }

    /// Create the registry of global objects
    pub fn get_registry(&self) -> Result<RegistryPtr<'_>> {
        create!(
            "wl_display_get_registry",
            RegistryTraits,
            self.expect_valid().cast(),
            DISPLAY_GET_REGISTRY
        )
    }
}

impl<'d> Handle<RegistryTraits<'d>> {
    /// Bind the global `name` as an object of kind `T`, living on the registry's display
    pub fn bind<T: Connected<'d>>(&self, name: u32, version: u32) -> Result<HandlePtr<T>> {
        let proxy = self.proxy();
        let interface = T::interface();
        clear_errno();
        // SAFETY: live registry; interface is a static description of T
        let bound = unsafe {
            ffi::wl_proxy_marshal_flags(
                proxy,
                REGISTRY_BIND,
                interface,
                version,
                0,
                name,
                (*interface).name,
                version,
                ptr::null_mut::<libc::c_void>(),
            )
        };
        crate::wl::adopt::<T>("wl_registry_bind", bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::OpenFlags;

    #[test]
    fn test_connect_to_missing_display_fails_and_stays_empty() {
        let mut display = Display::new();
        let err = display
            .connect(Some("unique-handle-no-such-display"))
            .unwrap_err();
        assert!(matches!(err, Error::Protocol { call: "wl_display_connect", .. }));
        assert!(!display.is_valid());
    }

    #[test]
    fn test_connect_to_fd_takes_the_descriptor() {
        let file = crate::file::File::with_open("/dev/null", OpenFlags::RDWR, 0).unwrap();
        let raw = file.raw();
        let mut display = Display::new();
        display.connect_to_fd(FilePtr::from(file)).unwrap();
        assert_eq!(display.get_fd(), raw);
        display.disconnect();
        assert!(!display.is_valid());
    }

    #[test]
    #[should_panic(expected = "empty handle")]
    fn test_dispatch_on_empty_display_panics() {
        let _ = Display::new().dispatch();
    }
}
