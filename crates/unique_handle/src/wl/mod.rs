//! libwayland-client object bindings
//!
//! Each protocol object kind gets a policy (`XxxTraits`), an owning handle
//! alias (`Xxx = Handle<XxxTraits>`) and a pointer alias (`XxxPtr`). Requests
//! are forwarded to the library as-is; requests that create objects return a
//! new `XxxPtr` owning the created proxy.
//!
//! Dropping a handle destroys the proxy on the client side, the same as the
//! `wl_xxx_destroy` helpers of the C headers: objects whose interface has a
//! destructor request send it, the others are only forgotten locally.
//!
//! Objects created through a [`Display`] borrow it for a lifetime `'d`
//! carried by their policy type (`Surface<'d>`, `RegistryPtr<'d>`, ...), so a
//! connection cannot be disconnected or dropped while any of its objects is
//! still alive.
//!
//! Everything here is single-threaded by construction: the raw identifiers
//! are pointers, so none of these handles are `Send` or `Sync`.

pub mod ffi;

mod compositor;
mod data_device;
mod display;
mod seat;
mod shell;
mod shm;

use std::ffi::CString;
use std::ptr;

use libc::c_void;

use crate::error::{Error, Result};
use crate::handle::{Handle, HandleTraits};
use crate::handle_ptr::HandlePtr;

pub use compositor::{
    Compositor, CompositorPtr, CompositorTraits, Region, RegionPtr, RegionTraits, Subcompositor,
    SubcompositorPtr, SubcompositorTraits, Subsurface, SubsurfacePtr, SubsurfaceTraits, Surface,
    SurfacePtr, SurfaceTraits,
};
pub use data_device::{
    DataDevice, DataDeviceManager, DataDeviceManagerPtr, DataDeviceManagerTraits, DataDevicePtr,
    DataDeviceTraits, DataOffer, DataOfferPtr, DataOfferTraits, DataSource, DataSourcePtr,
    DataSourceTraits,
};
pub use display::{
    Callback, CallbackPtr, CallbackTraits, Display, DisplayPtr, DisplayTraits, EventQueue,
    EventQueuePtr, EventQueueTraits, ProtocolErrorInfo, Registry, RegistryPtr, RegistryTraits,
};
pub use seat::{
    Keyboard, KeyboardPtr, KeyboardTraits, Output, OutputPtr, OutputTraits, Pointer, PointerPtr,
    PointerTraits, Seat, SeatPtr, SeatTraits, Touch, TouchPtr, TouchTraits,
};
pub use shell::{Shell, ShellPtr, ShellSurface, ShellSurfacePtr, ShellSurfaceTraits, ShellTraits};
pub use shm::{Buffer, BufferPtr, BufferTraits, Shm, ShmPool, ShmPoolPtr, ShmPoolTraits, ShmPtr, ShmTraits};

/// Policy of a kind backed by a `wl_proxy`
pub trait ProxyTraits: HandleTraits {
    /// Protocol interface description exported by the library
    fn interface() -> *const ffi::wl_interface;

    /// View the raw identifier as a generic proxy
    fn as_proxy(raw: Self::Raw) -> *mut ffi::wl_proxy;

    /// View a generic proxy as this kind's raw identifier
    fn from_proxy(proxy: *mut ffi::wl_proxy) -> Self::Raw;
}

/// Proxy kind living on a display connection borrowed for `'d`
///
/// Implemented for exactly one lifetime per kind, which is what lets
/// [`Registry::bind`] hand out objects that cannot outlive the registry's
/// display.
pub trait Connected<'d>: ProxyTraits {}

/// Proxy kind whose interface emits events
pub trait EventSource: ProxyTraits {
    /// `#[repr(C)]` table of event callbacks
    type Listener;
}

/// Release a raw proxy, either locally or by sending its destructor request
macro_rules! release_proxy {
    (local, $proxy:expr) => {
        $crate::wl::ffi::wl_proxy_destroy($proxy)
    };
    ($opcode:literal, $proxy:expr) => {
        $crate::wl::send_destructor($proxy, $opcode)
    };
}

/// Declare the policy and aliases for one protocol object kind
///
/// The policy carries the lifetime of the [`Display`] borrow the object was
/// created under, so no object of the kind can outlive its connection.
macro_rules! proxy_kind {
    (
        $(#[$doc:meta])*
        $name:ident, $ptr:ident, $traits:ident, $object:ident, $interface:ident,
        destroy: $how:tt $(, listener: $listener:ident)? $(,)?
    ) => {
        #[doc = concat!("Policy for `", stringify!($object), "` proxies")]
        pub struct $traits<'d>(std::marker::PhantomData<&'d $crate::wl::Display>);

        impl $crate::handle::HandleTraits for $traits<'_> {
            type Raw = *mut $crate::wl::ffi::$object;

            fn invalid() -> Self::Raw {
                std::ptr::null_mut()
            }

            fn destroy(raw: Self::Raw) {
                // SAFETY: the handle owned this proxy and its display is still connected
                unsafe { $crate::wl::release_proxy!($how, raw.cast::<$crate::wl::ffi::wl_proxy>()) }
            }
        }

        impl $crate::wl::ProxyTraits for $traits<'_> {
            fn interface() -> *const $crate::wl::ffi::wl_interface {
                std::ptr::addr_of!($crate::wl::ffi::$interface)
            }

            fn as_proxy(raw: Self::Raw) -> *mut $crate::wl::ffi::wl_proxy {
                raw.cast()
            }

            fn from_proxy(proxy: *mut $crate::wl::ffi::wl_proxy) -> Self::Raw {
                proxy.cast()
            }
        }

        impl<'d> $crate::wl::Connected<'d> for $traits<'d> {}

        $(
            impl $crate::wl::EventSource for $traits<'_> {
                type Listener = $crate::wl::ffi::$listener;
            }
        )?

        $(#[$doc])*
        pub type $name<'d> = $crate::handle::Handle<$traits<'d>>;

        #[doc = concat!("Pointer-style [`", stringify!($name), "`]")]
        pub type $ptr<'d> = $crate::handle_ptr::HandlePtr<$traits<'d>>;
    };
}

/// Send a request that carries no new object
macro_rules! request {
    ($proxy:expr, $opcode:expr $(, $arg:expr)* $(,)?) => {{
        let proxy: *mut $crate::wl::ffi::wl_proxy = $proxy;
        // SAFETY: the proxy is live and the arguments match the request signature
        unsafe {
            $crate::wl::ffi::wl_proxy_marshal_flags(
                proxy,
                $opcode,
                std::ptr::null(),
                $crate::wl::ffi::wl_proxy_get_version(proxy),
                0
                $(, $arg)*
            );
        }
    }};
}

/// Send a request whose first argument is a new object of kind `$traits`
macro_rules! create {
    ($call:literal, $traits:ty, $proxy:expr, $opcode:expr $(, $arg:expr)* $(,)?) => {{
        let proxy: *mut $crate::wl::ffi::wl_proxy = $proxy;
        $crate::wl::clear_errno();
        // SAFETY: the proxy is live and the arguments match the request signature
        let created = unsafe {
            $crate::wl::ffi::wl_proxy_marshal_flags(
                proxy,
                $opcode,
                <$traits as $crate::wl::ProxyTraits>::interface(),
                $crate::wl::ffi::wl_proxy_get_version(proxy),
                0,
                std::ptr::null_mut::<std::ffi::c_void>()
                $(, $arg)*
            )
        };
        $crate::wl::adopt::<$traits>($call, created)
    }};
}

pub(crate) use {create, proxy_kind, release_proxy, request};

/// Send a destructor request; the library frees the proxy afterwards
///
/// # Safety
/// `proxy` must be live and owned by the caller; it is dangling afterwards.
pub(crate) unsafe fn send_destructor(proxy: *mut ffi::wl_proxy, opcode: u32) {
    // SAFETY: forwarded to the caller
    unsafe {
        ffi::wl_proxy_marshal_flags(
            proxy,
            opcode,
            ptr::null(),
            ffi::wl_proxy_get_version(proxy),
            ffi::WL_MARSHAL_FLAG_DESTROY,
        );
    }
}

/// Wrap a proxy returned by a constructor request
pub(crate) fn adopt<T: ProxyTraits>(call: &'static str, proxy: *mut ffi::wl_proxy) -> Result<HandlePtr<T>> {
    if proxy.is_null() {
        return Err(Error::protocol_system(call));
    }
    log::debug!("{} created proxy {:p}", call, proxy);
    // SAFETY: a freshly created proxy has no other owner
    Ok(unsafe { HandlePtr::from_raw(T::from_proxy(proxy)) })
}

/// Clear errno so a failure reported afterwards carries a fresh value
pub(crate) fn clear_errno() {
    errno::set_errno(errno::Errno(0));
}

/// Map a `-1` return of a library call to [`Error::Protocol`]
pub(crate) fn check_count(call: &'static str, ret: libc::c_int) -> Result<usize> {
    usize::try_from(ret).map_err(|_| Error::protocol_system(call))
}

/// String argument for a request; interior NUL bytes cannot be marshalled
pub(crate) fn c_string(call: &'static str, value: &str) -> Result<CString> {
    CString::new(value).map_err(|_| Error::protocol(call))
}

/// Raw object argument for an optional handle
pub(crate) fn object_or_null<T: ProxyTraits>(handle: Option<&Handle<T>>) -> *mut ffi::wl_proxy {
    handle.map_or(ptr::null_mut(), |h| T::as_proxy(h.expect_valid()))
}

impl<T: ProxyTraits> Handle<T> {
    /// The live proxy; panics on an empty handle
    #[track_caller]
    pub(crate) fn proxy(&self) -> *mut ffi::wl_proxy {
        T::as_proxy(self.expect_valid())
    }

    /// Destroy the proxy, leaving the handle empty
    ///
    /// Panics on an empty handle.
    pub fn destroy(&mut self) {
        self.expect_valid();
        self.dispose();
    }

    /// Interface version the object was created with
    pub fn version(&self) -> u32 {
        // SAFETY: live proxy
        unsafe { ffi::wl_proxy_get_version(self.proxy()) }
    }

    /// Protocol object id
    pub fn id(&self) -> u32 {
        // SAFETY: live proxy
        unsafe { ffi::wl_proxy_get_id(self.proxy()) }
    }

    /// Send the interface's `release` destructor and empty the handle
    #[track_caller]
    pub(crate) fn send_release(&mut self, opcode: u32) {
        let proxy = self.proxy();
        self.forget();
        log::trace!("released proxy {:p} server-side", proxy);
        // SAFETY: the proxy was owned by this handle, which no longer refers to it
        unsafe { send_destructor(proxy, opcode) };
    }

    /// Route this object's events to `queue`, or back to the default queue with `None`
    ///
    /// # Safety
    /// `queue` must not be destroyed while this object is still routed to it:
    /// drop or destroy the object, or route it elsewhere, first.
    pub unsafe fn set_queue(&mut self, queue: Option<&EventQueue<'_>>) {
        let queue = queue.map_or(ptr::null_mut(), Handle::expect_valid);
        // SAFETY: live proxy; a null queue selects the default queue; the
        // queue's lifetime is forwarded to the caller
        unsafe { ffi::wl_proxy_set_queue(self.proxy(), queue) };
    }
}

impl<T: EventSource> Handle<T> {
    /// Install the event callbacks for this object
    ///
    /// Fails if a listener is already installed.
    ///
    /// # Safety
    /// `data` must stay valid, and the callbacks sound to run with it, for as
    /// long as events can be dispatched to this object.
    pub unsafe fn add_listener(&mut self, listener: &'static T::Listener, data: *mut c_void) -> Result<()> {
        let implementation = ptr::from_ref(listener).cast_mut().cast();
        // SAFETY: live proxy; the listener table matches the interface
        let ret = unsafe { ffi::wl_proxy_add_listener(self.proxy(), implementation, data) };
        if ret == -1 {
            return Err(Error::protocol("wl_proxy_add_listener"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_proxies_are_null() {
        assert!(Surface::default().raw().is_null());
        assert!(RegistryPtr::default().is_null());
        assert!(Display::default().raw().is_null());
        assert!(EventQueue::default().raw().is_null());
    }

    #[test]
    fn test_check_count() {
        assert_eq!(check_count("wl_display_dispatch", 3).unwrap(), 3);
        clear_errno();
        let err = check_count("wl_display_dispatch", -1).unwrap_err();
        assert!(matches!(err, Error::Protocol { source: None, .. }));
    }

    #[test]
    fn test_strings_with_nul_are_rejected() {
        assert_eq!(c_string("wl_data_source_offer", "text/plain").unwrap().as_bytes(), b"text/plain");
        let err = c_string("wl_data_source_offer", "text\0plain").unwrap_err();
        assert_eq!(err.call(), "wl_data_source_offer");
    }

    #[test]
    fn test_interfaces_are_named() {
        let name = unsafe { std::ffi::CStr::from_ptr((*SurfaceTraits::interface()).name) };
        assert_eq!(name.to_str().unwrap(), "wl_surface");
    }

    #[test]
    #[should_panic(expected = "empty handle")]
    fn test_request_on_empty_proxy_panics() {
        Surface::new().commit();
    }
}
