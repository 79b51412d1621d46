//! Protocol bindings without a running compositor
#![cfg(feature = "wayland")]

use unique_handle::prelude::*;
use unique_handle::wl::{Surface, SurfaceTraits};

fn init_logging() {
    let _ = env_logger::Builder::from_default_env().is_test(true).try_init();
}

#[test]
fn test_connect_to_unknown_socket_fails() {
    init_logging();
    let mut display = Display::new();
    let err = display.connect(Some("no-such-display")).unwrap_err();
    assert!(matches!(err, Error::Protocol { call: "wl_display_connect", .. }));
    assert!(!display.is_valid());
}

#[test]
fn test_socket_pair_connection_owns_descriptor() {
    init_logging();
    let (socket, peer) = socket_pair();
    let raw = socket.get();

    let mut display = Display::new();
    display.connect_to_fd(socket).unwrap();
    assert_eq!(display.get_fd(), raw);

    let registry = display.get_registry().unwrap();
    assert!(!registry.is_null());
    assert!(registry.id() > 1);
    assert_eq!(display.flush().unwrap().map(|sent| sent > 0), Some(true));

    drop(registry);
    display.disconnect();
    drop(peer);
}

fn socket_pair() -> (FilePtr, File) {
    let mut fds = [0; 2];
    let ret = unsafe { libc::socketpair(libc::AF_UNIX, libc::SOCK_STREAM | libc::SOCK_CLOEXEC, 0, fds.as_mut_ptr()) };
    assert_eq!(ret, 0);
    unsafe { (FilePtr::from_raw(fds[0]), File::from_raw(fds[1])) }
}

#[test]
fn test_children_are_released_before_disconnect() {
    init_logging();
    let (socket, peer) = socket_pair();
    let mut display = Display::new();
    display.connect_to_fd(socket).unwrap();

    {
        let queue = display.create_queue().unwrap();
        let mut registry = display.get_registry().unwrap();
        let callback = display.sync().unwrap();
        unsafe { registry.set_queue(Some(&queue)) };
        assert_ne!(registry.id(), callback.id());
        assert_eq!(display.flush().unwrap().map(|sent| sent > 0), Some(true));

        unsafe { registry.set_queue(None) };
        drop(callback);
        drop(registry);
        drop(queue);
    }

    display.disconnect();
    assert!(!display.is_valid());
    drop(peer);
}

#[test]
fn test_interface_descriptions_are_exported() {
    let interface = unsafe { &*SurfaceTraits::interface() };
    assert!(interface.version >= 4);
    assert!(!Surface::default().is_valid());
}
