//! Raw declarations for libwayland-client
//!
//! Only the symbols the library actually exports are declared here. The
//! per-request helpers that `wayland-client-protocol.h` defines inline are
//! expressed in the binding modules through `wl_proxy_marshal_flags`.

#![allow(non_camel_case_types, missing_docs)]

use libc::{c_char, c_int, c_void};

macro_rules! opaque {
    ($($name:ident),* $(,)?) => {$(
        #[repr(C)]
        pub struct $name {
            _private: [u8; 0],
        }
    )*};
}

opaque!(
    wl_proxy,
    wl_display,
    wl_event_queue,
    wl_registry,
    wl_callback,
    wl_compositor,
    wl_shm_pool,
    wl_shm,
    wl_buffer,
    wl_data_offer,
    wl_data_source,
    wl_data_device,
    wl_data_device_manager,
    wl_shell,
    wl_shell_surface,
    wl_surface,
    wl_seat,
    wl_pointer,
    wl_keyboard,
    wl_touch,
    wl_output,
    wl_region,
    wl_subcompositor,
    wl_subsurface,
);

/// 24.8 signed fixed-point value
pub type wl_fixed_t = i32;

#[repr(C)]
pub struct wl_message {
    pub name: *const c_char,
    pub signature: *const c_char,
    pub types: *const *const wl_interface,
}

#[repr(C)]
pub struct wl_interface {
    pub name: *const c_char,
    pub version: c_int,
    pub method_count: c_int,
    pub methods: *const wl_message,
    pub event_count: c_int,
    pub events: *const wl_message,
}

#[repr(C)]
pub struct wl_array {
    pub size: usize,
    pub alloc: usize,
    pub data: *mut c_void,
}

/// Destroy the proxy after marshalling the request
pub const WL_MARSHAL_FLAG_DESTROY: u32 = 1 << 0;

#[link(name = "wayland-client")]
extern "C" {
    pub fn wl_display_connect(name: *const c_char) -> *mut wl_display;
    pub fn wl_display_connect_to_fd(fd: c_int) -> *mut wl_display;
    pub fn wl_display_disconnect(display: *mut wl_display);
    pub fn wl_display_get_fd(display: *mut wl_display) -> c_int;
    pub fn wl_display_dispatch(display: *mut wl_display) -> c_int;
    pub fn wl_display_dispatch_queue(display: *mut wl_display, queue: *mut wl_event_queue) -> c_int;
    pub fn wl_display_dispatch_queue_pending(display: *mut wl_display, queue: *mut wl_event_queue) -> c_int;
    pub fn wl_display_dispatch_pending(display: *mut wl_display) -> c_int;
    pub fn wl_display_get_error(display: *mut wl_display) -> c_int;
    pub fn wl_display_get_protocol_error(
        display: *mut wl_display,
        interface: *mut *const wl_interface,
        id: *mut u32,
    ) -> u32;
    pub fn wl_display_flush(display: *mut wl_display) -> c_int;
    pub fn wl_display_roundtrip_queue(display: *mut wl_display, queue: *mut wl_event_queue) -> c_int;
    pub fn wl_display_roundtrip(display: *mut wl_display) -> c_int;
    pub fn wl_display_create_queue(display: *mut wl_display) -> *mut wl_event_queue;
    pub fn wl_display_prepare_read_queue(display: *mut wl_display, queue: *mut wl_event_queue) -> c_int;
    pub fn wl_display_prepare_read(display: *mut wl_display) -> c_int;
    pub fn wl_display_cancel_read(display: *mut wl_display);
    pub fn wl_display_read_events(display: *mut wl_display) -> c_int;

    pub fn wl_event_queue_destroy(queue: *mut wl_event_queue);

    pub fn wl_proxy_marshal_flags(
        proxy: *mut wl_proxy,
        opcode: u32,
        interface: *const wl_interface,
        version: u32,
        flags: u32,
        ...
    ) -> *mut wl_proxy;
    pub fn wl_proxy_add_listener(
        proxy: *mut wl_proxy,
        implementation: *mut Option<unsafe extern "C" fn()>,
        data: *mut c_void,
    ) -> c_int;
    pub fn wl_proxy_destroy(proxy: *mut wl_proxy);
    pub fn wl_proxy_get_version(proxy: *mut wl_proxy) -> u32;
    pub fn wl_proxy_get_id(proxy: *mut wl_proxy) -> u32;
    pub fn wl_proxy_set_queue(proxy: *mut wl_proxy, queue: *mut wl_event_queue);

    pub static wl_registry_interface: wl_interface;
    pub static wl_callback_interface: wl_interface;
    pub static wl_compositor_interface: wl_interface;
    pub static wl_shm_pool_interface: wl_interface;
    pub static wl_shm_interface: wl_interface;
    pub static wl_buffer_interface: wl_interface;
    pub static wl_data_offer_interface: wl_interface;
    pub static wl_data_source_interface: wl_interface;
    pub static wl_data_device_interface: wl_interface;
    pub static wl_data_device_manager_interface: wl_interface;
    pub static wl_shell_interface: wl_interface;
    pub static wl_shell_surface_interface: wl_interface;
    pub static wl_surface_interface: wl_interface;
    pub static wl_seat_interface: wl_interface;
    pub static wl_pointer_interface: wl_interface;
    pub static wl_keyboard_interface: wl_interface;
    pub static wl_touch_interface: wl_interface;
    pub static wl_output_interface: wl_interface;
    pub static wl_region_interface: wl_interface;
    pub static wl_subcompositor_interface: wl_interface;
    pub static wl_subsurface_interface: wl_interface;
}

// Listener tables. Field order and signatures follow the event order of the
// core protocol; every slot must be filled because the library calls
// whichever event arrives.

#[repr(C)]
pub struct wl_callback_listener {
    pub done: unsafe extern "C" fn(data: *mut c_void, callback: *mut wl_callback, callback_data: u32),
}

#[repr(C)]
pub struct wl_registry_listener {
    pub global: unsafe extern "C" fn(
        data: *mut c_void,
        registry: *mut wl_registry,
        name: u32,
        interface: *const c_char,
        version: u32,
    ),
    pub global_remove: unsafe extern "C" fn(data: *mut c_void, registry: *mut wl_registry, name: u32),
}

#[repr(C)]
pub struct wl_surface_listener {
    pub enter: unsafe extern "C" fn(data: *mut c_void, surface: *mut wl_surface, output: *mut wl_output),
    pub leave: unsafe extern "C" fn(data: *mut c_void, surface: *mut wl_surface, output: *mut wl_output),
    pub preferred_buffer_scale: unsafe extern "C" fn(data: *mut c_void, surface: *mut wl_surface, factor: i32),
    pub preferred_buffer_transform:
        unsafe extern "C" fn(data: *mut c_void, surface: *mut wl_surface, transform: u32),
}

#[repr(C)]
pub struct wl_buffer_listener {
    pub release: unsafe extern "C" fn(data: *mut c_void, buffer: *mut wl_buffer),
}

#[repr(C)]
pub struct wl_shm_listener {
    pub format: unsafe extern "C" fn(data: *mut c_void, shm: *mut wl_shm, format: u32),
}

#[repr(C)]
pub struct wl_data_offer_listener {
    pub offer: unsafe extern "C" fn(data: *mut c_void, offer: *mut wl_data_offer, mime_type: *const c_char),
    pub source_actions: unsafe extern "C" fn(data: *mut c_void, offer: *mut wl_data_offer, actions: u32),
    pub action: unsafe extern "C" fn(data: *mut c_void, offer: *mut wl_data_offer, dnd_action: u32),
}

#[repr(C)]
pub struct wl_data_source_listener {
    pub target: unsafe extern "C" fn(data: *mut c_void, source: *mut wl_data_source, mime_type: *const c_char),
    pub send: unsafe extern "C" fn(
        data: *mut c_void,
        source: *mut wl_data_source,
        mime_type: *const c_char,
        fd: i32,
    ),
    pub cancelled: unsafe extern "C" fn(data: *mut c_void, source: *mut wl_data_source),
    pub dnd_drop_performed: unsafe extern "C" fn(data: *mut c_void, source: *mut wl_data_source),
    pub dnd_finished: unsafe extern "C" fn(data: *mut c_void, source: *mut wl_data_source),
    pub action: unsafe extern "C" fn(data: *mut c_void, source: *mut wl_data_source, dnd_action: u32),
}

#[repr(C)]
pub struct wl_data_device_listener {
    pub data_offer: unsafe extern "C" fn(data: *mut c_void, device: *mut wl_data_device, id: *mut wl_data_offer),
    pub enter: unsafe extern "C" fn(
        data: *mut c_void,
        device: *mut wl_data_device,
        serial: u32,
        surface: *mut wl_surface,
        x: wl_fixed_t,
        y: wl_fixed_t,
        id: *mut wl_data_offer,
    ),
    pub leave: unsafe extern "C" fn(data: *mut c_void, device: *mut wl_data_device),
    pub motion: unsafe extern "C" fn(
        data: *mut c_void,
        device: *mut wl_data_device,
        time: u32,
        x: wl_fixed_t,
        y: wl_fixed_t,
    ),
    pub drop: unsafe extern "C" fn(data: *mut c_void, device: *mut wl_data_device),
    pub selection: unsafe extern "C" fn(data: *mut c_void, device: *mut wl_data_device, id: *mut wl_data_offer),
}

#[repr(C)]
pub struct wl_shell_surface_listener {
    pub ping: unsafe extern "C" fn(data: *mut c_void, shell_surface: *mut wl_shell_surface, serial: u32),
    pub configure: unsafe extern "C" fn(
        data: *mut c_void,
        shell_surface: *mut wl_shell_surface,
        edges: u32,
        width: i32,
        height: i32,
    ),
    pub popup_done: unsafe extern "C" fn(data: *mut c_void, shell_surface: *mut wl_shell_surface),
}

#[repr(C)]
pub struct wl_seat_listener {
    pub capabilities: unsafe extern "C" fn(data: *mut c_void, seat: *mut wl_seat, capabilities: u32),
    pub name: unsafe extern "C" fn(data: *mut c_void, seat: *mut wl_seat, name: *const c_char),
}

#[repr(C)]
pub struct wl_pointer_listener {
    pub enter: unsafe extern "C" fn(
        data: *mut c_void,
        pointer: *mut wl_pointer,
        serial: u32,
        surface: *mut wl_surface,
        surface_x: wl_fixed_t,
        surface_y: wl_fixed_t,
    ),
    pub leave: unsafe extern "C" fn(data: *mut c_void, pointer: *mut wl_pointer, serial: u32, surface: *mut wl_surface),
    pub motion: unsafe extern "C" fn(
        data: *mut c_void,
        pointer: *mut wl_pointer,
        time: u32,
        surface_x: wl_fixed_t,
        surface_y: wl_fixed_t,
    ),
    pub button: unsafe extern "C" fn(
        data: *mut c_void,
        pointer: *mut wl_pointer,
        serial: u32,
        time: u32,
        button: u32,
        state: u32,
    ),
    pub axis: unsafe extern "C" fn(data: *mut c_void, pointer: *mut wl_pointer, time: u32, axis: u32, value: wl_fixed_t),
    pub frame: unsafe extern "C" fn(data: *mut c_void, pointer: *mut wl_pointer),
    pub axis_source: unsafe extern "C" fn(data: *mut c_void, pointer: *mut wl_pointer, axis_source: u32),
    pub axis_stop: unsafe extern "C" fn(data: *mut c_void, pointer: *mut wl_pointer, time: u32, axis: u32),
    pub axis_discrete: unsafe extern "C" fn(data: *mut c_void, pointer: *mut wl_pointer, axis: u32, discrete: i32),
    pub axis_value120: unsafe extern "C" fn(data: *mut c_void, pointer: *mut wl_pointer, axis: u32, value120: i32),
    pub axis_relative_direction:
        unsafe extern "C" fn(data: *mut c_void, pointer: *mut wl_pointer, axis: u32, direction: u32),
}

#[repr(C)]
pub struct wl_keyboard_listener {
    pub keymap: unsafe extern "C" fn(data: *mut c_void, keyboard: *mut wl_keyboard, format: u32, fd: i32, size: u32),
    pub enter: unsafe extern "C" fn(
        data: *mut c_void,
        keyboard: *mut wl_keyboard,
        serial: u32,
        surface: *mut wl_surface,
        keys: *mut wl_array,
    ),
    pub leave: unsafe extern "C" fn(data: *mut c_void, keyboard: *mut wl_keyboard, serial: u32, surface: *mut wl_surface),
    pub key: unsafe extern "C" fn(
        data: *mut c_void,
        keyboard: *mut wl_keyboard,
        serial: u32,
        time: u32,
        key: u32,
        state: u32,
    ),
    pub modifiers: unsafe extern "C" fn(
        data: *mut c_void,
        keyboard: *mut wl_keyboard,
        serial: u32,
        mods_depressed: u32,
        mods_latched: u32,
        mods_locked: u32,
        group: u32,
    ),
    pub repeat_info: unsafe extern "C" fn(data: *mut c_void, keyboard: *mut wl_keyboard, rate: i32, delay: i32),
}

#[repr(C)]
pub struct wl_touch_listener {
    pub down: unsafe extern "C" fn(
        data: *mut c_void,
        touch: *mut wl_touch,
        serial: u32,
        time: u32,
        surface: *mut wl_surface,
        id: i32,
        x: wl_fixed_t,
        y: wl_fixed_t,
    ),
    pub up: unsafe extern "C" fn(data: *mut c_void, touch: *mut wl_touch, serial: u32, time: u32, id: i32),
    pub motion: unsafe extern "C" fn(
        data: *mut c_void,
        touch: *mut wl_touch,
        time: u32,
        id: i32,
        x: wl_fixed_t,
        y: wl_fixed_t,
    ),
    pub frame: unsafe extern "C" fn(data: *mut c_void, touch: *mut wl_touch),
    pub cancel: unsafe extern "C" fn(data: *mut c_void, touch: *mut wl_touch),
    pub shape: unsafe extern "C" fn(data: *mut c_void, touch: *mut wl_touch, id: i32, major: wl_fixed_t, minor: wl_fixed_t),
    pub orientation: unsafe extern "C" fn(data: *mut c_void, touch: *mut wl_touch, id: i32, orientation: wl_fixed_t),
}

#[repr(C)]
pub struct wl_output_listener {
    pub geometry: unsafe extern "C" fn(
        data: *mut c_void,
        output: *mut wl_output,
        x: i32,
        y: i32,
        physical_width: i32,
        physical_height: i32,
        subpixel: i32,
        make: *const c_char,
        model: *const c_char,
        transform: i32,
    ),
    pub mode: unsafe extern "C" fn(data: *mut c_void, output: *mut wl_output, flags: u32, width: i32, height: i32, refresh: i32),
    pub done: unsafe extern "C" fn(data: *mut c_void, output: *mut wl_output),
    pub scale: unsafe extern "C" fn(data: *mut c_void, output: *mut wl_output, factor: i32),
    pub name: unsafe extern "C" fn(data: *mut c_void, output: *mut wl_output, name: *const c_char),
    pub description: unsafe extern "C" fn(data: *mut c_void, output: *mut wl_output, description: *const c_char),
}
