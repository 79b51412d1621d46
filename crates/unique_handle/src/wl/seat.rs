//! Input devices and outputs

use crate::error::Result;
use crate::handle::Handle;
use crate::wl::{create, object_or_null, proxy_kind, request};

proxy_kind! {
    /// Owned `wl_seat`
    Seat, SeatPtr, SeatTraits, wl_seat, wl_seat_interface,
    destroy: local, listener: wl_seat_listener,
}

proxy_kind! {
    /// Owned `wl_pointer`
    Pointer, PointerPtr, PointerTraits, wl_pointer, wl_pointer_interface,
    destroy: local, listener: wl_pointer_listener,
}

proxy_kind! {
    /// Owned `wl_keyboard`
    Keyboard, KeyboardPtr, KeyboardTraits, wl_keyboard, wl_keyboard_interface,
    destroy: local, listener: wl_keyboard_listener,
}

proxy_kind! {
    /// Owned `wl_touch`
    Touch, TouchPtr, TouchTraits, wl_touch, wl_touch_interface,
    destroy: local, listener: wl_touch_listener,
}

proxy_kind! {
    /// Owned `wl_output`
    Output, OutputPtr, OutputTraits, wl_output, wl_output_interface,
    destroy: local, listener: wl_output_listener,
}

const SEAT_GET_POINTER: u32 = 0;
const SEAT_GET_KEYBOARD: u32 = 1;
const SEAT_GET_TOUCH: u32 = 2;
const SEAT_RELEASE: u32 = 3;
const POINTER_SET_CURSOR: u32 = 0;
const POINTER_RELEASE: u32 = 1;
const KEYBOARD_RELEASE: u32 = 0;
const TOUCH_RELEASE: u32 = 0;
const OUTPUT_RELEASE: u32 = 0;

impl<'d> Handle<SeatTraits<'d>> {
    /// Pointer device of this seat
    pub fn get_pointer(&self) -> Result<PointerPtr<'d>> {
        create!("wl_seat_get_pointer", PointerTraits, self.proxy(), SEAT_GET_POINTER)
    }

    /// Keyboard device of this seat
    pub fn get_keyboard(&self) -> Result<KeyboardPtr<'d>> {
        create!("wl_seat_get_keyboard", KeyboardTraits, self.proxy(), SEAT_GET_KEYBOARD)
    }

    /// Touch device of this seat
    pub fn get_touch(&self) -> Result<TouchPtr<'d>> {
        create!("wl_seat_get_touch", TouchTraits, self.proxy(), SEAT_GET_TOUCH)
    }

    /// Release the seat server-side (version 5); the handle is left empty
    pub fn release_object(&mut self) {
        self.send_release(SEAT_RELEASE);
    }
}

impl Handle<PointerTraits<'_>> {
    /// Set the cursor image; `None` hides the cursor
    pub fn set_cursor(&self, serial: u32, surface: Option<&super::Surface<'_>>, hotspot_x: i32, hotspot_y: i32) {
        request!(
            self.proxy(),
            POINTER_SET_CURSOR,
            serial,
            object_or_null(surface),
            hotspot_x,
            hotspot_y,
        );
    }

    /// Release the pointer server-side (version 3); the handle is left empty
    pub fn release_object(&mut self) {
        self.send_release(POINTER_RELEASE);
    }
}

impl Handle<KeyboardTraits<'_>> {
    /// Release the keyboard server-side (version 3); the handle is left empty
    pub fn release_object(&mut self) {
        self.send_release(KEYBOARD_RELEASE);
    }
}

impl Handle<TouchTraits<'_>> {
    /// Release the touch device server-side (version 3); the handle is left empty
    pub fn release_object(&mut self) {
        self.send_release(TOUCH_RELEASE);
    }
}

impl Handle<OutputTraits<'_>> {
    /// Release the output server-side (version 3); the handle is left empty
    pub fn release_object(&mut self) {
        self.send_release(OUTPUT_RELEASE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "empty handle")]
    fn test_release_on_empty_seat_panics() {
        Seat::new().release_object();
    }

    #[test]
    fn test_default_devices_are_empty() {
        assert!(!Pointer::default().is_valid());
        assert!(KeyboardPtr::default().is_null());
        assert!(Touch::new().raw().is_null());
        assert!(!Output::default().is_valid());
    }
}
