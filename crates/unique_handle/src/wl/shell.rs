//! Legacy desktop shell

use crate::error::Result;
use crate::handle::Handle;
use crate::wl::{c_string, create, object_or_null, proxy_kind, request, Output, Seat, Surface};

proxy_kind! {
    /// Owned `wl_shell`
    Shell, ShellPtr, ShellTraits, wl_shell, wl_shell_interface,
    destroy: local,
}

proxy_kind! {
    /// Owned `wl_shell_surface`
    ShellSurface, ShellSurfacePtr, ShellSurfaceTraits, wl_shell_surface, wl_shell_surface_interface,
    destroy: local, listener: wl_shell_surface_listener,
}

mod opcode {
    pub const SHELL_GET_SHELL_SURFACE: u32 = 0;

    pub const PONG: u32 = 0;
    pub const MOVE: u32 = 1;
    pub const RESIZE: u32 = 2;
    pub const SET_TOPLEVEL: u32 = 3;
    pub const SET_TRANSIENT: u32 = 4;
    pub const SET_FULLSCREEN: u32 = 5;
    pub const SET_POPUP: u32 = 6;
    pub const SET_MAXIMIZED: u32 = 7;
    pub const SET_TITLE: u32 = 8;
    pub const SET_CLASS: u32 = 9;
}

impl<'d> Handle<ShellTraits<'d>> {
    /// Give `surface` the shell surface role
    pub fn get_shell_surface(&self, surface: &Surface<'_>) -> Result<ShellSurfacePtr<'d>> {
        create!(
            "wl_shell_get_shell_surface",
            ShellSurfaceTraits,
            self.proxy(),
            opcode::SHELL_GET_SHELL_SURFACE,
            surface.proxy(),
        )
    }
}

impl Handle<ShellSurfaceTraits<'_>> {
    /// Answer a ping event
    pub fn pong(&self, serial: u32) {
        request!(self.proxy(), opcode::PONG, serial);
    }

    /// Start an interactive move
    pub fn r#move(&self, seat: &Seat<'_>, serial: u32) {
        request!(self.proxy(), opcode::MOVE, seat.proxy(), serial);
    }

    /// Start an interactive resize from the given edges
    pub fn resize(&self, seat: &Seat<'_>, serial: u32, edges: u32) {
        request!(self.proxy(), opcode::RESIZE, seat.proxy(), serial, edges);
    }

    /// Map as a toplevel window
    pub fn set_toplevel(&self) {
        request!(self.proxy(), opcode::SET_TOPLEVEL);
    }

    /// Map relative to `parent`
    pub fn set_transient(&self, parent: &Surface<'_>, x: i32, y: i32, flags: u32) {
        request!(self.proxy(), opcode::SET_TRANSIENT, parent.proxy(), x, y, flags);
    }

    /// Map fullscreen; `None` lets the compositor pick the output
    pub fn set_fullscreen(&self, method: u32, framerate: u32, output: Option<&Output<'_>>) {
        request!(
            self.proxy(),
            opcode::SET_FULLSCREEN,
            method,
            framerate,
            object_or_null(output),
        );
    }

    /// Map as a popup grabbing `seat`
    pub fn set_popup(&self, seat: &Seat<'_>, serial: u32, parent: &Surface<'_>, x: i32, y: i32, flags: u32) {
        request!(
            self.proxy(),
            opcode::SET_POPUP,
            seat.proxy(),
            serial,
            parent.proxy(),
            x,
            y,
            flags,
        );
    }

    /// Map maximized; `None` lets the compositor pick the output
    pub fn set_maximized(&self, output: Option<&Output<'_>>) {
        request!(self.proxy(), opcode::SET_MAXIMIZED, object_or_null(output));
    }

    /// Set the window title
    ///
    /// Fails without sending anything if `title` contains a NUL byte.
    pub fn set_title(&self, title: &str) -> Result<()> {
        let proxy = self.proxy();
        let title = c_string("wl_shell_surface_set_title", title)?;
        request!(proxy, opcode::SET_TITLE, title.as_ptr());
        Ok(())
    }

    /// Set the window class, conventionally the desktop file name
    pub fn set_class(&self, class: &str) -> Result<()> {
        let proxy = self.proxy();
        let class = c_string("wl_shell_surface_set_class", class)?;
        request!(proxy, opcode::SET_CLASS, class.as_ptr());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "empty handle")]
    fn test_title_on_empty_surface_panics() {
        let _ = ShellSurface::new().set_title("probe");
    }
}
