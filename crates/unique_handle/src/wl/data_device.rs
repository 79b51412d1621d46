//! Clipboard and drag-and-drop

use std::ptr;

use crate::error::Result;
use crate::file::FilePtr;
use crate::handle::Handle;
use crate::wl::{c_string, create, object_or_null, proxy_kind, request, Seat, Surface};

proxy_kind! {
    /// Owned `wl_data_offer`
    DataOffer, DataOfferPtr, DataOfferTraits, wl_data_offer, wl_data_offer_interface,
    destroy: 2, listener: wl_data_offer_listener,
}

proxy_kind! {
    /// Owned `wl_data_source`
    DataSource, DataSourcePtr, DataSourceTraits, wl_data_source, wl_data_source_interface,
    destroy: 1, listener: wl_data_source_listener,
}

proxy_kind! {
    /// Owned `wl_data_device`
    DataDevice, DataDevicePtr, DataDeviceTraits, wl_data_device, wl_data_device_interface,
    destroy: local, listener: wl_data_device_listener,
}

proxy_kind! {
    /// Owned `wl_data_device_manager`
    DataDeviceManager, DataDeviceManagerPtr, DataDeviceManagerTraits, wl_data_device_manager,
    wl_data_device_manager_interface,
    destroy: local,
}

mod opcode {
    pub const OFFER_ACCEPT: u32 = 0;
    pub const OFFER_RECEIVE: u32 = 1;
    pub const OFFER_FINISH: u32 = 3;
    pub const OFFER_SET_ACTIONS: u32 = 4;

    pub const SOURCE_OFFER: u32 = 0;
    pub const SOURCE_SET_ACTIONS: u32 = 2;

    pub const DEVICE_START_DRAG: u32 = 0;
    pub const DEVICE_SET_SELECTION: u32 = 1;
    pub const DEVICE_RELEASE: u32 = 2;

    pub const MANAGER_CREATE_DATA_SOURCE: u32 = 0;
    pub const MANAGER_GET_DATA_DEVICE: u32 = 1;
}

impl Handle<DataOfferTraits<'_>> {
    /// Accept `mime_type`, or signal that nothing is accepted with `None`
    pub fn accept(&self, serial: u32, mime_type: Option<&str>) -> Result<()> {
        let proxy = self.proxy();
        let mime_type = mime_type.map(|m| c_string("wl_data_offer_accept", m)).transpose()?;
        request!(
            proxy,
            opcode::OFFER_ACCEPT,
            serial,
            mime_type.as_deref().map_or(ptr::null(), std::ffi::CStr::as_ptr),
        );
        Ok(())
    }

    /// Ask the source to write `mime_type` data into `fd`
    ///
    /// The library sends a duplicate; the local descriptor is closed once the
    /// request is queued.
    pub fn receive(&self, mime_type: &str, fd: FilePtr) -> Result<()> {
        let proxy = self.proxy();
        let mime_type = c_string("wl_data_offer_receive", mime_type)?;
        request!(proxy, opcode::OFFER_RECEIVE, mime_type.as_ptr(), fd.expect_valid());
        drop(fd);
        Ok(())
    }

    /// Finish a drag-and-drop operation
    pub fn finish(&self) {
        request!(self.proxy(), opcode::OFFER_FINISH);
    }

    /// Set the supported and preferred drag-and-drop actions
    pub fn set_actions(&self, dnd_actions: u32, preferred_action: u32) {
        request!(self.proxy(), opcode::OFFER_SET_ACTIONS, dnd_actions, preferred_action);
    }
}

impl Handle<DataSourceTraits<'_>> {
    /// Advertise a mime type this source can provide
    pub fn offer(&self, mime_type: &str) -> Result<()> {
        let proxy = self.proxy();
        let mime_type = c_string("wl_data_source_offer", mime_type)?;
        request!(proxy, opcode::SOURCE_OFFER, mime_type.as_ptr());
        Ok(())
    }

    /// Set the drag-and-drop actions this source supports
    pub fn set_actions(&self, dnd_actions: u32) {
        request!(self.proxy(), opcode::SOURCE_SET_ACTIONS, dnd_actions);
    }
}

impl Handle<DataDeviceTraits<'_>> {
    /// Start a drag from `origin`; a `None` source makes it a client-local drag
    pub fn start_drag(&self, source: Option<&DataSource<'_>>, origin: &Surface<'_>, icon: Option<&Surface<'_>>, serial: u32) {
        request!(
            self.proxy(),
            opcode::DEVICE_START_DRAG,
            object_or_null(source),
            origin.proxy(),
            object_or_null(icon),
            serial,
        );
    }

    /// Set the selection; `None` clears it
    pub fn set_selection(&self, source: Option<&DataSource<'_>>, serial: u32) {
        request!(self.proxy(), opcode::DEVICE_SET_SELECTION, object_or_null(source), serial);
    }

    /// Release the device server-side (version 2); the handle is left empty
    pub fn release_object(&mut self) {
        self.send_release(opcode::DEVICE_RELEASE);
    }
}

impl<'d> Handle<DataDeviceManagerTraits<'d>> {
    /// Create a new data source
    pub fn create_data_source(&self) -> Result<DataSourcePtr<'d>> {
        create!(
            "wl_data_device_manager_create_data_source",
            DataSourceTraits,
            self.proxy(),
            opcode::MANAGER_CREATE_DATA_SOURCE,
        )
    }

    /// Data device of `seat`
    pub fn get_data_device(&self, seat: &Seat<'_>) -> Result<DataDevicePtr<'d>> {
        create!(
            "wl_data_device_manager_get_data_device",
            DataDeviceTraits,
            self.proxy(),
            opcode::MANAGER_GET_DATA_DEVICE,
            seat.proxy(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "empty handle")]
    fn test_offer_on_empty_source_panics() {
        let _ = DataSource::new().offer("text/plain");
    }

    #[test]
    #[should_panic(expected = "empty handle")]
    fn test_release_on_empty_device_panics() {
        DataDevice::new().release_object();
    }
}
