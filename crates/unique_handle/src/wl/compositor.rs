//! Compositor, surfaces, regions and subsurfaces

use crate::error::Result;
use crate::handle::Handle;
use crate::wl::{create, object_or_null, proxy_kind, request};

proxy_kind! {
    /// Owned `wl_compositor`
    Compositor, CompositorPtr, CompositorTraits, wl_compositor, wl_compositor_interface,
    destroy: local,
}

proxy_kind! {
    /// Owned `wl_surface`
    Surface, SurfacePtr, SurfaceTraits, wl_surface, wl_surface_interface,
    destroy: 0, listener: wl_surface_listener,
}

proxy_kind! {
    /// Owned `wl_region`
    Region, RegionPtr, RegionTraits, wl_region, wl_region_interface,
    destroy: 0,
}

proxy_kind! {
    /// Owned `wl_subcompositor`
    Subcompositor, SubcompositorPtr, SubcompositorTraits, wl_subcompositor, wl_subcompositor_interface,
    destroy: 0,
}

proxy_kind! {
    /// Owned `wl_subsurface`
    Subsurface, SubsurfacePtr, SubsurfaceTraits, wl_subsurface, wl_subsurface_interface,
    destroy: 0,
}

mod opcode {
    pub const COMPOSITOR_CREATE_SURFACE: u32 = 0;
    pub const COMPOSITOR_CREATE_REGION: u32 = 1;

    pub const SURFACE_ATTACH: u32 = 1;
    pub const SURFACE_DAMAGE: u32 = 2;
    pub const SURFACE_FRAME: u32 = 3;
    pub const SURFACE_SET_OPAQUE_REGION: u32 = 4;
    pub const SURFACE_SET_INPUT_REGION: u32 = 5;
    pub const SURFACE_COMMIT: u32 = 6;
    pub const SURFACE_SET_BUFFER_TRANSFORM: u32 = 7;
    pub const SURFACE_SET_BUFFER_SCALE: u32 = 8;
    pub const SURFACE_DAMAGE_BUFFER: u32 = 9;
    pub const SURFACE_OFFSET: u32 = 10;

    pub const REGION_ADD: u32 = 1;
    pub const REGION_SUBTRACT: u32 = 2;

    pub const SUBCOMPOSITOR_GET_SUBSURFACE: u32 = 1;

    pub const SUBSURFACE_SET_POSITION: u32 = 1;
    pub const SUBSURFACE_PLACE_ABOVE: u32 = 2;
    pub const SUBSURFACE_PLACE_BELOW: u32 = 3;
    pub const SUBSURFACE_SET_SYNC: u32 = 4;
    pub const SUBSURFACE_SET_DESYNC: u32 = 5;
}

impl<'d> Handle<CompositorTraits<'d>> {
    /// Create a new surface
    pub fn create_surface(&self) -> Result<SurfacePtr<'d>> {
        create!("wl_compositor_create_surface", SurfaceTraits, self.proxy(), opcode::COMPOSITOR_CREATE_SURFACE)
    }

    /// Create a new region
    pub fn create_region(&self) -> Result<RegionPtr<'d>> {
        create!("wl_compositor_create_region", RegionTraits, self.proxy(), opcode::COMPOSITOR_CREATE_REGION)
    }
}

impl<'d> Handle<SurfaceTraits<'d>> {
    /// Set the pending buffer; `None` detaches
    pub fn attach(&self, buffer: Option<&super::Buffer<'_>>, x: i32, y: i32) {
        request!(self.proxy(), opcode::SURFACE_ATTACH, object_or_null(buffer), x, y);
    }

    /// Mark a rectangle in surface coordinates as changed
    pub fn damage(&self, x: i32, y: i32, width: i32, height: i32) {
        request!(self.proxy(), opcode::SURFACE_DAMAGE, x, y, width, height);
    }

    /// Request a callback for the next frame
    pub fn frame(&self) -> Result<super::CallbackPtr<'d>> {
        create!("wl_surface_frame", super::CallbackTraits, self.proxy(), opcode::SURFACE_FRAME)
    }

    /// Set the opaque region; `None` clears it
    pub fn set_opaque_region(&self, region: Option<&Region<'_>>) {
        request!(self.proxy(), opcode::SURFACE_SET_OPAQUE_REGION, object_or_null(region));
    }

    /// Set the input region; `None` accepts input everywhere
    pub fn set_input_region(&self, region: Option<&Region<'_>>) {
        request!(self.proxy(), opcode::SURFACE_SET_INPUT_REGION, object_or_null(region));
    }

    /// Apply the pending state
    pub fn commit(&self) {
        request!(self.proxy(), opcode::SURFACE_COMMIT);
    }

    /// Set the transform applied to the buffer contents
    pub fn set_buffer_transform(&self, transform: i32) {
        request!(self.proxy(), opcode::SURFACE_SET_BUFFER_TRANSFORM, transform);
    }

    /// Set the buffer scale factor
    pub fn set_buffer_scale(&self, scale: i32) {
        request!(self.proxy(), opcode::SURFACE_SET_BUFFER_SCALE, scale);
    }

    /// Mark a rectangle in buffer coordinates as changed
    pub fn damage_buffer(&self, x: i32, y: i32, width: i32, height: i32) {
        request!(self.proxy(), opcode::SURFACE_DAMAGE_BUFFER, x, y, width, height);
    }

    /// Set the offset of the pending buffer relative to the current one
    pub fn offset(&self, x: i32, y: i32) {
        request!(self.proxy(), opcode::SURFACE_OFFSET, x, y);
    }
}

impl Handle<RegionTraits<'_>> {
    /// Add a rectangle to the region
    pub fn add(&self, x: i32, y: i32, width: i32, height: i32) {
        request!(self.proxy(), opcode::REGION_ADD, x, y, width, height);
    }

    /// Remove a rectangle from the region
    pub fn subtract(&self, x: i32, y: i32, width: i32, height: i32) {
        request!(self.proxy(), opcode::REGION_SUBTRACT, x, y, width, height);
    }
}

impl<'d> Handle<SubcompositorTraits<'d>> {
    /// Make `surface` a subsurface of `parent`
    pub fn get_subsurface(&self, surface: &Surface<'_>, parent: &Surface<'_>) -> Result<SubsurfacePtr<'d>> {
        create!(
            "wl_subcompositor_get_subsurface",
            SubsurfaceTraits,
            self.proxy(),
            opcode::SUBCOMPOSITOR_GET_SUBSURFACE,
            surface.proxy(),
            parent.proxy(),
        )
    }
}

impl Handle<SubsurfaceTraits<'_>> {
    /// Position relative to the parent surface
    pub fn set_position(&self, x: i32, y: i32) {
        request!(self.proxy(), opcode::SUBSURFACE_SET_POSITION, x, y);
    }

    /// Stack directly above `sibling`
    pub fn place_above(&self, sibling: &Surface<'_>) {
        request!(self.proxy(), opcode::SUBSURFACE_PLACE_ABOVE, sibling.proxy());
    }

    /// Stack directly below `sibling`
    pub fn place_below(&self, sibling: &Surface<'_>) {
        request!(self.proxy(), opcode::SUBSURFACE_PLACE_BELOW, sibling.proxy());
    }

    /// Commit together with the parent
    pub fn set_sync(&self) {
        request!(self.proxy(), opcode::SUBSURFACE_SET_SYNC);
    }

    /// Commit independently of the parent
    pub fn set_desync(&self) {
        request!(self.proxy(), opcode::SUBSURFACE_SET_DESYNC);
    }
}
