//! Shared-memory pools and buffers

use crate::error::Result;
use crate::file::File;
use crate::handle::Handle;
use crate::wl::{create, proxy_kind, request};

proxy_kind! {
    /// Owned `wl_shm`
    Shm, ShmPtr, ShmTraits, wl_shm, wl_shm_interface,
    destroy: local, listener: wl_shm_listener,
}

proxy_kind! {
    /// Owned `wl_shm_pool`
    ShmPool, ShmPoolPtr, ShmPoolTraits, wl_shm_pool, wl_shm_pool_interface,
    destroy: 1,
}

proxy_kind! {
    /// Owned `wl_buffer`
    Buffer, BufferPtr, BufferTraits, wl_buffer, wl_buffer_interface,
    destroy: 0, listener: wl_buffer_listener,
}

const SHM_CREATE_POOL: u32 = 0;
const SHM_POOL_CREATE_BUFFER: u32 = 0;
const SHM_POOL_RESIZE: u32 = 2;

impl<'d> Handle<ShmTraits<'d>> {
    /// Create a pool backed by `fd`, which must be mappable for `size` bytes
    ///
    /// The library sends a duplicate of the descriptor; `fd` stays owned by
    /// the caller.
    pub fn create_pool(&self, fd: &File, size: i32) -> Result<ShmPoolPtr<'d>> {
        create!("wl_shm_create_pool", ShmPoolTraits, self.proxy(), SHM_CREATE_POOL, fd.expect_valid(), size)
    }
}

impl<'d> Handle<ShmPoolTraits<'d>> {
    /// Create a buffer over a slice of the pool
    pub fn create_buffer(&self, offset: i32, width: i32, height: i32, stride: i32, format: u32) -> Result<BufferPtr<'d>> {
        create!(
            "wl_shm_pool_create_buffer",
            BufferTraits,
            self.proxy(),
            SHM_POOL_CREATE_BUFFER,
            offset,
            width,
            height,
            stride,
            format,
        )
    }

    /// Grow the pool to `size` bytes
    pub fn resize(&self, size: i32) {
        request!(self.proxy(), SHM_POOL_RESIZE, size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "empty handle")]
    fn test_create_buffer_on_empty_pool_panics() {
        let _ = ShmPool::new().create_buffer(0, 1, 1, 4, 0);
    }
}
