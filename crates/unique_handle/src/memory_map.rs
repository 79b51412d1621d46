//! Memory mapping binding
//!
//! A mapping is only unmapped correctly with both its address and its length,
//! so the raw identifier is the pair ([`Mapping`]). Mapping calls are not
//! retried on interruption.

use std::os::unix::io::RawFd;
use std::ptr::{self, NonNull};

use libc::c_void;

use crate::error::{Error, Result};
use crate::flags::{MapFlags, Protection};
use crate::handle::{Handle, HandleTraits};
use crate::handle_ptr::HandlePtr;

/// Address and length of one live mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    /// Start of the mapped region
    pub address: *mut c_void,
    /// Length in bytes passed to `mmap`
    pub length: usize,
}

/// Policy for mappings: `MAP_FAILED` is empty, release is `munmap(2)`
pub struct MapTraits;

impl HandleTraits for MapTraits {
    type Raw = Mapping;

    fn invalid() -> Mapping {
        Mapping {
            address: libc::MAP_FAILED,
            length: 0,
        }
    }

    fn destroy(mapping: Mapping) {
        // SAFETY: the handle owned this exact region
        if unsafe { libc::munmap(mapping.address, mapping.length) } == -1 {
            log::warn!(
                "munmap({:p}, {}) failed: {}",
                mapping.address,
                mapping.length,
                errno::errno()
            );
        }
    }
}

/// Owned memory mapping
pub type MemoryMap = Handle<MapTraits>;

/// Pointer-style owned memory mapping
pub type MemoryMapPtr = HandlePtr<MapTraits>;

impl Handle<MapTraits> {
    /// Map a region and return it as a new handle
    pub fn with_map(
        hint: Option<NonNull<c_void>>,
        length: usize,
        protection: Protection,
        flags: MapFlags,
        fd: RawFd,
        offset: u64,
    ) -> Result<Self> {
        let mut map = Self::new();
        map.map(hint, length, protection, flags, fd, offset)?;
        Ok(map)
    }

    /// Map `length` zeroed bytes private to this process
    pub fn anonymous(length: usize, protection: Protection) -> Result<Self> {
        Self::with_map(None, length, protection, MapFlags::PRIVATE | MapFlags::ANONYMOUS, -1, 0)
    }

    /// Map a region into this empty handle
    ///
    /// On failure the handle stays empty. Panics if a mapping is already held.
    pub fn map(
        &mut self,
        hint: Option<NonNull<c_void>>,
        length: usize,
        protection: Protection,
        flags: MapFlags,
        fd: RawFd,
        offset: u64,
    ) -> Result<()> {
        self.expect_empty();
        let offset = libc::off_t::try_from(offset).map_err(|_| Error::Os {
            call: "mmap",
            source: std::io::Error::from_raw_os_error(libc::EINVAL),
        })?;
        let hint = hint.map_or(ptr::null_mut(), NonNull::as_ptr);

        // SAFETY: mmap validates its arguments; a non-FIXED hint is advisory
        let address = unsafe { libc::mmap(hint, length, protection.bits(), flags.bits(), fd, offset) };
        if address == libc::MAP_FAILED {
            return Err(Error::last_os("mmap"));
        }
        log::debug!("Mapped {} bytes at {:p}", length, address);
        self.acquire(Mapping { address, length });
        Ok(())
    }

    /// Unmap the region, leaving the handle empty
    ///
    /// Unmap failures are logged, not returned. Panics on an empty handle.
    pub fn unmap(&mut self) {
        self.expect_valid();
        self.dispose();
    }

    /// Flush a shared file-backed mapping to its file
    pub fn sync(&self) -> Result<()> {
        let mapping = self.expect_valid();
        // SAFETY: the region is owned and live
        if unsafe { libc::msync(mapping.address, mapping.length, libc::MS_SYNC) } == -1 {
            return Err(Error::last_os("msync"));
        }
        Ok(())
    }

    /// Start of the region
    pub fn address(&self) -> *mut c_void {
        self.raw().address
    }

    /// Mapped length in bytes; zero when empty
    pub fn length(&self) -> usize {
        self.raw().length
    }

    /// View the region as bytes
    ///
    /// # Safety
    /// The region must be mapped readable and not be modified through another
    /// mapping of the same pages while the slice is alive.
    pub unsafe fn as_slice(&self) -> &[u8] {
        let mapping = self.expect_valid();
        // SAFETY: forwarded to the caller; the region is live for &self
        unsafe { std::slice::from_raw_parts(mapping.address.cast::<u8>(), mapping.length) }
    }

    /// View the region as mutable bytes
    ///
    /// # Safety
    /// The region must be mapped readable and writable, and no other view of
    /// the same pages may be used while the slice is alive.
    pub unsafe fn as_mut_slice(&mut self) -> &mut [u8] {
        let mapping = self.expect_valid();
        // SAFETY: forwarded to the caller; the region is live for &mut self
        unsafe { std::slice::from_raw_parts_mut(mapping.address.cast::<u8>(), mapping.length) }
    }

    /// View the region as a slice of plain-old-data values, such as pixels
    ///
    /// Returns `None` if the length is not a multiple of `size_of::<T>()`.
    ///
    /// # Safety
    /// Same contract as [`Handle::as_mut_slice`].
    pub unsafe fn as_pod_slice_mut<T: bytemuck::Pod>(&mut self) -> Option<&mut [T]> {
        // SAFETY: forwarded to the caller
        let bytes = unsafe { self.as_mut_slice() };
        bytemuck::try_cast_slice_mut(bytes).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: usize = 4096;

    #[test]
    fn test_default_map_is_empty() {
        let map = MemoryMap::default();
        assert!(!map.is_valid());
        assert_eq!(map.raw(), MapTraits::invalid());
        assert_eq!(map.length(), 0);
    }

    #[test]
    fn test_anonymous_map_is_zeroed_and_writable() {
        let mut map = MemoryMap::anonymous(PAGE, Protection::READ | Protection::WRITE).unwrap();
        assert_eq!(map.length(), PAGE);
        let bytes = unsafe { map.as_mut_slice() };
        assert!(bytes.iter().all(|&b| b == 0));
        bytes[..4].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(unsafe { &map.as_slice()[..4] }, &[0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_anonymous_maps_are_independent() {
        let mut first = MemoryMap::anonymous(PAGE, Protection::READ | Protection::WRITE).unwrap();
        unsafe { first.as_mut_slice()[..4].copy_from_slice(b"ABCD") };
        first.unmap();
        assert!(!first.is_valid());

        let second = MemoryMap::anonymous(PAGE, Protection::READ | Protection::WRITE).unwrap();
        assert_eq!(unsafe { &second.as_slice()[..4] }, &[0, 0, 0, 0]);
    }

    #[test]
    fn test_zero_length_map_fails_and_stays_empty() {
        let mut map = MemoryMap::new();
        let err = map
            .map(None, 0, Protection::READ, MapFlags::PRIVATE | MapFlags::ANONYMOUS, -1, 0)
            .unwrap_err();
        assert_eq!(err.call(), "mmap");
        assert_eq!(err.raw_os_error(), Some(libc::EINVAL));
        assert!(!map.is_valid());
    }

    #[test]
    fn test_pod_view_of_pixels() {
        let mut map = MemoryMap::anonymous(PAGE, Protection::READ | Protection::WRITE).unwrap();
        let pixels = unsafe { map.as_pod_slice_mut::<u32>() }.unwrap();
        assert_eq!(pixels.len(), PAGE / 4);
        pixels[0] = 0xff00_00ff;
        assert_eq!(unsafe { &map.as_slice()[..4] }, &0xff00_00ffu32.to_ne_bytes());
    }

    #[test]
    fn test_ptr_release_keeps_region_mapped() {
        let map = MemoryMap::anonymous(PAGE, Protection::READ | Protection::WRITE).unwrap();
        let mut ptr = MemoryMapPtr::from(map);
        let mapping = ptr.release();
        assert!(ptr.is_null());
        // still mapped: writing must not fault
        unsafe { mapping.address.cast::<u8>().write(7) };
        let adopted = unsafe { MemoryMap::from_raw(mapping) };
        assert_eq!(unsafe { adopted.as_slice()[0] }, 7);
    }

    #[test]
    #[should_panic(expected = "empty handle")]
    fn test_unmap_empty_panics() {
        MemoryMap::new().unmap();
    }
}
