//! File descriptor binding
//!
//! `File` is a [`Handle`] over a raw descriptor with the POSIX I/O calls
//! layered on top. Blocking calls are restarted when interrupted by a signal
//! (`EINTR`); any other failure comes back as [`Error::Os`].

use std::ffi::CString;
use std::io::{self, SeekFrom};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::{AsRawFd, FromRawFd, IntoRawFd, RawFd};
use std::path::Path;

use crate::error::{Error, Result};
use crate::flags::OpenFlags;
use crate::handle::{Handle, HandleTraits};
use crate::handle_ptr::HandlePtr;

/// Policy for file descriptors: `-1` is empty, release is `close(2)`
pub struct FileTraits;

impl HandleTraits for FileTraits {
    type Raw = RawFd;

    fn invalid() -> RawFd {
        -1
    }

    fn destroy(fd: RawFd) {
        // A descriptor is gone after close() even when it reports EINTR,
        // so a failing close is never retried.
        // SAFETY: the handle owned `fd` and nobody else closes it
        if unsafe { libc::close(fd) } == -1 {
            let err = errno::errno();
            if err.0 != libc::EINTR {
                log::warn!("close({}) failed: {}", fd, err);
            }
        }
    }
}

/// Owned file descriptor
pub type File = Handle<FileTraits>;

/// Pointer-style owned file descriptor
pub type FilePtr = HandlePtr<FileTraits>;

/// Return values that signal failure with `-1`
trait IsMinusOne: Copy {
    fn is_minus_one(self) -> bool;
}

macro_rules! impl_is_minus_one {
    ($($t:ty),*) => {$(
        impl IsMinusOne for $t {
            fn is_minus_one(self) -> bool {
                self == -1
            }
        }
    )*}
}

impl_is_minus_one!(i32, i64, isize);

/// Run `f` until it succeeds or fails with something other than `EINTR`
fn retry_interrupted<R: IsMinusOne>(call: &'static str, mut f: impl FnMut() -> R) -> Result<R> {
    loop {
        let ret = f();
        if !ret.is_minus_one() {
            return Ok(ret);
        }
        if errno::errno().0 != libc::EINTR {
            return Err(Error::last_os(call));
        }
        log::trace!("{} interrupted, retrying", call);
    }
}

fn invalid_input(call: &'static str) -> Error {
    Error::Os {
        call,
        source: io::Error::from_raw_os_error(libc::EINVAL),
    }
}

fn to_offset(call: &'static str, offset: u64) -> Result<libc::off_t> {
    libc::off_t::try_from(offset).map_err(|_| invalid_input(call))
}

fn to_count(ret: isize) -> usize {
    // non-negative once -1 has been ruled out
    ret.unsigned_abs()
}

impl Handle<FileTraits> {
    /// Open `path` and take ownership of the new descriptor
    pub fn with_open(path: impl AsRef<Path>, flags: OpenFlags, mode: libc::mode_t) -> Result<Self> {
        let mut file = Self::new();
        file.open(path, flags, mode)?;
        Ok(file)
    }

    /// Create (or truncate) `path` for reading and writing
    pub fn create(path: impl AsRef<Path>, mode: libc::mode_t) -> Result<Self> {
        Self::with_open(
            path,
            OpenFlags::RDWR | OpenFlags::CREAT | OpenFlags::TRUNC | OpenFlags::CLOEXEC,
            mode,
        )
    }

    /// Open `path` into this empty handle
    ///
    /// On failure the handle stays empty. Panics if a descriptor is already held.
    pub fn open(&mut self, path: impl AsRef<Path>, flags: OpenFlags, mode: libc::mode_t) -> Result<()> {
        self.expect_empty();
        let path = path.as_ref();
        let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| invalid_input("open"))?;

        // SAFETY: c_path is a valid NUL-terminated string for the duration of the call
        let fd = retry_interrupted("open", || unsafe {
            libc::open(c_path.as_ptr(), flags.bits(), libc::c_uint::from(mode))
        })?;
        log::debug!("Opened {} as fd {}", path.display(), fd);
        self.acquire(fd);
        Ok(())
    }

    /// Close the descriptor, leaving the handle empty
    ///
    /// Close failures are logged, not returned. Panics on an empty handle.
    pub fn close(&mut self) {
        self.expect_valid();
        self.dispose();
    }

    /// Read at the current offset, returning the number of bytes read
    pub fn read(&self, buf: &mut [u8]) -> Result<usize> {
        let fd = self.expect_valid();
        // SAFETY: buf is valid for buf.len() writable bytes
        let ret = retry_interrupted("read", || unsafe {
            libc::read(fd, buf.as_mut_ptr().cast(), buf.len())
        })?;
        Ok(to_count(ret))
    }

    /// Read at `offset` without moving the file offset
    pub fn pread(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        let fd = self.expect_valid();
        let offset = to_offset("pread", offset)?;
        // SAFETY: buf is valid for buf.len() writable bytes
        let ret = retry_interrupted("pread", || unsafe {
            libc::pread(fd, buf.as_mut_ptr().cast(), buf.len(), offset)
        })?;
        Ok(to_count(ret))
    }

    /// Write at the current offset, returning the number of bytes written
    pub fn write(&self, buf: &[u8]) -> Result<usize> {
        let fd = self.expect_valid();
        // SAFETY: buf is valid for buf.len() readable bytes
        let ret = retry_interrupted("write", || unsafe {
            libc::write(fd, buf.as_ptr().cast(), buf.len())
        })?;
        Ok(to_count(ret))
    }

    /// Write at `offset` without moving the file offset
    pub fn pwrite(&self, buf: &[u8], offset: u64) -> Result<usize> {
        let fd = self.expect_valid();
        let offset = to_offset("pwrite", offset)?;
        // SAFETY: buf is valid for buf.len() readable bytes
        let ret = retry_interrupted("pwrite", || unsafe {
            libc::pwrite(fd, buf.as_ptr().cast(), buf.len(), offset)
        })?;
        Ok(to_count(ret))
    }

    /// Reposition the file offset, returning the new offset from the start
    pub fn lseek(&self, pos: SeekFrom) -> Result<u64> {
        let fd = self.expect_valid();
        let (offset, whence) = match pos {
            SeekFrom::Start(n) => (to_offset("lseek", n)?, libc::SEEK_SET),
            SeekFrom::Current(n) => (n as libc::off_t, libc::SEEK_CUR),
            SeekFrom::End(n) => (n as libc::off_t, libc::SEEK_END),
        };
        // SAFETY: plain integer arguments
        let ret = unsafe { libc::lseek(fd, offset, whence) };
        if ret == -1 {
            return Err(Error::last_os("lseek"));
        }
        Ok(ret.unsigned_abs())
    }

    /// Set the file length to exactly `length` bytes
    pub fn truncate(&self, length: u64) -> Result<()> {
        let fd = self.expect_valid();
        let length = to_offset("ftruncate", length)?;
        // SAFETY: plain integer arguments
        retry_interrupted("ftruncate", || unsafe { libc::ftruncate(fd, length) })?;
        Ok(())
    }
}

impl AsRawFd for Handle<FileTraits> {
    fn as_raw_fd(&self) -> RawFd {
        self.raw()
    }
}

impl IntoRawFd for Handle<FileTraits> {
    fn into_raw_fd(mut self) -> RawFd {
        self.forget()
    }
}

impl FromRawFd for Handle<FileTraits> {
    unsafe fn from_raw_fd(fd: RawFd) -> Self {
        // SAFETY: forwarded to the caller
        unsafe { Self::from_raw(fd) }
    }
}

impl io::Read for Handle<FileTraits> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(Handle::<FileTraits>::read(self, buf)?)
    }
}

impl io::Write for Handle<FileTraits> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(Handle::<FileTraits>::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Seek for Handle<FileTraits> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Ok(self.lseek(pos)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_is_empty() {
        let file = File::default();
        assert!(!file.is_valid());
        assert_eq!(file.raw(), -1);
        assert!(FilePtr::default().is_null());
    }

    #[test]
    fn test_open_missing_path_reports_enoent() {
        let mut file = File::new();
        let err = file
            .open("/nonexistent/unique_handle/missing", OpenFlags::RDONLY, 0)
            .unwrap_err();
        assert!(matches!(err, Error::Os { call: "open", .. }));
        assert_eq!(err.raw_os_error(), Some(libc::ENOENT));
        assert!(!file.is_valid());
    }

    #[test]
    fn test_interior_nul_is_rejected() {
        let err = File::with_open("bad\0path", OpenFlags::RDONLY, 0).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EINVAL));
    }

    #[test]
    fn test_close_empties_handle() {
        let mut file = File::with_open("/dev/null", OpenFlags::RDONLY, 0).unwrap();
        assert!(file.is_valid());
        file.close();
        assert!(!file.is_valid());
    }

    #[test]
    #[should_panic(expected = "empty handle")]
    fn test_close_empty_handle_panics() {
        File::new().close();
    }

    #[test]
    #[should_panic(expected = "empty handle")]
    fn test_read_empty_handle_panics() {
        let mut buf = [0u8; 4];
        let _ = File::new().read(&mut buf);
    }

    #[test]
    #[should_panic(expected = "already owns")]
    fn test_open_into_live_handle_panics() {
        let mut file = File::with_open("/dev/null", OpenFlags::RDONLY, 0).unwrap();
        let _ = file.open("/dev/null", OpenFlags::RDONLY, 0);
    }

    #[test]
    fn test_read_from_dev_zero() {
        let file = File::with_open("/dev/zero", OpenFlags::RDONLY, 0).unwrap();
        let mut buf = [0xffu8; 8];
        assert_eq!(file.read(&mut buf).unwrap(), 8);
        assert_eq!(buf, [0u8; 8]);
    }
}
