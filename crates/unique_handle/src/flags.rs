//! Typed flag sets for `open` and `mmap`

use bitflags::bitflags;

bitflags! {
    /// Flags passed to `open(2)`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpenFlags: libc::c_int {
        /// Read only; the zero access mode
        const RDONLY = libc::O_RDONLY;
        /// Write only
        const WRONLY = libc::O_WRONLY;
        /// Read and write
        const RDWR = libc::O_RDWR;
        /// Create the file if missing
        const CREAT = libc::O_CREAT;
        /// Fail if `CREAT` and the file exists
        const EXCL = libc::O_EXCL;
        /// Truncate to zero length on open
        const TRUNC = libc::O_TRUNC;
        /// Append on every write
        const APPEND = libc::O_APPEND;
        /// Close on exec
        const CLOEXEC = libc::O_CLOEXEC;
        /// Non-blocking I/O
        const NONBLOCK = libc::O_NONBLOCK;
        /// Fail unless the path is a directory
        const DIRECTORY = libc::O_DIRECTORY;
        /// Do not follow a trailing symlink
        const NOFOLLOW = libc::O_NOFOLLOW;
    }
}

bitflags! {
    /// Page protection for `mmap(2)`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Protection: libc::c_int {
        /// No access
        const NONE = libc::PROT_NONE;
        /// Readable
        const READ = libc::PROT_READ;
        /// Writable
        const WRITE = libc::PROT_WRITE;
        /// Executable
        const EXEC = libc::PROT_EXEC;
    }
}

bitflags! {
    /// Mapping flags for `mmap(2)`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MapFlags: libc::c_int {
        /// Writes are visible to other mappings and carried to the file
        const SHARED = libc::MAP_SHARED;
        /// Copy-on-write private mapping
        const PRIVATE = libc::MAP_PRIVATE;
        /// Not backed by a file; `fd` is ignored and contents are zeroed
        const ANONYMOUS = libc::MAP_ANONYMOUS;
        /// Place the mapping exactly at the hint address
        const FIXED = libc::MAP_FIXED;
        /// Do not reserve swap space
        #[cfg(any(target_os = "linux", target_os = "android"))]
        const NORESERVE = libc::MAP_NORESERVE;
        /// Prefault page tables
        #[cfg(any(target_os = "linux", target_os = "android"))]
        const POPULATE = libc::MAP_POPULATE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_flags_combine_to_libc_bits() {
        let flags = OpenFlags::RDWR | OpenFlags::CREAT | OpenFlags::TRUNC;
        assert_eq!(flags.bits(), libc::O_RDWR | libc::O_CREAT | libc::O_TRUNC);
    }

    #[test]
    fn test_protection_read_write() {
        let prot = Protection::READ | Protection::WRITE;
        assert!(prot.contains(Protection::WRITE));
        assert!(!prot.contains(Protection::EXEC));
    }
}
