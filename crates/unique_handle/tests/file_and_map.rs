//! File and memory map scenarios against real descriptors

use std::io::{Read, Seek, SeekFrom, Write};
use std::os::unix::io::IntoRawFd;

use unique_handle::prelude::*;

fn init_logging() {
    let _ = env_logger::Builder::from_default_env().is_test(true).try_init();
}

fn fd_is_open(fd: i32) -> bool {
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFD) };
    flags != -1
}

#[test]
fn test_write_then_pread_round_trip() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");

    let mut file = File::new();
    file.open(&path, OpenFlags::RDWR | OpenFlags::CREAT | OpenFlags::CLOEXEC, 0o600)
        .unwrap();
    file.truncate(4096).unwrap();
    assert_eq!(file.pwrite(b"0123456789", 0).unwrap(), 10);

    let mut buf = [0u8; 10];
    assert_eq!(file.pread(&mut buf, 0).unwrap(), 10);
    assert_eq!(&buf, b"0123456789");
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 4096);
}

#[test]
fn test_open_missing_path_leaves_handle_empty() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();

    let mut file = File::new();
    let err = file
        .open(dir.path().join("missing"), OpenFlags::RDONLY, 0)
        .unwrap_err();
    assert!(matches!(err, Error::Os { call: "open", .. }));
    assert_eq!(err.raw_os_error(), Some(libc::ENOENT));
    assert!(!file.is_valid());
}

#[test]
fn test_std_io_traits_compose() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let mut file = File::create(dir.path().join("io.txt"), 0o644).unwrap();

    writeln!(file, "hello handle").unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();
    assert_eq!(text, "hello handle\n");
}

#[test]
fn test_released_descriptor_stays_open() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let mut ptr = FilePtr::from(File::create(dir.path().join("released"), 0o644).unwrap());

    let fd = ptr.release();
    assert!(ptr.is_null());
    drop(ptr);
    assert!(fd_is_open(fd));

    let mut adopted = unsafe { File::from_raw(fd) };
    adopted.close();
    assert!(!adopted.is_valid());
}

#[test]
fn test_reset_to_adopts_new_descriptor() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let first = File::create(dir.path().join("first"), 0o644).unwrap();
    let second = File::create(dir.path().join("second"), 0o644).unwrap();

    let mut ptr = FilePtr::from(first);
    let second_fd = second.into_raw_fd();
    unsafe { ptr.reset_to(second_fd) };

    assert_eq!(ptr.get(), second_fd);
    assert!(fd_is_open(second_fd));
}

#[test]
fn test_shared_mapping_persists_across_remap() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let file = File::create(dir.path().join("shared.bin"), 0o600).unwrap();
    file.truncate(4096).unwrap();

    let rw = Protection::READ | Protection::WRITE;
    let mut map = MemoryMap::with_map(None, 4096, rw, MapFlags::SHARED, file.raw(), 0).unwrap();
    unsafe { map.as_mut_slice()[..5].copy_from_slice(b"hello") };
    map.sync().unwrap();
    map.unmap();
    assert!(!map.is_valid());

    map.map(None, 4096, Protection::READ, MapFlags::SHARED, file.raw(), 0)
        .unwrap();
    assert_eq!(unsafe { &map.as_slice()[..5] }, b"hello");

    let mut buf = [0u8; 5];
    file.pread(&mut buf, 0).unwrap();
    assert_eq!(&buf, b"hello");
}

#[test]
fn test_pixel_view_over_anonymous_map() {
    init_logging();
    let mut map = MemoryMap::anonymous(64 * 4, Protection::READ | Protection::WRITE).unwrap();
    let pixels = unsafe { map.as_pod_slice_mut::<u32>() }.unwrap();
    assert_eq!(pixels.len(), 64);
    pixels.fill(0xff00_ff00);
    assert_eq!(unsafe { &map.as_slice()[..4] }, &0xff00_ff00u32.to_ne_bytes());
}
