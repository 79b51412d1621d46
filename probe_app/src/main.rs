//! Handle probe application
//!
//! Loads settings, then exercises the bindings against the running system: a
//! scratch file round trip, a shared mapping over it and, when built with the
//! `wayland` feature, a registry listing of the current compositor.

use std::path::PathBuf;

use unique_handle::{Config, File, MapFlags, MemoryMap, Protection, Settings};

const PAGE: usize = 4096;

fn load_settings() -> Result<Settings, Box<dyn std::error::Error>> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Ok(Settings::load_from_file(path)?),
        None => Ok(Settings::default()),
    }
}

fn probe_file_and_map(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::temp_dir().join(format!("handle_probe.{}", std::process::id()));
    let file = File::create(&path, settings.file.mode())?;
    std::fs::remove_file(&path)?;

    file.truncate(PAGE as u64)?;
    let written = file.pwrite(b"handle probe", 0)?;
    log::info!("Wrote {} bytes to fd {}", written, file.raw());

    let mut map = MemoryMap::with_map(
        None,
        PAGE,
        Protection::READ | Protection::WRITE,
        MapFlags::SHARED,
        file.raw(),
        0,
    )?;
    // SAFETY: the mapping is private to this function and nothing else maps the file
    let bytes = unsafe { map.as_mut_slice() };
    log::info!("Mapped contents: {:?}", String::from_utf8_lossy(&bytes[..written]));
    bytes[PAGE - 1] = 0x5a;
    map.sync()?;
    map.unmap();

    let mut last = [0u8; 1];
    file.pread(&mut last, (PAGE - 1) as u64)?;
    log::info!("Byte written through the map reads back as {:#04x}", last[0]);
    Ok(())
}

#[cfg(feature = "wayland")]
mod wayland {
    use std::ffi::{c_char, c_void, CStr};

    use unique_handle::wl::{ffi, Compositor, CompositorTraits, Display, Shm, ShmTraits};
    use unique_handle::{File, HandlePtr, MapFlags, MemoryMap, Protection, Settings};

    const WIDTH: i32 = 64;
    const HEIGHT: i32 = 64;
    const FORMAT_XRGB8888: u32 = 1;

    #[derive(Debug)]
    struct Global {
        name: u32,
        interface: String,
        version: u32,
    }

    unsafe extern "C" fn global(
        data: *mut c_void,
        _registry: *mut ffi::wl_registry,
        name: u32,
        interface: *const c_char,
        version: u32,
    ) {
        // SAFETY: `data` is the Vec registered in `probe`, alive for the dispatch
        let globals = unsafe { &mut *data.cast::<Vec<Global>>() };
        // SAFETY: the library passes a NUL-terminated interface name
        let interface = unsafe { CStr::from_ptr(interface) }.to_string_lossy().into_owned();
        globals.push(Global { name, interface, version });
    }

    unsafe extern "C" fn global_remove(_data: *mut c_void, _registry: *mut ffi::wl_registry, name: u32) {
        log::debug!("Global {} removed", name);
    }

    static REGISTRY_LISTENER: ffi::wl_registry_listener = ffi::wl_registry_listener { global, global_remove };

    fn find<'a>(globals: &'a [Global], interface: &str) -> Option<&'a Global> {
        globals.iter().find(|g| g.interface == interface)
    }

    pub fn probe(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
        let mut display = Display::new();
        display.connect_with(&settings.display)?;

        let mut globals: Vec<Global> = Vec::new();
        let mut registry = display.get_registry()?;
        // SAFETY: `globals` outlives every dispatch below; the registry is dropped first
        unsafe { registry.add_listener(&REGISTRY_LISTENER, std::ptr::addr_of_mut!(globals).cast())? };
        display.roundtrip()?;

        for global in &globals {
            log::info!("{:>4} {} v{}", global.name, global.interface, global.version);
        }

        if let (Some(compositor), Some(shm)) = (find(&globals, "wl_compositor"), find(&globals, "wl_shm")) {
            let compositor: HandlePtr<CompositorTraits<'_>> = registry.bind(compositor.name, compositor.version.min(4))?;
            let shm: HandlePtr<ShmTraits<'_>> = registry.bind(shm.name, 1)?;
            present_one_frame(&display, &compositor, &shm, settings)?;
        }

        drop(registry);
        display.disconnect();
        Ok(())
    }

    fn present_one_frame(
        display: &Display,
        compositor: &Compositor<'_>,
        shm: &Shm<'_>,
        settings: &Settings,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let stride = WIDTH * 4;
        let size = stride * HEIGHT;
        let path = std::env::temp_dir().join(format!("handle_probe.shm.{}", std::process::id()));
        let file = File::create(&path, settings.file.mode())?;
        std::fs::remove_file(&path)?;
        file.truncate(u64::try_from(size)?)?;

        let mut map = MemoryMap::with_map(
            None,
            usize::try_from(size)?,
            Protection::READ | Protection::WRITE,
            MapFlags::SHARED,
            file.raw(),
            0,
        )?;
        // SAFETY: only this process writes the pool until the buffer is attached
        if let Some(pixels) = unsafe { map.as_pod_slice_mut::<u32>() } {
            pixels.fill(0xff33_6699);
        }

        let pool = shm.create_pool(&file, size)?;
        let buffer = pool.create_buffer(0, WIDTH, HEIGHT, stride, FORMAT_XRGB8888)?;
        let surface = compositor.create_surface()?;
        surface.attach(Some(&*buffer), 0, 0);
        surface.damage_buffer(0, 0, WIDTH, HEIGHT);
        surface.commit();
        display.roundtrip()?;
        log::info!("Committed a {}x{} buffer on surface {}", WIDTH, HEIGHT, surface.id());

        if let Some(error) = display.get_protocol_error() {
            log::warn!("Protocol error: {:?}", error);
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings()?;

    env_logger::Builder::from_default_env()
        .filter_level(settings.log_level_filter())
        .init();

    log::info!("Starting handle probe");
    probe_file_and_map(&settings)?;

    #[cfg(feature = "wayland")]
    if let Err(e) = wayland::probe(&settings) {
        log::error!("Wayland probe failed: {}", e);
    }

    log::info!("Handle probe finished");
    Ok(())
}
