//! # Unique Handle
//!
//! Single-owner RAII wrappers for resources named by a raw identifier: file
//! descriptors, memory mappings and, with the `wayland` feature, the objects
//! of a libwayland-client connection.
//!
//! ## Features
//!
//! - **Owning handles**: [`Handle<T>`] releases its resource exactly once,
//!   when dropped or disposed
//! - **Pointer adaptor**: [`HandlePtr<T>`] adds `release`, `reset` and `get`
//! - **POSIX bindings**: [`File`] and [`MemoryMap`] with typed flags
//! - **Wayland bindings**: every core protocol object, behind the `wayland`
//!   cargo feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use unique_handle::prelude::*;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let file = File::create("/tmp/scratch", 0o644)?;
//!     file.truncate(4096)?;
//!     file.pwrite(b"hello", 0)?;
//!
//!     let map = MemoryMap::with_map(None, 4096, Protection::READ, MapFlags::SHARED, file.raw(), 0)?;
//!     assert_eq!(&unsafe { map.as_slice() }[..5], b"hello");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod error;
pub mod file;
pub mod flags;
pub mod handle;
pub mod handle_ptr;
pub mod memory_map;

#[cfg(feature = "wayland")]
pub mod wl;

pub use config::{Config, ConfigError, DisplaySettings, FileSettings, Settings};
pub use error::{Error, Result};
pub use file::{File, FilePtr, FileTraits};
pub use flags::{MapFlags, OpenFlags, Protection};
pub use handle::{Handle, HandleTraits};
pub use handle_ptr::HandlePtr;
pub use memory_map::{MapTraits, Mapping, MemoryMap, MemoryMapPtr};

/// Common imports for users of the bindings
pub mod prelude {
    pub use crate::{
        Config, Error, File, FilePtr, Handle, HandlePtr, HandleTraits, MapFlags, MemoryMap, MemoryMapPtr,
        OpenFlags, Protection, Result, Settings,
    };

    #[cfg(feature = "wayland")]
    pub use crate::wl::{Display, DisplayPtr, EventSource, ProxyTraits, Registry, RegistryPtr};
}
