//! Pointer-style adaptor over [`Handle`]
//!
//! `HandlePtr` gives every handle kind the call shape of a unique-ownership
//! smart pointer: `release`, `reset`, a null test, and `Deref` to the
//! underlying handle so its domain operations read as `ptr.read(..)`.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::handle::{Handle, HandleTraits};

/// Unique-ownership pointer wrapping one [`Handle`]
pub struct HandlePtr<T: HandleTraits> {
    handle: Handle<T>,
}

impl<T: HandleTraits> HandlePtr<T> {
    /// Create an empty pointer
    pub fn new() -> Self {
        Self {
            handle: Handle::new(),
        }
    }

    /// Adopt a live identifier
    ///
    /// # Safety
    /// Same contract as [`Handle::from_raw`].
    pub unsafe fn from_raw(raw: T::Raw) -> Self {
        Self {
            // SAFETY: forwarded to the caller
            handle: unsafe { Handle::from_raw(raw) },
        }
    }

    /// Give up ownership without releasing; the caller becomes responsible for the identifier
    #[must_use = "the returned identifier is no longer released by anyone"]
    pub fn release(&mut self) -> T::Raw {
        self.handle.forget()
    }

    /// Release the held identifier (if any) and leave the pointer empty
    pub fn reset(&mut self) {
        self.handle.dispose();
    }

    /// Release the held identifier (if any), then adopt `raw`
    ///
    /// # Safety
    /// Same contract as [`Handle::from_raw`].
    pub unsafe fn reset_to(&mut self, raw: T::Raw) {
        Handle::<T>::destroy_raw(self.handle.replace(raw));
    }

    /// Raw identifier, possibly the sentinel
    pub fn get(&self) -> T::Raw {
        self.handle.raw()
    }

    /// Whether the pointer owns nothing
    pub fn is_null(&self) -> bool {
        !self.handle.is_valid()
    }

    /// Whether the pointer owns a live identifier
    pub fn is_some(&self) -> bool {
        self.handle.is_valid()
    }

    /// Unwrap into the owning handle
    pub fn into_handle(mut self) -> Handle<T> {
        self.handle.take()
    }
}

impl<T: HandleTraits> Default for HandlePtr<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: HandleTraits> From<Handle<T>> for HandlePtr<T> {
    fn from(handle: Handle<T>) -> Self {
        Self { handle }
    }
}

impl<T: HandleTraits> Deref for HandlePtr<T> {
    type Target = Handle<T>;

    fn deref(&self) -> &Handle<T> {
        &self.handle
    }
}

impl<T: HandleTraits> DerefMut for HandlePtr<T> {
    fn deref_mut(&mut self) -> &mut Handle<T> {
        &mut self.handle
    }
}

impl<T: HandleTraits> fmt::Debug for HandlePtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HandlePtr").field(&self.handle.raw()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::testing::{destroyed, CountingTraits};

    type CountedPtr = HandlePtr<CountingTraits>;

    #[test]
    fn test_default_is_null() {
        let ptr = CountedPtr::default();
        assert!(ptr.is_null());
        assert!(!ptr.is_some());
        assert_eq!(ptr.get(), 0);
    }

    #[test]
    fn test_release_hands_over_without_destroying() {
        let mut ptr = unsafe { CountedPtr::from_raw(31) };
        let raw = ptr.release();
        assert_eq!(raw, 31);
        assert!(ptr.is_null());
        drop(ptr);
        assert_eq!(destroyed(31), 0);
    }

    #[test]
    fn test_reset_to_replaces_and_destroys_old() {
        let mut ptr = unsafe { CountedPtr::from_raw(32) };
        unsafe { ptr.reset_to(33) };
        assert_eq!(destroyed(32), 1);
        assert_eq!(destroyed(33), 0);
        assert_eq!(ptr.get(), 33);
        drop(ptr);
        assert_eq!(destroyed(32), 1);
        assert_eq!(destroyed(33), 1);
    }

    #[test]
    fn test_reset_to_never_destroys_the_sentinel() {
        let mut ptr = CountedPtr::new();
        unsafe { ptr.reset_to(37) };
        assert_eq!(ptr.get(), 37);
        unsafe { ptr.reset_to(0) };
        assert!(ptr.is_null());
        assert_eq!(destroyed(37), 1);
        assert_eq!(destroyed(0), 0);
    }

    #[test]
    fn test_reset_empties() {
        let mut ptr = unsafe { CountedPtr::from_raw(34) };
        ptr.reset();
        ptr.reset();
        assert!(ptr.is_null());
        assert_eq!(destroyed(34), 1);
    }

    #[test]
    fn test_deref_reaches_handle() {
        let mut ptr = unsafe { CountedPtr::from_raw(35) };
        assert!(ptr.is_valid());
        let moved = ptr.take();
        assert!(ptr.is_null());
        assert_eq!(moved.raw(), 35);
    }

    #[test]
    fn test_round_trip_through_handle() {
        let handle = unsafe { Handle::<CountingTraits>::from_raw(36) };
        let ptr = CountedPtr::from(handle);
        let handle = ptr.into_handle();
        assert_eq!(destroyed(36), 0);
        drop(handle);
        assert_eq!(destroyed(36), 1);
    }
}
