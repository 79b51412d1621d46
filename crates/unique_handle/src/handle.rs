//! Single-owner handle over a raw resource identifier
//!
//! A [`Handle`] owns exactly one raw identifier (a file descriptor, a mapping,
//! a library object pointer) or the "invalid" sentinel of its kind. The kind
//! is selected at compile time through [`HandleTraits`], which names the
//! sentinel and the call that releases a live identifier.
//!
//! Domain operations for each kind are added as inherent impls on
//! `Handle<KindTraits>` in the binding modules (`file`, `memory_map`, `wl`).

use std::fmt;
use std::marker::PhantomData;

/// Per-kind resource policy: the empty sentinel and the release call
pub trait HandleTraits {
    /// Raw identifier owned by the handle
    type Raw: Copy + PartialEq + fmt::Debug;

    /// Identifier meaning "no resource is owned"; must return the same value on every call
    fn invalid() -> Self::Raw;

    /// Release a live identifier
    ///
    /// Only called with a value different from [`HandleTraits::invalid`].
    /// Must not panic: failures of the underlying call are swallowed.
    fn destroy(raw: Self::Raw);
}

/// Move-only owner of one raw identifier
///
/// Dropping the handle releases the identifier if it is live. There is no
/// `Clone`; the only way to hand the resource elsewhere is a move, [`Handle::take`],
/// or [`HandlePtr::release`](crate::HandlePtr::release).
pub struct Handle<T: HandleTraits> {
    raw: T::Raw,
    _traits: PhantomData<T>,
}

impl<T: HandleTraits> Handle<T> {
    /// Create an empty handle
    pub fn new() -> Self {
        Self {
            raw: T::invalid(),
            _traits: PhantomData,
        }
    }

    /// Adopt an identifier that is already live
    ///
    /// # Safety
    /// `raw` must be the sentinel or a live identifier that no other owner
    /// will release. The handle releases it when dropped.
    pub unsafe fn from_raw(raw: T::Raw) -> Self {
        Self {
            raw,
            _traits: PhantomData,
        }
    }

    /// Current raw identifier, possibly the sentinel
    pub fn raw(&self) -> T::Raw {
        self.raw
    }

    /// Whether a live identifier is held
    pub fn is_valid(&self) -> bool {
        self.raw != T::invalid()
    }

    /// Move the identifier into a new handle, leaving this one empty
    #[must_use]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Release the identifier now if live; a no-op on an empty handle
    pub fn dispose(&mut self) {
        Self::destroy_raw(self.forget());
    }

    /// Release `raw` through the policy unless it is the sentinel
    pub(crate) fn destroy_raw(raw: T::Raw) {
        if raw != T::invalid() {
            log::trace!("Releasing {:?}", raw);
            T::destroy(raw);
        }
    }

    /// Store a freshly acquired identifier
    ///
    /// Panics if the handle already owns a live identifier.
    pub(crate) fn acquire(&mut self, raw: T::Raw) {
        assert!(
            !self.is_valid(),
            "acquire into a handle that already owns {:?}",
            self.raw
        );
        log::trace!("Acquired {:?}", raw);
        self.raw = raw;
    }

    /// Return the identifier and store the sentinel without releasing
    pub(crate) fn forget(&mut self) -> T::Raw {
        self.replace(T::invalid())
    }

    /// Swap in a new identifier, returning the old one unreleased
    pub(crate) fn replace(&mut self, raw: T::Raw) -> T::Raw {
        std::mem::replace(&mut self.raw, raw)
    }

    /// Panics unless a live identifier is held
    #[track_caller]
    pub(crate) fn expect_valid(&self) -> T::Raw {
        assert!(self.is_valid(), "operation on an empty handle");
        self.raw
    }

    /// Panics if a live identifier is held
    #[track_caller]
    pub(crate) fn expect_empty(&self) {
        assert!(!self.is_valid(), "handle already owns {:?}", self.raw);
    }
}

impl<T: HandleTraits> Default for Handle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: HandleTraits> Drop for Handle<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<T: HandleTraits> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.raw).finish()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Counting policy shared by the core unit tests

    use super::HandleTraits;
    use std::cell::RefCell;

    thread_local! {
        static DESTROYED: RefCell<Vec<u32>> = RefCell::new(Vec::new());
    }

    /// Policy over plain integers that records every release
    pub struct CountingTraits;

    impl HandleTraits for CountingTraits {
        type Raw = u32;

        fn invalid() -> u32 {
            0
        }

        fn destroy(raw: u32) {
            DESTROYED.with(|d| d.borrow_mut().push(raw));
        }
    }

    /// Number of times `raw` has been released on this thread
    pub fn destroyed(raw: u32) -> usize {
        DESTROYED.with(|d| d.borrow().iter().filter(|&&r| r == raw).count())
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{destroyed, CountingTraits};
    use super::*;

    type Counted = Handle<CountingTraits>;

    #[test]
    fn test_default_is_empty() {
        let handle = Counted::default();
        assert!(!handle.is_valid());
        assert_eq!(handle.raw(), CountingTraits::invalid());
    }

    #[test]
    fn test_drop_releases_once() {
        {
            let _handle = unsafe { Counted::from_raw(11) };
        }
        assert_eq!(destroyed(11), 1);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut handle = unsafe { Counted::from_raw(12) };
        handle.dispose();
        handle.dispose();
        drop(handle);
        assert_eq!(destroyed(12), 1);
    }

    #[test]
    fn test_take_leaves_source_empty() {
        let mut first = unsafe { Counted::from_raw(13) };
        let second = first.take();
        assert_eq!(second.raw(), 13);
        assert_eq!(first.raw(), CountingTraits::invalid());
        drop(first);
        assert_eq!(destroyed(13), 0);
        drop(second);
        assert_eq!(destroyed(13), 1);
    }

    #[test]
    fn test_assignment_releases_previous() {
        let mut target = unsafe { Counted::from_raw(14) };
        assert!(target.is_valid());
        target = unsafe { Counted::from_raw(15) };
        assert_eq!(destroyed(14), 1);
        assert_eq!(target.raw(), 15);
    }

    #[test]
    fn test_empty_handle_never_destroys_sentinel() {
        let mut handle = Counted::new();
        handle.dispose();
        drop(handle);
        assert_eq!(destroyed(0), 0);
    }

    #[test]
    fn test_acquire_into_empty() {
        let mut handle = Counted::new();
        handle.acquire(16);
        assert!(handle.is_valid());
        assert_eq!(handle.forget(), 16);
        assert_eq!(destroyed(16), 0);
    }

    #[test]
    #[should_panic(expected = "already owns")]
    fn test_acquire_into_live_handle_panics() {
        let mut handle = unsafe { Counted::from_raw(17) };
        handle.acquire(18);
    }

    #[test]
    #[should_panic(expected = "empty handle")]
    fn test_operation_on_empty_handle_panics() {
        let handle = Counted::new();
        handle.expect_valid();
    }

    #[test]
    fn test_handles_in_containers() {
        let mut handles: Vec<Counted> = (20..23).map(|r| unsafe { Counted::from_raw(r) }).collect();
        let moved = handles.remove(1);
        drop(handles);
        assert_eq!(destroyed(20), 1);
        assert_eq!(destroyed(21), 0);
        assert_eq!(destroyed(22), 1);
        drop(moved);
        assert_eq!(destroyed(21), 1);
    }
}
