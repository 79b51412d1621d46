//! Error types for handle operations

use std::io;

/// Errors raised by binding operations
///
/// Teardown never produces one of these; release failures are logged and
/// swallowed so a handle can always be dropped during unwinding.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A system call failed with an errno
    #[error("{call} failed: {source}")]
    Os {
        /// Name of the failing call
        call: &'static str,
        /// Platform error carrying the errno
        #[source]
        source: io::Error,
    },

    /// The protocol client library reported a failure
    #[error("{call} failed in the protocol client library")]
    Protocol {
        /// Name of the failing library call
        call: &'static str,
        /// Underlying system error, when the library set errno
        #[source]
        source: Option<io::Error>,
    },
}

impl Error {
    /// Build an [`Error::Os`] from the calling thread's current errno
    pub(crate) fn last_os(call: &'static str) -> Self {
        Self::Os {
            call,
            source: io::Error::from_raw_os_error(errno::errno().0),
        }
    }

    /// Build an [`Error::Protocol`] with no errno attached
    #[cfg_attr(not(feature = "wayland"), allow(dead_code))]
    pub(crate) const fn protocol(call: &'static str) -> Self {
        Self::Protocol { call, source: None }
    }

    /// Build an [`Error::Protocol`] nesting the current errno, if any is set
    #[cfg_attr(not(feature = "wayland"), allow(dead_code))]
    pub(crate) fn protocol_system(call: &'static str) -> Self {
        let code = errno::errno().0;
        Self::Protocol {
            call,
            source: (code != 0).then(|| io::Error::from_raw_os_error(code)),
        }
    }

    /// Name of the call that failed
    pub const fn call(&self) -> &'static str {
        match self {
            Self::Os { call, .. } | Self::Protocol { call, .. } => call,
        }
    }

    /// Platform error code, if one is attached
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::Os { source, .. } => source.raw_os_error(),
            Self::Protocol { source, .. } => source.as_ref().and_then(io::Error::raw_os_error),
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Os { source, .. } => source,
            Error::Protocol { source: Some(source), .. } => source,
            err @ Error::Protocol { source: None, .. } => io::Error::new(io::ErrorKind::Other, err),
        }
    }
}

/// Result type for handle operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_error_keeps_code() {
        let err = Error::Os {
            call: "open",
            source: io::Error::from_raw_os_error(libc::ENOENT),
        };
        assert_eq!(err.raw_os_error(), Some(libc::ENOENT));
        assert_eq!(err.call(), "open");
        assert!(err.to_string().starts_with("open failed"));
    }

    #[test]
    fn test_protocol_error_without_code() {
        let err = Error::protocol("wl_registry_add_listener");
        assert_eq!(err.raw_os_error(), None);
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::Other);
    }

    #[test]
    fn test_protocol_error_nests_system_error() {
        errno::set_errno(errno::Errno(libc::EPIPE));
        let err = Error::protocol_system("wl_display_flush");
        assert_eq!(err.raw_os_error(), Some(libc::EPIPE));
    }
}
