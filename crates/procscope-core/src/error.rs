use crate::NtStatus;

/// An error that can occur when inspecting a process.
#[derive(thiserror::Error, Debug)]
pub enum ProcessError {
    /// An OS call did not report success.
    #[error("{operation} failed: {source}")]
    Syscall {
        /// Name of the OS call.
        operation: &'static str,

        /// The OS error reported for the call.
        #[source]
        source: OsError,
    },

    /// An OS call reported success but produced the null sentinel.
    #[error("{operation} returned a null value")]
    NullResult {
        /// Name of the OS call.
        operation: &'static str,
    },

    /// The caller's buffer is too small for the requested record.
    ///
    /// This is a structured signal rather than a hard failure: reallocate
    /// the buffer to `required` bytes and query again.
    #[error("Buffer too small, {required} bytes required")]
    NeedsReallocateBuffer {
        /// Size reported by the kernel, or zero if it did not report one.
        required: usize,
    },

    /// The kernel returned a non-success status.
    #[error("{operation} failed with status code {status}")]
    Status {
        /// Name of the kernel service.
        operation: &'static str,

        /// The raw status code.
        status: NtStatus,
    },

    /// A record is shorter than its declared layout.
    #[error("Corrupted struct: {0}")]
    CorruptedStruct(&'static str),

    /// A memory read did not transfer the whole requested range.
    #[error("Partial read ({read} of {requested} bytes)")]
    PartialRead {
        /// Number of bytes requested.
        requested: usize,

        /// Number of bytes actually read.
        read: usize,
    },

    /// The query buffer would have to grow past the configured limit.
    #[error("Query buffer of {size} bytes exceeds the limit of {limit} bytes")]
    BufferLimitExceeded {
        /// The size the buffer would have to grow to.
        size: usize,

        /// The configured maximum buffer size.
        limit: usize,
    },

    /// The query did not settle within the configured number of attempts.
    #[error("Query did not complete after {attempts} attempts")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: usize,
    },
}

impl ProcessError {
    /// Creates a new OS call error.
    pub fn syscall(operation: &'static str, source: OsError) -> Self {
        Self::Syscall { operation, source }
    }

    /// Checks if the error is the undersized-buffer signal.
    pub fn is_needs_reallocate_buffer(&self) -> bool {
        matches!(self, Self::NeedsReallocateBuffer { .. })
    }

    /// Returns the buffer size required by the kernel, if this is the
    /// undersized-buffer signal.
    pub fn required_buffer_size(&self) -> Option<usize> {
        match self {
            Self::NeedsReallocateBuffer { required } => Some(*required),
            _ => None,
        }
    }
}

/// A raw OS error code (the thread's last-error value).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OsError(pub u32);

impl OsError {
    /// Captures the last OS error of the calling thread.
    ///
    /// Must be called immediately after the failing OS call, before any
    /// other call can overwrite the value.
    pub fn last() -> Self {
        let code = std::io::Error::last_os_error()
            .raw_os_error()
            .unwrap_or_default();

        Self(code as u32)
    }

    /// Returns the raw error code.
    pub fn code(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for OsError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", std::io::Error::from_raw_os_error(self.0 as i32))
    }
}

impl std::error::Error for OsError {}

impl From<OsError> for std::io::Error {
    fn from(value: OsError) -> Self {
        std::io::Error::from_raw_os_error(value.0 as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reallocate_signal_carries_required_size() {
        let err = ProcessError::NeedsReallocateBuffer { required: 4096 };
        assert!(err.is_needs_reallocate_buffer());
        assert_eq!(err.required_buffer_size(), Some(4096));

        let err = ProcessError::Status {
            operation: "NtQueryInformationProcess",
            status: NtStatus::ACCESS_DENIED,
        };
        assert!(!err.is_needs_reallocate_buffer());
        assert_eq!(err.required_buffer_size(), None);
        assert_eq!(
            err.to_string(),
            "NtQueryInformationProcess failed with status code 0xc0000022"
        );
    }

    #[test]
    fn syscall_error_keeps_os_code() {
        let err = ProcessError::syscall("OpenProcess", OsError(5));
        match err {
            ProcessError::Syscall { operation, source } => {
                assert_eq!(operation, "OpenProcess");
                assert_eq!(source.code(), 5);
                assert_eq!(std::io::Error::from(source).raw_os_error(), Some(5));
            }
            _ => panic!("unexpected error variant"),
        }
    }
}
