use crate::{NtStatus, ProcessError};

/// Outcome of a single call into the kernel information service.
///
/// Pairs the completion status with the byte count the kernel reported:
/// the number of bytes written on success, or the number of bytes
/// required when the caller's buffer was too small.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryResult {
    /// Completion status.
    pub status: NtStatus,

    /// Bytes written, or bytes required.
    pub length: u32,
}

impl QueryResult {
    /// Creates a new query result.
    pub fn new(status: NtStatus, length: u32) -> Self {
        Self { status, length }
    }

    /// Classifies the outcome.
    ///
    /// - Success yields the number of bytes written.
    /// - `STATUS_INFO_LENGTH_MISMATCH` and `STATUS_BUFFER_TOO_SMALL` yield
    ///   [`ProcessError::NeedsReallocateBuffer`] with the reported size.
    /// - Any other status yields [`ProcessError::Status`].
    pub fn into_result(self) -> Result<usize, ProcessError> {
        if self.status.is_success() {
            return Ok(self.length as usize);
        }

        if self.status.is_buffer_size_mismatch() {
            return Err(ProcessError::NeedsReallocateBuffer {
                required: self.length as usize,
            });
        }

        Err(ProcessError::Status {
            operation: "NtQueryInformationProcess",
            status: self.status,
        })
    }
}

/// Bounds for the reallocate-and-retry loop of variable-length queries.
///
/// See [`ProcessInspector::query_info_vec`].
///
/// [`ProcessInspector::query_info_vec`]: crate::ProcessInspector::query_info_vec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    /// Size of the first buffer for classes without a fixed record size.
    pub initial_buffer_size: usize,

    /// The buffer never grows past this size.
    pub max_buffer_size: usize,

    /// Maximum number of calls into the kernel per query.
    pub max_attempts: usize,
}

impl QueryLimits {
    /// Default size of the first buffer (4 KiB).
    pub const DEFAULT_INITIAL_BUFFER_SIZE: usize = 0x1000;

    /// Default maximum buffer size (16 MiB).
    pub const DEFAULT_MAX_BUFFER_SIZE: usize = 0x100_0000;

    /// Default maximum number of attempts.
    pub const DEFAULT_MAX_ATTEMPTS: usize = 8;

    /// Returns the size of the buffer for the next attempt.
    ///
    /// Grows to the size reported by the kernel when it is larger than the
    /// current buffer, otherwise doubles.
    pub(crate) fn next_buffer_size(&self, current: usize, required: usize) -> Result<usize, ProcessError> {
        let next = if required > current {
            required
        } else {
            current.saturating_mul(2).max(1)
        };

        if next > self.max_buffer_size {
            return Err(ProcessError::BufferLimitExceeded {
                size: next,
                limit: self.max_buffer_size,
            });
        }

        Ok(next)
    }
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            initial_buffer_size: Self::DEFAULT_INITIAL_BUFFER_SIZE,
            max_buffer_size: Self::DEFAULT_MAX_BUFFER_SIZE,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_reports_bytes_written() {
        let result = QueryResult::new(NtStatus::SUCCESS, 48);
        assert_eq!(result.into_result().unwrap(), 48);
    }

    #[test]
    fn mismatch_reports_required_size() {
        for status in [NtStatus::INFO_LENGTH_MISMATCH, NtStatus::BUFFER_TOO_SMALL] {
            let err = QueryResult::new(status, 0x2000).into_result().unwrap_err();
            assert_eq!(err.required_buffer_size(), Some(0x2000));
        }
    }

    #[test]
    fn other_status_is_a_hard_failure() {
        let err = QueryResult::new(NtStatus::ACCESS_DENIED, 0)
            .into_result()
            .unwrap_err();

        assert!(matches!(
            err,
            ProcessError::Status {
                status: NtStatus::ACCESS_DENIED,
                ..
            }
        ));
    }

    #[test]
    fn buffer_grows_to_reported_size_or_doubles() {
        let limits = QueryLimits::default();
        assert_eq!(limits.next_buffer_size(0x1000, 0x3000).unwrap(), 0x3000);
        assert_eq!(limits.next_buffer_size(0x1000, 0).unwrap(), 0x2000);
        assert_eq!(limits.next_buffer_size(0x1000, 0x800).unwrap(), 0x2000);
        assert_eq!(limits.next_buffer_size(0, 0).unwrap(), 1);
    }

    #[test]
    fn buffer_growth_is_bounded() {
        let limits = QueryLimits {
            max_buffer_size: 0x4000,
            ..QueryLimits::default()
        };

        let err = limits.next_buffer_size(0x1000, 0x8000).unwrap_err();
        assert!(matches!(
            err,
            ProcessError::BufferLimitExceeded {
                size: 0x8000,
                limit: 0x4000
            }
        ));
    }
}
