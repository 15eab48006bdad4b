use serde::{Deserialize, Serialize};

use crate::core::macros::impl_hex_fmt;

/// A raw `NTSTATUS` value returned by the kernel information service.
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NtStatus(pub u32);

impl_hex_fmt!(NtStatus, u32);

impl NtStatus {
    /// `STATUS_SUCCESS`.
    pub const SUCCESS: Self = Self(0x0000_0000);

    /// `STATUS_INFO_LENGTH_MISMATCH`.
    pub const INFO_LENGTH_MISMATCH: Self = Self(0xC000_0004);

    /// `STATUS_INVALID_HANDLE`.
    pub const INVALID_HANDLE: Self = Self(0xC000_0008);

    /// `STATUS_ACCESS_DENIED`.
    pub const ACCESS_DENIED: Self = Self(0xC000_0022);

    /// `STATUS_BUFFER_TOO_SMALL`.
    pub const BUFFER_TOO_SMALL: Self = Self(0xC000_0023);

    /// Checks the status against the `NT_SUCCESS` predicate.
    ///
    /// Success and informational codes (signed value >= 0) are successful,
    /// warning and error codes are not.
    pub fn is_success(self) -> bool {
        (self.0 as i32) >= 0
    }

    /// Checks if the status reports an undersized caller buffer.
    pub fn is_buffer_size_mismatch(self) -> bool {
        self == Self::INFO_LENGTH_MISMATCH || self == Self::BUFFER_TOO_SMALL
    }
}

impl From<i32> for NtStatus {
    fn from(value: i32) -> Self {
        Self(value as u32)
    }
}

impl From<u32> for NtStatus {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nt_success_predicate() {
        assert!(NtStatus::SUCCESS.is_success());
        assert!(NtStatus(0x4000_0000).is_success());
        assert!(!NtStatus(0x8000_0005).is_success());
        assert!(!NtStatus::ACCESS_DENIED.is_success());
    }

    #[test]
    fn buffer_size_mismatch() {
        assert!(NtStatus::INFO_LENGTH_MISMATCH.is_buffer_size_mismatch());
        assert!(NtStatus::BUFFER_TOO_SMALL.is_buffer_size_mismatch());
        assert!(!NtStatus::ACCESS_DENIED.is_buffer_size_mismatch());
        assert!(!NtStatus::SUCCESS.is_buffer_size_mismatch());
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(NtStatus::INFO_LENGTH_MISMATCH.to_string(), "0xc0000004");
        assert_eq!(NtStatus::from(-1073741820i32), NtStatus::INFO_LENGTH_MISMATCH);
    }
}
