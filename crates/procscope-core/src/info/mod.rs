mod basic;
mod handle;

use serde::{Deserialize, Serialize};

pub use self::{basic::BasicInformation, handle::HandleEntry};

/// Selects the record returned by the kernel information query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum InfoClass {
    /// `ProcessBasicInformation`, a fixed-size [`BasicInformation`] record.
    Basic = 0,

    /// `ProcessHandleInformation`, a variable-length snapshot of the handles
    /// allocated by the process.
    Handle = 51,
}

impl InfoClass {
    /// Returns the raw information class value passed to the kernel.
    pub fn raw(self) -> u32 {
        self as u32
    }

    /// Returns the record size for fixed-size classes.
    ///
    /// Variable-length classes return `None`; their size is only known
    /// after the kernel reports it.
    pub fn record_size(self) -> Option<usize> {
        match self {
            Self::Basic => Some(BasicInformation::SIZE),
            Self::Handle => None,
        }
    }
}

pub(crate) use self::handle::decode_handle_snapshot;
#[cfg(test)]
pub(crate) use self::handle::encode_handle_snapshot;
