use serde::{Deserialize, Serialize};

use super::macros::{impl_hex_fmt, impl_id};

/// An opaque OS-assigned identifier of an open process or thread.
///
/// A handle carries no behavior and no ownership: copying it never
/// duplicates the underlying OS resource, and dropping it never closes it.
/// Whoever obtained the handle is responsible for releasing it.
///
/// The only validity guarantee is that a handle produced by
/// [`ProcessInspector::open`] was non-null at creation time. The OS may
/// revoke it afterwards, in which case operations on it fail (or, for the
/// best-effort operations, report their default).
///
/// [`ProcessInspector::open`]: crate::ProcessInspector::open
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Handle(pub usize);

impl_hex_fmt!(Handle, usize);

impl Handle {
    /// The null (invalid) handle.
    pub const NULL: Self = Self(0);

    /// Creates a new handle from its raw value.
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Checks if the handle is the null sentinel.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl From<usize> for Handle {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl From<Handle> for usize {
    fn from(value: Handle) -> Self {
        value.0
    }
}

impl_id!(ProcessId, u32, "process ID within the host");

impl ProcessId {
    /// Returns the identifier of the calling process.
    pub fn current() -> Self {
        Self(std::process::id())
    }
}
