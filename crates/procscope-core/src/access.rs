use bitflags::Flags as _;
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Process access rights.
    ///
    /// Describes which operations a process handle is permitted to perform
    /// on its target. Passed to [`ProcessInspector::open`] and decoded back
    /// into symbolic names for diagnostics with [`ProcessAccess::names`].
    ///
    /// [`ProcessInspector::open`]: crate::ProcessInspector::open
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ProcessAccess: u32 {
        /// Required to terminate a process.
        const TERMINATE                 = 0x0001;

        /// Required to create a thread in the process.
        const CREATE_THREAD             = 0x0002;

        /// Required to perform an operation on the address space of a process.
        const VM_OPERATION              = 0x0008;

        /// Required to read memory in a process.
        const VM_READ                   = 0x0010;

        /// Required to write to memory in a process.
        const VM_WRITE                  = 0x0020;

        /// Required to duplicate a handle.
        const DUP_HANDLE                = 0x0040;

        /// Required to use this process as the parent process.
        const CREATE_PROCESS            = 0x0080;

        /// Required to set memory limits.
        const SET_QUOTA                 = 0x0100;

        /// Required to set certain information about a process, such as its
        /// priority class.
        const SET_INFORMATION           = 0x0200;

        /// Required to retrieve certain information about a process, such as
        /// its token, exit code, and priority class.
        const QUERY_INFORMATION         = 0x0400;

        /// Required to suspend or resume a process.
        const SUSPEND_RESUME            = 0x0800;

        /// Required to retrieve a limited set of information about a process,
        /// such as its image name.
        const QUERY_LIMITED_INFORMATION = 0x1000;

        /// All possible access rights.
        ///
        /// `STANDARD_RIGHTS_REQUIRED | SYNCHRONIZE | 0xFFFF`. This is a
        /// composite value, not a single bit.
        const ALL_ACCESS                = 0x000F_0000 | 0x0010_0000 | 0xFFFF;
    }
}

impl ProcessAccess {
    /// Highest single-bit right decoded by [`names`](Self::names).
    const MAX_FLAG: u32 = Self::QUERY_LIMITED_INFORMATION.bits();

    /// Returns the symbolic name of a single access right.
    ///
    /// Values that are not exactly one of the enumerated rights (including
    /// arbitrary combinations) map to `"UNKNOWN"`.
    pub fn name(self) -> &'static str {
        Self::FLAGS
            .iter()
            .find(|flag| *flag.value() == self)
            .map(|flag| flag.name())
            .unwrap_or("UNKNOWN")
    }

    /// Decodes the access mask into an ordered list of symbolic names.
    ///
    /// [`ALL_ACCESS`] decodes to exactly `["ALL_ACCESS"]`. Any other mask is
    /// tested for `TERMINATE`, `CREATE_THREAD` and `VM_OPERATION`, then for
    /// every power of two from `VM_READ` up to `QUERY_LIMITED_INFORMATION`.
    ///
    /// The decoding is lossy: bits outside the enumerated rights are
    /// silently dropped, so the result cannot be used to reconstruct the
    /// original mask.
    ///
    /// [`ALL_ACCESS`]: Self::ALL_ACCESS
    pub fn names(self) -> Vec<&'static str> {
        if self == Self::ALL_ACCESS {
            return vec![Self::ALL_ACCESS.name()];
        }

        let mut result = Vec::new();

        for flag in [Self::TERMINATE, Self::CREATE_THREAD, Self::VM_OPERATION] {
            if self.intersects(flag) {
                result.push(flag.name());
            }
        }

        let mut mask = Self::VM_READ.bits();
        while mask <= Self::MAX_FLAG {
            let flag = Self::from_bits_retain(mask);
            if self.intersects(flag) {
                result.push(flag.name());
            }

            mask <<= 1;
        }

        result
    }
}

impl std::fmt::Display for ProcessAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let names = self.names();

        if names.is_empty() {
            return write!(f, "0x{:x}", self.bits());
        }

        f.write_str(&names.join("|"))
    }
}
