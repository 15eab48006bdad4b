use serde::{Deserialize, Serialize};

use super::macros::impl_hex_fmt;

/// A virtual address in the address space of the target process.
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Va(pub u64);

impl_hex_fmt!(Va, u64);

impl Va {
    /// Creates a new virtual address.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Checks if the virtual address is NULL.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Returns the address as a host pointer-sized integer.
    ///
    /// Returns `None` if the address does not fit into the host word
    /// (a 64-bit address seen from a 32-bit host).
    pub fn to_usize(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl From<u64> for Va {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Va> for u64 {
    fn from(value: Va) -> Self {
        value.0
    }
}

impl ::std::ops::Add<u64> for Va {
    type Output = Va;

    fn add(self, rhs: u64) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl ::std::ops::AddAssign<u64> for Va {
    fn add_assign(&mut self, rhs: u64) {
        self.0 += rhs;
    }
}

impl ::std::ops::Sub<u64> for Va {
    type Output = Va;

    fn sub(self, rhs: u64) -> Self::Output {
        Self(self.0 - rhs)
    }
}

impl ::std::ops::Sub<Va> for Va {
    type Output = u64;

    fn sub(self, rhs: Va) -> Self::Output {
        self.0 - rhs.0
    }
}
