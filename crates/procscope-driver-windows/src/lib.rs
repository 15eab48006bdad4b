//! Windows driver for procscope.
//!
//! Implements [`ProcessDriver`] on top of the Win32 process API and the
//! native `NtQueryInformationProcess` service. On other targets the crate
//! is empty.
//!
//! [`ProcessDriver`]: procscope_core::ProcessDriver

#[cfg(windows)]
mod driver;
#[cfg(windows)]
mod ntdll;

#[cfg(windows)]
pub use self::driver::WindowsDriver;
