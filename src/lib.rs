//! Process introspection over the native process and kernel information
//! APIs.
//!
//! The [`ProcessInspector`] facade is generic over a [`ProcessDriver`].
//! On Windows, the [`driver::windows::WindowsDriver`] connects it to the
//! host OS:
//!
//! ```no_run
//! # #[cfg(windows)]
//! # fn main() -> Result<(), procscope::ProcessError> {
//! use procscope::{
//!     ProcessAccess, ProcessError, ProcessId, ProcessInspector, driver::windows::WindowsDriver,
//! };
//!
//! let inspector = ProcessInspector::new(WindowsDriver::new());
//! let handle = inspector.open(
//!     ProcessAccess::QUERY_LIMITED_INFORMATION,
//!     false,
//!     ProcessId::current(),
//! )?;
//!
//! println!("{}", inspector.full_image_name(handle)?);
//! inspector
//!     .driver()
//!     .close_handle(handle)
//!     .map_err(|err| ProcessError::syscall("CloseHandle", err))?;
//! # Ok(())
//! # }
//! # #[cfg(not(windows))]
//! # fn main() {}
//! ```

pub use procscope_core::*;

/// Process drivers.
pub mod driver {
    /// Windows process driver.
    #[cfg(all(windows, feature = "driver-windows"))]
    pub mod windows {
        pub use procscope_driver_windows::*;
    }
}
