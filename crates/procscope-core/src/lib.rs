//! Core process introspection functionality.
//!
//! This crate contains everything that does not depend on the host OS:
//! access masks, handles, the kernel information query protocol, record
//! decoders and the [`ProcessInspector`] facade. The OS itself is reached
//! through a [`ProcessDriver`].
//!
//! ## Concurrency
//!
//! The facade holds no mutable state. Different threads may inspect
//! different handles concurrently without coordination. Results for the
//! same handle are racy at the OS level: a liveness check may be stale by
//! the time it returns, and a handle snapshot may change between the
//! reallocation attempts of a query.
//!
//! There is no cancellation or timeout support. Each call blocks for as
//! long as the underlying OS call does.

mod access;
mod core;
mod driver;
mod error;
mod info;
mod query;
mod status;
mod time;


use std::time::SystemTime;

pub use self::{
    access::ProcessAccess,
    core::{Handle, ProcessId, Va},
    driver::ProcessDriver,
    error::{OsError, ProcessError},
    info::{BasicInformation, HandleEntry, InfoClass},
    query::{QueryLimits, QueryResult},
    status::NtStatus,
    time::{ProcessTimes, filetime_to_duration, filetime_to_system_time},
};

/// Exit code reported for a process that has not terminated yet.
pub const STILL_ACTIVE: u32 = 259;

/// Maximum path length, in UTF-16 code units.
pub const MAX_PATH: usize = 260;

/// The process introspection facade.
///
/// Wraps a [`ProcessDriver`] and exposes the operations on process
/// handles. Handles are never closed by the inspector: a handle returned
/// by [`open`](Self::open) belongs to the caller.
pub struct ProcessInspector<Driver>
where
    Driver: ProcessDriver,
{
    driver: Driver,
    query_limits: QueryLimits,
    image_name_capacity: usize,
}

impl<Driver> ProcessInspector<Driver>
where
    Driver: ProcessDriver,
{
    /// Creates a new `ProcessInspector` with the given driver.
    ///
    /// Variable-length queries use [`QueryLimits::default`] and image names
    /// are limited to [`MAX_PATH`] code units.
    pub fn new(driver: Driver) -> Self {
        Self {
            driver,
            query_limits: QueryLimits::default(),
            image_name_capacity: MAX_PATH,
        }
    }

    /// Sets the bounds of the reallocate-and-retry loop used by
    /// [`query_info_vec`](Self::query_info_vec).
    pub fn with_query_limits(self, query_limits: QueryLimits) -> Self {
        Self {
            query_limits,
            ..self
        }
    }

    /// Sets the capacity, in UTF-16 code units, of the buffer used by
    /// [`full_image_name`](Self::full_image_name).
    pub fn with_image_name_capacity(self, image_name_capacity: usize) -> Self {
        Self {
            image_name_capacity,
            ..self
        }
    }

    /// Returns the bounds of the reallocate-and-retry loop.
    pub fn query_limits(&self) -> QueryLimits {
        self.query_limits
    }

    /// Returns the driver.
    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    /// Opens the process with the requested access rights.
    ///
    /// The returned handle belongs to the caller, who is responsible for
    /// closing it.
    pub fn open(
        &self,
        access: ProcessAccess,
        inherit: bool,
        process_id: ProcessId,
    ) -> Result<Handle, ProcessError> {
        tracing::debug!(%process_id, %access, inherit, "opening process");

        let handle = self
            .driver
            .open_process(access, inherit, process_id)
            .map_err(|err| ProcessError::syscall("OpenProcess", err))?;

        if handle.is_null() {
            return Err(ProcessError::NullResult {
                operation: "OpenProcess",
            });
        }

        Ok(handle)
    }

    /// Returns the full path of the executable image of the process.
    ///
    /// Requires at least [`ProcessAccess::QUERY_LIMITED_INFORMATION`].
    pub fn full_image_name(&self, handle: Handle) -> Result<String, ProcessError> {
        let mut buffer = vec![0u16; self.image_name_capacity];

        let length = self
            .driver
            .full_image_name(handle, &mut buffer)
            .map_err(|err| ProcessError::syscall("QueryFullProcessImageName", err))?;

        Ok(String::from_utf16_lossy(&buffer[..length.min(buffer.len())]))
    }

    /// Queries the kernel information service into a caller-supplied buffer.
    ///
    /// Returns the number of bytes written. An undersized buffer yields
    /// [`ProcessError::NeedsReallocateBuffer`] carrying the size the kernel
    /// requires; this method never retries by itself. Any other failure
    /// yields [`ProcessError::Status`] with the raw status code.
    ///
    /// If the information service is not available, returns `Ok(0)`.
    /// Callers must treat zero bytes as "no information available".
    pub fn query_info(
        &self,
        handle: Handle,
        class: InfoClass,
        buffer: &mut [u8],
    ) -> Result<usize, ProcessError> {
        match self.driver.query_information(handle, class, buffer) {
            Some(result) => result.into_result(),
            None => {
                tracing::trace!(?class, "process information service unavailable");
                Ok(0)
            }
        }
    }

    /// Queries a variable-length record, reallocating the buffer as needed.
    ///
    /// The first buffer is the fixed record size of `class`, or
    /// [`QueryLimits::initial_buffer_size`]. On
    /// [`ProcessError::NeedsReallocateBuffer`] the buffer grows to the
    /// reported size (or doubles if none was reported) and the query is
    /// repeated, up to [`QueryLimits::max_attempts`] calls and
    /// [`QueryLimits::max_buffer_size`] bytes.
    ///
    /// Returns the bytes written by the kernel. An empty vector means no
    /// information is available.
    pub fn query_info_vec(&self, handle: Handle, class: InfoClass) -> Result<Vec<u8>, ProcessError> {
        let limits = self.query_limits;
        let mut size = class
            .record_size()
            .unwrap_or(limits.initial_buffer_size);

        for attempt in 1..=limits.max_attempts {
            let mut buffer = vec![0u8; size];

            match self.query_info(handle, class, &mut buffer) {
                Ok(written) => {
                    buffer.truncate(written);
                    return Ok(buffer);
                }
                Err(ProcessError::NeedsReallocateBuffer { required }) => {
                    let next = limits.next_buffer_size(size, required)?;
                    tracing::trace!(?class, attempt, size, next, "reallocating query buffer");
                    size = next;
                }
                Err(err) => return Err(err),
            }
        }

        Err(ProcessError::RetriesExhausted {
            attempts: limits.max_attempts,
        })
    }

    /// Returns the basic information record of the process.
    ///
    /// Requires [`ProcessAccess::QUERY_INFORMATION`] or
    /// [`ProcessAccess::QUERY_LIMITED_INFORMATION`].
    pub fn basic_information(&self, handle: Handle) -> Result<BasicInformation, ProcessError> {
        let mut buffer = [0u8; BasicInformation::SIZE];
        let written = self.query_info(handle, InfoClass::Basic, &mut buffer)?;
        BasicInformation::decode(&buffer[..written.min(buffer.len())])
    }

    /// Returns the handles held by the process.
    ///
    /// Requires [`ProcessAccess::QUERY_INFORMATION`].
    pub fn handles(&self, handle: Handle) -> Result<Vec<HandleEntry>, ProcessError> {
        let buffer = self.query_info_vec(handle, InfoClass::Handle)?;

        if buffer.is_empty() {
            return Ok(Vec::new());
        }

        info::decode_handle_snapshot(&buffer)
    }

    /// Reads `size` bytes of process memory starting at `address`.
    ///
    /// The whole range must be readable. A read that transfers fewer bytes
    /// than requested fails; a truncated buffer is never returned.
    ///
    /// Requires [`ProcessAccess::VM_READ`].
    pub fn read_memory(
        &self,
        handle: Handle,
        address: Va,
        size: usize,
    ) -> Result<Vec<u8>, ProcessError> {
        let mut buffer = vec![0u8; size];

        if size == 0 {
            return Ok(buffer);
        }

        let read = self
            .driver
            .read_memory(handle, address, &mut buffer)
            .map_err(|err| ProcessError::syscall("ReadProcessMemory", err))?;

        if read != size {
            return Err(ProcessError::PartialRead {
                requested: size,
                read,
            });
        }

        Ok(buffer)
    }

    /// Reads `size` bytes of process memory as UTF-16 code units.
    ///
    /// `size` is a byte count. The result holds `size / 2` code units; an
    /// odd trailing byte is discarded. Same atomicity as
    /// [`read_memory`](Self::read_memory).
    pub fn read_memory_unicode(
        &self,
        handle: Handle,
        address: Va,
        size: usize,
    ) -> Result<Vec<u16>, ProcessError> {
        let buffer = self.read_memory(handle, address, size)?;

        Ok(buffer
            .chunks_exact(2)
            .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
            .collect())
    }

    /// Reads a UTF-16 string of at most `size` bytes from process memory.
    ///
    /// The string ends at the first NUL code unit, or at the end of the
    /// range. Invalid UTF-16 is replaced with `U+FFFD`.
    pub fn read_memory_string(
        &self,
        handle: Handle,
        address: Va,
        size: usize,
    ) -> Result<String, ProcessError> {
        let units = self.read_memory_unicode(handle, address, size)?;
        let end = units
            .iter()
            .position(|&unit| unit == 0)
            .unwrap_or(units.len());

        Ok(String::from_utf16_lossy(&units[..end]))
    }

    /// Returns the identifier of the parent process.
    ///
    /// This is a best-effort lookup: if the basic information query fails
    /// for any reason (insufficient access, dead process, service not
    /// available), returns `ProcessId(0)`.
    pub fn parent_id(&self, handle: Handle) -> ProcessId {
        match self.basic_information(handle) {
            Ok(info) => info.parent_id(),
            Err(err) => {
                tracing::trace!(%handle, %err, "parent process id unavailable");
                ProcessId(0)
            }
        }
    }

    /// Returns the timing statistics of the process.
    pub fn times(&self, handle: Handle) -> Result<ProcessTimes, ProcessError> {
        self.driver
            .process_times(handle)
            .map_err(|err| ProcessError::syscall("GetProcessTimes", err))
    }

    /// Returns the time the process was created.
    pub fn start_time(&self, handle: Handle) -> Result<SystemTime, ProcessError> {
        Ok(self.times(handle)?.creation_time())
    }

    /// Returns the identifier of the process owning the thread.
    pub fn process_id_of_thread(&self, thread: Handle) -> Result<ProcessId, ProcessError> {
        let process_id = self
            .driver
            .process_id_of_thread(thread)
            .map_err(|err| ProcessError::syscall("GetProcessIdOfThread", err))?;

        if process_id.0 == 0 {
            return Err(ProcessError::NullResult {
                operation: "GetProcessIdOfThread",
            });
        }

        Ok(process_id)
    }

    /// Checks whether the process is still running.
    ///
    /// Returns `true` only if the exit code equals [`STILL_ACTIVE`]. Any
    /// failure to retrieve the exit code yields `false`.
    ///
    /// A process that exits with code 259 is indistinguishable from a
    /// running one.
    pub fn is_alive(&self, handle: Handle) -> bool {
        match self.driver.exit_code(handle) {
            Ok(exit_code) => exit_code == STILL_ACTIVE,
            Err(err) => {
                tracing::trace!(%handle, %err, "exit code unavailable");
                false
            }
        }
    }
}
