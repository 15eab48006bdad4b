use crate::{Handle, InfoClass, OsError, ProcessAccess, ProcessId, ProcessTimes, QueryResult, Va};

/// A trait for implementing a process driver.
///
/// A driver is the boundary to the host operating system. Every method
/// maps to exactly one OS call and applies that call's documented success
/// predicate; on failure it reports the thread's last-error value as an
/// [`OsError`]. Interpretation of the results (null sentinels, record
/// decoding, liveness) is left to [`ProcessInspector`].
///
/// All methods are synchronous and may block for as long as the OS call
/// does. No method ever closes a handle.
///
/// [`ProcessInspector`]: crate::ProcessInspector
pub trait ProcessDriver {
    /// Opens the process with the requested access rights.
    fn open_process(
        &self,
        access: ProcessAccess,
        inherit: bool,
        process_id: ProcessId,
    ) -> Result<Handle, OsError>;

    /// Writes the full image path of the process into `buffer`.
    ///
    /// Returns the number of UTF-16 code units written, not counting the
    /// terminating NUL.
    fn full_image_name(&self, handle: Handle, buffer: &mut [u16]) -> Result<usize, OsError>;

    /// Queries the kernel information service for the given class.
    ///
    /// Returns `None` if the service is not available in the current
    /// environment.
    fn query_information(
        &self,
        handle: Handle,
        class: InfoClass,
        buffer: &mut [u8],
    ) -> Option<QueryResult>;

    /// Reads memory of the process at `address` into `buffer`.
    ///
    /// Returns the number of bytes read.
    fn read_memory(&self, handle: Handle, address: Va, buffer: &mut [u8])
    -> Result<usize, OsError>;

    /// Retrieves timing statistics of the process.
    fn process_times(&self, handle: Handle) -> Result<ProcessTimes, OsError>;

    /// Retrieves the identifier of the process owning the thread.
    fn process_id_of_thread(&self, thread: Handle) -> Result<ProcessId, OsError>;

    /// Retrieves the exit code of the process.
    fn exit_code(&self, handle: Handle) -> Result<u32, OsError>;
}
