use std::{ffi::c_void, mem::MaybeUninit};

use procscope_core::{
    Handle, InfoClass, NtStatus, OsError, ProcessAccess, ProcessDriver, ProcessId, ProcessTimes,
    QueryResult, Va,
};
use windows_sys::Win32::{
    Foundation::{CloseHandle, ERROR_INVALID_ADDRESS, FILETIME, HANDLE},
    System::{
        Diagnostics::Debug::ReadProcessMemory,
        Threading::{
            GetExitCodeProcess, GetProcessIdOfThread, GetProcessTimes, OpenProcess,
            PROCESS_NAME_WIN32, QueryFullProcessImageNameW,
        },
    },
};

use crate::ntdll::NT_QUERY_INFORMATION_PROCESS;

/// Process driver for Windows.
///
/// Stateless; every method is a single call into the OS. The driver never
/// closes a handle on its own, see [`close_handle`](Self::close_handle).
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsDriver;

impl WindowsDriver {
    /// Creates a new Windows driver.
    pub fn new() -> Self {
        Self
    }

    /// Returns `true` if the native information service could be resolved.
    pub fn has_query_information(&self) -> bool {
        NT_QUERY_INFORMATION_PROCESS.is_some()
    }

    /// Closes a handle previously returned by
    /// [`open_process`](ProcessDriver::open_process).
    pub fn close_handle(&self, handle: Handle) -> Result<(), OsError> {
        // SAFETY: Closing an invalid handle fails with an error code; it
        // does not corrupt memory.
        match unsafe { CloseHandle(as_raw(handle)) } {
            0 => Err(OsError::last()),
            _ => Ok(()),
        }
    }
}

fn as_raw(handle: Handle) -> HANDLE {
    handle.0 as HANDLE
}

fn filetime(value: FILETIME) -> u64 {
    (u64::from(value.dwHighDateTime) << 32) | u64::from(value.dwLowDateTime)
}

impl ProcessDriver for WindowsDriver {
    fn open_process(
        &self,
        access: ProcessAccess,
        inherit: bool,
        process_id: ProcessId,
    ) -> Result<Handle, OsError> {
        // SAFETY: No pointers are passed.
        let handle = unsafe { OpenProcess(access.bits(), i32::from(inherit), process_id.0) };

        if handle.is_null() {
            return Err(OsError::last());
        }

        Ok(Handle(handle as usize))
    }

    fn full_image_name(&self, handle: Handle, buffer: &mut [u16]) -> Result<usize, OsError> {
        let mut size = u32::try_from(buffer.len()).unwrap_or(u32::MAX);

        // SAFETY: `buffer` is valid for `size` code units and `size` is a
        // valid out-pointer.
        let result = unsafe {
            QueryFullProcessImageNameW(
                as_raw(handle),
                PROCESS_NAME_WIN32,
                buffer.as_mut_ptr(),
                &mut size,
            )
        };

        match result {
            0 => Err(OsError::last()),
            _ => Ok(size as usize),
        }
    }

    fn query_information(
        &self,
        handle: Handle,
        class: InfoClass,
        buffer: &mut [u8],
    ) -> Option<QueryResult> {
        let query = (*NT_QUERY_INFORMATION_PROCESS)?;

        let length = u32::try_from(buffer.len()).unwrap_or(u32::MAX);
        let mut return_length = 0u32;

        // SAFETY: `buffer` is valid for `length` bytes and `return_length`
        // is a valid out-pointer. The kernel writes at most `length` bytes.
        let status = unsafe {
            query(
                as_raw(handle),
                class.raw(),
                buffer.as_mut_ptr().cast::<c_void>(),
                length,
                &mut return_length,
            )
        };

        Some(QueryResult::new(NtStatus::from(status), return_length))
    }

    fn read_memory(
        &self,
        handle: Handle,
        address: Va,
        buffer: &mut [u8],
    ) -> Result<usize, OsError> {
        let Some(address) = address.to_usize() else {
            return Err(OsError(ERROR_INVALID_ADDRESS));
        };

        let mut read = 0usize;

        // SAFETY: `buffer` is valid for `buffer.len()` bytes and `read` is a
        // valid out-pointer. The source address is validated by the OS.
        let result = unsafe {
            ReadProcessMemory(
                as_raw(handle),
                address as *const c_void,
                buffer.as_mut_ptr().cast::<c_void>(),
                buffer.len(),
                &mut read,
            )
        };

        match result {
            0 => Err(OsError::last()),
            _ => Ok(read),
        }
    }

    fn process_times(&self, handle: Handle) -> Result<ProcessTimes, OsError> {
        let mut creation = MaybeUninit::<FILETIME>::zeroed();
        let mut exit = MaybeUninit::<FILETIME>::zeroed();
        let mut kernel = MaybeUninit::<FILETIME>::zeroed();
        let mut user = MaybeUninit::<FILETIME>::zeroed();

        // SAFETY: All four out-pointers are valid.
        let result = unsafe {
            GetProcessTimes(
                as_raw(handle),
                creation.as_mut_ptr(),
                exit.as_mut_ptr(),
                kernel.as_mut_ptr(),
                user.as_mut_ptr(),
            )
        };

        if result == 0 {
            return Err(OsError::last());
        }

        // SAFETY: The structures were zero-initialized and `FILETIME` is
        // plain data.
        let (creation, exit, kernel, user) = unsafe {
            (
                creation.assume_init(),
                exit.assume_init(),
                kernel.assume_init(),
                user.assume_init(),
            )
        };

        Ok(ProcessTimes {
            creation: filetime(creation),
            exit: filetime(exit),
            kernel: filetime(kernel),
            user: filetime(user),
        })
    }

    fn process_id_of_thread(&self, thread: Handle) -> Result<ProcessId, OsError> {
        // SAFETY: No pointers are passed.
        match unsafe { GetProcessIdOfThread(as_raw(thread)) } {
            0 => Err(OsError::last()),
            process_id => Ok(ProcessId(process_id)),
        }
    }

    fn exit_code(&self, handle: Handle) -> Result<u32, OsError> {
        let mut exit_code = 0u32;

        // SAFETY: `exit_code` is a valid out-pointer.
        match unsafe { GetExitCodeProcess(as_raw(handle), &mut exit_code) } {
            0 => Err(OsError::last()),
            _ => Ok(exit_code),
        }
    }
}
