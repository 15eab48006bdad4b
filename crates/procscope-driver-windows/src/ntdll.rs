use std::ffi::c_void;

use once_cell::sync::Lazy;
use windows_sys::Win32::{
    Foundation::{HANDLE, NTSTATUS},
    System::LibraryLoader::{GetModuleHandleW, GetProcAddress},
};

/// Signature of `ntdll!NtQueryInformationProcess`.
pub(crate) type NtQueryInformationProcessFn = unsafe extern "system" fn(
    process: HANDLE,
    information_class: u32,
    information: *mut c_void,
    information_length: u32,
    return_length: *mut u32,
) -> NTSTATUS;

/// `NtQueryInformationProcess`, resolved on first use.
///
/// `None` if `ntdll.dll` is not loaded or does not export the service.
pub(crate) static NT_QUERY_INFORMATION_PROCESS: Lazy<Option<NtQueryInformationProcessFn>> =
    Lazy::new(resolve);

fn resolve() -> Option<NtQueryInformationProcessFn> {
    let name = "ntdll.dll\0".encode_utf16().collect::<Vec<_>>();

    // SAFETY: ntdll.dll is mapped into every user-mode process and is never
    // unloaded, so the module handle and the export stay valid.
    let module = unsafe { GetModuleHandleW(name.as_ptr()) };
    if module.is_null() {
        tracing::warn!("ntdll.dll is not loaded");
        return None;
    }

    // SAFETY: The name is a NUL-terminated ASCII string.
    let Some(function) =
        (unsafe { GetProcAddress(module, c"NtQueryInformationProcess".as_ptr().cast()) })
    else {
        tracing::warn!("NtQueryInformationProcess is not exported by ntdll.dll");
        return None;
    };

    tracing::debug!(address = ?(function as *const c_void), "resolved NtQueryInformationProcess");

    // SAFETY: The export has the documented `NtQueryInformationProcess`
    // signature and the `system` calling convention.
    Some(unsafe {
        std::mem::transmute::<unsafe extern "system" fn() -> isize, NtQueryInformationProcessFn>(
            function,
        )
    })
}
