#![cfg(windows)]

use std::{
    ffi::c_void,
    time::{Duration, SystemTime},
};

use procscope_core::{
    BasicInformation, Handle, InfoClass, ProcessAccess, ProcessError, ProcessId, ProcessInspector,
    Va,
};
use procscope_driver_windows::WindowsDriver;
use windows_sys::Win32::System::{
    Memory::{
        MEM_COMMIT, MEM_RELEASE, MEM_RESERVE, PAGE_NOACCESS, PAGE_READWRITE, VirtualAlloc,
        VirtualFree, VirtualProtect,
    },
    Threading::GetCurrentThread,
};

const QUERY_ACCESS: ProcessAccess = ProcessAccess::QUERY_INFORMATION.union(ProcessAccess::VM_READ);

fn inspector() -> ProcessInspector<WindowsDriver> {
    ProcessInspector::new(WindowsDriver::new())
}

/// Opens the current process and closes the handle when dropped.
struct OwnProcess<'a> {
    inspector: &'a ProcessInspector<WindowsDriver>,
    handle: Handle,
}

impl<'a> OwnProcess<'a> {
    fn open(inspector: &'a ProcessInspector<WindowsDriver>, access: ProcessAccess) -> Self {
        let handle = inspector
            .open(access, false, ProcessId::current())
            .expect("open own process");

        Self { inspector, handle }
    }
}

impl Drop for OwnProcess<'_> {
    fn drop(&mut self) {
        let _ = self.inspector.driver().close_handle(self.handle);
    }
}

#[test]
fn full_image_name_of_own_process() -> Result<(), ProcessError> {
    let inspector = inspector();
    let process = OwnProcess::open(&inspector, ProcessAccess::QUERY_LIMITED_INFORMATION);

    let name = inspector.full_image_name(process.handle)?;
    let exe = std::env::current_exe().expect("current exe");
    let file_name = exe.file_name().and_then(|name| name.to_str()).unwrap();

    assert!(
        name.to_lowercase().ends_with(&file_name.to_lowercase()),
        "{name} does not end with {file_name}"
    );

    Ok(())
}

#[test]
fn open_nonexistent_process_fails() {
    let err = inspector()
        .open(QUERY_ACCESS, false, ProcessId(0xFFFF_FFF0))
        .unwrap_err();

    assert!(matches!(
        err,
        ProcessError::Syscall {
            operation: "OpenProcess",
            ..
        }
    ));
}

#[test]
fn basic_information_of_own_process() -> Result<(), ProcessError> {
    let inspector = inspector();
    let process = OwnProcess::open(&inspector, QUERY_ACCESS);

    let mut buffer = vec![0u8; BasicInformation::SIZE];
    let written = inspector.query_info(process.handle, InfoClass::Basic, &mut buffer)?;
    assert_eq!(written, BasicInformation::SIZE);

    let info = inspector.basic_information(process.handle)?;
    assert_eq!(info.unique_process_id, ProcessId::current());
    assert!(!info.peb_base_address.is_null());

    Ok(())
}

#[test]
fn parent_id_of_own_process() {
    let inspector = inspector();
    let process = OwnProcess::open(&inspector, QUERY_ACCESS);

    assert_ne!(inspector.parent_id(process.handle), ProcessId(0));
}

#[test]
fn parent_id_without_query_rights_is_zero() {
    let inspector = inspector();
    let process = OwnProcess::open(&inspector, ProcessAccess::TERMINATE);

    assert_eq!(inspector.parent_id(process.handle), ProcessId(0));
}

#[test]
fn handle_snapshot_with_small_buffer_needs_reallocation() -> Result<(), ProcessError> {
    let inspector = inspector();
    let process = OwnProcess::open(&inspector, QUERY_ACCESS);

    let mut buffer = vec![0u8; 8];
    let err = inspector
        .query_info(process.handle, InfoClass::Handle, &mut buffer)
        .unwrap_err();

    assert!(err.is_needs_reallocate_buffer(), "unexpected error: {err}");

    let handles = inspector.handles(process.handle)?;
    assert!(!handles.is_empty());
    assert!(handles.iter().any(|entry| entry.handle == process.handle));

    Ok(())
}

#[test]
fn own_process_is_alive() {
    let inspector = inspector();
    let process = OwnProcess::open(&inspector, ProcessAccess::QUERY_LIMITED_INFORMATION);

    assert!(inspector.is_alive(process.handle));
}

#[test]
fn closed_handle_is_not_alive() {
    let inspector = inspector();
    let handle = inspector
        .open(
            ProcessAccess::QUERY_LIMITED_INFORMATION,
            false,
            ProcessId::current(),
        )
        .unwrap();

    inspector.driver().close_handle(handle).unwrap();

    assert!(!inspector.is_alive(handle));
    assert!(!inspector.is_alive(Handle::NULL));
}

#[test]
fn read_own_memory() -> Result<(), ProcessError> {
    let inspector = inspector();
    let process = OwnProcess::open(&inspector, QUERY_ACCESS);

    let data = (0..=255u8).collect::<Vec<_>>();
    let address = Va(data.as_ptr() as u64);

    assert_eq!(inspector.read_memory(process.handle, address, data.len())?, data);

    let text = "procscope\0tail".encode_utf16().collect::<Vec<_>>();
    let address = Va(text.as_ptr() as u64);

    assert_eq!(
        inspector.read_memory_unicode(process.handle, address, text.len() * 2)?,
        text
    );
    assert_eq!(
        inspector.read_memory_string(process.handle, address, text.len() * 2)?,
        "procscope"
    );

    Ok(())
}

#[test]
fn read_across_inaccessible_page_fails() {
    const PAGE_SIZE: usize = 0x1000;

    let inspector = inspector();
    let process = OwnProcess::open(&inspector, QUERY_ACCESS);

    // SAFETY: Allocates two fresh pages and revokes access to the second.
    let base = unsafe {
        let base = VirtualAlloc(
            std::ptr::null(),
            2 * PAGE_SIZE,
            MEM_COMMIT | MEM_RESERVE,
            PAGE_READWRITE,
        );
        assert!(!base.is_null());

        let mut old = 0;
        let second = base.cast::<u8>().add(PAGE_SIZE).cast::<c_void>();
        assert_ne!(VirtualProtect(second, PAGE_SIZE, PAGE_NOACCESS, &mut old), 0);
        base
    };

    let address = Va((base as usize + PAGE_SIZE - 16) as u64);
    let result = inspector.read_memory(process.handle, address, 32);

    // SAFETY: `base` was returned by `VirtualAlloc` above.
    unsafe { VirtualFree(base, 0, MEM_RELEASE) };

    assert!(result.is_err());
}

#[test]
fn start_time_of_own_process() -> Result<(), ProcessError> {
    let inspector = inspector();
    let process = OwnProcess::open(&inspector, ProcessAccess::QUERY_LIMITED_INFORMATION);

    let start = inspector.start_time(process.handle)?;
    let now = SystemTime::now();

    assert!(start <= now);
    assert!(now.duration_since(start).unwrap() < Duration::from_secs(24 * 60 * 60));
    assert_eq!(inspector.times(process.handle)?.exit_time(), None);

    Ok(())
}

#[test]
fn process_id_of_current_thread() -> Result<(), ProcessError> {
    // SAFETY: Returns a pseudo-handle, no resources are allocated.
    let thread = Handle(unsafe { GetCurrentThread() } as usize);

    assert_eq!(
        inspector().process_id_of_thread(thread)?,
        ProcessId::current()
    );
    assert!(inspector().process_id_of_thread(Handle::NULL).is_err());

    Ok(())
}

#[test]
fn query_service_is_resolved() {
    assert!(WindowsDriver::new().has_query_information());
}
