#[cfg(windows)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use procscope::{
        ProcessAccess, ProcessError, ProcessId, ProcessInspector, driver::windows::WindowsDriver,
    };

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let process_id = match std::env::args().nth(1) {
        Some(arg) => ProcessId(arg.parse()?),
        None => ProcessId::current(),
    };

    // Setup the inspector.
    let inspector = ProcessInspector::new(WindowsDriver::new());
    let access = ProcessAccess::QUERY_INFORMATION | ProcessAccess::VM_READ;
    let handle = inspector.open(access, false, process_id)?;

    tracing::info!(%process_id, %handle, %access, "process opened");

    println!("Image:   {}", inspector.full_image_name(handle)?);
    println!("Parent:  {}", inspector.parent_id(handle));
    println!("Alive:   {}", inspector.is_alive(handle));

    let times = inspector.times(handle)?;
    println!("Started: {:?}", times.creation_time());
    println!("Kernel:  {:?}", times.kernel_time());
    println!("User:    {:?}", times.user_time());

    let info = inspector.basic_information(handle)?;
    println!("PEB:     {}", info.peb_base_address);

    // Not every process lets us see its handle table.
    match inspector.handles(handle) {
        Ok(handles) => println!("Handles: {}", handles.len()),
        Err(err) => println!("Handles: {err}"),
    }

    inspector
        .driver()
        .close_handle(handle)
        .map_err(|err| ProcessError::syscall("CloseHandle", err))?;

    Ok(())
}

#[cfg(not(windows))]
fn main() {
    eprintln!("This example requires Windows");
}
