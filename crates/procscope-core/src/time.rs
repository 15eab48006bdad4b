use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Number of 100-nanosecond intervals between 1601-01-01 and 1970-01-01.
const FILETIME_UNIX_EPOCH: u64 = 116_444_736_000_000_000;

/// Number of 100-nanosecond intervals per second.
const FILETIME_TICKS_PER_SECOND: u64 = 10_000_000;

/// Converts a `FILETIME` tick count into a [`Duration`].
pub fn filetime_to_duration(ticks: u64) -> Duration {
    Duration::new(
        ticks / FILETIME_TICKS_PER_SECOND,
        ((ticks % FILETIME_TICKS_PER_SECOND) * 100) as u32,
    )
}

/// Converts an absolute `FILETIME` (ticks since 1601-01-01 UTC) into a
/// [`SystemTime`].
pub fn filetime_to_system_time(ticks: u64) -> SystemTime {
    if ticks >= FILETIME_UNIX_EPOCH {
        UNIX_EPOCH + filetime_to_duration(ticks - FILETIME_UNIX_EPOCH)
    } else {
        UNIX_EPOCH
            .checked_sub(filetime_to_duration(FILETIME_UNIX_EPOCH - ticks))
            .unwrap_or(UNIX_EPOCH)
    }
}

/// Timing statistics of a process.
///
/// All values are raw `FILETIME` tick counts (100-nanosecond intervals).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessTimes {
    /// Creation time, ticks since 1601-01-01 UTC.
    pub creation: u64,

    /// Exit time, ticks since 1601-01-01 UTC. Zero while the process runs.
    pub exit: u64,

    /// Time spent in kernel mode.
    pub kernel: u64,

    /// Time spent in user mode.
    pub user: u64,
}

impl ProcessTimes {
    /// Returns the time the process was created.
    pub fn creation_time(&self) -> SystemTime {
        filetime_to_system_time(self.creation)
    }

    /// Returns the time the process exited, or `None` if it has not.
    pub fn exit_time(&self) -> Option<SystemTime> {
        match self.exit {
            0 => None,
            exit => Some(filetime_to_system_time(exit)),
        }
    }

    /// Returns the time spent in kernel mode.
    pub fn kernel_time(&self) -> Duration {
        filetime_to_duration(self.kernel)
    }

    /// Returns the time spent in user mode.
    pub fn user_time(&self) -> Duration {
        filetime_to_duration(self.user)
    }
}
