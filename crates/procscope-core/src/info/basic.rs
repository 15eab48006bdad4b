use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::{NtStatus, ProcessError, ProcessId, Va};

#[repr(C)]
#[derive(Debug, Copy, Clone, FromBytes, Immutable, KnownLayout)]
#[allow(non_camel_case_types, non_snake_case)]
struct _PROCESS_BASIC_INFORMATION {
    ExitStatus: i32,
    PebBaseAddress: usize,
    AffinityMask: usize,
    BasePriority: i32,
    UniqueProcessId: usize,
    InheritedFromUniqueProcessId: usize,
}

/// Decoded `PROCESS_BASIC_INFORMATION` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicInformation {
    /// Exit status of the process (`STATUS_PENDING` while it runs).
    pub exit_status: NtStatus,

    /// Address of the process environment block.
    pub peb_base_address: Va,

    /// Processor affinity mask.
    pub affinity_mask: u64,

    /// Base scheduling priority.
    pub base_priority: i32,

    /// Identifier of the process.
    pub unique_process_id: ProcessId,

    /// Identifier of the process this one was created by.
    pub inherited_from_unique_process_id: ProcessId,
}

impl BasicInformation {
    /// Size of the record in the host ABI.
    pub const SIZE: usize = size_of::<_PROCESS_BASIC_INFORMATION>();

    /// Decodes the record from the bytes written by the kernel.
    ///
    /// Fails if `bytes` is shorter than [`SIZE`](Self::SIZE). Trailing bytes
    /// are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProcessError> {
        let (raw, _) = _PROCESS_BASIC_INFORMATION::read_from_prefix(bytes)
            .map_err(|_| ProcessError::CorruptedStruct("PROCESS_BASIC_INFORMATION"))?;

        Ok(Self {
            exit_status: NtStatus::from(raw.ExitStatus),
            peb_base_address: Va(raw.PebBaseAddress as u64),
            affinity_mask: raw.AffinityMask as u64,
            base_priority: raw.BasePriority,
            unique_process_id: ProcessId(raw.UniqueProcessId as u32),
            inherited_from_unique_process_id: ProcessId(raw.InheritedFromUniqueProcessId as u32),
        })
    }

    /// Returns the parent process identifier.
    pub fn parent_id(&self) -> ProcessId {
        self.inherited_from_unique_process_id
    }

    /// Encodes the record into the host ABI layout.
    #[cfg(test)]
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        use std::mem::offset_of;

        fn put(bytes: &mut [u8], offset: usize, value: &[u8]) {
            bytes[offset..offset + value.len()].copy_from_slice(value);
        }

        let mut bytes = vec![0u8; Self::SIZE];
        put(
            &mut bytes,
            offset_of!(_PROCESS_BASIC_INFORMATION, ExitStatus),
            &(self.exit_status.0 as i32).to_ne_bytes(),
        );
        put(
            &mut bytes,
            offset_of!(_PROCESS_BASIC_INFORMATION, PebBaseAddress),
            &(self.peb_base_address.0 as usize).to_ne_bytes(),
        );
        put(
            &mut bytes,
            offset_of!(_PROCESS_BASIC_INFORMATION, AffinityMask),
            &(self.affinity_mask as usize).to_ne_bytes(),
        );
        put(
            &mut bytes,
            offset_of!(_PROCESS_BASIC_INFORMATION, BasePriority),
            &self.base_priority.to_ne_bytes(),
        );
        put(
            &mut bytes,
            offset_of!(_PROCESS_BASIC_INFORMATION, UniqueProcessId),
            &(self.unique_process_id.0 as usize).to_ne_bytes(),
        );
        put(
            &mut bytes,
            offset_of!(_PROCESS_BASIC_INFORMATION, InheritedFromUniqueProcessId),
            &(self.inherited_from_unique_process_id.0 as usize).to_ne_bytes(),
        );
        bytes
    }
}
