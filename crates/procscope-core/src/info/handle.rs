use serde::{Deserialize, Serialize};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Handle, ProcessError};

#[repr(C)]
#[derive(Debug, Copy, Clone, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[allow(non_camel_case_types, non_snake_case, dead_code)]
struct _PROCESS_HANDLE_SNAPSHOT_INFORMATION {
    NumberOfHandles: usize,
    Reserved: usize,
    // Handles: [PROCESS_HANDLE_TABLE_ENTRY_INFO; NumberOfHandles],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[allow(non_camel_case_types, non_snake_case, dead_code)]
struct _PROCESS_HANDLE_TABLE_ENTRY_INFO {
    HandleValue: usize,
    HandleCount: usize,
    PointerCount: usize,
    GrantedAccess: u32,
    ObjectTypeIndex: u32,
    HandleAttributes: u32,
    Reserved: u32,
}

/// A handle held by the inspected process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleEntry {
    /// The handle value, valid in the inspected process only.
    pub handle: Handle,

    /// Number of handles referencing the object.
    pub handle_count: u64,

    /// Number of pointer references to the object.
    pub pointer_count: u64,

    /// Access mask granted to the handle.
    ///
    /// The meaning of the bits depends on the object type.
    pub granted_access: u32,

    /// Index of the object type in the kernel's object type table.
    pub object_type_index: u32,

    /// Handle attributes (`OBJ_INHERIT`, `OBJ_PROTECT_CLOSE`, ...).
    pub attributes: u32,
}

/// Decodes a `PROCESS_HANDLE_SNAPSHOT_INFORMATION` record.
///
/// The declared entry count is clamped to the entries actually present in
/// `bytes`.
pub(crate) fn decode_handle_snapshot(bytes: &[u8]) -> Result<Vec<HandleEntry>, ProcessError> {
    let (header, entries) = _PROCESS_HANDLE_SNAPSHOT_INFORMATION::read_from_prefix(bytes)
        .map_err(|_| ProcessError::CorruptedStruct("PROCESS_HANDLE_SNAPSHOT_INFORMATION"))?;

    let available = entries.len() / size_of::<_PROCESS_HANDLE_TABLE_ENTRY_INFO>();
    if header.NumberOfHandles > available {
        tracing::debug!(
            declared = header.NumberOfHandles,
            available,
            "truncated handle snapshot"
        );
    }

    let mut result = Vec::with_capacity(header.NumberOfHandles.min(available));
    for chunk in entries
        .chunks_exact(size_of::<_PROCESS_HANDLE_TABLE_ENTRY_INFO>())
        .take(header.NumberOfHandles)
    {
        let entry = _PROCESS_HANDLE_TABLE_ENTRY_INFO::read_from_bytes(chunk)
            .map_err(|_| ProcessError::CorruptedStruct("PROCESS_HANDLE_TABLE_ENTRY_INFO"))?;

        result.push(HandleEntry {
            handle: Handle(entry.HandleValue),
            handle_count: entry.HandleCount as u64,
            pointer_count: entry.PointerCount as u64,
            granted_access: entry.GrantedAccess,
            object_type_index: entry.ObjectTypeIndex,
            attributes: entry.HandleAttributes,
        });
    }

    Ok(result)
}

/// Encodes a snapshot into the host ABI layout.
#[cfg(test)]
pub(crate) fn encode_handle_snapshot(declared: usize, entries: &[HandleEntry]) -> Vec<u8> {
    let header = _PROCESS_HANDLE_SNAPSHOT_INFORMATION {
        NumberOfHandles: declared,
        Reserved: 0,
    };

    let mut bytes = header.as_bytes().to_vec();
    for entry in entries {
        let raw = _PROCESS_HANDLE_TABLE_ENTRY_INFO {
            HandleValue: entry.handle.0,
            HandleCount: entry.handle_count as usize,
            PointerCount: entry.pointer_count as usize,
            GrantedAccess: entry.granted_access,
            ObjectTypeIndex: entry.object_type_index,
            HandleAttributes: entry.attributes,
            Reserved: 0,
        };
        bytes.extend_from_slice(raw.as_bytes());
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(value: usize) -> HandleEntry {
        HandleEntry {
            handle: Handle(value),
            handle_count: 2,
            pointer_count: 32769,
            granted_access: 0x001F_0003,
            object_type_index: 16,
            attributes: 0,
        }
    }

    #[test]
    fn entry_layout_matches_host_abi() {
        #[cfg(target_pointer_width = "64")]
        assert_eq!(size_of::<_PROCESS_HANDLE_TABLE_ENTRY_INFO>(), 40);

        #[cfg(target_pointer_width = "32")]
        assert_eq!(size_of::<_PROCESS_HANDLE_TABLE_ENTRY_INFO>(), 28);
    }

    #[test]
    fn decode_snapshot() {
        let bytes = encode_handle_snapshot(2, &[entry(0x4), entry(0x8)]);
        let handles = decode_handle_snapshot(&bytes).unwrap();
        assert_eq!(handles, vec![entry(0x4), entry(0x8)]);
    }

    #[test]
    fn declared_count_is_clamped() {
        let bytes = encode_handle_snapshot(5, &[entry(0x4)]);
        let handles = decode_handle_snapshot(&bytes).unwrap();
        assert_eq!(handles, vec![entry(0x4)]);
    }

    #[test]
    fn empty_snapshot() {
        let bytes = encode_handle_snapshot(0, &[]);
        assert!(decode_handle_snapshot(&bytes).unwrap().is_empty());
    }

    #[test]
    fn missing_header_is_corrupted() {
        let err = decode_handle_snapshot(&[0u8; 3]).unwrap_err();
        assert!(matches!(err, ProcessError::CorruptedStruct(_)));
    }
}
