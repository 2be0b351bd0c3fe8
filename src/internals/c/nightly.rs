use std::mem::offset_of;

use windows_sys::Win32::Storage::FileSystem::REPARSE_GUID_DATA_BUFFER;

use crate::buffer::{DATA_HEADER_SIZE, HEADER_SIZE};

const _: () = {
    assert!(offset_of!(REPARSE_GUID_DATA_BUFFER, ReparseGuid) == DATA_HEADER_SIZE);
    assert!(offset_of!(REPARSE_GUID_DATA_BUFFER, GenericReparseBuffer) == HEADER_SIZE);
};
