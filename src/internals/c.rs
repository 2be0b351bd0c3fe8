use std::alloc::Layout;
use std::mem::size_of;
use std::os::raw::{c_ulong, c_ushort};
use std::os::windows::io::RawHandle;

use windows_sys::core::GUID;
pub use windows_sys::Win32::Foundation::{
    CloseHandle, GetLastError, ERROR_NOT_A_REPARSE_POINT, GENERIC_READ, GENERIC_WRITE, HANDLE,
};
pub use windows_sys::Win32::Security::{
    AdjustTokenPrivileges, LookupPrivilegeValueW, SE_PRIVILEGE_ENABLED, TOKEN_ADJUST_PRIVILEGES, TOKEN_PRIVILEGES,
};
// See more in <https://learn.microsoft.com/en-us/windows/win32/secauthz/privilege-constants>.
pub use windows_sys::Win32::Security::{SE_BACKUP_NAME, SE_RESTORE_NAME};
pub use windows_sys::Win32::Storage::FileSystem::{
    FILE_ATTRIBUTE_DIRECTORY, FILE_ATTRIBUTE_REPARSE_POINT, FILE_FLAG_BACKUP_SEMANTICS, FILE_FLAG_OPEN_REPARSE_POINT,
    FILE_SHARE_READ, FILE_SHARE_WRITE, MAXIMUM_REPARSE_DATA_BUFFER_SIZE,
};
pub use windows_sys::Win32::System::Ioctl::{
    FSCTL_DELETE_REPARSE_POINT, FSCTL_GET_REPARSE_POINT, FSCTL_SET_REPARSE_POINT,
};
pub use windows_sys::Win32::System::SystemServices::{IO_REPARSE_TAG_MOUNT_POINT, IO_REPARSE_TAG_SYMLINK};
pub use windows_sys::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};
pub use windows_sys::Win32::System::IO::DeviceIoControl;

#[cfg(feature = "nightly")]
mod nightly;

use crate::buffer::{ReparseTag, DATA_HEADER_SIZE, HEADER_SIZE, MAX_BUFFER_SIZE};
use crate::device::FileAttributes;

// Makes sure layout of RawHandle and windows-sys's HANDLE are the same
// for pointer casts between them.
const _: () = {
    let std_layout = Layout::new::<RawHandle>();
    let win_sys_layout = Layout::new::<HANDLE>();
    assert!(std_layout.size() == win_sys_layout.size());
    assert!(std_layout.align() == win_sys_layout.align());
};

// The portable buffer model hardcodes the platform ABI.
const _: () = {
    assert!(MAXIMUM_REPARSE_DATA_BUFFER_SIZE as usize == MAX_BUFFER_SIZE);
    assert!(IO_REPARSE_TAG_SYMLINK == ReparseTag::SYMLINK.value());
    assert!(IO_REPARSE_TAG_MOUNT_POINT == ReparseTag::MOUNT_POINT.value());
    assert!(ERROR_NOT_A_REPARSE_POINT as i32 == crate::error::ERROR_NOT_A_REPARSE_POINT);
    assert!(FILE_ATTRIBUTE_DIRECTORY == FileAttributes::DIRECTORY);
    assert!(FILE_ATTRIBUTE_REPARSE_POINT == FileAttributes::REPARSE_POINT);

    let rdb_header_size = size_of::<c_ulong>() + size_of::<c_ushort>() * 2;
    assert!(rdb_header_size == DATA_HEADER_SIZE);

    let rgdb_header_size = size_of::<c_ulong>() + size_of::<c_ushort>() * 2 + size_of::<GUID>();
    assert!(rgdb_header_size == HEADER_SIZE);
};
