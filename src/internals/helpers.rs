use super::c;

use std::fs::{File, OpenOptions};
use std::io;
use std::os::windows::fs::OpenOptionsExt;
use std::os::windows::io::AsRawHandle;
use std::path::Path;
use std::ptr;

use log::trace;

use crate::device::OpenMode;

/// Which side of the reparse point a handle is opened for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

pub fn open_reparse_point(reparse_point: &Path, mode: OpenMode, access: Access) -> io::Result<File> {
    let (access_mode, share_mode) = match access {
        Access::Read => (c::GENERIC_READ, c::FILE_SHARE_READ),
        Access::Write => (c::GENERIC_WRITE, c::FILE_SHARE_READ | c::FILE_SHARE_WRITE),
    };
    let flags = match mode {
        OpenMode::Leaf => c::FILE_FLAG_OPEN_REPARSE_POINT,
        OpenMode::Backup => c::FILE_FLAG_OPEN_REPARSE_POINT | c::FILE_FLAG_BACKUP_SEMANTICS,
    };
    let mut opts = OpenOptions::new();
    opts.access_mode(access_mode)
        .share_mode(share_mode)
        .custom_flags(flags);
    match opts.open(reparse_point) {
        #[cfg(feature = "unstable_admin")]
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            // Obtain privilege in case we don't have it yet
            log::debug!(
                "opening {} was denied, enabling {:?} privilege",
                reparse_point.display(),
                access
            );
            set_privilege(access)?;
            opts.open(reparse_point)
        }
        other => other,
    }
}

#[cfg(feature = "unstable_admin")]
fn set_privilege(access: Access) -> io::Result<()> {
    use std::mem;

    const ERROR_NOT_ALL_ASSIGNED: u32 = 1300;
    const TOKEN_PRIVILEGES_SIZE: u32 = mem::size_of::<c::TOKEN_PRIVILEGES>() as _;
    unsafe {
        let mut handle: c::HANDLE = 0;
        if c::OpenProcessToken(c::GetCurrentProcess(), c::TOKEN_ADJUST_PRIVILEGES, &mut handle) == 0 {
            return Err(io::Error::last_os_error());
        }
        let handle = scopeguard::guard(handle, |h| {
            c::CloseHandle(h);
        });
        let mut tp: c::TOKEN_PRIVILEGES = mem::zeroed();
        let name = match access {
            Access::Write => c::SE_RESTORE_NAME,
            Access::Read => c::SE_BACKUP_NAME,
        };
        if c::LookupPrivilegeValueW(ptr::null(), name, &mut tp.Privileges[0].Luid) == 0 {
            return Err(io::Error::last_os_error());
        }
        tp.PrivilegeCount = 1;
        tp.Privileges[0].Attributes = c::SE_PRIVILEGE_ENABLED;
        if c::AdjustTokenPrivileges(*handle, 0, &tp, TOKEN_PRIVILEGES_SIZE, ptr::null_mut(), ptr::null_mut()) == 0 {
            return Err(io::Error::last_os_error());
        }
        if c::GetLastError() == ERROR_NOT_ALL_ASSIGNED {
            return Err(io::Error::from_raw_os_error(ERROR_NOT_ALL_ASSIGNED as i32));
        }

        let handle = scopeguard::ScopeGuard::into_inner(handle);
        if c::CloseHandle(handle) == 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }
}

fn raw_handle(file: &File) -> c::HANDLE {
    file.as_raw_handle() as c::HANDLE
}

pub fn get_reparse_point(file: &File, out: &mut [u8]) -> io::Result<usize> {
    // Call DeviceIoControl to get the reparse point data
    let mut bytes_returned: u32 = 0;
    if unsafe {
        c::DeviceIoControl(
            raw_handle(file),
            c::FSCTL_GET_REPARSE_POINT,
            ptr::null(),
            0,
            out.as_mut_ptr().cast(),
            out.len().min(c::MAXIMUM_REPARSE_DATA_BUFFER_SIZE as usize) as u32,
            &mut bytes_returned,
            ptr::null_mut(),
        )
    } == 0
    {
        return Err(io::Error::last_os_error());
    }
    trace!("FSCTL_GET_REPARSE_POINT returned {} bytes", bytes_returned);
    Ok(bytes_returned as usize)
}

pub fn set_reparse_point(file: &File, data: &[u8]) -> io::Result<()> {
    let mut bytes_returned: u32 = 0;
    if unsafe {
        c::DeviceIoControl(
            raw_handle(file),
            c::FSCTL_SET_REPARSE_POINT,
            data.as_ptr().cast(),
            data.len() as u32,
            ptr::null_mut(),
            0,
            &mut bytes_returned,
            ptr::null_mut(),
        )
    } == 0
    {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

// See https://msdn.microsoft.com/en-us/library/windows/desktop/aa364560(v=vs.85).aspx
pub fn delete_reparse_point(file: &File, request: &[u8]) -> io::Result<()> {
    let mut bytes_returned: u32 = 0;
    if unsafe {
        c::DeviceIoControl(
            raw_handle(file),
            c::FSCTL_DELETE_REPARSE_POINT,
            request.as_ptr().cast(),
            request.len() as u32,
            ptr::null_mut(),
            0,
            &mut bytes_returned,
            ptr::null_mut(),
        )
    } == 0
    {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
