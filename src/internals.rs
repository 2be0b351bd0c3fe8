mod c;
mod helpers;

use self::helpers::Access;

use std::fs;
use std::io;
use std::os::windows::fs::MetadataExt;
use std::path::Path;

use crate::device::{FileAttributes, OpenMode, ReparseIo};

/// Reparse points on local NTFS volumes, through `DeviceIoControl`.
///
/// Each call opens its own handle, which is closed again before returning.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ntfs;

impl ReparseIo for Ntfs {
    fn attributes(&self, path: &Path) -> io::Result<FileAttributes> {
        // Does not follow the reparse point itself.
        let metadata = fs::symlink_metadata(path)?;
        Ok(FileAttributes(metadata.file_attributes()))
    }

    fn get_reparse_point(&self, path: &Path, mode: OpenMode, out: &mut [u8]) -> io::Result<usize> {
        let file = helpers::open_reparse_point(path, mode, Access::Read)?;
        helpers::get_reparse_point(&file, out)
    }

    fn set_reparse_point(&self, path: &Path, mode: OpenMode, data: &[u8]) -> io::Result<()> {
        let file = helpers::open_reparse_point(path, mode, Access::Write)?;
        helpers::set_reparse_point(&file, data)
    }

    fn delete_reparse_point(&self, path: &Path, mode: OpenMode, request: &[u8]) -> io::Result<()> {
        let file = helpers::open_reparse_point(path, mode, Access::Write)?;
        helpers::delete_reparse_point(&file, request)
    }
}
