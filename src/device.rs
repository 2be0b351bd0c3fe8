//! The seam between the reparse point logic and the filesystem.

use std::io;
use std::path::Path;

/// `GetFileAttributesW` bits consulted before touching a reparse point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FileAttributes(pub u32);

impl FileAttributes {
    /// `FILE_ATTRIBUTE_DIRECTORY`
    pub const DIRECTORY: u32 = 0x0000_0010;
    /// `FILE_ATTRIBUTE_REPARSE_POINT`
    pub const REPARSE_POINT: u32 = 0x0000_0400;

    pub fn is_directory(self) -> bool {
        self.0 & Self::DIRECTORY != 0
    }

    pub fn is_reparse_point(self) -> bool {
        self.0 & Self::REPARSE_POINT != 0
    }

    /// Directories can only be opened with backup semantics.
    pub fn open_mode(self) -> OpenMode {
        if self.is_directory() {
            OpenMode::Backup
        } else {
            OpenMode::Leaf
        }
    }
}

/// How a reparse point is opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenMode {
    /// `FILE_FLAG_OPEN_REPARSE_POINT` alone. Fails on directories.
    Leaf,
    /// `FILE_FLAG_OPEN_REPARSE_POINT | FILE_FLAG_BACKUP_SEMANTICS`.
    Backup,
}

/// Raw access to reparse point buffers.
///
/// Every method opens `path`, issues a single request and closes it again
/// before returning, whatever the outcome. Nothing is held between calls.
pub trait ReparseIo {
    fn attributes(&self, path: &Path) -> io::Result<FileAttributes>;

    /// Copies the current reparse buffer into `out`, returning the number of bytes written.
    fn get_reparse_point(&self, path: &Path, mode: OpenMode, out: &mut [u8]) -> io::Result<usize>;

    /// Installs `data` as the reparse buffer of `path`.
    fn set_reparse_point(&self, path: &Path, mode: OpenMode, data: &[u8]) -> io::Result<()>;

    /// Removes the reparse buffer matching the tag (and GUID) in the header-only `request`.
    fn delete_reparse_point(&self, path: &Path, mode: OpenMode, request: &[u8]) -> io::Result<()>;
}

impl<T: ReparseIo + ?Sized> ReparseIo for &T {
    fn attributes(&self, path: &Path) -> io::Result<FileAttributes> {
        (**self).attributes(path)
    }

    fn get_reparse_point(&self, path: &Path, mode: OpenMode, out: &mut [u8]) -> io::Result<usize> {
        (**self).get_reparse_point(path, mode, out)
    }

    fn set_reparse_point(&self, path: &Path, mode: OpenMode, data: &[u8]) -> io::Result<()> {
        (**self).set_reparse_point(path, mode, data)
    }

    fn delete_reparse_point(&self, path: &Path, mode: OpenMode, request: &[u8]) -> io::Result<()> {
        (**self).delete_reparse_point(path, mode, request)
    }
}
