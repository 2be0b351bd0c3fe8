//! Library for working with NTFS reparse points.
//!
//! Reparse points are the filesystem records behind symbolic links, directory
//! junctions and volume mount points. This crate decodes and encodes their
//! binary layout, tells the kinds apart, and installs or removes them.
//!
//! The reparse point logic is portable and works through the [`ReparseIo`]
//! trait. On Windows, [`Ntfs`] implements it with `DeviceIoControl` and the
//! free functions at the crate root use it directly.
#![deny(rust_2018_idioms)]

#[macro_use]
mod utf16;

mod buffer;
pub mod classify;
mod device;
mod error;
#[cfg(windows)]
mod internals;
pub mod reader;
mod scratch;
pub mod writer;


pub use crate::buffer::{
    delete_request, GenericPayload, Guid, MountPointPayload, NameSpan, PathNames, RecordHeader, ReparsePayload,
    ReparseRecord, ReparseTag, SymbolicLinkPayload, DATA_HEADER_SIZE, HEADER_SIZE, MAX_BUFFER_SIZE,
    MOUNT_POINT_HEADER_SIZE, SYMLINK_FLAG_RELATIVE, SYMLINK_HEADER_SIZE, VOLUME_PREFIX,
};
pub use crate::device::{FileAttributes, OpenMode, ReparseIo};
pub use crate::error::{Error, Result};
#[cfg(windows)]
pub use crate::internals::Ntfs;

#[cfg(windows)]
use std::{ffi::OsString, os::windows::ffi::OsStringExt, path::Path};

/// Determines whether the specified path carries a reparse point.
///
/// Returns `false` for paths that do not exist.
#[cfg(windows)]
pub fn exists<P: AsRef<Path>>(path: P) -> bool {
    reader::exists(&Ntfs, path.as_ref())
}

/// Reads and decodes the reparse point of the specified path.
///
/// # Example
///
/// ```rust,no_run
/// # use reparse::{fetch_raw, ReparseTag};
/// fn main() -> reparse::Result<()> {
///     let record = fetch_raw(r"C:\Users\Default User")?;
///     assert_eq!(record.tag(), ReparseTag::MOUNT_POINT);
///     Ok(())
/// }
/// ```
#[cfg(windows)]
pub fn fetch_raw<P: AsRef<Path>>(path: P) -> Result<ReparseRecord> {
    reader::fetch_raw(&Ntfs, path.as_ref())
}

/// Gets the reparse tag of the specified path.
#[cfg(windows)]
pub fn tag_of<P: AsRef<Path>>(path: P) -> Result<ReparseTag> {
    reader::tag_of(&Ntfs, path.as_ref())
}

/// Gets the GUID of a third party reparse point, `None` for Microsoft tags.
#[cfg(windows)]
pub fn guid_of<P: AsRef<Path>>(path: P) -> Result<Option<Guid>> {
    reader::guid_of(&Ntfs, path.as_ref())
}

/// Gets the print name of a symbolic link, junction or mount point.
///
/// # Example
///
/// ```rust,no_run
/// # use reparse::print_name;
/// fn main() -> reparse::Result<()> {
///     assert_eq!(print_name(r"C:\Users\Default User")?, r"C:\Users\Default");
///     Ok(())
/// }
/// ```
#[cfg(windows)]
pub fn print_name<P: AsRef<Path>>(path: P) -> Result<OsString> {
    reader::print_name(&Ntfs, path.as_ref()).map(|wide| OsString::from_wide(&wide))
}

/// Gets the substitute name of a symbolic link, junction or mount point.
#[cfg(windows)]
pub fn substitute_name<P: AsRef<Path>>(path: P) -> Result<OsString> {
    reader::substitute_name(&Ntfs, path.as_ref()).map(|wide| OsString::from_wide(&wide))
}

/// Determines whether the specified path is a symbolic link.
#[cfg(windows)]
pub fn is_symbolic_link<P: AsRef<Path>>(path: P) -> bool {
    classify::is_symbolic_link(&Ntfs, path.as_ref())
}

/// Determines whether the specified path is a symbolic link to a relative target.
#[cfg(windows)]
pub fn is_relative_symbolic_link<P: AsRef<Path>>(path: P) -> bool {
    classify::is_relative_symbolic_link(&Ntfs, path.as_ref())
}

/// Determines whether the specified path is a directory junction.
///
/// # Example
///
/// ```rust,no_run
/// # use reparse::is_junction_point;
/// assert!(is_junction_point(r"C:\Users\Default User"));
/// ```
#[cfg(windows)]
pub fn is_junction_point<P: AsRef<Path>>(path: P) -> bool {
    classify::is_junction_point(&Ntfs, path.as_ref())
}

/// Determines whether the specified path is a volume mount point.
#[cfg(windows)]
pub fn is_mount_point<P: AsRef<Path>>(path: P) -> bool {
    classify::is_mount_point(&Ntfs, path.as_ref())
}

/// Deletes the reparse point from the specified file or directory.
///
/// N.B. Only works on NTFS.
///
/// This function does not delete the file or directory.
///
/// # Example
///
/// ```rust,no_run
/// # use reparse::{delete, Error};
/// fn main() -> reparse::Result<()> {
///     match delete(r"C:\mnt\link") {
///         Ok(()) | Err(Error::NotAReparsePoint) => Ok(()),
///         Err(e) => Err(e),
///     }
/// }
/// ```
#[cfg(windows)]
pub fn delete<P: AsRef<Path>>(path: P) -> Result<()> {
    writer::delete(&Ntfs, path.as_ref())
}

/// Installs `record` on an existing file or directory.
#[cfg(windows)]
pub fn set_record<P: AsRef<Path>>(path: P, record: &ReparseRecord) -> Result<()> {
    writer::set_record(&Ntfs, path.as_ref(), record)
}

/// Creates a third party reparse point with an opaque payload.
///
/// # Example
///
/// ```rust,no_run
/// # use reparse::{create_custom, Guid, ReparseTag};
/// fn main() -> reparse::Result<()> {
///     let guid = Guid::from_values(0x6c9b_0f3e, 0x1a2b, 0x4c5d, [0x8e, 0x9f, 0, 1, 2, 3, 4, 5]);
///     create_custom(r"C:\data\file", ReparseTag::new(0x0000_7001), guid, b"payload")
/// }
/// ```
#[cfg(windows)]
pub fn create_custom<P: AsRef<Path>>(path: P, tag: ReparseTag, guid: Guid, payload: &[u8]) -> Result<()> {
    writer::create_custom(&Ntfs, path.as_ref(), tag, guid, payload)
}
