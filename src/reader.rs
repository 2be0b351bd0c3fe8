//! Fetching and slicing reparse buffers.

use std::path::Path;

use log::{trace, warn};

use crate::buffer::{Guid, PathNames, RecordHeader, ReparseRecord, ReparseTag};
use crate::device::{FileAttributes, ReparseIo};
use crate::error::{Error, Result};
use crate::scratch::ScratchBuffer;

/// Whether `path` carries the reparse point attribute. Missing paths do not.
pub fn exists<D: ReparseIo + ?Sized>(io: &D, path: &Path) -> bool {
    io.attributes(path)
        .map(FileAttributes::is_reparse_point)
        .unwrap_or(false)
}

/// Fetches and decodes the reparse point of `path`.
pub fn fetch_raw<D: ReparseIo + ?Sized>(io: &D, path: &Path) -> Result<ReparseRecord> {
    with_buffer(io, path, ReparseRecord::decode).map(|(_, record)| record)
}

pub fn tag_of<D: ReparseIo + ?Sized>(io: &D, path: &Path) -> Result<ReparseTag> {
    fetch_header(io, path).map(|(_, header)| header.tag)
}

/// The GUID of a third party reparse point, `None` for Microsoft tags.
pub fn guid_of<D: ReparseIo + ?Sized>(io: &D, path: &Path) -> Result<Option<Guid>> {
    fetch_header(io, path).map(|(_, header)| header.guid)
}

/// The print name of a symbolic link or mount point.
pub fn print_name<D: ReparseIo + ?Sized>(io: &D, path: &Path) -> Result<Vec<u16>> {
    let record = fetch_raw(io, path)?;
    Ok(names_of(&record)?.print_name())
}

/// The substitute name of a symbolic link or mount point.
pub fn substitute_name<D: ReparseIo + ?Sized>(io: &D, path: &Path) -> Result<Vec<u16>> {
    let record = fetch_raw(io, path)?;
    Ok(names_of(&record)?.substitute_name())
}

/// Copies the print name into `out` and returns its length in UTF-16 units.
///
/// `out` must hold the whole name, otherwise [`Error::BufferTooSmall`] reports
/// the size to retry with.
pub fn print_name_into<D: ReparseIo + ?Sized>(io: &D, path: &Path, out: &mut [u16]) -> Result<usize> {
    copy_name(&print_name(io, path)?, out)
}

/// Copies the substitute name into `out` and returns its length in UTF-16 units.
pub fn substitute_name_into<D: ReparseIo + ?Sized>(
    io: &D,
    path: &Path,
    out: &mut [u16],
) -> Result<usize> {
    copy_name(&substitute_name(io, path)?, out)
}

/// Only the fixed header is decoded, so a record with a corrupt payload can
/// still be identified and removed.
pub(crate) fn fetch_header<D: ReparseIo + ?Sized>(
    io: &D,
    path: &Path,
) -> Result<(FileAttributes, RecordHeader)> {
    with_buffer(io, path, RecordHeader::decode)
}

fn with_buffer<D, F, T>(io: &D, path: &Path, decode: F) -> Result<(FileAttributes, T)>
where
    D: ReparseIo + ?Sized,
    F: FnOnce(&[u8]) -> Result<T>,
{
    let attributes = io.attributes(path)?;
    if !attributes.is_reparse_point() {
        return Err(Error::NotAReparsePoint);
    }
    let mut scratch = ScratchBuffer::new();
    let len = io.get_reparse_point(path, attributes.open_mode(), scratch.as_mut_slice())?;
    trace!("read {} reparse bytes from {}", len, path.display());
    let value = decode(scratch.filled(len)?).map_err(|e| {
        warn!("reparse point of {} does not decode: {}", path.display(), e);
        e
    })?;
    Ok((attributes, value))
}

fn names_of(record: &ReparseRecord) -> Result<&PathNames> {
    record
        .payload()
        .names()
        .ok_or(Error::Unsupported(record.tag()))
}

fn copy_name(name: &[u16], out: &mut [u16]) -> Result<usize> {
    if out.len() < name.len() {
        return Err(Error::BufferTooSmall {
            needed: name.len(),
            capacity: out.len(),
        });
    }
    out[..name.len()].copy_from_slice(name);
    Ok(name.len())
}
