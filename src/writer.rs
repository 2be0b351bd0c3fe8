//! Installing and removing reparse points.

use std::path::Path;

use log::{debug, trace};

use crate::buffer::{self, Guid, ReparseRecord, ReparseTag};
use crate::device::ReparseIo;
use crate::error::Result;
use crate::reader;

/// Removes the reparse point of `path`, leaving the file or directory itself.
///
/// The request echoes the current tag. Third party reparse points may also
/// require their GUID, so a rejected request is sent once more with it.
pub fn delete<D: ReparseIo + ?Sized>(io: &D, path: &Path) -> Result<()> {
    let (attributes, header) = reader::fetch_header(io, path)?;
    let mode = attributes.open_mode();
    let request = buffer::delete_request(header.tag, None);
    trace!("deleting reparse tag {} from {}", header.tag, path.display());
    match io.delete_reparse_point(path, mode, &request) {
        Ok(()) => Ok(()),
        Err(e) => match header.guid {
            Some(guid) => {
                debug!(
                    "deleting reparse tag {} from {} failed ({}), retrying with GUID {}",
                    header.tag,
                    path.display(),
                    e,
                    guid
                );
                let request = buffer::delete_request(header.tag, Some(guid));
                io.delete_reparse_point(path, mode, &request)?;
                Ok(())
            }
            None => Err(e.into()),
        },
    }
}

/// Installs `record` as the reparse point of `path`, replacing any previous one.
pub fn set_record<D: ReparseIo + ?Sized>(io: &D, path: &Path, record: &ReparseRecord) -> Result<()> {
    let attributes = io.attributes(path)?;
    let data = record.encode();
    trace!(
        "setting reparse tag {} ({} bytes) on {}",
        record.tag(),
        data.len(),
        path.display()
    );
    io.set_reparse_point(path, attributes.open_mode(), &data)?;
    Ok(())
}

/// Installs an opaque `payload` under a third party `tag` and `guid`.
///
/// The payload is checked for size before `path` is touched.
pub fn create_custom<D: ReparseIo + ?Sized>(
    io: &D,
    path: &Path,
    tag: ReparseTag,
    guid: Guid,
    payload: &[u8],
) -> Result<()> {
    let record = ReparseRecord::custom(tag, guid, payload)?;
    set_record(io, path, &record)
}
