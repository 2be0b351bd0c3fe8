//! Predicates over reparse points.
//!
//! These never fail: any error while reading the reparse point, including a
//! malformed record, answers `false`.

use std::path::Path;

use crate::buffer::{ReparsePayload, ReparseTag, VOLUME_PREFIX};
use crate::device::ReparseIo;
use crate::reader;

pub fn is_symbolic_link<D: ReparseIo + ?Sized>(io: &D, path: &Path) -> bool {
    matches!(reader::tag_of(io, path), Ok(ReparseTag::SYMLINK))
}

/// Whether `path` is a symbolic link whose target is relative to its directory.
pub fn is_relative_symbolic_link<D: ReparseIo + ?Sized>(io: &D, path: &Path) -> bool {
    match reader::fetch_raw(io, path) {
        Ok(record) => match record.payload() {
            ReparsePayload::SymbolicLink(link) => link.is_relative(),
            _ => false,
        },
        Err(_) => false,
    }
}

/// A directory junction: a mount point whose print name is not a volume.
pub fn is_junction_point<D: ReparseIo + ?Sized>(io: &D, path: &Path) -> bool {
    mount_target(io, path) == Some(MountTarget::Directory)
}

/// A volume mount point: a mount point whose print name is a volume.
pub fn is_mount_point<D: ReparseIo + ?Sized>(io: &D, path: &Path) -> bool {
    mount_target(io, path) == Some(MountTarget::Volume)
}

#[derive(Debug, PartialEq, Eq)]
enum MountTarget {
    Volume,
    Directory,
}

fn mount_target<D: ReparseIo + ?Sized>(io: &D, path: &Path) -> Option<MountTarget> {
    let record = reader::fetch_raw(io, path).ok()?;
    match record.payload() {
        ReparsePayload::MountPoint(mount) => {
            if mount.names().print_name().starts_with(&VOLUME_PREFIX) {
                Some(MountTarget::Volume)
            } else {
                Some(MountTarget::Directory)
            }
        }
        _ => None,
    }
}
