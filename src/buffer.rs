//! Binary layout of reparse point buffers.
//!
//! Two layouts share the same leading fields:
//!
//! * `REPARSE_DATA_BUFFER`, used by Microsoft tags: tag, data length, reserved,
//!   then the tag specific payload.
//! * `REPARSE_GUID_DATA_BUFFER`, used by every other tag: the same eight bytes
//!   followed by a 16 byte GUID, then an opaque payload.
//!
//! All integers are little-endian.

use std::fmt;

use crate::error::{Error, Result};

/// Maximum size, in bytes, of a whole reparse buffer including its header.
pub const MAX_BUFFER_SIZE: usize = 16 * 1024;
/// Reparse GUID Data Buffer header size. This is also the size of a delete request.
pub const HEADER_SIZE: usize = 24;
/// Reparse Data Buffer header size
pub const DATA_HEADER_SIZE: usize = 8;
/// SymbolicLinkReparseBuffer header size
pub const SYMLINK_HEADER_SIZE: usize = 12;
/// MountPointReparseBuffer header size
pub const MOUNT_POINT_HEADER_SIZE: usize = 8;
/// The substitute name of a symbolic link is relative to the link's directory.
pub const SYMLINK_FLAG_RELATIVE: u32 = 1;
/// Print name prefix of a volume mount point. Directory junctions share the
/// mount point tag but point anywhere else.
pub const VOLUME_PREFIX: [u16; 10] = utf16s!(br"\??\Volume");

const WCHAR_SIZE: usize = std::mem::size_of::<u16>();
const UNICODE_NULL: [u8; WCHAR_SIZE] = [0; WCHAR_SIZE];

/// A reparse tag, identifying the owner and meaning of a reparse point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReparseTag(u32);

impl ReparseTag {
    /// `IO_REPARSE_TAG_SYMLINK`
    pub const SYMLINK: ReparseTag = ReparseTag(0xA000_000C);
    /// `IO_REPARSE_TAG_MOUNT_POINT`, shared by junctions and volume mount points.
    pub const MOUNT_POINT: ReparseTag = ReparseTag(0xA000_0003);

    pub const fn new(value: u32) -> Self {
        ReparseTag(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// Bit 31, set for tags owned by Microsoft.
    pub const fn is_microsoft(self) -> bool {
        self.0 & 0x8000_0000 != 0
    }

    /// Bit 29, set when the reparse point names another file or directory.
    pub const fn is_name_surrogate(self) -> bool {
        self.0 & 0x2000_0000 != 0
    }

    /// Only non-Microsoft tags carry a GUID on disk.
    pub const fn has_guid(self) -> bool {
        !self.is_microsoft()
    }

    /// Bytes preceding the payload in a buffer with this tag.
    pub const fn header_size(self) -> usize {
        if self.has_guid() {
            HEADER_SIZE
        } else {
            DATA_HEADER_SIZE
        }
    }
}

impl From<u32> for ReparseTag {
    fn from(value: u32) -> Self {
        ReparseTag(value)
    }
}

impl From<ReparseTag> for u32 {
    fn from(tag: ReparseTag) -> Self {
        tag.0
    }
}

impl fmt::Display for ReparseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// A 128-bit GUID in its Windows field layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Guid {
    pub const NIL: Guid = Guid::from_values(0, 0, 0, [0; 8]);

    pub const fn from_values(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Guid {
            data1,
            data2,
            data3,
            data4,
        }
    }

    pub fn from_le_bytes(bytes: [u8; 16]) -> Self {
        let mut data4 = [0u8; 8];
        data4.copy_from_slice(&bytes[8..]);
        Guid {
            data1: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            data2: u16::from_le_bytes([bytes[4], bytes[5]]),
            data3: u16::from_le_bytes([bytes[6], bytes[7]]),
            data4,
        }
    }

    pub fn to_le_bytes(&self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[..4].copy_from_slice(&self.data1.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.data2.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.data3.to_le_bytes());
        bytes[8..].copy_from_slice(&self.data4);
        bytes
    }

    pub fn is_nil(&self) -> bool {
        *self == Guid::NIL
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.data4;
        write!(
            f,
            "{{{:08X}-{:04X}-{:04X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}}}",
            self.data1, self.data2, self.data3, d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
        )
    }
}

/// Byte offset and byte length of a name inside a path buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NameSpan {
    pub offset: u16,
    pub length: u16,
}

impl NameSpan {
    pub const fn new(offset: u16, length: u16) -> Self {
        NameSpan { offset, length }
    }

    fn range(self) -> std::ops::Range<usize> {
        let start = usize::from(self.offset);
        start..start + usize::from(self.length)
    }

    fn check(self, path_buffer: &[u8]) -> Result<()> {
        if self.offset as usize % WCHAR_SIZE != 0 || self.length as usize % WCHAR_SIZE != 0 {
            return Err(Error::MalformedRecord("name span is not UTF-16 aligned"));
        }
        if self.range().end > path_buffer.len() {
            return Err(Error::MalformedRecord("name span exceeds the path buffer"));
        }
        Ok(())
    }
}

/// Substitute and print names sharing one path buffer.
///
/// Both spans are checked against the buffer on construction, so slicing a
/// name out of it never fails afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathNames {
    substitute: NameSpan,
    print: NameSpan,
    path_buffer: Vec<u8>,
}

impl PathNames {
    pub fn new(substitute: NameSpan, print: NameSpan, path_buffer: Vec<u8>) -> Result<Self> {
        substitute.check(&path_buffer)?;
        print.check(&path_buffer)?;
        Ok(PathNames {
            substitute,
            print,
            path_buffer,
        })
    }

    /// Lays out `substitute` then `print`, each followed by a `UNICODE_NULL`
    /// that the spans do not cover.
    pub fn from_names(substitute: &[u16], print: &[u16]) -> Result<Self> {
        let substitute_len = substitute.len() * WCHAR_SIZE;
        let print_len = print.len() * WCHAR_SIZE;
        let print_offset = substitute_len + WCHAR_SIZE;
        let total = print_offset + print_len + WCHAR_SIZE;
        if total > MAX_BUFFER_SIZE {
            return Err(Error::InvalidArgument("names do not fit in a reparse buffer"));
        }

        let mut path_buffer = Vec::with_capacity(total);
        substitute
            .iter()
            .for_each(|c| path_buffer.extend_from_slice(&c.to_le_bytes()));
        path_buffer.extend_from_slice(&UNICODE_NULL);
        print
            .iter()
            .for_each(|c| path_buffer.extend_from_slice(&c.to_le_bytes()));
        path_buffer.extend_from_slice(&UNICODE_NULL);

        // Lengths are below MAX_BUFFER_SIZE, which fits in u16.
        PathNames::new(
            NameSpan::new(0, substitute_len as u16),
            NameSpan::new(print_offset as u16, print_len as u16),
            path_buffer,
        )
    }

    fn decode(spans: &[u8], path_buffer: &[u8]) -> Result<Self> {
        PathNames::new(
            NameSpan::new(read_u16(spans, 0), read_u16(spans, 2)),
            NameSpan::new(read_u16(spans, 4), read_u16(spans, 6)),
            path_buffer.to_vec(),
        )
    }

    fn encode_spans(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.substitute.offset.to_le_bytes());
        out.extend_from_slice(&self.substitute.length.to_le_bytes());
        out.extend_from_slice(&self.print.offset.to_le_bytes());
        out.extend_from_slice(&self.print.length.to_le_bytes());
    }

    pub fn substitute_span(&self) -> NameSpan {
        self.substitute
    }

    pub fn print_span(&self) -> NameSpan {
        self.print
    }

    pub fn path_buffer(&self) -> &[u8] {
        &self.path_buffer
    }

    pub fn substitute_name(&self) -> Vec<u16> {
        self.name(self.substitute)
    }

    pub fn print_name(&self) -> Vec<u16> {
        self.name(self.print)
    }

    fn name(&self, span: NameSpan) -> Vec<u16> {
        self.path_buffer[span.range()]
            .chunks_exact(WCHAR_SIZE)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolicLinkPayload {
    names: PathNames,
    flags: u32,
}

impl SymbolicLinkPayload {
    pub fn new(names: PathNames, flags: u32) -> Self {
        SymbolicLinkPayload { names, flags }
    }

    pub fn names(&self) -> &PathNames {
        &self.names
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn is_relative(&self) -> bool {
        self.flags & SYMLINK_FLAG_RELATIVE != 0
    }

    fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < SYMLINK_HEADER_SIZE {
            return Err(Error::MalformedRecord(
                "symbolic link payload is shorter than its header",
            ));
        }
        let names = PathNames::decode(&data[..8], &data[SYMLINK_HEADER_SIZE..])?;
        Ok(SymbolicLinkPayload::new(names, read_u32(data, 8)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MountPointPayload {
    names: PathNames,
}

impl MountPointPayload {
    pub fn new(names: PathNames) -> Self {
        MountPointPayload { names }
    }

    pub fn names(&self) -> &PathNames {
        &self.names
    }

    fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < MOUNT_POINT_HEADER_SIZE {
            return Err(Error::MalformedRecord(
                "mount point payload is shorter than its header",
            ));
        }
        let names = PathNames::decode(&data[..8], &data[MOUNT_POINT_HEADER_SIZE..])?;
        Ok(MountPointPayload::new(names))
    }
}

/// Payload of any tag this crate does not interpret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericPayload {
    pub data: Vec<u8>,
}

/// The tag specific part of a reparse record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReparsePayload {
    SymbolicLink(SymbolicLinkPayload),
    MountPoint(MountPointPayload),
    Generic(GenericPayload),
}

impl ReparsePayload {
    /// Names of symbolic links and mount points, `None` for anything else.
    pub fn names(&self) -> Option<&PathNames> {
        match self {
            ReparsePayload::SymbolicLink(link) => Some(link.names()),
            ReparsePayload::MountPoint(mount) => Some(mount.names()),
            ReparsePayload::Generic(_) => None,
        }
    }

    fn len(&self) -> usize {
        match self {
            ReparsePayload::SymbolicLink(link) => SYMLINK_HEADER_SIZE + link.names.path_buffer.len(),
            ReparsePayload::MountPoint(mount) => {
                MOUNT_POINT_HEADER_SIZE + mount.names.path_buffer.len()
            }
            ReparsePayload::Generic(generic) => generic.data.len(),
        }
    }
}

/// Fixed fields at the start of every reparse buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordHeader {
    pub tag: ReparseTag,
    pub data_length: u16,
    pub guid: Option<Guid>,
}

impl RecordHeader {
    /// Decodes the header and checks that the declared payload fits in `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < DATA_HEADER_SIZE {
            return Err(Error::MalformedRecord("buffer is shorter than a reparse header"));
        }
        if bytes.len() > MAX_BUFFER_SIZE {
            return Err(Error::MalformedRecord(
                "buffer exceeds the maximum reparse buffer size",
            ));
        }
        let tag = ReparseTag(read_u32(bytes, 0));
        let data_length = read_u16(bytes, 4);
        let header_size = tag.header_size();
        if bytes.len() < header_size {
            return Err(Error::MalformedRecord("buffer is shorter than a GUID header"));
        }
        if header_size + usize::from(data_length) > bytes.len() {
            return Err(Error::MalformedRecord("declared data length exceeds the buffer"));
        }
        let guid = if tag.has_guid() {
            let mut raw = [0u8; 16];
            raw.copy_from_slice(&bytes[DATA_HEADER_SIZE..HEADER_SIZE]);
            Some(Guid::from_le_bytes(raw))
        } else {
            None
        };
        Ok(RecordHeader {
            tag,
            data_length,
            guid,
        })
    }
}

/// A decoded reparse point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReparseRecord {
    tag: ReparseTag,
    guid: Option<Guid>,
    payload: ReparsePayload,
}

impl ReparseRecord {
    /// A symbolic link record. Set [`SYMLINK_FLAG_RELATIVE`] in `flags` for
    /// relative targets.
    pub fn symbolic_link(substitute: &[u16], print: &[u16], flags: u32) -> Result<Self> {
        let names = PathNames::from_names(substitute, print)?;
        ReparseRecord::with_payload(
            ReparseTag::SYMLINK,
            None,
            ReparsePayload::SymbolicLink(SymbolicLinkPayload::new(names, flags)),
        )
    }

    /// A junction or volume mount point record.
    pub fn mount_point(substitute: &[u16], print: &[u16]) -> Result<Self> {
        let names = PathNames::from_names(substitute, print)?;
        ReparseRecord::with_payload(
            ReparseTag::MOUNT_POINT,
            None,
            ReparsePayload::MountPoint(MountPointPayload::new(names)),
        )
    }

    /// A record with an opaque payload. `guid` is dropped for Microsoft tags,
    /// whose layout has no room for it.
    ///
    /// Symbolic links and mount points have a structured payload and must be
    /// built with [`ReparseRecord::symbolic_link`] or [`ReparseRecord::mount_point`].
    /// Other Microsoft tags are accepted as opaque.
    pub fn custom(tag: ReparseTag, guid: Guid, payload: &[u8]) -> Result<Self> {
        if tag == ReparseTag::SYMLINK || tag == ReparseTag::MOUNT_POINT {
            return Err(Error::InvalidArgument(
                "symbolic link and mount point records need their structured constructors",
            ));
        }
        if payload.is_empty() {
            return Err(Error::InvalidArgument("reparse payload is empty"));
        }
        ReparseRecord::with_payload(
            tag,
            Some(guid),
            ReparsePayload::Generic(GenericPayload {
                data: payload.to_vec(),
            }),
        )
    }

    fn with_payload(tag: ReparseTag, guid: Option<Guid>, payload: ReparsePayload) -> Result<Self> {
        if payload.len() > MAX_BUFFER_SIZE - tag.header_size() {
            return Err(Error::InvalidArgument(
                "reparse payload exceeds the maximum reparse buffer size",
            ));
        }
        let guid = if tag.has_guid() {
            Some(guid.unwrap_or_default())
        } else {
            None
        };
        Ok(ReparseRecord { tag, guid, payload })
    }

    pub fn tag(&self) -> ReparseTag {
        self.tag
    }

    /// `None` for Microsoft tags.
    pub fn guid(&self) -> Option<Guid> {
        self.guid
    }

    pub fn payload(&self) -> &ReparsePayload {
        &self.payload
    }

    pub fn data_length(&self) -> u16 {
        // Bounded by MAX_BUFFER_SIZE in every constructor.
        self.payload.len() as u16
    }

    /// Decodes a buffer as returned by `FSCTL_GET_REPARSE_POINT`.
    ///
    /// Bytes past the declared data length are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let header = RecordHeader::decode(bytes)?;
        let start = header.tag.header_size();
        let data = &bytes[start..start + usize::from(header.data_length)];
        let payload = match header.tag {
            ReparseTag::SYMLINK => ReparsePayload::SymbolicLink(SymbolicLinkPayload::decode(data)?),
            ReparseTag::MOUNT_POINT => ReparsePayload::MountPoint(MountPointPayload::decode(data)?),
            _ => ReparsePayload::Generic(GenericPayload {
                data: data.to_vec(),
            }),
        };
        Ok(ReparseRecord {
            tag: header.tag,
            guid: header.guid,
            payload,
        })
    }

    /// Encodes the record in the layout `FSCTL_SET_REPARSE_POINT` expects.
    pub fn encode(&self) -> Vec<u8> {
        let data_length = self.data_length();
        let mut out = Vec::with_capacity(self.tag.header_size() + usize::from(data_length));
        out.extend_from_slice(&self.tag.0.to_le_bytes());
        out.extend_from_slice(&data_length.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        if let Some(guid) = self.guid {
            out.extend_from_slice(&guid.to_le_bytes());
        }
        match &self.payload {
            ReparsePayload::SymbolicLink(link) => {
                link.names.encode_spans(&mut out);
                out.extend_from_slice(&link.flags.to_le_bytes());
                out.extend_from_slice(&link.names.path_buffer);
            }
            ReparsePayload::MountPoint(mount) => {
                mount.names.encode_spans(&mut out);
                out.extend_from_slice(&mount.names.path_buffer);
            }
            ReparsePayload::Generic(generic) => out.extend_from_slice(&generic.data),
        }
        out
    }
}

/// Builds the header-only buffer `FSCTL_DELETE_REPARSE_POINT` expects.
pub fn delete_request(tag: ReparseTag, guid: Option<Guid>) -> [u8; HEADER_SIZE] {
    let mut request = [0u8; HEADER_SIZE];
    request[..4].copy_from_slice(&tag.0.to_le_bytes());
    if let Some(guid) = guid {
        request[DATA_HEADER_SIZE..].copy_from_slice(&guid.to_le_bytes());
    }
    request
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    fn symlink_bytes(spans: [u16; 4], flags: u32, path_buffer: &[u8]) -> Vec<u8> {
        let data_length = (SYMLINK_HEADER_SIZE + path_buffer.len()) as u16;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&ReparseTag::SYMLINK.value().to_le_bytes());
        bytes.extend_from_slice(&data_length.to_le_bytes());
        bytes.extend_from_slice(&[0, 0]);
        for v in spans.iter() {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.extend_from_slice(&flags.to_le_bytes());
        bytes.extend_from_slice(path_buffer);
        bytes
    }

    #[test]
    fn tag_bits() {
        assert!(ReparseTag::SYMLINK.is_microsoft());
        assert!(ReparseTag::SYMLINK.is_name_surrogate());
        assert!(ReparseTag::MOUNT_POINT.is_name_surrogate());
        assert_eq!(ReparseTag::MOUNT_POINT.header_size(), DATA_HEADER_SIZE);

        let custom = ReparseTag::new(0x0000_1234);
        assert!(!custom.is_microsoft());
        assert!(custom.has_guid());
        assert_eq!(custom.header_size(), HEADER_SIZE);
        assert_eq!(custom.to_string(), "0x00001234");
    }

    #[test]
    fn guid_layout_and_display() {
        let guid = Guid::from_values(0x1122_3344, 0x5566, 0x7788, [1, 2, 3, 4, 5, 6, 7, 8]);
        let bytes = guid.to_le_bytes();
        assert_eq!(&bytes[..8], &[0x44, 0x33, 0x22, 0x11, 0x66, 0x55, 0x88, 0x77]);
        assert_eq!(Guid::from_le_bytes(bytes), guid);
        assert_eq!(guid.to_string(), "{11223344-5566-7788-0102-030405060708}");
        assert!(Guid::NIL.is_nil());
    }

    #[test]
    fn volume_prefix_is_ten_units() {
        assert_eq!(VOLUME_PREFIX.len(), 10);
        assert_eq!(&VOLUME_PREFIX[..], &wide(r"\??\Volume")[..]);
    }

    #[test]
    fn decode_symbolic_link() {
        // print name first, substitute name second, no terminators
        let mut path_buffer = Vec::new();
        for c in wide(r"..\t").iter().chain(wide(r"..\target").iter()) {
            path_buffer.extend_from_slice(&c.to_le_bytes());
        }
        let bytes = symlink_bytes([8, 18, 0, 8], SYMLINK_FLAG_RELATIVE, &path_buffer);

        let record = ReparseRecord::decode(&bytes).unwrap();
        assert_eq!(record.tag(), ReparseTag::SYMLINK);
        assert_eq!(record.guid(), None);
        assert_eq!(usize::from(record.data_length()), bytes.len() - DATA_HEADER_SIZE);
        match record.payload() {
            ReparsePayload::SymbolicLink(link) => {
                assert!(link.is_relative());
                assert_eq!(link.names().substitute_name(), wide(r"..\target"));
                assert_eq!(link.names().print_name(), wide(r"..\t"));
            }
            other => panic!("unexpected payload {:?}", other),
        }
        assert_eq!(record.encode(), bytes);
    }

    #[test]
    fn decode_rejects_spans_outside_path_buffer() {
        // overlapping names are fine
        let bytes = symlink_bytes([0, 4, 2, 2], 0, &[0x41, 0, 0x42, 0]);
        assert!(ReparseRecord::decode(&bytes).is_ok());

        let bytes = symlink_bytes([0, 4, 2, 4], 0, &[0x41, 0, 0x42, 0]);
        match ReparseRecord::decode(&bytes) {
            Err(Error::MalformedRecord(_)) => {}
            other => panic!("span past the end must be malformed, got {:?}", other),
        }
    }

    #[test]
    fn decode_rejects_odd_spans() {
        let bytes = symlink_bytes([1, 2, 0, 2], 0, &[0x41, 0, 0x42, 0]);
        assert!(matches!(
            ReparseRecord::decode(&bytes),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn decode_rejects_truncated_buffers() {
        assert!(matches!(
            ReparseRecord::decode(&[0x0C, 0, 0, 0xA0]),
            Err(Error::MalformedRecord(_))
        ));

        // declared data length runs past the buffer
        let mut bytes = symlink_bytes([0, 0, 0, 0], 0, &[]);
        bytes[4] = 40;
        assert!(matches!(
            ReparseRecord::decode(&bytes),
            Err(Error::MalformedRecord(_))
        ));

        // symlink payload too short for the flags field
        let mut bytes = symlink_bytes([0, 0, 0, 0], 0, &[]);
        bytes.truncate(DATA_HEADER_SIZE + 8);
        bytes[4] = 8;
        assert!(matches!(
            ReparseRecord::decode(&bytes),
            Err(Error::MalformedRecord(_))
        ));

        // custom tag without room for its GUID
        let mut bytes = vec![0u8; 16];
        bytes[..4].copy_from_slice(&0x1234u32.to_le_bytes());
        assert!(matches!(
            ReparseRecord::decode(&bytes),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn decode_ignores_trailing_bytes() {
        let record = ReparseRecord::mount_point(&wide(r"\??\C:\real"), &wide(r"C:\real")).unwrap();
        let mut bytes = record.encode();
        bytes.resize(MAX_BUFFER_SIZE, 0xAA);
        assert_eq!(ReparseRecord::decode(&bytes).unwrap(), record);
    }

    #[test]
    fn custom_record_layout() {
        let guid = Guid::from_values(1, 2, 3, [4; 8]);
        let tag = ReparseTag::new(0x0000_BEEF);
        let record = ReparseRecord::custom(tag, guid, b"payload").unwrap();
        let bytes = record.encode();
        assert_eq!(bytes.len(), HEADER_SIZE + 7);
        assert_eq!(&bytes[4..6], &7u16.to_le_bytes());
        assert_eq!(&bytes[8..24], &guid.to_le_bytes());
        assert_eq!(&bytes[24..], b"payload");

        let decoded = ReparseRecord::decode(&bytes).unwrap();
        assert_eq!(decoded.guid(), Some(guid));
        assert_eq!(decoded, record);
    }

    #[test]
    fn custom_record_size_limits() {
        let tag = ReparseTag::new(0x0000_BEEF);
        assert!(matches!(
            ReparseRecord::custom(tag, Guid::NIL, &[]),
            Err(Error::InvalidArgument(_))
        ));
        let largest = vec![7u8; MAX_BUFFER_SIZE - HEADER_SIZE];
        assert_eq!(
            ReparseRecord::custom(tag, Guid::NIL, &largest).unwrap().encode().len(),
            MAX_BUFFER_SIZE
        );
        let too_large = vec![7u8; MAX_BUFFER_SIZE - HEADER_SIZE + 1];
        assert!(matches!(
            ReparseRecord::custom(tag, Guid::NIL, &too_large),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn microsoft_custom_record_drops_guid() {
        let guid = Guid::from_values(9, 9, 9, [9; 8]);
        let record = ReparseRecord::custom(ReparseTag::new(0x8000_0017), guid, &[1, 2]).unwrap();
        assert_eq!(record.guid(), None);
        assert_eq!(record.encode().len(), DATA_HEADER_SIZE + 2);
    }

    #[test]
    fn custom_record_rejects_name_surrogate_tags() {
        for tag in [ReparseTag::SYMLINK, ReparseTag::MOUNT_POINT] {
            assert!(matches!(
                ReparseRecord::custom(tag, Guid::NIL, &[1, 2, 3, 4]),
                Err(Error::InvalidArgument(_))
            ));
        }
        // Any other Microsoft tag still round-trips as an opaque payload.
        let record = ReparseRecord::custom(ReparseTag::new(0x8000_0017), Guid::NIL, &[1, 2, 3, 4]).unwrap();
        let decoded = ReparseRecord::decode(&record.encode()).unwrap();
        assert_eq!(decoded.tag(), ReparseTag::new(0x8000_0017));
        assert!(matches!(decoded.payload(), ReparsePayload::Generic(g) if g.data == [1, 2, 3, 4]));
    }

    #[test]
    fn name_constructors_terminate_names() {
        let record = ReparseRecord::mount_point(&wide(r"\??\C:\x"), &wide(r"C:\x")).unwrap();
        let names = record.payload().names().unwrap();
        assert_eq!(names.substitute_span(), NameSpan::new(0, 16));
        assert_eq!(names.print_span(), NameSpan::new(18, 8));
        assert_eq!(names.path_buffer().len(), 16 + 2 + 8 + 2);
        assert_eq!(&names.path_buffer()[16..18], &[0, 0]);
        assert_eq!(
            usize::from(record.data_length()),
            MOUNT_POINT_HEADER_SIZE + names.path_buffer().len()
        );
    }

    #[test]
    fn name_constructors_reject_oversized_names() {
        let long = vec![u16::from(b'a'); MAX_BUFFER_SIZE / 2];
        assert!(matches!(
            ReparseRecord::symbolic_link(&long, &[], 0),
            Err(Error::InvalidArgument(_))
        ));

        // two terminators share the path buffer with the substitute name
        let room = (MAX_BUFFER_SIZE - DATA_HEADER_SIZE - SYMLINK_HEADER_SIZE) / 2 - 2;
        let fits = vec![u16::from(b'a'); room];
        let record = ReparseRecord::symbolic_link(&fits, &[], 0).unwrap();
        assert_eq!(record.encode().len(), MAX_BUFFER_SIZE);
        let overflows = vec![u16::from(b'a'); room + 1];
        assert!(matches!(
            ReparseRecord::symbolic_link(&overflows, &[], 0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn delete_request_layout() {
        let guid = Guid::from_values(5, 6, 7, [8; 8]);
        let request = delete_request(ReparseTag::MOUNT_POINT, None);
        assert_eq!(&request[..4], &ReparseTag::MOUNT_POINT.value().to_le_bytes());
        assert!(request[4..].iter().all(|b| *b == 0));

        let request = delete_request(ReparseTag::new(0x1234), Some(guid));
        assert_eq!(&request[4..8], &[0, 0, 0, 0]);
        assert_eq!(&request[8..], &guid.to_le_bytes());
    }
}
