//! # MacBinary header detection
//!
//! MacPaint files copied off a Macintosh frequently carry a 128-byte MacBinary
//! header in front of the data fork. Files that went through a tool which
//! stripped it start directly with the [`DATA_MARKER`].
//!
//! The header layout is described once, in [`HEADER_FIELDS`], and every field
//! is read through that table.

use core::fmt;
use core::ops::{Deref, Range};
use std::io::{self, Read};

use bitflags::bitflags;
use bstr::{BStr, BString, ByteSlice};
use log::debug;

use crate::error::DecodeError;

type Result<T> = core::result::Result<T, DecodeError>;

/// Size of a MacBinary header in bytes.
pub const HEADER_LEN: usize = 128;

/// The four bytes that precede the pattern table of a header-less file.
pub const DATA_MARKER: [u8; 4] = [0x00, 0x00, 0x00, 0x02];

/// Longest file name a MacBinary header can carry.
pub const MAX_FILE_NAME_LEN: usize = 63;

/// A four character code, as used for Macintosh file types and creators
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileTag(pub [u8; 4]);

impl FileTag {
    /// `PNTG` - MacPaint document
    pub const PNTG: FileTag = FileTag(*b"PNTG");
    /// `MPNT` - MacPaint application
    pub const MPNT: FileTag = FileTag(*b"MPNT");

    /// Create a new tag
    pub const fn new(buf: [u8; 4]) -> Self {
        Self(buf)
    }

    /// Return this tag as a slice of bytes
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Return this tag as a [`bstr::BStr`]
    pub fn as_bstr(&self) -> &BStr {
        self.0.as_bstr()
    }
}

impl fmt::Debug for FileTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.as_bstr(), f)
    }
}

impl fmt::Display for FileTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_bstr(), f)
    }
}

impl Deref for FileTag {
    type Target = [u8; 4];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

bitflags! {
    /// Finder attribute byte stored at offset 73
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct FileFlags: u8 {
        const INITED = 1 << 0;
        const CHANGED = 1 << 1;
        const BUSY = 1 << 2;
        const BOZO = 1 << 3;
        const SYSTEM = 1 << 4;
        const BUNDLE = 1 << 5;
        const INVISIBLE = 1 << 6;
        const LOCKED = 1 << 7;
    }
}

/// How the bytes of a [`Field`] are decoded
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Single unsigned byte
    Byte,
    /// Single byte, `1` means set
    Flag,
    /// Big-endian `u16`
    U16,
    /// Big-endian `u32`
    U32,
    /// Four character code
    Tag,
    /// Raw bytes of a fixed capacity
    Bytes(usize),
}

impl FieldKind {
    /// Number of bytes the field occupies in the header
    pub const fn size(self) -> usize {
        match self {
            FieldKind::Byte | FieldKind::Flag => 1,
            FieldKind::U16 => 2,
            FieldKind::U32 | FieldKind::Tag => 4,
            FieldKind::Bytes(len) => len,
        }
    }
}

/// One entry of the MacBinary header layout
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub kind: FieldKind,
}

impl Field {
    const fn new(name: &'static str, offset: usize, kind: FieldKind) -> Self {
        Self { name, offset, kind }
    }

    /// Byte range of this field within the header
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.kind.size()
    }
}

/// Named entries of [`HEADER_FIELDS`]
pub mod fields {
    use super::{Field, FieldKind::*, MAX_FILE_NAME_LEN};

    pub const VERSION: Field = Field::new("version", 0, Byte);
    pub const FILE_NAME_LEN: Field = Field::new("file_name_len", 1, Byte);
    pub const FILE_NAME: Field = Field::new("file_name", 2, Bytes(MAX_FILE_NAME_LEN));
    pub const FILE_TYPE: Field = Field::new("file_type", 65, Tag);
    pub const FILE_CREATOR: Field = Field::new("file_creator", 69, Tag);
    pub const FILE_FLAGS: Field = Field::new("file_flags", 73, Byte);
    pub const FILE_VERT_POS: Field = Field::new("file_vert_pos", 75, U16);
    pub const FILE_HORZ_POS: Field = Field::new("file_horz_pos", 77, U16);
    pub const WINDOW_ID: Field = Field::new("window_id", 79, U16);
    pub const PROTECTED: Field = Field::new("protected", 81, Flag);
    pub const SIZE_OF_DATA_FORK: Field = Field::new("size_of_data_fork", 83, U32);
    pub const SIZE_OF_RESOURCE_FORK: Field = Field::new("size_of_resource_fork", 87, U32);
    pub const CREATION_STAMP: Field = Field::new("creation_stamp", 91, U32);
    pub const MODIFICATION_STAMP: Field = Field::new("modification_stamp", 95, U32);
    pub const GET_INFO_LENGTH: Field = Field::new("get_info_length", 99, U16);
    pub const FINDER_FLAGS: Field = Field::new("finder_flags", 101, U16);
    pub const UNPACKED_LENGTH: Field = Field::new("unpacked_length", 117, U32);
    pub const SECOND_HEAD_LENGTH: Field = Field::new("second_head_length", 121, U16);
    pub const UPLOAD_VERSION: Field = Field::new("upload_version", 123, Byte);
    pub const READ_VERSION: Field = Field::new("read_version", 124, Byte);
    pub const CRC_VALUE: Field = Field::new("crc_value", 125, U16);
}

/// The MacBinary header layout, ordered by offset.
///
/// Bytes not covered by an entry are reserved or unused by this format.
pub const HEADER_FIELDS: [Field; 21] = [
    fields::VERSION,
    fields::FILE_NAME_LEN,
    fields::FILE_NAME,
    fields::FILE_TYPE,
    fields::FILE_CREATOR,
    fields::FILE_FLAGS,
    fields::FILE_VERT_POS,
    fields::FILE_HORZ_POS,
    fields::WINDOW_ID,
    fields::PROTECTED,
    fields::SIZE_OF_DATA_FORK,
    fields::SIZE_OF_RESOURCE_FORK,
    fields::CREATION_STAMP,
    fields::MODIFICATION_STAMP,
    fields::GET_INFO_LENGTH,
    fields::FINDER_FLAGS,
    fields::UNPACKED_LENGTH,
    fields::SECOND_HEAD_LENGTH,
    fields::UPLOAD_VERSION,
    fields::READ_VERSION,
    fields::CRC_VALUE,
];

/// Typed view on a raw header buffer
struct RawHeader<'a>(&'a [u8; HEADER_LEN]);

impl RawHeader<'_> {
    fn bytes(&self, field: Field) -> &[u8] {
        &self.0[field.range()]
    }

    fn byte(&self, field: Field) -> u8 {
        debug_assert!(matches!(field.kind, FieldKind::Byte | FieldKind::Flag));
        self.0[field.offset]
    }

    fn flag(&self, field: Field) -> bool {
        debug_assert_eq!(field.kind, FieldKind::Flag);
        self.byte(field) == 1
    }

    /// The four bytes of a `U32` or `Tag` field
    fn quad(&self, field: Field) -> [u8; 4] {
        debug_assert_eq!(field.kind.size(), 4);
        let o = field.offset;
        [self.0[o], self.0[o + 1], self.0[o + 2], self.0[o + 3]]
    }

    fn u16(&self, field: Field) -> u16 {
        debug_assert_eq!(field.kind, FieldKind::U16);
        let o = field.offset;
        u16::from_be_bytes([self.0[o], self.0[o + 1]])
    }

    fn u32(&self, field: Field) -> u32 {
        debug_assert_eq!(field.kind, FieldKind::U32);
        u32::from_be_bytes(self.quad(field))
    }

    fn tag(&self, field: Field) -> FileTag {
        debug_assert_eq!(field.kind, FieldKind::Tag);
        FileTag(self.quad(field))
    }
}

/// A parsed MacBinary header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Raw file name, no encoding is assumed
    pub file_name: BString,
    pub file_type: FileTag,
    pub file_creator: FileTag,
    pub file_flags: FileFlags,
    pub file_vert_pos: u16,
    pub file_horz_pos: u16,
    pub window_id: u16,
    pub protected: bool,
    pub size_of_data_fork: u32,
    pub size_of_resource_fork: u32,
    /// Seconds since 1904-01-01
    pub creation_stamp: u32,
    /// Seconds since 1904-01-01
    pub modification_stamp: u32,
    pub get_info_length: u16,
    // MacBinary II
    pub finder_flags: u16,
    pub unpacked_length: u32,
    pub second_head_length: u16,
    pub upload_version: u8,
    pub read_version: u8,
    pub crc_value: u16,
}

impl Header {
    /// Parse and validate a complete 128-byte header
    pub fn parse(buf: &[u8; HEADER_LEN]) -> Result<Self> {
        let raw = RawHeader(buf);

        if raw.byte(fields::VERSION) != 0 {
            return Err(DecodeError::Format("expected version 0"));
        }

        let name_len = usize::from(raw.byte(fields::FILE_NAME_LEN));
        if name_len > MAX_FILE_NAME_LEN {
            return Err(DecodeError::Format("invalid filename length"));
        }

        let file_type = raw.tag(fields::FILE_TYPE);
        if file_type != FileTag::PNTG {
            return Err(DecodeError::Format("invalid file type"));
        }

        Ok(Header {
            file_name: BString::from(&raw.bytes(fields::FILE_NAME)[..name_len]),
            file_type,
            file_creator: raw.tag(fields::FILE_CREATOR),
            file_flags: FileFlags::from_bits_retain(raw.byte(fields::FILE_FLAGS)),
            file_vert_pos: raw.u16(fields::FILE_VERT_POS),
            file_horz_pos: raw.u16(fields::FILE_HORZ_POS),
            window_id: raw.u16(fields::WINDOW_ID),
            protected: raw.flag(fields::PROTECTED),
            size_of_data_fork: raw.u32(fields::SIZE_OF_DATA_FORK),
            size_of_resource_fork: raw.u32(fields::SIZE_OF_RESOURCE_FORK),
            creation_stamp: raw.u32(fields::CREATION_STAMP),
            modification_stamp: raw.u32(fields::MODIFICATION_STAMP),
            get_info_length: raw.u16(fields::GET_INFO_LENGTH),
            finder_flags: raw.u16(fields::FINDER_FLAGS),
            unpacked_length: raw.u32(fields::UNPACKED_LENGTH),
            second_head_length: raw.u16(fields::SECOND_HEAD_LENGTH),
            upload_version: raw.byte(fields::UPLOAD_VERSION),
            read_version: raw.byte(fields::READ_VERSION),
            crc_value: raw.u16(fields::CRC_VALUE),
        })
    }

    /// Creation time, if it is representable
    #[cfg(feature = "chrono")]
    pub fn created(&self) -> Option<chrono::NaiveDateTime> {
        mac_time(self.creation_stamp)
    }

    /// Modification time, if it is representable
    #[cfg(feature = "chrono")]
    pub fn modified(&self) -> Option<chrono::NaiveDateTime> {
        mac_time(self.modification_stamp)
    }
}

#[cfg(feature = "chrono")]
fn mac_time(stamp: u32) -> Option<chrono::NaiveDateTime> {
    let epoch = chrono::NaiveDate::from_ymd_opt(1904, 1, 1)?.and_hms_opt(0, 0, 0)?;
    epoch.checked_add_signed(chrono::TimeDelta::try_seconds(i64::from(stamp))?)
}

/// What precedes the pattern table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preamble {
    /// The file starts with the data marker, which has already been consumed.
    Bare,
    /// A MacBinary header was read; the data marker is still in the stream.
    MacBinary(Header),
}

impl Preamble {
    pub fn header(&self) -> Option<&Header> {
        match self {
            Preamble::Bare => None,
            Preamble::MacBinary(header) => Some(header),
        }
    }
}

/// Reads as many bytes as are available, up to `buf.len()`.
///
/// Unlike [`Read::read_exact`], this reports how far it got before the end of
/// the stream.
pub(crate) fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

/// Detects and parses the optional MacBinary header.
///
/// In both cases the stream is left right before the data marker (for
/// [`Preamble::Bare`] the marker is what was read to tell the two apart).
pub fn read_preamble<R: Read>(reader: &mut R) -> Result<Preamble> {
    let mut buf = [0u8; HEADER_LEN];

    match read_fully(reader, &mut buf[..DATA_MARKER.len()])? {
        0 => return Err(DecodeError::Eof),
        n if n < DATA_MARKER.len() => return Err(DecodeError::UnexpectedEof),
        _ => {}
    }

    if buf[..DATA_MARKER.len()] == DATA_MARKER {
        debug!("No MacBinary header, found data marker");
        return Ok(Preamble::Bare);
    }

    reader.read_exact(&mut buf[DATA_MARKER.len()..])?;
    let header = Header::parse(&buf)?;
    debug!(
        "MacBinary header: name={:?} type={} creator={} data fork={} bytes",
        header.file_name, header.file_type, header.file_creator, header.size_of_data_fork
    );
    Ok(Preamble::MacBinary(header))
}
