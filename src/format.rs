//! Signature matching for format registries.

use crate::header::{DATA_MARKER, FileTag, fields};

/// Bytes needed to recognise both layouts.
pub const SIGNATURE_LEN: usize = fields::FILE_TYPE.offset + 4;

/// Conventional file extension.
pub const EXTENSION: &str = "mac";

/// Layout of a MacPaint file, as far as its first bytes tell
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Layout {
    /// Starts with the data marker
    Bare,
    /// Starts with a 128-byte MacBinary header of type `PNTG`
    MacBinary,
}

impl Layout {
    /// Detect the layout from the start of a file
    ///
    /// ```
    /// # use macpaint::format::Layout;
    /// assert_eq!(Layout::detect(&[0, 0, 0, 2]), Some(Layout::Bare));
    /// assert_eq!(Layout::detect(b"GIF89a"), None);
    /// ```
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.starts_with(&DATA_MARKER) {
            return Some(Layout::Bare);
        }
        let file_type = data.get(fields::FILE_TYPE.range())?;
        (data[fields::VERSION.offset] == 0 && file_type == FileTag::PNTG.as_slice())
            .then_some(Layout::MacBinary)
    }
}

/// Shorthand for [`Layout::detect`]
pub fn detect(data: &[u8]) -> Option<Layout> {
    Layout::detect(data)
}

/// Returns `true` if `data` looks like the start of a MacPaint file
pub fn is_macpaint(data: &[u8]) -> bool {
    detect(data).is_some()
}
