use std::io::Read;

use log::{debug, warn};

use crate::bitmap::{Bitmap, HEIGHT, ImageConfig, PIXEL_COUNT, WIDTH};
use crate::decompress::{decompress, skip_pattern_table};
use crate::error::DecodeError;
use crate::header::{DATA_MARKER, Header, Preamble, read_preamble};

type Result<T> = core::result::Result<T, DecodeError>;

/// Options that influence how a file is decoded
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DecoderOptions {
    strict_data_marker: bool,
}

impl DecoderOptions {
    /// Whether a MacBinary file must carry the canonical data marker.
    ///
    /// Off by default: files with a header are seen in the wild with other
    /// values in those four bytes and still decode fine.
    pub const fn strict_data_marker(&self) -> bool {
        self.strict_data_marker
    }

    /// Require `00 00 00 02` after a MacBinary header
    pub const fn set_strict_data_marker(mut self, yes: bool) -> Self {
        self.strict_data_marker = yes;
        self
    }
}

/// A MacPaint decoder
///
/// ```no_run
/// use std::{fs::File, io::BufReader};
/// use macpaint::Decoder;
///
/// let file = BufReader::new(File::open("sample.mac").unwrap());
/// let mut decoder = Decoder::new(file);
/// if let Some(header) = decoder.header().unwrap() {
///     println!("{}", header.file_name);
/// }
/// let bitmap = decoder.decode().unwrap();
/// assert_eq!(bitmap.width(), 576);
/// ```
pub struct Decoder<R> {
    reader: R,
    options: DecoderOptions,
    preamble: Option<Preamble>,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self::new_with_options(reader, DecoderOptions::default())
    }

    pub fn new_with_options(reader: R, options: DecoderOptions) -> Self {
        Decoder {
            reader,
            options,
            preamble: None,
        }
    }

    pub const fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Read the optional MacBinary header.
    ///
    /// Only the first call touches the stream.
    pub fn read_preamble(&mut self) -> Result<&Preamble> {
        let preamble = match self.preamble.take() {
            Some(preamble) => preamble,
            None => read_preamble(&mut self.reader)?,
        };
        Ok(self.preamble.insert(preamble))
    }

    /// The MacBinary header, if the file has one
    pub fn header(&mut self) -> Result<Option<&Header>> {
        Ok(self.read_preamble()?.header())
    }

    /// `(width, height)` of the decoded image
    pub const fn dimensions(&self) -> (usize, usize) {
        (WIDTH, HEIGHT)
    }

    pub const fn config(&self) -> ImageConfig {
        ImageConfig::MACPAINT
    }

    /// Decode the whole raster.
    ///
    /// The stream is read byte by byte up to the last run and no further, so
    /// pass a buffered reader for files. Nothing is returned on failure, not
    /// even the part decoded so far.
    pub fn decode(mut self) -> Result<Bitmap> {
        let has_header = matches!(self.read_preamble()?, Preamble::MacBinary(_));
        let strict = self.options.strict_data_marker;
        let reader = &mut self.reader;

        if has_header {
            let mut marker = [0u8; 4];
            reader.read_exact(&mut marker)?;
            if marker != DATA_MARKER {
                if strict {
                    return Err(DecodeError::Format("missing data marker"));
                }
                warn!("Unexpected data marker {marker:02x?}, continuing");
            }
        }

        skip_pattern_table(reader)?;

        let mut pixels = vec![0u8; PIXEL_COUNT];
        decompress(reader, &mut pixels)?;
        debug!("Decoded {WIDTH}x{HEIGHT} raster");

        Bitmap::from_pixels(pixels).ok_or(DecodeError::Format("raster size mismatch"))
    }
}
