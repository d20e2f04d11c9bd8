//! # MacPaint Decoding
//!
//! `macpaint` is a safe, pure-Rust decoder for MacPaint (`PNTG`) images.
//! Every MacPaint document is a 576×720 monochrome raster, packed eight pixels
//! to a byte and compressed with a byte-oriented run-length scheme. Files may
//! or may not start with a 128-byte MacBinary header.
//!
//! ## Example
//!
//! ```rust
//! use macpaint::{decode, decode_config, ColorModel};
//!
//! // Header-less file: data marker, 508 bytes of patterns and padding,
//! // then 405 repeat-runs of 128 white bytes.
//! let mut data = vec![0x00, 0x00, 0x00, 0x02];
//! data.resize(4 + 508, 0);
//! for _ in 0..405 {
//!     data.extend_from_slice(&[0x80, 0x00]);
//! }
//!
//! let config = decode_config(&data[..]).unwrap();
//! assert_eq!((config.width, config.height), (576, 720));
//! assert_eq!(config.color_model, ColorModel::Gray);
//!
//! let bitmap = decode(&data[..]).expect("Decoding failed");
//! assert!(bitmap.pixels().iter().all(|&p| p == 255));
//! ```

#![forbid(unsafe_code)]

use std::io::Read;

pub mod bitmap;
pub mod decoder;
pub mod decompress;
pub mod error;
pub mod format;
pub mod header;

pub use bitmap::{Bitmap, ColorModel, HEIGHT, ImageConfig, WIDTH};
pub use decoder::{Decoder, DecoderOptions};
pub use error::DecodeError;
pub use header::{FileFlags, FileTag, Header, Preamble};

/// Decodes a MacPaint image from `reader`.
///
/// Reading stops right after the last run; bytes after the raster are neither
/// read nor validated. `reader` is read in small pieces, so wrap files in a
/// [`std::io::BufReader`].
pub fn decode<R: Read>(reader: R) -> Result<Bitmap, DecodeError> {
    Decoder::new(reader).decode()
}

/// Returns the color model and dimensions of a MacPaint image.
///
/// The format has no variable geometry, so nothing is read from `reader`.
pub fn decode_config<R: Read>(reader: R) -> Result<ImageConfig, DecodeError> {
    Ok(Decoder::new(reader).config())
}
