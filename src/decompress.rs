use std::io::{self, Read};

use log::trace;

use crate::error::DecodeError;

type Result<T> = core::result::Result<T, DecodeError>;

// --- Constants ---

/// Pixel value for a set bit (ink).
pub const BLACK: u8 = 0x00;

/// Pixel value for a clear bit (paper).
pub const WHITE: u8 = 0xFF;

/// Size of the brush pattern table following the data marker.
pub const PATTERN_TABLE_LEN: u64 = 304;

/// Reserved bytes between the pattern table and the raster.
pub const PADDING_LEN: u64 = 204;

/// Control bytes with this bit set introduce a repeat-run.
const REPEAT_FLAG: u8 = 0x80;

/// Longest literal-run (control byte `0x7F`).
const MAX_LITERAL_RUN: usize = 128;

/// Each packed byte carries this many pixels, most significant bit first.
const PIXELS_PER_BYTE: usize = 8;

/// Expansion of every packed byte into its eight pixels.
pub const BIT_PROJECTION: [[u8; 8]; 256] = build_projection();

const fn build_projection() -> [[u8; 8]; 256] {
    let mut table = [[WHITE; 8]; 256];
    let mut byte = 0;
    while byte < 256 {
        let mut bit = 0;
        while bit < 8 {
            if byte & (0x80 >> bit) != 0 {
                table[byte][bit] = BLACK;
            }
            bit += 1;
        }
        byte += 1;
    }
    table
}

/// Discards the pattern table and the padding behind it.
pub fn skip_pattern_table<R: Read>(reader: &mut R) -> Result<()> {
    let want = PATTERN_TABLE_LEN + PADDING_LEN;
    let skipped = io::copy(&mut reader.by_ref().take(want), &mut io::sink())?;
    if skipped < want {
        return Err(DecodeError::UnexpectedEof);
    }
    Ok(())
}

/// Repeat count of a control byte with the high bit set.
#[inline]
const fn repeat_count(control: u8) -> usize {
    256 - control as usize
}

#[inline]
fn read_byte<R: Read>(reader: &mut R) -> Result<u8> {
    let mut byte = [0u8; 1];
    reader.read_exact(&mut byte)?;
    Ok(byte[0])
}

/// Writes the eight pixels of `packed` at `cursor`.
///
/// Fails instead of writing when the group would extend past the end of `output`.
#[inline]
fn emit(output: &mut [u8], cursor: &mut usize, packed: u8) -> Result<()> {
    let dst = output
        .get_mut(*cursor..*cursor + PIXELS_PER_BYTE)
        .ok_or(DecodeError::Format("overflow decoding RLE"))?;
    dst.copy_from_slice(&BIT_PROJECTION[usize::from(packed)]);
    *cursor += PIXELS_PER_BYTE;
    Ok(())
}

/// Decompresses a packed-bit run-length stream until `output` is full.
///
/// Every output byte is one pixel, [`BLACK`] or [`WHITE`]. The reader is left
/// right behind the last run; trailing bytes are not touched.
pub fn decompress<R: Read>(reader: &mut R, output: &mut [u8]) -> Result<()> {
    let mut scratch = [0u8; MAX_LITERAL_RUN];
    let mut cursor = 0;
    let mut repeat_runs = 0usize;
    let mut literal_runs = 0usize;

    while cursor < output.len() {
        let control = read_byte(reader)?;

        if control & REPEAT_FLAG != 0 {
            let count = repeat_count(control);
            let packed = read_byte(reader)?;
            for _ in 0..count {
                emit(output, &mut cursor, packed)?;
            }
            repeat_runs += 1;
        } else {
            let run = &mut scratch[..usize::from(control) + 1];
            reader.read_exact(run)?;
            for &packed in run.iter() {
                emit(output, &mut cursor, packed)?;
            }
            literal_runs += 1;
        }
    }

    trace!("Raster complete: {repeat_runs} repeat-runs, {literal_runs} literal-runs");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection() {
        assert_eq!(
            BIT_PROJECTION[0b00010111],
            [WHITE, WHITE, WHITE, BLACK, WHITE, BLACK, BLACK, BLACK]
        );
        assert_eq!(BIT_PROJECTION[0xFF], [BLACK; 8]);
        assert_eq!(BIT_PROJECTION[0x00], [WHITE; 8]);
    }

    #[test]
    fn test_repeat_count() {
        assert_eq!(repeat_count(0x83), 125);
        assert_eq!(repeat_count(0x80), 128);
        assert_eq!(repeat_count(0xFF), 1);
    }

    #[test]
    fn test_repeat_run_black() {
        let mut out = vec![0x7Fu8; 1000];
        decompress(&mut &[0x83u8, 0xFF][..], &mut out).unwrap();
        assert!(out.iter().all(|&p| p == BLACK));
    }

    #[test]
    fn test_literal_run() {
        let data: [u8; 6] = [0x04, 0x80, 0x01, 0xFF, 0x00, 0xAA];
        let mut out = vec![0x7Fu8; 40];
        decompress(&mut &data[..], &mut out).unwrap();

        let mut expected = Vec::new();
        for byte in &data[1..] {
            expected.extend_from_slice(&BIT_PROJECTION[usize::from(*byte)]);
        }
        assert_eq!(out, expected);
        assert_eq!(&out[..8], &[BLACK, WHITE, WHITE, WHITE, WHITE, WHITE, WHITE, WHITE]);
    }

    #[test]
    fn test_overflow_repeat() {
        let mut out = vec![0u8; 16];
        assert!(matches!(
            decompress(&mut &[0x83u8, 0xFF][..], &mut out),
            Err(DecodeError::Format("overflow decoding RLE"))
        ));
    }

    #[test]
    fn test_overflow_literal() {
        let mut out = vec![0u8; 8];
        assert!(matches!(
            decompress(&mut &[0x01u8, 0xFF, 0xFF][..], &mut out),
            Err(DecodeError::Format("overflow decoding RLE"))
        ));
    }

    #[test]
    fn test_exact_fill_leaves_trailer() {
        let data: [u8; 6] = [0xFE, 0x0F, 0x00, 0xF0, 0xDE, 0xAD];
        let mut reader = &data[..];
        let mut out = vec![0u8; 24];
        decompress(&mut reader, &mut out).unwrap();
        assert_eq!(reader, &[0xDE, 0xAD]);
    }

    #[test]
    fn test_truncated_stream() {
        let mut out = vec![0u8; 64];
        assert!(matches!(
            decompress(&mut &[0x80u8][..], &mut out),
            Err(DecodeError::UnexpectedEof)
        ));
        assert!(matches!(
            decompress(&mut &[0x03u8, 0x00, 0x00][..], &mut out),
            Err(DecodeError::UnexpectedEof)
        ));
        assert!(matches!(
            decompress(&mut &[0xFFu8, 0x00][..], &mut out),
            Err(DecodeError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_skip_pattern_table() {
        let mut data = vec![0u8; 508];
        data.push(0x42);
        let mut reader = &data[..];
        skip_pattern_table(&mut reader).unwrap();
        assert_eq!(reader, &[0x42]);

        let mut short = &data[..507];
        assert!(matches!(
            skip_pattern_table(&mut short),
            Err(DecodeError::UnexpectedEof)
        ));
    }
}
