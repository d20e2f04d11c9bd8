#![no_main]

use libfuzzer_sys::fuzz_target;
use macpaint::{decode, format};

#[path = "../../tests/common/mod.rs"]
mod common;

use common::{PACKED_LEN, PRELUDE_LEN, bare_file, encode, unpack};

/// Verifies that the decoder safely handles arbitrary input and that a successful
/// decode always yields a complete raster.
///
/// # Panics
/// Panics if the decoder panics, or if a decoded bitmap is not exactly 576×720
/// pixels of 0/255 values.
fn verify_decoding_robustness(data: &[u8]) {
    if let Ok(bitmap) = decode(data) {
        assert_eq!(bitmap.pixels().len(), 576 * 720);
        assert!(bitmap.pixels().iter().all(|&p| p == 0 || p == 255));
    }
}

/// Verifies that any data fed after the header-less prelude decodes without panicking.
///
/// Random bytes rarely start with the data marker, so most inputs never reach the
/// raster stage on their own.
fn verify_raster_robustness(data: &[u8]) {
    let mut file = vec![0x00, 0x00, 0x00, 0x02];
    file.resize(PRELUDE_LEN, 0);
    file.extend_from_slice(data);
    assert!(format::is_macpaint(&file));
    verify_decoding_robustness(&file);
}

/// Verifies `Decode(Encode(Raster)) == Raster` for the fuzz bytes used as packed pixels.
///
/// The input is padded with zeros or truncated to one full raster.
///
/// # Panics
/// Panics if decoding fails or any pixel differs from its packed bit.
fn verify_round_trip(data: &[u8]) {
    let mut packed = data.to_vec();
    packed.resize(PACKED_LEN, 0);

    let file = bare_file(&encode(&packed));
    let bitmap = decode(&file[..]).expect("encoded raster must decode");
    assert_eq!(bitmap.pixels(), &unpack(&packed)[..]);
}

fuzz_target!(|data: &[u8]| {
    verify_decoding_robustness(data);
    verify_raster_robustness(data);
    verify_round_trip(data);
});
