//! Fixture builders shared by the integration tests, the bench and the fuzz target.
#![allow(dead_code)]

/// Data marker, pattern table and padding of a header-less file.
pub const PRELUDE_LEN: usize = 4 + 304 + 204;

/// Packed bytes in a full raster.
pub const PACKED_LEN: usize = 576 * 720 / 8;

/// Packs 0/255 pixels eight to a byte, black (0) as a set bit.
pub fn pack(pixels: &[u8]) -> Vec<u8> {
    pixels
        .chunks(8)
        .map(|group| {
            group
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &p)| if p == 0x00 { acc | (0x80 >> i) } else { acc })
        })
        .collect()
}

/// Expands packed bytes into 0/255 pixels, most significant bit first.
pub fn unpack(packed: &[u8]) -> Vec<u8> {
    packed
        .iter()
        .flat_map(|&byte| (0..8).map(move |i| if byte & (0x80 >> i) != 0 { 0x00 } else { 0xFF }))
        .collect()
}

/// Run-length encodes packed bytes with repeat-runs (`256 - count`) and literal-runs (`len - 1`).
pub fn encode(packed: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < packed.len() {
        let mut run = 1;
        while i + run < packed.len() && run < 128 && packed[i + run] == packed[i] {
            run += 1;
        }
        if run >= 2 {
            out.push((256 - run) as u8);
            out.push(packed[i]);
            i += run;
            continue;
        }

        let start = i;
        while i < packed.len()
            && i - start < 128
            && !(i + 1 < packed.len() && packed[i + 1] == packed[i])
        {
            i += 1;
        }
        out.push((i - start - 1) as u8);
        out.extend_from_slice(&packed[start..i]);
    }
    out
}

/// Wraps an encoded raster in a header-less file.
pub fn bare_file(raster: &[u8]) -> Vec<u8> {
    let mut data = vec![0x00, 0x00, 0x00, 0x02];
    data.resize(PRELUDE_LEN, 0xA5);
    data.extend_from_slice(raster);
    data
}
