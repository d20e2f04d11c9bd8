use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use macpaint::{HEIGHT, WIDTH, decode};
use std::hint::black_box;

#[path = "../tests/common/mod.rs"]
mod common;

use common::{PACKED_LEN, bare_file, encode};

/// Generates packed raster bytes using a deterministic Linear Congruential Generator (LCG).
///
/// High entropy, so the encoded raster is made almost entirely of literal-runs.
fn generate_noise() -> Vec<u8> {
    let mut vec = Vec::with_capacity(PACKED_LEN);
    // Fixed seed for determinism (0xDEAD_BEEF).
    let mut seed: u64 = 0xDEAD_BEEF;
    for _ in 0..PACKED_LEN {
        seed = (seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223)) & 0xFFFF_FFFF;
        vec.push((seed >> 24) as u8);
    }
    vec
}

/// Generates a blank page, the best case: nothing but maximal repeat-runs.
fn generate_blank() -> Vec<u8> {
    vec![0u8; PACKED_LEN]
}

/// Generates line art: mostly blank rows with a ruled line every 16 rows
/// and a two-pixel margin on both sides.
fn generate_line_art() -> Vec<u8> {
    let row_len = WIDTH / 8;
    let mut vec = Vec::with_capacity(PACKED_LEN);
    for y in 0..HEIGHT {
        let mut row = vec![0u8; row_len];
        if y % 16 == 0 {
            row.fill(0xFF);
        }
        row[0] |= 0xC0;
        row[row_len - 1] |= 0x03;
        vec.extend_from_slice(&row);
    }
    vec
}

/// Wraps an encoded raster in a header-less file.
fn to_file(packed: &[u8]) -> Vec<u8> {
    bare_file(&encode(packed))
}

/// Benchmarks full-file decoding.
///
/// Throughput is based on the decoded size (one byte per pixel).
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("MacPaint Decode");

    let scenarios = [
        ("Blank", to_file(&generate_blank())),
        ("Line Art", to_file(&generate_line_art())),
        ("Noise", to_file(&generate_noise())),
    ];

    for (name, file) in &scenarios {
        group.throughput(Throughput::Bytes((WIDTH * HEIGHT) as u64));
        group.bench_function(*name, |b| {
            b.iter(|| {
                // Unwrap: a failing decode should fail the benchmark.
                decode(black_box(&file[..])).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
