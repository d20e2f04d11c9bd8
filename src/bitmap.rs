//! Decoded raster and its fixed geometry.

use crate::decompress::BLACK;

/// Width of every MacPaint raster in pixels.
pub const WIDTH: usize = 576;

/// Height of every MacPaint raster in pixels.
pub const HEIGHT: usize = 720;

/// Number of pixels in a raster.
pub const PIXEL_COUNT: usize = WIDTH * HEIGHT;

/// Color model of decoded pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorModel {
    /// One 8-bit channel, `0` is black and `255` is white.
    Gray,
}

impl ColorModel {
    pub const fn channels(self) -> usize {
        match self {
            ColorModel::Gray => 1,
        }
    }
}

/// Metadata known without decoding the raster
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImageConfig {
    pub color_model: ColorModel,
    pub width: usize,
    pub height: usize,
}

impl ImageConfig {
    /// The one configuration every MacPaint file has.
    pub const MACPAINT: ImageConfig = ImageConfig {
        color_model: ColorModel::Gray,
        width: WIDTH,
        height: HEIGHT,
    };
}

/// A fully decoded 576×720 raster, one byte per pixel
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Wraps a complete pixel buffer.
    ///
    /// Returns `None` unless `pixels` holds exactly [`PIXEL_COUNT`] bytes.
    pub fn from_pixels(pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == PIXEL_COUNT).then_some(Self { pixels })
    }

    pub const fn width(&self) -> usize {
        WIDTH
    }

    pub const fn height(&self) -> usize {
        HEIGHT
    }

    pub const fn color_model(&self) -> ColorModel {
        ColorModel::Gray
    }

    /// Row-major pixel data
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Value of the pixel at (`x`, `y`), if in bounds
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }
        self.pixels.get(y * WIDTH + x).copied()
    }

    pub fn is_black(&self, x: usize, y: usize) -> bool {
        self.pixel(x, y) == Some(BLACK)
    }

    /// Iterator over the rows, top to bottom
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u8]> {
        self.pixels.chunks_exact(WIDTH)
    }

    #[cfg(feature = "image")]
    /// Turn the bitmap into a `GrayImage` from the `image` crate
    pub fn to_image(&self) -> image::GrayImage {
        image::GrayImage::from_fn(WIDTH as u32, HEIGHT as u32, |x, y| {
            image::Luma([self.pixels[y as usize * WIDTH + x as usize]])
        })
    }
}

impl core::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let black = self.pixels.iter().filter(|&&p| p == BLACK).count();
        f.debug_struct("Bitmap")
            .field("width", &WIDTH)
            .field("height", &HEIGHT)
            .field("black", &black)
            .finish()
    }
}

#[cfg(feature = "image")]
impl From<Bitmap> for image::GrayImage {
    fn from(bitmap: Bitmap) -> Self {
        bitmap.to_image()
    }
}
