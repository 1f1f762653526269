//! Owned single-channel glyph bitmaps

use super::{FontError, FontResult};

/// Owned copy of one rasterized glyph
///
/// Samples are 8-bit coverage values stored row-major, `width * height`
/// bytes. A zero-area bitmap is valid and stands for a glyph with no ink
/// (the space character, typically).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlyphBitmap {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl GlyphBitmap {
    /// Copy a rasterizer-provided buffer
    ///
    /// The source may be reused or freed by the rasterizer as soon as this
    /// returns. Fails if `pixels` is not exactly `width * height` bytes.
    pub fn copy_from(width: usize, height: usize, pixels: &[u8]) -> FontResult<Self> {
        Self::from_vec(width, height, pixels.to_vec())
    }

    /// Take ownership of an already-owned buffer
    pub fn from_vec(width: usize, height: usize, pixels: Vec<u8>) -> FontResult<Self> {
        if width.checked_mul(height) != Some(pixels.len()) {
            return Err(FontError::InvalidBitmap {
                width,
                height,
                len: pixels.len(),
            });
        }

        Ok(Self { width, height, pixels })
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major coverage samples
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// True when the glyph has no pixels at all
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Coverage at `(x, y)`, or `None` outside the bitmap
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// One row of samples, or `None` below the bitmap
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        (y < self.height).then(|| &self.pixels[y * self.width..(y + 1) * self.width])
    }
}
