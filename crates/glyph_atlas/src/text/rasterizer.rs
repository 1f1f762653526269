//! Glyph rasterizer adapters
//!
//! The atlas never touches rasterizer internals: it asks for one glyph at a
//! time through [`Rasterizer`] and copies the returned bitmap before asking
//! for the next one.

use std::path::Path;

use fontdue::{Font, FontSettings, Metrics};

use super::{FontError, FontResult};

/// Opaque per-font glyph handle used for kerning lookups
pub type GlyphIndex = u16;

/// One rendered glyph, borrowed from the rasterizer until its next call
#[derive(Debug, Clone, Copy)]
pub struct RasterizedGlyph<'a> {
    /// Glyph handle for kerning queries
    pub glyph_index: GlyphIndex,
    /// Whole pixels the pen moves after this glyph
    pub advance: i32,
    /// Distance from the baseline up to the bitmap's top row
    pub bitmap_top: i32,
    /// Distance from the pen position to the bitmap's left column
    pub bitmap_left: i32,
    /// Bitmap width in pixels
    pub width: usize,
    /// Bitmap height in pixels
    pub height: usize,
    /// Row-major 8-bit coverage, `width * height` bytes
    pub pixels: &'a [u8],
}

/// Source of glyph bitmaps, metrics and kerning for one font face
pub trait Rasterizer {
    /// Render `ch` at `pixel_height` pixels per em
    fn rasterize(&mut self, ch: char, pixel_height: u32) -> FontResult<RasterizedGlyph<'_>>;

    /// Horizontal kerning between two glyphs in whole pixels, truncated toward zero
    fn kerning(&self, left: GlyphIndex, right: GlyphIndex, pixel_height: u32) -> i32;
}

/// [`Rasterizer`] backed by the pure-Rust `fontdue` library
pub struct FontdueRasterizer {
    font: Font,
    /// Last rendered bitmap; handed out by reference until the next call
    scratch: Vec<u8>,
}

impl FontdueRasterizer {
    /// Parse a TrueType/OpenType font from memory
    pub fn from_bytes(font_data: &[u8]) -> FontResult<Self> {
        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|e| FontError::LoadError(format!("fontdue error: {e}")))?;

        log::info!("Loaded font from {} bytes", font_data.len());

        Ok(Self {
            font,
            scratch: Vec::new(),
        })
    }

    /// Read and parse a font file
    pub fn from_file<P: AsRef<Path>>(path: P) -> FontResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| FontError::LoadError(format!("{}: {e}", path.display())))?;

        log::debug!("Read {} bytes of font data from {:?}", bytes.len(), path);
        Self::from_bytes(&bytes)
    }
}

impl Rasterizer for FontdueRasterizer {
    fn rasterize(&mut self, ch: char, pixel_height: u32) -> FontResult<RasterizedGlyph<'_>> {
        let glyph_index = self.font.lookup_glyph_index(ch);
        let (metrics, bitmap) = self.font.rasterize_indexed(glyph_index, pixel_height as f32);
        self.scratch = bitmap;

        if self.scratch.len() != metrics.width * metrics.height {
            return Err(FontError::RasterizeError(
                ch,
                format!(
                    "bitmap is {} bytes, expected {}x{}",
                    self.scratch.len(),
                    metrics.width,
                    metrics.height
                ),
            ));
        }

        Ok(glyph_from_metrics(glyph_index, &metrics, &self.scratch))
    }

    fn kerning(&self, left: GlyphIndex, right: GlyphIndex, pixel_height: u32) -> i32 {
        self.font
            .horizontal_kern_indexed(left, right, pixel_height as f32)
            .map_or(0, whole_pixels)
    }
}

/// Truncate a fractional pixel distance toward zero
pub fn whole_pixels(distance: f32) -> i32 {
    distance.trunc() as i32
}

/// Map fontdue metrics onto baseline-relative bearings
///
/// fontdue reports `ymin` as the bitmap's bottom edge above the baseline, so
/// the top bearing is `ymin + height`.
fn glyph_from_metrics<'a>(glyph_index: GlyphIndex, metrics: &Metrics, pixels: &'a [u8]) -> RasterizedGlyph<'a> {
    RasterizedGlyph {
        glyph_index,
        advance: whole_pixels(metrics.advance_width),
        bitmap_top: metrics.ymin + metrics.height as i32,
        bitmap_left: metrics.xmin,
        width: metrics.width,
        height: metrics.height,
        pixels,
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Deterministic in-memory rasterizer for tests

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Fixed metrics and fill value for one mock glyph
    #[derive(Debug, Clone, Copy)]
    pub struct MockGlyph {
        pub advance: i32,
        pub bitmap_left: i32,
        pub bitmap_top: i32,
        pub width: usize,
        pub height: usize,
        pub fill: u8,
    }

    impl MockGlyph {
        /// Generated metrics for characters not configured explicitly
        fn generated(ch: char) -> Self {
            if ch == ' ' {
                return Self { advance: 4, bitmap_left: 0, bitmap_top: 0, width: 0, height: 0, fill: 0 };
            }
            let code = ch as usize;
            let width = code % 5 + 1;
            let height = code % 7 + 2;
            Self {
                advance: width as i32 + 1,
                bitmap_left: (code % 3) as i32 - 1,
                bitmap_top: height as i32,
                width,
                height,
                fill: ch as u8,
            }
        }
    }

    /// Rasterizer with configurable glyphs and kerning pairs
    #[derive(Default)]
    pub struct MockRasterizer {
        glyphs: HashMap<char, MockGlyph>,
        kerning: HashMap<(GlyphIndex, GlyphIndex), i32>,
        fail_on: Option<char>,
        scratch: Vec<u8>,
        pub rasterized: Vec<(char, u32)>,
        pub kerning_calls: AtomicUsize,
    }

    impl MockRasterizer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_glyph(mut self, ch: char, glyph: MockGlyph) -> Self {
            self.glyphs.insert(ch, glyph);
            self
        }

        pub fn with_metrics(self, ch: char, advance: i32, bitmap_left: i32, bitmap_top: i32) -> Self {
            self.with_glyph(
                ch,
                MockGlyph { advance, bitmap_left, bitmap_top, width: 2, height: 3, fill: 0xff },
            )
        }

        pub fn with_kerning(mut self, left: char, right: char, delta: i32) -> Self {
            self.kerning.insert((left as GlyphIndex, right as GlyphIndex), delta);
            self
        }

        pub fn failing_on(mut self, ch: char) -> Self {
            self.fail_on = Some(ch);
            self
        }

        pub fn glyph(&self, ch: char) -> MockGlyph {
            self.glyphs.get(&ch).copied().unwrap_or_else(|| MockGlyph::generated(ch))
        }
    }

    impl Rasterizer for MockRasterizer {
        fn rasterize(&mut self, ch: char, pixel_height: u32) -> FontResult<RasterizedGlyph<'_>> {
            self.rasterized.push((ch, pixel_height));
            if self.fail_on == Some(ch) {
                return Err(FontError::RasterizeError(ch, "mock failure".to_string()));
            }

            let glyph = self.glyph(ch);
            // Row y holds fill + y so tests can tell rows apart
            self.scratch = (0..glyph.height)
                .flat_map(|y| std::iter::repeat(glyph.fill.wrapping_add(y as u8)).take(glyph.width))
                .collect();

            Ok(RasterizedGlyph {
                glyph_index: ch as GlyphIndex,
                advance: glyph.advance,
                bitmap_top: glyph.bitmap_top,
                bitmap_left: glyph.bitmap_left,
                width: glyph.width,
                height: glyph.height,
                pixels: &self.scratch,
            })
        }

        fn kerning(&self, left: GlyphIndex, right: GlyphIndex, _pixel_height: u32) -> i32 {
            self.kerning_calls.fetch_add(1, Ordering::Relaxed);
            self.kerning.get(&(left, right)).copied().unwrap_or(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockRasterizer;
    use super::*;

    #[test]
    fn test_garbage_font_data_is_a_load_error() {
        let result = FontdueRasterizer::from_bytes(&[0u8; 64]);
        assert!(matches!(result, Err(FontError::LoadError(_))));
    }

    #[test]
    fn test_missing_font_file_is_a_load_error() {
        let result = FontdueRasterizer::from_file("does/not/exist.ttf");
        assert!(matches!(result, Err(FontError::LoadError(_))));
    }

    #[test]
    fn test_mock_bitmap_matches_reported_size() {
        let mut rasterizer = MockRasterizer::new();
        let glyph = rasterizer.rasterize('g', 16).unwrap();
        assert_eq!(glyph.pixels.len(), glyph.width * glyph.height);
        assert_eq!(glyph.glyph_index, 'g' as GlyphIndex);
    }

    #[test]
    fn test_mock_kerning_defaults_to_zero() {
        let rasterizer = MockRasterizer::new().with_kerning('A', 'V', -2);
        assert_eq!(rasterizer.kerning('A' as GlyphIndex, 'V' as GlyphIndex, 16), -2);
        assert_eq!(rasterizer.kerning('V' as GlyphIndex, 'A' as GlyphIndex, 16), 0);
        assert_eq!(rasterizer.kerning_calls.load(std::sync::atomic::Ordering::Relaxed), 2);
    }

    #[test]
    fn test_whole_pixels_truncates_toward_zero() {
        assert_eq!(whole_pixels(1.7), 1);
        assert_eq!(whole_pixels(-1.7), -1);
        assert_eq!(whole_pixels(-0.4), 0);
        assert_eq!(whole_pixels(0.0), 0);
        assert_eq!(whole_pixels(12.0), 12);
    }

    #[test]
    fn test_fontdue_metrics_map_to_bearings() {
        let metrics = Metrics {
            xmin: -1,
            ymin: -4,
            width: 3,
            height: 14,
            advance_width: 9.85,
            ..Metrics::default()
        };
        let pixels = [0u8; 42];

        let glyph = glyph_from_metrics(7, &metrics, &pixels);

        assert_eq!(glyph.glyph_index, 7);
        assert_eq!(glyph.advance, 9);
        assert_eq!(glyph.bitmap_top, 10);
        assert_eq!(glyph.bitmap_left, -1);
        assert_eq!((glyph.width, glyph.height), (3, 14));
        assert_eq!(glyph.pixels.len(), 42);
    }

    #[test]
    fn test_glyph_above_baseline_keeps_positive_bottom() {
        let metrics = Metrics {
            xmin: 2,
            ymin: 6,
            width: 2,
            height: 3,
            advance_width: 4.0,
            ..Metrics::default()
        };

        let glyph = glyph_from_metrics(1, &metrics, &[]);
        assert_eq!(glyph.bitmap_top, 9);
        assert_eq!(glyph.advance, 4);
    }
}
