//! Font atlas builder
//!
//! Rasterizes every character of a fixed [`Alphabet`] at one pixel height and
//! packs the bitmaps into a single-row strip: left to right, in alphabet
//! order, no padding, no wrapping. The atlas is as wide as the sum of the
//! glyph widths and as tall as the tallest glyph.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Alphabet, GlyphBitmap, GlyphIndex, Rasterizer};

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur during font operations
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Failed to load font from file or data
    #[error("Failed to load font: {0}")]
    LoadError(String),

    /// Failed to rasterize a specific glyph character
    #[error("Failed to rasterize glyph '{0}': {1}")]
    RasterizeError(char, String),

    /// An atlas needs at least one character
    #[error("Alphabet is empty")]
    EmptyAlphabet,

    /// Alphabet characters must be distinct
    #[error("Character '{0}' appears more than once in the alphabet")]
    DuplicateCharacter(char),

    /// Alphabet characters must be single-byte
    #[error("Character '{0}' is not a single-byte character")]
    UnsupportedCharacter(char),

    /// Glyphs cannot be rasterized at zero height
    #[error("Invalid pixel height: {0}")]
    InvalidPixelHeight(u32),

    /// Rasterizer returned a buffer that does not match its dimensions
    #[error("Bitmap buffer of {len} bytes does not match {width}x{height}")]
    InvalidBitmap {
        /// Reported width
        width: usize,
        /// Reported height
        height: usize,
        /// Actual buffer length
        len: usize,
    },

    /// The atlas was already built; it cannot be reloaded
    #[error("Atlas is already loaded")]
    AlreadyLoaded,

    /// Metrics, kerning or layout requested before the atlas was built
    #[error("Atlas has not been loaded")]
    NotLoaded,

    /// Requested character was not found in the font atlas
    #[error("Character '{0}' not found in atlas")]
    GlyphNotFound(char),

    /// Coordinate output slice is too short for the laid-out string
    #[error("Coordinate buffer holds {len} values, {needed} needed")]
    BufferTooSmall {
        /// Values the layout writes
        needed: usize,
        /// Values the buffer holds
        len: usize,
    },

    /// A pen or anchor coordinate left the `i32` range
    #[error("Layout coordinate overflowed")]
    CoordinateOverflow,

    /// Failed to write atlas output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to encode the atlas image
    #[error("Failed to encode atlas image: {0}")]
    ImageError(String),

    /// Failed to serialize the atlas manifest
    #[error("Failed to serialize atlas manifest: {0}")]
    ManifestError(String),
}

/// Per-character metrics recorded while building the atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterMetrics {
    /// Rasterizer glyph handle, used for kerning lookups
    pub glyph_index: GlyphIndex,
    /// Whole pixels the pen moves after drawing this character
    pub advance: i32,
    /// Distance from the baseline up to the bitmap's top row
    pub bitmap_top: i32,
    /// Distance from the pen position to the bitmap's left column
    pub bitmap_left: i32,
    /// Bitmap width in pixels
    pub bitmap_width: usize,
    /// Bitmap height in pixels
    pub bitmap_height: usize,
    /// Left edge of this glyph's band in the atlas image
    pub atlas_x: usize,
}

/// Serializable description of a built atlas, written next to the image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasManifest {
    /// Rasterization height in pixels
    pub pixel_height: u32,
    /// Atlas image width
    pub atlas_width: usize,
    /// Atlas image height
    pub atlas_height: usize,
    /// Metrics in alphabet order
    pub glyphs: Vec<(char, CharacterMetrics)>,
}

/// Everything produced by a successful `load`
struct PackedAtlas {
    pixel_height: u32,
    glyphs: Vec<GlyphBitmap>,
    metrics: HashMap<char, CharacterMetrics>,
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

/// Font atlas that owns a rasterizer, the glyph copies and the packed image
///
/// Constructed empty, filled by exactly one [`FontAtlas::load`] call and
/// read-only afterwards, so any number of layouts may borrow it at once.
pub struct FontAtlas<R: Rasterizer> {
    /// Exclusively owned rasterizer, kept for kerning queries after load
    rasterizer: R,

    /// Characters in packing order
    alphabet: Alphabet,

    /// Set once by `load`
    packed: Option<PackedAtlas>,
}

impl<R: Rasterizer> FontAtlas<R> {
    /// Create an empty atlas for `alphabet`
    pub fn new(rasterizer: R, alphabet: Alphabet) -> Self {
        Self {
            rasterizer,
            alphabet,
            packed: None,
        }
    }

    /// Rasterize every alphabet character at `pixel_height` and pack the atlas
    ///
    /// All or nothing: on error the atlas stays unloaded.
    pub fn load(&mut self, pixel_height: u32) -> FontResult<()> {
        if self.packed.is_some() {
            return Err(FontError::AlreadyLoaded);
        }
        if pixel_height == 0 {
            return Err(FontError::InvalidPixelHeight(pixel_height));
        }

        log::info!(
            "Rasterizing {} glyphs at {}px",
            self.alphabet.len(),
            pixel_height
        );

        let mut glyphs = Vec::with_capacity(self.alphabet.len());
        let mut metrics = HashMap::with_capacity(self.alphabet.len());
        let mut running_width = 0usize;

        for ch in self.alphabet.iter() {
            let raster = self.rasterizer.rasterize(ch, pixel_height)?;
            let bitmap = GlyphBitmap::copy_from(raster.width, raster.height, raster.pixels)?;

            let record = CharacterMetrics {
                glyph_index: raster.glyph_index,
                advance: raster.advance,
                bitmap_top: raster.bitmap_top,
                bitmap_left: raster.bitmap_left,
                bitmap_width: bitmap.width(),
                bitmap_height: bitmap.height(),
                atlas_x: running_width,
            };

            if bitmap.is_empty() && ch != ' ' {
                log::warn!("Glyph '{}' rasterized to an empty bitmap", ch);
            }
            log::debug!("Glyph '{}': {:?}", ch, record);

            running_width += bitmap.width();
            metrics.insert(ch, record);
            glyphs.push(bitmap);
        }

        let (width, height, pixels) = pack_strip(&glyphs)?;

        log::info!(
            "Atlas packed: {}x{}, {} glyphs",
            width,
            height,
            glyphs.len()
        );

        self.packed = Some(PackedAtlas {
            pixel_height,
            glyphs,
            metrics,
            width,
            height,
            pixels,
        });
        Ok(())
    }

    /// Whether `load` has completed
    pub fn is_loaded(&self) -> bool {
        self.packed.is_some()
    }

    /// Characters in packing order
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Height the glyphs were rasterized at
    pub fn pixel_height(&self) -> FontResult<u32> {
        Ok(self.packed()?.pixel_height)
    }

    /// Atlas image width, zero before load
    pub fn atlas_width(&self) -> usize {
        self.packed.as_ref().map_or(0, |p| p.width)
    }

    /// Atlas image height, zero before load
    pub fn atlas_height(&self) -> usize {
        self.packed.as_ref().map_or(0, |p| p.height)
    }

    /// Get atlas dimensions
    pub fn dimensions(&self) -> (usize, usize) {
        (self.atlas_width(), self.atlas_height())
    }

    /// Packed single-channel image, row-major, empty before load
    pub fn pixels(&self) -> &[u8] {
        self.packed.as_ref().map_or(&[][..], |p| p.pixels.as_slice())
    }

    /// Metrics for `ch`
    pub fn metrics(&self, ch: char) -> FontResult<&CharacterMetrics> {
        self.packed()?
            .metrics
            .get(&ch)
            .ok_or(FontError::GlyphNotFound(ch))
    }

    /// Metrics for every character in alphabet order
    pub fn metrics_table(&self) -> FontResult<Vec<(char, CharacterMetrics)>> {
        let packed = self.packed()?;
        Ok(self
            .alphabet
            .iter()
            .filter_map(|ch| packed.metrics.get(&ch).map(|m| (ch, *m)))
            .collect())
    }

    /// Stored copy of the bitmap for `ch`
    pub fn glyph_bitmap(&self, ch: char) -> FontResult<&GlyphBitmap> {
        let packed = self.packed()?;
        self.alphabet
            .index_of(ch)
            .and_then(|index| packed.glyphs.get(index))
            .ok_or(FontError::GlyphNotFound(ch))
    }

    /// Kerning between `left` and `right` in whole pixels
    pub fn kerning(&self, left: char, right: char) -> FontResult<i32> {
        let left_index = self.metrics(left)?.glyph_index;
        let right_index = self.metrics(right)?.glyph_index;
        let pixel_height = self.pixel_height()?;
        Ok(self.rasterizer.kerning(left_index, right_index, pixel_height))
    }

    /// Atlas dimensions and metrics table in serializable form
    pub fn manifest(&self) -> FontResult<AtlasManifest> {
        let packed = self.packed()?;
        Ok(AtlasManifest {
            pixel_height: packed.pixel_height,
            atlas_width: packed.width,
            atlas_height: packed.height,
            glyphs: self.metrics_table()?,
        })
    }

    /// Write the packed image as raw bytes, `width * height` long
    pub fn save_raw<P: AsRef<Path>>(&self, path: P) -> FontResult<()> {
        let packed = self.packed()?;
        std::fs::write(path.as_ref(), &packed.pixels)?;
        log::info!("Wrote {} atlas bytes to {:?}", packed.pixels.len(), path.as_ref());
        Ok(())
    }

    /// Write the packed image as a grayscale PNG
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> FontResult<()> {
        let packed = self.packed()?;
        let image = image::GrayImage::from_raw(
            packed.width as u32,
            packed.height as u32,
            packed.pixels.clone(),
        )
        .ok_or_else(|| FontError::ImageError("atlas buffer does not match its dimensions".to_string()))?;

        image
            .save(path.as_ref())
            .map_err(|e| FontError::ImageError(e.to_string()))?;
        log::info!("Saved {}x{} atlas image to {:?}", packed.width, packed.height, path.as_ref());
        Ok(())
    }

    /// Write the manifest as RON
    pub fn save_manifest<P: AsRef<Path>>(&self, path: P) -> FontResult<()> {
        let contents = ron::ser::to_string_pretty(&self.manifest()?, ron::ser::PrettyConfig::default())
            .map_err(|e| FontError::ManifestError(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn packed(&self) -> FontResult<&PackedAtlas> {
        self.packed.as_ref().ok_or(FontError::NotLoaded)
    }
}

/// Pack glyphs left to right into one zero-initialised strip
///
/// Returns `(width, height, pixels)`. Rows below a shorter glyph stay zero.
pub fn pack_strip(glyphs: &[GlyphBitmap]) -> FontResult<(usize, usize, Vec<u8>)> {
    let height = glyphs
        .iter()
        .map(GlyphBitmap::height)
        .max()
        .ok_or(FontError::EmptyAlphabet)?;
    let width: usize = glyphs.iter().map(GlyphBitmap::width).sum();

    let mut pixels = vec![0u8; width * height];
    let mut atlas_x = 0;

    for glyph in glyphs {
        for (y, row) in (0..glyph.height()).filter_map(|y| glyph.row(y).map(|row| (y, row))) {
            let start = y * width + atlas_x;
            pixels[start..start + row.len()].copy_from_slice(row);
        }
        atlas_x += glyph.width();
    }

    Ok((width, height, pixels))
}
