//! # Glyph Atlas
//!
//! Builds a single packed glyph atlas for a fixed character set at one pixel
//! size, and computes integer draw anchors for strings rendered from it.
//!
//! ## Features
//!
//! - **Strip Packing**: Glyphs laid out left-to-right in one row, no padding
//! - **Owned Glyph Copies**: Every bitmap is copied out of the rasterizer
//! - **Kerned Layout**: Buffer-space and texture-space anchor layout
//! - **Pluggable Rasterizer**: `fontdue` by default, mockable in tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glyph_atlas::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let font_bytes = std::fs::read("resources/fonts/default.ttf")?;
//!     let rasterizer = FontdueRasterizer::from_bytes(&font_bytes)?;
//!
//!     let mut atlas = FontAtlas::new(rasterizer, Alphabet::standard());
//!     atlas.load(32)?;
//!
//!     let layout = TextLayout::new(&atlas);
//!     let result = layout.layout_buffer("Hello world", 10, 40)?;
//!     for anchor in result.visible() {
//!         println!("{}, {}", anchor.x, anchor.y);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod foundation;
pub mod text;

/// Common imports for atlas users
pub mod prelude {
    pub use crate::{
        config::{AtlasSettings, Config, ConfigError},
        text::{
            Alphabet, Anchor, CharacterMetrics, FontAtlas, FontError, FontResult,
            FontdueRasterizer, GlyphBitmap, LayoutResult, RasterizedGlyph, Rasterizer,
            TextLayout,
        },
    };
}
