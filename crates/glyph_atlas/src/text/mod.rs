//! Text atlas system
//!
//! Fixed alphabets, glyph rasterization, strip-packed atlas building and
//! integer text layout.

pub mod alphabet;
pub mod font_atlas;
pub mod glyph_bitmap;
pub mod rasterizer;
pub mod text_layout;

pub use alphabet::*;
pub use font_atlas::*;
pub use glyph_bitmap::*;
pub use rasterizer::*;
pub use text_layout::*;
