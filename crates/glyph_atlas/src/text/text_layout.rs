//! Text layout engine
//!
//! Converts strings into integer draw anchors against a loaded
//! [`FontAtlas`]. Each visible character gets the top-left pixel where its
//! atlas bitmap should be drawn; spaces move the pen but draw nothing. Every
//! layout ends with one extra anchor, computed as if a `.` followed the
//! string, which callers use as a caret position.
//!
//! # Layout Coordinate System
//!
//! - `(x, y)` is the pen position on the baseline of the first character
//! - +X axis points right
//! - +Y axis points down (top-left buffer origin)

use super::{CharacterMetrics, FontAtlas, FontError, FontResult, Rasterizer};

/// Character whose metrics place the trailing marker
pub const MARKER_CHAR: char = '.';

/// Top-left pixel where a glyph bitmap is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Anchor {
    /// Horizontal pixel coordinate
    pub x: i32,
    /// Vertical pixel coordinate
    pub y: i32,
}

impl Anchor {
    /// Create an anchor
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn for_glyph(pen_x: i32, baseline_y: i32, metrics: &CharacterMetrics) -> FontResult<Self> {
        Ok(Self {
            x: checked_offset(pen_x, metrics.bitmap_left)?,
            y: baseline_y
                .checked_sub(metrics.bitmap_top)
                .ok_or(FontError::CoordinateOverflow)?,
        })
    }
}

fn checked_offset(value: i32, delta: i32) -> FontResult<i32> {
    value.checked_add(delta).ok_or(FontError::CoordinateOverflow)
}

/// Anchors for one laid-out string
///
/// Slots stay aligned with the input: slot `i` belongs to character `i` and
/// is `None` for a space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutResult {
    slots: Vec<Option<Anchor>>,
    marker: Anchor,
}

impl LayoutResult {
    /// One slot per input character
    pub fn slots(&self) -> &[Option<Anchor>] {
        &self.slots
    }

    /// Anchors of visible (non-space) characters, in string order
    pub fn visible(&self) -> impl Iterator<Item = Anchor> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Number of visible characters
    pub fn visible_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Trailing marker anchor
    pub fn marker(&self) -> Anchor {
        self.marker
    }

    /// Visible anchors followed by the marker
    pub fn anchors(&self) -> impl Iterator<Item = Anchor> + '_ {
        self.visible().chain(std::iter::once(self.marker))
    }

    /// Length of the flat coordinate buffer: two values per character plus the marker
    pub fn coord_len(&self) -> usize {
        2 * (self.slots.len() + 1)
    }

    /// Flat `[x0, y0, x1, y1, ...]` buffer, string-aligned, marker last
    ///
    /// Space slots are filled with `fill`.
    pub fn to_coords(&self, fill: i32) -> Vec<i32> {
        let mut coords = vec![fill; self.coord_len()];
        self.write_slots(&mut coords);
        coords
    }

    /// Write into a caller-provided flat buffer, leaving space slots untouched
    pub fn write_coords(&self, out: &mut [i32]) -> FontResult<()> {
        let needed = self.coord_len();
        if out.len() < needed {
            return Err(FontError::BufferTooSmall {
                needed,
                len: out.len(),
            });
        }
        self.write_slots(out);
        Ok(())
    }

    fn write_slots(&self, out: &mut [i32]) {
        let slots = self.slots.iter().copied().chain(std::iter::once(Some(self.marker)));
        for (pair, slot) in out.chunks_exact_mut(2).zip(slots) {
            if let Some(anchor) = slot {
                pair[0] = anchor.x;
                pair[1] = anchor.y;
            }
        }
    }
}

/// Text layout engine borrowing a loaded atlas
pub struct TextLayout<'a, R: Rasterizer> {
    /// Font atlas for metrics and kerning lookup
    atlas: &'a FontAtlas<R>,
}

impl<'a, R: Rasterizer> TextLayout<'a, R> {
    /// Create a new text layout engine
    pub fn new(atlas: &'a FontAtlas<R>) -> Self {
        Self { atlas }
    }

    /// Get the font atlas used by this layout engine
    pub fn font_atlas(&self) -> &'a FontAtlas<R> {
        self.atlas
    }

    /// Lay out `text` for drawing into a pixel buffer with the pen at `(x, y)`
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use glyph_atlas::prelude::*;
    /// # fn demo(atlas: &FontAtlas<FontdueRasterizer>) -> FontResult<()> {
    /// let result = TextLayout::new(atlas).layout_buffer("a b", 0, 20)?;
    /// assert_eq!(result.visible_count(), 2);
    /// assert_eq!(result.to_coords(0).len(), 8);
    /// # Ok(())
    /// # }
    /// ```
    pub fn layout_buffer(&self, text: &str, x: i32, y: i32) -> FontResult<LayoutResult> {
        self.layout(text, x, y, None)
    }

    /// Lay out `text` for drawing into a texture
    ///
    /// When `phantom` is given and `text` is non-empty, the pen first moves
    /// as if `phantom` had just been drawn, so `text` continues an earlier
    /// draw call with correct kerning.
    pub fn layout_texture(
        &self,
        text: &str,
        x: i32,
        y: i32,
        phantom: Option<char>,
    ) -> FontResult<LayoutResult> {
        self.layout(text, x, y, phantom)
    }

    fn layout(&self, text: &str, x: i32, y: i32, phantom: Option<char>) -> FontResult<LayoutResult> {
        let chars: Vec<char> = text.chars().collect();
        let marker_metrics = self.atlas.metrics(MARKER_CHAR)?;

        let mut pen_x = x;
        if let (Some(phantom), Some(&first)) = (phantom, chars.first()) {
            let kern = self.atlas.kerning(phantom, first)?;
            pen_x = checked_offset(checked_offset(pen_x, kern)?, self.atlas.metrics(phantom)?.advance)?;
        }

        let mut slots = Vec::with_capacity(chars.len());
        for (i, &ch) in chars.iter().enumerate() {
            let metrics = self.atlas.metrics(ch)?;

            slots.push(if ch == ' ' {
                None
            } else {
                Some(Anchor::for_glyph(pen_x, y, metrics)?)
            });

            let kern = match chars.get(i + 1) {
                Some(&next) => self.atlas.kerning(ch, next)?,
                None => 0,
            };
            pen_x = checked_offset(checked_offset(pen_x, kern)?, metrics.advance)?;
        }

        let marker = Anchor::for_glyph(pen_x, y, marker_metrics)?;
        log::trace!("Laid out {:?}: {} slots, marker at {:?}", text, slots.len(), marker);

        Ok(LayoutResult { slots, marker })
    }
}
