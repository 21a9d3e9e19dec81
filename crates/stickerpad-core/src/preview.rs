//! Transient placement hints that never enter history.

use crate::drawable::Rgba;
use crate::render::Surface;
use kurbo::Point;

/// Opacity of the sticker ghost relative to a committed sticker.
pub const GHOST_OPACITY: f64 = 0.5;

/// Stroke width of the brush outline ring.
const OUTLINE_WIDTH: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    /// Ring showing the brush footprint under the pointer.
    BrushOutline { center: Point, width: f64, color: Rgba },
    /// Faded copy of the sticker that a click would place.
    StickerGhost {
        anchor: Point,
        glyph: String,
        rotation: u16,
        size: f64,
    },
}

impl Preview {
    pub fn brush(center: Point, width: f64, color: Rgba) -> Self {
        Preview::BrushOutline { center, width, color }
    }

    pub fn sticker(anchor: Point, glyph: impl Into<String>, rotation: u16, size: f64) -> Self {
        Preview::StickerGhost {
            anchor,
            glyph: glyph.into(),
            rotation: rotation % 360,
            size,
        }
    }

    /// Current pointer position the preview follows.
    pub fn position(&self) -> Point {
        match self {
            Preview::BrushOutline { center, .. } => *center,
            Preview::StickerGhost { anchor, .. } => *anchor,
        }
    }

    pub fn move_to(&mut self, point: Point) {
        match self {
            Preview::BrushOutline { center, .. } => *center = point,
            Preview::StickerGhost { anchor, .. } => *anchor = point,
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        match self {
            Preview::BrushOutline { center, width, color } => {
                let radius = (width / 2.0).max(OUTLINE_WIDTH);
                surface.outline_circle(*center, radius, OUTLINE_WIDTH, *color);
            }
            Preview::StickerGhost {
                anchor,
                glyph,
                rotation,
                size,
            } => {
                surface.draw_glyph(
                    glyph,
                    *anchor,
                    *size,
                    (*rotation as f64).to_radians(),
                    Rgba::black(),
                    GHOST_OPACITY,
                );
            }
        }
    }
}
