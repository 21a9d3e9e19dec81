//! Drawable definitions for the sketch surface.

mod sticker;
mod stroke;

pub use sticker::StickerPlacement;
pub use stroke::Stroke;

use crate::render::Surface;
use kurbo::{Point, Rect};
use uuid::Uuid;

/// Opaque-by-default color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::opaque(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::opaque(255, 255, 255)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::black()
    }
}

/// Unique identifier for drawables.
pub type DrawableId = Uuid;

/// Behaviour shared by every drawable variant.
pub trait DrawableTrait {
    /// Get the unique identifier.
    fn id(&self) -> DrawableId;

    /// Bounding box in surface coordinates, including stroke width or glyph extent.
    fn bounds(&self) -> Rect;

    /// Feed a new pointer position into the drawable while its gesture is live.
    fn extend(&mut self, point: Point);

    /// Draw onto a surface. Must not mutate anything but the surface.
    fn render(&self, surface: &mut dyn Surface);
}

/// A committed (or in-progress) unit of content.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    Stroke(Stroke),
    Sticker(StickerPlacement),
}

impl Drawable {
    pub fn id(&self) -> DrawableId {
        match self {
            Drawable::Stroke(s) => s.id(),
            Drawable::Sticker(s) => s.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Drawable::Stroke(s) => s.bounds(),
            Drawable::Sticker(s) => s.bounds(),
        }
    }

    pub fn extend(&mut self, point: Point) {
        match self {
            Drawable::Stroke(s) => s.extend(point),
            Drawable::Sticker(s) => s.extend(point),
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        match self {
            Drawable::Stroke(s) => s.render(surface),
            Drawable::Sticker(s) => s.render(surface),
        }
    }

    /// Short name used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Drawable::Stroke(_) => "stroke",
            Drawable::Sticker(_) => "sticker",
        }
    }

    pub fn as_stroke(&self) -> Option<&Stroke> {
        match self {
            Drawable::Stroke(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sticker(&self) -> Option<&StickerPlacement> {
        match self {
            Drawable::Sticker(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Stroke> for Drawable {
    fn from(stroke: Stroke) -> Self {
        Drawable::Stroke(stroke)
    }
}

impl From<StickerPlacement> for Drawable {
    fn from(sticker: StickerPlacement) -> Self {
        Drawable::Sticker(sticker)
    }
}
